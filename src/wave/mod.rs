//! Ground-motion record processing: integration, response spectra and
//! synthetic sine excitation

pub mod integrate;
pub mod sine;
pub mod spectrum;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{DynamicsError, DynamicsResult};
use crate::results::{max_abs, WaveAnalysisResult};

pub use integrate::{band_pass_filter, integrate_wave};
pub use sine::{make_sine_wave, SineWaveInput};
pub use spectrum::{nigam_jennings, period_grid, response_spectrum};

/// Record analysis options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveOptions {
    /// Damping ratios of the spectra, each in [0, 1)
    pub damping_list: Vec<f64>,
    /// Subtract the record mean before integrating
    pub bias_removal: bool,
}

impl Default for WaveOptions {
    fn default() -> Self {
        Self {
            damping_list: vec![0.05],
            bias_removal: true,
        }
    }
}

impl WaveOptions {
    pub fn with_damping_list(mut self, damping_list: Vec<f64>) -> Self {
        self.damping_list = damping_list;
        self
    }

    pub fn with_bias_removal(mut self, bias_removal: bool) -> Self {
        self.bias_removal = bias_removal;
        self
    }
}

/// Integrate a record and compute its spectra
///
/// Spectra use the raw record; the reported peaks come from the filtered,
/// integrated series.
pub fn analyze_wave(record: &[f64], options: &WaveOptions) -> DynamicsResult<WaveAnalysisResult> {
    if let Some(i) = record.iter().position(|v| !v.is_finite()) {
        return Err(DynamicsError::InvalidInput(format!("wave sample {} is not finite", i)));
    }
    let integration = integrate_wave(record, options.bias_removal)?;
    let spectrum = response_spectrum(record, &options.damping_list)?;

    let amax = max_abs(&integration.acc);
    let vmax = max_abs(&integration.vel);
    let dmax = max_abs(&integration.dis);
    info!(
        "wave analysis: {} samples (padded to {}), {} damping ratios, amax={:.3} vmax={:.3} dmax={:.3}",
        record.len(),
        integration.time.len(),
        options.damping_list.len(),
        amax,
        vmax,
        dmax
    );

    Ok(WaveAnalysisResult {
        integration,
        spectrum,
        amax,
        vmax,
        dmax,
    })
}
