//! Result types for modal, response and wave analysis

use serde::{Deserialize, Serialize};

use crate::analysis::constants::DT;

// ========================
// Modal results
// ========================

/// One vibration mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    /// Eigenvalue λ = ω²
    pub eigenvalue: f64,
    /// Natural period (s), infinite for λ ≤ 0
    pub period: f64,
    /// Natural frequency (Hz), zero when the period is not finite
    pub frequency: f64,
    /// Participation factor β
    pub participation_factor: f64,
    /// Effective mass / total mass
    pub effective_mass_ratio: f64,
    /// Eigenvector scaled so its largest component is 1
    pub eigenvector: Vec<f64>,
    /// Eigenvector scaled by the participation coefficient
    pub mode_shape: Vec<f64>,
}

/// Modes ordered by descending period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalResult {
    pub modes: Vec<Mode>,
}

impl ModalResult {
    /// Lowest-frequency mode
    pub fn fundamental(&self) -> Option<&Mode> {
        self.modes.first()
    }

    pub fn periods(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.period).collect()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.frequency).collect()
    }

    /// Sum of effective mass ratios, 1.0 for a complete modal basis
    pub fn total_effective_mass_ratio(&self) -> f64 {
        self.modes.iter().map(|m| m.effective_mass_ratio).sum()
    }
}

// ========================
// Time-history results
// ========================

/// Response history of a single DOF
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DofHistory {
    /// Absolute acceleration (gal)
    pub acceleration: Vec<f64>,
    /// Displacement relative to the ground (cm)
    pub displacement: Vec<f64>,
}

impl DofHistory {
    pub fn with_capacity(steps: usize) -> Self {
        Self {
            acceleration: Vec::with_capacity(steps),
            displacement: Vec::with_capacity(steps),
        }
    }

    pub fn max_abs_acceleration(&self) -> f64 {
        max_abs(&self.acceleration)
    }

    pub fn max_abs_displacement(&self) -> f64 {
        max_abs(&self.displacement)
    }
}

/// Response history of a TMD, tagged with the floor it hangs from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdHistory {
    /// Target floor (1-based)
    pub target_floor: usize,
    pub history: DofHistory,
}

/// Peak absolute values per DOF group
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePeaks {
    pub max_main_acc: f64,
    pub max_main_dis: f64,
    pub max_tmd_acc: f64,
    pub max_tmd_dis: f64,
}

/// Output of one response analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseResult {
    /// Case name, typically `{model}_{wave}`
    pub name: String,
    pub model_name: String,
    /// Ground acceleration actually applied (zeros in force mode)
    pub excitation: Vec<f64>,
    /// One entry per story, bottom to top
    pub main: Vec<DofHistory>,
    /// One entry per TMD, in model order
    pub tmd: Vec<TmdHistory>,
}

impl ResponseResult {
    pub fn main_count(&self) -> usize {
        self.main.len()
    }

    pub fn tmd_count(&self) -> usize {
        self.tmd.len()
    }

    pub fn tmd_floors(&self) -> Vec<usize> {
        self.tmd.iter().map(|t| t.target_floor).collect()
    }

    /// Sample times `i·dt`
    pub fn time(&self) -> Vec<f64> {
        (0..self.excitation.len()).map(|i| i as f64 * DT).collect()
    }

    pub fn peaks(&self) -> ResponsePeaks {
        let fold = |values: Vec<f64>| values.into_iter().fold(0.0_f64, f64::max);
        ResponsePeaks {
            max_main_acc: fold(self.main.iter().map(|h| h.max_abs_acceleration()).collect()),
            max_main_dis: fold(self.main.iter().map(|h| h.max_abs_displacement()).collect()),
            max_tmd_acc: fold(self.tmd.iter().map(|t| t.history.max_abs_acceleration()).collect()),
            max_tmd_dis: fold(self.tmd.iter().map(|t| t.history.max_abs_displacement()).collect()),
        }
    }
}

// ========================
// Wave analysis results
// ========================

/// Band-passed acceleration with its integrals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationResult {
    /// Sample times of the padded record (s)
    pub time: Vec<f64>,
    /// Acceleration (gal)
    pub acc: Vec<f64>,
    /// Velocity (kine)
    pub vel: Vec<f64>,
    /// Displacement (cm)
    pub dis: Vec<f64>,
}

/// Spectra for a single damping ratio, one value per period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumCurve {
    pub damping: f64,
    /// Absolute acceleration response
    pub sa: Vec<f64>,
    /// Relative velocity response
    pub sv: Vec<f64>,
    /// Relative displacement response
    pub sd: Vec<f64>,
    /// Pseudo velocity Sa·T/2π
    pub psv: Vec<f64>,
    /// Energy-equivalent velocity
    pub ve: Vec<f64>,
}

/// Response spectra over the log-spaced period grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumResult {
    pub period: Vec<f64>,
    pub curves: Vec<SpectrumCurve>,
}

impl SpectrumResult {
    /// Sa of the first damping ratio, or empty
    pub fn sa(&self) -> Vec<f64> {
        self.curves.first().map(|c| c.sa.clone()).unwrap_or_default()
    }

    /// Row-major table: `[T, Sa, Sv, Sd, pSv, Ve]` repeated per damping ratio
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.period
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let mut row = Vec::with_capacity(1 + 5 * self.curves.len());
                row.push(t);
                for c in &self.curves {
                    row.extend_from_slice(&[c.sa[i], c.sv[i], c.sd[i], c.psv[i], c.ve[i]]);
                }
                row
            })
            .collect()
    }
}

/// Integrated series, spectra and peaks of one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveAnalysisResult {
    pub integration: IntegrationResult,
    pub spectrum: SpectrumResult,
    pub amax: f64,
    pub vmax: f64,
    pub dmax: f64,
}

pub(crate) fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}
