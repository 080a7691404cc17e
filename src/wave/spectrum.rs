//! Elastic response spectra by the Nigam-Jennings recursion
//!
//! For piecewise-linear ground acceleration the SDOF state at the end of
//! each step is an exact linear map of the state and the two acceleration
//! samples bounding the step, so no sub-stepping is needed.

use std::f64::consts::PI;

use rayon::prelude::*;

use crate::analysis::constants::{DT, SPECTRUM_PERIOD_MAX, SPECTRUM_PERIOD_MIN, SPECTRUM_POINTS};
use crate::error::{DynamicsError, DynamicsResult};
use crate::results::{SpectrumCurve, SpectrumResult};

/// Peak response of one oscillator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorPeaks {
    /// Max |absolute acceleration|
    pub amax: f64,
    /// Max |relative velocity|
    pub vmax: f64,
    /// Max |relative displacement|
    pub dmax: f64,
    /// Input energy integral ∑ v·ÿ·dt
    pub energy: f64,
}

impl OscillatorPeaks {
    /// Energy-equivalent velocity √(2|E|)
    pub fn equivalent_velocity(&self) -> f64 {
        (2.0 * self.energy.abs()).sqrt()
    }
}

/// Step-transfer coefficients for one (period, damping) pair
#[derive(Debug, Clone, Copy)]
struct Transfer {
    a11: f64,
    a12: f64,
    a21: f64,
    a22: f64,
    b11: f64,
    b12: f64,
    b21: f64,
    b22: f64,
}

impl Transfer {
    fn new(omega: f64, damping: f64, dt: f64) -> Self {
        let w2 = omega * omega;
        let hw = damping * omega;
        let wd = omega * (1.0 - damping * damping).sqrt();
        let wdt = wd * dt;
        let e = (-hw * dt).exp();
        let (s, c) = wdt.sin_cos();

        let ss = -hw * s - wd * c;
        let cc = -hw * c + wd * s;
        let s1 = (e * ss + wd) / w2;
        let c1 = (e * cc + hw) / w2;
        let s2 = (e * dt * ss + hw * s1 + wd * c1) / w2;
        let c2 = (e * dt * cc + hw * c1 - wd * s1) / w2;
        let s3 = dt * s1 - s2;
        let c3 = dt * c1 - c2;

        Self {
            a11: e * (c + hw * s / wd),
            a12: e * s / wd,
            a21: -e * w2 * s / wd,
            a22: e * (c - hw * s / wd),
            b11: -s2 / wdt,
            b12: -s3 / wdt,
            b21: (hw * s2 - wd * c2) / wdt,
            b22: (hw * s3 - wd * c3) / wdt,
        }
    }
}

/// The 201-point period grid, log-spaced over [0.02, 10] s with exact endpoints
pub fn period_grid() -> Vec<f64> {
    let last = SPECTRUM_POINTS - 1;
    let log_min = SPECTRUM_PERIOD_MIN.log10();
    let step = (SPECTRUM_PERIOD_MAX.log10() - log_min) / last as f64;
    (0..SPECTRUM_POINTS)
        .map(|i| match i {
            0 => SPECTRUM_PERIOD_MIN,
            i if i == last => SPECTRUM_PERIOD_MAX,
            i => 10f64.powf(log_min + step * i as f64),
        })
        .collect()
}

/// Peak response of a damped SDOF oscillator to `record` sampled at `DT`
///
/// # Errors
/// `InvalidInput` for an empty record, a non-positive period or a damping
/// ratio outside [0, 1).
pub fn nigam_jennings(record: &[f64], period: f64, damping: f64) -> DynamicsResult<OscillatorPeaks> {
    if record.is_empty() {
        return Err(DynamicsError::InvalidInput("wave record is empty".to_string()));
    }
    if !(period.is_finite() && period > 0.0) {
        return Err(DynamicsError::InvalidInput(format!("period must be positive, got {}", period)));
    }
    if !(0.0..1.0).contains(&damping) {
        return Err(DynamicsError::InvalidInput(format!(
            "damping ratio must lie in [0, 1), got {}",
            damping
        )));
    }

    let omega = 2.0 * PI / period;
    let hw = damping * omega;
    let w2 = omega * omega;
    let t = Transfer::new(omega, damping, DT);

    // Initial step from rest under the first sample
    let first = record[0];
    let mut dx_prev = -first * DT;
    let mut x_prev = 0.0;
    let mut amax = (2.0 * hw * first * DT).abs();
    let mut vmax = (first * DT).abs();
    let mut dmax = 0.0_f64;
    let mut energy = vmax * first * DT;

    for pair in record.windows(2) {
        let (before, now) = (pair[0], pair[1]);
        let x = t.a12 * dx_prev + t.a11 * x_prev + t.b12 * now + t.b11 * before;
        let dx = t.a22 * dx_prev + t.a21 * x_prev + t.b22 * now + t.b21 * before;
        let ddx = -2.0 * hw * dx - w2 * x;

        energy += dx * now * DT;
        amax = amax.max(ddx.abs());
        vmax = vmax.max(dx.abs());
        dmax = dmax.max(x.abs());

        dx_prev = dx;
        x_prev = x;
    }

    Ok(OscillatorPeaks { amax, vmax, dmax, energy })
}

/// Spectra of `record` for each damping ratio over [`period_grid`]
pub fn response_spectrum(record: &[f64], damping_list: &[f64]) -> DynamicsResult<SpectrumResult> {
    let period = period_grid();
    let curves = damping_list
        .iter()
        .map(|&h| spectrum_curve(record, &period, h))
        .collect::<DynamicsResult<Vec<_>>>()?;
    Ok(SpectrumResult { period, curves })
}

fn spectrum_curve(record: &[f64], periods: &[f64], damping: f64) -> DynamicsResult<SpectrumCurve> {
    let peaks = periods
        .par_iter()
        .map(|&t| nigam_jennings(record, t, damping))
        .collect::<DynamicsResult<Vec<_>>>()?;

    Ok(SpectrumCurve {
        damping,
        sa: peaks.iter().map(|p| p.amax).collect(),
        sv: peaks.iter().map(|p| p.vmax).collect(),
        sd: peaks.iter().map(|p| p.dmax).collect(),
        psv: peaks
            .iter()
            .zip(periods)
            .map(|(p, t)| p.amax * t / (2.0 * PI))
            .collect(),
        ve: peaks.iter().map(|p| p.equivalent_velocity()).collect(),
    })
}
