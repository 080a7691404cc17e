//! Band-passed frequency-domain integration of an acceleration record

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::analysis::constants::SAMPLING_HZ;
use crate::error::{DynamicsError, DynamicsResult};
use crate::math::fft;
use crate::results::IntegrationResult;

/// Low corner of the band-pass (Hz)
pub const LOW_CORNER_HZ: f64 = 0.5;
/// High corner of the band-pass (Hz), the Nyquist frequency
pub const HIGH_CORNER_HZ: f64 = SAMPLING_HZ / 2.0;

/// Smallest power of two ≥ `len`, never below 2
pub fn padded_length(len: usize) -> usize {
    let mut nb = 2;
    while nb < len {
        nb *= 2;
    }
    nb
}

/// Pad `record` to a power of two with `fill`
pub fn pad_record(record: &[f64], fill: f64) -> Vec<f64> {
    let mut padded = record.to_vec();
    padded.resize(padded_length(record.len()), fill);
    padded
}

/// Raised-sine band-pass gain at frequency `f`
///
/// The high side rolls off over `bh = 2.5·(200/df)` Hz around `fh`, the low
/// side over `bl = fl/2` Hz around `fl`. A corner at or below 1e-5 Hz is off.
pub fn band_pass_filter(f: f64, fl: f64, fh: f64, df: f64) -> f64 {
    let bh = 2.5 * (200.0 / df);
    let bl = fl / 2.0;
    let mut gain = 1.0;

    if fh > 1e-5 {
        gain = if f > fh + 0.7 * bh {
            0.0
        } else if f < fh - 0.3 * bh {
            1.0
        } else {
            0.5 * (1.0 + ((PI / bh) * (f - fh + 0.3 * bh) + 0.5 * PI).sin())
        };
    }

    if fl > 1e-5 {
        if f < fl - 0.7 * bl {
            gain = 0.0;
        } else if f <= fl + 0.3 * bl {
            gain *= 0.5 * (1.0 - ((PI / bl) * (f - fl + 0.7 * bl) + 0.5 * PI).sin());
        }
    }

    gain
}

/// Integrate `record` (gal) to velocity (kine) and displacement (cm)
///
/// With `bias_removal` the record mean is subtracted and also used as the
/// padding value; otherwise padding is zero.
pub fn integrate_wave(record: &[f64], bias_removal: bool) -> DynamicsResult<IntegrationResult> {
    if record.is_empty() {
        return Err(DynamicsError::InvalidInput("wave record is empty".to_string()));
    }
    let mean = record.iter().sum::<f64>() / record.len() as f64;
    let padded = pad_record(record, if bias_removal { mean } else { 0.0 });
    let nb = padded.len();

    let shifted: Vec<f64> = if bias_removal {
        padded.iter().map(|v| v - mean).collect()
    } else {
        padded
    };

    let mut acc = fft::forward_real(&shifted)?;
    let mut vel = vec![Complex64::new(0.0, 0.0); nb];
    let mut dis = vec![Complex64::new(0.0, 0.0); nb];

    let f0 = SAMPLING_HZ / nb as f64;
    let half = nb / 2;
    acc[0] = Complex64::new(0.0, 0.0);

    for i in 1..=half {
        let freq = f0 * i as f64;
        acc[i] *= band_pass_filter(freq, LOW_CORNER_HZ, HIGH_CORNER_HZ, SAMPLING_HZ);

        let w = 2.0 * PI * freq;
        let w2 = w * w;
        // divide by jω and (jω)²
        vel[i] = Complex64::new(acc[i].im / w, -acc[i].re / w);
        dis[i] = -acc[i] / w2;

        if i < half {
            let j = nb - i;
            acc[j] = acc[i].conj();
            vel[j] = vel[i].conj();
            dis[j] = dis[i].conj();
        }
    }

    Ok(IntegrationResult {
        time: (0..nb).map(|i| i as f64 / SAMPLING_HZ).collect(),
        acc: fft::inverse_real(&acc)?,
        vel: fft::inverse_real(&vel)?,
        dis: fft::inverse_real(&dis)?,
    })
}
