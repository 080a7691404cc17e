//! Radix-2 iterative Cooley-Tukey FFT
//!
//! The forward transform carries the 1/N normalisation and the inverse does
//! not, so `inverse(forward(x)) == x`.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{DynamicsError, DynamicsResult};

/// Transform direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftDirection {
    /// Time to frequency, kernel `exp(-j..)`, scaled by 1/N
    Forward,
    /// Frequency to time, kernel `exp(+j..)`, unscaled
    Inverse,
}

/// Transform `data` in place. The length must be a power of two.
pub fn fft_in_place(data: &mut [Complex64], direction: FftDirection) -> DynamicsResult<()> {
    let n = data.len();
    if n == 0 || !n.is_power_of_two() {
        return Err(DynamicsError::InvalidInput(format!(
            "FFT length must be a non-zero power of two, got {}",
            n
        )));
    }

    if direction == FftDirection::Forward {
        let scale = 1.0 / n as f64;
        for value in data.iter_mut() {
            *value *= scale;
        }
    }

    if n == 1 {
        return Ok(());
    }

    // Bit-reversal permutation
    let bits = n.trailing_zeros();
    for i in 0..n {
        let rev = bit_reverse(i, bits);
        if i < rev {
            data.swap(i, rev);
        }
    }

    let sign = match direction {
        FftDirection::Forward => -1.0,
        FftDirection::Inverse => 1.0,
    };

    // Butterflies
    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle = sign * 2.0 * PI / size as f64;
        let w_step = Complex64::new(angle.cos(), angle.sin());
        let mut start = 0;
        while start < n {
            let mut w = Complex64::new(1.0, 0.0);
            for j in 0..half {
                let u = data[start + j];
                let t = w * data[start + j + half];
                data[start + j] = u + t;
                data[start + j + half] = u - t;
                w *= w_step;
            }
            start += size;
        }
        size *= 2;
    }

    Ok(())
}

/// Forward transform of a real record (normalised by 1/N)
pub fn forward_real(signal: &[f64]) -> DynamicsResult<Vec<Complex64>> {
    let mut data: Vec<Complex64> =
        signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    fft_in_place(&mut data, FftDirection::Forward)?;
    Ok(data)
}

/// Inverse transform, keeping only the real part
pub fn inverse_real(spectrum: &[Complex64]) -> DynamicsResult<Vec<f64>> {
    let mut data = spectrum.to_vec();
    fft_in_place(&mut data, FftDirection::Inverse)?;
    Ok(data.into_iter().map(|c| c.re).collect())
}

#[inline]
fn bit_reverse(mut x: usize, bits: u32) -> usize {
    let mut result = 0;
    for _ in 0..bits {
        result = (result << 1) | (x & 1);
        x >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_forward_then_inverse_is_identity() {
        let signal: Vec<f64> = (0..64)
            .map(|i| (0.3 * i as f64).sin() + 0.2 * (1.7 * i as f64).cos() - 0.05)
            .collect();
        let spectrum = forward_real(&signal).unwrap();
        let restored = inverse_real(&spectrum).unwrap();
        for (a, b) in signal.iter().zip(restored.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_forward_is_normalised() {
        // Constant signal puts its mean in the DC bin
        let spectrum = forward_real(&[3.0; 8]).unwrap();
        assert_abs_diff_eq!(spectrum[0].re, 3.0, epsilon = 1e-14);
        for bin in &spectrum[1..] {
            assert_abs_diff_eq!(bin.norm(), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_single_tone_lands_in_its_bin() {
        let n = 32;
        let k = 5;
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * k as f64 * i as f64 / n as f64).cos())
            .collect();
        let spectrum = forward_real(&signal).unwrap();
        assert_abs_diff_eq!(spectrum[k].re, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(spectrum[n - k].re, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(spectrum[k + 1].norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let mut data = vec![Complex64::new(1.0, 0.0); 6];
        assert!(fft_in_place(&mut data, FftDirection::Forward).is_err());
        let mut empty: Vec<Complex64> = vec![];
        assert!(fft_in_place(&mut empty, FftDirection::Inverse).is_err());
    }

    #[test]
    fn test_bit_reverse() {
        assert_eq!(bit_reverse(1, 3), 4);
        assert_eq!(bit_reverse(3, 3), 6);
        assert_eq!(bit_reverse(0, 3), 0);
    }
}
