//! Ramped sine excitation generator

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::analysis::constants::DT;

/// Seconds of silence appended after the wave when observation is requested
pub const OBSERVATION_SECONDS: f64 = 5.0;
/// Lowest accepted frequency (Hz)
pub const MIN_FREQ_HZ: f64 = 0.01;

/// Shape of a generated sine wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineWaveInput {
    /// Frequency (Hz), floored at 0.01
    pub freq_hz: f64,
    /// Accepted for compatibility but not read: both ramps use `post_cycles`
    #[serde(default)]
    pub pre_cycles: usize,
    /// Total cycles including one per non-empty ramp
    pub harmonic_cycles: usize,
    /// Length of both the ramp-up and the ramp-down, in cycles
    #[serde(default)]
    pub post_cycles: usize,
    /// Append five seconds of zeros instead of a single one
    #[serde(default)]
    pub add_after_observation: bool,
}

impl Default for SineWaveInput {
    fn default() -> Self {
        Self {
            freq_hz: 1.0,
            pre_cycles: 0,
            harmonic_cycles: 1,
            post_cycles: 0,
            add_after_observation: false,
        }
    }
}

impl SineWaveInput {
    pub fn new(freq_hz: f64, harmonic_cycles: usize) -> Self {
        Self {
            freq_hz,
            harmonic_cycles,
            ..Self::default()
        }
    }

    pub fn with_ramps(mut self, pre_cycles: usize, post_cycles: usize) -> Self {
        self.pre_cycles = pre_cycles;
        self.post_cycles = post_cycles;
        self
    }

    pub fn with_observation(mut self, add_after_observation: bool) -> Self {
        self.add_after_observation = add_after_observation;
        self
    }

    /// Samples in one cycle, at least 1
    pub fn steps_per_cycle(&self) -> usize {
        let f = self.freq_hz.max(MIN_FREQ_HZ);
        ((1.0 / (f * DT)).floor() as usize).max(1)
    }

    /// Amplitude of each cycle, in order
    ///
    /// The ramp-up is `post_cycles` long, like the ramp-down; `pre_cycles`
    /// does not change the envelope.
    pub fn cycle_amplitudes(&self) -> Vec<f64> {
        let n_pre = self.post_cycles;
        let n_post = self.post_cycles;
        let mut middle = self.harmonic_cycles.max(1);
        if n_pre > 0 {
            middle = middle.saturating_sub(1);
        }
        if n_post > 0 {
            middle = middle.saturating_sub(1);
        }

        let ramp_up = (0..n_pre).map(|i| (i + 1) as f64 / n_pre as f64);
        let plateau = std::iter::repeat(1.0).take(middle);
        let ramp_down = (0..n_post).rev().map(|i| (i + 1) as f64 / n_post as f64);
        ramp_up.chain(plateau).chain(ramp_down).collect()
    }
}

/// Generate the wave at the fixed time step, unit peak amplitude
pub fn make_sine_wave(input: &SineWaveInput) -> Vec<f64> {
    let f = input.freq_hz.max(MIN_FREQ_HZ);
    let omega = 2.0 * PI * f;
    let steps = input.steps_per_cycle();
    let amplitudes = input.cycle_amplitudes();

    let trailer = if input.add_after_observation {
        (OBSERVATION_SECONDS / DT).floor() as usize
    } else {
        1
    };

    let mut wave = Vec::with_capacity(amplitudes.len() * steps + trailer);
    for amp in amplitudes {
        wave.extend((0..steps).map(|i| amp * (omega * i as f64 * DT).sin()));
    }
    wave.resize(wave.len() + trailer, 0.0);
    wave
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_cycle_one_hz() {
        let wave = make_sine_wave(&SineWaveInput::new(1.0, 1));
        assert_eq!(wave.len(), 101);
        for (i, v) in wave.iter().take(100).enumerate() {
            assert_abs_diff_eq!(*v, (2.0 * PI * i as f64 * 0.01).sin(), epsilon = 1e-12);
        }
        assert_eq!(wave[100], 0.0);
    }

    #[test]
    fn test_observation_padding() {
        let wave = make_sine_wave(&SineWaveInput::new(1.0, 1).with_observation(true));
        assert_eq!(wave.len(), 100 + 500);
        assert!(wave[100..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_ramped_envelope() {
        let input = SineWaveInput::new(2.0, 4).with_ramps(3, 3);
        let amps = input.cycle_amplitudes();
        // 3 up, 4 - 2 plateau, 3 down
        assert_eq!(amps.len(), 8);
        assert_abs_diff_eq!(amps[0], 1.0 / 3.0, epsilon = 1e-15);
        assert_abs_diff_eq!(amps[1], 2.0 / 3.0, epsilon = 1e-15);
        for amp in &amps[2..6] {
            assert_abs_diff_eq!(*amp, 1.0);
        }
        assert_abs_diff_eq!(amps[6], 2.0 / 3.0, epsilon = 1e-15);
        assert_abs_diff_eq!(amps[7], 1.0 / 3.0, epsilon = 1e-15);
        assert_eq!(make_sine_wave(&input).len(), 8 * 50 + 1);
    }

    #[test]
    fn test_ramp_up_follows_post_cycles() {
        let no_post = SineWaveInput::new(2.0, 4).with_ramps(2, 0);
        assert_eq!(no_post.cycle_amplitudes(), vec![1.0; 4]);
        assert_eq!(make_sine_wave(&no_post).len(), 4 * 50 + 1);

        let uneven = SineWaveInput::new(2.0, 4).with_ramps(0, 2);
        assert_eq!(uneven.cycle_amplitudes(), vec![0.5, 1.0, 1.0, 1.0, 1.0, 0.5]);
        assert_eq!(
            make_sine_wave(&uneven),
            make_sine_wave(&SineWaveInput::new(2.0, 4).with_ramps(5, 2))
        );
    }

    #[test]
    fn test_plateau_never_negative() {
        let amps = SineWaveInput::new(1.0, 1).with_ramps(1, 1).cycle_amplitudes();
        assert_eq!(amps, vec![1.0, 1.0]);
    }

    #[test]
    fn test_frequency_floor_and_min_step() {
        assert_eq!(SineWaveInput::new(0.0, 1).steps_per_cycle(), 10_000);
        assert_eq!(SineWaveInput::new(500.0, 1).steps_per_cycle(), 1);
        assert_eq!(SineWaveInput::new(3.0, 1).steps_per_cycle(), 33);
    }
}
