//! Excitation sources for the response analysis

use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::constants::GRAVITY;
use crate::error::{DynamicsError, DynamicsResult};

/// Force history applied at one story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceInput {
    /// 0-based story index
    pub floor_index: usize,
    /// Force samples at the fixed time step
    pub series: Vec<f64>,
}

impl ForceInput {
    pub fn new(floor_index: usize, series: Vec<f64>) -> Self {
        Self { floor_index, series }
    }

    /// Force input built from a normalised record scaled to `max_force_kn`
    pub fn from_record(floor_index: usize, record: &[f64], max_force_kn: f64) -> Self {
        Self::new(floor_index, force_wave_from_record(record, max_force_kn))
    }
}

/// What drives the structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Excitation {
    /// Ground acceleration (gal)
    Base { ground_acceleration: Vec<f64> },
    /// Story forces; the ground stays still
    Force { inputs: Vec<ForceInput> },
}

impl Excitation {
    pub fn base(ground_acceleration: Vec<f64>) -> Self {
        Excitation::Base { ground_acceleration }
    }

    pub fn force(inputs: Vec<ForceInput>) -> Self {
        Excitation::Force { inputs }
    }

    /// Number of steps the integrator will take
    ///
    /// Force series of different lengths are cut to the shortest one.
    pub fn step_count(&self) -> DynamicsResult<usize> {
        let steps = match self {
            Excitation::Base { ground_acceleration } => ground_acceleration.len(),
            Excitation::Force { inputs } => {
                if inputs.is_empty() {
                    return Err(DynamicsError::InvalidInput(
                        "force excitation has no inputs".to_string(),
                    ));
                }
                let shortest = inputs.iter().map(|f| f.series.len()).min().unwrap_or(0);
                let longest = inputs.iter().map(|f| f.series.len()).max().unwrap_or(0);
                if shortest != longest {
                    warn!(
                        "force series lengths differ ({}..{}), using the first {} samples",
                        shortest, longest, shortest
                    );
                }
                shortest
            }
        };
        if steps == 0 {
            return Err(DynamicsError::InvalidInput("excitation has no samples".to_string()));
        }
        if let Some(bad) = self.first_non_finite(steps) {
            return Err(DynamicsError::InvalidInput(format!(
                "excitation sample {} is not finite",
                bad
            )));
        }
        Ok(steps)
    }

    /// Ground acceleration for each of `steps` samples
    pub fn ground_acceleration(&self, steps: usize) -> Vec<f64> {
        match self {
            Excitation::Base { ground_acceleration } => {
                ground_acceleration.iter().take(steps).copied().collect()
            }
            Excitation::Force { .. } => zero_wave(steps),
        }
    }

    /// Samples past `steps` are never integrated and are not checked
    fn first_non_finite(&self, steps: usize) -> Option<usize> {
        match self {
            Excitation::Base { ground_acceleration } => ground_acceleration
                .iter()
                .take(steps)
                .position(|v| !v.is_finite()),
            Excitation::Force { inputs } => inputs
                .iter()
                .find_map(|f| f.series.iter().take(steps).position(|v| !v.is_finite())),
        }
    }
}

/// Scale a record so that unit amplitude maps to `max_force_kn / g`
pub fn force_wave_from_record(record: &[f64], max_force_kn: f64) -> Vec<f64> {
    let scale = max_force_kn / GRAVITY;
    record.iter().map(|v| v * scale).collect()
}

/// All-zero series of `len` samples
pub fn zero_wave(len: usize) -> Vec<f64> {
    vec![0.0; len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_step_count() {
        let e = Excitation::base(vec![1.0, 2.0, 3.0]);
        assert_eq!(e.step_count().unwrap(), 3);
        assert_eq!(e.ground_acceleration(3), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_force_uses_shortest_series() {
        let e = Excitation::force(vec![
            ForceInput::new(0, vec![1.0; 10]),
            ForceInput::new(1, vec![1.0; 7]),
        ]);
        assert_eq!(e.step_count().unwrap(), 7);
        assert_eq!(e.ground_acceleration(7), vec![0.0; 7]);
    }

    #[test]
    fn test_empty_excitation_is_rejected() {
        assert!(matches!(
            Excitation::base(vec![]).step_count(),
            Err(DynamicsError::InvalidInput(_))
        ));
        assert!(Excitation::force(vec![]).step_count().is_err());
        assert!(Excitation::force(vec![ForceInput::new(0, vec![])]).step_count().is_err());
        assert!(Excitation::base(vec![0.0, f64::NAN]).step_count().is_err());
    }

    #[test]
    fn test_non_finite_tail_past_truncation_is_ignored() {
        let mut long = vec![1.0; 10];
        long[8] = f64::NAN;
        let e = Excitation::force(vec![
            ForceInput::new(0, long.clone()),
            ForceInput::new(1, vec![1.0; 7]),
        ]);
        assert_eq!(e.step_count().unwrap(), 7);

        long[3] = f64::INFINITY;
        let e = Excitation::force(vec![ForceInput::new(0, long), ForceInput::new(1, vec![1.0; 7])]);
        assert!(matches!(e.step_count(), Err(DynamicsError::InvalidInput(_))));
    }

    #[test]
    fn test_force_wave_scaling() {
        let f = ForceInput::from_record(2, &[1.0, -0.5], 9.80665);
        assert_eq!(f.floor_index, 2);
        assert!((f.series[0] - 1.0).abs() < 1e-15);
        assert!((f.series[1] + 0.5).abs() < 1e-15);
    }
}
