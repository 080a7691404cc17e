//! Shear-building model definition
//!
//! A model is a chain of lumped story masses connected by story springs,
//! with optional tuned mass dampers hanging off individual floors. Values
//! are in the units the rest of the engine expects: kN, kN/cm, kN/kine, Hz.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::constants::MAX_STORIES;
use crate::error::{DynamicsError, DynamicsResult};

/// A tuned mass damper attached to one floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TmdSetting {
    /// Target floor, 1-based. Zero means "not installed".
    pub floor: usize,
    /// TMD weight (kN)
    pub weight_kn: f64,
    /// Tuning frequency (Hz)
    pub freq_hz: f64,
}

impl TmdSetting {
    pub fn new(floor: usize, weight_kn: f64, freq_hz: f64) -> Self {
        Self { floor, weight_kn, freq_hz }
    }
}

/// Lumped-mass shear building with optional TMDs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralModel {
    /// Model name
    pub name: String,
    /// Number of stories
    pub story_count: usize,
    /// Story weights, bottom to top (kN)
    pub weights_kn: Vec<f64>,
    /// Story shear stiffness, bottom to top (kN/cm)
    pub stiffness_kn_per_cm: Vec<f64>,
    /// Additional story dampers (kN/kine)
    #[serde(default)]
    pub extra_damping_kn_per_kine: Vec<f64>,
    /// Installed TMDs
    #[serde(default)]
    pub tmd_list: Vec<TmdSetting>,
}

impl Default for StructuralModel {
    /// Three-story reference building with one TMD on the roof
    fn default() -> Self {
        Self {
            name: "ModelA".to_string(),
            story_count: 3,
            weights_kn: vec![1000.0, 1000.0, 900.0],
            stiffness_kn_per_cm: vec![1200.0, 1100.0, 900.0],
            extra_damping_kn_per_kine: vec![0.0, 0.0, 0.0],
            tmd_list: vec![TmdSetting::new(3, 30.0, 2.5)],
        }
    }
}

impl StructuralModel {
    /// Create a model without TMDs or extra damping
    pub fn new(name: &str, weights_kn: Vec<f64>, stiffness_kn_per_cm: Vec<f64>) -> Self {
        let story_count = weights_kn.len();
        Self {
            name: name.to_string(),
            story_count,
            weights_kn,
            stiffness_kn_per_cm,
            extra_damping_kn_per_kine: vec![0.0; story_count],
            tmd_list: Vec::new(),
        }
    }

    /// Set the additional story damping coefficients
    pub fn with_extra_damping(mut self, damping: Vec<f64>) -> Self {
        self.extra_damping_kn_per_kine = damping;
        self
    }

    /// Add a TMD
    pub fn with_tmd(mut self, tmd: TmdSetting) -> Self {
        self.tmd_list.push(tmd);
        self
    }

    /// Return a copy with the story count and per-story arrays made consistent
    ///
    /// * story count is clamped into `[1, MAX_STORIES]`
    /// * per-story arrays are truncated or zero-filled to the story count
    /// * TMDs with floor 0 are dropped, higher floors are clamped to the roof
    pub fn normalized(&self) -> Self {
        let story_count = self.story_count.clamp(1, MAX_STORIES);
        if story_count != self.story_count {
            warn!(
                "model '{}': story count {} clamped to {}",
                self.name, self.story_count, story_count
            );
        }

        let tmd_list = self
            .tmd_list
            .iter()
            .filter(|tmd| {
                if tmd.floor == 0 {
                    warn!("model '{}': TMD without a floor ignored", self.name);
                }
                tmd.floor > 0
            })
            .map(|tmd| TmdSetting {
                floor: tmd.floor.min(story_count),
                ..*tmd
            })
            .collect();

        Self {
            name: self.name.clone(),
            story_count,
            weights_kn: fit_to_stories(&self.weights_kn, story_count),
            stiffness_kn_per_cm: fit_to_stories(&self.stiffness_kn_per_cm, story_count),
            extra_damping_kn_per_kine: fit_to_stories(&self.extra_damping_kn_per_kine, story_count),
            tmd_list,
        }
    }

    /// Check that a normalized model is physically usable
    pub fn validate(&self) -> DynamicsResult<()> {
        let n = self.story_count;
        if n == 0 || n > MAX_STORIES {
            return Err(DynamicsError::InvalidModel(format!(
                "story count {} outside [1, {}]",
                n, MAX_STORIES
            )));
        }
        for (label, values) in [
            ("weights", &self.weights_kn),
            ("stiffness", &self.stiffness_kn_per_cm),
            ("extra damping", &self.extra_damping_kn_per_kine),
        ] {
            if values.len() != n {
                return Err(DynamicsError::InvalidModel(format!(
                    "{} has {} entries for {} stories",
                    label,
                    values.len(),
                    n
                )));
            }
            if let Some(bad) = values.iter().position(|v| !v.is_finite()) {
                return Err(DynamicsError::InvalidModel(format!(
                    "{} entry {} is not finite",
                    label,
                    bad + 1
                )));
            }
        }
        if let Some(bad) = self.weights_kn.iter().position(|&w| w < 0.0) {
            return Err(DynamicsError::InvalidModel(format!(
                "story {} has negative weight",
                bad + 1
            )));
        }
        for (i, tmd) in self.tmd_list.iter().enumerate() {
            if tmd.floor == 0 || tmd.floor > n {
                return Err(DynamicsError::InvalidModel(format!(
                    "TMD {} targets floor {} of a {}-story model",
                    i + 1,
                    tmd.floor,
                    n
                )));
            }
            if !tmd.weight_kn.is_finite() || !tmd.freq_hz.is_finite() || tmd.weight_kn < 0.0 {
                return Err(DynamicsError::InvalidModel(format!(
                    "TMD {} has invalid weight or frequency",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    /// Number of TMDs
    pub fn tmd_count(&self) -> usize {
        self.tmd_list.len()
    }

    /// Sum of story weights (kN)
    pub fn total_weight(&self) -> f64 {
        self.weights_kn.iter().sum()
    }

    /// TMD-to-building weight ratio μ, zero when the building has no weight
    pub fn tmd_mass_ratio(&self, tmd: &TmdSetting) -> f64 {
        let total = self.total_weight();
        if total > 0.0 {
            tmd.weight_kn / total
        } else {
            0.0
        }
    }
}

/// Truncate or zero-fill to exactly `n` entries
fn fit_to_stories(values: &[f64], n: usize) -> Vec<f64> {
    let mut result: Vec<f64> = values.iter().take(n).copied().collect();
    result.resize(n, 0.0);
    result
}
