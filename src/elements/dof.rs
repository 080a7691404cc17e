//! Degree of freedom - one lumped mass in the chain

use serde::{Deserialize, Serialize};

/// What a DOF represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DofKind {
    /// Main story mass, 0-based story index
    MainStory { story: usize },
    /// TMD mass, 0-based TMD index and its 1-based target floor
    Tmd { tmd: usize, target_floor: usize },
}

/// A single horizontal degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegreeOfFreedom {
    /// Position in the global matrices
    pub index: usize,
    /// Owning mass (weight / g)
    pub mass: f64,
    /// Story or TMD
    pub kind: DofKind,
}

impl DegreeOfFreedom {
    /// DOF for story `story` (0-based)
    pub fn main_story(index: usize, story: usize, mass: f64) -> Self {
        Self {
            index,
            mass,
            kind: DofKind::MainStory { story },
        }
    }

    /// DOF for TMD `tmd` attached to `target_floor` (1-based)
    pub fn tmd(index: usize, tmd: usize, target_floor: usize, mass: f64) -> Self {
        Self {
            index,
            mass,
            kind: DofKind::Tmd { tmd, target_floor },
        }
    }

    pub fn is_main(&self) -> bool {
        matches!(self.kind, DofKind::MainStory { .. })
    }

    /// Target floor for TMD DOFs
    pub fn target_floor(&self) -> Option<usize> {
        match self.kind {
            DofKind::Tmd { target_floor, .. } => Some(target_floor),
            DofKind::MainStory { .. } => None,
        }
    }
}
