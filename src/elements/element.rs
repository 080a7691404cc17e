//! Spring-dashpot elements joining two DOFs or a DOF to the ground

use serde::{Deserialize, Serialize};

/// One end of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementEnd {
    /// Fixed base
    Ground,
    /// Free DOF by global index
    Dof(usize),
}

impl ElementEnd {
    pub fn dof(&self) -> Option<usize> {
        match self {
            ElementEnd::Ground => None,
            ElementEnd::Dof(i) => Some(*i),
        }
    }
}

/// What the element models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Story spring below floor `story + 1`
    Story { story: usize },
    /// Spring between TMD `tmd` and its target floor
    TmdSpring { tmd: usize },
}

/// Linear spring with viscous damping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    /// Lower / TMD end
    pub i: ElementEnd,
    /// Upper / floor end
    pub j: ElementEnd,
    /// Spring stiffness
    pub stiffness: f64,
    /// Viscous damping coefficient
    pub damping: f64,
    /// Design damping ratio used for stiffness-proportional augmentation
    pub design_ratio: Option<f64>,
}

impl Element {
    /// Story element; story 0 is tied to the ground
    pub fn story(story: usize, stiffness: f64, damping: f64, design_ratio: f64) -> Self {
        let i = if story == 0 {
            ElementEnd::Ground
        } else {
            ElementEnd::Dof(story - 1)
        };
        Self {
            kind: ElementKind::Story { story },
            i,
            j: ElementEnd::Dof(story),
            stiffness,
            damping,
            design_ratio: Some(design_ratio),
        }
    }

    /// TMD spring from DOF `tmd_dof` to the DOF of `floor` (1-based)
    pub fn tmd_spring(tmd: usize, tmd_dof: usize, floor: usize, stiffness: f64, design_ratio: f64) -> Self {
        Self {
            kind: ElementKind::TmdSpring { tmd },
            i: ElementEnd::Dof(tmd_dof),
            j: floor
                .checked_sub(1)
                .map(ElementEnd::Dof)
                .unwrap_or(ElementEnd::Ground),
            stiffness,
            damping: 0.0,
            design_ratio: Some(design_ratio),
        }
    }

    /// Add stiffness-proportional damping `2·h·k/ω1`; no-op when ω1 is zero
    pub fn augment_damping(&mut self, omega1: f64) {
        if omega1 > 0.0 {
            let h = self.design_ratio.unwrap_or(0.0);
            self.damping += 2.0 * h * self.stiffness / omega1;
        }
    }

    pub fn is_story(&self) -> bool {
        matches!(self.kind, ElementKind::Story { .. })
    }
}
