//! Global mass, stiffness and damping assembly
//!
//! Unit handling follows the reference numerics exactly: node masses are
//! `weight / g`, and the mass matrix divides those once more by 980.665.
//! Both divisions are intentional and must stay in place.

use std::f64::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::constants::{GRAVITY, GRAVITY_GAL};
use crate::analysis::modal::ModalSolver;
use crate::elements::{DegreeOfFreedom, Element, ElementEnd};
use crate::error::DynamicsResult;
use crate::math::{self, Mat};
use crate::model::StructuralModel;

/// Global system matrices, all `n × n` with `n = stories + TMDs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMatrices {
    /// Diagonal lumped mass
    pub mass: Mat,
    pub stiffness: Mat,
    pub damping: Mat,
}

/// Assembled model with its DOF/element bookkeeping
#[derive(Debug, Clone)]
pub struct StructuralSystem {
    pub matrices: GlobalMatrices,
    /// Stories first, then TMDs
    pub dofs: Vec<DegreeOfFreedom>,
    pub elements: Vec<Element>,
    pub main_count: usize,
    /// Target floor (1-based) of each TMD
    pub tmd_floors: Vec<usize>,
    /// First-mode circular frequency used for damping augmentation
    pub reference_omega: f64,
}

impl StructuralSystem {
    pub fn dof_count(&self) -> usize {
        self.dofs.len()
    }

    pub fn tmd_count(&self) -> usize {
        self.tmd_floors.len()
    }
}

/// Optimal TMD damping ratio `√(3μ / (8(1+μ)))`
pub fn optimal_tmd_damping(mass_ratio: f64) -> f64 {
    (3.0 * mass_ratio / (8.0 * (1.0 + mass_ratio))).sqrt()
}

/// TMD spring constant `4π²f²·(w/g)/100` before the element unit scaling
pub fn tmd_spring_stiffness(weight_kn: f64, freq_hz: f64) -> f64 {
    4.0 * PI * PI * freq_hz * freq_hz * (weight_kn / GRAVITY) / 100.0
}

/// Builds global matrices from a building + TMD definition
pub struct StructuralModelBuilder {
    model: StructuralModel,
    damping_ratio: f64,
}

impl StructuralModelBuilder {
    /// `damping_ratio` is the already-resolved story design damping ratio
    pub fn new(model: &StructuralModel, damping_ratio: f64) -> Self {
        Self {
            model: model.normalized(),
            damping_ratio,
        }
    }

    /// Assemble a fresh system; nothing is shared between calls
    pub fn build(&self) -> DynamicsResult<StructuralSystem> {
        let model = &self.model;
        model.validate()?;

        let main_count = model.story_count;
        let dofs = self.build_dofs();
        let mut elements = self.build_elements();

        let reference_omega = self.reference_omega(&elements)?;
        for element in elements.iter_mut() {
            element.augment_damping(reference_omega);
        }

        let matrices = assemble(&dofs, &elements);

        debug!(
            "model '{}': {} DOFs ({} stories, {} TMDs), omega1={:.5} rad/s",
            model.name,
            dofs.len(),
            main_count,
            model.tmd_count(),
            reference_omega
        );

        Ok(StructuralSystem {
            matrices,
            dofs,
            elements,
            main_count,
            tmd_floors: model.tmd_list.iter().map(|t| t.floor).collect(),
            reference_omega,
        })
    }

    fn build_dofs(&self) -> Vec<DegreeOfFreedom> {
        let model = &self.model;
        let main_count = model.story_count;
        let stories = model
            .weights_kn
            .iter()
            .enumerate()
            .map(|(i, w)| DegreeOfFreedom::main_story(i, i, w / GRAVITY));
        let tmds = model.tmd_list.iter().enumerate().map(|(i, tmd)| {
            DegreeOfFreedom::tmd(main_count + i, i, tmd.floor, tmd.weight_kn / GRAVITY)
        });
        stories.chain(tmds).collect()
    }

    fn build_elements(&self) -> Vec<Element> {
        let model = &self.model;
        let main_count = model.story_count;
        let mut elements = Vec::with_capacity(main_count + model.tmd_count());

        for i in 0..main_count {
            elements.push(Element::story(
                i,
                model.stiffness_kn_per_cm[i] / GRAVITY,
                model.extra_damping_kn_per_kine[i] / GRAVITY,
                self.damping_ratio,
            ));
        }

        for (i, tmd) in model.tmd_list.iter().enumerate() {
            let mu = model.tmd_mass_ratio(tmd);
            let k_tmd = tmd_spring_stiffness(tmd.weight_kn, tmd.freq_hz);
            let h_opt = optimal_tmd_damping(mu);
            debug!(
                "TMD {} on floor {}: mu={:.5}, h_opt={:.5}",
                i + 1,
                tmd.floor,
                mu,
                h_opt
            );
            elements.push(Element::tmd_spring(
                i,
                main_count + i,
                tmd.floor,
                k_tmd / GRAVITY,
                h_opt,
            ));
        }

        elements
    }

    /// First-mode ω of the bare building, zero when the period is unusable
    fn reference_omega(&self, elements: &[Element]) -> DynamicsResult<f64> {
        let masses: Vec<f64> = self
            .model
            .weights_kn
            .iter()
            .map(|w| w / (GRAVITY * GRAVITY_GAL))
            .collect();
        let stiffness: Vec<f64> = elements
            .iter()
            .filter(|e| e.is_story())
            .map(|e| e.stiffness)
            .collect();

        let modal = ModalSolver::new(&masses, &stiffness)?.solve();
        let t1 = modal.fundamental().map(|m| m.period).unwrap_or(0.0);
        Ok(if t1 > 0.0 && t1.is_finite() {
            2.0 * PI / t1
        } else {
            0.0
        })
    }
}

/// Scatter node masses and element stiffness/damping into global matrices
fn assemble(dofs: &[DegreeOfFreedom], elements: &[Element]) -> GlobalMatrices {
    let n = dofs.len();
    let mut mass = math::zeros_mat(n);
    let mut stiffness = math::zeros_mat(n);
    let mut damping = math::zeros_mat(n);

    for dof in dofs {
        mass[(dof.index, dof.index)] = dof.mass / GRAVITY_GAL;
    }

    for element in elements {
        add_element(&mut stiffness, element.i, element.j, element.stiffness);
        add_element(&mut damping, element.i, element.j, element.damping);
    }

    GlobalMatrices {
        mass,
        stiffness,
        damping,
    }
}

fn add_element(matrix: &mut Mat, i: ElementEnd, j: ElementEnd, value: f64) {
    match (i.dof(), j.dof()) {
        (Some(a), Some(b)) => {
            matrix[(a, a)] += value;
            matrix[(b, b)] += value;
            matrix[(a, b)] -= value;
            matrix[(b, a)] -= value;
        }
        (Some(a), None) | (None, Some(a)) => {
            matrix[(a, a)] += value;
        }
        (None, None) => {}
    }
}
