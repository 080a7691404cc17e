//! Analysis pipeline: modal solution, matrix assembly and time integration

pub mod assembly;
pub mod batch;
pub mod excitation;
pub mod modal;
pub mod newmark;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::DynamicsResult;
use crate::model::StructuralModel;
use crate::results::{ModalResult, ResponseResult};

use self::assembly::StructuralModelBuilder;
use self::excitation::Excitation;
use self::modal::ModalSolver;
use self::newmark::ResponseIntegrator;

/// Physical and numerical constants shared by the engine
pub mod constants {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.80665;
    /// Gravitational acceleration (gal)
    pub const GRAVITY_GAL: f64 = 980.665;
    /// Fixed sampling interval of every series (s)
    pub const DT: f64 = 0.01;
    /// Sampling rate matching `DT` (Hz)
    pub const SAMPLING_HZ: f64 = 100.0;
    /// Newmark γ (average acceleration)
    pub const GAMMA: f64 = 0.5;
    /// Newmark β (average acceleration)
    pub const BETA: f64 = 0.25;
    /// Auto damping ratio is `min(f1 / AUTO_DAMPING_DIVISOR, AUTO_DAMPING_CAP)`
    pub const AUTO_DAMPING_DIVISOR: f64 = 150.0;
    pub const AUTO_DAMPING_CAP: f64 = 0.04;
    /// Largest supported story count
    pub const MAX_STORIES: usize = 9;
    /// Response spectrum grid
    pub const SPECTRUM_POINTS: usize = 201;
    pub const SPECTRUM_PERIOD_MIN: f64 = 0.02;
    pub const SPECTRUM_PERIOD_MAX: f64 = 10.0;
}

use constants::{AUTO_DAMPING_CAP, AUTO_DAMPING_DIVISOR, BETA, DT, GAMMA, GRAVITY};

/// Newmark time integration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewmarkConfig {
    /// Newmark γ parameter (controls velocity)
    pub gamma: f64,
    /// Newmark β parameter (controls acceleration)
    pub beta: f64,
    /// Time step (s)
    pub dt: f64,
}

impl NewmarkConfig {
    /// Constant average acceleration, unconditionally stable
    pub fn average_acceleration() -> Self {
        Self {
            gamma: GAMMA,
            beta: BETA,
            dt: DT,
        }
    }

    /// Override the time step
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }
}

impl Default for NewmarkConfig {
    fn default() -> Self {
        Self::average_acceleration()
    }
}

/// How the structural damping ratio of a run is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum DampingSelection {
    /// Use this ratio verbatim
    Explicit(f64),
    /// Percentage of critical; zero or negative falls back to auto
    Percent(f64),
    /// `min(f1/150, 0.04)` from the model's fundamental frequency
    Auto,
}

impl Default for DampingSelection {
    fn default() -> Self {
        Self::Auto
    }
}

impl DampingSelection {
    /// Selector value understood by [`resolve_damping`]: ratio, or negative for auto
    pub fn selector(&self) -> f64 {
        match *self {
            DampingSelection::Explicit(h) => h,
            DampingSelection::Percent(p) if p > 0.0 => p / 100.0,
            DampingSelection::Percent(_) | DampingSelection::Auto => -1.0,
        }
    }
}

/// Resolve a damping selector against a normalized model
///
/// Non-negative selectors are returned unchanged. Negative selectors mean
/// "auto": the fundamental frequency of the bare building (mass `w/g`,
/// stiffness `k·100`) gives `h = min(f1/150, 0.04)`.
pub fn resolve_damping(model: &StructuralModel, requested: f64) -> DynamicsResult<f64> {
    if requested >= 0.0 {
        return Ok(requested);
    }
    let modal = building_modal_solver(model)?.solve();
    let f1 = modal.fundamental().map(|m| m.frequency).unwrap_or(0.0);
    let h = (f1 / AUTO_DAMPING_DIVISOR).min(AUTO_DAMPING_CAP);
    debug!("model '{}': auto damping f1={:.4} Hz -> h={:.5}", model.name, f1, h);
    Ok(h)
}

fn building_modal_solver(model: &StructuralModel) -> DynamicsResult<ModalSolver> {
    let masses: Vec<f64> = model.weights_kn.iter().map(|w| w / GRAVITY).collect();
    let stiffness: Vec<f64> = model.stiffness_kn_per_cm.iter().map(|k| k * 100.0).collect();
    ModalSolver::new(&masses, &stiffness)
}

/// Eigen analysis of the bare building (TMDs are not part of it)
pub fn analyze_modal(model: &StructuralModel) -> DynamicsResult<ModalResult> {
    let model = model.normalized();
    model.validate()?;
    let result = building_modal_solver(&model)?.solve();
    info!(
        "modal analysis of '{}': {} modes, T1={:.4} s",
        model.name,
        result.modes.len(),
        result.fundamental().map(|m| m.period).unwrap_or(0.0)
    );
    Ok(result)
}

/// Full time-history run: normalize, resolve damping, assemble, integrate
pub fn analyze_response(
    name: &str,
    model: &StructuralModel,
    excitation: &Excitation,
    damping: DampingSelection,
) -> DynamicsResult<ResponseResult> {
    analyze_response_with(name, model, excitation, damping.selector(), NewmarkConfig::default())
}

/// Same as [`analyze_response`] with a raw damping selector and explicit integration parameters
pub fn analyze_response_with(
    name: &str,
    model: &StructuralModel,
    excitation: &Excitation,
    damping_selector: f64,
    config: NewmarkConfig,
) -> DynamicsResult<ResponseResult> {
    let model = model.normalized();
    model.validate()?;
    let damping = resolve_damping(&model, damping_selector)?;
    let system = StructuralModelBuilder::new(&model, damping).build()?;
    let integrator = ResponseIntegrator::new(&system, config)?;
    let result = integrator.run(name, &model.name, excitation)?;
    info!(
        "response '{}' of '{}': {} steps, {} DOFs, h={:.4}",
        name,
        model.name,
        result.excitation.len(),
        system.dof_count(),
        damping
    );
    Ok(result)
}
