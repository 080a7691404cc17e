//! Newmark-β time integration of the assembled system
//!
//! The scheme is written in incremental form so that ground motion enters
//! as a pseudo load `-M·1·Δÿ`:
//!
//! ```text
//! K_eff = M + γΔt·C + βΔt²·K
//! K_eff·a₂ = ΔP + M·a₁ − (1−γ)Δt·C·a₁ − K·(Δt·v₁ + (½−β)Δt²·a₁)
//! v₂ = v₁ + Δt·(γ·a₂ + (1−γ)·a₁)
//! d₂ = d₁ + Δt·v₁ + Δt²·(β·a₂ + (½−β)·a₁)
//! ```
//!
//! `K_eff` is inverted once per run.

use log::warn;

use crate::analysis::assembly::StructuralSystem;
use crate::analysis::excitation::Excitation;
use crate::analysis::NewmarkConfig;
use crate::error::{DynamicsError, DynamicsResult};
use crate::math::{self, Mat, Vec as DynVec};
use crate::results::{DofHistory, ResponseResult, TmdHistory};

/// Integration state at one instant
#[derive(Debug, Clone)]
pub struct State {
    /// Relative acceleration
    pub acceleration: DynVec,
    /// Relative velocity
    pub velocity: DynVec,
    /// Relative displacement
    pub displacement: DynVec,
}

impl State {
    pub fn new(ndof: usize) -> Self {
        Self {
            acceleration: math::zeros_vec(ndof),
            velocity: math::zeros_vec(ndof),
            displacement: math::zeros_vec(ndof),
        }
    }
}

/// Time-stepping solver bound to one assembled system
pub struct ResponseIntegrator<'a> {
    system: &'a StructuralSystem,
    config: NewmarkConfig,
    k_eff_inv: Mat,
    /// `M·1`, the inertia load of a unit ground acceleration
    m_influence: DynVec,
}

impl<'a> ResponseIntegrator<'a> {
    /// Form and invert the effective stiffness
    ///
    /// # Errors
    /// `SingularModel` when `K_eff` cannot be inverted.
    pub fn new(system: &'a StructuralSystem, config: NewmarkConfig) -> DynamicsResult<Self> {
        let GlobalParts { m, c, k } = GlobalParts::of(system);
        let dt = config.dt;
        let k_eff = m + c * (config.gamma * dt) + k * (config.beta * dt * dt);
        let k_eff_inv = math::inverse(&k_eff).map_err(|e| match e {
            DynamicsError::SingularMatrix => DynamicsError::SingularModel,
            other => other,
        })?;
        let m_influence = m * math::unit_vec(system.dof_count());

        Ok(Self {
            system,
            config,
            k_eff_inv,
            m_influence,
        })
    }

    /// Advance one step from `prev` under incremental load `load`
    pub fn step(&self, prev: &State, load: &DynVec) -> State {
        let GlobalParts { m, c, k } = GlobalParts::of(self.system);
        let NewmarkConfig { gamma, beta, dt } = self.config;
        let a1 = &prev.acceleration;
        let v1 = &prev.velocity;
        let d1 = &prev.displacement;

        let rhs = load + m * a1
            - c * (a1 * ((1.0 - gamma) * dt))
            - k * (v1 * dt + a1 * ((0.5 - beta) * dt * dt));
        let a2 = &self.k_eff_inv * rhs;
        let v2 = v1 + (&a2 * gamma + a1 * (1.0 - gamma)) * dt;
        let d2 = d1 + (v1 * dt + (&a2 * beta + a1 * (0.5 - beta)) * (dt * dt));

        State {
            acceleration: a2,
            velocity: v2,
            displacement: d2,
        }
    }

    /// Integrate over the whole excitation
    pub fn run(&self, name: &str, model_name: &str, excitation: &Excitation) -> DynamicsResult<ResponseResult> {
        let steps = excitation.step_count()?;
        let ndof = self.system.dof_count();
        let main_count = self.system.main_count;
        let ground = excitation.ground_acceleration(steps);

        if let Excitation::Force { inputs } = excitation {
            for input in inputs.iter().filter(|f| f.floor_index >= main_count) {
                warn!(
                    "force input on floor index {} ignored ({} stories)",
                    input.floor_index, main_count
                );
            }
        }

        let mut main: Vec<DofHistory> = (0..main_count).map(|_| DofHistory::with_capacity(steps)).collect();
        let mut tmd: Vec<TmdHistory> = self
            .system
            .tmd_floors
            .iter()
            .map(|&floor| TmdHistory {
                target_floor: floor,
                history: DofHistory::with_capacity(steps),
            })
            .collect();

        let mut state = State::new(ndof);
        let mut load = math::zeros_vec(ndof);

        for step in 0..steps {
            let y = ground[step];
            let y_prev = if step == 0 { 0.0 } else { ground[step - 1] };
            self.fill_load(&mut load, excitation, step, y - y_prev);

            state = self.step(&state, &load);

            for (i, history) in main.iter_mut().enumerate() {
                history.acceleration.push(state.acceleration[i] + y);
                history.displacement.push(state.displacement[i]);
            }
            for (i, t) in tmd.iter_mut().enumerate() {
                let dof = main_count + i;
                t.history.acceleration.push(state.acceleration[dof] + y);
                t.history.displacement.push(state.displacement[dof]);
            }
        }

        Ok(ResponseResult {
            name: name.to_string(),
            model_name: model_name.to_string(),
            excitation: ground,
            main,
            tmd,
        })
    }

    /// Incremental load vector for `step`
    fn fill_load(&self, load: &mut DynVec, excitation: &Excitation, step: usize, ground_increment: f64) {
        load.copy_from(&(&self.m_influence * -ground_increment));

        if let Excitation::Force { inputs } = excitation {
            for input in inputs.iter().filter(|f| f.floor_index < self.system.main_count) {
                let current = input.series[step];
                let previous = if step == 0 { 0.0 } else { input.series[step - 1] };
                load[input.floor_index] += current - previous;
            }
        }
    }
}

struct GlobalParts<'s> {
    m: &'s Mat,
    c: &'s Mat,
    k: &'s Mat,
}

impl<'s> GlobalParts<'s> {
    fn of(system: &'s StructuralSystem) -> Self {
        Self {
            m: &system.matrices.mass,
            c: &system.matrices.damping,
            k: &system.matrices.stiffness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::assembly::StructuralModelBuilder;
    use crate::analysis::excitation::ForceInput;
    use crate::model::StructuralModel;
    use approx::assert_relative_eq;

    fn single_story() -> StructuralModel {
        // M = 100 / 980.665, K = 10
        StructuralModel::new("S1", vec![980.665], vec![98.0665])
    }

    #[test]
    fn test_zero_excitation_stays_at_rest() {
        let system = StructuralModelBuilder::new(&StructuralModel::default(), 0.0).build().unwrap();
        let integrator = ResponseIntegrator::new(&system, NewmarkConfig::default()).unwrap();
        let result = integrator
            .run("rest", "ModelA", &Excitation::base(vec![0.0; 200]))
            .unwrap();
        for h in result.main.iter().chain(result.tmd.iter().map(|t| &t.history)) {
            assert!(h.acceleration.iter().all(|&v| v == 0.0));
            assert!(h.displacement.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_step_force_reaches_static_deflection() {
        let system = StructuralModelBuilder::new(&single_story(), 0.05).build().unwrap();
        assert_relative_eq!(system.matrices.stiffness[(0, 0)], 10.0, epsilon = 1e-12);
        let integrator = ResponseIntegrator::new(&system, NewmarkConfig::default()).unwrap();
        let excitation = Excitation::force(vec![ForceInput::new(0, vec![5.0; 3000])]);
        let result = integrator.run("step", "S1", &excitation).unwrap();
        let last = *result.main[0].displacement.last().unwrap();
        assert_relative_eq!(last, 0.5, epsilon = 1e-4);
        // Force mode: absolute acceleration equals relative
        assert!(result.excitation.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_undamped_free_vibration_keeps_amplitude() {
        let system = StructuralModelBuilder::new(&single_story(), 0.0).build().unwrap();
        let integrator = ResponseIntegrator::new(&system, NewmarkConfig::default()).unwrap();
        // Pulse then release: constant-average-acceleration adds no numerical damping
        let mut force = vec![0.0; 4000];
        force[0] = 10.0;
        force[1] = 10.0;
        let result = integrator
            .run("free", "S1", &Excitation::force(vec![ForceInput::new(0, force)]))
            .unwrap();
        let d = &result.main[0].displacement;
        let early = d[10..1000].iter().fold(0.0_f64, |a, v| a.max(v.abs()));
        let late = d[3000..].iter().fold(0.0_f64, |a, v| a.max(v.abs()));
        assert_relative_eq!(early, late, max_relative = 5e-3);
    }

    #[test]
    fn test_out_of_range_force_floor_is_ignored() {
        let system = StructuralModelBuilder::new(&single_story(), 0.02).build().unwrap();
        let integrator = ResponseIntegrator::new(&system, NewmarkConfig::default()).unwrap();
        let excitation = Excitation::force(vec![ForceInput::new(4, vec![1.0; 50])]);
        let result = integrator.run("ignored", "S1", &excitation).unwrap();
        assert!(result.main[0].displacement.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_singular_effective_stiffness() {
        let system = StructuralModelBuilder::new(&single_story(), 0.0).build().unwrap();
        let config = NewmarkConfig::default().with_dt(0.0);
        let mut broken = system.clone();
        broken.matrices.mass[(0, 0)] = 0.0;
        assert!(matches!(
            ResponseIntegrator::new(&broken, config),
            Err(DynamicsError::SingularModel)
        ));
    }
}
