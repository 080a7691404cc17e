//! TMD Dynamics - time-history analysis of shear buildings with tuned mass dampers
//!
//! The building is idealised as a chain of lumped story masses joined by
//! shear springs and dashpots, optionally carrying tuned mass dampers on any
//! floor. The library provides:
//! - Modal analysis (periods, mode shapes, participation)
//! - Newmark-β response under ground acceleration or story forces
//! - Batch runs of several models under one excitation
//! - Ground-motion processing: band-passed integration and response spectra
//! - Ramped sine excitation
//!
//! Units follow building practice: kN, cm, s, gal (cm/s²).
//!
//! ## Example
//! ```rust
//! use tmd_dynamics::prelude::*;
//!
//! // Three stories with a 30 kN damper on the roof
//! let model = StructuralModel::default();
//!
//! // Natural periods of the bare building
//! let modal = analyze_modal(&model).unwrap();
//! assert_eq!(modal.modes.len(), 3);
//!
//! // 1 Hz sine, 100 gal peak, five cycles
//! let wave: Vec<f64> = make_sine_wave(&SineWaveInput::new(1.0, 5))
//!     .into_iter()
//!     .map(|v| 100.0 * v)
//!     .collect();
//! let excitation = Excitation::base(wave);
//!
//! let result = analyze_response("ModelA_sine", &model, &excitation, DampingSelection::Auto).unwrap();
//! let peaks = result.peaks();
//! assert!(peaks.max_tmd_dis > 0.0);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod math;
pub mod model;
pub mod results;
pub mod wave;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::batch::{run_batch, ModelSelection};
    pub use crate::analysis::excitation::{force_wave_from_record, zero_wave, Excitation, ForceInput};
    pub use crate::analysis::{
        analyze_modal, analyze_response, analyze_response_with, resolve_damping, DampingSelection,
        NewmarkConfig,
    };
    pub use crate::error::{DynamicsError, DynamicsResult};
    pub use crate::model::{StructuralModel, TmdSetting};
    pub use crate::results::{
        ModalResult, Mode, ResponsePeaks, ResponseResult, SpectrumResult, WaveAnalysisResult,
    };
    pub use crate::wave::{analyze_wave, make_sine_wave, SineWaveInput, WaveOptions};
}

#[cfg(feature = "wasm")]
pub mod wasm;
