//! Several models under one excitation
//!
//! Models are independent, so they run on the rayon pool. Results come back
//! in selection order regardless of which model finishes first.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::excitation::Excitation;
use crate::analysis::{analyze_response, DampingSelection};
use crate::error::DynamicsResult;
use crate::model::StructuralModel;
use crate::results::ResponseResult;

/// One entry of a batch request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub model: StructuralModel,
    /// Position in the output; ties keep input order
    #[serde(default)]
    pub index_order: usize,
    /// Unselected entries are skipped
    #[serde(default = "default_selected")]
    pub selected: bool,
    #[serde(default)]
    pub damping: DampingSelection,
}

fn default_selected() -> bool {
    true
}

impl ModelSelection {
    pub fn new(model: StructuralModel, index_order: usize) -> Self {
        Self {
            model,
            index_order,
            selected: true,
            damping: DampingSelection::default(),
        }
    }

    pub fn with_damping(mut self, damping: DampingSelection) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// `{model}_{label}`
pub fn result_name(model_name: &str, label: &str) -> String {
    format!("{}_{}", model_name, label)
}

/// Selected entries sorted by `index_order`
pub fn ordered_selection(selections: &[ModelSelection]) -> Vec<&ModelSelection> {
    let mut chosen: Vec<&ModelSelection> = selections.iter().filter(|s| s.selected).collect();
    chosen.sort_by_key(|s| s.index_order);
    chosen
}

/// Run every selected model against `excitation`
///
/// The first failing model aborts the batch with its error.
pub fn run_batch(
    selections: &[ModelSelection],
    excitation: &Excitation,
    label: &str,
) -> DynamicsResult<Vec<ResponseResult>> {
    let chosen = ordered_selection(selections);
    info!("batch '{}': {} of {} models selected", label, chosen.len(), selections.len());

    chosen
        .into_par_iter()
        .map(|selection| {
            let name = result_name(&selection.model.name, label);
            analyze_response(&name, &selection.model, excitation, selection.damping)
        })
        .collect()
}
