//! WASM bindings for TMD Dynamics
//!
//! JSON-string entry points mirroring the HTTP API, so the engine can run in
//! a Web Worker without a server round trip.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::prelude::*;

// Use wee_alloc for smaller WASM binary
#[cfg(feature = "wasm")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

// ========================
// Request / Response Envelopes
// ========================

#[derive(Debug, Deserialize)]
pub struct ModalRequest {
    #[serde(default)]
    pub model: StructuralModel,
}

#[derive(Debug, Deserialize)]
pub struct ResponseRequest {
    #[serde(default)]
    pub model: StructuralModel,
    pub excitation: Excitation,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub damping: DampingSelection,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub selections: Vec<ModelSelection>,
    pub excitation: Excitation,
    #[serde(default = "default_label")]
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct WaveRequest {
    pub record: Vec<f64>,
    #[serde(default)]
    pub options: WaveOptions,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub error: Option<String>,
    pub results: Option<T>,
    pub ms_elapsed: Option<u64>,
}

fn default_label() -> String {
    "wave".to_string()
}

/// Parse `request_json`, run `f`, and serialize the envelope
fn handle<R, T, F>(request_json: &str, f: F) -> String
where
    R: for<'de> Deserialize<'de>,
    T: Serialize,
    F: FnOnce(R) -> DynamicsResult<T>,
{
    let start = js_sys::Date::now();
    let outcome = serde_json::from_str::<R>(request_json)
        .map_err(DynamicsError::from)
        .and_then(f);

    let elapsed = Some((js_sys::Date::now() - start) as u64);
    let response = match outcome {
        Ok(results) => ApiResponse {
            success: true,
            error: None,
            results: Some(results),
            ms_elapsed: elapsed,
        },
        Err(e) => {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
            ApiResponse {
                success: false,
                error: Some(e.to_string()),
                results: None,
                ms_elapsed: elapsed,
            }
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(r#"{{"success":false,"error":"Serialization failed: {}"}}"#, e)
    })
}

// ========================
// WASM Entry Points
// ========================

/// Modal analysis of `{ "model": ... }`
#[wasm_bindgen]
pub fn modal(request_json: &str) -> String {
    handle(request_json, |request: ModalRequest| analyze_modal(&request.model))
}

/// Time-history response of one model
#[wasm_bindgen]
pub fn response(request_json: &str) -> String {
    handle(request_json, |request: ResponseRequest| {
        let name = format!("{}_{}", request.model.name, request.label);
        analyze_response(&name, &request.model, &request.excitation, request.damping)
    })
}

/// Time-history response of several models, in selection order
#[wasm_bindgen]
pub fn response_batch(request_json: &str) -> String {
    handle(request_json, |request: BatchRequest| {
        run_batch(&request.selections, &request.excitation, &request.label)
    })
}

/// Integration and response spectra of a record
#[wasm_bindgen]
pub fn wave(request_json: &str) -> String {
    handle(request_json, |request: WaveRequest| analyze_wave(&request.record, &request.options))
}

/// Ramped sine wave samples
#[wasm_bindgen]
pub fn sine(input_json: &str) -> String {
    handle(input_json, |input: SineWaveInput| Ok(make_sine_wave(&input)))
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
