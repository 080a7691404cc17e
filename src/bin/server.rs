//! TMD Dynamics HTTP Server

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use tmd_dynamics::prelude::*;

const ADDR_ENV: &str = "TMD_SERVER_ADDR";
const DEFAULT_ADDR: &str = "0.0.0.0:8086";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ModalRequest {
    #[serde(default)]
    model: StructuralModel,
}

#[derive(Debug, Deserialize)]
struct ResponseRequest {
    #[serde(default)]
    model: StructuralModel,
    excitation: Excitation,
    #[serde(default = "default_label")]
    label: String,
    #[serde(default)]
    damping: DampingSelection,
}

#[derive(Debug, Serialize)]
struct ResponseData {
    peaks: ResponsePeaks,
    time: Vec<f64>,
    result: ResponseResult,
}

#[derive(Debug, Deserialize)]
struct BatchRequest {
    selections: Vec<ModelSelection>,
    excitation: Excitation,
    #[serde(default = "default_label")]
    label: String,
}

#[derive(Debug, Deserialize)]
struct WaveRequest {
    record: Vec<f64>,
    #[serde(default)]
    options: WaveOptions,
}

fn default_label() -> String {
    "wave".to_string()
}

fn respond<T: Serialize>(outcome: DynamicsResult<T>) -> (StatusCode, Json<ApiResponse<T>>) {
    match outcome {
        Ok(results) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                error: None,
                results: Some(results),
            }),
        ),
        Err(e) => {
            log::warn!("request failed: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse {
                    success: false,
                    error: Some(e.to_string()),
                    results: None,
                }),
            )
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn modal(Json(request): Json<ModalRequest>) -> impl IntoResponse {
    respond(analyze_modal(&request.model))
}

async fn response(Json(request): Json<ResponseRequest>) -> impl IntoResponse {
    let name = format!("{}_{}", request.model.name, request.label);
    let outcome = analyze_response(&name, &request.model, &request.excitation, request.damping).map(|result| {
        ResponseData {
            peaks: result.peaks(),
            time: result.time(),
            result,
        }
    });
    respond(outcome)
}

async fn response_batch(Json(request): Json<BatchRequest>) -> impl IntoResponse {
    respond(run_batch(&request.selections, &request.excitation, &request.label))
}

async fn wave(Json(request): Json<WaveRequest>) -> impl IntoResponse {
    respond(analyze_wave(&request.record, &request.options))
}

async fn sine(Json(input): Json<SineWaveInput>) -> impl IntoResponse {
    respond::<Vec<f64>>(Ok(make_sine_wave(&input)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let addr: SocketAddr = std::env::var(ADDR_ENV)
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .with_context(|| format!("{} is not a socket address", ADDR_ENV))?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/modal", post(modal))
        .route("/api/v1/response", post(response))
        .route("/api/v1/response/batch", post(response_batch))
        .route("/api/v1/wave", post(wave))
        .route("/api/v1/sine", post(sine))
        .layer(cors);

    println!("TMD Dynamics Server listening on http://{}", addr);
    println!("  Health check:   GET  /health");
    println!("  Modal:          POST /api/v1/modal");
    println!("  Response:       POST /api/v1/response");
    println!("  Batch response: POST /api/v1/response/batch");
    println!("  Wave analysis:  POST /api/v1/wave");
    println!("  Sine wave:      POST /api/v1/sine");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
