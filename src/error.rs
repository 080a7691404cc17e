//! Error types for the dynamics engine

use thiserror::Error;

/// Main error type for model assembly, modal and response analysis
#[derive(Error, Debug)]
pub enum DynamicsError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Singular matrix - largest available pivot is below tolerance")]
    SingularMatrix,

    #[error("Singular model - effective stiffness matrix cannot be inverted")]
    SingularModel,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for dynamics operations
pub type DynamicsResult<T> = Result<T, DynamicsError>;
