//! Error types for hyperfem operations.

use thiserror::Error;

/// Result type alias using hyperfem Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur before an assembly call starts processing elements.
///
/// Numerical faults inside the element loop (inverted elements, singular
/// deformation gradients, incompressible Poisson ratios) are not reported
/// here; they show up as non-finite values in the output.
#[derive(Error, Debug)]
pub enum Error {
    /// Material model name outside the supported set.
    #[error("unknown material model: {0}")]
    UnknownMaterial(String),

    /// Parameter vector length does not match the material model.
    #[error("material model {model} expects {expected} parameters, got {got}")]
    ParameterCount {
        model: String,
        expected: usize,
        got: usize,
    },

    /// Spatial dimension other than 2 or 3.
    #[error("invalid spatial dimension {0}, expected 2 or 3")]
    InvalidDimension(usize),

    /// Connectivity errors.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Inconsistent input arrays.
    #[error("input error: {0}")]
    Input(String),

    /// Invalid material properties.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Assembly errors.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// Worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
