//! Error types shared across FiringMap crates.

/// Top-level error type for FiringMap operations.
#[derive(Debug, thiserror::Error)]
pub enum FiringMapError {
    #[error("Invalid dimensions: {width}x{height} (both must be positive)")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Invalid smoothing kernel width: tau={tau}")]
    InvalidKernel { tau: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using FiringMapError.
pub type FiringMapResult<T> = Result<T, FiringMapError>;

impl FiringMapError {
    pub fn invalid_dimensions(width: impl Into<f64>, height: impl Into<f64>) -> Self {
        Self::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        }
    }

    pub fn invalid_kernel(tau: f64) -> Self {
        Self::InvalidKernel { tau }
    }
}
