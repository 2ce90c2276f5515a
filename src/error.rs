//! Error types for maze generation and solving

use thiserror::Error;

/// Errors that can occur during maze generation or queries
///
/// An unreachable end cell is not an error: the solver reports it as an
/// empty [`Solution`](crate::Solution).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MazeError {
    /// A generation parameter was rejected before any work started
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Generation failed due to geometry issues
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    /// Requested cell ID does not exist
    #[error("cell not found: {0}")]
    CellNotFound(usize),
}

/// Result type alias for maze operations
pub type Result<T> = std::result::Result<T, MazeError>;
