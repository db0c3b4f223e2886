//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building test fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Malformed ASCII fixture
    #[error("fixture parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] plaque_core::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
