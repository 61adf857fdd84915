//! Engine error types.
//!
//! Configuration problems fail fast before any generation runs; runtime
//! errors abort the generational loop but the driver still hands back the
//! best individual found so far.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors produced by the timetabling engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid or inconsistent input data, detected before the search starts.
    #[error("invalid problem configuration: {0}")]
    Configuration(String),

    /// An internal invariant was violated during the generational loop.
    #[error("runtime error at generation {generation}: {message}")]
    Runtime {
        /// Generation counter when the error was raised.
        generation: usize,
        /// What went wrong.
        message: String,
    },
}

impl From<Vec<ValidationError>> for EngineError {
    fn from(errors: Vec<ValidationError>) -> Self {
        let joined = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        EngineError::Configuration(joined)
    }
}
