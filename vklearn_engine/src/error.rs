//! Error types for the vklearn engine
//!
//! Swapchain staleness (out-of-date / suboptimal) is not an error: it is
//! reported through `AcquireOutcome` / `PresentOutcome` and consumed by the
//! resize protocol. Everything in this enum is fatal to the caller.

use std::fmt;

/// Result type for vklearn engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// vklearn engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (unexpected native return code)
    BackendError(String),

    /// Out of host or device memory
    OutOfMemory,

    /// Invalid resource (wrong backend object, index outside a ring, bad mesh data)
    InvalidResource(String),

    /// Initialization failed (instance, device, surface, startup resources)
    InitializationFailed(String),

    /// Configuration file could not be read, parsed or written
    ConfigError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
