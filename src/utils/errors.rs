// src/utils/errors.rs
//! Engine-wide error taxonomy
//!
//! Errors fall into four groups with different reporting points:
//!
//! - **Configuration errors** (empty config, frozen mutation, opaque
//!   introspection) surface synchronously at the point of misuse.
//! - **Resolution errors** (target source cannot supply an instance)
//!   surface as the failure of the call that needed the instance.
//! - **Target failures** are the real method's own errors; they are carried
//!   transparently and never rewrapped by the chain machinery.
//! - **Contract violations** (a required result position receiving null)
//!   are distinct from a legitimate nullable null.

use thiserror::Error;

/// Result type used throughout the engine
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Errors produced by the proxying engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Invalid proxy configuration, reported at construction/mutation time
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Mutation attempted on a frozen configuration
    #[error("proxy configuration is frozen")]
    Frozen,

    /// Introspection attempted on an opaque proxy
    #[error("proxy is opaque: configuration is not exposed")]
    Opaque,

    /// Target source failed to supply an instance
    #[error("target resolution failed: {0}")]
    Resolution(String),

    /// Method is not part of the proxy's exposed surface
    #[error("no such method: {0}")]
    NoSuchMethod(String),

    /// Call arity does not match the method's declared parameter shape
    #[error("method {method} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// A method with a required result produced null
    #[error("method {0} declares a required result but produced null")]
    NullResult(String),

    /// The target's own failure, propagated untouched
    #[error(transparent)]
    Target(#[from] TargetError),
}

/// A failure raised by the real target method.
///
/// The chain machinery carries this value through unchanged so the caller
/// sees exactly what the target produced. Interceptors may catch and
/// translate it; the engine itself never does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TargetError {
    /// Failure message as produced by the target
    pub message: String,
}

impl TargetError {
    /// Create a new target failure
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
