// src/advice/mod.rs
//! Advice chain model
//!
//! An advisor pairs a pointcut (which methods does this apply to?) with an
//! interceptor (what runs around the call?). Advisors are held in
//! registration order, and for any given method the matched interceptors run
//! in that order on the way in and in reverse order on the way out, standard
//! nested-call semantics:
//!
//! ```text
//! caller → I₁ before → I₂ before → target → I₂ after → I₁ after → caller
//! ```
//!
//! Matching is evaluated once per distinct method identity; an empty match
//! is the unadvised fast path and skips chain construction entirely.

pub mod chain;
pub mod interceptor;
pub mod pointcut;

// Re-export commonly used types
pub use chain::{matched_chain, Advisor};
pub use interceptor::Interceptor;
pub use pointcut::{NameMatchPointcut, PatternPointcut, Pointcut, TruePointcut};
