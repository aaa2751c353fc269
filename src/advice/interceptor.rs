// src/advice/interceptor.rs
//! Interceptor trait: one unit of cross-cutting behavior

use crate::proxy::invocation::Invocation;
use crate::utils::errors::Result;
use serde_json::Value;

/// A unit of cross-cutting behavior wrapped around a method call.
///
/// An interceptor receives the in-flight invocation and decides how to
/// continue:
///
/// - call `invocation.proceed()` to advance to the next interceptor (or the
///   real method at the end of the chain) and observe its result;
/// - skip `proceed()` entirely to short-circuit the call, making its own
///   return value the call's result (how caching/guard interceptors work);
/// - rewrite arguments via `invocation.args_mut()` before proceeding;
/// - catch and translate a failure coming back from `proceed()`.
pub trait Interceptor: Send + Sync {
    /// Stable interceptor name, used in logs
    fn name(&self) -> &str {
        "interceptor"
    }

    /// Wrap the invocation
    fn invoke(&self, invocation: &mut Invocation<'_>) -> Result<Value>;
}
