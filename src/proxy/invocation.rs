// src/proxy/invocation.rs
//! Invocation context: one in-flight call through the chain
//!
//! An `Invocation` is created fresh per call and never shared across
//! concurrent calls. `proceed()` drives a simple state machine:
//!
//! ```text
//! position < chain.len()  → invoke chain[position], position += 1
//! position == chain.len() → resolve target, invoke original, release
//! ```
//!
//! The target is resolved as late as possible (only at the terminal step)
//! and the source's `release` runs on both the success and the error path.

use crate::advice::interceptor::Interceptor;
use crate::generation::artifact::{DispatchArtifact, StrategyKind};
use crate::target::object::{MethodDescriptor, ProxyTarget};
use crate::target::source::TargetSource;
use crate::utils::errors::{ProxyError, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// One in-flight method call
pub struct Invocation<'a> {
    method: &'a MethodDescriptor,
    target_type: &'a str,
    args: Vec<Value>,
    chain: &'a [Arc<dyn Interceptor>],
    position: usize,
    target_source: &'a dyn TargetSource,
    artifact: &'a DispatchArtifact,
}

impl<'a> Invocation<'a> {
    /// Seed a new invocation at the start of the chain
    pub(crate) fn new(
        method: &'a MethodDescriptor,
        target_type: &'a str,
        args: Vec<Value>,
        chain: &'a [Arc<dyn Interceptor>],
        target_source: &'a dyn TargetSource,
        artifact: &'a DispatchArtifact,
    ) -> Self {
        Self {
            method,
            target_type,
            args,
            chain,
            position: 0,
            target_source,
            artifact,
        }
    }

    /// Identity of the method being called
    pub fn method(&self) -> &MethodDescriptor {
        self.method
    }

    /// Logical type name of the target
    pub fn target_type(&self) -> &str {
        self.target_type
    }

    /// Current argument values
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Mutable argument values; interceptors may replace them before
    /// proceeding
    pub fn args_mut(&mut self) -> &mut [Value] {
        &mut self.args
    }

    /// Advance to the next interceptor, or invoke the real method at the
    /// end of the chain.
    ///
    /// Each call advances the position exactly once. Interceptors that do
    /// not call this at all short-circuit the rest of the chain and the
    /// target.
    pub fn proceed(&mut self) -> Result<Value> {
        if self.position < self.chain.len() {
            let interceptor = Arc::clone(&self.chain[self.position]);
            self.position += 1;
            trace!(
                "Invoking interceptor {} ({}/{}) for {}.{}",
                interceptor.name(),
                self.position,
                self.chain.len(),
                self.target_type,
                self.method.name
            );
            interceptor.invoke(self)
        } else {
            dispatch_terminal(self.target_source, self.artifact, self.method, &self.args)
        }
    }
}

/// Terminal dispatch: resolve the target, invoke the original
/// implementation, release the instance.
///
/// Also used directly by the proxy handle as the unadvised fast path.
/// Release runs regardless of the invocation's outcome; resolution failures
/// propagate as the call's own failure.
pub(crate) fn dispatch_terminal(
    target_source: &dyn TargetSource,
    artifact: &DispatchArtifact,
    method: &MethodDescriptor,
    args: &[Value],
) -> Result<Value> {
    let instance = target_source.resolve()?;
    let result = invoke_original(artifact, instance.as_ref(), method, args);
    target_source.release(instance);
    result
}

/// Invoke the original implementation without interception.
///
/// Subclass-style dispatch goes through the artifact's fast-accessor index;
/// interface-style dispatch resolves against the live instance's shape per
/// call. Neither path can re-enter a proxy.
fn invoke_original(
    artifact: &DispatchArtifact,
    instance: &dyn ProxyTarget,
    method: &MethodDescriptor,
    args: &[Value],
) -> Result<Value> {
    let accessor = match artifact.strategy() {
        StrategyKind::SubclassBased => artifact.fast_accessor(&method.name),
        StrategyKind::InterfaceBased => instance
            .shape()
            .find(&method.name)
            .map(|entry| entry.accessor),
    }
    .ok_or_else(|| {
        ProxyError::NoSuchMethod(format!(
            "{} on {}",
            method.name,
            instance.shape().type_name
        ))
    })?;

    accessor(instance, args)
}
