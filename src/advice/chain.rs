// src/advice/chain.rs
//! Advisor registration and per-method chain matching

use crate::advice::interceptor::Interceptor;
use crate::advice::pointcut::Pointcut;
use crate::target::object::MethodDescriptor;
use std::sync::Arc;
use tracing::trace;

/// An ordered (pointcut, interceptor) pair.
///
/// Registration order is significant: it defines call order for every
/// method the pointcut matches.
#[derive(Clone)]
pub struct Advisor {
    pointcut: Arc<dyn Pointcut>,
    interceptor: Arc<dyn Interceptor>,
}

impl Advisor {
    /// Pair a pointcut with an interceptor
    pub fn new(pointcut: Arc<dyn Pointcut>, interceptor: Arc<dyn Interceptor>) -> Self {
        Self {
            pointcut,
            interceptor,
        }
    }

    /// The advisor's pointcut
    pub fn pointcut(&self) -> &Arc<dyn Pointcut> {
        &self.pointcut
    }

    /// The advisor's interceptor
    pub fn interceptor(&self) -> &Arc<dyn Interceptor> {
        &self.interceptor
    }

    /// Identity comparison: same pointcut and interceptor instances
    pub fn same_identity(&self, other: &Advisor) -> bool {
        Arc::ptr_eq(&self.pointcut, &other.pointcut)
            && Arc::ptr_eq(&self.interceptor, &other.interceptor)
    }
}

/// Resolve the ordered interceptor sub-list applying to one method.
///
/// Evaluated once per distinct method identity per configuration epoch; the
/// proxy caches the result. An empty return is the unadvised fast path.
pub fn matched_chain(
    advisors: &[Advisor],
    target_type: &str,
    method: &MethodDescriptor,
) -> Vec<Arc<dyn Interceptor>> {
    let chain: Vec<Arc<dyn Interceptor>> = advisors
        .iter()
        .filter(|advisor| advisor.pointcut.matches(target_type, method))
        .map(|advisor| Arc::clone(&advisor.interceptor))
        .collect();

    trace!(
        "Matched {}/{} advisor(s) for {}.{}",
        chain.len(),
        advisors.len(),
        target_type,
        method.name
    );

    chain
}
