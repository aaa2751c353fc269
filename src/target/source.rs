// src/target/source.rs
//! Target sources: instance lifecycle behind a proxy
//!
//! A `TargetSource` is the sole authority on the real instance's lifetime.
//! Two lifecycle modes exist:
//!
//! - **Static**: one instance for the proxy's lifetime (`StaticTargetSource`)
//! - **Dynamic**: an instance is fetched per invocation and released
//!   afterward (`PoolingTargetSource`)
//!
//! The proxy never caches an instance across calls when the source is
//! dynamic; resolution happens at the terminal step of the chain, as late as
//! possible, and release is guaranteed on both success and failure paths.

use crate::target::object::{ProxyTarget, TargetShape};
use crate::utils::errors::{ProxyError, Result};
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Supplies and reclaims the real instance behind a proxy
pub trait TargetSource: Send + Sync {
    /// Resolve an instance for one invocation.
    ///
    /// Must not be called speculatively; the invocation context calls it
    /// only at the terminal step. May fail (e.g. pool exhaustion); such a
    /// failure propagates as the call's own failure.
    fn resolve(&self) -> Result<Arc<dyn ProxyTarget>>;

    /// Return an instance after the invocation completes.
    ///
    /// No-op for static sources.
    fn release(&self, instance: Arc<dyn ProxyTarget>);

    /// Whether the same instance is used for the proxy's whole lifetime
    fn is_static(&self) -> bool;

    /// Whether this is the degenerate "no target yet" value
    fn is_empty(&self) -> bool {
        false
    }

    /// Declared shape of the supplied instances, if any
    fn shape(&self) -> Option<&'static TargetShape>;

    /// Logical type name of the supplied instances ("" when empty)
    fn target_type(&self) -> &str {
        self.shape().map(|s| s.type_name).unwrap_or("")
    }
}

/// Static source: a single instance for the proxy's lifetime
pub struct StaticTargetSource {
    instance: Arc<dyn ProxyTarget>,
    shape: &'static TargetShape,
}

impl StaticTargetSource {
    /// Wrap a fixed instance
    pub fn new(instance: Arc<dyn ProxyTarget>) -> Self {
        let shape = instance.shape();
        Self { instance, shape }
    }
}

impl TargetSource for StaticTargetSource {
    fn resolve(&self) -> Result<Arc<dyn ProxyTarget>> {
        Ok(Arc::clone(&self.instance))
    }

    fn release(&self, _instance: Arc<dyn ProxyTarget>) {
        // Static instances are owned for the proxy's lifetime
    }

    fn is_static(&self) -> bool {
        true
    }

    fn shape(&self) -> Option<&'static TargetShape> {
        Some(self.shape)
    }
}

/// Degenerate "no target yet" source.
///
/// A proxy over an empty source is only constructible when advisors are
/// present; resolution always fails, so a chain that reaches the terminal
/// step surfaces a resolution error.
#[derive(Default)]
pub struct EmptyTargetSource;

impl EmptyTargetSource {
    /// Create the empty source
    pub fn new() -> Self {
        Self
    }
}

impl TargetSource for EmptyTargetSource {
    fn resolve(&self) -> Result<Arc<dyn ProxyTarget>> {
        Err(ProxyError::Resolution(
            "empty target source has no instance".to_string(),
        ))
    }

    fn release(&self, _instance: Arc<dyn ProxyTarget>) {}

    fn is_static(&self) -> bool {
        true
    }

    fn is_empty(&self) -> bool {
        true
    }

    fn shape(&self) -> Option<&'static TargetShape> {
        None
    }
}

/// Dynamic pooling source.
///
/// Maintains a small bounded pool of instances and hands one out per
/// invocation. `resolve`/`release` are independently thread-safe; multiple
/// concurrent calls each hold a distinct instance.
pub struct PoolingTargetSource {
    /// Idle instances
    pool: ArrayQueue<Arc<dyn ProxyTarget>>,

    /// Shape shared by all pooled instances
    shape: &'static TargetShape,

    /// Resolve counter
    resolve_count: AtomicU64,

    /// Release counter
    release_count: AtomicU64,

    /// Exhaustion counter (resolve found the pool empty)
    exhausted_count: AtomicU64,
}

impl PoolingTargetSource {
    /// Create a pool of `capacity` instances produced by `factory`
    pub fn new<F>(capacity: usize, factory: F) -> Result<Self>
    where
        F: Fn() -> Arc<dyn ProxyTarget>,
    {
        if capacity == 0 {
            return Err(ProxyError::Configuration(
                "pooling target source requires capacity > 0".to_string(),
            ));
        }

        let pool = ArrayQueue::new(capacity);
        let first = factory();
        let shape = first.shape();

        let mut pending = Some(first);
        for _ in 0..capacity {
            let instance = pending.take().unwrap_or_else(&factory);
            if pool.push(instance).is_err() {
                return Err(ProxyError::Configuration(
                    "pool over-filled during initialization".to_string(),
                ));
            }
        }

        debug!(
            "Initialized target pool for {} with {} instance(s)",
            shape.type_name, capacity
        );

        Ok(Self {
            pool,
            shape,
            resolve_count: AtomicU64::new(0),
            release_count: AtomicU64::new(0),
            exhausted_count: AtomicU64::new(0),
        })
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle: self.pool.len(),
            capacity: self.pool.capacity(),
            resolve_count: self.resolve_count.load(Ordering::Relaxed),
            release_count: self.release_count.load(Ordering::Relaxed),
            exhausted_count: self.exhausted_count.load(Ordering::Relaxed),
        }
    }
}

impl TargetSource for PoolingTargetSource {
    fn resolve(&self) -> Result<Arc<dyn ProxyTarget>> {
        match self.pool.pop() {
            Some(instance) => {
                self.resolve_count.fetch_add(1, Ordering::Relaxed);
                Ok(instance)
            }
            None => {
                self.exhausted_count.fetch_add(1, Ordering::Relaxed);
                warn!("Target pool for {} exhausted", self.shape.type_name);
                Err(ProxyError::Resolution(format!(
                    "target pool for {} exhausted",
                    self.shape.type_name
                )))
            }
        }
    }

    fn release(&self, instance: Arc<dyn ProxyTarget>) {
        self.release_count.fetch_add(1, Ordering::Relaxed);
        if self.pool.push(instance).is_err() {
            // More releases than the pool can hold; drop the surplus
            warn!("Target pool for {} over-released", self.shape.type_name);
        }
    }

    fn is_static(&self) -> bool {
        false
    }

    fn shape(&self) -> Option<&'static TargetShape> {
        Some(self.shape)
    }
}

/// Pool statistics
#[derive(Debug, Clone)]
pub struct PoolStats {
    /// Instances currently idle in the pool
    pub idle: usize,

    /// Pool capacity
    pub capacity: usize,

    /// Total successful resolves
    pub resolve_count: u64,

    /// Total releases
    pub release_count: u64,

    /// Total resolve attempts that found the pool empty
    pub exhausted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::object::{ReturnKind, TargetShape};
    use once_cell::sync::Lazy;
    use serde_json::{json, Value};
    use std::any::Any;

    struct Counter;

    static COUNTER_SHAPE: Lazy<TargetShape> = Lazy::new(|| {
        TargetShape::builder("Counter")
            .method("zero", 0, ReturnKind::Required, zero_accessor)
            .build()
    });

    fn zero_accessor(_target: &dyn ProxyTarget, _args: &[Value]) -> Result<Value> {
        Ok(json!(0))
    }

    impl ProxyTarget for Counter {
        fn shape(&self) -> &'static TargetShape {
            &COUNTER_SHAPE
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_static_source_same_instance() {
        let instance: Arc<dyn ProxyTarget> = Arc::new(Counter);
        let source = StaticTargetSource::new(Arc::clone(&instance));

        let a = source.resolve().unwrap();
        let b = source.resolve().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(source.is_static());
        assert_eq!(source.target_type(), "Counter");
    }

    #[test]
    fn test_empty_source_fails_resolution() {
        let source = EmptyTargetSource::new();
        assert!(source.is_empty());
        assert!(matches!(
            source.resolve(),
            Err(ProxyError::Resolution(_))
        ));
    }

    #[test]
    fn test_pool_resolve_release() {
        let source = PoolingTargetSource::new(2, || Arc::new(Counter) as Arc<dyn ProxyTarget>)
            .unwrap();

        let a = source.resolve().unwrap();
        let b = source.resolve().unwrap();

        // Pool drained
        assert!(matches!(source.resolve(), Err(ProxyError::Resolution(_))));

        source.release(a);
        source.release(b);

        let stats = source.stats();
        assert_eq!(stats.resolve_count, 2);
        assert_eq!(stats.release_count, 2);
        assert_eq!(stats.exhausted_count, 1);
        assert_eq!(stats.idle, 2);
    }

    #[test]
    fn test_pool_concurrent_resolve() {
        use std::thread;

        let source = Arc::new(
            PoolingTargetSource::new(8, || Arc::new(Counter) as Arc<dyn ProxyTarget>).unwrap(),
        );

        let mut handles = vec![];
        for _ in 0..8 {
            let src = Arc::clone(&source);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    if let Ok(instance) = src.resolve() {
                        src.release(instance);
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = source.stats();
        assert_eq!(stats.resolve_count, stats.release_count);
        assert_eq!(stats.idle, 8);
    }

    #[test]
    fn test_pool_zero_capacity_rejected() {
        let result = PoolingTargetSource::new(0, || Arc::new(Counter) as Arc<dyn ProxyTarget>);
        assert!(matches!(result, Err(ProxyError::Configuration(_))));
    }
}
