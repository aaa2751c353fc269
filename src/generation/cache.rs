// src/generation/cache.rs
//! Generation cache: one artifact per structural shape
//!
//! Keys fingerprint (target shape, proxied interface set, strategy). Lookup
//! follows the double-checked discipline: a cheap unsynchronized read first,
//! then a shard-locked entry that rechecks before invoking the factory, so
//! the factory runs at most once per key under concurrent contention and no
//! partially-constructed artifact is ever visible. Entries are never
//! evicted in-process; a changed shape hashes to a different key.

use crate::generation::artifact::{DispatchArtifact, StrategyKind};
use crate::target::object::{InterfaceDef, TargetShape};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Structural fingerprint identifying a generated artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeKey {
    /// Logical type name
    pub type_name: String,

    /// Hash over the declared method/interface surface
    pub fingerprint: u64,

    /// Generation strategy
    pub strategy: StrategyKind,
}

impl ShapeKey {
    /// Key for a subclass-style artifact over a declared shape
    pub fn for_shape(shape: &TargetShape) -> Self {
        Self {
            type_name: shape.type_name.to_string(),
            fingerprint: shape.fingerprint(),
            strategy: StrategyKind::SubclassBased,
        }
    }

    /// Key for an interface-style artifact over a set of contracts
    pub fn for_interfaces(type_name: &str, interfaces: &[InterfaceDef]) -> Self {
        let mut hasher = DefaultHasher::new();
        for iface in interfaces {
            iface.name.hash(&mut hasher);
            for method in &iface.methods {
                method.hash(&mut hasher);
            }
        }
        Self {
            type_name: type_name.to_string(),
            fingerprint: hasher.finish(),
            strategy: StrategyKind::InterfaceBased,
        }
    }
}

/// Memoizing store of generated dispatch artifacts
pub struct GenerationCache {
    entries: DashMap<ShapeKey, Arc<DispatchArtifact>>,

    /// Hit counter
    hits: AtomicU64,

    /// Miss counter (factory invocations)
    misses: AtomicU64,
}

static GLOBAL_CACHE: Lazy<Arc<GenerationCache>> = Lazy::new(|| Arc::new(GenerationCache::new()));

impl GenerationCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The process-wide cache used by `ProxyFactory::default()`
    pub fn global() -> Arc<GenerationCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// Fetch the artifact for `key`, generating it at most once.
    ///
    /// Concurrent callers with the same key all observe the same artifact;
    /// exactly one of them runs the factory.
    pub fn get_or_create<F>(&self, key: ShapeKey, factory: F) -> Arc<DispatchArtifact>
    where
        F: FnOnce() -> DispatchArtifact,
    {
        // Fast path: unsynchronized read
        if let Some(existing) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(existing.value());
        }

        // Slow path: lock the shard and recheck before generating
        match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Arc::clone(occupied.get())
            }
            Entry::Vacant(vacant) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Generation cache miss for {:?}", vacant.key());
                let artifact = Arc::new(factory());
                vacant.insert(Arc::clone(&artifact));
                artifact
            }
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for GenerationCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Distinct shapes generated
    pub entries: usize,

    /// Lookups served from an existing artifact
    pub hits: u64,

    /// Lookups that invoked the factory
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::object::{InterfaceDef, ReturnKind};
    use std::sync::atomic::AtomicUsize;

    fn test_interfaces() -> Vec<InterfaceDef> {
        vec![InterfaceDef::new("Svc").method("ping", 0, ReturnKind::Nullable)]
    }

    #[test]
    fn test_hit_reuses_artifact() {
        let cache = GenerationCache::new();
        let interfaces = test_interfaces();
        let key = ShapeKey::for_interfaces("Svc", &interfaces);

        let a = cache.get_or_create(key.clone(), || {
            DispatchArtifact::interface("Svc", &interfaces)
        });
        let b = cache.get_or_create(key, || DispatchArtifact::interface("Svc", &interfaces));

        assert!(Arc::ptr_eq(&a, &b));

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_distinct_keys_generate_separately() {
        let cache = GenerationCache::new();
        let a_ifaces = test_interfaces();
        let b_ifaces =
            vec![InterfaceDef::new("Other").method("pong", 0, ReturnKind::Nullable)];

        cache.get_or_create(ShapeKey::for_interfaces("Svc", &a_ifaces), || {
            DispatchArtifact::interface("Svc", &a_ifaces)
        });
        cache.get_or_create(ShapeKey::for_interfaces("Other", &b_ifaces), || {
            DispatchArtifact::interface("Other", &b_ifaces)
        });

        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn test_concurrent_single_factory_invocation() {
        use std::thread;

        let cache = Arc::new(GenerationCache::new());
        let invocations = Arc::new(AtomicUsize::new(0));
        let interfaces = Arc::new(test_interfaces());

        let mut handles = vec![];
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            let invocations = Arc::clone(&invocations);
            let interfaces = Arc::clone(&interfaces);

            handles.push(thread::spawn(move || {
                let key = ShapeKey::for_interfaces("Svc", &interfaces);
                cache.get_or_create(key, || {
                    invocations.fetch_add(1, Ordering::SeqCst);
                    DispatchArtifact::interface("Svc", &interfaces)
                })
            }));
        }

        let artifacts: Vec<Arc<DispatchArtifact>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one generation; every thread observes the same artifact
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
        for artifact in &artifacts[1..] {
            assert!(Arc::ptr_eq(&artifacts[0], artifact));
        }
    }
}
