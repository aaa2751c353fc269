// src/proxy/handle.rs
//! Proxy handle and factory
//!
//! `ProxyFactory::create` turns a `ProxyConfig` into a `ProxyHandle`:
//! it validates the configuration, selects the generation strategy once
//! (interface-based when the contract is fully interface-expressible,
//! subclass-based otherwise), and fetches the dispatch artifact from the
//! generation cache.
//!
//! A handle presents the configured capability surface through `call()`,
//! routing every qualifying invocation through the matched interceptor
//! chain. Identity (equality/hash) follows configuration identity — same
//! target source, same advisor set — not instance identity, unless the
//! target declares its own `equals`/`hash_code` methods, which then take
//! precedence and dispatch through the normal chain.

use crate::advice::chain::{matched_chain, Advisor};
use crate::advice::interceptor::Interceptor;
use crate::generation::artifact::{DispatchArtifact, StrategyKind};
use crate::generation::cache::{GenerationCache, ShapeKey};
use crate::proxy::config::ProxyConfig;
use crate::proxy::exposure::ExposedProxyGuard;
use crate::proxy::invocation::{dispatch_terminal, Invocation};
use crate::target::object::{MethodDescriptor, ReturnKind};
use crate::target::source::TargetSource;
use crate::utils::errors::{ProxyError, Result};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-method chain cache entry, tagged with the advisor epoch it was
/// computed under
struct ChainEntry {
    epoch: u64,
    chain: Arc<[Arc<dyn Interceptor>]>,
}

struct ProxyInner {
    /// Live configuration; read-mostly after creation
    config: RwLock<ProxyConfig>,

    /// Target source, pinned at creation
    target_source: Arc<dyn TargetSource>,

    /// Shared per-shape dispatch artifact
    artifact: Arc<DispatchArtifact>,

    /// Bumped on every advisor mutation; stale chain entries are recomputed
    epoch: AtomicU64,

    /// Matched chains per method name
    chain_cache: RwLock<HashMap<String, ChainEntry>>,
}

/// A live proxy over a target
#[derive(Clone)]
pub struct ProxyHandle {
    inner: Arc<ProxyInner>,
}

impl ProxyHandle {
    /// Invoke a method on the proxy's exposed surface.
    ///
    /// The call routes through every matching interceptor in registration
    /// order before reaching the real implementation. Undeclared
    /// `equals`/`hash_code` calls are answered from configuration identity;
    /// any other undeclared method fails with `NoSuchMethod`.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        let descriptor = match self.inner.artifact.lookup(method) {
            Some(descriptor) => descriptor.clone(),
            None => return self.intrinsic_call(method, &args),
        };

        if args.len() != descriptor.arity {
            return Err(ProxyError::ArityMismatch {
                method: descriptor.name,
                expected: descriptor.arity,
                actual: args.len(),
            });
        }

        let expose = self.inner.config.read().expose_proxy();
        let chain = self.chain_for(&descriptor);

        let _exposed = expose.then(|| ExposedProxyGuard::enter(self.clone()));

        let result = if chain.is_empty() {
            // Unadvised fast path: no invocation context, direct terminal call
            dispatch_terminal(
                self.inner.target_source.as_ref(),
                &self.inner.artifact,
                &descriptor,
                &args,
            )?
        } else {
            let mut invocation = Invocation::new(
                &descriptor,
                self.inner.artifact.type_name(),
                args,
                &chain,
                self.inner.target_source.as_ref(),
                &self.inner.artifact,
            );
            invocation.proceed()?
        };

        if descriptor.returns == ReturnKind::Required && result.is_null() {
            return Err(ProxyError::NullResult(descriptor.name));
        }

        Ok(result)
    }

    /// Resolve (and cache) the interceptor chain for one method
    fn chain_for(&self, method: &MethodDescriptor) -> Arc<[Arc<dyn Interceptor>]> {
        let epoch = self.inner.epoch.load(Ordering::Acquire);

        if let Some(entry) = self.inner.chain_cache.read().get(&method.name) {
            if entry.epoch == epoch {
                return Arc::clone(&entry.chain);
            }
        }

        let chain: Arc<[Arc<dyn Interceptor>]> = {
            let config = self.inner.config.read();
            matched_chain(config.advisors(), self.inner.artifact.type_name(), method).into()
        };

        self.inner.chain_cache.write().insert(
            method.name.clone(),
            ChainEntry {
                epoch,
                chain: Arc::clone(&chain),
            },
        );

        chain
    }

    /// Answer undeclared `equals`/`hash_code` from configuration identity
    fn intrinsic_call(&self, method: &str, args: &[Value]) -> Result<Value> {
        match method {
            "equals" => {
                if args.len() != 1 {
                    return Err(ProxyError::ArityMismatch {
                        method: "equals".to_string(),
                        expected: 1,
                        actual: args.len(),
                    });
                }
                Ok(json!(args[0].as_u64() == Some(self.identity())))
            }
            "hash_code" => Ok(json!(self.identity())),
            other => Err(ProxyError::NoSuchMethod(other.to_string())),
        }
    }

    /// Configuration identity token: hash over the target source and the
    /// registered advisor instances
    pub fn identity(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        (Arc::as_ptr(&self.inner.target_source) as *const () as usize).hash(&mut hasher);

        let advisors = self.inner.config.read().advisors().to_vec();
        for advisor in &advisors {
            (Arc::as_ptr(advisor.pointcut()) as *const () as usize).hash(&mut hasher);
            (Arc::as_ptr(advisor.interceptor()) as *const () as usize).hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Generation strategy selected for this proxy
    pub fn strategy(&self) -> StrategyKind {
        self.inner.artifact.strategy()
    }

    /// Logical type name of the proxied surface
    pub fn target_type(&self) -> &str {
        self.inner.artifact.type_name()
    }

    /// Methods exposed by this proxy
    pub fn surface(&self) -> Vec<MethodDescriptor> {
        self.inner.artifact.surface().to_vec()
    }

    /// Access the live configuration for introspection/reconfiguration.
    ///
    /// Fails with `ProxyError::Opaque` when the configuration hides itself.
    pub fn advised(&self) -> Result<Advised> {
        if self.inner.config.read().opaque() {
            return Err(ProxyError::Opaque);
        }
        Ok(Advised {
            inner: Arc::clone(&self.inner),
        })
    }
}

impl PartialEq for ProxyHandle {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        if !Arc::ptr_eq(&self.inner.target_source, &other.inner.target_source) {
            return false;
        }

        // Snapshot advisor lists one at a time; no nested locking
        let ours: Vec<Advisor> = self.inner.config.read().advisors().to_vec();
        let theirs: Vec<Advisor> = other.inner.config.read().advisors().to_vec();

        ours.len() == theirs.len()
            && ours
                .iter()
                .zip(theirs.iter())
                .all(|(a, b)| a.same_identity(b))
    }
}

impl Eq for ProxyHandle {}

impl Hash for ProxyHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Advisors may mutate until frozen; hashing only the target source
        // keeps the hash stable while staying consistent with eq
        (Arc::as_ptr(&self.inner.target_source) as *const () as usize).hash(state);
    }
}

impl std::fmt::Debug for ProxyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyHandle")
            .field("target_type", &self.target_type())
            .field("strategy", &self.strategy())
            .finish()
    }
}

/// Live-configuration handle returned by [`ProxyHandle::advised`].
///
/// Advisor mutations bump the proxy's epoch, invalidating cached per-method
/// chains. All mutators fail once the configuration is frozen.
pub struct Advised {
    inner: Arc<ProxyInner>,
}

impl Advised {
    /// Append an advisor
    pub fn add_advisor(&self, advisor: Advisor) -> Result<()> {
        self.inner.config.write().add_advisor(advisor)?;
        self.inner.epoch.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// Append an interceptor applying to every method
    pub fn add_interceptor(&self, interceptor: Arc<dyn Interceptor>) -> Result<()> {
        self.inner.config.write().add_interceptor(interceptor)?;
        self.inner.epoch.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// Remove the advisor at `index`
    pub fn remove_advisor(&self, index: usize) -> Result<()> {
        self.inner.config.write().remove_advisor(index)?;
        self.inner.epoch.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// Number of registered advisors
    pub fn advisor_count(&self) -> usize {
        self.inner.config.read().advisors().len()
    }

    /// Toggle ambient self-exposure
    pub fn set_expose_proxy(&self, expose: bool) -> Result<()> {
        self.inner.config.write().set_expose_proxy(expose)
    }

    /// Permanently disable further mutation
    pub fn freeze(&self) {
        self.inner.config.write().freeze();
    }

    /// Whether the configuration is frozen
    pub fn is_frozen(&self) -> bool {
        self.inner.config.read().is_frozen()
    }
}

/// Builds proxies over a generation cache
pub struct ProxyFactory {
    cache: Arc<GenerationCache>,
}

impl ProxyFactory {
    /// Factory over the process-wide generation cache
    pub fn new() -> Self {
        Self {
            cache: GenerationCache::global(),
        }
    }

    /// Factory over a private cache
    pub fn with_cache(cache: Arc<GenerationCache>) -> Self {
        Self { cache }
    }

    /// Create a proxy from a configuration.
    ///
    /// Fails with a configuration error when there is nothing to do and
    /// nothing to call (no advisors, empty target source), or when
    /// subclass-style generation is required but the source declares no
    /// shape.
    pub fn create(&self, config: ProxyConfig) -> Result<ProxyHandle> {
        let target_source = Arc::clone(config.target_source());

        if config.advisors().is_empty() && target_source.is_empty() {
            return Err(ProxyError::Configuration(
                "refusing to build an empty proxy: no advisors and no target".to_string(),
            ));
        }

        let strategy = if config.prefer_subclass() || config.proxied_interfaces().is_empty() {
            StrategyKind::SubclassBased
        } else {
            StrategyKind::InterfaceBased
        };

        let artifact = match strategy {
            StrategyKind::SubclassBased => {
                let shape = target_source.shape().ok_or_else(|| {
                    ProxyError::Configuration(
                        "subclass-style proxy requires a target with a declared shape"
                            .to_string(),
                    )
                })?;
                self.cache
                    .get_or_create(ShapeKey::for_shape(shape), || {
                        DispatchArtifact::subclass(shape)
                    })
            }
            StrategyKind::InterfaceBased => {
                let interfaces = config.proxied_interfaces().to_vec();
                let type_name = if target_source.target_type().is_empty() {
                    interfaces[0].name.clone()
                } else {
                    target_source.target_type().to_string()
                };
                self.cache
                    .get_or_create(ShapeKey::for_interfaces(&type_name, &interfaces), || {
                        DispatchArtifact::interface(type_name.clone(), &interfaces)
                    })
            }
        };

        info!(
            "Created {:?} proxy for {} with {} advisor(s)",
            strategy,
            artifact.type_name(),
            config.advisors().len()
        );
        debug!("Proxy surface: {} method(s)", artifact.surface().len());

        Ok(ProxyHandle {
            inner: Arc::new(ProxyInner {
                config: RwLock::new(config),
                target_source,
                artifact,
                epoch: AtomicU64::new(0),
                chain_cache: RwLock::new(HashMap::new()),
            }),
        })
    }
}

impl Default for ProxyFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a proxy using the process-wide generation cache
pub fn create_proxy(config: ProxyConfig) -> Result<ProxyHandle> {
    ProxyFactory::new().create(config)
}
