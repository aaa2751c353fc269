// src/proxy/config.rs
//! Proxy configuration: the mutable-until-frozen proxy descriptor

use crate::advice::chain::Advisor;
use crate::advice::interceptor::Interceptor;
use crate::advice::pointcut::TruePointcut;
use crate::target::object::InterfaceDef;
use crate::target::source::{EmptyTargetSource, TargetSource};
use crate::utils::errors::{ProxyError, Result};
use std::sync::Arc;

/// Aggregate descriptor for one proxy: target source, ordered advisors,
/// exposed interfaces, and behavioral flags.
///
/// Mutable until [`freeze`](ProxyConfig::freeze) is called; every mutator
/// fails with [`ProxyError::Frozen`] afterward. A configuration is viable
/// for proxy construction iff it has at least one advisor or a non-empty
/// target source.
pub struct ProxyConfig {
    target_source: Arc<dyn TargetSource>,
    advisors: Vec<Advisor>,
    proxied_interfaces: Vec<InterfaceDef>,
    expose_proxy: bool,
    opaque: bool,
    prefer_subclass: bool,
    frozen: bool,
}

impl ProxyConfig {
    /// Create a configuration with no target yet
    pub fn new() -> Self {
        Self {
            target_source: Arc::new(EmptyTargetSource::new()),
            advisors: Vec::new(),
            proxied_interfaces: Vec::new(),
            expose_proxy: false,
            opaque: false,
            prefer_subclass: false,
            frozen: false,
        }
    }

    /// Create a configuration over the given target source
    pub fn for_target(target_source: Arc<dyn TargetSource>) -> Self {
        let mut config = Self::new();
        config.target_source = target_source;
        config
    }

    fn check_mutable(&self) -> Result<()> {
        if self.frozen {
            Err(ProxyError::Frozen)
        } else {
            Ok(())
        }
    }

    /// Replace the target source
    pub fn set_target_source(&mut self, target_source: Arc<dyn TargetSource>) -> Result<()> {
        self.check_mutable()?;
        self.target_source = target_source;
        Ok(())
    }

    /// Append an advisor; registration order defines call order
    pub fn add_advisor(&mut self, advisor: Advisor) -> Result<()> {
        self.check_mutable()?;
        self.advisors.push(advisor);
        Ok(())
    }

    /// Append an interceptor applying to every method
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn Interceptor>) -> Result<()> {
        self.add_advisor(Advisor::new(Arc::new(TruePointcut::new()), interceptor))
    }

    /// Remove the advisor at `index`
    pub fn remove_advisor(&mut self, index: usize) -> Result<()> {
        self.check_mutable()?;
        if index >= self.advisors.len() {
            return Err(ProxyError::Configuration(format!(
                "advisor index {} out of bounds ({} registered)",
                index,
                self.advisors.len()
            )));
        }
        self.advisors.remove(index);
        Ok(())
    }

    /// Add a capability interface the proxy must expose
    pub fn add_interface(&mut self, interface: InterfaceDef) -> Result<()> {
        self.check_mutable()?;
        self.proxied_interfaces.push(interface);
        Ok(())
    }

    /// Publish the proxy to the ambient slot for each call's duration
    pub fn set_expose_proxy(&mut self, expose: bool) -> Result<()> {
        self.check_mutable()?;
        self.expose_proxy = expose;
        Ok(())
    }

    /// Hide the live configuration from the proxy's own surface
    pub fn set_opaque(&mut self, opaque: bool) -> Result<()> {
        self.check_mutable()?;
        self.opaque = opaque;
        Ok(())
    }

    /// Request subclass-style generation even when interfaces are declared
    pub fn set_prefer_subclass(&mut self, prefer: bool) -> Result<()> {
        self.check_mutable()?;
        self.prefer_subclass = prefer;
        Ok(())
    }

    /// Permanently disable mutation. Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether the configuration is frozen
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The configured target source
    pub fn target_source(&self) -> &Arc<dyn TargetSource> {
        &self.target_source
    }

    /// Registered advisors in call order
    pub fn advisors(&self) -> &[Advisor] {
        &self.advisors
    }

    /// Declared capability interfaces
    pub fn proxied_interfaces(&self) -> &[InterfaceDef] {
        &self.proxied_interfaces
    }

    /// Whether the proxy publishes itself to the ambient slot per call
    pub fn expose_proxy(&self) -> bool {
        self.expose_proxy
    }

    /// Whether introspection through the proxy surface is blocked
    pub fn opaque(&self) -> bool {
        self.opaque
    }

    /// Whether subclass-style generation was explicitly requested
    pub fn prefer_subclass(&self) -> bool {
        self.prefer_subclass
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::invocation::Invocation;
    use serde_json::{json, Value};

    struct Noop;

    impl Interceptor for Noop {
        fn invoke(&self, _invocation: &mut Invocation<'_>) -> Result<Value> {
            Ok(json!(null))
        }
    }

    #[test]
    fn test_new_config_is_empty() {
        let config = ProxyConfig::new();
        assert!(config.target_source().is_empty());
        assert!(config.advisors().is_empty());
        assert!(!config.is_frozen());
    }

    #[test]
    fn test_frozen_rejects_mutation() {
        let mut config = ProxyConfig::new();
        config.add_interceptor(Arc::new(Noop)).unwrap();
        config.freeze();
        assert!(config.is_frozen());

        assert_eq!(
            config.add_interceptor(Arc::new(Noop)),
            Err(ProxyError::Frozen)
        );
        assert_eq!(config.set_expose_proxy(true), Err(ProxyError::Frozen));
        assert_eq!(config.set_opaque(true), Err(ProxyError::Frozen));
        assert_eq!(config.remove_advisor(0), Err(ProxyError::Frozen));

        // Registered state is untouched
        assert_eq!(config.advisors().len(), 1);
    }

    #[test]
    fn test_remove_advisor_bounds() {
        let mut config = ProxyConfig::new();
        config.add_interceptor(Arc::new(Noop)).unwrap();

        assert!(matches!(
            config.remove_advisor(5),
            Err(ProxyError::Configuration(_))
        ));
        config.remove_advisor(0).unwrap();
        assert!(config.advisors().is_empty());
    }
}
