// src/proxy/exposure.rs
//! Ambient proxy exposure
//!
//! When a configuration sets `expose_proxy`, the proxy publishes itself to
//! a thread-local slot for the duration of each call so that code inside
//! the target can reach the intercepting proxy (self-invocations through
//! `current_proxy()` go back through the chain). The slot is scoped: the
//! previous value is restored on every exit path via the guard's drop.

use crate::proxy::handle::ProxyHandle;
use std::cell::RefCell;

thread_local! {
    static CURRENT_PROXY: RefCell<Option<ProxyHandle>> = const { RefCell::new(None) };
}

/// The proxy currently executing on this thread, if it exposes itself
pub fn current_proxy() -> Option<ProxyHandle> {
    CURRENT_PROXY.with(|slot| slot.borrow().clone())
}

/// Scoped publication of a proxy to the ambient slot.
///
/// Restores the prior value on drop, success or failure.
pub(crate) struct ExposedProxyGuard {
    previous: Option<ProxyHandle>,
}

impl ExposedProxyGuard {
    pub(crate) fn enter(proxy: ProxyHandle) -> Self {
        let previous = CURRENT_PROXY.with(|slot| slot.borrow_mut().replace(proxy));
        Self { previous }
    }
}

impl Drop for ExposedProxyGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_PROXY.with(|slot| *slot.borrow_mut() = previous);
    }
}
