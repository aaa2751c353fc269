// src/proxy/mod.rs
//! Proxy construction and call dispatch
//!
//! This module assembles the engine's pieces into a callable proxy:
//!
//! ```text
//! caller → ProxyHandle.call()
//!              │
//!              ├─ surface lookup + arity check
//!              ├─ matched chain (cached per method)
//!              ├─ [expose_proxy] publish to ambient slot
//!              │
//!              └─ Invocation.proceed() → I₁ → I₂ → … → target
//!                                        (fast accessor / direct call)
//! ```
//!
//! - **config**: the mutable-until-frozen `ProxyConfig` descriptor
//! - **invocation**: the per-call context and `proceed()` state machine
//! - **exposure**: scoped thread-local self-reference publication
//! - **handle**: `ProxyFactory`, `ProxyHandle`, live `Advised` introspection

pub mod config;
pub mod exposure;
pub mod handle;
pub mod invocation;

// Re-export commonly used types
pub use config::ProxyConfig;
pub use exposure::current_proxy;
pub use handle::{create_proxy, Advised, ProxyFactory, ProxyHandle};
pub use invocation::Invocation;
