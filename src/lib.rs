// src/lib.rs
//! Weave Dynamic Proxying Engine
//!
//! This library produces substitute objects (proxies) that look and behave
//! like a target to all callers but route every qualifying method call
//! through an ordered chain of interceptors before (optionally) reaching
//! the real implementation. It is the mechanism behind cross-cutting
//! behavior — logging, transactions, validation, guards — without touching
//! the target's source.
//!
//! # Architecture
//!
//! The engine is structured into several key modules:
//!
//! - **advice**: interceptors, pointcuts, and ordered chain matching
//! - **target**: target shapes, capability interfaces, and instance
//!   lifecycle (static, empty, pooled sources)
//! - **proxy**: configuration, the per-call invocation context, ambient
//!   self-exposure, and the proxy handle/factory
//! - **generation**: per-shape dispatch artifacts and their memoizing cache
//! - **utils**: shared error taxonomy
//!
//! # Example
//!
//! ```text
//! let mut config = ProxyConfig::for_target(source);
//! config.add_interceptor(logging)?;
//! config.add_interceptor(counting)?;
//! let proxy = create_proxy(config)?;
//! proxy.call("add", vec![json!(2), json!(3)])?; // logged, counted, = 5
//! ```

// Public module exports
pub mod advice;
pub mod generation;
pub mod proxy;
pub mod target;
pub mod utils;

// Re-export commonly used types
pub use advice::{Advisor, Interceptor, NameMatchPointcut, PatternPointcut, Pointcut, TruePointcut};
pub use generation::{DispatchArtifact, GenerationCache, ShapeKey, StrategyKind};
pub use proxy::{create_proxy, current_proxy, Advised, Invocation, ProxyConfig, ProxyFactory, ProxyHandle};
pub use target::{
    EmptyTargetSource, InterfaceDef, MethodDescriptor, PoolingTargetSource, ProxyTarget,
    ReturnKind, StaticTargetSource, TargetShape, TargetSource,
};
pub use utils::errors::{ProxyError, Result, TargetError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
