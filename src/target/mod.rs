// src/target/mod.rs
//! Target model: shapes, capability contracts, and instance lifecycle
//!
//! This module describes the *real* object behind a proxy:
//!
//! - **Object model**: `ProxyTarget` plus the `TargetShape` dispatch table
//!   that maps each declared method to a fast accessor invoking the original
//!   implementation without interception.
//! - **Interfaces**: `InterfaceDef` capability contracts used by
//!   interface-style proxies.
//! - **Sources**: `TargetSource` implementations owning instance lifecycle
//!   (static singleton, degenerate empty, dynamic pooling).

pub mod object;
pub mod source;

// Re-export commonly used types
pub use object::{
    InterfaceDef, MethodAccessor, MethodDescriptor, MethodEntry, ProxyTarget, ReturnKind,
    TargetShape,
};
pub use source::{EmptyTargetSource, PoolStats, PoolingTargetSource, StaticTargetSource, TargetSource};
