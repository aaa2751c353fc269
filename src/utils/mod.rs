// src/utils/mod.rs
//! Common utilities shared across the engine

pub mod errors;

pub use errors::{ProxyError, Result, TargetError};
