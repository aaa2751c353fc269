// src/advice/pointcut.rs
//! Pointcuts: predicates deciding where advice applies
//!
//! A pointcut is evaluated against (target type name, method identity).
//! Three concrete pointcuts cover the usual cases: match-all, an exact name
//! set, and a `*` wildcard pattern (prefix or suffix match).

use crate::target::object::MethodDescriptor;
use std::collections::HashSet;

/// Predicate over (target type, method identity)
pub trait Pointcut: Send + Sync {
    /// Whether the advice applies to this method on this target type
    fn matches(&self, target_type: &str, method: &MethodDescriptor) -> bool;
}

/// Pointcut matching every method
#[derive(Debug, Clone, Copy, Default)]
pub struct TruePointcut;

impl TruePointcut {
    /// Create a match-all pointcut
    pub fn new() -> Self {
        Self
    }
}

impl Pointcut for TruePointcut {
    fn matches(&self, _target_type: &str, _method: &MethodDescriptor) -> bool {
        true
    }
}

/// Pointcut matching an explicit set of method names
#[derive(Debug, Clone)]
pub struct NameMatchPointcut {
    names: HashSet<String>,
}

impl NameMatchPointcut {
    /// Match exactly the given method names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Pointcut for NameMatchPointcut {
    fn matches(&self, _target_type: &str, method: &MethodDescriptor) -> bool {
        self.names.contains(&method.name)
    }
}

/// Wildcard pointcut over method names.
///
/// A single `*` may lead or trail the pattern: `get_*` matches any method
/// starting with `get_`, `*_unchecked` matches any method ending with
/// `_unchecked`, a bare `*` matches everything, and a pattern without `*`
/// degrades to an exact match.
#[derive(Debug, Clone)]
pub struct PatternPointcut {
    pattern: String,
}

impl PatternPointcut {
    /// Create a wildcard pointcut from a pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    fn name_matches(&self, name: &str) -> bool {
        let pattern = self.pattern.as_str();

        if pattern == "*" {
            return true;
        }
        if let Some(suffix) = pattern.strip_prefix('*') {
            return name.ends_with(suffix);
        }
        if let Some(prefix) = pattern.strip_suffix('*') {
            return name.starts_with(prefix);
        }
        name == pattern
    }
}

impl Pointcut for PatternPointcut {
    fn matches(&self, _target_type: &str, method: &MethodDescriptor) -> bool {
        self.name_matches(&method.name)
    }
}
