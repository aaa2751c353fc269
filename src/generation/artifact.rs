// src/generation/artifact.rs
//! Generated dispatch artifacts
//!
//! An artifact is the reusable, per-shape piece of a proxy: the exposed
//! method surface plus, for subclass-style proxies, the fast-accessor index
//! table. The index maps method names to slots in the target shape's
//! dispatch table and is computed lazily on first use; a proxy that is never
//! invoked never pays for it. First use from multiple threads initializes
//! it exactly once.

use crate::target::object::{InterfaceDef, MethodAccessor, MethodDescriptor, TargetShape};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use tracing::debug;

/// Proxy generation strategy, selected once at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// The contract is fully described by capability interfaces; one
    /// generic dispatch path resolves methods per call
    InterfaceBased,
    /// The target's own declared members are proxied; dispatch goes through
    /// a per-shape fast-accessor index
    SubclassBased,
}

/// Reusable per-shape dispatch artifact
pub struct DispatchArtifact {
    strategy: StrategyKind,
    type_name: String,

    /// Methods the proxy exposes (merged interfaces, or the target's shape)
    surface: Vec<MethodDescriptor>,

    /// Accessor table source; present for subclass-style artifacts
    shape: Option<&'static TargetShape>,

    /// Lazily computed method-name → table-slot index
    index: OnceCell<HashMap<String, usize>>,
}

impl DispatchArtifact {
    /// Build an interface-style artifact from a set of capability contracts.
    ///
    /// Overlapping declarations keep the first occurrence; registration
    /// order of the interfaces decides.
    pub fn interface(type_name: impl Into<String>, interfaces: &[InterfaceDef]) -> Self {
        let mut surface: Vec<MethodDescriptor> = Vec::new();
        for iface in interfaces {
            for method in &iface.methods {
                if !surface.iter().any(|m| m.name == method.name) {
                    surface.push(method.clone());
                }
            }
        }

        debug!(
            "Generated interface artifact over {} interface(s), {} method(s)",
            interfaces.len(),
            surface.len()
        );

        Self {
            strategy: StrategyKind::InterfaceBased,
            type_name: type_name.into(),
            surface,
            shape: None,
            index: OnceCell::new(),
        }
    }

    /// Build a subclass-style artifact over a target's declared shape
    pub fn subclass(shape: &'static TargetShape) -> Self {
        let surface = shape
            .methods
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect();

        debug!(
            "Generated subclass artifact for {} ({} method(s))",
            shape.type_name,
            shape.methods.len()
        );

        Self {
            strategy: StrategyKind::SubclassBased,
            type_name: shape.type_name.to_string(),
            surface,
            shape: Some(shape),
            index: OnceCell::new(),
        }
    }

    /// Generation strategy of this artifact
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Logical type name the artifact was generated for
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The exposed method surface
    pub fn surface(&self) -> &[MethodDescriptor] {
        &self.surface
    }

    /// Look up an exposed method by name
    pub fn lookup(&self, name: &str) -> Option<&MethodDescriptor> {
        self.surface.iter().find(|m| m.name == name)
    }

    /// Fast accessor for a method's original implementation.
    ///
    /// Subclass-style only; computes the index table on first use. Returns
    /// `None` for interface-style artifacts (terminal dispatch resolves
    /// against the live instance instead) and for undeclared methods.
    pub fn fast_accessor(&self, name: &str) -> Option<MethodAccessor> {
        let shape = self.shape?;
        let index = self.index.get_or_init(|| {
            debug!("Computing fast-accessor index for {}", shape.type_name);
            shape
                .methods
                .iter()
                .enumerate()
                .map(|(slot, entry)| (entry.descriptor.name.clone(), slot))
                .collect()
        });

        index.get(name).map(|&slot| shape.methods[slot].accessor)
    }

    /// Whether the fast-accessor index has been computed yet
    pub fn index_initialized(&self) -> bool {
        self.index.get().is_some()
    }
}
