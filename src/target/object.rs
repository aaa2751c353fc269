// src/target/object.rs
//! Target object model and dispatch tables
//!
//! A proxyable type declares a `TargetShape`: its logical type name plus an
//! ordered table of method entries. Each entry pairs a `MethodDescriptor`
//! (the identity pointcuts match against) with a fast accessor — a plain
//! function pointer that invokes the original implementation directly. The
//! accessor never routes back through a proxy, which is what makes it safe
//! for the terminal step of `proceed()`.
//!
//! Shapes are declared once per type, typically as a `once_cell` static, and
//! borrowed for `'static` everywhere else.

use crate::utils::errors::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Nullability of a method's result position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// The method must produce a non-null value; null is a contract violation
    Required,
    /// Null is a legitimate result
    Nullable,
}

/// Logical identity of a method: name plus parameter shape
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,

    /// Number of declared parameters
    pub arity: usize,

    /// Result nullability
    pub returns: ReturnKind,
}

impl MethodDescriptor {
    /// Create a new method descriptor
    pub fn new(name: impl Into<String>, arity: usize, returns: ReturnKind) -> Self {
        Self {
            name: name.into(),
            arity,
            returns,
        }
    }
}

/// Fast accessor: invokes the original implementation of one method.
///
/// Implementations downcast the target to the concrete type and call the
/// real method body. An accessor must never dispatch through a proxy.
pub type MethodAccessor = fn(&dyn ProxyTarget, &[Value]) -> Result<Value>;

/// One row of a shape's dispatch table
pub struct MethodEntry {
    /// Method identity
    pub descriptor: MethodDescriptor,

    /// Un-intercepted invoker for the original implementation
    pub accessor: MethodAccessor,
}

/// Declared shape of a proxyable type: its dispatch table
pub struct TargetShape {
    /// Logical type name (what pointcuts see as the target type)
    pub type_name: &'static str,

    /// Ordered method entries
    pub methods: Vec<MethodEntry>,
}

impl TargetShape {
    /// Start building a shape for the given type name
    pub fn builder(type_name: &'static str) -> TargetShapeBuilder {
        TargetShapeBuilder {
            type_name,
            methods: Vec::new(),
        }
    }

    /// Find a method entry by name
    pub fn find(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.iter().find(|m| m.descriptor.name == name)
    }

    /// Whether the shape declares a method with this name
    pub fn declares(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Structural fingerprint over the declared method identities
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.type_name.hash(&mut hasher);
        for entry in &self.methods {
            entry.descriptor.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Builder for `TargetShape`
pub struct TargetShapeBuilder {
    type_name: &'static str,
    methods: Vec<MethodEntry>,
}

impl TargetShapeBuilder {
    /// Declare a method with its fast accessor
    pub fn method(
        mut self,
        name: impl Into<String>,
        arity: usize,
        returns: ReturnKind,
        accessor: MethodAccessor,
    ) -> Self {
        self.methods.push(MethodEntry {
            descriptor: MethodDescriptor::new(name, arity, returns),
            accessor,
        });
        self
    }

    /// Finish building the shape
    pub fn build(self) -> TargetShape {
        TargetShape {
            type_name: self.type_name,
            methods: self.methods,
        }
    }
}

/// Capability contract exposed by an interface-style proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDef {
    /// Interface name
    pub name: String,

    /// Declared methods
    pub methods: Vec<MethodDescriptor>,
}

impl InterfaceDef {
    /// Create an empty interface definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Declare a method on this interface
    pub fn method(mut self, name: impl Into<String>, arity: usize, returns: ReturnKind) -> Self {
        self.methods.push(MethodDescriptor::new(name, arity, returns));
        self
    }
}

/// A proxyable object.
///
/// Implementors expose their declared shape and an `Any` view so accessors
/// can downcast back to the concrete type.
pub trait ProxyTarget: Send + Sync {
    /// The type's declared dispatch table
    fn shape(&self) -> &'static TargetShape;

    /// Concrete-type view for accessor downcasts
    fn as_any(&self) -> &dyn Any;
}
