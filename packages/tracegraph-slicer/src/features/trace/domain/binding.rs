//! Binding keys: scope-aware identity of a storage location
//!
//! Two uses resolve to the same definition only when their keys are equal,
//! so same-named locals in different frames (or same-named attributes on
//! different objects, or same-named globals in different modules) never
//! compete.

use crate::shared::models::{FrameId, ModuleId, ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BindingKey {
    /// Local variable of one activation
    Local { name: String, frame: FrameId },
    /// Attribute of one object (owner identity is an arena handle)
    Attribute { name: String, owner: ObjectId },
    /// Module-level name, keyed by the module whose namespace binds it
    Global { name: String, module: ModuleId },
}

impl BindingKey {
    pub fn local(name: impl Into<String>, frame: FrameId) -> Self {
        BindingKey::Local {
            name: name.into(),
            frame,
        }
    }

    pub fn attribute(name: impl Into<String>, owner: ObjectId) -> Self {
        BindingKey::Attribute {
            name: name.into(),
            owner,
        }
    }

    pub fn global(name: impl Into<String>, module: ModuleId) -> Self {
        BindingKey::Global {
            name: name.into(),
            module,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BindingKey::Local { name, .. }
            | BindingKey::Attribute { name, .. }
            | BindingKey::Global { name, .. } => name,
        }
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, BindingKey::Attribute { .. })
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            BindingKey::Local { .. } => "local",
            BindingKey::Attribute { .. } => "attribute",
            BindingKey::Global { .. } => "global",
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKey::Local { name, frame } => write!(f, "{}@{}", name, frame),
            BindingKey::Attribute { name, owner } => write!(f, "{}.{}", owner, name),
            BindingKey::Global { name, module } => write!(f, "{}::{}", module, name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    Use,
    Define,
}

/// One resolved variable/attribute/name operand of an occurrence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundOperand {
    pub access: Access,
    pub key: BindingKey,
}

impl BoundOperand {
    pub fn uses(key: BindingKey) -> Self {
        Self {
            access: Access::Use,
            key,
        }
    }

    pub fn defines(key: BindingKey) -> Self {
        Self {
            access: Access::Define,
            key,
        }
    }

    pub fn is_use(&self) -> bool {
        self.access == Access::Use
    }

    pub fn is_define(&self) -> bool {
        self.access == Access::Define
    }
}
