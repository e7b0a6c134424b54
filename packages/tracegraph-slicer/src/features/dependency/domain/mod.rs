//! Dependency edges between occurrences

use crate::features::trace::domain::BindingKey;
use crate::shared::models::OccurrenceId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    Data,
    Control,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Data => "DATA",
            DependencyKind::Control => "CONTROL",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an edge exists
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyReason {
    /// Named use resolved to its nearest preceding definition
    Binding(BindingKey),
    /// Value consumed from the operand stack
    Stack,
    /// Consumed value came back from a callee frame's return
    CallResult,
    /// Callee code with no controlling branch depends on the call that entered it
    CallSite,
    /// Branch outcome decided whether this occurrence's block ran
    Branch,
    /// Included by the over-approximating attribute coverage policy
    Coverage,
}

/// Directed from the later (dependent) occurrence to the earlier one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: OccurrenceId,
    pub to: OccurrenceId,
    pub kind: DependencyKind,
    pub reason: DependencyReason,
}

impl DependencyEdge {
    pub fn data(from: OccurrenceId, to: OccurrenceId, reason: DependencyReason) -> Self {
        Self {
            from,
            to,
            kind: DependencyKind::Data,
            reason,
        }
    }

    pub fn control(from: OccurrenceId, to: OccurrenceId, reason: DependencyReason) -> Self {
        Self {
            from,
            to,
            kind: DependencyKind::Control,
            reason,
        }
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -{}-> {}", self.from, self.kind, self.to)
    }
}
