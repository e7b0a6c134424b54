//! Dependency resolution over a finalized trace

pub mod domain;
pub mod infrastructure;

pub use domain::{DependencyEdge, DependencyKind, DependencyReason};
pub use infrastructure::{DataDependencies, DependencyResolver};
