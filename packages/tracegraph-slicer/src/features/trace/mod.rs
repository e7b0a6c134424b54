//! Trace store
//!
//! Ordered log of executed occurrences with per-binding-key indices.

pub mod domain;
pub mod infrastructure;

pub use domain::{Access, BindingKey, BoundOperand, Frame, Occurrence, Trace};
pub use infrastructure::TraceBuilder;
