//! Common test utilities for tracegraph-slicer
//!
//! Builders for code units and a small recorder that plays the tracer's
//! role: it records executed positions and derives bound operands from the
//! instruction and the executing frame.

#![allow(dead_code)]

mod builders;

pub use builders::*;
