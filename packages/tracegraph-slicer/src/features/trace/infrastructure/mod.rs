//! Trace recording and index construction

mod builder;
mod stack;

pub use builder::TraceBuilder;
