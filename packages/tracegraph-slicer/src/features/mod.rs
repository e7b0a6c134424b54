//! Feature modules, leaf first
//!
//! flow_graph -> trace -> dependency -> slicing

pub mod dependency;
pub mod flow_graph;
pub mod slicing;
pub mod trace;
