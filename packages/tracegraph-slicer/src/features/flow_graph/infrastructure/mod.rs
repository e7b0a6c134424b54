//! CFG construction, post-dominance and caching

mod cache;
mod cfg_builder;
mod control_dependence;

pub use cache::CfgCache;
pub use cfg_builder::build_cfg;
