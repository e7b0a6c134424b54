mod slicer;

pub use slicer::DynamicSlicer;
