pub mod binding;
pub mod occurrence;
pub mod trace;

pub use binding::{Access, BindingKey, BoundOperand};
pub use occurrence::{Frame, Occurrence};
pub use trace::Trace;
