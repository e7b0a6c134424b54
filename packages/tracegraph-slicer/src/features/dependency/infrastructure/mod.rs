mod resolver;

pub use resolver::{DataDependencies, DependencyResolver};
