mod resolver;
mod scope;

pub use resolver::{Bindings, ResolveError, Resolver};
