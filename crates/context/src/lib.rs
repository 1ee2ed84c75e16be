//! # Template Contexts
//!
//! A *context* is a named, template-facing type: the kind of object a template
//! expression is evaluated against. This crate holds the registry that maps
//! host-language type names to contexts, and the resolver that turns method
//! declarations found in the synthetic document into completion
//! [`Identifier`]s for those contexts.
//!
//! ```rust,ignore
//! let registry = StaticContextRegistry::new()
//!     .with_context(ContextDescriptor::new("property", "Property"));
//! let identifiers = resolve_identifiers(&backend.declared_methods(), &registry, "__");
//! ```

mod identifier;
mod registry;

pub use identifier::{completions_for, resolve_identifiers, split_collection, Identifier};
pub use registry::{ContextDescriptor, ContextMember, ContextRegistry, StaticContextRegistry};

/// Name prefix reserved for methods synthesized by the assembler
pub const SYNTHETIC_PREFIX: &str = "__";
