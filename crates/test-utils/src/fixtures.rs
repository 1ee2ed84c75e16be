//! Registry and backend fixtures modelled on a small entity/property host API.

use snippet_backend::LexicalBackend;
use snippet_context::{ContextDescriptor, ContextMember, StaticContextRegistry};

/// Contexts `entity` (host type `Entity`) and `property` (host type
/// `Property`), with a few built-in members each.
#[must_use]
pub fn entity_registry() -> StaticContextRegistry {
    StaticContextRegistry::new()
        .with_context(
            ContextDescriptor::new("entity", "Entity")
                .with_member(ContextMember::new("Name", "string"))
                .with_member(ContextMember::new("Properties", "PropertyCollection")),
        )
        .with_context(
            ContextDescriptor::new("property", "Property")
                .with_member(ContextMember::new("Name", "string"))
                .with_member(ContextMember::new("IsKey", "bool")),
        )
}

/// A lexical backend that knows every host type of `registry`.
#[must_use]
pub fn lexical_backend(registry: &StaticContextRegistry) -> LexicalBackend {
    LexicalBackend::new().with_known_types(registry.type_names())
}

/// Byte offset of the first occurrence of `needle` in `source`.
///
/// # Panics
///
/// Panics if `needle` does not occur; fixtures are expected to be exact.
#[must_use]
pub fn offset_of(source: &str, needle: &str) -> usize {
    source
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in fixture source"))
}
