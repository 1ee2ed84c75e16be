//! Context registry: host type name → template context.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A built-in member every object of a context exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMember {
    pub name: String,
    /// Spelled host return type, e.g. `bool` or `PropertyCollection`
    pub returns: String,
}

impl ContextMember {
    pub fn new(name: impl Into<String>, returns: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            returns: returns.into(),
        }
    }
}

/// A template context and the host type it is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDescriptor {
    /// Context name as written in templates
    pub name: String,
    /// Host-language type name that maps to this context
    pub type_name: String,
    #[serde(default)]
    pub members: Vec<ContextMember>,
}

impl ContextDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: ContextMember) -> Self {
        self.members.push(member);
        self
    }
}

/// Lookup of template contexts.
pub trait ContextRegistry {
    /// The context bound to a host type name.
    fn lookup(&self, type_name: &str) -> Option<&ContextDescriptor>;

    /// The context with a given template-facing name.
    fn context(&self, name: &str) -> Option<&ContextDescriptor> {
        let _ = name;
        None
    }
}

/// Registry backed by a fixed table, usually built from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticContextRegistry {
    by_type: BTreeMap<String, ContextDescriptor>,
}

impl StaticContextRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_context(mut self, descriptor: ContextDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Register a context; a later registration for the same host type wins.
    pub fn insert(&mut self, descriptor: ContextDescriptor) {
        if let Some(previous) = self
            .by_type
            .insert(descriptor.type_name.clone(), descriptor)
        {
            tracing::warn!(
                type_name = %previous.type_name,
                context = %previous.name,
                "Context registration replaced"
            );
        }
    }

    /// Host type names of every registered context, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContextDescriptor> {
        self.by_type.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl FromIterator<ContextDescriptor> for StaticContextRegistry {
    fn from_iter<I: IntoIterator<Item = ContextDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for descriptor in iter {
            registry.insert(descriptor);
        }
        registry
    }
}

impl ContextRegistry for StaticContextRegistry {
    fn lookup(&self, type_name: &str) -> Option<&ContextDescriptor> {
        self.by_type.get(type_name)
    }

    fn context(&self, name: &str) -> Option<&ContextDescriptor> {
        self.by_type.values().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StaticContextRegistry {
        [
            ContextDescriptor::new("entity", "Entity"),
            ContextDescriptor::new("property", "Property")
                .with_member(ContextMember::new("IsKey", "bool")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup_by_type_name() {
        let registry = registry();
        assert_eq!(registry.lookup("Entity").map(|d| d.name.as_str()), Some("entity"));
        assert!(registry.lookup("entity").is_none());
        assert!(registry.lookup("Unknown").is_none());
    }

    #[test]
    fn test_lookup_by_context_name() {
        let registry = registry();
        let property = registry.context("property").unwrap();
        assert_eq!(property.type_name, "Property");
        assert_eq!(property.members.len(), 1);
    }

    #[test]
    fn test_type_names_sorted() {
        let registry = registry();
        assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["Entity", "Property"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_later_registration_wins() {
        let registry = registry().with_context(ContextDescriptor::new("row", "Entity"));
        assert_eq!(registry.lookup("Entity").map(|d| d.name.as_str()), Some("row"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_descriptor_deserializes_without_members() {
        let descriptor: ContextDescriptor =
            serde_json::from_str(r#"{"name":"entity","type_name":"Entity"}"#).unwrap();
        assert!(descriptor.members.is_empty());
    }
}
