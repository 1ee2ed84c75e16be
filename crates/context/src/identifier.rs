//! Completion identifier synthesis.
//!
//! Extension-like methods declared in template code (`static T Name(this
//! Entity e)`) become identifiers offered while editing an expression bound
//! to the context of their first parameter.

use serde::Serialize;
use snippet_backend::DeclaredMethod;

use crate::registry::{ContextDescriptor, ContextRegistry};

/// A completion candidate for template expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub name: String,
    /// Context the identifier can be used on
    pub declared_context: String,
    /// Context the identifier yields, if its result type is registered
    pub target_context: Option<String>,
    pub is_boolean: bool,
    pub is_collection_valued: bool,
    /// Using the identifier needs a nested template for the yielded items
    pub requires_template_argument: bool,
    /// Declared in template code rather than built into the context
    pub is_user_defined: bool,
    /// Human-readable one-liner for completion popups
    pub summary: String,
}

/// Facts derived from a spelled return type
struct ReturnShape {
    is_boolean: bool,
    is_collection_valued: bool,
    target_context: Option<String>,
    requires_template_argument: bool,
}

impl ReturnShape {
    fn of<R: ContextRegistry + ?Sized>(return_type: &str, registry: &R) -> Self {
        let is_boolean = matches!(return_type, "bool" | "Boolean");
        let (candidate, is_collection_valued) = split_collection(return_type);
        let target_context = registry.lookup(candidate).map(|d| d.name.clone());
        let requires_template_argument = target_context.is_some() && is_collection_valued;
        Self {
            is_boolean,
            is_collection_valued,
            target_context,
            requires_template_argument,
        }
    }

    fn label(&self, return_type: &str) -> String {
        if self.is_collection_valued {
            "collection".to_string()
        } else {
            return_type.to_lowercase()
        }
    }
}

/// Split a return type into the candidate child type and whether it is a
/// collection of it.
///
/// `PropertyCollection` is a collection of `Property`; a type that merely
/// starts with `Collection` is not.
#[must_use]
pub fn split_collection(return_type: &str) -> (&str, bool) {
    match return_type.find("Collection") {
        Some(at) if at > 0 => (&return_type[..at], true),
        _ => (return_type, false),
    }
}

/// Synthesize identifiers from the methods declared in the document.
///
/// Methods carrying `synthetic_prefix`, methods without parameters and
/// methods whose first parameter type is not a registered context are
/// skipped silently.
pub fn resolve_identifiers<R: ContextRegistry + ?Sized>(
    methods: &[DeclaredMethod],
    registry: &R,
    synthetic_prefix: &str,
) -> Vec<Identifier> {
    methods
        .iter()
        .filter(|m| !m.name.starts_with(synthetic_prefix))
        .filter(|m| !m.first_parameter_type.is_empty())
        .filter_map(|method| {
            let Some(declared) = registry.lookup(&method.first_parameter_type) else {
                tracing::trace!(
                    method = %method.name,
                    parameter_type = %method.first_parameter_type,
                    "Skipping method: parameter type is not a template context"
                );
                return None;
            };

            let shape = ReturnShape::of(&method.return_type, registry);
            let summary = format!(
                "(extension) {} {}",
                shape.label(&method.return_type),
                method.name
            );
            Some(Identifier {
                name: method.name.clone(),
                declared_context: declared.name.clone(),
                target_context: shape.target_context,
                is_boolean: shape.is_boolean,
                is_collection_valued: shape.is_collection_valued,
                requires_template_argument: shape.requires_template_argument,
                is_user_defined: true,
                summary,
            })
        })
        .collect()
}

/// Completion list for an expression bound to `context`.
///
/// Built-in members come first in declaration order, followed by the
/// user-defined identifiers declared for the same context, sorted by name.
pub fn completions_for<R: ContextRegistry + ?Sized>(
    context: &ContextDescriptor,
    identifiers: &[Identifier],
    registry: &R,
) -> Vec<Identifier> {
    let builtins = context.members.iter().map(|member| {
        let shape = ReturnShape::of(&member.returns, registry);
        let summary = format!("(member) {} {}", shape.label(&member.returns), member.name);
        Identifier {
            name: member.name.clone(),
            declared_context: context.name.clone(),
            target_context: shape.target_context,
            is_boolean: shape.is_boolean,
            is_collection_valued: shape.is_collection_valued,
            requires_template_argument: shape.requires_template_argument,
            is_user_defined: false,
            summary,
        }
    });

    let mut user: Vec<Identifier> = identifiers
        .iter()
        .filter(|id| id.declared_context == context.name)
        .cloned()
        .collect();
    user.sort_by(|a, b| a.name.cmp(&b.name));

    builtins.chain(user).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ContextMember, StaticContextRegistry};
    use snippet_backend::OffsetRange;

    fn method(name: &str, return_type: &str, first_parameter_type: &str) -> DeclaredMethod {
        DeclaredMethod {
            name: name.to_string(),
            return_type: return_type.to_string(),
            first_parameter_type: first_parameter_type.to_string(),
            name_range: OffsetRange::default(),
        }
    }

    fn registry() -> StaticContextRegistry {
        StaticContextRegistry::new()
            .with_context(ContextDescriptor::new("entity", "Entity"))
            .with_context(ContextDescriptor::new("property", "Property"))
    }

    #[test]
    fn test_split_collection() {
        assert_eq!(split_collection("PropertyCollection"), ("Property", true));
        assert_eq!(split_collection("Property"), ("Property", false));
        assert_eq!(split_collection("Collection"), ("Collection", false));
        assert_eq!(split_collection("CollectionView"), ("CollectionView", false));
    }

    #[test]
    fn test_collection_valued_extension() {
        let ids = resolve_identifiers(
            &[method("Properties", "PropertyCollection", "Entity")],
            &registry(),
            "__",
        );
        assert_eq!(ids.len(), 1);
        let id = &ids[0];
        assert_eq!(id.name, "Properties");
        assert_eq!(id.declared_context, "entity");
        assert_eq!(id.target_context.as_deref(), Some("property"));
        assert!(id.is_collection_valued);
        assert!(id.requires_template_argument);
        assert!(!id.is_boolean);
        assert!(id.is_user_defined);
        assert_eq!(id.summary, "(extension) collection Properties");
    }

    #[test]
    fn test_single_valued_extension() {
        let ids = resolve_identifiers(&[method("Key", "Property", "Entity")], &registry(), "__");
        let id = &ids[0];
        assert!(!id.is_collection_valued);
        assert_eq!(id.target_context.as_deref(), Some("property"));
        assert!(!id.requires_template_argument);
        assert_eq!(id.summary, "(extension) property Key");
    }

    #[test]
    fn test_boolean_extension() {
        for spelling in ["bool", "Boolean"] {
            let ids = resolve_identifiers(&[method("IsKey", spelling, "Property")], &registry(), "__");
            let id = &ids[0];
            assert!(id.is_boolean);
            assert!(id.target_context.is_none());
            assert!(!id.requires_template_argument);
        }
        let ids = resolve_identifiers(&[method("IsKey", "BOOL", "Property")], &registry(), "__");
        assert!(!ids[0].is_boolean);
    }

    #[test]
    fn test_unregistered_collection_has_no_target() {
        let ids = resolve_identifiers(&[method("Tags", "TagCollection", "Entity")], &registry(), "__");
        let id = &ids[0];
        assert!(id.is_collection_valued);
        assert!(id.target_context.is_none());
        assert!(!id.requires_template_argument);
    }

    #[test]
    fn test_skipped_methods() {
        let ids = resolve_identifiers(
            &[
                method("__12", "bool", "Entity"),
                method("NoParams", "bool", ""),
                method("Foreign", "bool", "Widget"),
            ],
            &registry(),
            "__",
        );
        assert!(ids.is_empty());
    }

    #[test]
    fn test_completions_merge_builtins_and_user() {
        let registry = StaticContextRegistry::new()
            .with_context(
                ContextDescriptor::new("entity", "Entity")
                    .with_member(ContextMember::new("Name", "string"))
                    .with_member(ContextMember::new("Properties", "PropertyCollection")),
            )
            .with_context(ContextDescriptor::new("property", "Property"));
        let user = resolve_identifiers(
            &[
                method("Zeta", "bool", "Entity"),
                method("Alpha", "bool", "Entity"),
                method("IsKey", "bool", "Property"),
            ],
            &registry,
            "__",
        );

        let entity = registry.context("entity").unwrap();
        let items = completions_for(entity, &user, &registry);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Properties", "Alpha", "Zeta"]);

        assert!(!items[0].is_user_defined);
        assert_eq!(items[0].summary, "(member) string Name");
        assert!(items[1].requires_template_argument);
        assert!(items[2].is_user_defined);
    }
}
