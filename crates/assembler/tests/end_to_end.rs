use snippet_assembler::{Assembler, AssemblerError, FragmentKind};
use snippet_backend::{LexicalBackend, SymbolKind};
use snippet_context::StaticContextRegistry;
use snippet_test_utils::{entity_registry, format_spans, lexical_backend, offset_of};
use snippet_types::{OffsetRange, TokenCategory};

type TestAssembler = Assembler<LexicalBackend, StaticContextRegistry>;

fn assembler() -> TestAssembler {
    let registry = entity_registry();
    let backend = lexical_backend(&registry);
    Assembler::new(backend, registry)
}

/// A template as the scanner sees it: directives, a helper block with
/// extension methods, and a lambda used in an expression.
const TEMPLATE: &str = r#"<#@ using System.Text; #>
<#+
static PropertyCollection Keys(this Entity e) { return e.Properties; }
static bool IsKey(this Property p) { return p.Name == "Id"; }
static string Label(this Property p) { return p.Name; }
#>
<#= entity.Properties.Where((p) => p.IsKey() && p.Name != "") #>"#;

fn template_assembler() -> TestAssembler {
    let mut assembler = assembler();
    let using = "using System.Text;";
    assembler.add_using(using, offset_of(TEMPLATE, using)).unwrap();

    let block_start = offset_of(TEMPLATE, "static PropertyCollection");
    let block_end = offset_of(TEMPLATE, "\n#>");
    assembler
        .add_block(&TEMPLATE[block_start..block_end], block_start)
        .unwrap();

    let lambda_start = offset_of(TEMPLATE, "(p) =>");
    let lambda_end = offset_of(TEMPLATE, ") #>");
    assembler
        .add_lambda(&TEMPLATE[lambda_start..lambda_end], "Property", "p", lambda_start)
        .unwrap();
    assembler.finalize().unwrap();
    assembler
}

#[test]
fn test_tokens_map_to_template_coordinates() {
    let mut assembler = assembler();
    assembler.add_using("using System;", 0).unwrap();
    assembler.add_block("var x = Class.Name;", 20).unwrap();
    assembler.finalize().unwrap();

    let tokens = assembler.tokens().unwrap();
    assert!(tokens
        .iter()
        .any(|t| t.category == TokenCategory::Keyword && t.range == OffsetRange::new(0, 5)));
    assert!(tokens
        .iter()
        .any(|t| t.category == TokenCategory::Keyword && t.range == OffsetRange::new(20, 23)));

    let source = "using System;       var x = Class.Name;";
    insta::assert_snapshot!(
        format_spans(source, tokens.iter().map(|t| (t.category, t.range))),
        @r"
    keyword 0..5 `using`
    identifier 6..12 `System`
    keyword 20..23 `var`
    identifier 24..25 `x`
    identifier 28..33 `Class`
    identifier 34..38 `Name`
    "
    );
}

#[test]
fn test_document_layout() {
    let mut assembler = assembler();
    assembler.add_using("using System;", 0).unwrap();
    assembler.add_block("var x = Class.Name;", 20).unwrap();
    assembler.add_lambda("(p) => p.IsKey", "Property", "p", 50).unwrap();
    assembler.finalize().unwrap();

    insta::assert_snapshot!(assembler.document_text().unwrap(), @r"
    namespace TemplateScratch
    {
    using System;
    using System.Collections.Generic;
    using System.Linq;
    using System;
    public static class TemplateSnippets
    {
    var x = Class.Name;
    bool __50(Property p) { return p.IsKey; }
    }
    }
    ");
}

#[test]
fn test_empty_cycle() {
    let mut assembler = assembler();
    assembler.finalize().unwrap();

    let text = assembler.document_text().unwrap();
    assert!(text.starts_with("namespace TemplateScratch\n{\n"));
    assert!(text.ends_with("using System.Linq;\n}\n"));
    assert!(!text.contains("class"));

    assert!(assembler.tokens().unwrap().is_empty());
    assert!(assembler.error_tokens().unwrap().is_empty());
    assert!(assembler.identifiers().unwrap().is_empty());
    assert!(assembler.symbol_at(0).unwrap().is_none());
    assert!(assembler.recommended_symbols_at(0).unwrap().is_empty());
}

#[test]
fn test_fragments_are_contiguous_and_round_trip() {
    let assembler = template_assembler();
    let text = assembler.document_text().unwrap();

    let mut expected = 0;
    for fragment in assembler.fragments() {
        assert_eq!(fragment.document_offset(), expected);
        expected += fragment.document_len();

        let Some(source) = fragment.source_range() else {
            assert_eq!(fragment.kind(), FragmentKind::Boilerplate);
            continue;
        };
        // Author text is copied verbatim from the template
        assert_eq!(&TEMPLATE[source.start..source.end], fragment.text());
        let document = fragment.document_range();
        assert_eq!(&text[document.start..document.end], fragment.text());

        for position in source.start..=source.end {
            let in_document = fragment.to_document_position(position).unwrap();
            assert_eq!(fragment.to_source_position(in_document), Some(position));
        }
    }
    assert_eq!(expected, text.len());
}

#[test]
fn test_identifiers_from_extension_methods() {
    let assembler = template_assembler();
    let identifiers = assembler.identifiers().unwrap();
    let names: Vec<&str> = identifiers.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Keys", "IsKey", "Label"]);

    let keys = &identifiers[0];
    assert_eq!(keys.declared_context, "entity");
    assert_eq!(keys.target_context.as_deref(), Some("property"));
    assert!(keys.is_collection_valued);
    assert!(keys.requires_template_argument);

    let is_key = &identifiers[1];
    assert_eq!(is_key.declared_context, "property");
    assert!(is_key.is_boolean);
    assert_eq!(is_key.summary, "(extension) bool IsKey");

    assert_eq!(identifiers[2].summary, "(extension) string Label");
}

#[test]
fn test_completions_merge_members_and_extensions() {
    let assembler = template_assembler();
    let items = assembler.completions_for("property").unwrap().unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Name", "IsKey", "IsKey", "Label"]);
    assert!(!items[1].is_user_defined);
    assert!(items[2].is_user_defined);

    assert!(assembler.completions_for("widget").unwrap().is_none());
}

#[test]
fn test_symbols_inside_lambda_body() {
    let assembler = template_assembler();
    let caret = offset_of(TEMPLATE, "p.IsKey()");

    let symbol = assembler.symbol_at(caret).unwrap().unwrap();
    assert_eq!(symbol.name, "p");
    assert_eq!(symbol.kind, SymbolKind::Parameter);
    assert_eq!(symbol.type_name.as_deref(), Some("Property"));

    let recommended = assembler.recommended_symbols_at(caret).unwrap();
    assert!(recommended.iter().any(|s| s.name == "p"));
    assert!(recommended.iter().any(|s| s.name == "IsKey"));
    assert!(recommended.iter().all(|s| !s.name.starts_with("__")));

    // The declaration of `IsKey` is template code and maps back to it
    let is_key = recommended.iter().find(|s| s.name == "IsKey").unwrap();
    let declaration = is_key.declaration.unwrap();
    assert_eq!(&TEMPLATE[declaration.start..declaration.end], "IsKey");
}

#[test]
fn test_positions_outside_fragments_are_empty() {
    let assembler = template_assembler();
    // Inside the `<#+` markup and inside the stripped lambda arrow
    for position in [offset_of(TEMPLATE, "<#+"), offset_of(TEMPLATE, "=> p") + 1] {
        assert!(assembler.symbol_at(position).unwrap().is_none());
        assert!(assembler.recommended_symbols_at(position).unwrap().is_empty());
    }
}

#[test]
fn test_compile_promotes_methods() {
    let assembler = template_assembler();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("snippets.cs");

    let report = assembler.compile(&out).unwrap();
    assert!(report.success);
    assert!(report.diagnostics.is_empty());
    assert!(report.unmapped.is_empty());
    assert_eq!(report.promoted_methods, 4);

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("public static bool IsKey(this Property p)"));
    assert!(written.contains("public static bool __"));
}

#[test]
fn test_compile_reports_template_errors() {
    let mut assembler = assembler();
    assembler.add_block("var s = \"open;", 10).unwrap();
    assembler.finalize().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("snippets.cs");
    let report = assembler.compile(&out).unwrap();

    assert!(!report.success);
    assert!(!out.exists());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].range.start, 18);
    assert_eq!(report.diagnostics[0].message, "unterminated string literal");
}

#[test]
fn test_new_cycle_replaces_previous_document() {
    let mut assembler = template_assembler();
    assert!(!assembler.identifiers().unwrap().is_empty());

    assembler.clear();
    assert!(matches!(assembler.identifiers(), Err(AssemblerError::NotFinalized)));
    assembler.add_block("var y = 2;", 0).unwrap();
    assembler.finalize().unwrap();
    assert!(assembler.identifiers().unwrap().is_empty());
    assert_eq!(assembler.tokens().unwrap()[0].range, OffsetRange::new(0, 3));
}

fn finalized(build: impl FnOnce(&mut TestAssembler)) -> TestAssembler {
    let mut assembler = assembler();
    build(&mut assembler);
    assembler.finalize().unwrap();
    assembler
}

#[test]
fn test_unclosed_brace_in_block_is_reported() {
    // The block's `{` pairs with the wrapper's `}`, leaving the namespace
    // brace open; the error lands at the start of the block.
    let assembler = finalized(|a| a.add_block("if (x) {", 10).unwrap());

    let errors = assembler.error_tokens().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "unclosed `{`");
    assert_eq!(errors[0].range, OffsetRange::at(10));
    assert!(errors[0].severity.is_error());
}

#[test]
fn test_extra_closing_brace_in_block_is_reported() {
    let assembler = finalized(|a| a.add_block("}", 10).unwrap());

    let errors = assembler.error_tokens().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "unexpected closing `}`");
    assert_eq!(errors[0].range, OffsetRange::at(11));
}

#[test]
fn test_line_comment_in_lambda_is_reported() {
    // The comment swallows the generated `; }` after the body
    let assembler =
        finalized(|a| a.add_lambda("(p) => p.IsKey // note", "Property", "p", 0).unwrap());

    let errors = assembler.error_tokens().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "unclosed `{`");
    assert_eq!(errors[0].range, OffsetRange::at(7));
}

#[test]
fn test_compile_reports_errors_in_generated_text() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("snippets.cs");

    let unbalanced = finalized(|a| a.add_block("}", 10).unwrap());
    let report = unbalanced.compile(&out).unwrap();
    assert!(!report.success);
    assert!(!out.exists());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].range, OffsetRange::at(11));
    assert!(report.unmapped.is_empty());

    let commented =
        finalized(|a| a.add_lambda("(p) => p.IsKey // note", "Property", "p", 0).unwrap());
    let report = commented.compile(&out).unwrap();
    assert!(!report.success);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].message, "unclosed `{`");
    assert_eq!(report.diagnostics[0].range, OffsetRange::at(7));
    assert!(report.unmapped.is_empty());
}
