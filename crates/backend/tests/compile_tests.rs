use snippet_backend::{AnalysisBackend, LexicalBackend, OffsetRange};

const VALID: &str = "namespace N\n{\npublic static class W\n{\nbool __5(Entity e) { return e.Active; }\nprivate static PropertyCollection Props(this Entity e) { return e.Properties; }\n}\n}\n";

#[test]
fn compile_writes_promoted_source() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("snippets.cs");

    let mut backend = LexicalBackend::new();
    backend.set_document(VALID);
    let result = backend.compile(&out).unwrap();

    assert!(result.success);
    assert_eq!(result.promoted_methods, 2);
    assert!(result.diagnostics.is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("public static bool __5(Entity e)"));
    assert!(written.contains("public static PropertyCollection Props(this Entity e)"));
}

#[test]
fn compile_refuses_documents_with_errors() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("snippets.cs");

    let mut backend = LexicalBackend::new();
    backend.set_document("class W { void M() { \"unterminated }\n}");
    let result = backend.compile(&out).unwrap();

    assert!(!result.success);
    assert!(!out.exists());
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message == "unterminated string literal"));
}

#[test]
fn compile_reports_io_failures() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing-dir").join("snippets.cs");

    let mut backend = LexicalBackend::new();
    backend.set_document(VALID);
    let err = backend.compile(&out).unwrap_err();
    assert!(err.to_string().contains("Failed to write compiled output"));
}

#[test]
fn new_document_replaces_previous_analysis() {
    let mut backend = LexicalBackend::new();
    backend.set_document(VALID);
    assert_eq!(backend.declared_methods().len(), 2);

    backend.set_document("namespace N { }");
    assert!(backend.declared_methods().is_empty());
    assert!(backend
        .diagnostics(OffsetRange::new(0, "namespace N { }".len()))
        .is_empty());
    assert_eq!(backend.document_text(), Some("namespace N { }"));
}
