//! Validating across a `$ref` to a separate resource, then confirming that
//! `on_resource_change` invalidates the cached resolution.
use jsonschema_document::{parse, ErrorCode};
use jsonschema_document_validator::{DocumentSettings, LanguageSettings};
use jsonschema_referencing::{DefaultRetriever, Registry};
use serde_json::json;

#[test]
fn revalidation_picks_up_a_changed_dependency() {
    let registry = Registry::new(Box::new(DefaultRetriever));
    registry.register_external(
        "http://s/a",
        json!({"type": "object", "properties": {"x": {"$ref": "http://s/b"}}}),
        &[],
    );
    registry.register_external("http://s/b", json!({"type": "number"}), &[]);

    let text = r#"{"x":"hi"}"#;
    let doc = parse(text, Default::default());
    let diagnostics = jsonschema_document_validator::validate_document(
        &registry,
        "file:///doc.json",
        &doc,
        text,
        Some(&json!({"$ref": "http://s/a"})),
        &LanguageSettings::default(),
        &DocumentSettings::default(),
        None,
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::Undefined);
    assert_eq!(diagnostics[0].message, "Incorrect type. Expected \"number\".");

    registry.register_external("http://s/b", json!({"type": "string"}), &[]);
    registry.on_resource_change("http://s/b");

    let diagnostics = jsonschema_document_validator::validate_document(
        &registry,
        "file:///doc.json",
        &doc,
        text,
        Some(&json!({"$ref": "http://s/a"})),
        &LanguageSettings::default(),
        &DocumentSettings::default(),
        None,
    );
    assert!(diagnostics.is_empty());
}
