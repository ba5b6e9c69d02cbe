//! The validation façade: the thin dispatcher external collaborators call.
//!
//! Wires together schema resolution, the recursive evaluator, and the
//! parser's own syntax diagnostics into one ordered, deduplicated list.
use jsonschema_document::{Diagnostic, ErrorCode, JsonDocument, NodeId, NodePayload, Severity};
use jsonschema_referencing::{Draft, Registry};
use serde_json::Value;

use crate::{
    applicability::{ApplicabilityCollector, NoOpCollector},
    context::EvalContext,
    evaluator::evaluate,
};

/// Configuration surface applying across an entire language-service
/// instance: whether to validate at all, and whether comments are allowed
/// independent of any schema's own `allowComments` flag.
#[derive(Debug, Clone, Copy)]
pub struct LanguageSettings {
    pub validate: bool,
    pub allow_comments: bool,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        LanguageSettings { validate: true, allow_comments: false }
    }
}

/// Per-document configuration: the three-state severities a host exposes,
/// plus an explicit draft override.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSettings {
    pub comments: Severity,
    pub trailing_commas: Severity,
    pub schema_validation: Severity,
    pub schema_request: Severity,
    pub schema_draft: Option<Draft>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        DocumentSettings {
            comments: Severity::Ignore,
            trailing_commas: Severity::Error,
            schema_validation: Severity::Error,
            schema_request: Severity::Warning,
            schema_draft: None,
        }
    }
}

type WorkspaceResolver<'a> = Option<&'a dyn Fn(&str, &str) -> Option<String>>;

/// Validates `doc` (parsed from `text`, living at `resource_uri`) and
/// returns the full, deduplicated, ordered diagnostic list.
///
/// `explicit_schema` overrides whatever the registry would otherwise
/// associate with `resource_uri` (the caller-supplied-schema path); pass
/// `None` to use the registry's own file-pattern/`$schema` resolution.
pub fn validate_document(
    registry: &Registry,
    resource_uri: &str,
    doc: &JsonDocument,
    text: &str,
    explicit_schema: Option<&Value>,
    language_settings: &LanguageSettings,
    doc_settings: &DocumentSettings,
    workspace_resolver: WorkspaceResolver<'_>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut trailing_comma_diagnostics = Vec::new();
    for diag in &doc.diagnostics {
        if diag.code == ErrorCode::TrailingComma {
            trailing_comma_diagnostics.push(diag);
        } else {
            diagnostics.push(diag.clone());
        }
    }

    let mut allows_comments = language_settings.allow_comments;
    let mut allows_trailing_commas = false;

    if language_settings.validate {
        if let Some(root) = doc.root {
            let doc_schema_ref = schema_property_value(doc, root);
            let wrapper_schema = explicit_schema.cloned().or_else(|| registry.schema_for_resource(resource_uri, doc_schema_ref.as_deref()));

            if let Some(wrapper_schema) = wrapper_schema {
                let synthetic = synthetic_uri(resource_uri);
                registry.register_external(&synthetic, wrapper_schema, &[]);
                let draft = detect_draft(registry, &synthetic, doc_settings.schema_draft);
                let (resolved, errors) = jsonschema_referencing::resolve_schema(registry, &synthetic, draft, workspace_resolver);

                // A failed fetch resolves to a silent empty-object placeholder rather
                // than an entry in `errors` (see `Registry::get_unresolved_schema`), so
                // the handles directly referenced from the wrapper are consulted too.
                let mut load_errors: Vec<String> = errors.iter().map(std::string::ToString::to_string).collect();
                for target in direct_ref_targets(&wrapper_schema) {
                    if let Some(message) = registry.with_handle(&target, jsonschema_referencing::SchemaHandle::load_error) {
                        load_errors.push(message);
                    }
                }

                allows_comments |= schema_declares(&resolved, "allowComments");
                allows_trailing_commas |= schema_declares(&resolved, "allowTrailingCommas");

                if load_errors.is_empty() {
                    if doc_settings.schema_validation != Severity::Ignore {
                        let mut collector = NoOpCollector;
                        let mut ctx = EvalContext::new(draft, &mut collector);
                        let result = evaluate(doc, root, &resolved, &mut ctx);
                        for problem in result.problems {
                            let severity = if problem.code == ErrorCode::Deprecated { Severity::Warning } else { doc_settings.schema_validation };
                            diagnostics.push(Diagnostic::new(problem.range, severity, problem.code, problem.message));
                        }
                    }
                } else if doc_settings.schema_request != Severity::Ignore {
                    let message = load_errors.join("; ");
                    let target = first_schema_property(doc, root).map_or_else(|| doc.get(root).range, |p| doc.get(p).range);
                    diagnostics.push(Diagnostic::new(target, doc_settings.schema_request, ErrorCode::SchemaResolveError, message));
                }
            }
        }
    }

    if doc_settings.trailing_commas != Severity::Ignore && !allows_trailing_commas {
        for diag in trailing_comma_diagnostics {
            diagnostics.push(Diagnostic::new(diag.range, doc_settings.trailing_commas, diag.code, diag.message.clone()));
        }
    }

    if doc_settings.comments != Severity::Ignore && !allows_comments {
        for comment in &doc.comments {
            diagnostics.push(Diagnostic::new(comment.0, doc_settings.comments, ErrorCode::CommentNotPermitted, "Comments are not permitted in JSON."));
        }
    }

    jsonschema_document::dedup_diagnostics(text, diagnostics)
}

/// Runs the validator alone (no syntax/comment augmentation) and returns
/// its raw applicability records — the `getMatchingSchemas` entry point.
pub fn matching_schemas(doc: &JsonDocument, root: NodeId, schema: &Value, draft: Draft, collector: &mut dyn ApplicabilityCollector) {
    let mut ctx = EvalContext::new(draft, collector);
    evaluate(doc, root, schema, &mut ctx);
}

fn schema_property_value(doc: &JsonDocument, root: NodeId) -> Option<String> {
    let value_node = doc.get_property(root, "$schema")?;
    doc.get(value_node).as_str().map(str::to_string)
}

fn first_schema_property(doc: &JsonDocument, root: NodeId) -> Option<NodeId> {
    let NodePayload::Object { properties } = &doc.get(root).payload else {
        return None;
    };
    let first = properties.first()?;
    let NodePayload::Property { key, .. } = &doc.get(*first).payload else {
        return None;
    };
    (doc.get(*key).as_str() == Some("$schema")).then_some(*first)
}

/// Top-level `$ref` targets a schema-lookup wrapper points at — either a bare
/// `{"$ref": uri}` or the `allOf`-of-`$ref`s a combined-schema lookup builds.
fn direct_ref_targets(wrapper: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_ref_targets(wrapper, &mut out);
    out
}

fn collect_ref_targets(value: &Value, out: &mut Vec<String>) {
    let Value::Object(map) = value else {
        return;
    };
    if let Some(Value::String(r)) = map.get("$ref") {
        out.push(r.clone());
    }
    if let Some(Value::Array(branches)) = map.get("allOf") {
        for branch in branches {
            collect_ref_targets(branch, out);
        }
    }
}

fn synthetic_uri(resource_uri: &str) -> String {
    format!("schemaservice://facadeSchema/{}", percent_encoding::utf8_percent_encode(resource_uri, percent_encoding::NON_ALPHANUMERIC))
}

fn detect_draft(registry: &Registry, uri: &str, configured: Option<Draft>) -> Draft {
    if let Some(draft) = configured {
        return draft;
    }
    let raw = registry.get_unresolved_schema(uri);
    raw.get("$schema").and_then(Value::as_str).and_then(|id| Draft::from_schema_id(id).ok()).unwrap_or_else(Draft::latest)
}

/// Whether `schema` (or any of its `allOf` branches) declares `key: true`.
fn schema_declares(schema: &Value, key: &str) -> bool {
    let Value::Object(map) = schema else {
        return false;
    };
    if map.get(key).and_then(Value::as_bool) == Some(true) {
        return true;
    }
    matches!(map.get("allOf"), Some(Value::Array(branches)) if branches.iter().any(|b| schema_declares(b, key)))
}
