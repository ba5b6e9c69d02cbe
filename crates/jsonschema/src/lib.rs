//! Draft-aware JSON Schema validation over a position-preserving syntax tree.
//!
//! Unlike a validator that compiles a schema into a standalone tree of
//! keyword checks, [`evaluate`] walks the schema directly against a
//! [`jsonschema_document::JsonDocument`], so every problem and every
//! applicability record it produces carries the instance's own byte range —
//! exactly what an editor needs to underline a property or offer completions
//! at a cursor position.
//!
//! - Drafts 4 through 2020-12, auto-detected from `$schema` or pinned by the caller.
//! - `anyOf`/`oneOf` branch selection picks the most specific failing
//!   alternative, the same "best match" heuristic editors use to avoid
//!   dumping every branch's errors on the user at once.
//! - A focus window lets a caller restrict evaluation to the schemas
//!   touching one offset, powering completion without a full-document walk.
//!
//! [`facade::validate_document`] is the entry point most callers want: it
//! resolves the document's schema, runs [`evaluate`], and folds in the
//! syntax tree's own trailing-comma and comment diagnostics.
mod accumulator;
mod applicability;
mod context;
mod evaluator;
mod facade;
mod format;
mod numeric;
mod pattern;

pub use accumulator::{Problem, ValidationResult};
pub use applicability::{ApplicabilityCollector, ApplicabilityRecord, NoOpCollector, RecordingCollector};
pub use context::EvalContext;
pub use evaluator::evaluate;
pub use facade::{matching_schemas, validate_document, DocumentSettings, LanguageSettings};

#[cfg(test)]
mod tests {
    use super::*;
    use jsonschema_document::parse;
    use serde_json::json;

    #[test]
    fn evaluate_is_reachable_as_the_crate_s_public_entry_point() {
        let doc = parse("\"hi\"", Default::default());
        let root = doc.root.expect("root node");
        let mut collector = NoOpCollector;
        let mut ctx = EvalContext::new(jsonschema_referencing::Draft::latest(), &mut collector);
        let result = evaluate(&doc, root, &json!({"type": "string"}), &mut ctx);
        assert!(result.is_valid());
    }
}
