//! Schema retrieval, caching and `$ref`/`$id`/`$anchor` resolution.
//!
//! This crate owns the mutable half of schema handling: a per-URI
//! [`cache::Registry`] that lazily loads schemas through a caller-supplied
//! [`Retrieve`] callback, resolves references by copy-merging referenced
//! content into the nodes that point at it, and tracks dependencies so a
//! resource change can invalidate exactly the handles it affects. It has no
//! opinion on what the schema content *means* — that's the validator's job.
mod anchors;
mod cache;
mod error;
mod glob;
mod resolver;
mod retriever;
mod specification;
mod uri;

pub use cache::{Registry, SchemaHandle};
pub use error::Error;
pub use resolver::resolve_schema;
pub use retriever::{DefaultRetriever, Retrieve};
pub use specification::Draft;
pub use uri::{normalize as normalize_uri, resolve as resolve_uri, split_fragment};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_for_resource_prefers_document_schema_ref() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_contributed("https://example.com/package.json", json!({"type": "object"}), &["package.json".to_string()]);
        let result = registry.schema_for_resource("file:///repo/package.json", Some("https://example.com/package.json"));
        assert_eq!(result, Some(json!({ "$ref": "https://example.com/package.json" })));
    }

    #[test]
    fn schema_for_resource_combines_multiple_pattern_matches() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_contributed("https://example.com/a.json", json!({}), &["*.json".to_string()]);
        registry.register_contributed("https://example.com/b.json", json!({}), &["config.json".to_string()]);
        let result = registry.schema_for_resource("file:///repo/config.json", None).unwrap();
        let refs = result["allOf"].as_array().unwrap();
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn clearing_external_schemas_keeps_contributed_ones() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_contributed("https://example.com/contrib.json", json!({"type": "string"}), &[]);
        registry.register_external("https://example.com/external.json", json!({"type": "number"}), &[]);
        registry.clear_external();
        assert_eq!(registry.get_unresolved_schema("https://example.com/contrib.json"), json!({"type": "string"}));
    }

    #[test]
    fn invalidation_resets_a_resolved_handle() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_external("https://example.com/s.json", json!({"type": "object"}), &[]);
        registry.with_handle("https://example.com/s.json", |h| h.set_resolved(json!({"type": "object"})));
        registry.on_resource_change("https://example.com/s.json");
        registry.with_handle("https://example.com/s.json", |h| assert!(h.resolved().is_none()));
    }
}
