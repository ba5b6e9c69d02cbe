//! `$ref`/`$id`/`$anchor` resolution: merges referenced content into the
//! nodes that reference it instead of chasing pointers at validation time,
//! so the validator only ever walks a single self-contained tree.
use serde_json::Value;

use crate::cache::Registry;
use crate::error::Error;
use crate::specification::Draft;
use crate::uri;

type WorkspaceResolver<'a> = Option<&'a dyn Fn(&str, &str) -> Option<String>>;

/// Resolves every `$ref` (and, best-effort, `$dynamicRef`/`$recursiveRef`
/// pointing at the document root) reachable from `base_uri`'s schema,
/// returning the merged tree plus any resolution errors encountered along
/// the way. Errors do not abort resolution: the offending node is left with
/// its `$ref` intact so the caller can report a diagnostic and keep
/// validating everything else.
pub fn resolve_schema(registry: &Registry, base_uri: &str, draft: Draft, workspace_resolver: WorkspaceResolver<'_>) -> (Value, Vec<Error>) {
    let base_uri = uri::normalize(base_uri);
    let doc_root = registry.get_unresolved_schema(&base_uri);
    let mut node = doc_root.clone();
    let mut path = Vec::new();
    let mut errors = Vec::new();
    resolve_node(registry, &base_uri, draft, &doc_root, &mut node, &mut path, workspace_resolver, &mut errors);
    (node, errors)
}

/// `path` holds the cycle keys (see `follow_ref`) currently being expanded,
/// innermost last — it is a stack scoped to the current branch of the
/// recursion, not a set of everything ever visited in the whole pass, so two
/// independent sibling `$ref`s to the same target both expand normally.
#[allow(clippy::too_many_arguments)]
fn resolve_node(
    registry: &Registry,
    declaring_uri: &str,
    draft: Draft,
    doc_root: &Value,
    node: &mut Value,
    path: &mut Vec<String>,
    workspace_resolver: WorkspaceResolver<'_>,
    errors: &mut Vec<Error>,
) {
    let mut pushed = false;
    if let Value::Object(_) = node {
        if let Some(raw_ref) = find_ref_keyword(node, draft) {
            pushed = follow_ref(registry, declaring_uri, draft, doc_root, node, path, &raw_ref, workspace_resolver, errors);
        }
    }

    match node {
        Value::Object(map) => {
            for child in map.values_mut() {
                resolve_node(registry, declaring_uri, draft, doc_root, child, path, workspace_resolver, errors);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                resolve_node(registry, declaring_uri, draft, doc_root, item, path, workspace_resolver, errors);
            }
        }
        _ => {}
    }

    if pushed {
        path.pop();
    }
}

/// Finds which ref-like keyword is present and returns the value to act on.
/// `$dynamicRef`/`$recursiveRef` are flattened to a plain root reference
/// (`#`) rather than given true dynamic-scope semantics; see the crate docs.
fn find_ref_keyword(node: &Value, draft: Draft) -> Option<String> {
    let map = node.as_object()?;
    if let Some(Value::String(r)) = map.get("$ref") {
        return Some(r.clone());
    }
    if draft.supports_dynamic_ref() && map.contains_key("$dynamicRef") {
        return Some("#".to_string());
    }
    if draft.supports_recursive_ref() && map.contains_key("$recursiveRef") {
        return Some("#".to_string());
    }
    None
}

/// Follows `raw_ref`, merging its target into `node` in place. Returns
/// whether a cycle key was pushed onto `path` — the caller pops it again
/// once it has finished recursing into `node`'s (now-merged) children.
#[allow(clippy::too_many_arguments)]
fn follow_ref(
    registry: &Registry,
    declaring_uri: &str,
    draft: Draft,
    doc_root: &Value,
    node: &mut Value,
    path: &mut Vec<String>,
    raw_ref: &str,
    workspace_resolver: WorkspaceResolver<'_>,
    errors: &mut Vec<Error>,
) -> bool {
    let (uri_part, fragment) = uri::split_fragment(raw_ref);

    let (target_root, target_handle_uri) = if uri_part.is_empty() {
        (doc_root.clone(), declaring_uri.to_string())
    } else {
        let resolved = match uri::resolve(declaring_uri, uri_part, workspace_resolver) {
            Ok(resolved) => resolved,
            Err(err) => {
                errors.push(err);
                return false;
            }
        };
        let target = registry.get_unresolved_schema(&resolved);
        registry.record_dependency(declaring_uri, &resolved);
        (target, resolved)
    };

    // A `$ref` is expanded only while its target is already on the current
    // resolution path, keyed by the fully-resolved target (handle URI +
    // fragment) — not once per entire pass. That lets two independent
    // sibling `$ref`s to the same target (the ordinary shared-`$defs`-entry
    // pattern) both inline normally, while a ref that reappears inside its
    // own expansion (an actual cycle, e.g. a linked-list `$defs` entry)
    // is still caught and left unexpanded.
    let cycle_key = format!("{target_handle_uri}#{fragment}");
    if path.contains(&cycle_key) {
        return false;
    }

    let source_value = match resolve_fragment(registry, &target_handle_uri, &target_root, fragment) {
        Ok(value) => value,
        Err(err) => {
            errors.push(err);
            return false;
        }
    };

    merge_into(node, &source_value);
    if let Value::Object(map) = node {
        map.remove("$ref");
        map.remove("$dynamicRef");
        map.remove("$recursiveRef");
    }
    path.push(cycle_key);
    true
}

fn resolve_fragment(registry: &Registry, handle_uri: &str, root: &Value, fragment: &str) -> Result<Value, Error> {
    if fragment.is_empty() {
        return Ok(root.clone());
    }
    if let Some(pointer) = fragment.strip_prefix('/') {
        return pointer_get(root, pointer).cloned().ok_or_else(|| Error::pointer_to_nowhere(fragment));
    }
    let index = registry.with_handle(handle_uri, |h| h.anchor_index(&mut |_dup| {}));
    index.get(fragment).cloned().ok_or_else(|| Error::no_such_anchor(fragment))
}

fn pointer_get<'v>(root: &'v Value, pointer: &str) -> Option<&'v Value> {
    let mut current = root;
    if pointer.is_empty() {
        return Some(current);
    }
    for raw in pointer.split('/') {
        let segment = unescape_pointer_segment(raw);
        current = match current {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn unescape_pointer_segment(raw: &str) -> String {
    percent_decode(raw).replace("~1", "/").replace("~0", "~")
}

fn percent_decode(input: &str) -> String {
    percent_encoding::percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// Copies every key from `source` that is absent on `target`, excluding `id`
/// and `$id` (which would otherwise overwrite the referencing node's own
/// identity).
fn merge_into(target: &mut Value, source: &Value) {
    let (Value::Object(target_map), Value::Object(source_map)) = (target, source) else {
        return;
    };
    for (key, value) in source_map {
        if key == "id" || key == "$id" {
            continue;
        }
        target_map.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::DefaultRetriever;
    use serde_json::json;

    #[test]
    fn merges_local_ref_by_pointer() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_external(
            "https://example.com/schema.json",
            json!({
                "type": "object",
                "properties": { "a": { "$ref": "#/$defs/pos" } },
                "$defs": { "pos": { "type": "integer", "minimum": 0 } }
            }),
            &[],
        );
        let (resolved, errors) = resolve_schema(&registry, "https://example.com/schema.json", Draft::Draft202012, None);
        assert!(errors.is_empty());
        let a = &resolved["properties"]["a"];
        assert_eq!(a["type"], json!("integer"));
        assert_eq!(a["minimum"], json!(0));
    }

    #[test]
    fn merges_ref_by_anchor() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_external(
            "https://example.com/schema.json",
            json!({
                "properties": { "a": { "$ref": "#positiveInt" } },
                "$defs": { "pos": { "$anchor": "positiveInt", "type": "integer", "minimum": 0 } }
            }),
            &[],
        );
        let (resolved, errors) = resolve_schema(&registry, "https://example.com/schema.json", Draft::Draft202012, None);
        assert!(errors.is_empty());
        assert_eq!(resolved["properties"]["a"]["type"], json!("integer"));
    }

    #[test]
    fn follows_external_ref_and_records_dependency() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_external("https://example.com/base.json", json!({ "$ref": "other.json#/foo" }), &[]);
        registry.register_external("https://example.com/other.json", json!({ "foo": { "type": "string" } }), &[]);
        let (resolved, errors) = resolve_schema(&registry, "https://example.com/base.json", Draft::Draft202012, None);
        assert!(errors.is_empty());
        assert_eq!(resolved["type"], json!("string"));
    }

    #[test]
    fn sibling_refs_to_the_same_shared_def_both_resolve() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_external(
            "https://example.com/schema.json",
            json!({
                "properties": {
                    "a": { "$ref": "#/$defs/pos" },
                    "b": { "$ref": "#/$defs/pos" }
                },
                "$defs": { "pos": { "type": "integer", "minimum": 0 } }
            }),
            &[],
        );
        let (resolved, errors) = resolve_schema(&registry, "https://example.com/schema.json", Draft::Draft202012, None);
        assert!(errors.is_empty());
        for name in ["a", "b"] {
            let prop = &resolved["properties"][name];
            assert_eq!(prop["type"], json!("integer"));
            assert_eq!(prop["minimum"], json!(0));
            assert!(prop.get("$ref").is_none());
        }
    }

    #[test]
    fn stops_on_cyclic_ref_instead_of_looping() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_external(
            "https://example.com/schema.json",
            json!({
                "$defs": {
                    "node": { "properties": { "next": { "$ref": "#/$defs/node" } } }
                },
                "$ref": "#/$defs/node"
            }),
            &[],
        );
        let (_resolved, errors) = resolve_schema(&registry, "https://example.com/schema.json", Draft::Draft202012, None);
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_pointer_target_is_reported_without_aborting() {
        let registry = Registry::new(Box::new(DefaultRetriever));
        registry.register_external("https://example.com/schema.json", json!({ "$ref": "#/$defs/missing" }), &[]);
        let (_resolved, errors) = resolve_schema(&registry, "https://example.com/schema.json", Draft::Draft202012, None);
        assert_eq!(errors.len(), 1);
    }
}
