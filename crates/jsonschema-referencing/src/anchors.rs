//! Lazy anchor indexing: `$id`/`id` fragments and `$anchor` names.
use ahash::AHashMap;
use serde_json::Value;

/// Maps bare fragment names (without the leading `#`) to the sub-schema they
/// designate within one resource.
pub type AnchorIndex = AHashMap<String, Value>;

/// Builds the anchor index for `root` by a full scan: every object carrying
/// `$id`/`id` whose value starts with `#`, and every `$anchor`, is recorded.
/// The first occurrence of a duplicate name wins; duplicates are reported
/// through `on_duplicate`.
pub fn build(root: &Value, on_duplicate: &mut dyn FnMut(&str)) -> AnchorIndex {
    let mut index = AHashMap::default();
    walk(root, &mut index, on_duplicate);
    index
}

fn walk(value: &Value, index: &mut AnchorIndex, on_duplicate: &mut dyn FnMut(&str)) {
    let Value::Object(map) = value else {
        if let Value::Array(items) = value {
            for item in items {
                walk(item, index, on_duplicate);
            }
        }
        return;
    };

    for key in ["$id", "id", "$anchor", "$dynamicAnchor"] {
        if let Some(Value::String(raw)) = map.get(key) {
            let name = if key == "$id" || key == "id" {
                raw.strip_prefix('#').map(str::to_string)
            } else {
                Some(raw.clone())
            };
            if let Some(name) = name {
                if !name.is_empty() {
                    insert(index, name, value.clone(), on_duplicate);
                }
            }
        }
    }

    for (key, nested) in map {
        if key.starts_with('$') && matches!(nested, Value::Bool(_)) {
            continue;
        }
        walk(nested, index, on_duplicate);
    }
}

fn insert(index: &mut AnchorIndex, name: String, value: Value, on_duplicate: &mut dyn FnMut(&str)) {
    if index.contains_key(&name) {
        on_duplicate(&name);
        return;
    }
    index.insert(name, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn indexes_dollar_anchor() {
        let schema = json!({
            "$defs": {
                "positiveInt": { "$anchor": "positiveInt", "type": "integer", "minimum": 0 }
            }
        });
        let mut duplicates = Vec::new();
        let index = build(&schema, &mut |name| duplicates.push(name.to_string()));
        assert!(index.contains_key("positiveInt"));
        assert!(duplicates.is_empty());
    }

    #[test]
    fn indexes_bare_fragment_id() {
        let schema = json!({ "definitions": { "inner": { "$id": "#inner" } } });
        let mut duplicates = Vec::new();
        let index = build(&schema, &mut |_| duplicates.push(String::new()));
        assert!(index.contains_key("inner"));
    }

    #[test]
    fn reports_duplicate_anchor_names() {
        let schema = json!({
            "$defs": {
                "a": { "$anchor": "dup" },
                "b": { "$anchor": "dup" }
            }
        });
        let mut duplicates = Vec::new();
        let _ = build(&schema, &mut |name| duplicates.push(name.to_string()));
        assert_eq!(duplicates, vec!["dup".to_string()]);
    }
}
