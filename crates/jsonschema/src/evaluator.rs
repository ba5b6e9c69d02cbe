//! The recursive schema evaluator: walks a syntax-tree node against a
//! schema value, accumulating problems into a [`ValidationResult`] and
//! applicability records into the context's collector.
use ahash::AHashSet;
use jsonschema_document::{ErrorCode, JsonDocument, NodeId, NodeKind, NodePayload, Severity};
use jsonschema_referencing::Draft;
use serde_json::{Map, Value};

use crate::{
    accumulator::ValidationResult,
    applicability::ApplicabilityCollector,
    context::EvalContext,
    format::validate_format,
    numeric::{is_multiple_of, Bound},
    pattern::convert_regex,
};

/// Forwards applicability records with `inverted` flipped; used for the
/// duration of evaluating a `not` branch's inner schema.
struct InvertingCollector<'a> {
    inner: &'a mut dyn ApplicabilityCollector,
}

impl ApplicabilityCollector for InvertingCollector<'_> {
    fn record(&mut self, node: NodeId, schema: &Value, inverted: bool) {
        self.inner.record(node, schema, !inverted);
    }

    fn focus_offset(&self) -> Option<usize> {
        self.inner.focus_offset()
    }
}

/// Evaluates `schema` against `node`, returning the accumulated result.
///
/// If `node` is a property node it is unwrapped to its value node first (a
/// property with no value short-circuits to an empty, trivially-valid
/// result — there is nothing to check a schema against).
pub fn evaluate(doc: &JsonDocument, node: NodeId, schema: &Value, ctx: &mut EvalContext<'_>) -> ValidationResult {
    let node = match &doc.get(node).payload {
        NodePayload::Property { value, .. } => match value {
            Some(v) => *v,
            None => return ValidationResult::new(),
        },
        _ => node,
    };
    let range = doc.get(node).range;
    if !ctx.in_focus(range) {
        return ValidationResult::new();
    }

    let mut result = ValidationResult::new();
    match schema {
        Value::Bool(true) => {}
        Value::Bool(false) => {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, "Matches a schema that is always false.");
        }
        Value::Object(schema_map) => {
            evaluate_generic(doc, node, range, schema_map, ctx, &mut result);
            evaluate_type_specific(doc, node, range, schema_map, ctx, &mut result);
        }
        _ => {}
    }
    ctx.collector.record(node, schema, false);
    result
}

fn key_range(doc: &JsonDocument, node: NodeId, fallback: jsonschema_document::Range) -> jsonschema_document::Range {
    if doc.is_property_value(node) {
        if let Some(parent) = doc.parent_of(node) {
            if let NodePayload::Property { key, .. } = &parent.payload {
                return doc.get(*key).range;
            }
        }
    }
    fallback
}

fn evaluate_generic(
    doc: &JsonDocument,
    node: NodeId,
    range: jsonschema_document::Range,
    schema_map: &Map<String, Value>,
    ctx: &mut EvalContext<'_>,
    result: &mut ValidationResult,
) {
    if let Some(type_value) = schema_map.get("type") {
        let (matched, expected) = match type_value {
            Value::String(t) => (node_matches_type(doc, node, t), format!("\"{t}\"")),
            Value::Array(types) => {
                let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
                (names.iter().any(|t| node_matches_type(doc, node, t)), names.iter().map(|t| format!("\"{t}\"")).collect::<Vec<_>>().join(", "))
            }
            _ => (true, String::new()),
        };
        if matched {
            result.primary_value_match_count += 1;
        } else {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Incorrect type. Expected {expected}."));
        }
    }

    if let Some(Value::Array(candidates)) = schema_map.get("enum") {
        let instance = doc.to_value(node);
        result.enum_candidates.push(candidates.clone());
        if candidates.contains(&instance) {
            result.enum_matched = true;
        } else {
            let values = candidates.iter().map(Value::to_string).collect::<Vec<_>>().join(", ");
            result.push_problem(range, Severity::Error, ErrorCode::EnumValueMismatch, format!("Value is not accepted. Valid values: {values}."));
        }
    }

    if let Some(expected) = schema_map.get("const") {
        let instance = doc.to_value(node);
        if instance == *expected {
            result.enum_matched = true;
        } else {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Value must be {expected}."));
        }
    }

    if let Some(Value::Array(branches)) = schema_map.get("allOf") {
        for branch in branches {
            let sub = evaluate(doc, node, branch, ctx);
            result.merge(sub);
        }
    }

    if let Some(Value::Array(branches)) = schema_map.get("anyOf") {
        let mut best: Option<ValidationResult> = None;
        let mut passing = Vec::new();
        for branch in branches {
            let sub = evaluate(doc, node, branch, ctx);
            if sub.is_valid() {
                passing.push(sub.clone());
            }
            if best.as_ref().map_or(true, |b| sub.is_better_than(b)) {
                best = Some(sub);
            }
        }
        if passing.len() > 1 {
            let mut merged = ValidationResult::new();
            for p in passing {
                merged.merge(p);
            }
            result.merge(merged);
        } else if let Some(b) = best {
            result.merge(b);
        }
    }

    if let Some(Value::Array(branches)) = schema_map.get("oneOf") {
        let mut best: Option<ValidationResult> = None;
        let mut pass_count = 0;
        for branch in branches {
            let sub = evaluate(doc, node, branch, ctx);
            if sub.is_valid() {
                pass_count += 1;
            }
            if best.as_ref().map_or(true, |b| sub.is_better_than(b)) {
                best = Some(sub);
            }
        }
        if let Some(b) = best {
            result.merge(b);
        }
        if pass_count > 1 {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, "Matches multiple schemas when only one must validate.");
        }
    }

    if let Some(not_schema) = schema_map.get("not") {
        let mut inverting = InvertingCollector { inner: &mut *ctx.collector };
        let mut inner_ctx = EvalContext { draft: ctx.draft, collector: &mut inverting };
        let scratch = evaluate(doc, node, not_schema, &mut inner_ctx);
        if scratch.is_valid() {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, "Matches a schema that is not allowed.");
        }
    }

    if let Some(if_schema) = schema_map.get("if") {
        let if_result = evaluate(doc, node, if_schema, ctx);
        result.processed_properties.extend(if_result.processed_properties.iter().cloned());
        result.processed_items.extend(if_result.processed_items.iter().copied());
        if if_result.is_valid() {
            if let Some(then_schema) = schema_map.get("then") {
                result.merge(evaluate(doc, node, then_schema, ctx));
            }
        } else if let Some(else_schema) = schema_map.get("else") {
            result.merge(evaluate(doc, node, else_schema, ctx));
        }
    }

    let is_deprecated = schema_map.get("deprecated").and_then(Value::as_bool).unwrap_or(false) || schema_map.contains_key("deprecationMessage");
    if is_deprecated {
        let message = schema_map.get("deprecationMessage").and_then(Value::as_str).map_or_else(|| "This value is deprecated.".to_string(), str::to_string);
        result.push_problem(key_range(doc, node, range), Severity::Warning, ErrorCode::Deprecated, message);
    }
}

fn node_matches_type(doc: &JsonDocument, node: NodeId, type_name: &str) -> bool {
    let n = doc.get(node);
    match type_name {
        "object" => matches!(n.kind(), NodeKind::Object),
        "array" => matches!(n.kind(), NodeKind::Array),
        "string" => matches!(n.kind(), NodeKind::String),
        "number" => matches!(n.kind(), NodeKind::Number),
        "integer" => n.is_integer(),
        "boolean" => matches!(n.kind(), NodeKind::Boolean),
        "null" => matches!(n.kind(), NodeKind::Null),
        _ => false,
    }
}

fn evaluate_type_specific(
    doc: &JsonDocument,
    node: NodeId,
    range: jsonschema_document::Range,
    schema_map: &Map<String, Value>,
    ctx: &mut EvalContext<'_>,
    result: &mut ValidationResult,
) {
    match doc.get(node).kind() {
        NodeKind::Number => evaluate_number(doc, node, range, schema_map, result),
        NodeKind::String => evaluate_string(doc, node, range, schema_map, result),
        NodeKind::Array => evaluate_array(doc, node, range, schema_map, ctx, result),
        NodeKind::Object => evaluate_object(doc, node, range, schema_map, ctx, result),
        _ => {}
    }
}

fn evaluate_number(doc: &JsonDocument, node: NodeId, range: jsonschema_document::Range, schema_map: &Map<String, Value>, result: &mut ValidationResult) {
    let value = doc.get(node).as_f64().expect("number node");

    if let Some(divisor) = schema_map.get("multipleOf").and_then(Value::as_f64) {
        if !is_multiple_of(value, divisor) {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Value is not a multiple of {divisor}."));
        }
    }

    if let Some(min) = schema_map.get("minimum").and_then(Value::as_f64) {
        let exclusive = matches!(schema_map.get("exclusiveMinimum"), Some(Value::Bool(true)));
        let bound = Bound { limit: min, exclusive };
        if !bound.satisfied_as_lower(value) {
            let kind = if exclusive { "exclusive minimum" } else { "minimum" };
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Value is below the {kind} of {min}."));
        }
    }
    if let Some(limit) = schema_map.get("exclusiveMinimum").and_then(Value::as_f64) {
        let bound = Bound { limit, exclusive: true };
        if !bound.satisfied_as_lower(value) {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Value is below the exclusive minimum of {limit}."));
        }
    }

    if let Some(max) = schema_map.get("maximum").and_then(Value::as_f64) {
        let exclusive = matches!(schema_map.get("exclusiveMaximum"), Some(Value::Bool(true)));
        let bound = Bound { limit: max, exclusive };
        if !bound.satisfied_as_upper(value) {
            let kind = if exclusive { "exclusive maximum" } else { "maximum" };
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Value is above the {kind} of {max}."));
        }
    }
    if let Some(limit) = schema_map.get("exclusiveMaximum").and_then(Value::as_f64) {
        let bound = Bound { limit, exclusive: true };
        if !bound.satisfied_as_upper(value) {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Value is above the exclusive maximum of {limit}."));
        }
    }
}

fn evaluate_string(doc: &JsonDocument, node: NodeId, range: jsonschema_document::Range, schema_map: &Map<String, Value>, result: &mut ValidationResult) {
    let value = doc.get(node).as_str().expect("string node");
    let length = value.chars().count() as u64;

    if let Some(min_length) = schema_map.get("minLength").and_then(Value::as_u64) {
        if length < min_length {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("String is shorter than the minimum length of {min_length}."));
        }
    }
    if let Some(max_length) = schema_map.get("maxLength").and_then(Value::as_u64) {
        if length > max_length {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("String is longer than the maximum length of {max_length}."));
        }
    }
    if let Some(Value::String(pattern)) = schema_map.get("pattern") {
        if let Ok(re) = convert_regex(pattern) {
            if !re.is_match(value).unwrap_or(false) {
                let message = schema_map
                    .get("patternErrorMessage")
                    .and_then(Value::as_str)
                    .map_or_else(|| format!("String does not match the pattern of \"{pattern}\"."), str::to_string);
                result.push_problem(range, Severity::Error, ErrorCode::Undefined, message);
            }
        }
    }
    if let Some(Value::String(format_name)) = schema_map.get("format") {
        if !validate_format(format_name, value) {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("String does not match format \"{format_name}\"."));
        }
    }
}

fn evaluate_array(
    doc: &JsonDocument,
    node: NodeId,
    range: jsonschema_document::Range,
    schema_map: &Map<String, Value>,
    ctx: &mut EvalContext<'_>,
    result: &mut ValidationResult,
) {
    let items: Vec<NodeId> = match &doc.get(node).payload {
        NodePayload::Array { items } => items.clone(),
        _ => Vec::new(),
    };
    let mut processed: AHashSet<usize> = AHashSet::new();

    if matches!(ctx.draft, Draft::Draft202012) {
        if let Some(Value::Array(prefix_schemas)) = schema_map.get("prefixItems") {
            for (i, item_schema) in prefix_schemas.iter().enumerate() {
                if let Some(item_node) = items.get(i) {
                    result.merge(evaluate(doc, *item_node, item_schema, ctx));
                    processed.insert(i);
                }
            }
        }
        if let Some(items_schema) = schema_map.get("items") {
            for (i, item_node) in items.iter().enumerate() {
                if processed.contains(&i) {
                    continue;
                }
                result.merge(evaluate(doc, *item_node, items_schema, ctx));
                processed.insert(i);
            }
        }
    } else {
        match schema_map.get("items") {
            Some(Value::Array(item_schemas)) => {
                for (i, item_schema) in item_schemas.iter().enumerate() {
                    if let Some(item_node) = items.get(i) {
                        result.merge(evaluate(doc, *item_node, item_schema, ctx));
                        processed.insert(i);
                    }
                }
                if let Some(additional_schema) = schema_map.get("additionalItems") {
                    for (i, item_node) in items.iter().enumerate() {
                        if processed.contains(&i) {
                            continue;
                        }
                        result.merge(evaluate(doc, *item_node, additional_schema, ctx));
                        processed.insert(i);
                    }
                }
            }
            Some(single_schema) => {
                for (i, item_node) in items.iter().enumerate() {
                    result.merge(evaluate(doc, *item_node, single_schema, ctx));
                    processed.insert(i);
                }
            }
            None => {}
        }
    }

    if let Some(contains_schema) = schema_map.get("contains") {
        let min_contains = schema_map.get("minContains").and_then(Value::as_u64).unwrap_or(1);
        let max_contains = schema_map.get("maxContains").and_then(Value::as_u64);
        let match_count = items.iter().filter(|item_node| evaluate(doc, **item_node, contains_schema, ctx).is_valid()).count() as u64;
        if min_contains > 0 && match_count < min_contains {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Array has too few items matching the required schema. Minimum is {min_contains}."));
        }
        if let Some(max_contains) = max_contains {
            if match_count > max_contains {
                result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Array has too many items matching the required schema. Maximum is {max_contains}."));
            }
        }
    }

    if let Some(unevaluated_schema) = schema_map.get("unevaluatedItems") {
        for (i, item_node) in items.iter().enumerate() {
            if processed.contains(&i) {
                continue;
            }
            result.merge(evaluate(doc, *item_node, unevaluated_schema, ctx));
            processed.insert(i);
        }
    }
    result.processed_items.extend(processed);

    if let Some(min_items) = schema_map.get("minItems").and_then(Value::as_u64) {
        if (items.len() as u64) < min_items {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Array has too few items. Expected at least {min_items}."));
        }
    }
    if let Some(max_items) = schema_map.get("maxItems").and_then(Value::as_u64) {
        if (items.len() as u64) > max_items {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Array has too many items. Expected at most {max_items}."));
        }
    }
    if schema_map.get("uniqueItems").and_then(Value::as_bool) == Some(true) {
        let values: Vec<Value> = items.iter().map(|id| doc.to_value(*id)).collect();
        let has_duplicate = values.iter().enumerate().any(|(i, v)| values[..i].contains(v));
        if has_duplicate {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, "Array has duplicate items.");
        }
    }
}

fn evaluate_object(
    doc: &JsonDocument,
    node: NodeId,
    range: jsonschema_document::Range,
    schema_map: &Map<String, Value>,
    ctx: &mut EvalContext<'_>,
    result: &mut ValidationResult,
) {
    let property_ids: Vec<NodeId> = match &doc.get(node).payload {
        NodePayload::Object { properties } => properties.clone(),
        _ => Vec::new(),
    };
    let by_name: Vec<(String, NodeId, Option<NodeId>)> = property_ids
        .iter()
        .filter_map(|prop_id| match &doc.get(*prop_id).payload {
            NodePayload::Property { key, value, .. } => doc.get(*key).as_str().map(|name| (name.to_string(), *key, *value)),
            _ => None,
        })
        .collect();
    let has_property = |name: &str| by_name.iter().any(|(n, _, _)| n == name);

    if let Some(Value::Array(required)) = schema_map.get("required") {
        for req in required.iter().filter_map(Value::as_str) {
            if !has_property(req) {
                result.push_problem(key_range(doc, node, range), Severity::Error, ErrorCode::Undefined, format!("Missing property \"{req}\"."));
            }
        }
    }

    let mut processed_properties: AHashSet<String> = AHashSet::new();
    if let Some(Value::Object(props_schema)) = schema_map.get("properties") {
        for (name, sub_schema) in props_schema {
            if let Some((_, _, Some(value_node))) = by_name.iter().find(|(n, _, _)| n == name) {
                result.merge(evaluate(doc, *value_node, sub_schema, ctx));
                result.property_match_count += 1;
                result.property_value_match_count += 1;
            }
            processed_properties.insert(name.clone());
        }
    }
    if let Some(Value::Object(pattern_props)) = schema_map.get("patternProperties") {
        for (pattern_str, sub_schema) in pattern_props {
            if let Ok(re) = convert_regex(pattern_str) {
                for (name, _, value_opt) in &by_name {
                    if re.is_match(name).unwrap_or(false) {
                        if let Some(value_node) = value_opt {
                            result.merge(evaluate(doc, *value_node, sub_schema, ctx));
                        }
                        processed_properties.insert(name.clone());
                    }
                }
            }
        }
    }
    if let Some(additional_schema) = schema_map.get("additionalProperties") {
        for (name, key_node, value_opt) in &by_name {
            if processed_properties.contains(name) {
                continue;
            }
            if let Value::Bool(false) = additional_schema {
                result.push_problem(doc.get(*key_node).range, Severity::Error, ErrorCode::Undefined, format!("Property {name} is not allowed."));
            } else if let Some(value_node) = value_opt {
                result.merge(evaluate(doc, *value_node, additional_schema, ctx));
            }
            processed_properties.insert(name.clone());
        }
    }
    if let Some(unevaluated_schema) = schema_map.get("unevaluatedProperties") {
        for (name, key_node, value_opt) in &by_name {
            if processed_properties.contains(name) {
                continue;
            }
            if let Value::Bool(false) = unevaluated_schema {
                result.push_problem(doc.get(*key_node).range, Severity::Error, ErrorCode::Undefined, format!("Property {name} is not allowed."));
            } else if let Some(value_node) = value_opt {
                result.merge(evaluate(doc, *value_node, unevaluated_schema, ctx));
            }
            processed_properties.insert(name.clone());
        }
    }
    result.processed_properties.extend(processed_properties);

    if let Some(names_schema) = schema_map.get("propertyNames") {
        for (_, key_node, _) in &by_name {
            result.merge(evaluate(doc, *key_node, names_schema, ctx));
        }
    }

    if let Some(Value::Object(dependent_required)) = schema_map.get("dependentRequired") {
        for (trigger, required_list) in dependent_required {
            if has_property(trigger) {
                if let Value::Array(required_list) = required_list {
                    for req in required_list.iter().filter_map(Value::as_str) {
                        if !has_property(req) {
                            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Missing property \"{req}\"."));
                        }
                    }
                }
            }
        }
    }
    if let Some(Value::Object(dependent_schemas)) = schema_map.get("dependentSchemas") {
        for (trigger, sub_schema) in dependent_schemas {
            if has_property(trigger) {
                result.merge(evaluate(doc, node, sub_schema, ctx));
            }
        }
    }
    if let Some(Value::Object(dependencies)) = schema_map.get("dependencies") {
        for (trigger, dependency) in dependencies {
            if !has_property(trigger) {
                continue;
            }
            match dependency {
                Value::Array(required_list) => {
                    for req in required_list.iter().filter_map(Value::as_str) {
                        if !has_property(req) {
                            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Missing property \"{req}\"."));
                        }
                    }
                }
                schema_value => result.merge(evaluate(doc, node, schema_value, ctx)),
            }
        }
    }

    if let Some(min_properties) = schema_map.get("minProperties").and_then(Value::as_u64) {
        if (by_name.len() as u64) < min_properties {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Object has fewer properties than the required number of {min_properties}."));
        }
    }
    if let Some(max_properties) = schema_map.get("maxProperties").and_then(Value::as_u64) {
        if (by_name.len() as u64) > max_properties {
            result.push_problem(range, Severity::Error, ErrorCode::Undefined, format!("Object has more properties than the allowed number of {max_properties}."));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicability::{NoOpCollector, RecordingCollector};
    use jsonschema_document::parse;
    use serde_json::json;

    fn run(text: &str, schema: &Value) -> ValidationResult {
        let doc = parse(text, Default::default());
        let root = doc.root.expect("root parses");
        let mut collector = NoOpCollector;
        let mut ctx = EvalContext::new(Draft::latest(), &mut collector);
        evaluate(&doc, root, schema, &mut ctx)
    }

    #[test]
    fn type_mismatch_reports_incorrect_type() {
        let result = run("42", &json!({"type": "string"}));
        assert_eq!(result.problems.len(), 1);
        assert_eq!(result.problems[0].message, "Incorrect type. Expected \"string\".");
        assert_eq!(result.problems[0].range, jsonschema_document::Range::new(0, 2));
    }

    #[test]
    fn missing_required_property_targets_opening_brace() {
        let result = run("{\"a\":1}", &json!({"type": "object", "required": ["b"]}));
        assert_eq!(result.problems.len(), 1);
        assert_eq!(result.problems[0].message, "Missing property \"b\".");
        assert_eq!(result.problems[0].range.offset, 0);
    }

    #[test]
    fn all_of_merges_every_branch_problem() {
        let result = run("\"x\"", &json!({"allOf": [{"minLength": 5}, {"maxLength": 1}]}));
        assert_eq!(result.problems.len(), 1);
    }

    #[test]
    fn any_of_picks_the_passing_branch() {
        let result = run("5", &json!({"anyOf": [{"type": "string"}, {"type": "number"}]}));
        assert!(result.is_valid());
    }

    #[test]
    fn one_of_flags_multiple_matching_branches() {
        let result = run("5", &json!({"oneOf": [{"type": "number"}, {"minimum": 0}]}));
        assert_eq!(result.problems.len(), 1);
        assert_eq!(result.problems[0].message, "Matches multiple schemas when only one must validate.");
    }

    #[test]
    fn not_rejects_when_inner_schema_matches() {
        let result = run("5", &json!({"not": {"type": "number"}}));
        assert_eq!(result.problems.len(), 1);
    }

    #[test]
    fn not_passes_when_inner_schema_fails() {
        let result = run("\"x\"", &json!({"not": {"type": "number"}}));
        assert!(result.is_valid());
    }

    #[test]
    fn if_then_else_picks_the_matching_branch() {
        let schema = json!({"if": {"minimum": 0}, "then": {"maximum": 10}, "else": {"maximum": 100}});
        assert!(run("5", &schema).is_valid());
        assert!(!run("50", &schema).is_valid());
        assert!(run("-50", &schema).is_valid());
    }

    #[test]
    fn pattern_properties_validate_matching_keys() {
        let schema = json!({"patternProperties": {"^S_": {"type": "string"}}});
        assert!(run("{\"S_a\": \"ok\"}", &schema).is_valid());
        assert!(!run("{\"S_a\": 1}", &schema).is_valid());
    }

    #[test]
    fn additional_properties_false_rejects_unlisted_keys() {
        let schema = json!({"properties": {"a": true}, "additionalProperties": false});
        assert!(run("{\"a\":1}", &schema).is_valid());
        assert!(!run("{\"a\":1,\"b\":2}", &schema).is_valid());
    }

    #[test]
    fn draft_2020_12_uses_prefix_items_then_items() {
        let schema = json!({"prefixItems": [{"type": "string"}], "items": {"type": "number"}});
        assert!(run("[\"a\", 1, 2]", &schema).is_valid());
        assert!(!run("[\"a\", \"b\"]", &schema).is_valid());
    }

    #[test]
    fn contains_with_min_contains_zero_suppresses_the_error() {
        let schema = json!({"contains": {"type": "string"}, "minContains": 0});
        assert!(run("[1, 2, 3]", &schema).is_valid());
    }

    #[test]
    fn unique_items_detects_duplicates() {
        assert!(run("[1, 2, 3]", &json!({"uniqueItems": true})).is_valid());
        assert!(!run("[1, 2, 1]", &json!({"uniqueItems": true})).is_valid());
    }

    #[test]
    fn exclusive_minimum_boolean_modifies_minimum_in_draft4_style() {
        let schema = json!({"minimum": 5, "exclusiveMinimum": true});
        assert!(!run("5", &schema).is_valid());
        assert!(run("5.1", &schema).is_valid());
    }

    #[test]
    fn exclusive_minimum_number_is_an_independent_bound() {
        let schema = json!({"minimum": 0, "exclusiveMinimum": 5});
        assert!(!run("5", &schema).is_valid());
        assert!(run("5.1", &schema).is_valid());
    }

    #[test]
    fn not_inverts_applicability_records() {
        let doc = parse("5", Default::default());
        let root = doc.root.expect("root");
        let mut collector = RecordingCollector::new();
        let mut ctx = EvalContext::new(Draft::latest(), &mut collector);
        let inner_schema = json!({"type": "number"});
        evaluate(&doc, root, &json!({"not": inner_schema}), &mut ctx);
        let inner_record = collector.records.iter().find(|r| r.schema == json!({"type": "number"})).expect("inner record present");
        assert!(inner_record.inverted);
    }

    #[test]
    fn deprecated_targets_the_parent_property_key() {
        let doc = parse("{\"a\": 1}", Default::default());
        let root = doc.root.expect("root");
        let a_value = doc.get_property(root, "a").expect("a has a value");
        let mut collector = NoOpCollector;
        let mut ctx = EvalContext::new(Draft::latest(), &mut collector);
        let result = evaluate(&doc, a_value, &json!({"deprecated": true}), &mut ctx);
        assert_eq!(result.problems.len(), 1);
        assert_eq!(result.problems[0].severity, Severity::Warning);
        assert_eq!(result.problems[0].range, jsonschema_document::Range::new(1, 3));
    }
}
