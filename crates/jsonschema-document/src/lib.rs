//! Fault-tolerant JSON-with-comments parsing.
//!
//! This crate turns editor-supplied text into a position-preserving syntax
//! tree plus a list of diagnostics, recovering from syntax errors instead of
//! failing outright so downstream tooling (schema validation, navigation)
//! still has something to work with on invalid input.
mod diagnostics;
mod parser;
mod pointer;
mod scanner;
mod syntax_tree;

pub use diagnostics::{dedup_diagnostics, offset_to_position, Diagnostic, ErrorCode, Range, Severity};
pub use parser::{parse, ParseOptions};
pub use pointer::{percent_decode, split_pointer, unescape_segment, JsonPointer, PathSegment};
pub use scanner::{Scanner, Token, TokenKind};
pub use syntax_tree::{CommentRange, JsonDocument, Node, NodeId, NodeKind, NodePayload};

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn parses_object_with_nested_array() {
        let doc = parse(r#"{"a": [1, 2, true]}"#, ParseOptions::default());
        assert!(doc.diagnostics.is_empty());
        let root = doc.root.expect("root node");
        assert_eq!(doc.get(root).kind(), NodeKind::Object);
        let value = doc.get_property(root, "a").expect("property a");
        assert_eq!(doc.get(value).kind(), NodeKind::Array);
    }

    #[test]
    fn recovers_from_missing_comma() {
        let doc = parse(r#"{"a": 1 "b": 2}"#, ParseOptions::default());
        assert!(!doc.diagnostics.is_empty());
        let root = doc.root.expect("root node despite the error");
        assert!(doc.get_property(root, "a").is_some());
    }

    #[test]
    fn reports_trailing_comma_as_warning() {
        let doc = parse(r#"[1, 2,]"#, ParseOptions::default());
        let trailing = doc.diagnostics.iter().find(|d| d.code == ErrorCode::TrailingComma);
        assert!(trailing.is_some());
        assert_eq!(trailing.unwrap().severity, Severity::Warning);
    }

    #[test]
    fn duplicate_keys_flag_first_two_positions_only() {
        let doc = parse(r#"{"a": 1, "a": 2, "a": 3}"#, ParseOptions::default());
        let duplicates: Vec<_> = doc.diagnostics.iter().filter(|d| d.code == ErrorCode::DuplicateKey).collect();
        assert_eq!(duplicates.len(), 2);
    }

    #[test]
    fn double_slash_key_is_exempt_from_duplicate_detection() {
        let doc = parse(r#"{"//": 1, "//": 2}"#, ParseOptions::default());
        assert!(doc.diagnostics.iter().all(|d| d.code != ErrorCode::DuplicateKey));
    }

    #[test]
    fn comments_are_discarded_by_default() {
        let doc = parse("{ /* hi */ \"a\": 1 }", ParseOptions::default());
        assert!(doc.comments.is_empty());
    }

    #[test]
    fn comments_are_collected_when_opted_in() {
        let doc = parse("{ /* hi */ \"a\": 1 }", ParseOptions { collect_comments: true });
        assert_eq!(doc.comments.len(), 1);
    }

    #[test]
    fn path_to_reports_json_pointer_segments() {
        let doc = parse(r#"{"a": [1, {"b": 2}]}"#, ParseOptions::default());
        let root = doc.root.expect("root");
        let a = doc.get_property(root, "a").expect("a");
        let item = match &doc.get(a).payload {
            NodePayload::Array { items } => items[1],
            _ => panic!("expected array"),
        };
        let b = doc.get_property(item, "b").expect("b");
        let path = doc.path_to(b);
        assert_eq!(
            path,
            vec![PathSegment::Key("a".to_string()), PathSegment::Index(1), PathSegment::Key("b".to_string())]
        );
    }

    #[test_case("", true ; "empty source has no root")]
    #[test_case("   ", true ; "whitespace only has no root")]
    #[test_case("1", false ; "bare number has a root")]
    fn root_presence(src: &str, expect_none: bool) {
        let doc = parse(src, ParseOptions::default());
        assert_eq!(doc.root.is_none(), expect_none);
    }

    #[test]
    fn unterminated_object_still_yields_partial_tree() {
        let doc = parse(r#"{"a": 1"#, ParseOptions::default());
        assert!(!doc.diagnostics.is_empty());
        let root = doc.root.expect("partial root");
        assert_eq!(doc.get(root).kind(), NodeKind::Object);
        assert!(doc.get_property(root, "a").is_some());
    }

    #[test]
    fn to_value_round_trips_plain_json() {
        let doc = parse(r#"{"a": 1, "b": [true, null, "x"]}"#, ParseOptions::default());
        let value = doc.root_value();
        assert_eq!(value, serde_json::json!({"a": 1.0, "b": [true, null, "x"]}));
    }
}
