//! Recursive-descent parser with error recovery.
//!
//! Grammar: JSON with comment and trailing-comma tolerance, a single
//! top-level value. Error recovery is the design centrepiece: on any
//! syntactic error we emit one diagnostic, then skip tokens until a
//! recovery sink (a closing bracket/brace or a comma) or EOF, so the rest
//! of the document still parses into a usable (if partial) tree.
use std::collections::HashMap;

use crate::diagnostics::{Diagnostic, ErrorCode, Range, Severity};
use crate::scanner::{Scanner, Token, TokenKind};
use crate::syntax_tree::{CommentRange, JsonDocument, Node, NodeId, NodePayload};

/// Options controlling parsing behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Collect comment ranges into the resulting document instead of
    /// silently discarding comment trivia.
    pub collect_comments: bool,
}

/// A sink a caller expects recovery to stop at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecoverySink {
    CloseBracket,
    CloseBrace,
    Any,
}

pub(crate) struct Parser<'a> {
    scanner: Scanner<'a>,
    lookahead: Vec<Token>,
    doc: JsonDocument,
    options: ParseOptions,
    diagnostic_offsets: std::collections::HashSet<usize>,
}

/// Parses `source` into a [`JsonDocument`].
#[must_use]
pub fn parse(source: &str, options: ParseOptions) -> JsonDocument {
    let mut parser = Parser {
        scanner: Scanner::new(source),
        lookahead: Vec::new(),
        doc: JsonDocument::new(),
        options,
        diagnostic_offsets: std::collections::HashSet::new(),
    };
    parser.run()
}

impl<'a> Parser<'a> {
    fn run(mut self) -> JsonDocument {
        self.skip_trivia();
        if self.peek().kind != TokenKind::Eof {
            let value = self.parse_value(RecoverySink::Any);
            self.doc.root = value;
            self.skip_trivia();
            if self.peek().kind != TokenKind::Eof {
                self.error_at_current(ErrorCode::ValueExpected, "End of file expected");
            }
        }
        self.doc
    }

    fn peek(&mut self) -> &Token {
        self.fill(1);
        &self.lookahead[0]
    }

    fn peek_n(&mut self, n: usize) -> &Token {
        self.fill(n + 1);
        &self.lookahead[n]
    }

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() < n {
            let tok = self.scanner.next_token();
            self.lookahead.push(tok);
        }
    }

    fn advance(&mut self) -> Token {
        self.fill(1);
        self.lookahead.remove(0)
    }

    /// Advances past trivia, recording comments and surfacing lexical errors
    /// found along the way.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek().kind {
                TokenKind::Whitespace | TokenKind::LineBreak => {
                    self.advance();
                }
                TokenKind::LineComment | TokenKind::BlockComment => {
                    let tok = self.advance();
                    if let Some(code) = tok.error {
                        self.push_diagnostic(Diagnostic::new(
                            Range::new(tok.offset, tok.length),
                            Severity::Error,
                            code,
                            comment_error_message(code),
                        ));
                    }
                    if self.options.collect_comments {
                        self.doc.comments.push(CommentRange(Range::new(tok.offset, tok.length)));
                    }
                }
                _ => break,
            }
        }
    }

    fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        // At most one diagnostic is ever attached to any single start offset.
        if self.diagnostic_offsets.insert(diagnostic.range.offset) {
            self.doc.diagnostics.push(diagnostic);
        }
    }

    fn last_non_trivia_end(&self) -> usize {
        self.scanner.source().trim_end().len()
    }

    fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let tok = self.peek().clone();
        let (offset, length) = if tok.length == 0 {
            (self.last_non_trivia_end().min(tok.offset), 0)
        } else {
            (tok.offset, tok.length)
        };
        self.push_diagnostic(Diagnostic::new(Range::new(offset, length), Severity::Error, code, message));
    }

    fn recover(&mut self, sink: RecoverySink) {
        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::CloseBracket if matches!(sink, RecoverySink::CloseBracket | RecoverySink::Any) => break,
                TokenKind::CloseBrace if matches!(sink, RecoverySink::CloseBrace | RecoverySink::Any) => break,
                TokenKind::Comma if matches!(sink, RecoverySink::Any) => break,
                _ => {
                    self.advance();
                    self.skip_trivia();
                }
            }
        }
    }

    fn parse_value(&mut self, sink: RecoverySink) -> Option<NodeId> {
        self.skip_trivia();
        match self.peek().kind {
            TokenKind::OpenBrace => Some(self.parse_object()),
            TokenKind::OpenBracket => Some(self.parse_array()),
            TokenKind::String => Some(self.parse_string()),
            TokenKind::Number => Some(self.parse_number()),
            TokenKind::True => Some(self.parse_boolean(true)),
            TokenKind::False => Some(self.parse_boolean(false)),
            TokenKind::Null => Some(self.parse_null()),
            _ => {
                self.error_at_current(ErrorCode::ValueExpected, "Value expected");
                self.recover(sink);
                None
            }
        }
    }

    fn parse_string(&mut self) -> NodeId {
        let tok = self.advance();
        let value = tok.string_value.clone().unwrap_or_default();
        if let Some(code) = tok.error {
            self.push_diagnostic(Diagnostic::new(
                Range::new(tok.offset, tok.length),
                Severity::Error,
                code,
                string_error_message(code),
            ));
        }
        self.doc.alloc(Node {
            range: Range::new(tok.offset, tok.length),
            parent: None,
            payload: NodePayload::String { value },
        })
    }

    fn parse_number(&mut self) -> NodeId {
        let tok = self.advance();
        if let Some(code) = tok.error {
            self.push_diagnostic(Diagnostic::new(
                Range::new(tok.offset, tok.length),
                Severity::Error,
                code,
                "Unexpected end of number",
            ));
        }
        let text = &self.scanner.source()[tok.offset..tok.offset + tok.length];
        let is_integer = !text.contains('.') && !text.contains('e') && !text.contains('E');
        let value = text.parse::<f64>().unwrap_or(f64::NAN);
        self.doc.alloc(Node {
            range: Range::new(tok.offset, tok.length),
            parent: None,
            payload: NodePayload::Number { value, is_integer },
        })
    }

    fn parse_boolean(&mut self, value: bool) -> NodeId {
        let tok = self.advance();
        self.doc.alloc(Node {
            range: Range::new(tok.offset, tok.length),
            parent: None,
            payload: NodePayload::Boolean { value },
        })
    }

    fn parse_null(&mut self) -> NodeId {
        let tok = self.advance();
        self.doc.alloc(Node {
            range: Range::new(tok.offset, tok.length),
            parent: None,
            payload: NodePayload::Null,
        })
    }

    fn parse_array(&mut self) -> NodeId {
        let open = self.advance();
        let mut items = Vec::new();
        self.skip_trivia();
        loop {
            if self.peek().kind == TokenKind::CloseBracket || self.peek().kind == TokenKind::Eof {
                break;
            }
            if let Some(item) = self.parse_value(RecoverySink::CloseBracket) {
                items.push(item);
            }
            self.skip_trivia();
            match self.peek().kind {
                TokenKind::Comma => {
                    let comma = self.advance();
                    self.skip_trivia();
                    if self.peek().kind == TokenKind::CloseBracket {
                        self.push_diagnostic(Diagnostic::new(
                            Range::new(comma.offset, comma.length),
                            Severity::Warning,
                            ErrorCode::TrailingComma,
                            "Trailing comma",
                        ));
                        break;
                    }
                }
                TokenKind::CloseBracket | TokenKind::Eof => break,
                _ => {
                    self.error_at_current(ErrorCode::CommaOrCloseBracketExpected, "Expected a comma or closing bracket");
                    self.recover(RecoverySink::CloseBracket);
                    if self.peek().kind != TokenKind::CloseBracket {
                        break;
                    }
                }
            }
        }
        let end = if self.peek().kind == TokenKind::CloseBracket {
            let close = self.advance();
            close.end()
        } else {
            self.error_at_current(ErrorCode::CommaOrCloseBracketExpected, "Expected a closing bracket");
            self.last_non_trivia_end().max(open.end())
        };
        let id = self.doc.alloc(Node {
            range: Range::new(open.offset, end - open.offset),
            parent: None,
            payload: NodePayload::Array { items: items.clone() },
        });
        for item in items {
            self.doc.set_parent(item, id);
        }
        id
    }

    fn parse_object(&mut self) -> NodeId {
        let open = self.advance();
        let mut properties = Vec::new();
        let mut seen_keys: HashMap<String, Vec<usize>> = HashMap::new();
        self.skip_trivia();
        loop {
            if self.peek().kind == TokenKind::CloseBrace || self.peek().kind == TokenKind::Eof {
                break;
            }
            if self.peek().kind != TokenKind::String {
                self.error_at_current(ErrorCode::PropertyExpected, "Property expected");
                self.recover(RecoverySink::CloseBrace);
                if self.peek().kind != TokenKind::CloseBrace {
                    break;
                }
                continue;
            }
            let prop_id = self.parse_property(&mut seen_keys);
            properties.push(prop_id);
            self.skip_trivia();
            match self.peek().kind {
                TokenKind::Comma => {
                    let comma = self.advance();
                    self.skip_trivia();
                    if self.peek().kind == TokenKind::CloseBrace {
                        self.push_diagnostic(Diagnostic::new(
                            Range::new(comma.offset, comma.length),
                            Severity::Warning,
                            ErrorCode::TrailingComma,
                            "Trailing comma",
                        ));
                        break;
                    }
                }
                TokenKind::CloseBrace | TokenKind::Eof => break,
                _ => {
                    self.error_at_current(ErrorCode::CommaOrCloseBraceExpected, "Expected a comma or closing brace");
                    self.recover(RecoverySink::CloseBrace);
                    if self.peek().kind != TokenKind::CloseBrace {
                        break;
                    }
                }
            }
        }
        let end = if self.peek().kind == TokenKind::CloseBrace {
            let close = self.advance();
            close.end()
        } else {
            self.error_at_current(ErrorCode::CommaOrCloseBraceExpected, "Expected a closing brace");
            self.last_non_trivia_end().max(open.end())
        };
        let id = self.doc.alloc(Node {
            range: Range::new(open.offset, end - open.offset),
            parent: None,
            payload: NodePayload::Object { properties: properties.clone() },
        });
        for prop in properties {
            self.doc.set_parent(prop, id);
        }
        id
    }

    fn parse_property(&mut self, seen_keys: &mut HashMap<String, Vec<usize>>) -> NodeId {
        let key_id = self.parse_string();
        let key_name = self.doc.get(key_id).as_str().unwrap_or_default().to_string();
        let key_offset = self.doc.get(key_id).range.offset;

        if key_name != "//" {
            let positions = seen_keys.entry(key_name.clone()).or_default();
            positions.push(key_offset);
            if positions.len() >= 2 {
                // Only the first two positions for any given key ever get a diagnostic.
                if positions.len() <= 2 {
                    for &pos in positions.iter() {
                        self.push_diagnostic(Diagnostic::new(
                            Range::new(pos, self.doc.get(key_id).range.length.max(1)),
                            Severity::Warning,
                            ErrorCode::DuplicateKey,
                            format!("Duplicate object key '{key_name}'"),
                        ));
                    }
                }
            }
        }

        self.skip_trivia();
        let mut colon_offset = None;
        let mut value = None;
        if self.peek().kind == TokenKind::Colon {
            let colon = self.advance();
            colon_offset = Some(colon.offset);
            value = self.parse_value(RecoverySink::Any);
        } else {
            // Missing colon: if the next token is a string literal on a later
            // line, treat the property as valueless (colon-expected only).
            let key_line_end = self.doc.get(key_id).range.end();
            let next_is_string_later_line = self.peek().kind == TokenKind::String
                && line_of(self.scanner.source(), self.peek().offset) > line_of(self.scanner.source(), key_line_end);
            self.error_at_current(ErrorCode::ColonExpected, "Colon expected");
            if !next_is_string_later_line {
                value = self.parse_value(RecoverySink::Any);
            }
        }

        let end = value
            .map(|v| self.doc.get(v).range.end())
            .or(colon_offset.map(|c| c + 1))
            .unwrap_or_else(|| self.doc.get(key_id).range.end());
        let start = self.doc.get(key_id).range.offset;
        let id = self.doc.alloc(Node {
            range: Range::new(start, end.saturating_sub(start)),
            parent: None,
            payload: NodePayload::Property { key: key_id, value, colon_offset },
        });
        self.doc.set_parent(key_id, id);
        if let Some(v) = value {
            self.doc.set_parent(v, id);
        }
        id
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    source.as_bytes()[..offset.min(source.len())].iter().filter(|&&b| b == b'\n').count()
}

fn comment_error_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::UnexpectedEndOfComment => "Unexpected end of comment",
        _ => "Invalid comment",
    }
}

fn string_error_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::UnexpectedEndOfString => "Unexpected end of string",
        ErrorCode::InvalidUnicode => "Invalid unicode sequence in string",
        ErrorCode::InvalidEscapeCharacter => "Invalid escape character in string",
        ErrorCode::InvalidCharacter => "Invalid character in string",
        _ => "Invalid string",
    }
}
