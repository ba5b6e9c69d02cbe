//! Diagnostics produced while scanning, parsing and (later) validating a document.
use std::fmt;

/// Stable numeric identifiers for diagnostics raised anywhere in the pipeline.
///
/// Scan errors occupy the 257-262 range, parse errors 513-521, and errors
/// raised further up the stack (schema resolution, semantic validation) use
/// the remaining ranges so a single `ErrorCode` can travel from the scanner
/// all the way to the validation façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Undefined,
    EnumValueMismatch,
    UnexpectedEndOfComment,
    UnexpectedEndOfString,
    UnexpectedEndOfNumber,
    InvalidUnicode,
    InvalidEscapeCharacter,
    InvalidCharacter,
    PropertyExpected,
    CommaExpected,
    ColonExpected,
    ValueExpected,
    CommaOrCloseBracketExpected,
    CommaOrCloseBraceExpected,
    TrailingComma,
    DuplicateKey,
    CommentNotPermitted,
    SchemaResolveError,
    Deprecated,
    PropertyKeysMustBeDoublequoted,
}

impl ErrorCode {
    #[must_use]
    pub fn as_u16(self) -> u16 {
        match self {
            ErrorCode::Undefined => 0,
            ErrorCode::EnumValueMismatch => 1,
            ErrorCode::UnexpectedEndOfComment => 257,
            ErrorCode::UnexpectedEndOfString => 258,
            ErrorCode::UnexpectedEndOfNumber => 259,
            ErrorCode::InvalidUnicode => 260,
            ErrorCode::InvalidEscapeCharacter => 261,
            ErrorCode::InvalidCharacter => 262,
            ErrorCode::PropertyExpected => 513,
            ErrorCode::CommaExpected => 514,
            ErrorCode::ColonExpected => 515,
            ErrorCode::ValueExpected => 516,
            ErrorCode::CommaOrCloseBracketExpected => 517,
            ErrorCode::CommaOrCloseBraceExpected => 518,
            ErrorCode::TrailingComma => 519,
            ErrorCode::DuplicateKey => 520,
            ErrorCode::CommentNotPermitted => 521,
            ErrorCode::SchemaResolveError => 768,
            // Implementation-defined codes have no reserved numeric slot in the
            // stable table; they are only ever compared by variant.
            ErrorCode::Deprecated | ErrorCode::PropertyKeysMustBeDoublequoted => 0xFFFF,
        }
    }
}

/// Diagnostic severity, mirroring the three-state configuration surface
/// (`'error' | 'warning' | 'ignore'`) hosts expose for comments/trailing commas/etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Ignore,
}

/// A half-open byte range within the original UTF-8 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub offset: usize,
    pub length: usize,
}

impl Range {
    #[must_use]
    pub fn new(offset: usize, length: usize) -> Self {
        Range { offset, length }
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A single diagnostic: a byte range, a severity, a stable code and a
/// human-readable message.
///
/// Every diagnostic message is non-empty and specific - a bare "Invalid JSON"
/// must never be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(range: Range, severity: Severity, code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            range,
            severity,
            code,
            message: message.into(),
        }
    }

    /// Zero-based line/character position of this diagnostic's start, computed
    /// against `text`. Used for the (line, character, message) dedup signature.
    #[must_use]
    pub fn start_position(&self, text: &str) -> (u32, u32) {
        offset_to_position(text, self.range.offset)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Converts a byte offset into a zero-based (line, character) position, where
/// `character` counts UTF-16 code units as required by the external position
/// convention (host text is assumed to be valid UTF-8).
#[must_use]
pub fn offset_to_position(text: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(text.len());
    let mut line: u32 = 0;
    let mut line_start = 0usize;
    for (i, ch) in text.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    let character = text[line_start..offset].chars().map(char::len_utf16).sum::<usize>() as u32;
    (line, character)
}

/// Deduplicates diagnostics by the `(line, character, message)` signature, as
/// applied at the outer (façade) boundary. Order of first occurrence is preserved.
#[must_use]
pub fn dedup_diagnostics(text: &str, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen = std::collections::HashSet::new();
    diagnostics
        .into_iter()
        .filter(|d| {
            let (line, character) = d.start_position(text);
            seen.insert((line, character, d.message.clone()))
        })
        .collect()
}
