//! The validation result accumulator: a monoid that problems and match
//! statistics are merged into as branches of `allOf`/`anyOf`/`oneOf` are
//! explored.
use ahash::AHashSet;
use jsonschema_document::{Diagnostic, Range, Severity};
use serde_json::Value;

/// A single validation failure or deprecation warning.
pub type Problem = Diagnostic;

/// Accumulates everything a schema evaluation discovers about one instance
/// node: failures, and the statistics branch-ordering needs to pick the
/// "best" `anyOf`/`oneOf` alternative.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub problems: Vec<Problem>,
    /// Whether an `enum`/`const` keyword matched somewhere in this branch.
    pub enum_matched: bool,
    /// Every `enum` candidate list encountered, kept so an ancestor can
    /// compose a single combined "must be one of" message.
    pub enum_candidates: Vec<Vec<Value>>,
    /// How many keys of a `properties`/`patternProperties` match succeeded.
    pub property_match_count: usize,
    /// How many property *values* were themselves found valid.
    pub property_value_match_count: usize,
    /// How many times the primary value itself (not a sub-property) matched
    /// a type-appropriate keyword; used as a branch-ordering tiebreaker.
    pub primary_value_match_count: usize,
    /// Object keys processed by `properties`/`patternProperties`/
    /// `additionalProperties` at this level, consulted by
    /// `unevaluatedProperties`.
    pub processed_properties: AHashSet<String>,
    /// Array indices processed by `items`/`prefixItems`/`contains`,
    /// consulted by `unevaluatedItems`.
    pub processed_items: AHashSet<usize>,
}

impl ValidationResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn push_problem(&mut self, range: Range, severity: Severity, code: jsonschema_document::ErrorCode, message: impl Into<String>) {
        self.problems.push(Diagnostic::new(range, severity, code, message));
    }

    /// Merges `other` into `self`: all problems and match statistics combine.
    /// Used for `allOf` and for merging multiple passing `anyOf` branches.
    pub fn merge(&mut self, other: ValidationResult) {
        self.problems.extend(other.problems);
        self.enum_matched |= other.enum_matched;
        self.enum_candidates.extend(other.enum_candidates);
        self.property_match_count += other.property_match_count;
        self.property_value_match_count += other.property_value_match_count;
        self.primary_value_match_count += other.primary_value_match_count;
        self.processed_properties.extend(other.processed_properties);
        self.processed_items.extend(other.processed_items);
    }

    /// Branch-ordering "best" comparison for `anyOf`/`oneOf`: fewer problems
    /// wins first, then enum-match, then match-count tiebreakers, largest
    /// wins throughout.
    #[must_use]
    pub fn is_better_than(&self, other: &ValidationResult) -> bool {
        let self_key = (
            self.problems.is_empty(),
            self.enum_matched,
            self.primary_value_match_count,
            self.property_value_match_count,
            self.property_match_count,
        );
        let other_key = (
            other.problems.is_empty(),
            other.enum_matched,
            other.primary_value_match_count,
            other.property_value_match_count,
            other.property_match_count,
        );
        self_key > other_key
    }
}
