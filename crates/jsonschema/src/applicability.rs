//! Applicability records: which schema applied to which syntax node, used
//! by `getMatchingSchemas`-style callers (e.g. completion).
use jsonschema_document::NodeId;
use serde_json::Value;

/// One schema's application to one syntax-tree node.
#[derive(Debug, Clone)]
pub struct ApplicabilityRecord {
    pub node: NodeId,
    pub schema: Value,
    /// Set when this record was produced inside a `not` (or a failing
    /// branch of `if`): the schema's sense is inverted for this node.
    pub inverted: bool,
}

/// Receives applicability records as the validator walks the tree. Kept as
/// a trait (rather than always building a `Vec`) so a plain validity check
/// can opt out of the bookkeeping entirely via [`NoOpCollector`].
pub trait ApplicabilityCollector {
    fn record(&mut self, node: NodeId, schema: &Value, inverted: bool);

    /// An optional focus window: when set, only nodes whose byte offset
    /// falls inside it are evaluated at all. Used by completion-style
    /// callers who only want schemas applicable around the cursor.
    fn focus_offset(&self) -> Option<usize> {
        None
    }
}

/// Discards every record; the default for `is_valid`-only validation, where
/// collecting applicability would be pure overhead.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCollector;

impl ApplicabilityCollector for NoOpCollector {
    fn record(&mut self, _node: NodeId, _schema: &Value, _inverted: bool) {}
}

/// Records every application it sees, optionally restricted to a focus
/// window.
#[derive(Debug, Default)]
pub struct RecordingCollector {
    pub records: Vec<ApplicabilityRecord>,
    pub focus_offset: Option<usize>,
}

impl RecordingCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_focus_offset(focus_offset: usize) -> Self {
        RecordingCollector { records: Vec::new(), focus_offset: Some(focus_offset) }
    }
}

impl ApplicabilityCollector for RecordingCollector {
    fn record(&mut self, node: NodeId, schema: &Value, inverted: bool) {
        self.records.push(ApplicabilityRecord { node, schema: schema.clone(), inverted });
    }

    fn focus_offset(&self) -> Option<usize> {
        self.focus_offset
    }
}
