//! Shared state threaded through one validation walk.
use jsonschema_document::Range;
use jsonschema_referencing::Draft;

use crate::applicability::ApplicabilityCollector;

/// Everything a validation call needs beyond the schema/node pair itself:
/// the active draft (fixed at the outermost schema and never re-evaluated
/// for nested references, per the resolver's draft-auto-selection note) and
/// the collector branches report applicability into.
pub struct EvalContext<'a> {
    pub draft: Draft,
    pub collector: &'a mut dyn ApplicabilityCollector,
}

impl<'a> EvalContext<'a> {
    pub fn new(draft: Draft, collector: &'a mut dyn ApplicabilityCollector) -> Self {
        EvalContext { draft, collector }
    }

    /// Whether `range` falls inside the collector's focus window, if any.
    /// A node outside the window is skipped entirely by the dispatcher.
    #[must_use]
    pub fn in_focus(&self, range: Range) -> bool {
        match self.collector.focus_offset() {
            None => true,
            Some(focus) => range.offset <= focus && focus <= range.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicability::{NoOpCollector, RecordingCollector};

    #[test]
    fn no_focus_window_means_everything_is_in_focus() {
        let mut collector = NoOpCollector;
        let ctx = EvalContext::new(Draft::latest(), &mut collector);
        assert!(ctx.in_focus(Range::new(0, 0)));
        assert!(ctx.in_focus(Range::new(9999, 1)));
    }

    #[test]
    fn focus_window_restricts_to_nodes_spanning_the_offset() {
        let mut collector = RecordingCollector::with_focus_offset(5);
        let ctx = EvalContext::new(Draft::latest(), &mut collector);
        assert!(ctx.in_focus(Range::new(3, 4)));
        assert!(!ctx.in_focus(Range::new(6, 2)));
    }
}
