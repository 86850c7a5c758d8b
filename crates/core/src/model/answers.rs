use std::collections::BTreeMap;

/// Sparse record of selected options, keyed by question position.
///
/// A missing position means the question is unanswered. Recording over an
/// existing position replaces the earlier choice; nothing is ever removed.
/// The sheet itself is plain data; position and option bounds are enforced
/// by the session that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    selections: BTreeMap<usize, usize>,
}

impl AnswerSheet {
    /// Creates an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the selected option for a question position, replacing any
    /// earlier selection.
    pub fn record(&mut self, position: usize, option: usize) {
        self.selections.insert(position, option);
    }

    /// Returns the selected option for a position, if any.
    #[must_use]
    pub fn selected(&self, position: usize) -> Option<usize> {
        self.selections.get(&position).copied()
    }

    #[must_use]
    pub fn is_answered(&self, position: usize) -> bool {
        self.selections.contains_key(&position)
    }

    /// Number of distinct positions answered so far.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.len()
    }

    /// Iterates `(position, option)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.selections.iter().map(|(&position, &option)| (position, option))
    }

    /// Expands the sheet to one entry per question position.
    #[must_use]
    pub fn to_vec(&self, len: usize) -> Vec<Option<usize>> {
        (0..len).map(|position| self.selected(position)).collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
