/// Aggregated view of attempt progress, useful for UI.
///
/// `is_complete` is true once every question has an answer; it says nothing
/// about submission, which is the caller's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub is_complete: bool,
}
