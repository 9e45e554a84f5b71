use crate::{ArticleRecord, CycleId, LoadPhase};

/// Which message an empty list should be shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoNetwork,
    NoResults,
    LoadFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadViewModel {
    pub phase: LoadPhase,
    pub cycle: Option<CycleId>,
    pub loading: bool,
    pub articles: Vec<ArticleRecord>,
    pub empty_state: Option<EmptyState>,
}
