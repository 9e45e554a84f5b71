use crate::{ArticleRecord, CycleId, FailureReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckConnectivity { cycle: CycleId },
    Fetch { cycle: CycleId, url: String },
    CancelCycle { cycle: CycleId },
    Notify(LoadNotice),
}

/// Notification destined for the observer, in production order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadNotice {
    Started,
    /// Full replacement list; may be empty when the search had no results.
    Finished(Vec<ArticleRecord>),
    Failed(FailureReason),
    Reset,
}
