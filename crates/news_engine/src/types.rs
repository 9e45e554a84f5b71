use std::io;

use news_core::{ArticleRecord, CycleId, FetchError};

/// Completion hand-off from the background context, tagged with its cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Connectivity {
        cycle: CycleId,
        connected: bool,
    },
    ParsingStarted {
        cycle: CycleId,
    },
    CycleCompleted {
        cycle: CycleId,
        result: Result<Vec<ArticleRecord>, FetchError>,
    },
}

impl EngineEvent {
    pub fn cycle(&self) -> CycleId {
        match self {
            EngineEvent::Connectivity { cycle, .. }
            | EngineEvent::ParsingStarted { cycle }
            | EngineEvent::CycleCompleted { cycle, .. } => *cycle,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start background runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("background engine has shut down")]
    Disconnected,
}
