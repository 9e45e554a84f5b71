use crate::{ArticleRecord, CycleId, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Consumer asked for a (re)load.
    LoadRequested,
    /// Background connectivity probe finished.
    ConnectivityChecked { cycle: CycleId, connected: bool },
    /// Body arrived and the background context started parsing it.
    ParsingStarted { cycle: CycleId },
    /// Background work for a cycle finished.
    CycleFinished {
        cycle: CycleId,
        result: Result<Vec<ArticleRecord>, FetchError>,
    },
    /// Consumer tore down its observation.
    ObserverDetached,
    /// Request URL for subsequent cycles changed (e.g. new preferences).
    QueryChanged(String),
}
