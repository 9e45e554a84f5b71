use crate::view_model::{EmptyState, LoadViewModel};
use crate::{ArticleRecord, FailureReason, QuerySettings};

/// Identifier of one load cycle. Strictly increasing per `LoadState`.
pub type CycleId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    CheckingConnectivity,
    Fetching,
    Parsing,
    Delivered,
    Failed(FailureReason),
}

impl LoadPhase {
    /// Background work is outstanding for the current cycle.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            LoadPhase::CheckingConnectivity | LoadPhase::Fetching | LoadPhase::Parsing
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadPhase::Delivered | LoadPhase::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadState {
    phase: LoadPhase,
    request_url: String,
    current_cycle: Option<CycleId>,
    last_cycle: CycleId,
    articles: Vec<ArticleRecord>,
}

impl Default for LoadState {
    fn default() -> Self {
        Self::from_settings(&QuerySettings::default())
    }
}

impl LoadState {
    pub fn new(request_url: impl Into<String>) -> Self {
        Self {
            phase: LoadPhase::Idle,
            request_url: request_url.into(),
            current_cycle: None,
            last_cycle: 0,
            articles: Vec::new(),
        }
    }

    pub fn from_settings(settings: &QuerySettings) -> Self {
        Self::new(settings.request_url())
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    pub fn current_cycle(&self) -> Option<CycleId> {
        self.current_cycle
    }

    pub fn articles(&self) -> &[ArticleRecord] {
        &self.articles
    }

    /// Navigation target of the delivered article at `index`.
    pub fn article_url(&self, index: usize) -> Option<&str> {
        self.articles.get(index).map(ArticleRecord::url)
    }

    pub fn view(&self) -> LoadViewModel {
        LoadViewModel {
            phase: self.phase.clone(),
            cycle: self.current_cycle,
            loading: self.phase.is_in_flight(),
            articles: self.articles.clone(),
            empty_state: self.empty_state(),
        }
    }

    fn empty_state(&self) -> Option<EmptyState> {
        if !self.articles.is_empty() {
            return None;
        }
        match &self.phase {
            LoadPhase::Delivered => Some(EmptyState::NoResults),
            LoadPhase::Failed(FailureReason::NoConnectivity) => Some(EmptyState::NoNetwork),
            LoadPhase::Failed(FailureReason::Fetch(_)) => Some(EmptyState::LoadFailed),
            _ => None,
        }
    }

    /// Allocate a new cycle. Returns it together with the cycle it supersedes,
    /// if that one still had background work outstanding.
    pub(crate) fn begin_cycle(&mut self) -> (CycleId, Option<CycleId>) {
        let superseded = if self.phase.is_in_flight() {
            self.current_cycle
        } else {
            None
        };
        self.last_cycle += 1;
        self.current_cycle = Some(self.last_cycle);
        self.phase = LoadPhase::CheckingConnectivity;
        (self.last_cycle, superseded)
    }

    /// True when `cycle` is the current cycle and the phase is one of `phases`.
    pub(crate) fn accepts(&self, cycle: CycleId, phases: &[LoadPhase]) -> bool {
        self.current_cycle == Some(cycle) && phases.contains(&self.phase)
    }

    pub(crate) fn set_phase(&mut self, phase: LoadPhase) {
        self.phase = phase;
    }

    pub(crate) fn deliver(&mut self, articles: Vec<ArticleRecord>) {
        self.articles = articles;
        self.phase = LoadPhase::Delivered;
    }

    pub(crate) fn fail(&mut self, reason: FailureReason) {
        self.articles.clear();
        self.phase = LoadPhase::Failed(reason);
    }

    /// Drop all data and return to idle. Returns the cycle whose background
    /// work must be cancelled, if any.
    pub(crate) fn reset(&mut self) -> Option<CycleId> {
        let in_flight = if self.phase.is_in_flight() {
            self.current_cycle
        } else {
            None
        };
        self.articles.clear();
        self.current_cycle = None;
        self.phase = LoadPhase::Idle;
        in_flight
    }

    pub(crate) fn set_request_url(&mut self, url: String) {
        self.request_url = url;
    }
}
