//! Interactive-side driver of the load state machine.

use std::time::{Duration, Instant};

use news_core::{
    update, ArticleRecord, Effect, FailureReason, LoadNotice, LoadPhase, LoadState,
    LoadViewModel, Msg, QuerySettings,
};
use news_logging::{news_debug, news_error, news_info, news_warn};

use crate::{EngineError, EngineEvent, EngineHandle};

/// Consumer of load-cycle notifications. Called only from the thread that
/// drives the [`LoadController`].
pub trait LoadObserver {
    fn on_load_started(&mut self) {}
    /// Replaces whatever the consumer showed before; `articles` may be empty.
    fn on_load_finished(&mut self, articles: &[ArticleRecord]);
    fn on_load_failed(&mut self, reason: &FailureReason);
    fn on_load_reset(&mut self) {}
}

/// Owns the load state on the interactive context and feeds it with events
/// coming back from the background engine.
pub struct LoadController<O: LoadObserver> {
    state: LoadState,
    engine: EngineHandle,
    observer: O,
}

impl<O: LoadObserver> LoadController<O> {
    pub fn new(settings: &QuerySettings, engine: EngineHandle, observer: O) -> Self {
        Self {
            state: LoadState::from_settings(settings),
            engine,
            observer,
        }
    }

    /// Start a load cycle, superseding any cycle still in flight.
    pub fn start(&mut self) {
        self.dispatch(Msg::LoadRequested);
    }

    /// Observer teardown: cancel outstanding work and drop delivered data.
    pub fn reset(&mut self) {
        self.dispatch(Msg::ObserverDetached);
    }

    /// Use `settings` for subsequent cycles.
    pub fn set_query(&mut self, settings: &QuerySettings) {
        self.dispatch(Msg::QueryChanged(settings.request_url()));
    }

    /// Apply every event already handed back by the engine. Returns how many
    /// were processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.engine.try_recv() {
            self.handle_event(event);
            processed += 1;
        }
        processed
    }

    /// Block up to `timeout` for the next engine event, then drain the rest.
    /// Returns `Ok(false)` on timeout.
    pub fn wait_for_event(&mut self, timeout: Duration) -> Result<bool, EngineError> {
        match self.engine.recv_timeout(timeout)? {
            Some(event) => {
                self.handle_event(event);
                self.pump();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Process events until the current cycle leaves its in-flight phases,
    /// `timeout` elapses or the engine goes away.
    pub fn run_until_settled(&mut self, timeout: Duration) -> &LoadPhase {
        let deadline = Instant::now() + timeout;
        while self.state.phase().is_in_flight() {
            let now = Instant::now();
            if now >= deadline {
                news_warn!(
                    "Load cycle {:?} still {:?} after {:?}",
                    self.state.current_cycle(),
                    self.state.phase(),
                    timeout
                );
                break;
            }
            if let Err(err) = self.wait_for_event(deadline - now) {
                news_error!(
                    "Load cycle {:?} abandoned in {:?}: {}",
                    self.state.current_cycle(),
                    self.state.phase(),
                    err
                );
                break;
            }
        }
        self.state.phase()
    }

    pub fn phase(&self) -> &LoadPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn view(&self) -> LoadViewModel {
        self.state.view()
    }

    /// URL to navigate to when the consumer selects the article at `index`.
    pub fn article_url(&self, index: usize) -> Option<&str> {
        self.state.article_url(index)
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn handle_event(&mut self, event: EngineEvent) {
        if self.state.current_cycle() != Some(event.cycle()) {
            news_debug!("Discarding event of superseded cycle {}", event.cycle());
            return;
        }
        let msg = match event {
            EngineEvent::Connectivity { cycle, connected } => {
                Msg::ConnectivityChecked { cycle, connected }
            }
            EngineEvent::ParsingStarted { cycle } => Msg::ParsingStarted { cycle },
            EngineEvent::CycleCompleted { cycle, result } => Msg::CycleFinished { cycle, result },
        };
        self.dispatch(msg);
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::CheckConnectivity { cycle } => {
                news_debug!("Cycle {}: checking connectivity", cycle);
                self.engine.check_connectivity(cycle);
            }
            Effect::Fetch { cycle, url } => {
                news_info!("Cycle {}: fetching {}", cycle, url);
                self.engine.fetch(cycle, url);
            }
            Effect::CancelCycle { cycle } => {
                news_debug!("Cycle {} superseded", cycle);
                self.engine.cancel(cycle);
            }
            Effect::Notify(notice) => match notice {
                LoadNotice::Started => self.observer.on_load_started(),
                LoadNotice::Finished(articles) => {
                    news_info!("Delivered {} articles", articles.len());
                    self.observer.on_load_finished(&articles);
                }
                LoadNotice::Failed(reason) => {
                    news_warn!("Load failed: {}", reason);
                    self.observer.on_load_failed(&reason);
                }
                LoadNotice::Reset => self.observer.on_load_reset(),
            },
        }
    }
}
