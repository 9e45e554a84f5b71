use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use news_core::CycleId;
use news_logging::{news_debug, news_error, news_warn};
use tokio_util::sync::CancellationToken;

use crate::connectivity::ConnectivityProbe;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::parse::{GuardianResponseParser, ResponseParser};
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    CheckConnectivity { cycle: CycleId },
    Fetch { cycle: CycleId, url: String },
    Cancel { cycle: CycleId },
    Shutdown,
}

/// Collaborators the background context runs a cycle with.
#[derive(Clone)]
pub struct EngineServices {
    pub fetcher: Arc<dyn Fetcher>,
    pub connectivity: Arc<dyn ConnectivityProbe>,
    pub parser: Arc<dyn ResponseParser>,
}

impl EngineServices {
    pub fn new(fetcher: Arc<dyn Fetcher>, connectivity: Arc<dyn ConnectivityProbe>) -> Self {
        Self {
            fetcher,
            connectivity,
            parser: Arc::new(GuardianResponseParser),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn ResponseParser>) -> Self {
        self.parser = parser;
        self
    }
}

/// Handle to the background context: a dedicated thread driving a tokio
/// runtime. Dropping the handle shuts the runtime down.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(
        settings: FetchSettings,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Result<Self, EngineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(settings));
        Self::with_services(EngineServices::new(fetcher, connectivity))
    }

    pub fn with_services(services: EngineServices) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("newsfeed-worker")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("newsfeed-engine".to_string())
            .spawn(move || {
                let mut cycles = ActiveCycles::default();
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::CheckConnectivity { cycle } => {
                            let token = cycles.token_for(cycle);
                            let probe = services.connectivity.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                check_connectivity(probe.as_ref(), cycle, token, event_tx).await;
                            });
                        }
                        EngineCommand::Fetch { cycle, url } => {
                            let token = cycles.token_for(cycle);
                            let services = services.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                fetch_and_parse(&services, cycle, url, token, event_tx).await;
                            });
                        }
                        EngineCommand::Cancel { cycle } => cycles.cancel(cycle),
                        EngineCommand::Shutdown => break,
                    }
                }
                news_debug!("Engine stopping; outstanding work is dropped");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn check_connectivity(&self, cycle: CycleId) {
        self.send(EngineCommand::CheckConnectivity { cycle });
    }

    pub fn fetch(&self, cycle: CycleId, url: impl Into<String>) {
        self.send(EngineCommand::Fetch {
            cycle,
            url: url.into(),
        });
    }

    pub fn cancel(&self, cycle: CycleId) {
        self.send(EngineCommand::Cancel { cycle });
    }

    /// Stop the background context. Outstanding work is dropped and no
    /// further events arrive.
    pub fn shutdown(&self) {
        self.send(EngineCommand::Shutdown);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event. `Ok(None)` on timeout;
    /// [`EngineError::Disconnected`] once the background context is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            news_error!("Engine thread is gone; command dropped");
        }
    }
}

/// Cancellation tokens of cycles that may still have work running.
///
/// Cycle ids only grow, so the first command for a newer cycle retires every
/// older one.
#[derive(Default)]
struct ActiveCycles {
    newest: CycleId,
    tokens: HashMap<CycleId, CancellationToken>,
}

impl ActiveCycles {
    fn token_for(&mut self, cycle: CycleId) -> CancellationToken {
        if cycle < self.newest {
            let token = CancellationToken::new();
            token.cancel();
            return token;
        }
        self.newest = cycle;
        self.tokens.retain(|id, token| {
            if *id < cycle {
                token.cancel();
                false
            } else {
                true
            }
        });
        self.tokens.entry(cycle).or_default().clone()
    }

    fn cancel(&mut self, cycle: CycleId) {
        if let Some(token) = self.tokens.remove(&cycle) {
            news_debug!("Cancelling cycle {}", cycle);
            token.cancel();
        }
        // Keep later commands for this cycle from reviving it.
        self.newest = self.newest.max(cycle + 1);
    }
}

async fn check_connectivity(
    probe: &dyn ConnectivityProbe,
    cycle: CycleId,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let connected = tokio::select! {
        biased;
        _ = token.cancelled() => {
            news_debug!("Cycle {} cancelled during connectivity check", cycle);
            return;
        }
        connected = probe.is_connected() => connected,
    };
    if token.is_cancelled() {
        return;
    }
    let _ = event_tx.send(EngineEvent::Connectivity { cycle, connected });
}

async fn fetch_and_parse(
    services: &EngineServices,
    cycle: CycleId,
    url: String,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let fetched = tokio::select! {
        biased;
        _ = token.cancelled() => {
            news_debug!("Cycle {} cancelled during fetch", cycle);
            return;
        }
        fetched = services.fetcher.fetch(&url) => fetched,
    };

    let result = match fetched {
        Ok(body) => {
            if token.is_cancelled() {
                return;
            }
            let _ = event_tx.send(EngineEvent::ParsingStarted { cycle });
            let parser = services.parser.clone();
            match tokio::task::spawn_blocking(move || parser.parse(Some(&body))).await {
                Ok(report) => Ok(report.records),
                Err(err) => {
                    news_error!("Parser task for cycle {} failed: {}", cycle, err);
                    Ok(Vec::new())
                }
            }
        }
        Err(err) => {
            news_warn!("Cycle {} fetch failed: {}", cycle, err);
            Err(err)
        }
    };

    if token.is_cancelled() {
        news_debug!("Cycle {} cancelled; discarding result", cycle);
        return;
    }
    let _ = event_tx.send(EngineEvent::CycleCompleted { cycle, result });
}
