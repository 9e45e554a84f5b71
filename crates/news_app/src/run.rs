use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use news_core::{LoadPhase, QuerySettings};
use news_engine::{
    ConnectivityProbe, EngineHandle, LoadController, StaticConnectivity, TcpConnectivityProbe,
};
use news_logging::news_warn;

use crate::observer::TerminalObserver;
use crate::settings::load_settings;
use crate::Cli;

/// Extra time granted on top of the probe and request timeouts before giving up.
const SETTLE_SLACK: Duration = Duration::from_secs(5);

/// Resolve settings, run one load cycle and print its outcome to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<LoadPhase> {
    let settings = load_settings(&cli.settings)
        .merged_with(cli.overrides())
        .resolve();
    let fetch_settings = cli.fetch_settings();
    let settle =
        TcpConnectivityProbe::DEFAULT_TIMEOUT + fetch_settings.request_timeout + SETTLE_SLACK;

    let connectivity = connectivity_probe(&settings, cli.skip_connectivity_check);
    let engine = EngineHandle::new(fetch_settings, connectivity)
        .context("failed to start the background engine")?;
    let mut controller = LoadController::new(&settings, engine, TerminalObserver::new(out));

    controller.start();
    let phase = controller.run_until_settled(settle).clone();
    if phase.is_in_flight() {
        controller.reset();
        anyhow::bail!("load did not finish within {:?}", settle);
    }
    Ok(phase)
}

/// Probe for the API host, or a fixed "online" answer when probing is skipped
/// or the endpoint names no host (the fetch then reports the bad URL).
pub fn connectivity_probe(settings: &QuerySettings, skip: bool) -> Arc<dyn ConnectivityProbe> {
    if skip {
        return Arc::new(StaticConnectivity::online());
    }
    let timeout = TcpConnectivityProbe::DEFAULT_TIMEOUT;
    match TcpConnectivityProbe::for_endpoint(&settings.endpoint, timeout) {
        Some(probe) => Arc::new(probe),
        None => {
            news_warn!(
                "Cannot probe connectivity for endpoint {:?}; assuming online",
                settings.endpoint
            );
            Arc::new(StaticConnectivity::online())
        }
    }
}
