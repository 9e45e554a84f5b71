use crate::{Effect, FailureReason, LoadNotice, LoadPhase, LoadState, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages tagged with a cycle other than the current one are stale and are
/// dropped without touching the state.
pub fn update(mut state: LoadState, msg: Msg) -> (LoadState, Vec<Effect>) {
    let effects = match msg {
        Msg::LoadRequested => {
            let (cycle, superseded) = state.begin_cycle();
            let mut effects = Vec::with_capacity(3);
            if let Some(old) = superseded {
                effects.push(Effect::CancelCycle { cycle: old });
            }
            effects.push(Effect::Notify(LoadNotice::Started));
            effects.push(Effect::CheckConnectivity { cycle });
            effects
        }
        Msg::ConnectivityChecked { cycle, connected } => {
            if !state.accepts(cycle, &[LoadPhase::CheckingConnectivity]) {
                return (state, Vec::new());
            }
            if connected {
                state.set_phase(LoadPhase::Fetching);
                vec![Effect::Fetch {
                    cycle,
                    url: state.request_url().to_string(),
                }]
            } else {
                state.fail(FailureReason::NoConnectivity);
                vec![Effect::Notify(LoadNotice::Failed(
                    FailureReason::NoConnectivity,
                ))]
            }
        }
        Msg::ParsingStarted { cycle } => {
            if state.accepts(cycle, &[LoadPhase::Fetching]) {
                state.set_phase(LoadPhase::Parsing);
            }
            Vec::new()
        }
        Msg::CycleFinished { cycle, result } => {
            if !state.accepts(cycle, &[LoadPhase::Fetching, LoadPhase::Parsing]) {
                return (state, Vec::new());
            }
            match result {
                Ok(articles) => {
                    state.deliver(articles.clone());
                    vec![Effect::Notify(LoadNotice::Finished(articles))]
                }
                Err(err) => {
                    let reason = FailureReason::Fetch(err);
                    state.fail(reason.clone());
                    vec![Effect::Notify(LoadNotice::Failed(reason))]
                }
            }
        }
        Msg::ObserverDetached => {
            if *state.phase() == LoadPhase::Idle {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(2);
            if let Some(cycle) = state.reset() {
                effects.push(Effect::CancelCycle { cycle });
            }
            effects.push(Effect::Notify(LoadNotice::Reset));
            effects
        }
        Msg::QueryChanged(url) => {
            state.set_request_url(url);
            Vec::new()
        }
    };

    (state, effects)
}
