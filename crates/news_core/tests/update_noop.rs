use news_core::{update, LoadState, Msg};

#[test]
fn detaching_while_idle_is_noop() {
    let state = LoadState::default();
    let (next, effects) = update(state.clone(), Msg::ObserverDetached);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn events_without_a_cycle_are_noop() {
    let state = LoadState::default();
    let (next, effects) = update(state.clone(), Msg::ParsingStarted { cycle: 1 });

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
