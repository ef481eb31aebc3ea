use std::time::{Duration, Instant};

use chrono::Utc;
use taplist_core::{update, AppState, AppViewModel, Msg};
use taplist_logging::tap_warn;

use crate::effects::EffectRunner;

/// Owns the application state and feeds it messages, one at a time.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Processes engine results, including the follow-up effects they
    /// trigger, until nothing is outstanding or `timeout` elapses.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.runner.is_idle() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tap_warn!("Gave up waiting for outstanding requests");
                return false;
            }
            if let Some(msg) = self.runner.next_msg(remaining) {
                self.dispatch(msg);
            }
        }
        true
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view(Utc::now())
    }
}
