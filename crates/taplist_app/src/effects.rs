use std::time::Duration;

use taplist_core::{Effect, LoadError, Msg};
use taplist_engine::{EngineEvent, EngineHandle};
use taplist_logging::{tap_debug, tap_warn};

/// Hands core effects to the engine and turns engine events back into
/// messages. Every effect yields exactly one event.
pub struct EffectRunner {
    engine: EngineHandle,
    in_flight: usize,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            in_flight: 0,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            tap_debug!("Running effect {:?}", effect);
            match effect {
                Effect::FetchDocument => self.engine.fetch_document(),
                Effect::LoadAvailability => self.engine.load_availability(),
                Effect::ToggleAvailability { key } => self.engine.toggle_availability(key),
            }
            self.in_flight += 1;
        }
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Waits up to `timeout` for the next engine result.
    pub fn next_msg(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(event_to_msg(event))
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::DocumentFetched(doc) => Msg::DocumentFetched(doc),
        EngineEvent::DocumentFailed(err) => {
            tap_warn!("Beer list load failed: {}", err);
            Msg::LoadFailed(LoadError::from(err))
        }
        EngineEvent::AvailabilityLoaded(map) => Msg::AvailabilityLoaded(map),
        EngineEvent::AvailabilityFailed(err) => {
            tap_warn!("Availability tracking disabled: {}", err);
            Msg::StoreUnavailable(err.to_string())
        }
        EngineEvent::ToggleFinished { key, result } => Msg::ToggleCompleted {
            key,
            result: result.map_err(Into::into),
        },
    }
}
