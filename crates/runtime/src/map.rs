use layers::symbology::EncodingError;
use streaming::request::TileEndpoint;
use style::description::StyleError;
use style::renderer::Renderer;
use tracing::info;

use crate::event_bus::{Event, EventBus};
use crate::filter::{FilterState, FilterStateMachine, FilterUpdate};
use crate::sync::{StyleSynchronizer, SyncOutcome};

/// Events the renderer reports back to the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapEvent {
    /// The base style finished loading.
    Load,
}

/// One trips map: filter state, synchronizer and the renderer they drive.
///
/// Everything runs synchronously on the caller's thread; instances share no
/// state, so several maps can live side by side.
#[derive(Debug)]
pub struct TripsMap<R: Renderer> {
    renderer: R,
    filters: FilterStateMachine,
    sync: StyleSynchronizer,
    events: EventBus,
}

impl<R: Renderer> TripsMap<R> {
    pub fn new(renderer: R, endpoint: TileEndpoint) -> Result<Self, EncodingError> {
        Ok(Self {
            renderer,
            filters: FilterStateMachine::new(),
            sync: StyleSynchronizer::new(endpoint)?,
            events: EventBus::new(),
        })
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn filters(&self) -> &FilterState {
        self.filters.state()
    }

    pub fn source_url(&self) -> Option<String> {
        self.sync.source_url(&self.renderer)
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn handle_event(&mut self, event: MapEvent) -> Result<(), StyleError> {
        match event {
            MapEvent::Load => {
                self.sync.initialize(&mut self.renderer)?;
                self.events.emit("load", "trips source and layer installed");
                Ok(())
            }
        }
    }

    /// Apply one filter update and resynchronize the tile source.
    pub fn change_filter(&mut self, update: FilterUpdate) -> SyncOutcome {
        let name = update.name();
        let state = self.filters.update(update).clone();
        self.events.emit("filter", format!("{name} changed"));

        let outcome = self.sync.on_filter_changed(&mut self.renderer, &state);
        match &outcome {
            SyncOutcome::Applied { url } => self.events.emit("sync", url.clone()),
            SyncOutcome::Incomplete => self.events.emit("skip", "filters incomplete"),
            SyncOutcome::NotReady => self.events.emit("drop", "renderer not ready"),
            SyncOutcome::MissingSource => self.events.emit("drop", "trips source missing"),
        }
        info!(filter = name, ?outcome, "filter changed");
        outcome
    }
}
