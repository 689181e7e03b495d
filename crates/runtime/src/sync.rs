//! Keeps the renderer's trips source in step with the filter state.
//!
//! The layer is installed once. After that the only write is the source URL,
//! done as a snapshot / edit / write-back of the whole style.

use layers::Layer;
use layers::extrusion::ExtrusionLayer;
use layers::symbology::EncodingError;
use streaming::query::TileQuery;
use streaming::request::{TRIPS_SOURCE_ID, TileEndpoint};
use style::description::{SourceSpec, StyleError};
use style::renderer::Renderer;
use tracing::{debug, info, warn};

use crate::filter::{FilterState, build_query};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The source URL was written and the style pushed to the renderer.
    Applied { url: String },
    /// `from` or `to` is missing; the renderer was not touched.
    Incomplete,
    /// Initial load has not finished; the update was dropped.
    NotReady,
    /// The style no longer has the trips source; nothing was written.
    MissingSource,
}

#[derive(Debug)]
pub struct StyleSynchronizer {
    endpoint: TileEndpoint,
    layer: ExtrusionLayer,
    initialized: bool,
}

impl StyleSynchronizer {
    pub fn new(endpoint: TileEndpoint) -> Result<Self, EncodingError> {
        Ok(Self {
            endpoint,
            layer: ExtrusionLayer::trips()?,
            initialized: false,
        })
    }

    /// Install the trips source with the fallback query and the extrusion layer.
    ///
    /// Must run once the renderer's base style has loaded. Later calls are no-ops.
    pub fn initialize<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<(), StyleError> {
        if self.initialized {
            debug!("trips style already installed");
            return Ok(());
        }

        let url = self.endpoint.url_for(&TileQuery::fallback());
        renderer.add_source(TRIPS_SOURCE_ID, SourceSpec::vector(url.clone()))?;
        renderer.add_layer(self.layer.spec())?;
        self.initialized = true;

        info!(source = TRIPS_SOURCE_ID, layer = self.layer.id(), %url, "trips style installed");
        Ok(())
    }

    /// React to a filter change. Incomplete filters never reach the renderer.
    pub fn on_filter_changed<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        state: &FilterState,
    ) -> SyncOutcome {
        let Some(query) = build_query(state) else {
            debug!(?state, "filters incomplete, keeping current source");
            return SyncOutcome::Incomplete;
        };
        if !self.initialized || !renderer.is_style_loaded() {
            debug!(?query, "renderer not ready, dropping filter update");
            return SyncOutcome::NotReady;
        }
        self.apply_query(renderer, &query)
    }

    /// Point the trips source at `query` and push the style back.
    pub fn apply_query<R: Renderer + ?Sized>(&self, renderer: &mut R, query: &TileQuery) -> SyncOutcome {
        let url = self.endpoint.url_for(query);

        let mut style = renderer.style();
        let Some(source) = style.source_mut(TRIPS_SOURCE_ID) else {
            warn!(source = TRIPS_SOURCE_ID, "style lost the trips source");
            return SyncOutcome::MissingSource;
        };
        source.url = url.clone();
        renderer.set_style(style);

        info!(%url, "trips source updated");
        SyncOutcome::Applied { url }
    }

    /// Current URL of the trips source, if installed.
    pub fn source_url<R: Renderer + ?Sized>(&self, renderer: &R) -> Option<String> {
        renderer.style().source(TRIPS_SOURCE_ID).map(|s| s.url.clone())
    }
}
