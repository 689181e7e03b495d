use url::Url;

use crate::query::TileQuery;

/// Name of the tile function, also used as the source id in the map style.
pub const TRIPS_SOURCE_ID: &str = "public.get_trips";

/// Path of the TileJSON document for the trips function.
pub const TRIPS_TILE_PATH: &str = "/tiles/rpc/public.get_trips.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    Empty,
    HasQuery,
    Invalid(String),
    UnsupportedScheme(String),
}

impl std::fmt::Display for EndpointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointError::Empty => write!(f, "tile endpoint is empty"),
            EndpointError::HasQuery => {
                write!(f, "tile endpoint must not carry its own query string")
            }
            EndpointError::Invalid(msg) => write!(f, "invalid tile endpoint: {msg}"),
            EndpointError::UnsupportedScheme(s) => {
                write!(f, "unsupported tile endpoint scheme: {s}")
            }
        }
    }
}

impl std::error::Error for EndpointError {}

/// Where tile requests go. Either a server-relative path (the default,
/// resolved by the renderer against the page origin) or an absolute http(s)
/// URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEndpoint {
    base: String,
}

impl Default for TileEndpoint {
    fn default() -> Self {
        Self {
            base: TRIPS_TILE_PATH.to_string(),
        }
    }
}

impl TileEndpoint {
    pub fn new(base: impl Into<String>) -> Result<Self, EndpointError> {
        let base = base.into();
        let trimmed = base.trim();
        if trimmed.is_empty() {
            return Err(EndpointError::Empty);
        }
        if trimmed.contains('?') {
            return Err(EndpointError::HasQuery);
        }

        if !trimmed.starts_with('/') {
            let parsed = Url::parse(trimmed).map_err(|e| EndpointError::Invalid(e.to_string()))?;
            match parsed.scheme() {
                "http" | "https" => {}
                other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
            }
        }

        Ok(Self {
            base: trimmed.to_string(),
        })
    }

    /// Full source URL for a query: `<base>?date_from=..&date_to=..&hour=..`.
    pub fn url_for(&self, query: &TileQuery) -> String {
        format!("{}?{}", self.base, query.to_query_string())
    }
}
