use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    #[default]
    TopRight,
}

/// Renderer construction options for the trips map.
///
/// The access token is passed straight through to the renderer and never
/// inspected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub container: String,
    pub style_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Page scrolling over the map should scroll the page, not zoom.
    pub scroll_zoom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_control: Option<ControlPosition>,
    pub container_height: String,
    pub container_margin_bottom: String,
}

impl MapOptions {
    pub fn new(style_url: impl Into<String>) -> Self {
        Self {
            container: "map".to_string(),
            style_url: style_url.into(),
            access_token: None,
            scroll_zoom: false,
            navigation_control: Some(ControlPosition::TopRight),
            container_height: "70vh".to_string(),
            container_margin_bottom: "95px".to_string(),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}
