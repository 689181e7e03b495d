//! Declarative style description handed to the map renderer.
//!
//! Field names follow the renderer's JSON style format so a description can
//! be serialized and passed through unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Vector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// TileJSON URL. The only field a filter change rewrites.
    pub url: String,
}

impl SourceSpec {
    pub fn vector(url: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Vector,
            url: url.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    FillExtrusion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        rename = "source-layer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_layer: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub paint: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    DuplicateSource(String),
    DuplicateLayer(String),
    UnknownSource(String),
}

impl std::fmt::Display for StyleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleError::DuplicateSource(id) => write!(f, "source already exists: {id}"),
            StyleError::DuplicateLayer(id) => write!(f, "layer already exists: {id}"),
            StyleError::UnknownSource(id) => write!(f, "layer references unknown source: {id}"),
        }
    }
}

impl std::error::Error for StyleError {}

/// Full style: sources keyed by id plus an ordered layer list.
///
/// Sources live in a `BTreeMap`, so one id can only ever map to one source and
/// serialization order is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDescription {
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceSpec>,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

impl Default for StyleDescription {
    fn default() -> Self {
        Self {
            version: 8,
            name: None,
            sources: BTreeMap::new(),
            layers: Vec::new(),
        }
    }
}

impl StyleDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self, id: &str) -> Option<&SourceSpec> {
        self.sources.get(id)
    }

    pub fn source_mut(&mut self, id: &str) -> Option<&mut SourceSpec> {
        self.sources.get_mut(id)
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn add_source(&mut self, id: impl Into<String>, source: SourceSpec) -> Result<(), StyleError> {
        let id = id.into();
        if self.sources.contains_key(&id) {
            return Err(StyleError::DuplicateSource(id));
        }
        self.sources.insert(id, source);
        Ok(())
    }

    pub fn add_layer(&mut self, layer: LayerSpec) -> Result<(), StyleError> {
        if self.layer(&layer.id).is_some() {
            return Err(StyleError::DuplicateLayer(layer.id));
        }
        if let Some(source) = &layer.source {
            if !self.sources.contains_key(source) {
                return Err(StyleError::UnknownSource(source.clone()));
            }
        }
        self.layers.push(layer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerKind, LayerSpec, SourceSpec, StyleDescription, StyleError};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn layer(id: &str, source: &str) -> LayerSpec {
        LayerSpec {
            id: id.to_string(),
            kind: LayerKind::FillExtrusion,
            source: Some(source.to_string()),
            source_layer: None,
            paint: BTreeMap::new(),
        }
    }

    #[test]
    fn rejects_duplicate_source_and_layer() {
        let mut style = StyleDescription::new();
        style.add_source("a", SourceSpec::vector("/a.json")).expect("add");
        assert_eq!(
            style.add_source("a", SourceSpec::vector("/b.json")),
            Err(StyleError::DuplicateSource("a".to_string()))
        );
        assert_eq!(style.source("a").map(|s| s.url.as_str()), Some("/a.json"));

        style.add_layer(layer("l", "a")).expect("add layer");
        assert_eq!(
            style.add_layer(layer("l", "a")),
            Err(StyleError::DuplicateLayer("l".to_string()))
        );
    }

    #[test]
    fn layer_needs_existing_source() {
        let mut style = StyleDescription::new();
        assert_eq!(
            style.add_layer(layer("l", "missing")),
            Err(StyleError::UnknownSource("missing".to_string()))
        );
        assert!(style.layers.is_empty());
    }

    #[test]
    fn serializes_with_renderer_field_names() {
        let mut style = StyleDescription::new();
        style.add_source("s", SourceSpec::vector("/s.json")).expect("add");
        let mut l = layer("l", "s");
        l.source_layer = Some("trips".to_string());
        style.add_layer(l).expect("add layer");

        let json = serde_json::to_value(&style).expect("json");
        assert_eq!(json["version"], 8);
        assert_eq!(json["sources"]["s"]["type"], "vector");
        assert_eq!(json["layers"][0]["type"], "fill-extrusion");
        assert_eq!(json["layers"][0]["source-layer"], "trips");

        let back: StyleDescription = serde_json::from_value(json).expect("parse");
        assert_eq!(back, style);
    }
}
