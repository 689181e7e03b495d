use std::collections::BTreeMap;

use serde_json::Value;
use streaming::request::TRIPS_SOURCE_ID;
use style::description::{LayerKind, LayerSpec};

use crate::layer::Layer;
use crate::symbology::{EncodingError, EncodingTable, TRIPS_PROPERTY};

pub const TRIPS_LAYER_ID: &str = "trips";

/// Fill-extrusion layer whose height and color follow an [`EncodingTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionLayer {
    id: String,
    source: String,
    source_layer: String,
    table: EncodingTable,
}

impl ExtrusionLayer {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        source_layer: impl Into<String>,
        table: EncodingTable,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_layer: source_layer.into(),
            table,
        }
    }

    pub fn trips() -> Result<Self, EncodingError> {
        Ok(Self::new(
            TRIPS_LAYER_ID,
            TRIPS_SOURCE_ID,
            TRIPS_PROPERTY,
            EncodingTable::trips()?,
        ))
    }

    pub fn paint(&self) -> BTreeMap<String, Value> {
        let mut paint = BTreeMap::new();
        paint.insert(
            "fill-extrusion-height".to_string(),
            self.table.height_expression(),
        );
        paint.insert(
            "fill-extrusion-color".to_string(),
            self.table.color_expression(),
        );
        paint.insert(
            "fill-extrusion-opacity".to_string(),
            Value::from(self.table.opacity()),
        );
        paint
    }
}

impl Layer for ExtrusionLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn spec(&self) -> LayerSpec {
        LayerSpec {
            id: self.id.clone(),
            kind: LayerKind::FillExtrusion,
            source: Some(self.source.clone()),
            source_layer: Some(self.source_layer.clone()),
            paint: self.paint(),
        }
    }
}
