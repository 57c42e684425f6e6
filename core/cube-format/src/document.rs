//! FILENAME: core/cube-format/src/document.rs
//! Cube Document - The portable, declarative form of a cube.
//!
//! Descriptors hold closures and cannot travel between processes, so the
//! document describes each one by the field it reads plus closed enum tags
//! for its behavior. The reader maps every tag through a fixed table; a tag
//! outside these enums fails to parse.
//!
//! Optional fields written as `null` read the same as absent ones and are
//! written back absent, so the first write of such a document normalizes it
//! and later round trips are exact.

use std::collections::BTreeMap;

use cube_engine::BreakdownMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ "config": {...}, "data": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeDocument {
    pub config: CubeDocumentConfig,
    pub data: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeDocumentConfig {
    pub dimensions: Vec<DimensionDef>,
    pub measures: Vec<MeasureDef>,
    pub breakdown_map: BreakdownMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_grouping: Option<Vec<String>>,
}

// ============================================================================
// DIMENSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Item field the value is read from (exact key, else a dotted path).
    pub field_name: String,
    pub key_field_name: KeyFieldMode,
    /// Raw key -> display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_mapping: Option<BTreeMap<String, String>>,
}

/// What a dimension buckets by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyFieldMode {
    /// The raw field value.
    Same,
    /// The mapped label, so raw values sharing a label share a bucket.
    Custom,
}

// ============================================================================
// MEASURES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub field_name: String,
    pub aggregation_function: AggregationFunction,
    pub format_function: FormatFunction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationFunction {
    Sum,
    Count,
    Avg,
    Min,
    Max,
}

/// `{ "type": "...", "currency"?: "EUR" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatFunction {
    #[serde(rename = "type")]
    pub kind: FormatKind,
    /// Required when `kind` is `Currency`; kept but unused otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl FormatFunction {
    pub fn new(kind: FormatKind) -> Self {
        FormatFunction { kind, currency: None }
    }

    pub fn currency(code: impl Into<String>) -> Self {
        FormatFunction {
            kind: FormatKind::Currency,
            currency: Some(code.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Number,
    Currency,
    Percent,
    Duration,
}

impl CubeDocument {
    /// Parses a document from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, crate::FormatError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value, crate::FormatError> {
        Ok(serde_json::to_value(self)?)
    }
}
