//! FILENAME: core/cube-engine/src/definition.rs
//! Cube Definition - The configuration a cube is built from.
//!
//! This module contains the types needed to DESCRIBE a cube:
//! - The dataset plus its dimension and measure descriptors
//! - The per-node breakdown policy (path signature -> dimension)
//! - Zoom paths (drill-down selections from the root)
//!
//! A `CubeConfig` is validated once when it is built and is immutable
//! afterwards. Navigation state lives in `CubeNavigator`.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::descriptor::{DimensionDescriptor, MeasureDescriptor};
use crate::error::{CubeError, DescriptorKind};
use crate::path::signature_last_dimension;
use crate::value::CubeValue;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationType {
    Sum,
    Count,
    Average,
    Min,
    Max,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Sum
    }
}

// ============================================================================
// ZOOM PATH
// ============================================================================

/// One drill-down selection: "the node whose `dimension_id` key equals
/// the key of `dimension_value`".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoomPathEntry {
    pub dimension_id: String,
    pub dimension_value: CubeValue,
}

impl ZoomPathEntry {
    pub fn new(dimension_id: impl Into<String>, dimension_value: impl Into<CubeValue>) -> Self {
        ZoomPathEntry {
            dimension_id: dimension_id.into(),
            dimension_value: dimension_value.into(),
        }
    }
}

/// Ordered drill-down selections from the root. The root is the empty path.
pub type ZoomPath = SmallVec<[ZoomPathEntry; 4]>;

/// Path signature -> dimension that subdivides that node.
/// `None` (or a missing key) means the node shows raw items.
pub type BreakdownMap = BTreeMap<String, Option<String>>;

// ============================================================================
// OPTIONS
// ============================================================================

/// How `set_zoom_path` checks a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ZoomValidation {
    /// Every prefix must resolve to the dimension of the entry that follows it.
    #[default]
    Strict,
    /// Only structural checks: known dimensions, no consecutive repeats.
    Unchecked,
}

/// Behavior switches for a cube.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeOptions {
    /// Validation applied by `CubeNavigator::set_zoom_path`.
    #[serde(default)]
    pub zoom_validation: ZoomValidation,

    /// Label of the single node shown when a node has no breakdown.
    #[serde(default = "default_raw_data_label")]
    pub raw_data_label: String,
}

fn default_raw_data_label() -> String {
    "All items".to_string()
}

impl Default for CubeOptions {
    fn default() -> Self {
        CubeOptions {
            zoom_validation: ZoomValidation::Strict,
            raw_data_label: default_raw_data_label(),
        }
    }
}

// ============================================================================
// MAIN CONFIG STRUCT
// ============================================================================

/// A dataset plus everything needed to group and summarize it.
pub struct CubeConfig<T> {
    data: Vec<T>,
    dimensions: Vec<DimensionDescriptor<T>>,
    measures: Vec<MeasureDescriptor<T>>,
    breakdown_map: BreakdownMap,
    initial_grouping: Option<Vec<String>>,
    options: CubeOptions,
    dimension_index: FxHashMap<String, usize>,
    measure_index: FxHashMap<String, usize>,
}

impl<T> CubeConfig<T> {
    /// Builds a config with an empty breakdown map.
    /// Fails on duplicate ids or an empty measure set.
    pub fn new(
        data: Vec<T>,
        dimensions: Vec<DimensionDescriptor<T>>,
        measures: Vec<MeasureDescriptor<T>>,
    ) -> Result<Self, CubeError> {
        if measures.is_empty() {
            return Err(CubeError::NoMeasures);
        }

        let dimension_index = index_ids(
            dimensions.iter().map(|d| d.id.as_str()),
            DescriptorKind::Dimension,
        )?;
        let measure_index = index_ids(
            measures.iter().map(|m| m.id.as_str()),
            DescriptorKind::Measure,
        )?;

        log::debug!(
            "cube: config built items={} dimensions={} measures={}",
            data.len(),
            dimensions.len(),
            measures.len()
        );

        Ok(CubeConfig {
            data,
            dimensions,
            measures,
            breakdown_map: BreakdownMap::new(),
            initial_grouping: None,
            options: CubeOptions::default(),
            dimension_index,
            measure_index,
        })
    }

    /// Sets the breakdown policy. Every referenced dimension must exist and
    /// differ from the last dimension of the node's signature.
    pub fn with_breakdown_map(mut self, breakdown_map: BreakdownMap) -> Result<Self, CubeError> {
        for (signature, dimension_id) in &breakdown_map {
            let Some(id) = dimension_id else { continue };
            if !self.has_dimension(id) {
                return Err(CubeError::DanglingBreakdownReference {
                    signature: signature.clone(),
                    dimension_id: id.clone(),
                });
            }
            if signature_last_dimension(signature) == Some(id.as_str()) {
                return Err(CubeError::RepeatedBreakdownDimension {
                    signature: signature.clone(),
                    dimension_id: id.clone(),
                });
            }
        }
        self.breakdown_map = breakdown_map;
        Ok(self)
    }

    /// Sets the first-view default grouping order.
    pub fn with_initial_grouping(mut self, grouping: Vec<String>) -> Result<Self, CubeError> {
        if let Some(unknown) = grouping.iter().find(|id| !self.has_dimension(id)) {
            return Err(CubeError::UnknownDimension(unknown.clone()));
        }
        if let Some(pair) = grouping.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(CubeError::RepeatedInitialGrouping(pair[0].clone()));
        }
        self.initial_grouping = Some(grouping);
        Ok(self)
    }

    pub fn with_options(mut self, options: CubeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn dimensions(&self) -> &[DimensionDescriptor<T>] {
        &self.dimensions
    }

    pub fn measures(&self) -> &[MeasureDescriptor<T>] {
        &self.measures
    }

    pub fn breakdown_map(&self) -> &BreakdownMap {
        &self.breakdown_map
    }

    pub fn initial_grouping(&self) -> Option<&[String]> {
        self.initial_grouping.as_deref()
    }

    pub fn options(&self) -> &CubeOptions {
        &self.options
    }

    pub fn dimension(&self, id: &str) -> Option<&DimensionDescriptor<T>> {
        self.dimension_index.get(id).map(|&i| &self.dimensions[i])
    }

    pub fn measure(&self, id: &str) -> Option<&MeasureDescriptor<T>> {
        self.measure_index.get(id).map(|&i| &self.measures[i])
    }

    pub fn has_dimension(&self, id: &str) -> bool {
        self.dimension_index.contains_key(id)
    }

    /// Looks up a dimension, failing with `UnknownDimension`.
    pub(crate) fn require_dimension(&self, id: &str) -> Result<&DimensionDescriptor<T>, CubeError> {
        self.dimension(id)
            .ok_or_else(|| CubeError::UnknownDimension(id.to_string()))
    }
}

impl<T> std::fmt::Debug for CubeConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CubeConfig")
            .field("items", &self.data.len())
            .field("dimensions", &self.dimensions)
            .field("measures", &self.measures)
            .field("breakdown_map", &self.breakdown_map)
            .field("initial_grouping", &self.initial_grouping)
            .field("options", &self.options)
            .finish()
    }
}

fn index_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: DescriptorKind,
) -> Result<FxHashMap<String, usize>, CubeError> {
    let mut index = FxHashMap::default();
    for (i, id) in ids.enumerate() {
        if index.insert(id.to_string(), i).is_some() {
            return Err(CubeError::DuplicateDescriptorId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(index)
}
