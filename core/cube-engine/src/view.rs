//! FILENAME: core/cube-engine/src/view.rs
//! Cube View - The snapshot handed to rendering.
//!
//! Everything here is derived data: it is recomputed in full after every
//! navigation command and never patched in place. Items are referenced by
//! their index in `CubeConfig::data`.

use serde::{Deserialize, Serialize};

use crate::definition::ZoomPath;

/// Key of the single node produced when a node has no breakdown.
pub const RAW_DATA_KEY: &str = "__raw__";

/// One aggregated measure value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub measure_id: String,
    pub value: f64,
    pub formatted_value: String,
}

/// One bucket of the current breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    /// Canonical bucket key.
    pub key: String,
    /// Display label, taken from the first member's raw value.
    pub label: String,
    pub item_count: usize,
    /// Member items, as indices into the config data.
    pub items: Vec<usize>,
    /// One cell per measure, in measure order.
    pub cells: Vec<Cell>,
}

impl GroupNode {
    pub fn cell(&self, measure_id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.measure_id == measure_id)
    }

    pub fn is_raw(&self) -> bool {
        self.key == RAW_DATA_KEY
    }
}

/// One step of the zoom path, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub dimension_id: String,
    pub dimension_name: String,
    pub key: String,
    pub label: String,
}

/// Full snapshot of the cube at the current path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeState {
    pub path: ZoomPath,
    /// Items selected by the path, as indices into the config data.
    pub filtered_data: Vec<usize>,
    /// Dimension that subdivides the current node; `None` shows raw items.
    pub breakdown_dimension_id: Option<String>,
    pub groups: Vec<GroupNode>,
    /// Measures aggregated over all of `filtered_data`.
    pub grand_totals: Vec<Cell>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl CubeState {
    pub fn group(&self, key: &str) -> Option<&GroupNode> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn grand_total(&self, measure_id: &str) -> Option<&Cell> {
        self.grand_totals.iter().find(|c| c.measure_id == measure_id)
    }

    /// True when the current node shows raw items.
    pub fn is_raw(&self) -> bool {
        self.breakdown_dimension_id.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}
