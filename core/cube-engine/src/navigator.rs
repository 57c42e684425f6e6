//! FILENAME: core/cube-engine/src/navigator.rs
//! Drill-down State Machine.
//!
//! `CubeNavigator` is the single owner of the mutable navigation state: the
//! zoom path and the breakdown map. Every command validates first, then
//! commits path/map and the recomputed snapshot together, so a rejected
//! command leaves all three untouched.
//!
//! Hosts that serve several clients wrap one navigator in a `Mutex`; the
//! `&mut self` receivers make each resolve-then-write sequence atomic.

use std::sync::Arc;

use crate::definition::{BreakdownMap, CubeConfig, ZoomPath, ZoomPathEntry, ZoomValidation};
use crate::descriptor::DimensionDescriptor;
use crate::engine::compute_state;
use crate::error::{CubeError, NavigationError};
use crate::path::{resolve_breakdown_in, set_node_child_dimension, validate_zoom_path};
use crate::value::CubeValue;
use crate::view::CubeState;

/// Navigation controller over one immutable cube config.
#[derive(Debug)]
pub struct CubeNavigator<T> {
    config: Arc<CubeConfig<T>>,
    path: ZoomPath,
    breakdown_map: BreakdownMap,
    state: CubeState,
}

impl<T> CubeNavigator<T> {
    /// Starts at the root with the config's breakdown map.
    pub fn new(config: Arc<CubeConfig<T>>) -> Result<Self, CubeError> {
        let breakdown_map = config.breakdown_map().clone();
        let path = ZoomPath::new();
        let state = compute_state(&config, &breakdown_map, &path)?;
        Ok(CubeNavigator {
            config,
            path,
            breakdown_map,
            state,
        })
    }

    pub fn config(&self) -> &Arc<CubeConfig<T>> {
        &self.config
    }

    pub fn state(&self) -> &CubeState {
        &self.state
    }

    pub fn path(&self) -> &[ZoomPathEntry] {
        &self.path
    }

    pub fn breakdown_map(&self) -> &BreakdownMap {
        &self.breakdown_map
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Breakdown dimension of the current node.
    pub fn current_breakdown(&self) -> Option<&str> {
        self.state.breakdown_dimension_id.as_deref()
    }

    /// Breakdown dimension of any node under the current map.
    pub fn resolve_breakdown(&self, path: &[ZoomPathEntry]) -> Result<Option<&str>, CubeError> {
        resolve_breakdown_in(&self.config, &self.breakdown_map, path)
    }

    /// Opens the child `value` of the current node. Only legal when the
    /// current node is broken down by `dimension_id`.
    pub fn drill_into(
        &mut self,
        dimension_id: &str,
        value: impl Into<CubeValue>,
    ) -> Result<&CubeState, NavigationError> {
        let expected = self.resolve_breakdown(&self.path)?;
        if expected != Some(dimension_id) {
            let err = NavigationError::IllegalDrill {
                requested: dimension_id.to_string(),
                expected: expected.map(str::to_string),
            };
            log::warn!("cube: drill_into rejected: {}", err);
            return Err(err);
        }

        if self.path.last().is_some_and(|last| last.dimension_id == dimension_id) {
            let err = NavigationError::RepeatedDimension(dimension_id.to_string());
            log::warn!("cube: drill_into rejected: {}", err);
            return Err(err);
        }

        let mut path = self.path.clone();
        path.push(ZoomPathEntry::new(dimension_id, value));
        log::debug!("cube: drill_into {} depth={}", dimension_id, path.len());
        self.commit(path, None)
    }

    /// Drops the deepest selection. No-op at the root.
    pub fn up(&mut self) -> Result<&CubeState, NavigationError> {
        if self.path.is_empty() {
            return Ok(&self.state);
        }
        let mut path = self.path.clone();
        path.pop();
        log::debug!("cube: up depth={}", path.len());
        self.commit(path, None)
    }

    /// Returns to the root.
    pub fn reset(&mut self) -> Result<&CubeState, NavigationError> {
        log::debug!("cube: reset");
        self.commit(ZoomPath::new(), None)
    }

    /// Replaces the path, validated with the config's `zoom_validation` mode.
    pub fn set_zoom_path(&mut self, path: impl IntoIterator<Item = ZoomPathEntry>) -> Result<&CubeState, NavigationError> {
        let mode = self.config.options().zoom_validation;
        self.set_zoom_path_with(path, mode)
    }

    /// Replaces the path with an explicit validation mode.
    ///
    /// `Strict` accepts a path only if every prefix is broken down by the
    /// dimension of the next entry; truncations of the current path always
    /// pass. `Unchecked` allows arbitrary jumps that are structurally valid.
    pub fn set_zoom_path_with(
        &mut self,
        path: impl IntoIterator<Item = ZoomPathEntry>,
        mode: ZoomValidation,
    ) -> Result<&CubeState, NavigationError> {
        let path: ZoomPath = path.into_iter().collect();
        if let Err(err) = validate_zoom_path(&self.config, &self.breakdown_map, &path, mode) {
            log::warn!("cube: set_zoom_path rejected: {}", err);
            return Err(err);
        }
        log::debug!("cube: set_zoom_path depth={} mode={:?}", path.len(), mode);
        self.commit(path, None)
    }

    /// Chooses the dimension that subdivides the node at `node_path`
    /// (`None` = show raw items there).
    ///
    /// When the node lies strictly above the current position and its child
    /// dimension actually changes, the current path is cut back to that node,
    /// since the selections below it no longer exist.
    pub fn set_node_child_dimension(
        &mut self,
        node_path: &[ZoomPathEntry],
        dimension_id: Option<&str>,
    ) -> Result<&CubeState, NavigationError> {
        let previous = self
            .resolve_breakdown(node_path)?
            .map(str::to_string);

        let mut breakdown_map = self.breakdown_map.clone();
        if let Err(err) =
            set_node_child_dimension(&self.config, &mut breakdown_map, node_path, dimension_id)
        {
            log::warn!("cube: set_node_child_dimension rejected: {}", err);
            return Err(err);
        }

        let changed = previous.as_deref() != dimension_id;
        let path = if changed && self.is_strict_prefix(node_path) {
            node_path.iter().cloned().collect()
        } else {
            self.path.clone()
        };

        log::debug!(
            "cube: set_node_child_dimension depth={} {:?} -> {:?}",
            node_path.len(),
            previous,
            dimension_id
        );
        self.commit(path, Some(breakdown_map))
    }

    /// Dimensions that may subdivide the node at `node_path`: every dimension
    /// except the one that selected the node.
    pub fn child_dimension_candidates(&self, node_path: &[ZoomPathEntry]) -> Vec<&DimensionDescriptor<T>> {
        let last = node_path.last().map(|e| e.dimension_id.as_str());
        self.config
            .dimensions()
            .iter()
            .filter(|d| Some(d.id.as_str()) != last)
            .collect()
    }

    /// Whether `node_path` is a strict prefix of the current path, compared
    /// through dimension keys.
    fn is_strict_prefix(&self, node_path: &[ZoomPathEntry]) -> bool {
        if node_path.len() >= self.path.len() {
            return false;
        }
        node_path.iter().zip(self.path.iter()).all(|(a, b)| {
            a.dimension_id == b.dimension_id
                && self.config.dimension(&a.dimension_id).is_some_and(|d| {
                    d.key(&a.dimension_value) == d.key(&b.dimension_value)
                })
        })
    }

    /// Recomputes the snapshot for the new path (and map, if given) and only
    /// then replaces the navigator's state.
    fn commit(
        &mut self,
        path: ZoomPath,
        breakdown_map: Option<BreakdownMap>,
    ) -> Result<&CubeState, NavigationError> {
        let map = breakdown_map.as_ref().unwrap_or(&self.breakdown_map);
        let state = compute_state(&self.config, map, &path)?;

        if let Some(map) = breakdown_map {
            self.breakdown_map = map;
        }
        self.path = path;
        self.state = state;
        Ok(&self.state)
    }
}
