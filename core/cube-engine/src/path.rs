//! FILENAME: core/cube-engine/src/path.rs
//! Path & Breakdown Resolver.
//!
//! A zoom path is reduced to a canonical signature
//! (`"dim:key|dim:key"`, root = `""`) which is the only lookup key into the
//! breakdown map. Different branches of the tree therefore carry independent
//! breakdown choices: there is no global hierarchy.

use crate::definition::{BreakdownMap, CubeConfig, ZoomPathEntry, ZoomValidation};
use crate::error::{CubeError, NavigationError};

/// Canonical signature of a zoom path. Keys go through each dimension's
/// `get_key`, so two values with the same key give the same signature.
pub fn path_signature<T>(config: &CubeConfig<T>, path: &[ZoomPathEntry]) -> Result<String, CubeError> {
    let mut parts = Vec::with_capacity(path.len());
    for entry in path {
        let dimension = config.require_dimension(&entry.dimension_id)?;
        parts.push(format!(
            "{}:{}",
            entry.dimension_id,
            dimension.key(&entry.dimension_value)
        ));
    }
    Ok(parts.join("|"))
}

/// Dimension id of the last entry encoded in a signature. `None` for the root.
pub(crate) fn signature_last_dimension(signature: &str) -> Option<&str> {
    let last = signature.rsplit('|').next()?;
    last.split_once(':').map(|(dimension_id, _)| dimension_id)
}

/// Resolves the breakdown dimension of a node using the config's own map.
pub fn resolve_breakdown<'a, T>(
    config: &'a CubeConfig<T>,
    path: &[ZoomPathEntry],
) -> Result<Option<&'a str>, CubeError> {
    resolve_breakdown_in(config, config.breakdown_map(), path)
}

/// Resolves the breakdown dimension of a node against an explicit map.
///
/// An explicit entry always wins (`None` = show raw items). Without one, the
/// config's initial grouping supplies a default when the path follows it
/// exactly; otherwise the node is terminal.
pub fn resolve_breakdown_in<'a, T>(
    config: &'a CubeConfig<T>,
    breakdown_map: &BreakdownMap,
    path: &[ZoomPathEntry],
) -> Result<Option<&'a str>, CubeError> {
    let signature = path_signature(config, path)?;

    match breakdown_map.get(&signature) {
        Some(Some(dimension_id)) => match config.dimension(dimension_id) {
            Some(dimension) => Ok(Some(dimension.id.as_str())),
            None => Err(CubeError::DanglingBreakdownReference {
                signature,
                dimension_id: dimension_id.clone(),
            }),
        },
        Some(None) => Ok(None),
        None => Ok(initial_grouping_default(config, path)),
    }
}

/// `initial_grouping[depth]` when the path's dimensions are exactly
/// `initial_grouping[..depth]`.
fn initial_grouping_default<'a, T>(config: &'a CubeConfig<T>, path: &[ZoomPathEntry]) -> Option<&'a str> {
    let grouping = config.initial_grouping()?;
    let follows = grouping.len() > path.len()
        && path
            .iter()
            .zip(grouping)
            .all(|(entry, id)| &entry.dimension_id == id);
    if follows {
        Some(grouping[path.len()].as_str())
    } else {
        None
    }
}

/// Checks a candidate zoom path.
///
/// Structural rules always apply: every dimension exists and no dimension
/// follows itself. In `Strict` mode each prefix must also resolve to the
/// dimension of the entry that follows it.
pub fn validate_zoom_path<T>(
    config: &CubeConfig<T>,
    breakdown_map: &BreakdownMap,
    path: &[ZoomPathEntry],
    mode: ZoomValidation,
) -> Result<(), NavigationError> {
    for (depth, entry) in path.iter().enumerate() {
        if !config.has_dimension(&entry.dimension_id) {
            return Err(NavigationError::UnknownDimension(entry.dimension_id.clone()));
        }
        if depth > 0 && path[depth - 1].dimension_id == entry.dimension_id {
            return Err(NavigationError::RepeatedDimension(entry.dimension_id.clone()));
        }
    }

    if mode == ZoomValidation::Unchecked {
        return Ok(());
    }

    for (depth, entry) in path.iter().enumerate() {
        let expected = resolve_breakdown_in(config, breakdown_map, &path[..depth])?;
        if expected != Some(entry.dimension_id.as_str()) {
            return Err(NavigationError::BreakdownMismatch {
                depth,
                found: entry.dimension_id.clone(),
                expected: expected.map(str::to_string),
            });
        }
    }
    Ok(())
}

/// Writes (or overwrites) the breakdown of one node.
///
/// The child dimension must exist and must differ from the dimension that
/// selected the node, otherwise drilling would repeat it.
pub fn set_node_child_dimension<T>(
    config: &CubeConfig<T>,
    breakdown_map: &mut BreakdownMap,
    path: &[ZoomPathEntry],
    dimension_id: Option<&str>,
) -> Result<(), NavigationError> {
    if let Some(id) = dimension_id {
        if !config.has_dimension(id) {
            return Err(NavigationError::UnknownDimension(id.to_string()));
        }
        if path.last().is_some_and(|last| last.dimension_id == id) {
            return Err(NavigationError::InvalidChildDimension(id.to_string()));
        }
    }

    let signature = path_signature(config, path)?;
    breakdown_map.insert(signature, dimension_id.map(str::to_string));
    Ok(())
}
