//! FILENAME: core/cube-engine/src/engine.rs
//! Cube Engine - The calculation core that turns a config and a zoom path
//! into a renderable `CubeState`.
//!
//! Algorithm:
//! 1. Filter: apply each zoom path entry as a key-equality predicate
//! 2. Resolve the breakdown dimension of the current node
//! 3. Group: bucket the filtered items by breakdown key, first-seen order
//! 4. Aggregate: one cell per measure per bucket, from the full member set
//! 5. Grand totals: the same aggregation over the whole filtered set
//!
//! Every call recomputes from scratch; nothing is cached between calls.

use rustc_hash::FxHashMap;

use crate::definition::{BreakdownMap, CubeConfig, ZoomPathEntry};
use crate::error::CubeError;
use crate::path::resolve_breakdown_in;
use crate::view::{Breadcrumb, Cell, CubeState, GroupNode, RAW_DATA_KEY};

// ============================================================================
// CUBE CALCULATOR
// ============================================================================

/// Computes a full snapshot for one node of the cube.
pub struct CubeCalculator<'a, T> {
    config: &'a CubeConfig<T>,
    breakdown_map: &'a BreakdownMap,
    path: &'a [ZoomPathEntry],
}

impl<'a, T> CubeCalculator<'a, T> {
    pub fn new(
        config: &'a CubeConfig<T>,
        breakdown_map: &'a BreakdownMap,
        path: &'a [ZoomPathEntry],
    ) -> Self {
        CubeCalculator {
            config,
            breakdown_map,
            path,
        }
    }

    /// Executes the full calculation and returns the snapshot.
    pub fn calculate(&self) -> Result<CubeState, CubeError> {
        // Step 1: Narrow the data down to the current node
        let filtered_data = compute_filtered_data(self.config, self.path)?;

        // Step 2: Which dimension subdivides this node
        let breakdown = resolve_breakdown_in(self.config, self.breakdown_map, self.path)?;

        // Step 3 + 4: Buckets and their cells
        let groups = compute_groups(self.config, &filtered_data, breakdown)?;

        // Step 5: Totals straight from the filtered set
        let grand_totals = compute_grand_totals(self.config, &filtered_data);

        let breadcrumbs = self.breadcrumbs()?;

        log::debug!(
            "cube: calculated depth={} filtered={} breakdown={:?} groups={}",
            self.path.len(),
            filtered_data.len(),
            breakdown,
            groups.len()
        );

        Ok(CubeState {
            path: self.path.iter().cloned().collect(),
            filtered_data,
            breakdown_dimension_id: breakdown.map(str::to_string),
            groups,
            grand_totals,
            breadcrumbs,
        })
    }

    fn breadcrumbs(&self) -> Result<Vec<Breadcrumb>, CubeError> {
        self.path
            .iter()
            .map(|entry| {
                let dimension = self.config.require_dimension(&entry.dimension_id)?;
                Ok(Breadcrumb {
                    dimension_id: dimension.id.clone(),
                    dimension_name: dimension.name.clone(),
                    key: dimension.key(&entry.dimension_value),
                    label: dimension.label(&entry.dimension_value),
                })
            })
            .collect()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Indices of the items selected by a zoom path.
///
/// Each entry keeps the items whose key for that dimension equals the key of
/// the entry's value; entries are applied in order.
pub fn compute_filtered_data<T>(
    config: &CubeConfig<T>,
    path: &[ZoomPathEntry],
) -> Result<Vec<usize>, CubeError> {
    let data = config.data();
    let mut selected: Vec<usize> = (0..data.len()).collect();

    for entry in path {
        let dimension = config.require_dimension(&entry.dimension_id)?;
        let wanted = dimension.key(&entry.dimension_value);
        selected.retain(|&i| dimension.item_key(&data[i]) == wanted);
    }

    Ok(selected)
}

/// Groups items by a breakdown dimension.
///
/// With no breakdown, a single raw-data node wraps all items. Otherwise one
/// node per distinct key, in first-seen order, labelled from its first member.
pub fn compute_groups<T>(
    config: &CubeConfig<T>,
    items: &[usize],
    breakdown_dimension_id: Option<&str>,
) -> Result<Vec<GroupNode>, CubeError> {
    let data = config.data();
    let members: Vec<usize> = items.iter().copied().filter(|&i| i < data.len()).collect();

    let Some(dimension_id) = breakdown_dimension_id else {
        let cells = compute_cells(config, &members);
        return Ok(vec![GroupNode {
            key: RAW_DATA_KEY.to_string(),
            label: config.options().raw_data_label.clone(),
            item_count: members.len(),
            items: members,
            cells,
        }]);
    };

    let dimension = config.require_dimension(dimension_id)?;

    // Single pass: key -> bucket position
    let mut bucket_index: FxHashMap<String, usize> = FxHashMap::default();
    let mut buckets: Vec<(String, Vec<usize>)> = Vec::new();

    for &i in &members {
        let key = dimension.item_key(&data[i]);
        match bucket_index.get(&key) {
            Some(&b) => buckets[b].1.push(i),
            None => {
                bucket_index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![i]));
            }
        }
    }

    let groups = buckets
        .into_iter()
        .map(|(key, bucket_items)| {
            // Buckets are created with their first member, so [0] exists.
            let label = dimension.label(&dimension.value(&data[bucket_items[0]]));
            let cells = compute_cells(config, &bucket_items);
            GroupNode {
                key,
                label,
                item_count: bucket_items.len(),
                items: bucket_items,
                cells,
            }
        })
        .collect();

    Ok(groups)
}

/// Measures aggregated over the whole filtered set.
pub fn compute_grand_totals<T>(config: &CubeConfig<T>, items: &[usize]) -> Vec<Cell> {
    let data = config.data();
    let members: Vec<usize> = items.iter().copied().filter(|&i| i < data.len()).collect();
    compute_cells(config, &members)
}

/// Full snapshot at `path` under `breakdown_map`.
pub fn compute_state<T>(
    config: &CubeConfig<T>,
    breakdown_map: &BreakdownMap,
    path: &[ZoomPathEntry],
) -> Result<CubeState, CubeError> {
    CubeCalculator::new(config, breakdown_map, path).calculate()
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// One cell per measure over a member set. Items without a value for a
/// measure are left out of that measure's input.
fn compute_cells<T>(config: &CubeConfig<T>, members: &[usize]) -> Vec<Cell> {
    let data = config.data();
    config
        .measures()
        .iter()
        .map(|measure| {
            let values: Vec<f64> = members
                .iter()
                .filter_map(|&i| measure.value(&data[i]))
                .collect();
            let value = measure.aggregate(&values);
            Cell {
                measure_id: measure.id.clone(),
                value,
                formatted_value: measure.format(value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::AggregationType;
    use crate::descriptor::{create_dimension, create_measure, DimensionSpec, MeasureSpec};
    use crate::value::{CubeValue, NULL_KEY, UNKNOWN_LABEL};

    struct TimeEntry {
        task_id: Option<&'static str>,
        client_id: u32,
        hours: Option<f64>,
    }

    fn entry(task_id: Option<&'static str>, client_id: u32, hours: Option<f64>) -> TimeEntry {
        TimeEntry { task_id, client_id, hours }
    }

    fn create_test_config(data: Vec<TimeEntry>) -> CubeConfig<TimeEntry> {
        let dims = vec![
            create_dimension(DimensionSpec::new("task", "Task").value(|e: &TimeEntry| e.task_id.into()))
                .unwrap(),
            create_dimension(
                DimensionSpec::new("client", "Client")
                    .value(|e: &TimeEntry| e.client_id.into())
                    .format(|v: &CubeValue| match v.as_f64() {
                        Some(n) if n == 1.0 => "Acme Corp".to_string(),
                        Some(n) if n == 2.0 => "Globex".to_string(),
                        _ => "Other".to_string(),
                    }),
            )
            .unwrap(),
        ];
        let measures = vec![
            create_measure(
                MeasureSpec::new("hours", "Hours")
                    .value(|e: &TimeEntry| e.hours)
                    .aggregation(AggregationType::Sum),
            )
            .unwrap(),
            create_measure(
                MeasureSpec::new("avg_hours", "Average hours")
                    .value(|e: &TimeEntry| e.hours)
                    .aggregation(AggregationType::Average),
            )
            .unwrap(),
            create_measure(MeasureSpec::count("entries", "Entries")).unwrap(),
        ];
        CubeConfig::new(data, dims, measures).unwrap()
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let config = create_test_config(vec![
            entry(Some("qa"), 1, Some(1.0)),
            entry(Some("dev"), 1, Some(2.0)),
            entry(Some("qa"), 2, Some(4.0)),
        ]);
        let groups = compute_groups(&config, &[0, 1, 2], Some("task")).unwrap();

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["qa", "dev"]);
        assert_eq!(groups[0].items, vec![0, 2]);
        assert_eq!(groups[0].cell("hours").unwrap().value, 5.0);
        assert_eq!(groups[0].cell("entries").unwrap().value, 2.0);
    }

    #[test]
    fn test_label_comes_from_raw_value() {
        let config = create_test_config(vec![
            entry(Some("dev"), 2, Some(1.0)),
            entry(Some("dev"), 1, Some(1.0)),
        ]);
        let groups = compute_groups(&config, &[0, 1], Some("client")).unwrap();
        assert_eq!(groups[0].key, "2");
        assert_eq!(groups[0].label, "Globex");
        assert_eq!(groups[1].key, "1");
        assert_eq!(groups[1].label, "Acme Corp");
    }

    #[test]
    fn test_missing_values_land_in_unknown_bucket() {
        let config = create_test_config(vec![
            entry(None, 1, Some(1.0)),
            entry(Some("dev"), 1, None),
            entry(None, 1, Some(3.0)),
        ]);
        let groups = compute_groups(&config, &[0, 1, 2], Some("task")).unwrap();

        let unknown = groups.iter().find(|g| g.key == NULL_KEY).unwrap();
        assert_eq!(unknown.label, UNKNOWN_LABEL);
        assert_eq!(unknown.item_count, 2);
        assert_eq!(unknown.cell("hours").unwrap().value, 4.0);

        // A missing measure value is skipped, the item still counts.
        let dev = groups.iter().find(|g| g.key == "dev").unwrap();
        assert_eq!(dev.cell("hours").unwrap().value, 0.0);
        assert_eq!(dev.cell("entries").unwrap().value, 1.0);
    }

    #[test]
    fn test_no_breakdown_yields_raw_node() {
        let config = create_test_config(vec![
            entry(Some("dev"), 1, Some(2.0)),
            entry(Some("qa"), 1, Some(1.0)),
        ]);
        let groups = compute_groups(&config, &[0, 1], None).unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_raw());
        assert_eq!(groups[0].label, "All items");
        assert_eq!(groups[0].items, vec![0, 1]);
        assert_eq!(groups[0].cell("hours").unwrap().value, 3.0);
    }

    #[test]
    fn test_signed_zero_shares_a_bucket() {
        let dims = vec![create_dimension(
            DimensionSpec::new("delta", "Delta").value(|v: &f64| CubeValue::number(*v)),
        )
        .unwrap()];
        let measures = vec![create_measure(MeasureSpec::count("n", "Count")).unwrap()];
        let config = CubeConfig::new(vec![0.0, -0.0, 1.5], dims, measures).unwrap();

        let groups = compute_groups(&config, &[0, 1, 2], Some("delta")).unwrap();
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["0", "1.5"]);
        assert_eq!(groups[0].items, vec![0, 1]);

        let path = vec![ZoomPathEntry::new("delta", -0.0)];
        assert_eq!(compute_filtered_data(&config, &path).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_unknown_breakdown_dimension() {
        let config = create_test_config(vec![entry(Some("dev"), 1, Some(2.0))]);
        let err = compute_groups(&config, &[0], Some("ghost")).unwrap_err();
        assert_eq!(err, CubeError::UnknownDimension("ghost".to_string()));
    }

    #[test]
    fn test_filter_matches_through_keys() {
        let config = create_test_config(vec![
            entry(Some("dev"), 1, Some(2.0)),
            entry(Some("qa"), 2, Some(1.0)),
            entry(Some("dev"), 2, Some(5.0)),
        ]);
        // Text "2" and number 2 share the key "2".
        let path = vec![
            ZoomPathEntry::new("client", "2"),
            ZoomPathEntry::new("task", "dev"),
        ];
        assert_eq!(compute_filtered_data(&config, &path).unwrap(), vec![2]);
    }

    #[test]
    fn test_grand_totals_use_full_set() {
        let config = create_test_config(vec![
            entry(Some("a"), 1, Some(1.0)),
            entry(Some("a"), 1, Some(2.0)),
            entry(Some("a"), 1, Some(3.0)),
            entry(Some("b"), 1, Some(10.0)),
        ]);
        let totals = compute_grand_totals(&config, &[0, 1, 2, 3]);
        let avg = totals.iter().find(|c| c.measure_id == "avg_hours").unwrap();
        assert_eq!(avg.value, 4.0);
        assert_eq!(avg.formatted_value, "4");
    }

    #[test]
    fn test_compute_state_breadcrumbs() {
        let config = create_test_config(vec![
            entry(Some("dev"), 1, Some(2.0)),
            entry(Some("qa"), 2, Some(1.0)),
        ]);
        let mut map = BreakdownMap::new();
        map.insert(String::new(), Some("client".to_string()));
        map.insert("client:1".to_string(), Some("task".to_string()));

        let path = vec![ZoomPathEntry::new("client", 1u32)];
        let state = compute_state(&config, &map, &path).unwrap();

        assert_eq!(state.filtered_data, vec![0]);
        assert_eq!(state.breakdown_dimension_id.as_deref(), Some("task"));
        assert_eq!(state.breadcrumbs.len(), 1);
        assert_eq!(state.breadcrumbs[0].dimension_name, "Client");
        assert_eq!(state.breadcrumbs[0].key, "1");
        assert_eq!(state.breadcrumbs[0].label, "Acme Corp");
    }
}
