//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the cube-engine integration tests.

#![allow(dead_code)]

use cube_engine::{
    create_dimension, create_measure, AggregationType, BreakdownMap, CubeConfig, CubeValue,
    DimensionDescriptor, DimensionSpec, MeasureDescriptor, MeasureSpec, ValueFormat,
};

/// A billable time entry as it comes out of a report import.
#[derive(Debug, Clone)]
pub struct TimeEntry {
    pub task_id: Option<String>,
    pub project: String,
    pub contractor: String,
    pub hours: Option<f64>,
    pub rate: f64,
}

impl TimeEntry {
    pub fn new(task_id: &str, project: &str, contractor: &str, hours: f64, rate: f64) -> Self {
        TimeEntry {
            task_id: Some(task_id.to_string()),
            project: project.to_string(),
            contractor: contractor.to_string(),
            hours: Some(hours),
            rate,
        }
    }
}

/// Billing fixture: a small, deliberately uneven dataset.
pub struct BillingFixture;

impl BillingFixture {
    pub fn data() -> Vec<TimeEntry> {
        vec![
            TimeEntry::new("dev", "webapp", "ann", 2.0, 100.0),
            TimeEntry::new("dev", "webapp", "bob", 3.0, 80.0),
            TimeEntry::new("qa", "webapp", "ann", 1.0, 100.0),
            TimeEntry::new("design", "mobile", "cid", 4.5, 90.0),
            TimeEntry::new("dev", "mobile", "bob", 0.5, 80.0),
            TimeEntry {
                task_id: None,
                project: "mobile".to_string(),
                contractor: "ann".to_string(),
                hours: None,
                rate: 100.0,
            },
            TimeEntry::new("qa", "infra", "cid", 6.0, 90.0),
        ]
    }

    pub fn dimensions() -> Vec<DimensionDescriptor<TimeEntry>> {
        vec![
            create_dimension(
                DimensionSpec::new("task", "Task").value(|e: &TimeEntry| e.task_id.clone().into()),
            )
            .unwrap(),
            create_dimension(
                DimensionSpec::new("project", "Project")
                    .icon("folder")
                    .value(|e: &TimeEntry| CubeValue::text(&e.project)),
            )
            .unwrap(),
            create_dimension(
                DimensionSpec::new("contractor", "Contractor")
                    .value(|e: &TimeEntry| CubeValue::text(&e.contractor))
                    .format(|v: &CubeValue| v.canonical_key().to_uppercase()),
            )
            .unwrap(),
        ]
    }

    pub fn measures() -> Vec<MeasureDescriptor<TimeEntry>> {
        vec![
            create_measure(
                MeasureSpec::new("hours", "Hours")
                    .value(|e: &TimeEntry| e.hours)
                    .aggregation(AggregationType::Sum)
                    .value_format(ValueFormat::Duration),
            )
            .unwrap(),
            create_measure(
                MeasureSpec::new("avg_rate", "Average rate")
                    .value(|e: &TimeEntry| Some(e.rate))
                    .aggregation(AggregationType::Average),
            )
            .unwrap(),
            create_measure(
                MeasureSpec::new("max_hours", "Longest entry")
                    .value(|e: &TimeEntry| e.hours)
                    .aggregation(AggregationType::Max),
            )
            .unwrap(),
            create_measure(MeasureSpec::count("entries", "Entries")).unwrap(),
        ]
    }

    pub fn config() -> CubeConfig<TimeEntry> {
        CubeConfig::new(Self::data(), Self::dimensions(), Self::measures()).unwrap()
    }

    pub fn config_with_map(pairs: &[(&str, Option<&str>)]) -> CubeConfig<TimeEntry> {
        let map: BreakdownMap = pairs
            .iter()
            .map(|(sig, dim)| (sig.to_string(), dim.map(str::to_string)))
            .collect();
        Self::config().with_breakdown_map(map).unwrap()
    }
}

/// Items with the given task ids and hours, everything else constant.
pub fn task_entries(tasks: &[&str], hours: &[f64]) -> Vec<TimeEntry> {
    tasks
        .iter()
        .zip(hours)
        .map(|(task, h)| TimeEntry::new(task, "p", "c", *h, 50.0))
        .collect()
}
