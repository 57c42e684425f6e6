//! FILENAME: tests/common/mod.rs
//! Fixtures for the cube-format integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};

/// A complete document: two dimensions, three measures, a per-branch
/// breakdown map and a handful of report lines.
pub fn sample_document_json() -> Value {
    json!({
        "config": {
            "dimensions": [
                {
                    "id": "project",
                    "name": "Project",
                    "icon": "folder",
                    "fieldName": "project",
                    "keyFieldName": "same"
                },
                {
                    "id": "contractor",
                    "name": "Contractor",
                    "fieldName": "contractor.id",
                    "keyFieldName": "same",
                    "labelMapping": { "1": "Ann Smith", "2": "Bob Jones" }
                },
                {
                    "id": "task",
                    "name": "Task",
                    "fieldName": "taskId",
                    "keyFieldName": "same"
                }
            ],
            "measures": [
                {
                    "id": "hours",
                    "name": "Hours",
                    "icon": "clock",
                    "fieldName": "hours",
                    "aggregationFunction": "sum",
                    "formatFunction": { "type": "duration" }
                },
                {
                    "id": "cost",
                    "name": "Cost",
                    "fieldName": "cost",
                    "aggregationFunction": "sum",
                    "formatFunction": { "type": "currency", "currency": "EUR" }
                },
                {
                    "id": "entries",
                    "name": "Entries",
                    "fieldName": "id",
                    "aggregationFunction": "count",
                    "formatFunction": { "type": "number" }
                }
            ],
            "breakdownMap": {
                "": "project",
                "project:webapp": "contractor",
                "project:mobile": "task",
                "project:infra": null
            },
            "initialGrouping": ["project"]
        },
        "data": [
            { "id": 1, "project": "webapp", "contractor": { "id": 1 }, "taskId": "dev", "hours": 2, "cost": 200 },
            { "id": 2, "project": "webapp", "contractor": { "id": 2 }, "taskId": "dev", "hours": 3, "cost": 240 },
            { "id": 3, "project": "webapp", "contractor": { "id": 1 }, "taskId": "qa", "hours": 1.5, "cost": 150 },
            { "id": 4, "project": "mobile", "contractor": { "id": 2 }, "taskId": "design", "hours": 4, "cost": "320" },
            { "id": 5, "project": "mobile", "contractor": { "id": 3 }, "hours": 0.5, "cost": 45 },
            { "id": 6, "project": "infra", "contractor": { "id": 1 }, "taskId": "ops", "cost": 100 }
        ]
    })
}

pub fn sample_document_str() -> String {
    sample_document_json().to_string()
}
