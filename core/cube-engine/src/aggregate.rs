//! FILENAME: core/cube-engine/src/aggregate.rs
//! Built-in aggregation functions.
//!
//! Aggregates are always computed from the full list of member values of a
//! group. Nothing here merges partial results, so non-additive functions
//! (average, min, max) stay exact at every level.

use crate::definition::AggregationType;

/// Accumulator holding the intermediate state for every built-in aggregation.
#[derive(Debug, Clone, Default)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        AggregateAccumulator::default()
    }

    /// Adds a numeric value to the accumulator.
    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Computes the final aggregate value. Empty sets yield 0.
    pub fn compute(&self, aggregation: AggregationType) -> f64 {
        match aggregation {
            AggregationType::Sum => self.sum,
            AggregationType::Count => self.count as f64,
            AggregationType::Average => {
                if self.count > 0 {
                    self.sum / (self.count as f64)
                } else {
                    0.0
                }
            }
            AggregationType::Min => self.min.unwrap_or(0.0),
            AggregationType::Max => self.max.unwrap_or(0.0),
        }
    }
}

/// Applies a built-in aggregation to a full member set.
pub fn aggregate_values(values: &[f64], aggregation: AggregationType) -> f64 {
    let mut acc = AggregateAccumulator::new();
    for &value in values {
        acc.add_number(value);
    }
    acc.compute(aggregation)
}
