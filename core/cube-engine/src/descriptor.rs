//! FILENAME: core/cube-engine/src/descriptor.rs
//! Descriptor Registry - Dimension and measure descriptors.
//!
//! A descriptor is an immutable capability set (extract / key / format for
//! dimensions, extract / aggregate / format for measures). Specs are filled in
//! by feature code; `create_dimension` and `create_measure` apply defaults and
//! check that the required pieces are present.

use std::sync::Arc;

use crate::aggregate::aggregate_values;
use crate::definition::AggregationType;
use crate::error::{CubeError, DescriptorKind};
use crate::number_format::{format_number, format_value, ValueFormat};
use crate::value::{CubeValue, UNKNOWN_LABEL};

pub type ValueFn<T> = Arc<dyn Fn(&T) -> CubeValue + Send + Sync>;
pub type KeyFn = Arc<dyn Fn(&CubeValue) -> String + Send + Sync>;
pub type LabelFn = Arc<dyn Fn(&CubeValue) -> String + Send + Sync>;
pub type MeasureValueFn<T> = Arc<dyn Fn(&T) -> Option<f64> + Send + Sync>;
pub type AggregateFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;
pub type MeasureFormatFn = Arc<dyn Fn(f64) -> String + Send + Sync>;

// ============================================================================
// DIMENSIONS
// ============================================================================

/// A named way of deriving a grouping key, value and label from an item.
pub struct DimensionDescriptor<T> {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    get_value: ValueFn<T>,
    get_key: KeyFn,
    format_value: LabelFn,
}

impl<T> DimensionDescriptor<T> {
    /// Raw value of this dimension for an item.
    pub fn value(&self, item: &T) -> CubeValue {
        (self.get_value)(item)
    }

    /// Canonical bucket key for a raw value.
    pub fn key(&self, value: &CubeValue) -> String {
        (self.get_key)(value)
    }

    /// Bucket key of an item (`key(value(item))`).
    pub fn item_key(&self, item: &T) -> String {
        self.key(&self.value(item))
    }

    /// Display label for a raw value.
    pub fn label(&self, value: &CubeValue) -> String {
        (self.format_value)(value)
    }
}

impl<T> Clone for DimensionDescriptor<T> {
    fn clone(&self) -> Self {
        DimensionDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            get_value: Arc::clone(&self.get_value),
            get_key: Arc::clone(&self.get_key),
            format_value: Arc::clone(&self.format_value),
        }
    }
}

impl<T> std::fmt::Debug for DimensionDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DimensionDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

/// Input to [`create_dimension`]. Only `get_value` is mandatory beyond
/// `id` and `name`.
pub struct DimensionSpec<T> {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub get_value: Option<ValueFn<T>>,
    pub get_key: Option<KeyFn>,
    pub format_value: Option<LabelFn>,
}

impl<T> DimensionSpec<T> {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        DimensionSpec {
            id: id.into(),
            name: name.into(),
            icon: None,
            get_value: None,
            get_key: None,
            format_value: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn value<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> CubeValue + Send + Sync + 'static,
    {
        self.get_value = Some(Arc::new(f));
        self
    }

    pub fn key<F>(mut self, f: F) -> Self
    where
        F: Fn(&CubeValue) -> String + Send + Sync + 'static,
    {
        self.get_key = Some(Arc::new(f));
        self
    }

    pub fn format<F>(mut self, f: F) -> Self
    where
        F: Fn(&CubeValue) -> String + Send + Sync + 'static,
    {
        self.format_value = Some(Arc::new(f));
        self
    }
}

/// Builds a dimension descriptor, applying the default key (string coercion
/// with a null sentinel) and the default label (the key, "Unknown" for empty).
pub fn create_dimension<T>(spec: DimensionSpec<T>) -> Result<DimensionDescriptor<T>, CubeError> {
    check_identity(&spec.id, &spec.name, DescriptorKind::Dimension)?;

    let get_value = spec.get_value.ok_or_else(|| CubeError::MissingDescriptorField {
        kind: DescriptorKind::Dimension,
        id: spec.id.clone(),
        field: "get_value",
    })?;

    let get_key: KeyFn = spec
        .get_key
        .unwrap_or_else(|| Arc::new(|value: &CubeValue| value.canonical_key()));

    let format_value: LabelFn = match spec.format_value {
        Some(f) => f,
        None => {
            let key = Arc::clone(&get_key);
            Arc::new(move |value: &CubeValue| {
                if value.is_empty() {
                    UNKNOWN_LABEL.to_string()
                } else {
                    key(value)
                }
            })
        }
    };

    Ok(DimensionDescriptor {
        id: spec.id,
        name: spec.name,
        icon: spec.icon,
        get_value,
        get_key,
        format_value,
    })
}

// ============================================================================
// MEASURES
// ============================================================================

/// A named way of deriving and aggregating a number from a group of items.
pub struct MeasureDescriptor<T> {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    get_value: MeasureValueFn<T>,
    aggregate: AggregateFn,
    format_value: MeasureFormatFn,
}

impl<T> MeasureDescriptor<T> {
    /// Raw value of this measure for an item; `None` when the item has none.
    pub fn value(&self, item: &T) -> Option<f64> {
        (self.get_value)(item)
    }

    /// Aggregates the full member set of a group.
    pub fn aggregate(&self, values: &[f64]) -> f64 {
        (self.aggregate)(values)
    }

    pub fn format(&self, value: f64) -> String {
        (self.format_value)(value)
    }
}

impl<T> Clone for MeasureDescriptor<T> {
    fn clone(&self) -> Self {
        MeasureDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            get_value: Arc::clone(&self.get_value),
            aggregate: Arc::clone(&self.aggregate),
            format_value: Arc::clone(&self.format_value),
        }
    }
}

impl<T> std::fmt::Debug for MeasureDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasureDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

/// Input to [`create_measure`]. `get_value` and `aggregate` are mandatory.
pub struct MeasureSpec<T> {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub get_value: Option<MeasureValueFn<T>>,
    pub aggregate: Option<AggregateFn>,
    pub format_value: Option<MeasureFormatFn>,
}

impl<T> MeasureSpec<T> {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        MeasureSpec {
            id: id.into(),
            name: name.into(),
            icon: None,
            get_value: None,
            aggregate: None,
            format_value: None,
        }
    }

    /// A measure that counts the items of each group.
    pub fn count(id: impl Into<String>, name: impl Into<String>) -> Self {
        MeasureSpec::new(id, name)
            .value(|_: &T| Some(1.0))
            .aggregation(AggregationType::Count)
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn value<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<f64> + Send + Sync + 'static,
    {
        self.get_value = Some(Arc::new(f));
        self
    }

    /// Uses one of the built-in aggregation functions.
    pub fn aggregation(mut self, aggregation: AggregationType) -> Self {
        self.aggregate = Some(Arc::new(move |values: &[f64]| {
            aggregate_values(values, aggregation)
        }));
        self
    }

    /// Uses a custom aggregation over the whole member set.
    pub fn aggregate<F>(mut self, f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.aggregate = Some(Arc::new(f));
        self
    }

    /// Uses one of the built-in value formats.
    pub fn value_format(mut self, format: ValueFormat) -> Self {
        self.format_value = Some(Arc::new(move |value: f64| format_value(value, &format)));
        self
    }

    pub fn format<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        self.format_value = Some(Arc::new(f));
        self
    }
}

/// Builds a measure descriptor. The default format is a plain number.
pub fn create_measure<T>(spec: MeasureSpec<T>) -> Result<MeasureDescriptor<T>, CubeError> {
    check_identity(&spec.id, &spec.name, DescriptorKind::Measure)?;

    let get_value = spec.get_value.ok_or_else(|| CubeError::MissingDescriptorField {
        kind: DescriptorKind::Measure,
        id: spec.id.clone(),
        field: "get_value",
    })?;
    let aggregate = spec.aggregate.ok_or_else(|| CubeError::MissingDescriptorField {
        kind: DescriptorKind::Measure,
        id: spec.id.clone(),
        field: "aggregate",
    })?;
    let format_value: MeasureFormatFn = spec
        .format_value
        .unwrap_or_else(|| Arc::new(format_number));

    Ok(MeasureDescriptor {
        id: spec.id,
        name: spec.name,
        icon: spec.icon,
        get_value,
        aggregate,
        format_value,
    })
}

fn check_identity(id: &str, name: &str, kind: DescriptorKind) -> Result<(), CubeError> {
    if id.is_empty() {
        return Err(CubeError::MissingDescriptorField {
            kind,
            id: String::new(),
            field: "id",
        });
    }
    if name.is_empty() {
        return Err(CubeError::MissingDescriptorField {
            kind,
            id: id.to_string(),
            field: "name",
        });
    }
    Ok(())
}
