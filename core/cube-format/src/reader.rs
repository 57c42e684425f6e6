//! FILENAME: core/cube-format/src/reader.rs
//! Document -> executable cube.
//!
//! Every enum tag goes through an exhaustive match to a concrete engine
//! implementation. Unknown tags never get this far: they fail while parsing.

use std::collections::BTreeMap;
use std::sync::Arc;

use cube_engine::{
    create_dimension, create_measure, AggregationType, CubeConfig, CubeValue,
    DimensionDescriptor, DimensionSpec, MeasureDescriptor, MeasureSpec, ValueFormat,
    UNKNOWN_LABEL,
};
use serde_json::Value;

use crate::document::{
    AggregationFunction, CubeDocument, DimensionDef, FormatFunction, FormatKind, KeyFieldMode,
    MeasureDef,
};
use crate::error::FormatError;
use crate::field::{json_to_cube_value, json_to_number, lookup_field};

/// Parses a JSON document. Unknown `aggregationFunction`, `formatFunction.type`
/// or `keyFieldName` tags are errors.
pub fn parse_cube_document(json: &str) -> Result<CubeDocument, FormatError> {
    let document: CubeDocument = serde_json::from_str(json)?;
    log::debug!(
        "cube-format: parsed document dimensions={} measures={} items={}",
        document.config.dimensions.len(),
        document.config.measures.len(),
        document.data.len()
    );
    Ok(document)
}

/// Builds a live cube config from a document.
pub fn deserialize_cube_config(document: &CubeDocument) -> Result<CubeConfig<Value>, FormatError> {
    let definition = &document.config;

    let dimensions = definition
        .dimensions
        .iter()
        .map(build_dimension)
        .collect::<Result<Vec<_>, _>>()?;
    let measures = definition
        .measures
        .iter()
        .map(build_measure)
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = CubeConfig::new(document.data.clone(), dimensions, measures)?
        .with_breakdown_map(definition.breakdown_map.clone())?;
    if let Some(grouping) = &definition.initial_grouping {
        config = config.with_initial_grouping(grouping.clone())?;
    }

    log::info!(
        "cube-format: cube loaded dimensions={} measures={} items={}",
        config.dimensions().len(),
        config.measures().len(),
        config.data().len()
    );
    Ok(config)
}

// ============================================================================
// DIMENSIONS
// ============================================================================

pub fn build_dimension(def: &DimensionDef) -> Result<DimensionDescriptor<Value>, FormatError> {
    if def.field_name.is_empty() {
        return Err(FormatError::EmptyFieldName(def.id.clone()));
    }

    let field = def.field_name.clone();
    let mapping = Arc::new(def.label_mapping.clone().unwrap_or_default());

    let label_mapping = Arc::clone(&mapping);
    let mut spec = DimensionSpec::new(def.id.clone(), def.name.clone())
        .value(move |item: &Value| json_to_cube_value(lookup_field(item, &field)))
        .format(move |value: &CubeValue| mapped_label(&label_mapping, value));

    spec = match def.key_field_name {
        KeyFieldMode::Same => spec.key(|value: &CubeValue| value.canonical_key()),
        KeyFieldMode::Custom => {
            let key_mapping = Arc::clone(&mapping);
            spec.key(move |value: &CubeValue| {
                let raw = value.canonical_key();
                key_mapping.get(&raw).cloned().unwrap_or(raw)
            })
        }
    };

    if let Some(icon) = &def.icon {
        spec = spec.icon(icon.clone());
    }
    Ok(create_dimension(spec)?)
}

/// Mapped label for the raw key, else the key itself ("Unknown" for empty).
fn mapped_label(mapping: &BTreeMap<String, String>, value: &CubeValue) -> String {
    let raw = value.canonical_key();
    if let Some(label) = mapping.get(&raw) {
        return label.clone();
    }
    if value.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        raw
    }
}

// ============================================================================
// MEASURES
// ============================================================================

pub fn build_measure(def: &MeasureDef) -> Result<MeasureDescriptor<Value>, FormatError> {
    if def.field_name.is_empty() {
        return Err(FormatError::EmptyFieldName(def.id.clone()));
    }

    let aggregation = aggregation_type(def.aggregation_function);
    let format = value_format(&def.id, &def.format_function)?;
    let field = def.field_name.clone();

    let mut spec = MeasureSpec::new(def.id.clone(), def.name.clone())
        .aggregation(aggregation)
        .value_format(format);

    spec = match def.aggregation_function {
        // Counts include every item, whatever its field holds.
        AggregationFunction::Count => spec.value(|_: &Value| Some(1.0)),
        AggregationFunction::Sum
        | AggregationFunction::Avg
        | AggregationFunction::Min
        | AggregationFunction::Max => {
            spec.value(move |item: &Value| json_to_number(lookup_field(item, &field)))
        }
    };

    if let Some(icon) = &def.icon {
        spec = spec.icon(icon.clone());
    }
    Ok(create_measure(spec)?)
}

/// Wire tag -> engine aggregation.
pub fn aggregation_type(function: AggregationFunction) -> AggregationType {
    match function {
        AggregationFunction::Sum => AggregationType::Sum,
        AggregationFunction::Count => AggregationType::Count,
        AggregationFunction::Avg => AggregationType::Average,
        AggregationFunction::Min => AggregationType::Min,
        AggregationFunction::Max => AggregationType::Max,
    }
}

/// Wire tag -> engine value format. Currency formats need a code; other
/// formats ignore one if present.
pub fn value_format(measure_id: &str, function: &FormatFunction) -> Result<ValueFormat, FormatError> {
    match function.kind {
        FormatKind::Currency => match function.currency.as_deref() {
            Some(code) if !code.is_empty() => Ok(ValueFormat::Currency { code: code.to_string() }),
            _ => Err(FormatError::MissingCurrency(measure_id.to_string())),
        },
        FormatKind::Number => Ok(ValueFormat::Number),
        FormatKind::Percent => Ok(ValueFormat::Percent),
        FormatKind::Duration => Ok(ValueFormat::Duration),
    }
}
