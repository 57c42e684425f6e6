//! FILENAME: core/cube-format/src/lib.rs
//! Portable cube document format.
//!
//! A cube document is plain JSON: the cube's dimensions and measures as
//! field names plus closed enum tags, its breakdown map, and its data.
//! Any process can read it back into a cube that computes the same groups
//! and cells as the one that wrote it.

mod document;
mod error;
pub mod field;
mod reader;
mod writer;

pub use document::{
    AggregationFunction, CubeDocument, CubeDocumentConfig, DimensionDef, FormatFunction,
    FormatKind, KeyFieldMode, MeasureDef,
};
pub use error::FormatError;
pub use reader::{
    aggregation_type, build_dimension, build_measure, deserialize_cube_config,
    parse_cube_document, value_format,
};
pub use writer::{serialize_cube_config, write_cube_document, PortableCube};
