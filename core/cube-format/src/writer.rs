//! FILENAME: core/cube-format/src/writer.rs
//! Live cube -> document.

use std::sync::Arc;

use cube_engine::{BreakdownMap, CubeConfig, CubeError, CubeNavigator};
use serde_json::Value;

use crate::document::{CubeDocument, CubeDocumentConfig};
use crate::error::FormatError;
use crate::reader::deserialize_cube_config;

/// A live cube that remembers the declarative definition it was built from,
/// so it can be written back out.
#[derive(Debug, Clone)]
pub struct PortableCube {
    definition: CubeDocumentConfig,
    config: Arc<CubeConfig<Value>>,
}

impl PortableCube {
    pub fn from_document(document: &CubeDocument) -> Result<Self, FormatError> {
        let config = deserialize_cube_config(document)?;
        Ok(PortableCube {
            definition: document.config.clone(),
            config: Arc::new(config),
        })
    }

    /// Builds a cube from a definition and a dataset.
    pub fn new(definition: CubeDocumentConfig, data: Vec<Value>) -> Result<Self, FormatError> {
        let document = CubeDocument {
            config: definition,
            data,
        };
        Self::from_document(&document)
    }

    pub fn definition(&self) -> &CubeDocumentConfig {
        &self.definition
    }

    pub fn config(&self) -> &Arc<CubeConfig<Value>> {
        &self.config
    }

    /// A navigator at the root of this cube.
    pub fn navigator(&self) -> Result<CubeNavigator<Value>, CubeError> {
        CubeNavigator::new(Arc::clone(&self.config))
    }

    /// The document this cube was built from.
    pub fn to_document(&self) -> CubeDocument {
        self.to_document_with(self.config.breakdown_map())
    }

    /// The document with a different breakdown map, typically the one a
    /// navigator accumulated from per-node overrides.
    pub fn to_document_with(&self, breakdown_map: &BreakdownMap) -> CubeDocument {
        CubeDocument {
            config: CubeDocumentConfig {
                dimensions: self.definition.dimensions.clone(),
                measures: self.definition.measures.clone(),
                breakdown_map: breakdown_map.clone(),
                initial_grouping: self.definition.initial_grouping.clone(),
            },
            data: self.config.data().to_vec(),
        }
    }
}

/// Writes a cube back to its portable document.
pub fn serialize_cube_config(cube: &PortableCube) -> CubeDocument {
    cube.to_document()
}

/// Renders a document as pretty-printed JSON.
pub fn write_cube_document(document: &CubeDocument) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(document)?)
}
