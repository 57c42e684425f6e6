//! FILENAME: core/cube-engine/src/error.rs

use thiserror::Error;

/// Fatal configuration errors. Raised while building a cube; a cube that
/// fails with one of these is never handed out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("duplicate descriptor id: {kind} '{id}'")]
    DuplicateDescriptorId { kind: DescriptorKind, id: String },

    #[error("{kind} '{id}' is missing required field '{field}'")]
    MissingDescriptorField {
        kind: DescriptorKind,
        id: String,
        field: &'static str,
    },

    #[error("a cube needs at least one measure")]
    NoMeasures,

    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("breakdown '{signature}' -> '{dimension_id}' repeats the dimension that selected the node")]
    RepeatedBreakdownDimension {
        signature: String,
        dimension_id: String,
    },

    #[error("initial grouping lists '{0}' twice in a row")]
    RepeatedInitialGrouping(String),

    #[error("dangling breakdown reference: '{signature}' -> '{dimension_id}'")]
    DanglingBreakdownReference {
        signature: String,
        dimension_id: String,
    },
}

/// Recoverable navigation errors. The rejected command leaves the navigator
/// exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("cannot drill into '{requested}': node is broken down by {}", .expected.as_deref().unwrap_or("nothing"))]
    IllegalDrill {
        requested: String,
        expected: Option<String>,
    },

    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("dimension '{0}' appears twice in a row in the zoom path")]
    RepeatedDimension(String),

    #[error("zoom path entry {depth} uses '{found}' but the node above it is broken down by {}", .expected.as_deref().unwrap_or("nothing"))]
    BreakdownMismatch {
        depth: usize,
        found: String,
        expected: Option<String>,
    },

    #[error("'{0}' cannot subdivide a node that was selected by the same dimension")]
    InvalidChildDimension(String),

    #[error(transparent)]
    Config(#[from] CubeError),
}

/// Which descriptor family an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Dimension,
    Measure,
}

impl std::fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptorKind::Dimension => write!(f, "dimension"),
            DescriptorKind::Measure => write!(f, "measure"),
        }
    }
}
