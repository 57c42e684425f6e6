//! FILENAME: core/cube-engine/src/lib.rs
//! Drill-down cube subsystem.
//!
//! Groups, drills into and summarizes flat record collections along
//! configurable dimensions and measures, with an independently chosen
//! breakdown dimension per node of the drill-down tree.
//!
//! Layers:
//! - `descriptor`: Dimension and measure descriptors (WHAT can be grouped/measured)
//! - `definition`: Cube configuration and zoom paths (what the cube IS)
//! - `path`: Path signatures and breakdown resolution (WHICH dimension splits a node)
//! - `engine`: Filtering, grouping and aggregation (HOW we calculate)
//! - `view`: Snapshot for rendering (WHAT we display)
//! - `navigator`: Drill-down state machine (WHERE the user is)

pub mod aggregate;
pub mod definition;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod navigator;
pub mod number_format;
pub mod path;
pub mod value;
pub mod view;

pub use aggregate::aggregate_values;
pub use definition::*;
pub use descriptor::{
    create_dimension, create_measure, DimensionDescriptor, DimensionSpec, MeasureDescriptor,
    MeasureSpec,
};
pub use engine::{
    compute_filtered_data, compute_grand_totals, compute_groups, compute_state, CubeCalculator,
};
pub use error::{CubeError, DescriptorKind, NavigationError};
pub use navigator::CubeNavigator;
pub use number_format::{format_value, ValueFormat};
pub use path::{
    path_signature, resolve_breakdown, resolve_breakdown_in, set_node_child_dimension,
    validate_zoom_path,
};
pub use value::{CubeValue, OrderedFloat, NULL_KEY, UNKNOWN_LABEL};
pub use view::*;
