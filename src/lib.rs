//! Dynamic Condition Response (DCR) graphs and their Graphviz rendering.
//!
//! Layers:
//! - `template`: the JSON snapshot shape a graph is built from and exported to
//! - `graph`: events, labels, marking, relations and the group hierarchy
//! - `render`: cluster resolution, diagram building and the DOT sink

pub mod error;
pub mod graph;
pub mod render;
pub mod template;

pub use error::DcrError;
pub use graph::{DcrGraph, GroupHierarchy, Marking, RelationKind, Relations};
pub use render::{ClusterResolver, DiagramBuilder, DiagramSink, DotWriter, RenderOptions};
pub use template::{DcrTemplate, TimePrecision};

pub type Result<T> = std::result::Result<T, DcrError>;
