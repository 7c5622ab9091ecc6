//! Rendering: resolve cluster anchors, build the diagram, write it out.
//!
//! The builder talks to a [`DiagramSink`]; [`DotWriter`] is the Graphviz sink
//! and [`Recorder`] keeps the calls in memory.

pub mod builder;
pub mod dot;
pub mod options;
pub mod resolver;
pub mod sink;
pub mod style;

pub use builder::{BuildSummary, DiagramBuilder};
pub use dot::DotWriter;
pub use options::RenderOptions;
pub use resolver::{ClusterResolver, Endpoint, cluster_name};
pub use sink::{DiagramSink, DrawOp, Edge, Node, Recorder};
pub use style::{EdgeStyle, LineStyle, edge_style};

use crate::graph::DcrGraph;
use crate::Result;

/// Build `graph` straight into DOT text.
pub fn render_dot(graph: &DcrGraph, options: &RenderOptions) -> Result<String> {
    let mut writer = DotWriter::new(options);
    DiagramBuilder::new(graph, options).build(&mut writer)?;
    Ok(writer.finish())
}
