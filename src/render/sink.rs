//! Rendering service boundary.
//!
//! The builder only ever pushes into a [`DiagramSink`]; it never reads back.

use crate::graph::RelationKind;
use crate::render::style::{EdgeStyle, LineStyle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    /// Record label, already escaped for record syntax.
    pub label: String,
    pub style: LineStyle,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Anchor event the line starts from.
    pub source: String,
    /// Anchor event the line points to.
    pub target: String,
    pub kind: RelationKind,
    pub style: &'static EdgeStyle,
    /// Duration text for timed relations.
    pub label: Option<String>,
    pub label_font_size: u32,
    /// Cluster the tail is clipped to when the source is a group.
    pub tail_cluster: Option<String>,
    /// Cluster the head is clipped to when the target is a group.
    pub head_cluster: Option<String>,
}

pub trait DiagramSink {
    fn node(&mut self, node: &Node);

    /// Start a bounded region; everything until the matching
    /// [`DiagramSink::close_region`] is drawn inside it.
    fn open_region(&mut self, name: &str, label: &str);

    fn close_region(&mut self);

    fn edge(&mut self, edge: &Edge);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Node(Node),
    OpenRegion { name: String, label: String },
    CloseRegion,
    Edge(Edge),
}

/// In-memory sink that keeps every call in order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> Vec<&Node> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Node(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn edges(&self) -> Vec<&Edge> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Edge(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub fn regions(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::OpenRegion { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DiagramSink for Recorder {
    fn node(&mut self, node: &Node) {
        self.ops.push(DrawOp::Node(node.clone()));
    }

    fn open_region(&mut self, name: &str, label: &str) {
        self.ops.push(DrawOp::OpenRegion {
            name: name.to_string(),
            label: label.to_string(),
        });
    }

    fn close_region(&mut self) {
        self.ops.push(DrawOp::CloseRegion);
    }

    fn edge(&mut self, edge: &Edge) {
        self.ops.push(DrawOp::Edge(edge.clone()));
    }
}
