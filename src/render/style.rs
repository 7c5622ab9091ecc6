//! Fixed visual vocabulary: one edge style per relation kind, node markers.

use crate::graph::RelationKind;

pub const EXECUTED_MARK: &str = "&#x2713;";
pub const PENDING_MARK: &str = "!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Event is included in the marking.
    Solid,
    Dashed,
}

impl LineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle {
    pub color: &'static str,
    pub arrowhead: &'static str,
    pub arrowtail: Option<&'static str>,
    pub dir: Option<&'static str>,
    /// Glyph drawn at the head end, coloured like the edge.
    pub head_glyph: Option<&'static str>,
    pub glyph_font_size: Option<u32>,
}

const CONDITION: EdgeStyle = EdgeStyle {
    color: "#FFA500",
    arrowhead: "dotnormal",
    arrowtail: None,
    dir: None,
    head_glyph: None,
    glyph_font_size: None,
};

const RESPONSE: EdgeStyle = EdgeStyle {
    color: "#2993FC",
    arrowhead: "normal",
    arrowtail: Some("dot"),
    dir: Some("both"),
    head_glyph: None,
    glyph_font_size: None,
};

const NO_RESPONSE: EdgeStyle = EdgeStyle {
    color: "#7A514D",
    arrowhead: "normal",
    arrowtail: Some("dot"),
    dir: Some("both"),
    head_glyph: Some("x"),
    glyph_font_size: Some(8),
};

const INCLUDE: EdgeStyle = EdgeStyle {
    color: "#30A627",
    arrowhead: "normal",
    arrowtail: Some("none"),
    dir: None,
    head_glyph: Some("+"),
    glyph_font_size: Some(10),
};

const EXCLUDE: EdgeStyle = EdgeStyle {
    color: "#FC0C1B",
    arrowhead: "normal",
    arrowtail: Some("none"),
    dir: None,
    head_glyph: Some("%"),
    glyph_font_size: Some(8),
};

const MILESTONE: EdgeStyle = EdgeStyle {
    color: "#A932D0",
    arrowhead: "normal",
    arrowtail: Some("dot"),
    dir: Some("both"),
    head_glyph: Some("&#9671;"),
    glyph_font_size: Some(8),
};

pub fn edge_style(kind: RelationKind) -> &'static EdgeStyle {
    match kind {
        RelationKind::Condition => &CONDITION,
        RelationKind::Response => &RESPONSE,
        RelationKind::NoResponse => &NO_RESPONSE,
        RelationKind::Include => &INCLUDE,
        RelationKind::Exclude => &EXCLUDE,
        RelationKind::Milestone => &MILESTONE,
    }
}
