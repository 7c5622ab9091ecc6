use crate::template::TimePrecision;

/// Style parameters handed in by the caller; the builder treats them as opaque
/// except for font size, decorations and time precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Graphviz output format (`dot` keeps the text, anything else goes through `dot -T`).
    pub format: String,
    pub rankdir: String,
    pub font_size: u32,
    pub bgcolor: String,
    /// Role, executed and pending annotations on event nodes.
    pub decorations: bool,
    /// Smallest unit shown on timed edges.
    pub time_precision: TimePrecision,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: "png".to_string(),
            rankdir: "LR".to_string(),
            font_size: 12,
            bgcolor: "white".to_string(),
            decorations: true,
            time_precision: TimePrecision::Days,
        }
    }
}

impl RenderOptions {
    /// Font size of duration labels on timed edges: a third of the node font,
    /// truncated.
    pub fn edge_label_font_size(&self) -> u32 {
        // trunc(f - 2f/3) == f / 3 for whole sizes
        self.font_size / 3
    }
}
