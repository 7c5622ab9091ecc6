//! Graphviz DOT implementation of [`DiagramSink`].

use crate::render::RenderOptions;
use crate::render::sink::{DiagramSink, Edge, Node};
use std::fmt::Write as _;

/// Accumulates a `digraph` as text; [`DotWriter::finish`] closes it.
pub struct DotWriter {
    out: String,
    depth: usize,
}

impl DotWriter {
    pub fn new(options: &RenderOptions) -> Self {
        let mut out = String::new();
        out.push_str("digraph \"\" {\n");
        let graph_attrs = [
            ("bgcolor", options.bgcolor.clone()),
            ("compound", "true".to_string()),
            ("rankdir", options.rankdir.clone()),
        ];
        let _ = writeln!(out, "  graph {};", attr_list(&graph_attrs));
        let _ = writeln!(out, "  node {};", attr_list(&[("shape", "Mrecord".to_string())]));
        let _ = writeln!(
            out,
            "  edge {};",
            attr_list(&[
                ("arrowsize", "0.5".to_string()),
                ("labeldistance", "0.0".to_string()),
            ])
        );
        Self { out, depth: 1 }
    }

    /// Close any region left open and the graph itself.
    pub fn finish(mut self) -> String {
        while self.depth > 1 {
            self.close_region();
        }
        self.out.push_str("  overlap=\"false\";\n}\n");
        self.out
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }
}

impl DiagramSink for DotWriter {
    fn node(&mut self, node: &Node) {
        let attrs = [
            ("label", node.label.clone()),
            ("style", node.style.as_str().to_string()),
            ("fontsize", node.font_size.to_string()),
        ];
        self.indent();
        let _ = writeln!(self.out, "{} {};", quote(&node.id), attr_list(&attrs));
    }

    fn open_region(&mut self, name: &str, label: &str) {
        self.indent();
        let _ = writeln!(self.out, "subgraph {} {{", quote(name));
        self.depth += 1;
        self.indent();
        // cluster labels are plain text, so the group name is quoted like an id
        let _ = writeln!(self.out, "label={};", quote(label));
        self.indent();
        self.out.push_str("style=\"rounded\";\n");
    }

    fn close_region(&mut self) {
        if self.depth <= 1 {
            return;
        }
        self.depth -= 1;
        self.indent();
        self.out.push_str("}\n");
    }

    fn edge(&mut self, edge: &Edge) {
        let style = edge.style;
        let mut attrs: Vec<(&str, String)> = vec![
            ("color", style.color.to_string()),
            ("arrowhead", style.arrowhead.to_string()),
        ];
        if let Some(tail) = style.arrowtail {
            attrs.push(("arrowtail", tail.to_string()));
        }
        if let Some(dir) = style.dir {
            attrs.push(("dir", dir.to_string()));
        }
        if let Some(label) = &edge.label {
            attrs.push(("label", label.clone()));
            attrs.push(("labelfontsize", edge.label_font_size.to_string()));
        }
        if let Some(glyph) = style.head_glyph {
            attrs.push(("headlabel", glyph.to_string()));
            attrs.push(("labelfontcolor", style.color.to_string()));
            if let Some(size) = style.glyph_font_size {
                attrs.push(("labelfontsize", size.to_string()));
            }
        }
        if let Some(cluster) = &edge.tail_cluster {
            attrs.push(("ltail", cluster.clone()));
        }
        if let Some(cluster) = &edge.head_cluster {
            attrs.push(("lhead", cluster.clone()));
        }

        self.indent();
        let _ = writeln!(
            self.out,
            "{} -> {} {};",
            quote(&edge.source),
            quote(&edge.target),
            attr_list(&attrs)
        );
    }
}

/// Double-quoted DOT id: escapes backslashes, quotes and newlines.
fn quote(s: &str) -> String {
    quote_with(s, true)
}

/// Double-quoted record label. Backslashes were already escaped for the record
/// syntax, so they pass through as is.
fn quote_label(s: &str) -> String {
    quote_with(s, false)
}

fn quote_with(s: &str, escape_backslash: bool) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\\' if escape_backslash => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn attr_list(attrs: &[(&str, String)]) -> String {
    let parts: Vec<String> = attrs
        .iter()
        .map(|(k, v)| match *k {
            "label" => format!("{k}={}", quote_label(v)),
            _ => format!("{k}={}", quote(v)),
        })
        .collect();
    format!("[{}]", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationKind;
    use crate::render::style::{LineStyle, edge_style};
    use pretty_assertions::assert_eq;

    fn edge(kind: RelationKind) -> Edge {
        Edge {
            source: "a".to_string(),
            target: "b".to_string(),
            kind,
            style: edge_style(kind),
            label: None,
            label_font_size: 4,
            tail_cluster: None,
            head_cluster: None,
        }
    }

    #[test]
    fn writes_header_nodes_regions_and_edges() {
        let mut w = DotWriter::new(&RenderOptions::default());
        w.node(&Node {
            id: "z".to_string(),
            label: "{ | } | { Ship }".to_string(),
            style: LineStyle::Dashed,
            font_size: 12,
        });
        w.open_region("cluster_G1", "G1");
        w.node(&Node {
            id: "x".to_string(),
            label: "{ x }".to_string(),
            style: LineStyle::Solid,
            font_size: 12,
        });
        w.close_region();
        let mut include = edge(RelationKind::Include);
        include.source = "x".to_string();
        include.target = "z".to_string();
        include.tail_cluster = Some("cluster_G1".to_string());
        w.edge(&include);

        let dot = w.finish();
        let expected = r##"digraph "" {
  graph [bgcolor="white" compound="true" rankdir="LR"];
  node [shape="Mrecord"];
  edge [arrowsize="0.5" labeldistance="0.0"];
  "z" [label="{ | } | { Ship }" style="dashed" fontsize="12"];
  subgraph "cluster_G1" {
    label="G1";
    style="rounded";
    "x" [label="{ x }" style="solid" fontsize="12"];
  }
  "x" -> "z" [color="#30A627" arrowhead="normal" arrowtail="none" headlabel="+" labelfontcolor="#30A627" labelfontsize="10" ltail="cluster_G1"];
  overlap="false";
}
"##;
        assert_eq!(dot, expected);
    }

    #[test]
    fn timed_condition_edge_has_label() {
        let mut w = DotWriter::new(&RenderOptions::default());
        let mut e = edge(RelationKind::Condition);
        e.label = Some("P2D".to_string());
        e.head_cluster = Some("cluster_G".to_string());
        w.edge(&e);
        let dot = w.finish();
        assert!(dot.contains(
            r##""a" -> "b" [color="#FFA500" arrowhead="dotnormal" label="P2D" labelfontsize="4" lhead="cluster_G"];"##
        ));
    }

    #[test]
    fn finish_closes_dangling_regions() {
        let mut w = DotWriter::new(&RenderOptions::default());
        w.open_region("cluster_A", "A");
        w.open_region("cluster_B", "B");
        let dot = w.finish();
        assert!(dot.ends_with("    }\n  }\n  overlap=\"false\";\n}\n"));
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote_label(r#"say "hi""#), r#""say \"hi\"""#);
    }

    #[test]
    fn trailing_backslash_in_ids_stays_inside_quotes() {
        let mut w = DotWriter::new(&RenderOptions::default());
        w.open_region("cluster_G\\", "G\\");
        w.node(&Node {
            id: "z\\".to_string(),
            label: "{ a\\\\ }".to_string(),
            style: LineStyle::Solid,
            font_size: 12,
        });
        w.close_region();
        let mut e = edge(RelationKind::Response);
        e.source = "z\\".to_string();
        e.tail_cluster = Some("cluster_G\\".to_string());
        w.edge(&e);
        let dot = w.finish();

        assert!(dot.contains(r#"subgraph "cluster_G\\" {"#));
        assert!(dot.contains(r#"label="G\\";"#));
        // record labels arrive escaped and are not doubled again
        assert!(dot.contains(r#""z\\" [label="{ a\\ }" style="solid" fontsize="12"];"#));
        assert!(dot.contains(r#""z\\" -> "b" ["#));
        assert!(dot.contains(r#"ltail="cluster_G\\""#));
    }
}
