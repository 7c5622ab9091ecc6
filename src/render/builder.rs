//! Diagram building: nodes, nested clusters, then edges, into a [`DiagramSink`].

use crate::graph::{DcrGraph, RelationKind};
use crate::render::resolver::{ClusterResolver, cluster_name};
use crate::render::sink::{DiagramSink, Edge, Node};
use crate::render::style::{EXECUTED_MARK, LineStyle, PENDING_MARK, edge_style};
use crate::render::RenderOptions;
use crate::template::duration_label;
use crate::Result;
use log::{debug, info};
use std::collections::BTreeSet;

/// Counts of what a build pushed into its sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub nodes: usize,
    pub regions: usize,
    pub edges: usize,
}

/// Draws one graph. Holds no state between builds; each call to
/// [`DiagramBuilder::build`] owns its own bookkeeping.
pub struct DiagramBuilder<'g> {
    graph: &'g DcrGraph,
    options: &'g RenderOptions,
}

impl<'g> DiagramBuilder<'g> {
    pub fn new(graph: &'g DcrGraph, options: &'g RenderOptions) -> Self {
        Self { graph, options }
    }

    /// Emit the whole diagram. Performs:
    /// - validate the group hierarchy (single parent, acyclic)
    /// - resolve every edge endpoint through the cluster resolver
    /// - one node per event outside any group
    /// - one region per group, nested, with its member events inside
    /// - one edge per relation pair
    ///
    /// Structural errors surface before the first call into `sink`.
    pub fn build<S: DiagramSink>(&self, sink: &mut S) -> Result<BuildSummary> {
        let groups = self.graph.groups();
        groups.validate()?;
        let edges = self.resolve_edges()?;

        let mut summary = BuildSummary::default();
        self.emit_nodes(sink, &mut summary);
        self.emit_clusters(sink, &mut summary);
        for edge in &edges {
            sink.edge(edge);
            summary.edges += 1;
        }

        info!(
            nodes = summary.nodes,
            regions = summary.regions,
            edges = summary.edges;
            "Diagram built"
        );
        Ok(summary)
    }

    fn emit_nodes<S: DiagramSink>(&self, sink: &mut S, summary: &mut BuildSummary) {
        let groups = self.graph.groups();
        let grouped = groups.grouped_events();

        for event in self.graph.events() {
            if groups.is_group(event) || grouped.contains(event.as_str()) {
                continue;
            }
            sink.node(&self.event_node(event));
            summary.nodes += 1;
        }
    }

    fn emit_clusters<S: DiagramSink>(&self, sink: &mut S, summary: &mut BuildSummary) {
        let mut processed: BTreeSet<&str> = BTreeSet::new();
        for root in self.graph.groups().roots() {
            self.emit_cluster(root, sink, &mut processed, summary);
        }
    }

    fn emit_cluster<'a, S: DiagramSink>(
        &'a self,
        group: &'a str,
        sink: &mut S,
        processed: &mut BTreeSet<&'a str>,
        summary: &mut BuildSummary,
    ) {
        if !processed.insert(group) {
            return;
        }
        let groups = self.graph.groups();
        let Some(members) = groups.members(group) else {
            return;
        };

        debug!(group, members = members.len(); "Emitting cluster");
        sink.open_region(&cluster_name(group), group);
        summary.regions += 1;

        for member in members {
            if groups.is_group(member) {
                self.emit_cluster(member, sink, processed, summary);
            } else {
                sink.node(&self.event_node(member));
                summary.nodes += 1;
            }
        }

        sink.close_region();
    }

    fn resolve_edges(&self) -> Result<Vec<Edge>> {
        let resolver = ClusterResolver::new(self.graph.groups());
        let relations = self.graph.relations();
        let mut edges = Vec::new();

        for kind in RelationKind::ALL {
            for (source, target) in relations.pairs(kind) {
                let tail = resolver.endpoint(source)?;
                let head = resolver.endpoint(target)?;
                let label = self
                    .graph
                    .timing(kind, source, target)
                    .and_then(|d| duration_label(d, self.options.time_precision));

                edges.push(Edge {
                    source: tail.anchor,
                    target: head.anchor,
                    kind,
                    style: edge_style(kind),
                    label,
                    label_font_size: self.options.edge_label_font_size(),
                    tail_cluster: tail.cluster,
                    head_cluster: head.cluster,
                });
            }
        }
        Ok(edges)
    }

    fn event_node(&self, event: &str) -> Node {
        let marking = self.graph.marking();
        let style = if marking.is_included(event) {
            LineStyle::Solid
        } else {
            LineStyle::Dashed
        };

        Node {
            id: event.to_string(),
            label: self.event_label(event),
            style,
            font_size: self.options.font_size,
        }
    }

    /// Record label `{ roles | executed pending } | { activity }`.
    fn event_label(&self, event: &str) -> String {
        let activity = self
            .graph
            .label_map()
            .get(event)
            .map(|l| escape_record(l))
            .unwrap_or_default();

        if !self.options.decorations {
            return format!("{{ {activity} }}");
        }

        let marking = self.graph.marking();
        let roles: Vec<String> = self
            .graph
            .roles_of(event)
            .into_iter()
            .map(escape_record)
            .collect();
        let executed = if marking.is_executed(event) { EXECUTED_MARK } else { "" };
        let pending = if marking.is_pending(event) { PENDING_MARK } else { "" };

        format!(
            "{{ {} | {executed} {pending} }} | {{ {activity} }}",
            roles.join(", ")
        )
    }
}

/// Escape characters that carry structure in Graphviz record labels.
fn escape_record(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '{' | '}' | '|' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
