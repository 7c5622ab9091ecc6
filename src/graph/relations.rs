//! Relation store: one adjacency map per relation kind.

use crate::graph::RelationMap;
use std::fmt;

/// The six relation kinds of a DCR graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationKind {
    Condition,
    Response,
    Include,
    Exclude,
    NoResponse,
    Milestone,
}

impl RelationKind {
    /// All kinds, in the order edges are emitted.
    pub const ALL: [RelationKind; 6] = [
        RelationKind::Condition,
        RelationKind::Response,
        RelationKind::Include,
        RelationKind::Exclude,
        RelationKind::NoResponse,
        RelationKind::Milestone,
    ];

    /// Kinds that take part in equality and the constraint count.
    pub const CORE: [RelationKind; 4] = [
        RelationKind::Condition,
        RelationKind::Response,
        RelationKind::Include,
        RelationKind::Exclude,
    ];

    pub fn is_core(self) -> bool {
        Self::CORE.contains(&self)
    }

    /// Key of this relation map in the template.
    pub fn template_key(self) -> &'static str {
        match self {
            RelationKind::Condition => "conditionsFor",
            RelationKind::Response => "responseTo",
            RelationKind::Include => "includesTo",
            RelationKind::Exclude => "excludesTo",
            RelationKind::NoResponse => "noResponseTo",
            RelationKind::Milestone => "milestonesFor",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationKind::Condition => "condition",
            RelationKind::Response => "response",
            RelationKind::Include => "include",
            RelationKind::Exclude => "exclude",
            RelationKind::NoResponse => "noresponse",
            RelationKind::Milestone => "milestone",
        };
        f.write_str(s)
    }
}

/// Adjacency maps `source -> {targets}`, one per kind.
///
/// The four core maps always exist; no-response and milestone maps are absent
/// unless the model uses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    conditions: RelationMap,
    responses: RelationMap,
    includes: RelationMap,
    excludes: RelationMap,
    noresponses: Option<RelationMap>,
    milestones: Option<RelationMap>,
}

impl Relations {
    pub fn new() -> Self {
        Self::default()
    }

    /// The map for `kind`, or `None` when an optional kind is absent.
    pub fn get(&self, kind: RelationKind) -> Option<&RelationMap> {
        match kind {
            RelationKind::Condition => Some(&self.conditions),
            RelationKind::Response => Some(&self.responses),
            RelationKind::Include => Some(&self.includes),
            RelationKind::Exclude => Some(&self.excludes),
            RelationKind::NoResponse => self.noresponses.as_ref(),
            RelationKind::Milestone => self.milestones.as_ref(),
        }
    }

    /// Mutable map for `kind`; optional kinds are created empty on first use.
    pub fn get_mut(&mut self, kind: RelationKind) -> &mut RelationMap {
        match kind {
            RelationKind::Condition => &mut self.conditions,
            RelationKind::Response => &mut self.responses,
            RelationKind::Include => &mut self.includes,
            RelationKind::Exclude => &mut self.excludes,
            RelationKind::NoResponse => self.noresponses.get_or_insert_with(RelationMap::new),
            RelationKind::Milestone => self.milestones.get_or_insert_with(RelationMap::new),
        }
    }

    /// Replace the map for `kind`. `None` removes an optional kind; for a core
    /// kind it clears the map.
    pub fn set(&mut self, kind: RelationKind, value: Option<RelationMap>) {
        match kind {
            RelationKind::NoResponse => self.noresponses = value,
            RelationKind::Milestone => self.milestones = value,
            core => *self.get_mut(core) = value.unwrap_or_default(),
        }
    }

    /// Add `source -> target`. Self-relations are kept.
    pub fn insert(&mut self, kind: RelationKind, source: &str, target: &str) -> bool {
        self.get_mut(kind)
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string())
    }

    pub fn contains(&self, kind: RelationKind, source: &str, target: &str) -> bool {
        self.get(kind)
            .and_then(|m| m.get(source))
            .is_some_and(|targets| targets.contains(target))
    }

    /// All `(source, target)` pairs of `kind`, sources and targets in id order.
    pub fn pairs(&self, kind: RelationKind) -> impl Iterator<Item = (&str, &str)> {
        self.get(kind).into_iter().flat_map(|m| {
            m.iter().flat_map(|(source, targets)| {
                targets.iter().map(move |t| (source.as_str(), t.as_str()))
            })
        })
    }

    /// Number of individual targets of `kind` (not the number of sources).
    pub fn target_count(&self, kind: RelationKind) -> usize {
        self.get(kind)
            .map(|m| m.values().map(|targets| targets.len()).sum())
            .unwrap_or(0)
    }

    /// Equality restricted to the four core maps.
    pub fn core_eq(&self, other: &Self) -> bool {
        self.conditions == other.conditions
            && self.responses == other.responses
            && self.includes == other.includes
            && self.excludes == other.excludes
    }
}
