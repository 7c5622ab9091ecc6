//! Anchor resolution for edges that start or end at a group.
//!
//! Graphviz can only connect nodes, so an edge touching a group is drawn to a
//! leaf event inside it and clipped to the group's cluster (`ltail`/`lhead`).
//! The resolver picks that leaf: at each level it takes the member at the
//! requested position and descends while the member is itself a group.

use crate::graph::GroupHierarchy;
use crate::{DcrError, Result};
use log::trace;
use std::collections::BTreeSet;

pub const CLUSTER_PREFIX: &str = "cluster_";

/// Graphviz subgraph name of `group`.
pub fn cluster_name(group: &str) -> String {
    format!("{CLUSTER_PREFIX}{group}")
}

/// One side of an edge after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Leaf event the line is attached to.
    pub anchor: String,
    /// Cluster to clip the line at, present iff the id named a group.
    pub cluster: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ClusterResolver<'g> {
    groups: &'g GroupHierarchy,
}

impl<'g> ClusterResolver<'g> {
    pub fn new(groups: &'g GroupHierarchy) -> Self {
        Self { groups }
    }

    /// Leaf event representing `id`.
    ///
    /// A leaf resolves to itself. For a group, the member at `index` is taken
    /// (definition order) and the same position is consulted again at every
    /// nested level until a leaf is reached.
    ///
    /// Fails on an empty group, a position past the end of a member list, or a
    /// group reached twice during one descent.
    pub fn resolve<'a>(&'a self, id: &'a str, index: usize) -> Result<&'a str> {
        let mut current = id;
        let mut path: Vec<&str> = Vec::new();
        let mut visited: BTreeSet<&str> = BTreeSet::new();

        while let Some(members) = self.groups.members(current) {
            if !visited.insert(current) {
                let mut cycle: Vec<String> = path.iter().map(|g| g.to_string()).collect();
                cycle.push(current.to_string());
                return Err(DcrError::GroupCycle(cycle));
            }
            path.push(current);

            if members.is_empty() {
                return Err(DcrError::EmptyGroup(current.to_string()));
            }
            let member = members.get(index).ok_or_else(|| DcrError::AnchorOutOfRange {
                group: current.to_string(),
                index,
                len: members.len(),
            })?;
            current = member.as_str();
        }

        trace!(id, anchor = current, depth = path.len(); "Resolved edge anchor");
        Ok(current)
    }

    /// Anchor plus cluster hint for an edge endpoint, using the first member at
    /// every level.
    pub fn endpoint(&self, id: &str) -> Result<Endpoint> {
        let anchor = self.resolve(id, 0)?.to_string();
        let cluster = self.groups.is_group(id).then(|| cluster_name(id));
        Ok(Endpoint { anchor, cluster })
    }
}
