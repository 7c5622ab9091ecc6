//! Nested groups (sub-processes) used to lay events out in clusters.
//!
//! A group maps to an ordered list of member ids, each either a leaf event or
//! another group name. Groups form a forest: no group may contain itself
//! (transitively) and no member may sit under two different parents.
//! Neither rule is enforced on insertion; [`GroupHierarchy::validate`] checks
//! both before rendering.

use crate::{DcrError, Result};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupHierarchy {
    groups: BTreeMap<String, Vec<String>>,
}

impl GroupHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) `group` with members in the given order.
    pub fn insert(&mut self, group: impl Into<String>, members: Vec<String>) {
        self.groups.insert(group.into(), members);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_group(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    /// Members of `group` in definition order, `None` if it is not a group.
    pub fn members(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(g, m)| (g.as_str(), m.as_slice()))
    }

    /// Groups that no other group lists as a member, in name order.
    pub fn roots(&self) -> Vec<&str> {
        let nested: BTreeSet<&str> = self
            .groups
            .values()
            .flatten()
            .map(String::as_str)
            .filter(|m| self.is_group(m))
            .collect();
        self.groups
            .keys()
            .map(String::as_str)
            .filter(|g| !nested.contains(g))
            .collect()
    }

    /// Leaf events that belong to some group (at any depth).
    pub fn grouped_events(&self) -> BTreeSet<&str> {
        self.groups
            .values()
            .flatten()
            .map(String::as_str)
            .filter(|m| !self.is_group(m))
            .collect()
    }

    pub fn contains_event(&self, event: &str) -> bool {
        self.groups
            .values()
            .any(|members| members.iter().any(|m| m == event))
    }

    /// Check single-parent membership and acyclicity.
    pub fn validate(&self) -> Result<()> {
        // 1) Each member id is listed once, under at most one group. A repeat
        // inside one group reports that group as both parents.
        let mut parent: BTreeMap<&str, &str> = BTreeMap::new();
        for (group, members) in &self.groups {
            for member in members {
                if let Some(prev) = parent.insert(member.as_str(), group.as_str()) {
                    return Err(DcrError::DuplicateMembership {
                        member: member.clone(),
                        first: prev.to_string(),
                        second: group.clone(),
                    });
                }
            }
        }

        // 2) Cycle detection (DFS coloring). Every group is a start point, since
        // a pure cycle has no root.
        #[derive(Copy, Clone, PartialEq, Eq)]
        enum Mark {
            Temp,
            Perm,
        }

        fn dfs<'a>(
            g: &'a str,
            groups: &'a BTreeMap<String, Vec<String>>,
            marks: &mut BTreeMap<&'a str, Mark>,
            stack: &mut Vec<&'a str>,
        ) -> Result<()> {
            match marks.get(g) {
                Some(Mark::Perm) => return Ok(()),
                Some(Mark::Temp) => {
                    // g is on the current path
                    let start = stack.iter().position(|s| *s == g).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[start..].iter().map(|s| s.to_string()).collect();
                    path.push(g.to_string());
                    return Err(DcrError::GroupCycle(path));
                }
                None => {}
            }

            marks.insert(g, Mark::Temp);
            stack.push(g);

            if let Some(members) = groups.get(g) {
                for m in members.iter().filter(|m| groups.contains_key(*m)) {
                    dfs(m, groups, marks, stack)?;
                }
            }

            stack.pop();
            marks.insert(g, Mark::Perm);
            Ok(())
        }

        let mut marks = BTreeMap::new();
        let mut stack = Vec::new();
        for g in self.groups.keys() {
            stack.clear();
            dfs(g, &self.groups, &mut marks, &mut stack)?;
        }

        Ok(())
    }
}

impl FromIterator<(String, Vec<String>)> for GroupHierarchy {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}
