//! Structural errors raised by template loading and diagram building.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DcrError {
    /// The template is missing a required key or has a value of the wrong shape.
    #[error("malformed template: {0}")]
    MalformedTemplate(String),

    #[error("invalid duration {value:?}: expected ISO-8601 such as P1DT2H30M")]
    InvalidDuration { value: String },

    /// A group with no members cannot provide an edge anchor.
    #[error("group {0:?} has no members to anchor an edge")]
    EmptyGroup(String),

    #[error("group {group:?} has {len} member(s), no member at position {index}")]
    AnchorOutOfRange {
        group: String,
        index: usize,
        len: usize,
    },

    #[error("cycle detected in group hierarchy: {}", .0.join(" -> "))]
    GroupCycle(Vec<String>),

    #[error("{member:?} is a member of both {first:?} and {second:?}")]
    DuplicateMembership {
        member: String,
        first: String,
        second: String,
    },
}
