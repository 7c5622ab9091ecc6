//! Graph model: events, marking, relations and the group hierarchy.

pub mod dcr;
pub mod groups;
pub mod marking;
pub mod relations;

pub use dcr::DcrGraph;
pub use groups::GroupHierarchy;
pub use marking::Marking;
pub use relations::{RelationKind, Relations};

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// A set of event ids (also used for labels, roles and principals).
pub type EventSet = BTreeSet<String>;

/// `source -> {targets}` for one relation kind.
pub type RelationMap = BTreeMap<String, EventSet>;

/// `source -> target -> duration` companion of a timed relation.
pub type TimedRelationMap = BTreeMap<String, BTreeMap<String, Duration>>;
