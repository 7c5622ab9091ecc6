use crate::graph::EventSet;
use crate::template::MarkingTemplate;
use std::cmp::Ordering;
use std::fmt;

/// Runtime state of a graph: executed x included x pending.
///
/// The three sets may overlap (a recurring activity can be executed and pending
/// at once). Members are not checked against the graph's events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marking {
    executed: EventSet,
    included: EventSet,
    pending: EventSet,
}

impl Marking {
    pub fn new(executed: EventSet, included: EventSet, pending: EventSet) -> Self {
        Self {
            executed,
            included,
            pending,
        }
    }

    /// Replace all three sets with copies of `baseline`, e.g. to rewind a graph
    /// to its initial configuration after a simulated run.
    pub fn reset(&mut self, baseline: &MarkingTemplate) {
        self.executed = baseline.executed.clone();
        self.included = baseline.included.clone();
        self.pending = baseline.pending.clone();
    }

    pub fn to_template(&self) -> MarkingTemplate {
        MarkingTemplate {
            executed: self.executed.clone(),
            included: self.included.clone(),
            pending: self.pending.clone(),
        }
    }

    pub fn executed(&self) -> &EventSet {
        &self.executed
    }

    pub fn executed_mut(&mut self) -> &mut EventSet {
        &mut self.executed
    }

    pub fn set_executed(&mut self, value: EventSet) {
        self.executed = value;
    }

    pub fn included(&self) -> &EventSet {
        &self.included
    }

    pub fn included_mut(&mut self) -> &mut EventSet {
        &mut self.included
    }

    pub fn set_included(&mut self, value: EventSet) {
        self.included = value;
    }

    pub fn pending(&self) -> &EventSet {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut EventSet {
        &mut self.pending
    }

    pub fn set_pending(&mut self, value: EventSet) {
        self.pending = value;
    }

    pub fn is_executed(&self, event: &str) -> bool {
        self.executed.contains(event)
    }

    pub fn is_included(&self, event: &str) -> bool {
        self.included.contains(event)
    }

    pub fn is_pending(&self, event: &str) -> bool {
        self.pending.contains(event)
    }
}

impl fmt::Display for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{executed: {:?}, included: {:?}, pending: {:?}}}",
            self.executed, self.included, self.pending
        )
    }
}

// Ordering compares the textual rendering; it is only meant to make test output
// deterministic, not to rank states.
impl PartialOrd for Marking {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Marking {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> EventSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn baseline() -> MarkingTemplate {
        MarkingTemplate {
            executed: set(&[]),
            included: set(&["a", "b", "c"]),
            pending: set(&["c"]),
        }
    }

    #[test]
    fn reset_replaces_all_sets() {
        let mut m = Marking::new(set(&["a"]), set(&["a"]), set(&["a", "b"]));
        m.reset(&baseline());
        assert_eq!(m.executed(), &set(&[]));
        assert_eq!(m.included(), &set(&["a", "b", "c"]));
        assert_eq!(m.pending(), &set(&["c"]));
    }

    #[test]
    fn reset_is_idempotent() {
        let b = baseline();
        let mut once = Marking::default();
        once.reset(&b);
        let mut twice = Marking::default();
        twice.reset(&b);
        twice.reset(&b);
        assert_eq!(once, twice);
    }

    #[test]
    fn reset_does_not_alias_baseline() {
        let mut b = baseline();
        let mut m = Marking::default();
        m.reset(&b);

        b.included.clear();
        b.pending.insert("a".to_string());
        assert_eq!(m.included(), &set(&["a", "b", "c"]));
        assert_eq!(m.pending(), &set(&["c"]));

        m.executed_mut().insert("a".to_string());
        assert!(b.executed.is_empty());
    }

    #[test]
    fn sets_may_overlap() {
        let m = Marking::new(set(&["a"]), set(&["a"]), set(&["a"]));
        assert!(m.is_executed("a") && m.is_included("a") && m.is_pending("a"));
    }

    #[test]
    fn orders_by_rendering() {
        let a = Marking::new(set(&["a"]), set(&[]), set(&[]));
        let b = Marking::new(set(&["b"]), set(&[]), set(&[]));
        let mut v = vec![b.clone(), a.clone()];
        v.sort();
        assert_eq!(v, vec![a.clone(), b]);
        assert_eq!(
            a.to_string(),
            r#"{executed: {"a"}, included: {}, pending: {}}"#
        );
    }
}
