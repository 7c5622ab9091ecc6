//! The DCR graph: events, labels, marking, relations and optional enrichments.

use crate::graph::{
    EventSet, GroupHierarchy, Marking, RelationKind, RelationMap, Relations, TimedRelationMap,
};
use crate::template::{DcrTemplate, IsoDuration, TemplateTimedRelation};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fmt;

/// A Dynamic Condition Response graph `G = (E, Act, M, ->*, *->, ->+, ->%, l)`.
///
/// Equality only looks at the four core relation maps (condition, response,
/// include, exclude): two graphs with the same structure but different events,
/// markings or labels compare equal.
#[derive(Debug, Clone, Default)]
pub struct DcrGraph {
    events: EventSet,
    marking: Marking,
    labels: EventSet,
    label_map: BTreeMap<String, String>,
    relations: Relations,
    timed_conditions: Option<TimedRelationMap>,
    timed_responses: Option<TimedRelationMap>,
    groups: GroupHierarchy,
    roles: EventSet,
    principals: EventSet,
    role_assignments: BTreeMap<String, EventSet>,
    principal_assignments: BTreeMap<String, EventSet>,
}

impl DcrGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a complete template. Everything is copied, so later
    /// changes to `template` are not observed by the graph.
    pub fn from_template(template: &DcrTemplate) -> Self {
        let mut relations = Relations::new();
        relations.set(RelationKind::Condition, Some(template.conditions_for.clone()));
        relations.set(RelationKind::Response, Some(template.response_to.clone()));
        relations.set(RelationKind::Include, Some(template.includes_to.clone()));
        relations.set(RelationKind::Exclude, Some(template.excludes_to.clone()));
        relations.set(RelationKind::NoResponse, template.no_response_to.clone());
        relations.set(RelationKind::Milestone, template.milestones_for.clone());

        let mut marking = Marking::default();
        marking.reset(&template.marking);

        let graph = Self {
            events: template.events.clone(),
            marking,
            labels: template.labels.clone(),
            label_map: template.label_mapping.clone(),
            relations,
            timed_conditions: template.conditions_for_delays.as_ref().map(timed_from_template),
            timed_responses: template.response_to_deadlines.as_ref().map(timed_from_template),
            groups: template
                .nested_groups
                .iter()
                .map(|(g, m)| (g.clone(), m.clone()))
                .collect(),
            roles: template.roles.clone(),
            principals: template.principals.clone(),
            role_assignments: template.role_assignments.clone(),
            principal_assignments: template.principals_assignments.clone(),
        };

        debug!(
            events = graph.events.len(),
            constraints = graph.get_constraints(),
            groups = graph.groups.len();
            "Graph built from template"
        );
        graph.warn_unknown_events();
        graph
    }

    /// Deep snapshot of the graph in template shape; round-trips through
    /// [`DcrGraph::from_template`].
    pub fn to_template(&self) -> DcrTemplate {
        let core = |kind| self.relations.get(kind).cloned().unwrap_or_default();

        DcrTemplate {
            events: self.events.clone(),
            marking: self.marking.to_template(),
            labels: self.labels.clone(),
            label_mapping: self.label_map.clone(),
            conditions_for: core(RelationKind::Condition),
            response_to: core(RelationKind::Response),
            includes_to: core(RelationKind::Include),
            excludes_to: core(RelationKind::Exclude),
            no_response_to: self.relations.get(RelationKind::NoResponse).cloned(),
            milestones_for: self.relations.get(RelationKind::Milestone).cloned(),
            conditions_for_delays: self.timed_conditions.as_ref().map(timed_to_template),
            response_to_deadlines: self.timed_responses.as_ref().map(timed_to_template),
            nested_groups: self
                .groups
                .iter()
                .map(|(g, m)| (g.to_string(), m.to_vec()))
                .collect(),
            roles: self.roles.clone(),
            principals: self.principals.clone(),
            role_assignments: self.role_assignments.clone(),
            principals_assignments: self.principal_assignments.clone(),
        }
    }

    /// Event for an activity: the first event (in id order) labelled `activity`.
    ///
    /// Falls back to `activity` itself, treating unmapped strings as event ids.
    /// This is ambiguous when an activity name equals an unrelated event id.
    pub fn get_event<'a>(&'a self, activity: &'a str) -> &'a str {
        self.label_map
            .iter()
            .find(|(_, label)| label.as_str() == activity)
            .map(|(event, _)| event.as_str())
            .unwrap_or(activity)
    }

    /// Activity label of `event`, defaulting to the event id.
    pub fn get_activity<'a>(&'a self, event: &'a str) -> &'a str {
        self.label_map.get(event).map(String::as_str).unwrap_or(event)
    }

    /// Number of constraints: targets summed over the condition, response,
    /// include and exclude maps. No-response and milestone relations are not
    /// counted.
    pub fn get_constraints(&self) -> usize {
        RelationKind::CORE
            .iter()
            .map(|kind| self.relations.target_count(*kind))
            .sum()
    }

    /// Role keys whose assignment contains `event`, in role order.
    pub fn roles_of(&self, event: &str) -> Vec<&str> {
        self.role_assignments
            .iter()
            .filter(|(_, events)| events.contains(event))
            .map(|(role, _)| role.as_str())
            .collect()
    }

    /// Duration attached to `source -> target` by the timed companion of `kind`.
    /// Only conditions (delays) and responses (deadlines) can be timed.
    pub fn timing(
        &self,
        kind: RelationKind,
        source: &str,
        target: &str,
    ) -> Option<std::time::Duration> {
        let timed = match kind {
            RelationKind::Condition => self.timed_conditions.as_ref(),
            RelationKind::Response => self.timed_responses.as_ref(),
            _ => None,
        }?;
        timed.get(source)?.get(target).copied()
    }

    pub fn events(&self) -> &EventSet {
        &self.events
    }

    pub fn set_events(&mut self, value: EventSet) {
        self.events = value;
    }

    pub fn marking(&self) -> &Marking {
        &self.marking
    }

    pub fn marking_mut(&mut self) -> &mut Marking {
        &mut self.marking
    }

    pub fn set_marking(&mut self, value: Marking) {
        self.marking = value;
    }

    pub fn labels(&self) -> &EventSet {
        &self.labels
    }

    pub fn set_labels(&mut self, value: EventSet) {
        self.labels = value;
    }

    pub fn label_map(&self) -> &BTreeMap<String, String> {
        &self.label_map
    }

    pub fn set_label_map(&mut self, value: BTreeMap<String, String>) {
        self.label_map = value;
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    pub fn relations_mut(&mut self) -> &mut Relations {
        &mut self.relations
    }

    pub fn conditions(&self) -> &RelationMap {
        self.core(RelationKind::Condition)
    }

    pub fn responses(&self) -> &RelationMap {
        self.core(RelationKind::Response)
    }

    pub fn includes(&self) -> &RelationMap {
        self.core(RelationKind::Include)
    }

    pub fn excludes(&self) -> &RelationMap {
        self.core(RelationKind::Exclude)
    }

    pub fn noresponses(&self) -> Option<&RelationMap> {
        self.relations.get(RelationKind::NoResponse)
    }

    pub fn milestones(&self) -> Option<&RelationMap> {
        self.relations.get(RelationKind::Milestone)
    }

    pub fn timed_conditions(&self) -> Option<&TimedRelationMap> {
        self.timed_conditions.as_ref()
    }

    pub fn set_timed_conditions(&mut self, value: Option<TimedRelationMap>) {
        self.timed_conditions = value;
    }

    pub fn timed_responses(&self) -> Option<&TimedRelationMap> {
        self.timed_responses.as_ref()
    }

    pub fn set_timed_responses(&mut self, value: Option<TimedRelationMap>) {
        self.timed_responses = value;
    }

    pub fn groups(&self) -> &GroupHierarchy {
        &self.groups
    }

    pub fn set_groups(&mut self, value: GroupHierarchy) {
        self.groups = value;
    }

    pub fn roles(&self) -> &EventSet {
        &self.roles
    }

    pub fn set_roles(&mut self, value: EventSet) {
        self.roles = value;
    }

    pub fn principals(&self) -> &EventSet {
        &self.principals
    }

    pub fn set_principals(&mut self, value: EventSet) {
        self.principals = value;
    }

    pub fn role_assignments(&self) -> &BTreeMap<String, EventSet> {
        &self.role_assignments
    }

    pub fn set_role_assignments(&mut self, value: BTreeMap<String, EventSet>) {
        self.role_assignments = value;
    }

    pub fn principal_assignments(&self) -> &BTreeMap<String, EventSet> {
        &self.principal_assignments
    }

    pub fn set_principal_assignments(&mut self, value: BTreeMap<String, EventSet>) {
        self.principal_assignments = value;
    }

    fn core(&self, kind: RelationKind) -> &RelationMap {
        static EMPTY: RelationMap = RelationMap::new();
        self.relations.get(kind).unwrap_or(&EMPTY)
    }

    fn warn_unknown_events(&self) {
        let known = |id: &str| self.events.contains(id) || self.groups.is_group(id);
        for kind in RelationKind::ALL {
            for (source, target) in self.relations.pairs(kind) {
                for id in [source, target] {
                    if !known(id) {
                        warn!(relation:% = kind, event = id; "Relation references an unknown event");
                    }
                }
            }
        }
        for event in self.label_map.keys() {
            if !self.events.contains(event) {
                warn!(event = event.as_str(); "Label mapping references an unknown event");
            }
        }
    }
}

impl PartialEq for DcrGraph {
    fn eq(&self, other: &Self) -> bool {
        self.relations.core_eq(&other.relations)
    }
}

impl fmt::Display for DcrGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "events: {:?}", self.events)?;
        writeln!(f, "marking: {}", self.marking)?;
        writeln!(f, "labels: {:?}", self.labels)?;
        for kind in RelationKind::ALL {
            if let Some(map) = self.relations.get(kind) {
                writeln!(f, "{}: {:?}", kind.template_key(), map)?;
            }
        }
        write!(f, "labelMapping: {:?}", self.label_map)
    }
}

fn timed_from_template(timed: &TemplateTimedRelation) -> TimedRelationMap {
    timed
        .iter()
        .map(|(source, targets)| {
            let targets = targets.iter().map(|(t, d)| (t.clone(), d.0)).collect();
            (source.clone(), targets)
        })
        .collect()
}

fn timed_to_template(timed: &TimedRelationMap) -> TemplateTimedRelation {
    timed
        .iter()
        .map(|(source, targets)| {
            let targets = targets
                .iter()
                .map(|(t, d)| (t.clone(), IsoDuration(*d)))
                .collect();
            (source.clone(), targets)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::MarkingTemplate;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn set(items: &[&str]) -> EventSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn relation(pairs: &[(&str, &[&str])]) -> RelationMap {
        pairs
            .iter()
            .map(|(s, ts)| (s.to_string(), set(ts)))
            .collect()
    }

    fn request_approve_ship() -> DcrTemplate {
        let mut t = DcrTemplate::empty();
        t.events = set(&["a", "b", "c"]);
        t.labels = set(&["Request", "Approve", "Ship"]);
        t.label_mapping = [("a", "Request"), ("b", "Approve"), ("c", "Ship")]
            .into_iter()
            .map(|(e, l)| (e.to_string(), l.to_string()))
            .collect();
        t.conditions_for = relation(&[("a", &["b"])]);
        t.marking.included = set(&["a", "b", "c"]);
        t
    }

    #[test]
    fn empty_graph_has_no_constraints() {
        let g = DcrGraph::new();
        assert_eq!(g.get_constraints(), 0);
        assert!(g.events().is_empty());
        assert!(g.noresponses().is_none());
        assert_eq!(g, DcrGraph::from_template(&DcrTemplate::empty()));
    }

    #[test]
    fn label_lookups() {
        let g = DcrGraph::from_template(&request_approve_ship());
        assert_eq!(g.get_constraints(), 1);
        assert_eq!(g.get_event("Approve"), "b");
        assert_eq!(g.get_event("Unknown"), "Unknown");
        assert_eq!(g.get_activity("c"), "Ship");
        assert_eq!(g.get_activity("zzz"), "zzz");
    }

    #[test]
    fn get_event_returns_first_of_shared_label() {
        let mut t = request_approve_ship();
        t.events.insert("a2".to_string());
        t.label_mapping.insert("a2".to_string(), "Request".to_string());
        let g = DcrGraph::from_template(&t);
        assert_eq!(g.get_event("Request"), "a");
    }

    #[test]
    fn constraint_count_sums_targets_of_core_kinds() {
        let mut t = request_approve_ship();
        t.conditions_for = relation(&[("a", &["b", "c"])]);
        t.response_to = relation(&[("a", &["b"]), ("b", &["c"])]);
        t.includes_to = relation(&[("c", &["a"])]);
        t.excludes_to = relation(&[("c", &["c", "b", "a"])]);
        t.no_response_to = Some(relation(&[("a", &["c"])]));
        t.milestones_for = Some(relation(&[("b", &["a"])]));
        let g = DcrGraph::from_template(&t);
        assert_eq!(g.get_constraints(), 2 + 2 + 1 + 3);
    }

    #[test]
    fn template_round_trip() {
        let mut t = request_approve_ship();
        t.no_response_to = Some(relation(&[("b", &["b"])]));
        let delay = BTreeMap::from([("b".to_string(), IsoDuration(Duration::from_secs(3600)))]);
        t.conditions_for_delays = Some(BTreeMap::from([("a".to_string(), delay)]));
        t.nested_groups.insert("G".to_string(), vec!["b".to_string(), "c".to_string()]);
        t.roles = set(&["Clerk"]);
        t.role_assignments.insert("Clerk".to_string(), set(&["a"]));
        t.principals = set(&["alice", "bob"]);
        t.principals_assignments.insert("alice".to_string(), set(&["Clerk"]));

        let g = DcrGraph::from_template(&t);
        assert_eq!(g.principals(), &set(&["alice", "bob"]));
        assert_eq!(g.principal_assignments()["alice"], set(&["Clerk"]));
        let exported = g.to_template();
        assert_eq!(exported, t);
        assert_eq!(DcrGraph::from_template(&exported), g);
    }

    #[test]
    fn construction_copies_template() {
        let mut t = request_approve_ship();
        let g = DcrGraph::from_template(&t);
        t.conditions_for.clear();
        t.marking.included.clear();
        assert_eq!(g.get_constraints(), 1);
        assert_eq!(g.marking().included().len(), 3);

        let mut exported = g.to_template();
        exported.events.insert("d".to_string());
        assert!(!g.events().contains("d"));
    }

    #[test]
    fn equality_ignores_marking_and_labels() {
        let a = DcrGraph::from_template(&request_approve_ship());
        let mut b = a.clone();
        b.set_label_map(BTreeMap::new());
        b.marking_mut().reset(&MarkingTemplate::default());
        b.set_events(BTreeSet::new());
        assert_eq!(a, b);

        b.relations_mut().insert(RelationKind::Response, "a", "c");
        assert_ne!(a, b);
    }

    #[test]
    fn roles_and_timings() {
        let mut g = DcrGraph::from_template(&request_approve_ship());
        g.set_role_assignments(
            [
                ("Clerk".to_string(), set(&["a", "b"])),
                ("Manager".to_string(), set(&["b"])),
            ]
            .into(),
        );
        assert_eq!(g.roles_of("b"), vec!["Clerk", "Manager"]);
        assert!(g.roles_of("c").is_empty());

        let mut timed = TimedRelationMap::new();
        timed.entry("a".to_string()).or_default().insert("b".to_string(), Duration::from_secs(60));
        g.set_timed_responses(Some(timed));
        assert_eq!(
            g.timing(RelationKind::Response, "a", "b"),
            Some(Duration::from_secs(60))
        );
        assert_eq!(g.timing(RelationKind::Condition, "a", "b"), None);
        assert_eq!(g.timing(RelationKind::Include, "a", "b"), None);
    }
}
