//! Template (graph snapshot) shape as it appears on disk.
//!
//! JSON shape:
//! {
//!   "events": ["a", "b"],
//!   "marking": { "executed": [], "included": ["a", "b"], "pending": [] },
//!   "labels": ["Request", "Approve"],
//!   "labelMapping": { "a": "Request", "b": "Approve" },
//!   "conditionsFor": { "a": ["b"] },   // source -> targets
//!   "responseTo": {},
//!   "includesTo": {},
//!   "excludesTo": {},
//!
//!   // optional from here on
//!   "noResponseTo": {},
//!   "milestonesFor": {},
//!   "conditionsForDelays": { "a": { "b": "P2D" } },
//!   "responseToDeadlines": {},
//!   "nestedgroups": { "G1": ["x", "y"] },  // ordered members
//!   "roles": ["Clerk"],
//!   "principals": ["alice"],
//!   "roleAssignments": { "Clerk": ["a"] },
//!   "principalsAssignments": { "alice": ["Clerk"] }
//! }
//!
//! The eight keys above the comment are required: a partial template is rejected
//! instead of being filled with defaults.

use crate::template::IsoDuration;
use crate::{DcrError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type TemplateRelation = BTreeMap<String, BTreeSet<String>>;
pub type TemplateTimedRelation = BTreeMap<String, BTreeMap<String, IsoDuration>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkingTemplate {
    pub executed: BTreeSet<String>,
    pub included: BTreeSet<String>,
    pub pending: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcrTemplate {
    pub events: BTreeSet<String>,
    pub marking: MarkingTemplate,
    pub labels: BTreeSet<String>,
    pub label_mapping: BTreeMap<String, String>,
    pub conditions_for: TemplateRelation,
    pub response_to: TemplateRelation,
    pub includes_to: TemplateRelation,
    pub excludes_to: TemplateRelation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_response_to: Option<TemplateRelation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones_for: Option<TemplateRelation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions_for_delays: Option<TemplateTimedRelation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_to_deadlines: Option<TemplateTimedRelation>,

    #[serde(default, rename = "nestedgroups", skip_serializing_if = "BTreeMap::is_empty")]
    pub nested_groups: BTreeMap<String, Vec<String>>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub roles: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub principals: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub role_assignments: BTreeMap<String, BTreeSet<String>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub principals_assignments: BTreeMap<String, BTreeSet<String>>,
}

impl DcrTemplate {
    /// A fresh, empty template. Every call builds a new value, so callers may
    /// mutate the result without affecting later constructions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a complete template; any missing required key is reported as
    /// [`DcrError::MalformedTemplate`].
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DcrError::MalformedTemplate(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DcrError::MalformedTemplate(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"{
        "events": ["a", "b"],
        "marking": { "executed": [], "included": ["a", "b"], "pending": ["b"] },
        "labels": ["Request", "Approve"],
        "labelMapping": { "a": "Request", "b": "Approve" },
        "conditionsFor": { "a": ["b"] },
        "responseTo": {},
        "includesTo": {},
        "excludesTo": {}
    }"#;

    #[test]
    fn parses_required_keys_and_defaults_optionals() {
        let t = DcrTemplate::from_json(MINIMAL).unwrap();
        assert_eq!(t.events.len(), 2);
        assert_eq!(t.marking.pending, BTreeSet::from(["b".to_string()]));
        assert_eq!(t.label_mapping["b"], "Approve");
        assert_eq!(t.no_response_to, None);
        assert_eq!(t.conditions_for_delays, None);
        assert!(t.nested_groups.is_empty());
    }

    #[test]
    fn partial_template_is_rejected() {
        let partial = r#"{ "events": ["a"], "marking": { "executed": [], "included": [], "pending": [] } }"#;
        let err = DcrTemplate::from_json(partial).unwrap_err();
        assert!(matches!(err, DcrError::MalformedTemplate(_)));
        assert!(err.to_string().contains("labels"));
    }

    #[test]
    fn partial_marking_is_rejected() {
        let text = MINIMAL.replace(r#""pending": ["b"] "#, "");
        let text = text.replace(r#""included": ["a", "b"],"#, r#""included": ["a", "b"]"#);
        let err = DcrTemplate::from_json(&text).unwrap_err();
        assert!(err.to_string().contains("pending"), "{err}");
    }

    #[test]
    fn timed_relations_and_groups_parse() {
        let text = MINIMAL.replace(
            r#""excludesTo": {}"#,
            r#""excludesTo": {},
               "conditionsForDelays": { "a": { "b": "P2D" } },
               "nestedgroups": { "G1": ["y", "x"] }"#,
        );
        let t = DcrTemplate::from_json(&text).unwrap();
        let delay = t.conditions_for_delays.as_ref().unwrap()["a"]["b"];
        assert_eq!(delay.0.as_secs(), 2 * 86_400);
        assert_eq!(t.nested_groups["G1"], vec!["y".to_string(), "x".to_string()]);
    }

    #[test]
    fn empty_templates_are_independent() {
        let mut first = DcrTemplate::empty();
        first.events.insert("leak".to_string());
        first.marking.included.insert("leak".to_string());
        let second = DcrTemplate::empty();
        assert!(second.events.is_empty());
        assert!(second.marking.included.is_empty());
    }

    #[test]
    fn json_round_trip_keeps_wire_names() {
        let t = DcrTemplate::from_json(MINIMAL).unwrap();
        let json = t.to_json_pretty().unwrap();
        assert!(json.contains("\"conditionsFor\""));
        assert!(json.contains("\"labelMapping\""));
        assert!(!json.contains("nestedgroups"));
        assert_eq!(DcrTemplate::from_json(&json).unwrap(), t);
    }
}
