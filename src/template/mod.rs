//! Template layer: the serde-facing snapshot a graph is built from and exported to.
//!
//! This module is intentionally separate from the graph model and rendering.
//! It owns:
//! - the JSON template shape (required and optional keys)
//! - ISO-8601 durations for timed relations

pub mod duration;
pub mod shape;

pub use duration::{IsoDuration, TimePrecision, duration_label, format_iso_duration, parse_iso_duration};
pub use shape::{DcrTemplate, MarkingTemplate, TemplateRelation, TemplateTimedRelation};
