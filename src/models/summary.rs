//! Row types returned by the aggregation queries.

use serde::Serialize;

/// Event → number of (matching) participants. Events with no records appear
/// with `count == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCount {
    pub event_id: i64,
    pub event: String,
    pub count: i64,
}

/// Event → participant names joined with `", "`. Empty when nobody matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventParticipants {
    pub event_id: i64,
    pub event: String,
    pub names: String,
}

/// Student → number of events attended. Students without records are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentEventCount {
    pub student_id: i64,
    pub class: String,
    pub class_number: i64,
    pub name: String,
    pub count: i64,
}

/// Student → attended event names joined with `", "`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentEventList {
    pub student_id: i64,
    pub class: String,
    pub class_number: i64,
    pub name: String,
    pub events: String,
}
