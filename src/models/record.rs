use serde::{Deserialize, Serialize};

/// Status written for every attendance produced by the shell.
pub const STATUS_ATTENDED: &str = "1";

/// "This student attended this event."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub event_id: i64,
    pub status: String,
}
