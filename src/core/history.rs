//! Undo history.
//!
//! Every mutation made through the tracker stores a full pre-image of what
//! it touched. Undoing pops the newest entry and applies the inverse
//! operation against the store.

use crate::core::bus::{ChangeEvent, ChangeKind};
use crate::db::history as store;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::record::AttendanceRecord;
use crate::models::student::Student;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Change {
    StudentAdded {
        student: Student,
    },
    EventAdded {
        event: Event,
    },
    RecordAdded {
        record: AttendanceRecord,
    },
    StudentDeleted {
        student: Student,
        records: Vec<AttendanceRecord>,
    },
    EventDeleted {
        event: Event,
        records: Vec<AttendanceRecord>,
    },
}

impl Change {
    pub fn action(&self) -> &'static str {
        match self {
            Change::StudentAdded { .. } => "student_added",
            Change::EventAdded { .. } => "event_added",
            Change::RecordAdded { .. } => "record_added",
            Change::StudentDeleted { .. } => "student_deleted",
            Change::EventDeleted { .. } => "event_deleted",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Change::StudentAdded { student } => format!(
                "student {} ({}, #{})",
                student.name, student.class, student.class_number
            ),
            Change::EventAdded { event } => format!("event '{}'", event.name),
            Change::RecordAdded { record } => format!(
                "record #{} (student {} → event {})",
                record.id, record.student_id, record.event_id
            ),
            Change::StudentDeleted { student, records } => format!(
                "student {} ({}, #{}) with {} record(s)",
                student.name,
                student.class,
                student.class_number,
                records.len()
            ),
            Change::EventDeleted { event, records } => {
                format!("event '{}' with {} record(s)", event.name, records.len())
            }
        }
    }

    /// Apply the inverse of this change and return the notifications it
    /// implies.
    pub fn revert(&self, conn: &Connection) -> AppResult<Vec<ChangeEvent>> {
        let mut events = Vec::new();

        match self {
            Change::StudentAdded { student } => {
                queries::delete_student(conn, student.id)?;
                events.push(ChangeEvent::new(ChangeKind::StudentRemoved, student.id));
            }
            Change::EventAdded { event } => {
                queries::delete_event(conn, event.id)?;
                events.push(ChangeEvent::new(ChangeKind::EventRemoved, event.id));
            }
            Change::RecordAdded { record } => {
                queries::delete_record(conn, record.id)?;
                events.push(ChangeEvent::new(ChangeKind::RecordRemoved, record.id));
            }
            Change::StudentDeleted { student, records } => {
                queries::insert_student_with_id(conn, student)?;
                events.push(ChangeEvent::new(ChangeKind::StudentAdded, student.id));
                for r in records {
                    queries::insert_record_with_id(conn, r)?;
                    events.push(ChangeEvent::new(ChangeKind::RecordAdded, r.id));
                }
            }
            Change::EventDeleted { event, records } => {
                queries::insert_event_with_id(conn, event)?;
                events.push(ChangeEvent::new(ChangeKind::EventAdded, event.id));
                for r in records {
                    queries::insert_record_with_id(conn, r)?;
                    events.push(ChangeEvent::new(ChangeKind::RecordAdded, r.id));
                }
            }
        }

        Ok(events)
    }
}

/// One persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: i64,
    pub date: String,
    pub change: Change,
}

pub struct HistoryLog;

impl HistoryLog {
    pub fn record(conn: &Connection, change: &Change) -> AppResult<i64> {
        let payload = serde_json::to_string(change)?;
        store::push(conn, change.action(), &payload)
    }

    /// Newest entry, without removing it.
    pub fn peek(conn: &Connection) -> AppResult<Option<HistoryEntry>> {
        match store::last(conn)? {
            Some(row) => Ok(Some(Self::decode(row)?)),
            None => Ok(None),
        }
    }

    /// Revert the newest entry and drop it from the history.
    pub fn undo_last(conn: &Connection) -> AppResult<(HistoryEntry, Vec<ChangeEvent>)> {
        let entry = Self::peek(conn)?.ok_or(AppError::NothingToUndo)?;
        let events = entry.change.revert(conn)?;
        store::remove(conn, entry.id)?;
        Ok((entry, events))
    }

    /// All entries, newest first.
    pub fn list(conn: &Connection) -> AppResult<Vec<HistoryEntry>> {
        store::list(conn)?.into_iter().map(Self::decode).collect()
    }

    pub fn clear(conn: &Connection) -> AppResult<usize> {
        store::clear(conn)
    }

    fn decode(row: store::HistoryRow) -> AppResult<HistoryEntry> {
        let change: Change = serde_json::from_str(&row.payload).map_err(|e| {
            AppError::History(format!("entry #{} ({}): {}", row.id, row.action, e))
        })?;
        Ok(HistoryEntry {
            id: row.id,
            date: row.date,
            change,
        })
    }
}
