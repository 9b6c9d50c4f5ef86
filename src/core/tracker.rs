//! Mutation entry point: every write goes through [`Tracker`], which
//! commits it, records its undo pre-image, writes an audit line and
//! notifies the subscribed views.

use crate::core::bus::{ChangeEvent, ChangeKind, Subject, Subscriber};
use crate::core::history::{Change, HistoryEntry, HistoryLog};
use crate::core::import::BatchMode;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::record::{AttendanceRecord, STATUS_ATTENDED};
use crate::models::student::{NewStudent, Student, StudentKey};
use crate::ui::messages::warning;
use rusqlite::Connection;
use std::rc::Rc;

pub struct Tracker {
    pool: Rc<DbPool>,
    bus: Subject,
    /// Notifications held back until the enclosing atomic batch commits.
    pending: Vec<ChangeEvent>,
    depth: usize,
}

impl Tracker {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool: Rc::new(pool),
            bus: Subject::new(),
            pending: Vec::new(),
            depth: 0,
        }
    }

    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self::new(DbPool::new(path)?))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    pub fn bus(&self) -> &Subject {
        &self.bus
    }

    pub fn subscribe(&mut self, subscriber: Rc<dyn Subscriber>) -> bool {
        self.bus.subscribe(subscriber)
    }

    pub fn unsubscribe<S: Subscriber + ?Sized>(&mut self, subscriber: &Rc<S>) -> bool {
        self.bus.unsubscribe(subscriber)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Store a student. Class and name are trimmed and must not be empty.
    pub fn add_student(&mut self, new: &NewStudent) -> AppResult<Student> {
        let new = NewStudent::new(
            new.class.trim(),
            new.class_number,
            new.name.trim(),
            new.category,
        );
        if new.class.is_empty() {
            return Err(AppError::EmptyField("class"));
        }
        if new.name.is_empty() {
            return Err(AppError::EmptyField("name"));
        }

        self.in_batch(BatchMode::Atomic, |t| {
            let id = queries::add_student(&t.pool.conn, &new)?;
            let student = Student {
                id,
                class: new.class.clone(),
                class_number: new.class_number,
                name: new.name.clone(),
                category: new.category,
            };

            HistoryLog::record(
                &t.pool.conn,
                &Change::StudentAdded {
                    student: student.clone(),
                },
            )?;
            t.audit(
                "add",
                "student",
                &format!(
                    "{}, {}, {}, {}",
                    student.class, student.class_number, student.name, student.category
                ),
            );
            t.emit(ChangeEvent::new(ChangeKind::StudentAdded, id));

            Ok(student)
        })
    }

    pub fn add_event(&mut self, name: &str) -> AppResult<Event> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyEventName);
        }

        self.in_batch(BatchMode::Atomic, |t| {
            let id = queries::add_event_with_return(&t.pool.conn, name)?;
            let event = Event {
                id,
                name: name.to_string(),
            };

            HistoryLog::record(
                &t.pool.conn,
                &Change::EventAdded {
                    event: event.clone(),
                },
            )?;
            t.audit("add", "event", &event.name);
            t.emit(ChangeEvent::new(ChangeKind::EventAdded, id));

            Ok(event)
        })
    }

    pub fn add_record(&mut self, student_id: i64, event_id: i64) -> AppResult<AttendanceRecord> {
        self.in_batch(BatchMode::Atomic, |t| {
            let id = queries::add_record(&t.pool.conn, student_id, event_id, STATUS_ATTENDED)?;
            let record = AttendanceRecord {
                id,
                student_id,
                event_id,
                status: STATUS_ATTENDED.to_string(),
            };

            HistoryLog::record(
                &t.pool.conn,
                &Change::RecordAdded {
                    record: record.clone(),
                },
            )?;
            t.audit(
                "add",
                "record",
                &format!("student {} → event {}", student_id, event_id),
            );
            t.emit(ChangeEvent::new(ChangeKind::RecordAdded, id));

            Ok(record)
        })
    }

    /// Delete a student and its attendance records. Undoable.
    pub fn delete_student(&mut self, key: &StudentKey) -> AppResult<Student> {
        self.in_batch(BatchMode::Atomic, |t| {
            let conn = &t.pool.conn;
            let student = queries::find_student_id(conn, key)?
                .map(|id| queries::get_student(conn, id))
                .transpose()?
                .flatten()
                .ok_or_else(|| AppError::StudentNotFound {
                    class: key.class.clone(),
                    class_number: key.class_number,
                    name: key.name.clone(),
                })?;
            let records = queries::records_for_student(conn, student.id)?;

            queries::delete_student(conn, student.id)?;
            HistoryLog::record(
                conn,
                &Change::StudentDeleted {
                    student: student.clone(),
                    records: records.clone(),
                },
            )?;

            t.audit(
                "del",
                "student",
                &format!(
                    "{}, {}, {} ({} record(s))",
                    student.class,
                    student.class_number,
                    student.name,
                    records.len()
                ),
            );
            t.emit(ChangeEvent::new(ChangeKind::StudentRemoved, student.id));
            Ok(student)
        })
    }

    /// Delete an event and its attendance records. Undoable.
    pub fn delete_event(&mut self, name: &str) -> AppResult<Event> {
        let name = name.trim();
        self.in_batch(BatchMode::Atomic, |t| {
            let conn = &t.pool.conn;
            let id = queries::find_event_id(conn, name)?
                .ok_or_else(|| AppError::EventNotFound(name.to_string()))?;
            let event = queries::get_event(conn, id)?
                .ok_or_else(|| AppError::EventNotFound(name.to_string()))?;
            let records = queries::records_for_event(conn, id)?;

            queries::delete_event(conn, id)?;
            HistoryLog::record(
                conn,
                &Change::EventDeleted {
                    event: event.clone(),
                    records: records.clone(),
                },
            )?;

            t.audit(
                "del",
                "event",
                &format!("{} ({} record(s))", event.name, records.len()),
            );
            t.emit(ChangeEvent::new(ChangeKind::EventRemoved, id));
            Ok(event)
        })
    }

    /// Revert the newest history entry against the store.
    pub fn undo(&mut self) -> AppResult<HistoryEntry> {
        self.in_batch(BatchMode::Atomic, |t| {
            let (entry, events) = HistoryLog::undo_last(&t.pool.conn)?;
            t.audit("undo", entry.change.action(), &entry.change.describe());
            for ev in events {
                t.emit(ev);
            }
            Ok(entry)
        })
    }

    /// Undo history, newest first.
    pub fn history(&self) -> AppResult<Vec<HistoryEntry>> {
        HistoryLog::list(&self.pool.conn)
    }

    // -----------------------------------------------------------------------
    // Batches & notifications
    // -----------------------------------------------------------------------

    /// Run `f` as one unit.
    ///
    /// `Partial`: every mutation inside commits on its own; a failure keeps
    /// the rows written before it. `Atomic`: everything runs inside one
    /// transaction and notifications are delivered only after the commit;
    /// on failure the transaction is rolled back and nothing is published.
    /// An atomic batch started inside another one joins the outer
    /// transaction.
    pub fn in_batch<T, F>(&mut self, mode: BatchMode, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Self) -> AppResult<T>,
    {
        if mode == BatchMode::Partial || self.depth > 0 {
            return f(self);
        }

        // dropping `tx` without commit rolls it back
        let pool = Rc::clone(&self.pool);
        let tx = pool.conn.unchecked_transaction()?;

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;

        let result = result.and_then(|v| {
            tx.commit()?;
            Ok(v)
        });

        match result {
            Ok(v) => {
                let pending = std::mem::take(&mut self.pending);
                for ev in &pending {
                    self.publish(ev);
                }
                Ok(v)
            }
            Err(e) => {
                self.pending.clear();
                Err(e)
            }
        }
    }

    fn emit(&mut self, event: ChangeEvent) {
        if self.depth > 0 {
            self.pending.push(event);
        } else {
            self.publish(&event);
        }
    }

    fn publish(&self, event: &ChangeEvent) {
        let report = self.bus.publish(&self.pool, event);
        for e in report.failures {
            warning(format!("A view failed to refresh after {}: {}", event.kind, e));
        }
    }

    /// Audit failures never abort the mutation they describe.
    fn audit(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = ttlog(&self.pool.conn, operation, target, message) {
            warning(format!("Failed to write internal log: {}", e));
        }
    }
}
