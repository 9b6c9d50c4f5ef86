//! Change notification bus.
//!
//! Mutations publish a [`ChangeEvent`]; every subscribed [`Subscriber`] is
//! called synchronously, in subscription order, and re-pulls whatever it
//! displays from the store. The event only says *that* a category of change
//! happened (plus the affected row id), never *what* changed.

use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    StudentAdded,
    EventAdded,
    RecordAdded,
    StudentRemoved,
    EventRemoved,
    RecordRemoved,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::StudentAdded => "student_added",
            ChangeKind::EventAdded => "event_added",
            ChangeKind::RecordAdded => "record_added",
            ChangeKind::StudentRemoved => "student_removed",
            ChangeKind::EventRemoved => "event_removed",
            ChangeKind::RecordRemoved => "record_removed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "student_added" => Some(ChangeKind::StudentAdded),
            "event_added" => Some(ChangeKind::EventAdded),
            "record_added" => Some(ChangeKind::RecordAdded),
            "student_removed" => Some(ChangeKind::StudentRemoved),
            "event_removed" => Some(ChangeKind::EventRemoved),
            "record_removed" => Some(ChangeKind::RecordRemoved),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    /// Id of the affected row, when there is a single one.
    pub id: Option<i64>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, id: i64) -> Self {
        Self { kind, id: Some(id) }
    }
}

pub trait Subscriber {
    fn on_event(&self, store: &DbPool, event: &ChangeEvent) -> AppResult<()>;
}

impl<F> Subscriber for F
where
    F: Fn(&DbPool, &ChangeEvent) -> AppResult<()>,
{
    fn on_event(&self, store: &DbPool, event: &ChangeEvent) -> AppResult<()> {
        self(store, event)
    }
}

/// Outcome of one [`Subject::publish`] call.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub delivered: usize,
    pub failures: Vec<AppError>,
}

impl PublishReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Default)]
pub struct Subject {
    subscribers: Vec<Rc<dyn Subscriber>>,
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Returns `false` when it was already registered.
    pub fn subscribe(&mut self, subscriber: Rc<dyn Subscriber>) -> bool {
        if self.is_subscribed(&subscriber) {
            return false;
        }
        self.subscribers.push(subscriber);
        true
    }

    /// Remove a subscriber. Returns `false` when it was not registered.
    pub fn unsubscribe<S: Subscriber + ?Sized>(&mut self, subscriber: &Rc<S>) -> bool {
        let before = self.subscribers.len();
        self.subscribers
            .retain(|s| !std::ptr::addr_eq(Rc::as_ptr(s), Rc::as_ptr(subscriber)));
        before != self.subscribers.len()
    }

    pub fn is_subscribed<S: Subscriber + ?Sized>(&self, subscriber: &Rc<S>) -> bool {
        self.subscribers
            .iter()
            .any(|s| std::ptr::addr_eq(Rc::as_ptr(s), Rc::as_ptr(subscriber)))
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver `event` to every subscriber. A failing subscriber does not
    /// prevent delivery to the ones after it.
    pub fn publish(&self, store: &DbPool, event: &ChangeEvent) -> PublishReport {
        let mut report = PublishReport::default();

        for s in &self.subscribers {
            match s.on_event(store, event) {
                Ok(()) => report.delivered += 1,
                Err(e) => report.failures.push(e),
            }
        }

        report
    }
}
