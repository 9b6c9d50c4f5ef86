//! Display views over the aggregations, and the subscriber that keeps one of
//! them fresh after every relevant change.

use crate::core::bus::{ChangeEvent, ChangeKind, Subscriber};
use crate::db::aggregate;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::category::CategoryFilter;
use crate::models::student::Student;
use crate::models::table::TableData;
use clap::ValueEnum;
use rusqlite::Connection;
use std::cell::{Cell, RefCell};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ViewKind {
    /// All students
    Students,
    /// All events
    Events,
    /// Participant count per event
    EventCounts,
    /// Participant names per event
    EventNames,
    /// Number of events per student
    StudentCounts,
    /// Events attended per student
    StudentEvents,
    /// Students of one form (requires --form)
    Form,
}

impl ViewKind {
    /// Whether a change of `kind` can alter this view.
    pub fn depends_on(&self, kind: ChangeKind) -> bool {
        use ChangeKind::*;
        match self {
            ViewKind::Students | ViewKind::Form => {
                matches!(kind, StudentAdded | StudentRemoved)
            }
            ViewKind::Events => matches!(kind, EventAdded | EventRemoved),
            ViewKind::EventCounts | ViewKind::EventNames => !matches!(kind, StudentAdded),
            ViewKind::StudentCounts | ViewKind::StudentEvents => {
                matches!(kind, RecordAdded | RecordRemoved | StudentRemoved | EventRemoved)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Students => "students",
            ViewKind::Events => "events",
            ViewKind::EventCounts => "event-counts",
            ViewKind::EventNames => "event-names",
            ViewKind::StudentCounts => "student-counts",
            ViewKind::StudentEvents => "student-events",
            ViewKind::Form => "form",
        }
    }
}

/// What a view shows: the aggregation, its category filter, and how
/// categories are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpec {
    pub kind: ViewKind,
    pub filter: CategoryFilter,
    pub form: Option<String>,
    pub labels: bool,
}

impl ViewSpec {
    pub fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            filter: CategoryFilter::All,
            form: None,
            labels: true,
        }
    }

    pub fn with_filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn title(&self) -> String {
        let cat = self.filter.label();
        match self.kind {
            ViewKind::Students => "Students".to_string(),
            ViewKind::Events => "Events".to_string(),
            ViewKind::EventCounts => format!("Event participants - total ({cat})"),
            ViewKind::EventNames => format!("Event participants - names ({cat})"),
            ViewKind::StudentCounts => format!("Student participation - count ({cat})"),
            ViewKind::StudentEvents => format!("Student participation - events ({cat})"),
            ViewKind::Form => format!("Form {}", self.form.as_deref().unwrap_or("?")),
        }
    }
}

fn student_row(st: &Student, labels: bool) -> Vec<String> {
    let cat = if labels {
        st.category.label()
    } else {
        st.category.code()
    };
    vec![
        st.class.clone(),
        st.class_number.to_string(),
        st.name.clone(),
        cat.to_string(),
    ]
}

/// Run the aggregation behind `spec` and shape it as a table.
pub fn load_view(conn: &Connection, spec: &ViewSpec) -> AppResult<TableData> {
    let title = spec.title();

    let table = match spec.kind {
        ViewKind::Students => {
            let mut t = TableData::new(title, &["class", "class_number", "name", "category"]);
            for st in queries::get_all_students(conn)? {
                if spec.filter.matches(st.category) {
                    t.push(student_row(&st, spec.labels));
                }
            }
            t
        }
        ViewKind::Form => {
            let form = spec
                .form
                .as_deref()
                .ok_or_else(|| AppError::Other("the form view requires --form".into()))?;
            let mut t = TableData::new(title, &["class", "class_number", "name", "category"]);
            for st in queries::students_by_form(conn, form)? {
                if spec.filter.matches(st.category) {
                    t.push(student_row(&st, spec.labels));
                }
            }
            t
        }
        ViewKind::Events => {
            let mut t = TableData::new(title, &["event"]);
            for ev in queries::get_all_events(conn)? {
                t.push(vec![ev.name]);
            }
            t
        }
        ViewKind::EventCounts => {
            let mut t = TableData::new(title, &["event", "participants"]);
            for r in aggregate::event_participant_counts(conn, spec.filter)? {
                t.push(vec![r.event, r.count.to_string()]);
            }
            t
        }
        ViewKind::EventNames => {
            let mut t = TableData::new(title, &["event", "students"]);
            for r in aggregate::event_participant_names(conn, spec.filter)? {
                t.push(vec![r.event, r.names]);
            }
            t
        }
        ViewKind::StudentCounts => {
            let mut t = TableData::new(title, &["class", "class_number", "name", "events_count"]);
            for r in aggregate::student_event_counts(conn, spec.filter)? {
                t.push(vec![
                    r.class,
                    r.class_number.to_string(),
                    r.name,
                    r.count.to_string(),
                ]);
            }
            t
        }
        ViewKind::StudentEvents => {
            let mut t = TableData::new(title, &["class", "class_number", "name", "events"]);
            for r in aggregate::student_event_lists(conn, spec.filter)? {
                t.push(vec![r.class, r.class_number.to_string(), r.name, r.events]);
            }
            t
        }
    };

    Ok(table)
}

/// A view that re-pulls its whole aggregation whenever a change it depends on
/// is published. There is no incremental update.
pub struct TableView {
    spec: ViewSpec,
    snapshot: RefCell<TableData>,
    refreshes: Cell<usize>,
}

impl TableView {
    pub fn new(spec: ViewSpec) -> Self {
        Self {
            spec,
            snapshot: RefCell::new(TableData::default()),
            refreshes: Cell::new(0),
        }
    }

    /// Build the view and take its first snapshot.
    pub fn open(store: &DbPool, spec: ViewSpec) -> AppResult<Self> {
        let view = Self::new(spec);
        view.refresh(store)?;
        view.refreshes.set(0);
        Ok(view)
    }

    pub fn spec(&self) -> &ViewSpec {
        &self.spec
    }

    pub fn refresh(&self, store: &DbPool) -> AppResult<()> {
        let table = load_view(&store.conn, &self.spec)?;
        *self.snapshot.borrow_mut() = table;
        self.refreshes.set(self.refreshes.get() + 1);
        Ok(())
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> TableData {
        self.snapshot.borrow().clone()
    }

    /// How many times the view was redrawn because of a change.
    pub fn refreshes(&self) -> usize {
        self.refreshes.get()
    }
}

impl Subscriber for TableView {
    fn on_event(&self, store: &DbPool, event: &ChangeEvent) -> AppResult<()> {
        if self.spec.kind.depends_on(event.kind) {
            self.refresh(store)?;
        }
        Ok(())
    }
}
