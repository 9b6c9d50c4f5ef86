mod common;
use common::{sample_tracker, tracker};
use rparticipation::core::bus::{ChangeEvent, ChangeKind, Subject, Subscriber};
use rparticipation::core::import::BatchMode;
use rparticipation::core::views::{TableView, ViewKind, ViewSpec};
use rparticipation::db::pool::DbPool;
use rparticipation::db::queries;
use rparticipation::errors::{AppError, AppResult};
use rparticipation::models::category::Category;
use rparticipation::models::student::{NewStudent, StudentKey};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct Counter {
    hits: Cell<usize>,
    kinds: RefCell<Vec<ChangeKind>>,
}

impl Subscriber for Counter {
    fn on_event(&self, _store: &DbPool, event: &ChangeEvent) -> AppResult<()> {
        self.hits.set(self.hits.get() + 1);
        self.kinds.borrow_mut().push(event.kind);
        Ok(())
    }
}

fn student_added() -> ChangeEvent {
    ChangeEvent::new(ChangeKind::StudentAdded, 1)
}

#[test]
fn test_double_subscribe_delivers_once() {
    let pool = DbPool::in_memory().unwrap();
    let mut bus = Subject::new();
    let counter = Rc::new(Counter::default());

    assert!(bus.subscribe(counter.clone()));
    assert!(!bus.subscribe(counter.clone()));
    assert_eq!(bus.len(), 1);

    let report = bus.publish(&pool, &student_added());
    assert_eq!(report.delivered, 1);
    assert_eq!(counter.hits.get(), 1);
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let pool = DbPool::in_memory().unwrap();
    let mut bus = Subject::new();
    let counter = Rc::new(Counter::default());

    bus.subscribe(counter.clone());
    bus.subscribe(counter.clone());
    bus.publish(&pool, &student_added());

    assert!(bus.unsubscribe(&counter));
    assert!(!bus.unsubscribe(&counter));
    assert!(!bus.is_subscribed(&counter));

    bus.publish(&pool, &student_added());
    bus.publish(&pool, &ChangeEvent::new(ChangeKind::RecordAdded, 3));
    assert_eq!(counter.hits.get(), 1);
}

#[test]
fn test_delivery_in_subscription_order() {
    let pool = DbPool::in_memory().unwrap();
    let mut bus = Subject::new();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let l = log.clone();
        let sub: Rc<dyn Subscriber> = Rc::new(move |_: &DbPool, _: &ChangeEvent| -> AppResult<()> {
            l.borrow_mut().push(label);
            Ok(())
        });
        bus.subscribe(sub);
    }

    bus.publish(&pool, &student_added());
    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_failing_subscriber_does_not_block_others() {
    let pool = DbPool::in_memory().unwrap();
    let mut bus = Subject::new();

    let failing: Rc<dyn Subscriber> = Rc::new(|_: &DbPool, _: &ChangeEvent| -> AppResult<()> {
        Err(AppError::Other("boom".into()))
    });
    let counter = Rc::new(Counter::default());

    bus.subscribe(failing);
    bus.subscribe(counter.clone());

    let report = bus.publish(&pool, &student_added());
    assert_eq!(report.delivered, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(!report.is_clean());
    assert_eq!(counter.hits.get(), 1);
}

#[test]
fn test_tracker_mutations_publish_kinds() {
    let mut t = tracker();
    let counter = Rc::new(Counter::default());
    t.subscribe(counter.clone());

    let st = t
        .add_student(&NewStudent::new("1A", 1, "Alice", Category::Cssa))
        .unwrap();
    let ev = t.add_event("Sports Day").unwrap();
    t.add_record(st.id, ev.id).unwrap();

    assert_eq!(
        *counter.kinds.borrow(),
        vec![
            ChangeKind::StudentAdded,
            ChangeKind::EventAdded,
            ChangeKind::RecordAdded
        ]
    );
    assert_eq!(ChangeKind::RecordAdded.as_str(), "record_added");
    assert_eq!(
        ChangeKind::from_db_str("student_added"),
        Some(ChangeKind::StudentAdded)
    );
}

#[test]
fn test_views_refresh_only_on_relevant_changes() {
    let mut t = sample_tracker();

    let students = Rc::new(TableView::open(t.pool(), ViewSpec::new(ViewKind::Students)).unwrap());
    let events = Rc::new(TableView::open(t.pool(), ViewSpec::new(ViewKind::Events)).unwrap());
    let totals = Rc::new(TableView::open(t.pool(), ViewSpec::new(ViewKind::EventCounts)).unwrap());
    t.subscribe(students.clone());
    t.subscribe(events.clone());
    t.subscribe(totals.clone());

    assert_eq!(students.snapshot().len(), 4);
    assert_eq!(totals.snapshot().cell(2, "participants"), Some("0"));

    t.add_student(&NewStudent::new("3C", 5, "Erin", Category::Special))
        .unwrap();
    assert_eq!(students.refreshes(), 1);
    assert_eq!(events.refreshes(), 0);
    assert_eq!(totals.refreshes(), 0);
    assert_eq!(students.snapshot().len(), 5);

    let erin = queries::find_student_id(t.conn(), &StudentKey::new("3C", 5, "Erin"))
        .unwrap()
        .unwrap();
    let fair = queries::find_event_id(t.conn(), "Science Fair").unwrap().unwrap();
    t.add_record(erin, fair).unwrap();

    assert_eq!(totals.refreshes(), 1);
    assert_eq!(events.refreshes(), 0);
    let snap = totals.snapshot();
    assert_eq!(snap.cell(2, "event"), Some("Science Fair"));
    assert_eq!(snap.cell(2, "participants"), Some("1"));
}

#[test]
fn test_atomic_batch_defers_and_drops_notifications() {
    let mut t = tracker();
    let counter = Rc::new(Counter::default());
    t.subscribe(counter.clone());

    let observed = Rc::new(Cell::new(usize::MAX));
    let c = counter.clone();
    let o = observed.clone();
    t.in_batch(BatchMode::Atomic, |t| {
        t.add_student(&NewStudent::new("1A", 1, "Alice", Category::Cssa))?;
        o.set(c.hits.get());
        Ok(())
    })
    .unwrap();
    assert_eq!(observed.get(), 0, "nothing delivered before commit");
    assert_eq!(counter.hits.get(), 1);

    let err = t
        .in_batch(BatchMode::Atomic, |t| {
            t.add_student(&NewStudent::new("1A", 2, "Bob", Category::FullGrant))?;
            Err::<(), _>(AppError::Other("abort".into()))
        })
        .unwrap_err();
    assert!(matches!(err, AppError::Other(_)));
    assert_eq!(counter.hits.get(), 1);
    assert_eq!(queries::total_students(t.conn()).unwrap(), 1);
}
