mod common;
use common::tracker;
use rparticipation::db::initialize::{has_any_data, is_initialized};
use rparticipation::db::pool::DbPool;
use rparticipation::db::queries;
use rparticipation::errors::AppError;
use rparticipation::models::category::Category;
use rparticipation::models::student::{NewStudent, StudentKey};

#[test]
fn test_all_students_returned_with_categories_unchanged() {
    let pool = DbPool::in_memory().unwrap();
    let input = [
        NewStudent::new("1A", 1, "Alice", Category::Cssa),
        NewStudent::new("1A", 2, "Bob", Category::FullGrant),
        NewStudent::new("3C", 7, "陳大文", Category::Difficulty),
        NewStudent::new("5D", 12, "Eve", Category::Special),
    ];
    for s in &input {
        queries::add_student(&pool.conn, s).unwrap();
    }

    let all = queries::get_all_students(&pool.conn).unwrap();
    assert_eq!(all.len(), input.len());
    for s in &input {
        let found = all.iter().find(|x| x.key() == s.key()).expect("student stored");
        assert_eq!(found.category, s.category);
    }

    // stored as bare codes, no label mapping
    let codes: Vec<String> = {
        let mut stmt = pool.conn.prepare("SELECT category FROM students ORDER BY id").unwrap();
        stmt.query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    };
    assert_eq!(codes, vec!["C", "F", "D", "S"]);
}

#[test]
fn test_duplicate_student_rejected() {
    let pool = DbPool::in_memory().unwrap();
    let s = NewStudent::new("1A", 1, "Alice", Category::Cssa);
    queries::add_student(&pool.conn, &s).unwrap();

    let err = queries::add_student(&pool.conn, &s).unwrap_err();
    assert!(matches!(err, AppError::DuplicateStudent { .. }));
    assert_eq!(queries::total_students(&pool.conn).unwrap(), 1);

    // same name in another class is a different student
    queries::add_student(&pool.conn, &NewStudent::new("1B", 1, "Alice", Category::Cssa)).unwrap();
    assert_eq!(queries::total_students(&pool.conn).unwrap(), 2);
}

#[test]
fn test_event_existence_and_lookup() {
    let pool = DbPool::in_memory().unwrap();
    assert!(!queries::is_event_exists(&pool.conn, "Sports Day").unwrap());
    assert_eq!(queries::find_event_id(&pool.conn, "Sports Day").unwrap(), None);

    let id = queries::add_event_with_return(&pool.conn, "Sports Day").unwrap();
    assert!(queries::is_event_exists(&pool.conn, "Sports Day").unwrap());
    assert_eq!(queries::find_event_id(&pool.conn, "Sports Day").unwrap(), Some(id));

    // exact match only
    assert!(!queries::is_event_exists(&pool.conn, "sports day").unwrap());

    let err = queries::add_event(&pool.conn, "Sports Day").unwrap_err();
    assert!(matches!(err, AppError::DuplicateEvent(ref n) if n == "Sports Day"));
}

#[test]
fn test_find_student_id_miss_is_none() {
    let pool = DbPool::in_memory().unwrap();
    let id = queries::add_student(&pool.conn, &NewStudent::new("1A", 1, "Alice", Category::Cssa)).unwrap();

    let hit = queries::find_student_id(&pool.conn, &StudentKey::new("1A", 1, "Alice")).unwrap();
    assert_eq!(hit, Some(id));

    let miss = queries::find_student_id(&pool.conn, &StudentKey::new("1A", 2, "Alice")).unwrap();
    assert_eq!(miss, None);
}

#[test]
fn test_records_allow_repeated_pairs() {
    let pool = DbPool::in_memory().unwrap();
    let sid = queries::add_student(&pool.conn, &NewStudent::new("1A", 1, "Alice", Category::Cssa)).unwrap();
    let eid = queries::add_event_with_return(&pool.conn, "Sports Day").unwrap();

    let first = queries::add_record(&pool.conn, sid, eid, "1").unwrap();
    let second = queries::add_record(&pool.conn, sid, eid, "1").unwrap();
    assert_ne!(first, second);

    let recs = queries::records_for_event(&pool.conn, eid).unwrap();
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r.status == "1"));

    let rec = queries::get_record(&pool.conn, second).unwrap().unwrap();
    assert_eq!((rec.student_id, rec.event_id), (sid, eid));
    assert_eq!(queries::get_record(&pool.conn, second + 100).unwrap(), None);
}

#[test]
fn test_record_requires_existing_student() {
    let pool = DbPool::in_memory().unwrap();
    let eid = queries::add_event_with_return(&pool.conn, "Sports Day").unwrap();

    let err = queries::add_record(&pool.conn, 999, eid, "1").unwrap_err();
    assert!(err.is_storage());
}

#[test]
fn test_students_by_form_is_prefix_match() {
    let pool = DbPool::in_memory().unwrap();
    for (class, n, name) in [("1A", 1, "Alice"), ("1B", 1, "Bob"), ("2A", 1, "Carol"), ("11A", 1, "Dan")] {
        queries::add_student(&pool.conn, &NewStudent::new(class, n, name, Category::Cssa)).unwrap();
    }

    let form1: Vec<String> = queries::students_by_form(&pool.conn, "1")
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(form1, vec!["Alice", "Bob"]);

    let form11 = queries::students_by_form(&pool.conn, "11").unwrap();
    assert_eq!(form11.len(), 1);
    assert_eq!(form11[0].name, "Dan");

    let form2 = queries::students_by_form(&pool.conn, "2").unwrap();
    assert_eq!(form2.len(), 1);
    assert_eq!(form2[0].form(), "2");

    // LIKE wildcards are taken literally
    assert!(queries::students_by_form(&pool.conn, "%").unwrap().is_empty());
}

#[test]
fn test_delete_student_removes_its_records() {
    let pool = DbPool::in_memory().unwrap();
    let sid = queries::add_student(&pool.conn, &NewStudent::new("1A", 1, "Alice", Category::Cssa)).unwrap();
    let eid = queries::add_event_with_return(&pool.conn, "Sports Day").unwrap();
    queries::add_record(&pool.conn, sid, eid, "1").unwrap();

    assert_eq!(queries::delete_student(&pool.conn, sid).unwrap(), 1);
    assert_eq!(queries::total_students(&pool.conn).unwrap(), 0);
    assert_eq!(queries::total_records(&pool.conn).unwrap(), 0);
    assert_eq!(queries::total_events(&pool.conn).unwrap(), 1);
}

#[test]
fn test_initialization_flags() {
    let t = tracker();
    assert!(is_initialized(t.conn()).unwrap());
    assert!(!has_any_data(t.conn()).unwrap());
}

#[test]
fn test_add_student_rejects_blank_class_or_name() {
    let mut t = tracker();

    let err = t
        .add_student(&NewStudent::new("", 1, "Alice", Category::Cssa))
        .unwrap_err();
    assert!(matches!(err, AppError::EmptyField("class")));

    let err = t
        .add_student(&NewStudent::new("1A", 1, "   ", Category::Cssa))
        .unwrap_err();
    assert!(matches!(err, AppError::EmptyField("name")));
    assert!(!err.is_storage());

    assert_eq!(queries::total_students(t.conn()).unwrap(), 0);
    assert!(t.history().unwrap().is_empty());

    let st = t
        .add_student(&NewStudent::new(" 1A ", 1, " Alice ", Category::Cssa))
        .unwrap();
    assert_eq!((st.class.as_str(), st.name.as_str()), ("1A", "Alice"));
    assert!(
        queries::find_student_id(t.conn(), &StudentKey::new("1A", 1, "Alice"))
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_failed_history_write_rolls_back_the_row() {
    let mut t = tracker();
    t.conn().execute_batch("DROP TABLE history").unwrap();

    let err = t
        .add_student(&NewStudent::new("1A", 1, "Alice", Category::Cssa))
        .unwrap_err();
    assert!(err.is_storage());
    assert_eq!(queries::total_students(t.conn()).unwrap(), 0);

    let err = t.add_event("Sports Day").unwrap_err();
    assert!(err.is_storage());
    assert_eq!(queries::total_events(t.conn()).unwrap(), 0);
}
