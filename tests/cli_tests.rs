mod common;
use common::{init_db_with_data, rpa, setup_test_db, temp_out};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    rpa()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(fs::metadata(&db_path).is_ok());
}

#[test]
fn test_list_students_with_labels_and_codes() {
    let db_path = setup_test_db("cli_list_students");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "list", "students"])
        .assert()
        .success()
        .stdout(contains("Alice").and(contains("綜援")).and(contains("Dave")));

    rpa()
        .args(["--db", &db_path, "list", "students", "--category", "F", "--codes"])
        .assert()
        .success()
        .stdout(contains("Bob").and(contains("Alice").not()));
}

#[test]
fn test_list_event_counts_by_category() {
    let db_path = setup_test_db("cli_event_counts");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "list", "event-names", "--category", "c"])
        .assert()
        .success()
        .stdout(
            contains("Sports Day")
                .and(contains("Science Fair"))
                .and(contains("Bob").not()),
        );

    rpa()
        .args(["--db", &db_path, "list", "student-counts"])
        .assert()
        .success()
        .stdout(
            contains("events_count")
                .and(contains("Alice"))
                .and(contains("Carol").not()),
        );
}

#[test]
fn test_list_rejects_unknown_category() {
    let db_path = setup_test_db("cli_bad_category");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "list", "students", "--category", "X"])
        .assert()
        .failure()
        .stderr(contains("Invalid category 'X'"));
}

#[test]
fn test_list_form_view() {
    let db_path = setup_test_db("cli_form");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "list", "form", "--form", "2"])
        .assert()
        .success()
        .stdout(contains("Carol").and(contains("Alice").not()));

    rpa()
        .args(["--db", &db_path, "list", "form"])
        .assert()
        .failure()
        .stderr(contains("--form"));
}

#[test]
fn test_add_student_and_duplicate() {
    let db_path = setup_test_db("cli_add_student");
    rpa()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rpa()
        .args(["--db", &db_path, "add-student", "3C", "5", "Erin", "S", "--show"])
        .assert()
        .success()
        .stdout(contains("Student Erin (3C, #5) added").and(contains("特殊")));

    rpa()
        .args(["--db", &db_path, "add-student", "3C", "5", "Erin", "D"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn test_add_student_blank_fields_rejected() {
    let db_path = setup_test_db("cli_add_student_blank");
    rpa()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rpa()
        .args(["--db", &db_path, "add-student", " ", "1", "Erin", "C"])
        .assert()
        .failure()
        .stderr(contains("The class must not be empty"));

    rpa()
        .args(["--db", &db_path, "add-student", "3C", "1", "  ", "C"])
        .assert()
        .failure()
        .stderr(contains("The name must not be empty"));

    rpa()
        .args(["--db", &db_path, "list", "students"])
        .assert()
        .success()
        .stdout(contains("No rows"));
}

#[test]
fn test_del_event_with_padded_name() {
    let db_path = setup_test_db("cli_del_event_padded");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "del", "--event", " Science Fair ", "--yes"])
        .assert()
        .success()
        .stdout(contains("Event 'Science Fair' has been deleted."));
}

#[test]
fn test_import_students_partial_failure_reports_kept_rows() {
    let db_path = setup_test_db("cli_import_partial");
    rpa()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rpa()
        .args(["--db", &db_path, "import-students"])
        .write_stdin("1A, 1, Alice, C\n1A, two, Bob, F\n")
        .assert()
        .failure()
        .stdout(contains("1 student(s) before the failing line"))
        .stderr(contains("Line 2: invalid class number 'two'"));

    rpa()
        .args(["--db", &db_path, "import-students", "--atomic"])
        .write_stdin("2B, 1, Carol, H\n2B, 2, Dave\n")
        .assert()
        .failure()
        .stderr(contains("Line 2"));

    rpa()
        .args(["--db", &db_path, "list", "students"])
        .assert()
        .success()
        .stdout(contains("Alice").and(contains("Carol").not()));
}

#[test]
fn test_attend_existing_event_from_stdin_requires_yes() {
    let db_path = setup_test_db("cli_attend_yes");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "attend", "Sports Day"])
        .write_stdin("2B, 1, Carol\n")
        .assert()
        .failure()
        .stderr(contains("already exists"));

    rpa()
        .args(["--db", &db_path, "attend", "Sports Day", "--yes", "--show"])
        .write_stdin("2B, 1, Carol\n")
        .assert()
        .success()
        .stdout(contains("1 student(s) have been successfully added"));
}

#[test]
fn test_attend_existing_event_from_file_prompts() {
    let db_path = setup_test_db("cli_attend_prompt");
    init_db_with_data(&db_path);
    let list = temp_out("cli_attend_prompt", "txt");
    fs::write(&list, "2B, 2, Dave\n").unwrap();

    rpa()
        .args(["--db", &db_path, "attend", "Music Fest", "--file", &list])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    rpa()
        .args(["--db", &db_path, "attend", "Music Fest", "--file", &list])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("added to the event 'Music Fest'"));

    rpa()
        .args(["--db", &db_path, "list", "event-names"])
        .assert()
        .success()
        .stdout(contains("Alice, Dave"));
}

#[test]
fn test_attend_unknown_student() {
    let db_path = setup_test_db("cli_attend_unknown");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "attend", "Open Day"])
        .write_stdin("1A, 1, Alice\n9Z, 1, Nobody\n")
        .assert()
        .failure()
        .stdout(contains("1 attendance record(s) before the failing line"))
        .stderr(contains("Nobody (9Z, #1) not found"));
}

#[test]
fn test_attend_without_lines() {
    let db_path = setup_test_db("cli_attend_empty");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "attend", "Open Day"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(contains("No student data provided"));
}

#[test]
fn test_del_and_undo() {
    let db_path = setup_test_db("cli_del_undo");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "del", "--student", "1A,1,Alice"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    rpa()
        .args(["--db", &db_path, "del", "--student", "1A, 1, Alice", "--yes"])
        .assert()
        .success()
        .stdout(contains("Student Alice (1A, #1) has been deleted."));

    rpa()
        .args(["--db", &db_path, "list", "event-names"])
        .assert()
        .success()
        .stdout(contains("Alice").not());

    rpa()
        .args(["--db", &db_path, "undo"])
        .assert()
        .success()
        .stdout(contains("Undone student_deleted"));

    rpa()
        .args(["--db", &db_path, "list", "event-names"])
        .assert()
        .success()
        .stdout(contains("Alice, Bob"));
}

#[test]
fn test_del_bad_student_key() {
    let db_path = setup_test_db("cli_del_bad_key");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "del", "--student", "1A-1-Alice", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Invalid student key"));
}

#[test]
fn test_history_and_clear() {
    let db_path = setup_test_db("cli_history");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "history"])
        .assert()
        .success()
        .stdout(contains("event_added").and(contains("record_added")));

    rpa()
        .args(["--db", &db_path, "history", "--clear"])
        .assert()
        .success();

    rpa()
        .args(["--db", &db_path, "undo"])
        .assert()
        .failure()
        .stderr(contains("Nothing to undo"));
}

#[test]
fn test_log_print() {
    let db_path = setup_test_db("cli_log");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(
            contains("Internal log")
                .and(contains("Database initialized"))
                .and(contains("Sports Day")),
        );
}

#[test]
fn test_db_check_and_info() {
    let db_path = setup_test_db("cli_db");
    init_db_with_data(&db_path);

    rpa()
        .args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));

    rpa()
        .args(["--db", &db_path, "db", "--info"])
        .assert()
        .success();
}
