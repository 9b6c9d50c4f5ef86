#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rparticipation::core::import::{BatchMode, import_attendance, import_students};
use rparticipation::core::tracker::Tracker;
use rparticipation::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const STUDENTS: &str = "\
1A, 1, Alice, C
1A, 2, Bob, F
2B, 1, Carol, H
2B, 2, Dave, C
";

pub fn rpa() -> Command {
    cargo_bin_cmd!("rparticipation")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rparticipation.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh in-memory tracker.
pub fn tracker() -> Tracker {
    Tracker::new(DbPool::in_memory().expect("open in-memory db"))
}

/// Four students, three events:
/// - Sports Day: Alice (C), Bob (F)
/// - Music Fest: Alice (C)
/// - Science Fair: nobody
pub fn sample_tracker() -> Tracker {
    let mut t = tracker();
    import_students(&mut t, STUDENTS, BatchMode::Partial).expect("import students");
    import_attendance(
        &mut t,
        "Sports Day",
        "1A, 1, Alice\n1A, 2, Bob\n",
        false,
        BatchMode::Partial,
    )
    .expect("sports day");
    import_attendance(&mut t, "Music Fest", "1A, 1, Alice\n", false, BatchMode::Partial)
        .expect("music fest");
    t.add_event("Science Fair").expect("science fair");
    t
}

/// Initialize DB and add the sample dataset through the CLI
pub fn init_db_with_data(db_path: &str) {
    rpa()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rpa()
        .args(["--db", db_path, "import-students"])
        .write_stdin(STUDENTS)
        .assert()
        .success();

    rpa()
        .args(["--db", db_path, "attend", "Sports Day"])
        .write_stdin("1A, 1, Alice\n1A, 2, Bob\n")
        .assert()
        .success();

    rpa()
        .args(["--db", db_path, "attend", "Music Fest"])
        .write_stdin("1A, 1, Alice\n")
        .assert()
        .success();

    rpa()
        .args(["--db", db_path, "add-event", "Science Fair"])
        .assert()
        .success();
}
