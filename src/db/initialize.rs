use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Every statement is idempotent, so this runs on each open.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            class         TEXT NOT NULL,
            class_number  INTEGER NOT NULL,
            name          TEXT NOT NULL,
            category      TEXT NOT NULL CHECK(category IN ('C','F','H','D','S')),
            UNIQUE(class, class_number, name)
        );

        CREATE TABLE IF NOT EXISTS events (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS records (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id  INTEGER NOT NULL REFERENCES students(id),
            event_id    INTEGER NOT NULL REFERENCES events(id),
            status      TEXT NOT NULL DEFAULT '1'
        );

        CREATE INDEX IF NOT EXISTS idx_records_student ON records(student_id);
        CREATE INDEX IF NOT EXISTS idx_records_event ON records(event_id);

        CREATE TABLE IF NOT EXISTS history (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            date     TEXT NOT NULL,
            action   TEXT NOT NULL,
            payload  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// True when at least one table exists.
pub fn is_initialized(conn: &Connection) -> AppResult<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
        [],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

/// True when at least one student is stored.
pub fn has_any_data(conn: &Connection) -> AppResult<bool> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
    Ok(n > 0)
}
