//! Record store: parameterized statements over students, events and records.
//! Every call runs in auto-commit mode unless the caller holds a transaction.

use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::event::Event;
use crate::models::record::AttendanceRecord;
use crate::models::student::{NewStudent, Student, StudentKey};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_student(row: &Row) -> Result<Student> {
    let cat_str: String = row.get("category")?;
    let category = Category::from_db_str(&cat_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidCategory(cat_str.clone())),
        )
    })?;

    Ok(Student {
        id: row.get("id")?,
        class: row.get("class")?,
        class_number: row.get("class_number")?,
        name: row.get("name")?,
        category,
    })
}

fn map_event(row: &Row) -> Result<Event> {
    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn map_record(row: &Row) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        event_id: row.get("event_id")?,
        status: row.get("status")?,
    })
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

/// Insert a student and return its id. The identity tuple must be new.
pub fn add_student(conn: &Connection, st: &NewStudent) -> AppResult<i64> {
    if find_student_id(conn, &st.key())?.is_some() {
        return Err(AppError::DuplicateStudent {
            class: st.class.clone(),
            class_number: st.class_number,
            name: st.name.clone(),
        });
    }

    conn.execute(
        "INSERT INTO students (class, class_number, name, category) VALUES (?1, ?2, ?3, ?4)",
        params![st.class, st.class_number, st.name, st.category.to_db_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Re-insert a student with its original id.
pub fn insert_student_with_id(conn: &Connection, st: &Student) -> AppResult<()> {
    conn.execute(
        "INSERT INTO students (id, class, class_number, name, category) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            st.id,
            st.class,
            st.class_number,
            st.name,
            st.category.to_db_str()
        ],
    )?;
    Ok(())
}

pub fn find_student_id(conn: &Connection, key: &StudentKey) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM students WHERE class = ?1 AND class_number = ?2 AND name = ?3",
            params![key.class, key.class_number, key.name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn get_student(conn: &Connection, id: i64) -> AppResult<Option<Student>> {
    let st = conn
        .query_row("SELECT * FROM students WHERE id = ?1", [id], map_student)
        .optional()?;
    Ok(st)
}

pub fn get_all_students(conn: &Connection) -> AppResult<Vec<Student>> {
    let mut stmt = conn.prepare("SELECT * FROM students ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_student)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Students of a form. A numeric form matches the leading digits of the
/// class exactly ("1" → 1A, 1B but not 11A); anything else is a plain prefix.
pub fn students_by_form(conn: &Connection, form: &str) -> AppResult<Vec<Student>> {
    let numeric = !form.is_empty() && form.chars().all(|c| c.is_ascii_digit());
    let pattern = format!("{}%", escape_like(form));
    let mut stmt = conn.prepare(
        r"SELECT * FROM students
          WHERE class LIKE ?1 ESCAPE '\'
          ORDER BY class ASC, class_number ASC, id ASC",
    )?;
    let rows = stmt.query_map([pattern], map_student)?;

    let mut out = Vec::new();
    for r in rows {
        let st = r?;
        if !numeric || st.form() == form {
            out.push(st);
        }
    }
    Ok(out)
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Delete a student together with its attendance records.
pub fn delete_student(conn: &Connection, id: i64) -> AppResult<usize> {
    conn.execute("DELETE FROM records WHERE student_id = ?1", [id])?;
    let n = conn.execute("DELETE FROM students WHERE id = ?1", [id])?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

pub fn add_event(conn: &Connection, name: &str) -> AppResult<()> {
    add_event_with_return(conn, name)?;
    Ok(())
}

/// Insert an event and return the new id so records can be attached at once.
pub fn add_event_with_return(conn: &Connection, name: &str) -> AppResult<i64> {
    if is_event_exists(conn, name)? {
        return Err(AppError::DuplicateEvent(name.to_string()));
    }
    conn.execute("INSERT INTO events (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_event_with_id(conn: &Connection, ev: &Event) -> AppResult<()> {
    conn.execute(
        "INSERT INTO events (id, name) VALUES (?1, ?2)",
        params![ev.id, ev.name],
    )?;
    Ok(())
}

pub fn is_event_exists(conn: &Connection, name: &str) -> AppResult<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM events WHERE name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

pub fn find_event_id(conn: &Connection, name: &str) -> AppResult<Option<i64>> {
    let id = conn
        .query_row("SELECT id FROM events WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(id)
}

pub fn get_event(conn: &Connection, id: i64) -> AppResult<Option<Event>> {
    let ev = conn
        .query_row("SELECT id, name FROM events WHERE id = ?1", [id], map_event)
        .optional()?;
    Ok(ev)
}

pub fn get_all_events(conn: &Connection) -> AppResult<Vec<Event>> {
    let mut stmt = conn.prepare("SELECT id, name FROM events ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_event)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete an event together with its attendance records.
pub fn delete_event(conn: &Connection, id: i64) -> AppResult<usize> {
    conn.execute("DELETE FROM records WHERE event_id = ?1", [id])?;
    let n = conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Attach a student to an event. The same pair may be recorded more than once.
pub fn add_record(conn: &Connection, student_id: i64, event_id: i64, status: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO records (student_id, event_id, status) VALUES (?1, ?2, ?3)",
        params![student_id, event_id, status],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_record_with_id(conn: &Connection, rec: &AttendanceRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO records (id, student_id, event_id, status) VALUES (?1, ?2, ?3, ?4)",
        params![rec.id, rec.student_id, rec.event_id, rec.status],
    )?;
    Ok(())
}

pub fn get_record(conn: &Connection, id: i64) -> AppResult<Option<AttendanceRecord>> {
    let rec = conn
        .query_row(
            "SELECT id, student_id, event_id, status FROM records WHERE id = ?1",
            [id],
            map_record,
        )
        .optional()?;
    Ok(rec)
}

pub fn records_for_student(conn: &Connection, student_id: i64) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, event_id, status FROM records WHERE student_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([student_id], map_record)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn records_for_event(conn: &Connection, event_id: i64) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, event_id, status FROM records WHERE event_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([event_id], map_record)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_record(conn: &Connection, id: i64) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM records WHERE id = ?1", [id])?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

fn count(conn: &Connection, table: &str) -> AppResult<i64> {
    let n = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(n)
}

pub fn total_students(conn: &Connection) -> AppResult<i64> {
    count(conn, "students")
}

pub fn total_events(conn: &Connection) -> AppResult<i64> {
    count(conn, "events")
}

pub fn total_records(conn: &Connection) -> AppResult<i64> {
    count(conn, "records")
}
