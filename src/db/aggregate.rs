//! Read-only aggregations over students, events and records.
//!
//! The category filter always applies to the *student's* category and is
//! bound as `?1`; `CategoryFilter::All` binds `NULL`, which turns the
//! predicate `(?1 IS NULL OR s.category = ?1)` into a no-op.
//!
//! Event-centric views use outer joins (every event is listed, even with no
//! matching participant). Student-centric views use inner joins, so students
//! without matching records are left out.

use crate::errors::AppResult;
use crate::models::category::CategoryFilter;
use crate::models::summary::{EventCount, EventParticipants, StudentEventCount, StudentEventList};
use rusqlite::{Connection, OptionalExtension, params};

/// Event → participant count.
pub fn event_participant_counts(
    conn: &Connection,
    filter: CategoryFilter,
) -> AppResult<Vec<EventCount>> {
    let mut stmt = conn.prepare_cached(
        "SELECT e.id, e.name, COUNT(s.id)
         FROM events e
         LEFT JOIN records r ON r.event_id = e.id
         LEFT JOIN students s ON s.id = r.student_id
                             AND (?1 IS NULL OR s.category = ?1)
         GROUP BY e.id, e.name
         ORDER BY e.id ASC",
    )?;

    let rows = stmt.query_map(params![filter.as_param()], |row| {
        Ok(EventCount {
            event_id: row.get(0)?,
            event: row.get(1)?,
            count: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Event → participant names, in attendance order.
pub fn event_participant_names(
    conn: &Connection,
    filter: CategoryFilter,
) -> AppResult<Vec<EventParticipants>> {
    let mut stmt = conn.prepare_cached(
        "SELECT e.id, e.name,
                COALESCE(GROUP_CONCAT(s.name, ', ' ORDER BY r.id), '')
         FROM events e
         LEFT JOIN records r ON r.event_id = e.id
         LEFT JOIN students s ON s.id = r.student_id
                             AND (?1 IS NULL OR s.category = ?1)
         GROUP BY e.id, e.name
         ORDER BY e.id ASC",
    )?;

    let rows = stmt.query_map(params![filter.as_param()], |row| {
        Ok(EventParticipants {
            event_id: row.get(0)?,
            event: row.get(1)?,
            names: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Student → number of events attended.
pub fn student_event_counts(
    conn: &Connection,
    filter: CategoryFilter,
) -> AppResult<Vec<StudentEventCount>> {
    let mut stmt = conn.prepare_cached(
        "SELECT s.id, s.class, s.class_number, s.name, COUNT(r.id)
         FROM records r
         JOIN students s ON s.id = r.student_id
         WHERE (?1 IS NULL OR s.category = ?1)
         GROUP BY s.id, s.class, s.class_number, s.name
         ORDER BY s.id ASC",
    )?;

    let rows = stmt.query_map(params![filter.as_param()], |row| {
        Ok(StudentEventCount {
            student_id: row.get(0)?,
            class: row.get(1)?,
            class_number: row.get(2)?,
            name: row.get(3)?,
            count: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Student → names of the events attended, in attendance order.
pub fn student_event_lists(
    conn: &Connection,
    filter: CategoryFilter,
) -> AppResult<Vec<StudentEventList>> {
    let mut stmt = conn.prepare_cached(
        "SELECT s.id, s.class, s.class_number, s.name,
                GROUP_CONCAT(e.name, ', ' ORDER BY r.id)
         FROM records r
         JOIN students s ON s.id = r.student_id
         JOIN events e ON e.id = r.event_id
         WHERE (?1 IS NULL OR s.category = ?1)
         GROUP BY s.id, s.class, s.class_number, s.name
         ORDER BY s.id ASC",
    )?;

    let rows = stmt.query_map(params![filter.as_param()], |row| {
        Ok(StudentEventList {
            student_id: row.get(0)?,
            class: row.get(1)?,
            class_number: row.get(2)?,
            name: row.get(3)?,
            events: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Number of participants of a single event.
pub fn participant_count(conn: &Connection, event_id: i64, filter: CategoryFilter) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*)
         FROM records r
         JOIN students s ON s.id = r.student_id
         WHERE r.event_id = ?2 AND (?1 IS NULL OR s.category = ?1)",
        params![filter.as_param(), event_id],
        |row| row.get(0),
    )?;
    Ok(n)
}

/// Event count of one student. `None` when the student does not exist; a
/// student outside the filter reports zero events.
pub fn student_event_count(
    conn: &Connection,
    student_id: i64,
    filter: CategoryFilter,
) -> AppResult<Option<StudentEventCount>> {
    let row = conn
        .query_row(
            "SELECT s.id, s.class, s.class_number, s.name,
                    (SELECT COUNT(*) FROM records r WHERE r.student_id = s.id)
             FROM students s
             WHERE s.id = ?2 AND (?1 IS NULL OR s.category = ?1)",
            params![filter.as_param(), student_id],
            |row| {
                Ok(StudentEventCount {
                    student_id: row.get(0)?,
                    class: row.get(1)?,
                    class_number: row.get(2)?,
                    name: row.get(3)?,
                    count: row.get(4)?,
                })
            },
        )
        .optional()?;

    if row.is_some() {
        return Ok(row);
    }

    // Outside the filter: still report the student, with no events.
    let bare = conn
        .query_row(
            "SELECT id, class, class_number, name FROM students WHERE id = ?1",
            [student_id],
            |row| {
                Ok(StudentEventCount {
                    student_id: row.get(0)?,
                    class: row.get(1)?,
                    class_number: row.get(2)?,
                    name: row.get(3)?,
                    count: 0,
                })
            },
        )
        .optional()?;
    Ok(bare)
}

/// Event names one student attended, in attendance order.
pub fn student_event_names(
    conn: &Connection,
    student_id: i64,
    filter: CategoryFilter,
) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT e.name
         FROM records r
         JOIN events e ON e.id = r.event_id
         JOIN students s ON s.id = r.student_id
         WHERE r.student_id = ?2 AND (?1 IS NULL OR s.category = ?1)
         ORDER BY r.id ASC",
    )?;

    let rows = stmt.query_map(params![filter.as_param(), student_id], |row| {
        row.get::<_, String>(0)
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
