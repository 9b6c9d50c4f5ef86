//! Persistence of the undo history (`history` table).

use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub id: i64,
    pub date: String,
    pub action: String,
    pub payload: String,
}

fn map_row(row: &Row) -> rusqlite::Result<HistoryRow> {
    Ok(HistoryRow {
        id: row.get(0)?,
        date: row.get(1)?,
        action: row.get(2)?,
        payload: row.get(3)?,
    })
}

pub fn push(conn: &Connection, action: &str, payload: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO history (date, action, payload) VALUES (?1, ?2, ?3)",
        params![Local::now().to_rfc3339(), action, payload],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn last(conn: &Connection) -> AppResult<Option<HistoryRow>> {
    let row = conn
        .query_row(
            "SELECT id, date, action, payload FROM history ORDER BY id DESC LIMIT 1",
            [],
            map_row,
        )
        .optional()?;
    Ok(row)
}

/// All entries, newest first.
pub fn list(conn: &Connection) -> AppResult<Vec<HistoryRow>> {
    let mut stmt =
        conn.prepare("SELECT id, date, action, payload FROM history ORDER BY id DESC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn remove(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM history WHERE id = ?1", [id])?;
    Ok(())
}

pub fn clear(conn: &Connection) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM history", [])?;
    Ok(n)
}
