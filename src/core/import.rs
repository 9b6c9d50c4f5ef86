//! Bulk input: student lists and event attendance lists, one line per row.
//!
//! Lines are processed in order; blank lines are skipped. The first bad line
//! aborts the rest of the batch.

use crate::core::tracker::Tracker;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::student::{NewStudent, StudentKey};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a batch is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    /// Each line commits on its own; lines before a failure stay stored.
    #[default]
    Partial,
    /// All or nothing.
    Atomic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows written.
    pub imported: usize,
    /// Target event of an attendance import.
    pub event_id: Option<i64>,
    /// Whether the attendance import created its event.
    pub event_created: bool,
}

fn split_fields(line_no: usize, line: &str, expected: usize) -> AppResult<Vec<String>> {
    let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
    if fields.len() != expected || fields.iter().any(|f| f.is_empty()) {
        return Err(AppError::MalformedLine {
            line: line_no,
            content: line.trim().to_string(),
            expected,
        });
    }
    Ok(fields)
}

fn parse_class_number(line_no: usize, value: &str) -> AppResult<i64> {
    value.parse::<i64>().map_err(|_| AppError::InvalidClassNumber {
        line: line_no,
        value: value.to_string(),
    })
}

/// `class, class_number, name, category`
pub fn parse_student_line(line_no: usize, line: &str) -> AppResult<NewStudent> {
    let f = split_fields(line_no, line, 4)?;
    let class_number = parse_class_number(line_no, &f[1])?;
    let category = Category::parse(&f[3])?;
    Ok(NewStudent::new(&f[0], class_number, &f[2], category))
}

/// `class, class_number, name`
pub fn parse_attendance_line(line_no: usize, line: &str) -> AppResult<StudentKey> {
    let f = split_fields(line_no, line, 3)?;
    let class_number = parse_class_number(line_no, &f[1])?;
    Ok(StudentKey::new(&f[0], class_number, &f[2]))
}

/// Numbered, non-blank lines.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty())
}

pub fn import_students(tracker: &mut Tracker, text: &str, mode: BatchMode) -> AppResult<ImportReport> {
    tracker.in_batch(mode, |t| {
        let mut report = ImportReport::default();
        for (line_no, line) in content_lines(text) {
            let student = parse_student_line(line_no, line)?;
            t.add_student(&student)?;
            report.imported += 1;
        }
        Ok(report)
    })
}

/// Attach every listed student to `event_name`.
///
/// The event is created when missing. An existing event is only reused when
/// `allow_existing` is set; otherwise the import stops with
/// [`AppError::EventExists`] so the caller can ask for confirmation.
pub fn import_attendance(
    tracker: &mut Tracker,
    event_name: &str,
    text: &str,
    allow_existing: bool,
    mode: BatchMode,
) -> AppResult<ImportReport> {
    let event_name = event_name.trim();
    if event_name.is_empty() {
        return Err(AppError::EmptyEventName);
    }
    if content_lines(text).next().is_none() {
        return Err(AppError::NoStudentData);
    }

    tracker.in_batch(mode, |t| {
        let mut report = ImportReport::default();

        let event_id = if queries::is_event_exists(t.conn(), event_name)? {
            if !allow_existing {
                return Err(AppError::EventExists(event_name.to_string()));
            }
            queries::find_event_id(t.conn(), event_name)?
                .ok_or_else(|| AppError::EventNotFound(event_name.to_string()))?
        } else {
            report.event_created = true;
            t.add_event(event_name)?.id
        };
        report.event_id = Some(event_id);

        for (line_no, line) in content_lines(text) {
            let key = parse_attendance_line(line_no, line)?;
            let student_id =
                queries::find_student_id(t.conn(), &key)?.ok_or_else(|| AppError::StudentNotFound {
                    class: key.class.clone(),
                    class_number: key.class_number,
                    name: key.name.clone(),
                })?;
            t.add_record(student_id, event_id)?;
            report.imported += 1;
        }

        Ok(report)
    })
}
