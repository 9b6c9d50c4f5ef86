use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tracker::Tracker;
use crate::errors::{AppError, AppResult};
use crate::models::student::StudentKey;
use crate::ui::messages::{info, success};
use crate::ui::prompt::ask_confirmation;

/// Parse "class,number,name".
pub fn parse_student_key(s: &str) -> AppResult<StudentKey> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [class, number, name] if !class.is_empty() && !name.is_empty() => {
            let n = number
                .parse::<i64>()
                .map_err(|_| AppError::InvalidStudentKey(s.to_string()))?;
            Ok(StudentKey::new(class, n, name))
        }
        _ => Err(AppError::InvalidStudentKey(s.to_string())),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del {
        student,
        event,
        yes,
    } = cmd
    {
        let key = student.as_deref().map(parse_student_key).transpose()?;

        let prompt = match (&key, event) {
            (Some(k), _) => format!(
                "Delete student {} ({}, #{}) and all of their attendance records?",
                k.name, k.class, k.class_number
            ),
            (None, Some(e)) => format!("Delete event '{}' and all of its attendance records?", e),
            (None, None) => return Err(AppError::Other("nothing to delete".into())),
        };

        if !*yes && !ask_confirmation(&format!("{prompt} (`undo` can restore it)")) {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut tracker = Tracker::open(&cfg.database)?;

        if let Some(k) = key {
            let st = tracker.delete_student(&k)?;
            success(format!(
                "Student {} ({}, #{}) has been deleted.",
                st.name, st.class, st.class_number
            ));
        } else if let Some(name) = event {
            let ev = tracker.delete_event(name)?;
            success(format!("Event '{}' has been deleted.", ev.name));
        }
    }

    Ok(())
}
