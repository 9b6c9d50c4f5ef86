use super::{attach_view, batch_mode, print_view, read_input};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::{BatchMode, import_attendance};
use crate::core::tracker::Tracker;
use crate::core::views::ViewKind;
use crate::db::queries::total_records;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::ui::prompt::ask_confirmation;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::AddEvent { name, show } => {
            let mut tracker = Tracker::open(&cfg.database)?;
            let view = attach_view(&mut tracker, cfg, *show, ViewKind::Events)?;

            let ev = tracker.add_event(name)?;
            success(format!("Event '{}' has been successfully added.", ev.name));
            print_view(&view);
        }

        Commands::Attend {
            event,
            file,
            yes,
            atomic,
            show,
        } => {
            let text = read_input(file)?;
            let mode = batch_mode(cfg, *atomic);

            let mut tracker = Tracker::open(&cfg.database)?;
            let view = attach_view(&mut tracker, cfg, *show, ViewKind::EventCounts)?;
            let before = total_records(tracker.conn())?;

            let result = match import_attendance(&mut tracker, event, &text, *yes, mode) {
                // stdin already carried the lines; only a --file import can still ask
                Err(AppError::EventExists(name)) if file.is_some() => {
                    let prompt = format!(
                        "The event '{}' already exists. Do you want to add students to it?",
                        name
                    );
                    if !ask_confirmation(&prompt) {
                        info("Operation cancelled.");
                        return Ok(());
                    }
                    import_attendance(&mut tracker, event, &text, true, mode)
                }
                other => other,
            };

            match result {
                Ok(report) => {
                    if report.event_created {
                        success(format!("Event '{}' has been successfully added.", event.trim()));
                    }
                    success(format!(
                        "{} student(s) have been successfully added to the event '{}'.",
                        report.imported,
                        event.trim()
                    ));
                    print_view(&view);
                }
                Err(e) => {
                    if mode == BatchMode::Partial && !e.is_storage() {
                        let kept = total_records(tracker.conn())? - before;
                        if kept > 0 {
                            warning(format!(
                                "{} attendance record(s) before the failing line were added and kept.",
                                kept
                            ));
                        }
                    }
                    return Err(e);
                }
            }
        }

        _ => {}
    }

    Ok(())
}
