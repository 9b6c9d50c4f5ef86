use super::{attach_view, batch_mode, print_view, read_input};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::{BatchMode, import_students};
use crate::core::tracker::Tracker;
use crate::core::views::ViewKind;
use crate::db::queries::total_students;
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::student::NewStudent;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::AddStudent {
            class,
            number,
            name,
            category,
            show,
        } => {
            let category = Category::parse(category)?;
            let mut tracker = Tracker::open(&cfg.database)?;
            let view = attach_view(&mut tracker, cfg, *show, ViewKind::Students)?;

            let st = tracker.add_student(&NewStudent::new(
                class.trim(),
                *number,
                name.trim(),
                category,
            ))?;

            success(format!(
                "Student {} ({}, #{}) added with id {}.",
                st.name, st.class, st.class_number, st.id
            ));
            print_view(&view);
        }

        Commands::ImportStudents { file, atomic, show } => {
            let text = read_input(file)?;
            let mode = batch_mode(cfg, *atomic);

            let mut tracker = Tracker::open(&cfg.database)?;
            let view = attach_view(&mut tracker, cfg, *show, ViewKind::Students)?;
            let before = total_students(tracker.conn())?;

            match import_students(&mut tracker, &text, mode) {
                Ok(report) => {
                    success(format!(
                        "Data has been successfully imported ({} student(s)).",
                        report.imported
                    ));
                    print_view(&view);
                }
                Err(e) => {
                    if mode == BatchMode::Partial && !e.is_storage() {
                        let kept = total_students(tracker.conn())? - before;
                        if kept > 0 {
                            warning(format!(
                                "{} student(s) before the failing line were imported and kept.",
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
