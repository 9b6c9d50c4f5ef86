use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::history::HistoryLog;
use crate::core::tracker::Tracker;
use crate::errors::AppResult;
use crate::models::table::TableData;
use crate::ui::messages::{info, success};
use crate::utils::table::render;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Undo => {
            let mut tracker = Tracker::open(&cfg.database)?;
            let entry = tracker.undo()?;
            success(format!(
                "Undone {}: {}",
                entry.change.action(),
                entry.change.describe()
            ));
        }

        Commands::History { clear } => {
            let tracker = Tracker::open(&cfg.database)?;

            if *clear {
                let n = HistoryLog::clear(tracker.conn())?;
                success(format!("History cleared ({} entr(ies) removed).", n));
                return Ok(());
            }

            let entries = tracker.history()?;
            if entries.is_empty() {
                info("History is empty.");
                return Ok(());
            }

            let mut table = TableData::new("History", &["id", "date", "action", "details"]);
            for e in entries {
                table.push(vec![
                    e.id.to_string(),
                    e.date,
                    e.change.action().to_string(),
                    e.change.describe(),
                ]);
            }
            print!("{}", render(&table));
        }

        _ => {}
    }

    Ok(())
}
