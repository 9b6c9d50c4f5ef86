use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::fs;

/// Attendance rows whose student or event no longer exists.
fn dangling_records(pool: &DbPool) -> AppResult<i64> {
    let mut stmt = pool.conn.prepare("PRAGMA foreign_key_check(records);")?;
    let n = stmt.query_map([], |_| Ok(()))?.count();
    Ok(n as i64)
}

fn file_size(path: &str) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        check,
        vacuum,
        info: show_info,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if *show_info {
            stats::print_db_info(&pool, &cfg.database)?;
        }

        if *check {
            info("Running integrity check…");
            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                success("Integrity check passed.");
            } else {
                warning(format!("Integrity check failed: {}", integrity));
            }

            match dangling_records(&pool)? {
                0 => success("Every attendance record points to a stored student and event."),
                n => warning(format!(
                    "{} attendance record(s) point to a missing student or event.",
                    n
                )),
            }
        }

        if *vacuum {
            info("Running VACUUM…");
            let before = file_size(&cfg.database);
            pool.conn.execute_batch("VACUUM;")?;
            let after = file_size(&cfg.database);
            success(format!(
                "Vacuum completed ({:.1} KB → {:.1} KB).",
                before as f64 / 1024.0,
                after as f64 / 1024.0
            ));
        }
    }

    Ok(())
}
