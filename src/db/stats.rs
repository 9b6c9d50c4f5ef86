use crate::db::pool::DbPool;
use crate::db::queries::{total_events, total_records, total_students};
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW};
use std::fs;

/// Counters shown by `db --info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbStats {
    pub students: i64,
    pub events: i64,
    pub records: i64,
}

pub fn collect(pool: &DbPool) -> AppResult<DbStats> {
    Ok(DbStats {
        students: total_students(&pool.conn)?,
        events: total_events(&pool.conn)?,
        records: total_records(&pool.conn)?,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) TOTALS
    //
    let stats = collect(pool)?;
    println!("{}• Students:{} {}{}{}", CYAN, RESET, GREEN, stats.students, RESET);
    println!("{}• Events:{} {}{}{}", CYAN, RESET, GREEN, stats.events, RESET);
    println!("{}• Records:{} {}{}{}", CYAN, RESET, GREEN, stats.records, RESET);

    //
    // 3) AVERAGE PARTICIPATION
    //
    if stats.events > 0 {
        let avg = stats.records as f64 / stats.events as f64;
        println!("{}• Average participants/event:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
