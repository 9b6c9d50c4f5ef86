use crate::errors::AppResult;
use crate::models::table::TableData;
use csv::Writer;
use std::path::Path;

/// Write the table as UTF-8 CSV: one header row, then the data rows.
pub fn write_csv(path: &Path, table: &TableData) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(&table.headers)?;

    for row in &table.rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}
