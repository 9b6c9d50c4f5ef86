use crate::errors::AppResult;
use crate::models::table::TableData;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the table as a JSON array of `header → value` objects.
pub fn write_json(path: &Path, table: &TableData) -> AppResult<()> {
    let items: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            for (h, v) in table.headers.iter().zip(row) {
                obj.insert(h.clone(), Value::String(v.clone()));
            }
            Value::Object(obj)
        })
        .collect();

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, &items)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
