use crate::core::views::{ViewSpec, load_view};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::fs_utils::ensure_writable;
use crate::export::{ExportFormat, notify_export_success, write_csv, write_json};
use crate::models::table::TableData;
use crate::utils::path::expand_tilde;
use std::path::PathBuf;

pub struct ExportLogic;

impl ExportLogic {
    /// Dump the current content of a view to `file`.
    pub fn export(
        pool: &DbPool,
        spec: &ViewSpec,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<PathBuf> {
        let table = load_view(&pool.conn, spec)?;
        Self::write_table(&table, format, file, force)
    }

    /// Write an already materialized table.
    pub fn write_table(
        table: &TableData,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<PathBuf> {
        let path = expand_tilde(file);
        ensure_writable(&path, force)?;

        match format {
            ExportFormat::Csv => write_csv(&path, table)?,
            ExportFormat::Json => write_json(&path, table)?,
        }

        notify_export_success(&format.as_str().to_uppercase(), &path, table.len());
        Ok(path)
    }
}
