pub mod config;
pub mod db;
pub mod del;
pub mod event;
pub mod export;
pub mod history;
pub mod init;
pub mod list;
pub mod log;
pub mod student;

use crate::config::Config;
use crate::core::import::BatchMode;
use crate::core::views::{TableView, ViewKind, ViewSpec};
use crate::core::tracker::Tracker;
use crate::errors::AppResult;
use crate::models::category::CategoryFilter;
use crate::models::table::TableData;
use crate::ui::messages::{header, info};
use crate::utils::path::expand_tilde;
use crate::utils::table::render_colored;
use std::fs;
use std::io::{self, Read};
use std::rc::Rc;

/// Batch lines from `--file` or, when absent, from stdin.
pub(crate) fn read_input(file: &Option<String>) -> AppResult<String> {
    match file {
        Some(f) => Ok(fs::read_to_string(expand_tilde(f))?),
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            Ok(s)
        }
    }
}

pub(crate) fn batch_mode(cfg: &Config, atomic: bool) -> BatchMode {
    if atomic { BatchMode::Atomic } else { cfg.batch_mode }
}

pub(crate) fn view_spec(
    cfg: &Config,
    view: ViewKind,
    category: &str,
    form: &Option<String>,
    codes: bool,
) -> AppResult<ViewSpec> {
    let mut spec = ViewSpec::new(view)
        .with_filter(CategoryFilter::parse(category)?)
        .with_labels(cfg.show_category_labels && !codes);
    if let Some(f) = form {
        spec = spec.with_form(f.trim());
    }
    Ok(spec)
}

pub(crate) fn print_table(table: &TableData) {
    header(&table.title);
    if table.is_empty() {
        info("No rows.");
        return;
    }
    print!("{}", render_colored(table));
}

/// Subscribe a refreshing view when `--show` was passed.
pub(crate) fn attach_view(
    tracker: &mut Tracker,
    cfg: &Config,
    show: bool,
    kind: ViewKind,
) -> AppResult<Option<Rc<TableView>>> {
    if !show {
        return Ok(None);
    }
    let spec = ViewSpec::new(kind).with_labels(cfg.show_category_labels);
    let view = Rc::new(TableView::open(tracker.pool(), spec)?);
    tracker.subscribe(view.clone());
    Ok(Some(view))
}

/// Print the view if any change reached it.
pub(crate) fn print_view(view: &Option<Rc<TableView>>) {
    if let Some(v) = view
        && v.refreshes() > 0
    {
        print_table(&v.snapshot());
    }
}
