use super::{print_table, view_spec};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::views::load_view;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        view,
        category,
        form,
        codes,
    } = cmd
    {
        let spec = view_spec(cfg, *view, category, form, *codes)?;
        let pool = DbPool::new(&cfg.database)?;
        let table = load_view(&pool.conn, &spec)?;
        print_table(&table);
    }
    Ok(())
}
