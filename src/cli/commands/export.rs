use super::view_spec;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        view,
        format,
        file,
        category,
        form,
        codes,
        force,
    } = cmd
    {
        let spec = view_spec(cfg, *view, category, form, *codes)?;
        let pool = DbPool::new(&cfg.database)?;
        ExportLogic::export(&pool, &spec, *format, file, *force)?;
    }
    Ok(())
}
