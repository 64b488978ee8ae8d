use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::record;
use crate::errors::AppResult;
use crate::template::write_template;
use crate::utils::fs::ensure_writable;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Template {
        kind,
        records,
        file,
        force,
    } = cmd
    {
        ensure_writable(file, *force)?;
        let rows = write_template(file, *kind, *records, Local::now().date_naive())?;
        record(
            cfg,
            "template",
            &file.display().to_string(),
            &format!("{kind:?} template with {rows} rows"),
        );
    }
    Ok(())
}
