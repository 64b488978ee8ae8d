use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::write_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (never overwritten)
///  - the SQLite activity log
pub fn handle(cli: &Cli) -> AppResult<()> {
    //
    // 1️⃣ CONFIGURAZIONE
    //
    let path = cli.config_path();

    let cfg = if path.exists() {
        info(format!("Config file already present: {}", path.display()));
        Config::load_from(&path)?
    } else {
        let mut cfg = Config::default();
        // with a custom config file the database lives next to it
        if cli.config.is_some() {
            cfg.database = path
                .with_file_name("rattestati.sqlite")
                .to_string_lossy()
                .to_string();
        }
        cfg.save_to(&path)?;
        success(format!("Config file created: {}", path.display()));
        cfg
    };

    //
    // 2️⃣ DATABASE
    //
    let pool = DbPool::open(&cfg.database)?;
    success(format!("Activity log ready: {}", cfg.database));

    //
    // 3️⃣ LOG INTERNO (non bloccante)
    //
    if let Err(e) = write_log(
        &pool.conn,
        "init",
        &path.display().to_string(),
        "Configuration and activity log initialized",
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    if !cfg.smtp.has_credentials() {
        info("Set smtp.username and smtp.password (or SMTP_USERNAME / SMTP_PASSWORD) before sending");
    }
    Ok(())
}
