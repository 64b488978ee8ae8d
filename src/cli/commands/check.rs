use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::record;
use crate::errors::AppResult;
use crate::ingest::{DatasetLoader, LoadError};
use crate::models::{Dataset, Field};
use crate::ui::messages::{header, success};
use crate::utils::table::Table;
use std::path::Path;

const PREVIEW_FIELDS: [Field; 6] = [
    Field::FullName,
    Field::Date,
    Field::StartTime,
    Field::EndTime,
    Field::Category,
    Field::Email,
];

/// Load the file with the configured rules; failures go to the activity log.
pub fn load_dataset(path: &Path, cfg: &Config) -> Result<Dataset, LoadError> {
    let loader = DatasetLoader::new(cfg.validation.email_rules());
    loader.load(path).inspect_err(|e| {
        record(
            cfg,
            "load_error",
            &path.display().to_string(),
            &format!("{}: {e}", e.code()),
        );
    })
}

pub fn preview(dataset: &Dataset) -> String {
    let mut headers = vec!["row"];
    headers.extend(PREVIEW_FIELDS.iter().map(|f| f.column()));

    let mut table = Table::new(&headers, 32);
    for r in dataset.iter() {
        let mut cells = vec![r.row.to_string()];
        cells.extend(PREVIEW_FIELDS.iter().map(|f| r.record.get(*f).to_string()));
        table.add_row(cells);
    }
    table.render()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Check { file, show } = cmd {
        let dataset = load_dataset(file, cfg)?;

        success(format!(
            "{}: {} records loaded, all valid",
            file.display(),
            dataset.len()
        ));

        if *show {
            header("Records");
            print!("{}", preview(&dataset));
        }
    }
    Ok(())
}
