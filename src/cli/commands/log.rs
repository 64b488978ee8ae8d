use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::{LogEntry, recent_entries};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;

/// Restituisce il colore ANSI in base all'operazione
fn color_for(entry: &LogEntry) -> Colour {
    if entry.is_error() {
        return Colour::Red;
    }
    match entry.operation.as_str() {
        "sent" => Colour::Green,
        "generated" => Colour::Cyan,
        "generate" | "test_email" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51), // arancione
        _ => Colour::White,
    }
}

fn format_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%F %T").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn print_log(entries: &[LogEntry]) {
    let op_w = entries
        .iter()
        .map(|e| e.operation.len())
        .max()
        .unwrap_or(10);
    let id_w = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);

    println!("📜 Activity log:\n");

    for e in entries {
        let color = color_for(e);
        let padded = format!("{:<op_w$}", e.operation);
        let target = if e.target.is_empty() {
            String::new()
        } else {
            format!(" ({})", e.target)
        };

        println!(
            "{:>id_w$}: {} | {}{} => {}",
            e.id,
            format_date(&e.date),
            color.paint(padded),
            target,
            e.message,
        );
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log {
        print,
        errors,
        limit,
    } = cmd
        && *print
    {
        let pool = DbPool::open(&cfg.database)?;
        let entries = recent_entries(&pool.conn, *errors, *limit)?;
        if entries.is_empty() {
            info("The activity log is empty");
        } else {
            print_log(&entries);
        }
    }

    Ok(())
}
