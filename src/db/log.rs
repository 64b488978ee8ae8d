use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};

/// Operations that mark a failure in the activity log.
pub const ERROR_OPERATIONS: [&str; 4] = ["load_error", "row_invalid", "render_failed", "send_failed"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn is_error(&self) -> bool {
        ERROR_OPERATIONS.contains(&self.operation.as_str())
    }
}

/// Write one line into the `log` table.
pub fn write_log(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    // Timestamp locale, formattato in ISO 8601
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Best-effort logging: failures are reported with `log::warn!` and never
/// interrupt the command.
pub fn record(cfg: &Config, operation: &str, target: &str, message: &str) {
    let result = DbPool::open(&cfg.database)
        .and_then(|pool| write_log(&pool.conn, operation, target, message));
    if let Err(e) = result {
        log::warn!("Failed to write activity log: {e}");
    }
}

/// Most recent entries first, optionally only failures.
pub fn recent_entries(conn: &Connection, only_errors: bool, limit: usize) -> AppResult<Vec<LogEntry>> {
    let filter = if only_errors {
        let list = ERROR_OPERATIONS
            .iter()
            .map(|op| format!("'{op}'"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("WHERE operation IN ({list})")
    } else {
        String::new()
    };

    let sql = format!(
        "SELECT id, date, operation, target, message FROM log {filter} ORDER BY id DESC LIMIT ?1"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(params![limit as i64], |row| {
        Ok(LogEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            message: row.get(4)?,
        })
    })?;

    let mut entries = Vec::new();
    for r in rows {
        entries.push(r?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_filter_and_order() {
        let pool = DbPool::in_memory().unwrap();
        write_log(&pool.conn, "generate", "a.xlsx", "3 certificates").unwrap();
        write_log(&pool.conn, "send_failed", "row 4", "Error for X").unwrap();
        write_log(&pool.conn, "sent", "row 5", "ok").unwrap();

        let all = recent_entries(&pool.conn, false, 10).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].operation, "sent");

        let errors = recent_entries(&pool.conn, true, 10).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_error());

        assert_eq!(recent_entries(&pool.conn, false, 2).unwrap().len(), 2);
    }
}
