use crate::cli::commands::check::load_dataset;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::write_log;
use crate::db::pool::DbPool;
use crate::dispatch::{
    DispatchEvent, DispatchSettings, Dispatcher, MailTemplate, RowSelection, SmtpMailer,
    ThreadSleep,
};
use crate::errors::AppResult;
use crate::models::DispatchReport;
use crate::render::{CertificateAssets, PdfCertificateRenderer};
use crate::report::write_report;
use crate::ui::messages::{detail, error, header, info, pause, progress, success, warning};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Set by Ctrl-C; the running dispatch stops before its next record.
pub fn install_cancel_handler() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    if let Err(e) = ctrlc::set_handler(move || {
        println!("\nStopping after the current record...");
        handler_flag.store(true, Ordering::SeqCst);
    }) {
        log::warn!("Could not set Ctrl-C handler: {e}");
    }
    flag
}

/// Console output for dispatcher events.
pub fn print_event(event: &DispatchEvent<'_>) {
    match event {
        DispatchEvent::BlockStarted {
            block,
            first,
            last,
            total,
        } => progress(format!("Block {block}: records {first}-{last} of {total}")),
        DispatchEvent::Outcome(o) if o.is_success() => success(&o.message),
        DispatchEvent::Outcome(o) => error(&o.message),
        DispatchEvent::Pausing(d) => pause(format!("Pause of {}s before the next block", d.as_secs())),
    }
}

/// Summary lines and activity log entries for a finished run.
pub fn summarize(report: &DispatchReport, cfg: &Config, operation: &str, target: &str) {
    header("Summary");
    success(format!("{} completed successfully", report.success_count));
    if report.error_count > 0 {
        warning(format!("{} with errors:", report.error_count));
        for msg in report.error_messages() {
            detail(msg);
        }
    }
    if report.cancelled {
        warning(format!(
            "Run interrupted: {} records processed",
            report.total()
        ));
    }

    let result = DbPool::open(&cfg.database).and_then(|pool| {
        for o in &report.outcomes {
            write_log(
                &pool.conn,
                o.status.as_str(),
                &format!("row {}", o.row),
                &o.message,
            )?;
        }
        write_log(
            &pool.conn,
            operation,
            target,
            &format!(
                "{} ok, {} errors{}",
                report.success_count,
                report.error_count,
                if report.cancelled { ", cancelled" } else { "" }
            ),
        )
    });
    if let Err(e) = result {
        log::warn!("Failed to write activity log: {e}");
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Generate {
        file,
        from,
        to,
        limit,
        send,
        block_size,
        pause: pause_secs,
        template,
        output_dir,
        logo,
        signature,
        report,
    } = cmd
    {
        // 1️⃣ load + validate
        let dataset = load_dataset(file, cfg)?;
        info(format!("{} records loaded from {}", dataset.len(), file.display()));

        // 2️⃣ selection
        let selection = match (from, to, limit) {
            (Some(f), Some(t), _) => RowSelection::Range { from: *f, to: *t },
            (_, _, Some(n)) => RowSelection::First(*n),
            _ => RowSelection::All,
        };
        let rows = selection.apply(&dataset)?;

        // 3️⃣ settings: CLI first, then config
        let settings = DispatchSettings {
            block_size: block_size.unwrap_or(cfg.dispatch.block_size),
            pause: pause_secs
                .map(Duration::from_secs)
                .unwrap_or_else(|| cfg.dispatch.pause()),
            send_email: *send,
            variant: template.unwrap_or(cfg.certificate.template),
            output_dir: output_dir
                .clone()
                .unwrap_or_else(|| cfg.certificate.output_path()),
            assets: CertificateAssets {
                logo: logo.clone().or_else(|| cfg.certificate.logo_path()),
                signature: signature.clone().or_else(|| cfg.certificate.signature_path()),
            },
        };

        let renderer = PdfCertificateRenderer::from_config(cfg);
        let transport = SmtpMailer::new(cfg.smtp.clone(), cfg.dispatch.retry_policy());
        let email_rules = cfg.validation.email_rules();
        let mut sleeper = ThreadSleep;
        let output = settings.output_dir.clone();

        info(format!(
            "Processing {} records ({} template, email {})",
            rows.len(),
            settings.variant,
            if *send { "on" } else { "off" }
        ));

        // 4️⃣ run
        let mut dispatcher = Dispatcher::new(
            &renderer,
            &transport,
            &mut sleeper,
            &email_rules,
            MailTemplate::from_config(cfg),
            settings,
        )
        .with_cancel_flag(install_cancel_handler())
        .with_observer(print_event);

        let result = dispatcher.run(rows)?;

        // 5️⃣ summary, log, report
        summarize(&result, cfg, "generate", &file.display().to_string());
        let generated = result
            .outcomes
            .iter()
            .filter(|o| o.artifact.is_some())
            .count();
        if generated > 0 {
            info(format!("PDF files in {}", output.display()));
        }

        if let Some(path) = report {
            write_report(path, &result)?;
        }
    }
    Ok(())
}
