use crate::cli::commands::generate::{install_cancel_handler, print_event, summarize};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::dispatch::{
    DispatchSettings, Dispatcher, MailTemplate, MailTransport, SmtpMailer, ThreadSleep,
};
use crate::errors::AppResult;
use crate::ingest::dates::DISPLAY_FORMAT;
use crate::models::record::display_row;
use crate::models::{DatasetRow, LessonDetails, Record, TemplateVariant, TrainingPath};
use crate::render::{CertificateAssets, PdfCertificateRenderer};
use crate::ui::messages::{info, success};
use chrono::Local;
use std::time::Duration;

/// `count` sample records addressed to `to`.
pub fn sample_rows(to: &str, count: usize) -> Vec<DatasetRow> {
    let today = Local::now().date_naive().format(DISPLAY_FORMAT).to_string();
    (0..count)
        .map(|i| DatasetRow {
            row: display_row(i),
            record: Record {
                full_name: format!("Utente Test {}", i + 1),
                date: today.clone(),
                start_time: "09:00".to_string(),
                end_time: "11:00".to_string(),
                lesson_type: "Email di prova".to_string(),
                category: TrainingPath::PeF60.label().to_string(),
                email: to.trim().to_string(),
                details: LessonDetails::default(),
            },
        })
        .collect()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::TestEmail {
        to,
        count,
        block_size,
        pause,
    } = cmd
    {
        let transport = SmtpMailer::new(cfg.smtp.clone(), cfg.dispatch.retry_policy());

        if transport.is_configured() {
            info(format!(
                "Connecting to {}:{}...",
                cfg.smtp.server, cfg.smtp.port
            ));
            transport.check_connection()?;
            success("SMTP connection and authentication OK");
        }

        let rows = sample_rows(to, *count);
        let settings = DispatchSettings {
            block_size: block_size.unwrap_or(cfg.dispatch.block_size),
            pause: pause
                .map(Duration::from_secs)
                .unwrap_or_else(|| cfg.dispatch.pause()),
            send_email: true,
            variant: TemplateVariant::InPerson,
            output_dir: std::env::temp_dir().join("attestati_test"),
            assets: CertificateAssets {
                logo: cfg.certificate.logo_path(),
                signature: cfg.certificate.signature_path(),
            },
        };

        let renderer = PdfCertificateRenderer::from_config(cfg);
        let email_rules = cfg.validation.email_rules();
        let mut sleeper = ThreadSleep;

        let report = Dispatcher::new(
            &renderer,
            &transport,
            &mut sleeper,
            &email_rules,
            MailTemplate::from_config(cfg),
            settings,
        )
        .with_cancel_flag(install_cancel_handler())
        .with_observer(print_event)
        .run(&rows)?;

        summarize(&report, cfg, "test_email", to);
    }
    Ok(())
}
