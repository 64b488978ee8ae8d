#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rattestati::dispatch::{MailTransport, OutgoingMail, Pause, TransportError};
use rattestati::models::{LessonDetails, Record};
use rattestati::render::{CertificateRenderer, RenderError, RenderRequest, certificate_file_name};
use rust_xlsxwriter::Workbook;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const HEADER: [&str; 11] = [
    "nome_cognome",
    "data",
    "ora_inizio",
    "ora_fine",
    "aula",
    "dipartimento",
    "indirizzo",
    "tipo_lezione",
    "tipo_percorso",
    "classe_concorso",
    "email",
];

pub fn rat() -> Command {
    cargo_bin_cmd!("rattestati")
}

/// Command bound to a config file inside `dir`, with HOME pointing there too
/// and no SMTP variables leaking from the environment.
pub fn rat_in(dir: &Path) -> Command {
    let mut cmd = rat();
    cmd.env("HOME", dir)
        .env_remove("SMTP_USERNAME")
        .env_remove("SMTP_PASSWORD")
        .env_remove("SMTP_SERVER")
        .arg("--config")
        .arg(config_path(dir));
    cmd
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("rattestati.conf")
}

/// Minimal config: activity log and certificates inside `dir`.
pub fn write_config(dir: &Path) -> PathBuf {
    let path = config_path(dir);
    let yaml = format!(
        "database: {}\ncertificate:\n  output_dir: {}\n",
        dir.join("log.sqlite").display(),
        dir.join("out").display()
    );
    fs::write(&path, yaml).unwrap();
    path
}

pub fn valid_row(name: &str, email: &str) -> Vec<String> {
    [
        name,
        "15/03/2025",
        "09:00",
        "11:00",
        "A1",
        "Scienze della Formazione",
        "Via del Castro Pretorio 20",
        "Didattica generale",
        "PeF60 CFU",
        "A-01",
        email,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn write_csv(path: &Path, header: &[&str], rows: &[Vec<String>]) {
    let mut out = header.join(",");
    out.push('\n');
    for r in rows {
        let cells: Vec<String> = r
            .iter()
            .map(|c| {
                if c.contains(',') || c.contains('"') {
                    format!("\"{}\"", c.replace('"', "\"\""))
                } else {
                    c.clone()
                }
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

pub fn write_xlsx(path: &Path, header: &[&str], rows: &[Vec<String>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in header.iter().enumerate() {
        sheet.write(0, c as u16, *h).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            if !v.is_empty() {
                sheet.write((r + 1) as u32, c as u16, v.as_str()).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

pub fn record(name: &str, email: &str) -> Record {
    Record {
        full_name: name.to_string(),
        date: "15/03/2025".to_string(),
        start_time: "09:00".to_string(),
        end_time: "11:00".to_string(),
        lesson_type: "Didattica generale".to_string(),
        category: "PeF60 CFU".to_string(),
        email: email.to_string(),
        details: LessonDetails::default(),
    }
}

/// Renderer that only computes the file name; fails for names in `fail_for`.
#[derive(Default)]
pub struct FakeRenderer {
    pub fail_for: Vec<String>,
    pub rendered: RefCell<Vec<String>>,
}

impl CertificateRenderer for FakeRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<PathBuf, RenderError> {
        let name = request.record.full_name.clone();
        if self.fail_for.contains(&name) {
            return Err(RenderError::Write {
                path: request.output_dir.to_path_buf(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.rendered.borrow_mut().push(name);
        Ok(request.output_dir.join(certificate_file_name(request.record)))
    }
}

pub struct FakeTransport {
    pub configured: bool,
    pub fail_for: Vec<String>,
    pub sent: RefCell<Vec<(String, String, String)>>,
}

impl FakeTransport {
    pub fn configured() -> Self {
        Self {
            configured: true,
            fail_for: Vec::new(),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::configured()
        }
    }
}

impl MailTransport for FakeTransport {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn send(&self, mail: &OutgoingMail<'_>) -> Result<(), TransportError> {
        if self.fail_for.iter().any(|a| a == mail.to) {
            return Err(TransportError::Protocol("550 mailbox unavailable".into()));
        }
        self.sent.borrow_mut().push((
            mail.to.to_string(),
            mail.subject.to_string(),
            mail.body.to_string(),
        ));
        Ok(())
    }
}

/// Records pauses instead of sleeping.
#[derive(Default)]
pub struct CountingPause {
    pub pauses: Vec<Duration>,
}

impl Pause for CountingPause {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}
