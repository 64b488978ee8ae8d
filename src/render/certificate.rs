//! Attendance certificate layout and texts.

use crate::config::{Config, InstitutionConfig};
use crate::dispatch::placeholders::fill;
use crate::models::{Record, TemplateVariant, TrainingPath};
use crate::render::pdf::{JpegImage, PdfCanvas};
use crate::render::{
    CertificateAssets, CertificateRenderer, RenderError, RenderRequest, certificate_file_name,
};
use chrono::{Datelike, Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

pub const IN_PERSON_TEXT: &str = "ATTESTATO DI PRESENZA
Attività didattiche Percorso di formazione DPCM 4 agosto 2023 – A.A. {anno_accademico}

Si attesta che il/la sig./sig.ra {nome_cognome} in data {data}, dalle ore {ora_inizio} alle ore {ora_fine} ha partecipato alla lezione di {tipo_lezione} svoltasi presso l'aula {aula} del dipartimento di {dipartimento}, in via {indirizzo}, nell'ambito del percorso di formazione {tipo_percorso} – {classe_concorso} organizzato dall'{universita}.

Si rilascia su richiesta dell'interessato/a per tutti gli usi consentiti dalla legge.

{citta}, lì {data_rilascio}

VISTO
Prof./Prof.ssa {direttore_cafis}
";

pub const REMOTE_TEXT: &str = "ATTESTATO DI PRESENZA
Attività didattiche Percorso di formazione DPCM 4 agosto 2023 – A.A. {anno_accademico}

Si attesta che il/la sig./sig.ra {nome_cognome} in data {data}, dalle ore {ora_inizio} alle ore {ora_fine} ha partecipato alla lezione di {tipo_lezione} svoltasi in modalità telematica sincrona nell'ambito del percorso di formazione {tipo_percorso} – {classe_concorso} organizzato dall'{universita}.

Si rilascia su richiesta dell'interessato/a per tutti gli usi consentiti dalla legge.

{citta}, lì {data_rilascio}

VISTO
Prof./Prof.ssa {direttore_cafis}
";

const MARGIN: f32 = 56.7; // 2 cm
const CM: f32 = 28.35;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const LEADING: f32 = 15.0;

/// "2024/2025" for a release date between September 2024 and August 2025.
pub fn academic_year(date: NaiveDate) -> String {
    let start = if date.month() >= 9 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}/{}", start, start + 1)
}

/// Long training-path label when the category is recognised, raw text otherwise.
pub fn training_path_text(category: &str) -> String {
    TrainingPath::parse(category)
        .map(|p| p.full_label().to_string())
        .unwrap_or_else(|| category.trim().to_string())
}

pub struct PdfCertificateRenderer {
    institution: InstitutionConfig,
    custom_text: String,
    release_date: NaiveDate,
}

impl PdfCertificateRenderer {
    pub fn new(institution: InstitutionConfig, custom_text: String) -> Self {
        Self {
            institution,
            custom_text,
            release_date: Local::now().date_naive(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.institution.clone(),
            cfg.certificate.custom_text.clone(),
        )
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = date;
        self
    }

    fn template(&self, variant: TemplateVariant) -> &str {
        match variant {
            TemplateVariant::InPerson => IN_PERSON_TEXT,
            TemplateVariant::Remote => REMOTE_TEXT,
            TemplateVariant::Custom if self.custom_text.trim().is_empty() => IN_PERSON_TEXT,
            TemplateVariant::Custom => &self.custom_text,
        }
    }

    /// Template text with every placeholder of the record filled in.
    pub fn certificate_text(&self, record: &Record, variant: TemplateVariant) -> String {
        let release = self.release_date.format("%d/%m/%Y").to_string();
        let year = academic_year(self.release_date);
        let path = training_path_text(&record.category);
        let d = &record.details;

        let values = [
            ("nome_cognome", record.full_name.trim()),
            ("data", record.date.as_str()),
            ("ora_inizio", record.start_time.as_str()),
            ("ora_fine", record.end_time.as_str()),
            ("tipo_lezione", record.lesson_type.trim()),
            ("aula", d.room.as_str()),
            ("dipartimento", d.department.as_str()),
            ("indirizzo", d.address.as_str()),
            ("tipo_percorso", path.as_str()),
            ("classe_concorso", d.competition_class.as_str()),
            ("universita", self.institution.university.as_str()),
            ("data_rilascio", release.as_str()),
            ("anno_accademico", year.as_str()),
            ("direttore_cafis", self.institution.director.as_str()),
            ("citta", self.institution.city.as_str()),
        ];
        fill(self.template(variant), &values)
    }

    fn load_image(path: Option<&PathBuf>) -> Option<JpegImage> {
        let path = path.filter(|p| p.exists())?;
        match JpegImage::open(path) {
            Ok(Some(img)) => Some(img),
            Ok(None) => {
                log::warn!("{}: not a JPEG image, skipped", path.display());
                None
            }
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                None
            }
        }
    }

    /// Lay out the text on one A4 page.
    ///
    /// The first non-empty line is the title, the second the subtitle; the
    /// rest is body text where blank lines separate paragraphs.
    pub fn layout(&self, text: &str, assets: &CertificateAssets) -> PdfCanvas {
        let mut canvas = PdfCanvas::new();
        let mut y = canvas.page_h - MARGIN;

        if let Some(logo) = Self::load_image(assets.logo.as_ref()) {
            let (w, h) = fit(&logo, 1.5 * CM, 7.0 * CM);
            let name = canvas.add_image(&logo);
            y -= h;
            canvas.draw_image(&name, (canvas.page_w - w) / 2.0, y, w, h);
            y -= 0.5 * CM;
        }

        let mut lines = text.lines().map(str::trim).skip_while(|l| l.is_empty());

        if let Some(title) = lines.next() {
            y -= TITLE_SIZE;
            canvas.draw_centered(y, TITLE_SIZE, true, title);
            y -= 0.4 * CM;
        }
        if let Some(subtitle) = lines.next().filter(|l| !l.is_empty()) {
            y -= BODY_SIZE;
            canvas.draw_centered(y, BODY_SIZE, false, subtitle);
        }
        y -= 0.5 * CM;

        let usable = canvas.page_w - 2.0 * MARGIN;
        let columns = (usable / (BODY_SIZE * 0.5)) as usize;

        for line in lines {
            if line.is_empty() {
                y -= 0.4 * CM;
                continue;
            }
            for wrapped in textwrap::wrap(line, columns) {
                y -= LEADING;
                canvas.draw_text(MARGIN, y, BODY_SIZE, false, &wrapped);
            }
        }

        if let Some(signature) = Self::load_image(assets.signature.as_ref()) {
            let (w, h) = fit(&signature, 1.2 * CM, 5.0 * CM);
            let name = canvas.add_image(&signature);
            y -= h + 0.2 * CM;
            canvas.draw_image(&name, MARGIN, y.max(MARGIN), w, h);
        }

        canvas
    }
}

/// Scale to `height`, then shrink to `max_width` keeping the ratio.
fn fit(image: &JpegImage, height: f32, max_width: f32) -> (f32, f32) {
    let ratio = image.aspect_ratio();
    let mut w = height * ratio;
    let mut h = height;
    if w > max_width {
        w = max_width;
        h = w / ratio;
    }
    (w, h)
}

impl CertificateRenderer for PdfCertificateRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<PathBuf, RenderError> {
        create_dir(request.output_dir)?;

        let text = self.certificate_text(request.record, request.variant);
        let canvas = self.layout(&text, request.assets);

        let path = request
            .output_dir
            .join(certificate_file_name(request.record));
        canvas.save(&path).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;

        log::debug!("Certificate written to {}", path.display());
        Ok(path)
    }
}

fn create_dir(dir: &Path) -> Result<(), RenderError> {
    fs::create_dir_all(dir).map_err(|source| RenderError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}
