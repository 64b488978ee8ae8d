//! Certificate rendering.

pub mod certificate;
pub mod pdf;

pub use certificate::PdfCertificateRenderer;

use crate::models::{Record, TemplateVariant};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Optional images placed on every certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateAssets {
    pub logo: Option<PathBuf>,
    pub signature: Option<PathBuf>,
}

pub struct RenderRequest<'a> {
    pub record: &'a Record,
    pub variant: TemplateVariant,
    pub assets: &'a CertificateAssets,
    pub output_dir: &'a Path,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot create output directory {path}: {source}")]
    OutputDir { path: PathBuf, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Produces one certificate file per record and returns its path.
pub trait CertificateRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<PathBuf, RenderError>;
}

/// `attestato_<name>_<date>.pdf`, with spaces as `_`, `/` in the date as
/// `-` and no path separators left.
pub fn certificate_file_name(record: &Record) -> String {
    let name = record.full_name.trim().replace(' ', "_");
    let date = record.date.trim().replace('/', "-");
    let raw = format!("attestato_{name}_{date}.pdf");
    raw.chars().filter(|c| !matches!(c, '/' | '\\')).collect()
}
