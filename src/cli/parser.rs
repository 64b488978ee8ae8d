use crate::config::{Config, SmtpProvider};
use crate::models::TemplateVariant;
use crate::template::{DEFAULT_RECORDS, TemplateKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for rAttestati
/// Generate attendance certificates (PDF) from a spreadsheet and email them in blocks
#[derive(Parser)]
#[command(
    name = "rattestati",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate attendance certificates from a spreadsheet and send them by email",
    long_about = None
)]
pub struct Cli {
    /// Use this configuration file instead of ~/.rattestati/rattestati.conf
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration file in use: `--config` or the platform default.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::config_file)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the configuration file and the activity log database
    Init,

    /// Manage the configuration file (view, edit, SMTP provider preset)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,

        #[arg(long = "provider", value_enum, help = "Apply an SMTP provider preset")]
        provider: Option<SmtpProvider>,
    },

    /// Load and validate an input file without generating anything
    Check {
        #[arg(long = "file", short = 'f', help = "Input file (.xlsx, .xls, .ods, .csv)")]
        file: PathBuf,

        #[arg(long = "show", help = "Print a preview of the loaded records")]
        show: bool,
    },

    /// Generate certificates and optionally email them
    Generate {
        #[arg(long = "file", short = 'f', help = "Input file (.xlsx, .xls, .ods, .csv)")]
        file: PathBuf,

        #[arg(long = "from", requires = "to", help = "First record to process (1-based)")]
        from: Option<usize>,

        #[arg(long = "to", requires = "from", help = "Last record to process (inclusive)")]
        to: Option<usize>,

        #[arg(long = "limit", conflicts_with = "from", help = "Process only the first N records")]
        limit: Option<usize>,

        #[arg(long = "send", help = "Send each certificate by email")]
        send: bool,

        #[arg(long = "block-size", help = "Records per block (default from config)")]
        block_size: Option<usize>,

        #[arg(long = "pause", help = "Seconds to wait between blocks (default from config)")]
        pause: Option<u64>,

        #[arg(long = "template", value_enum, help = "Certificate text to use")]
        template: Option<TemplateVariant>,

        #[arg(long = "output-dir", help = "Directory for the generated PDFs")]
        output_dir: Option<PathBuf>,

        #[arg(long = "logo", help = "JPEG logo printed at the top")]
        logo: Option<PathBuf>,

        #[arg(long = "signature", help = "JPEG signature printed at the bottom")]
        signature: Option<PathBuf>,

        #[arg(long = "report", help = "Write the outcomes to FILE (.csv or .json)")]
        report: Option<PathBuf>,
    },

    /// Send test emails through the same block/pause engine
    TestEmail {
        #[arg(long = "to", help = "Recipient address")]
        to: String,

        #[arg(long = "count", default_value_t = 1, help = "Number of messages")]
        count: usize,

        #[arg(long = "block-size", help = "Messages per block (default from config)")]
        block_size: Option<usize>,

        #[arg(long = "pause", help = "Seconds to wait between blocks (default from config)")]
        pause: Option<u64>,
    },

    /// Write a sample input workbook
    Template {
        #[arg(long = "kind", value_enum, default_value = "base")]
        kind: TemplateKind,

        #[arg(long = "records", default_value_t = DEFAULT_RECORDS, help = "Rows for base/full templates")]
        records: usize,

        #[arg(long = "file", short = 'f', help = "Output .xlsx path")]
        file: PathBuf,

        #[arg(long = "force", help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Print the activity log
    Log {
        #[arg(long = "print", help = "Print the most recent entries")]
        print: bool,

        #[arg(long = "errors", help = "Only failures")]
        errors: bool,

        #[arg(long = "limit", default_value_t = 50)]
        limit: usize,
    },
}
