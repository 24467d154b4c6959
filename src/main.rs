use std::error::Error;
use std::path::PathBuf;

use cenykatalog::{CatalogConfig, CatalogError, CatalogMode, PipelineBuilder, RunOutcome};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Converts the apartment price spreadsheet into a dated CSV and refreshes the
/// dane.gov.pl harvester XML catalog with its MD5 digest.
#[derive(Parser, Debug)]
#[command(name = "cenykatalog", version)]
struct Args {
    /// Working directory holding the spreadsheet, the `csv/` tree and the catalog files.
    #[arg(long, default_value = ".", env = "CENYKATALOG_ROOT")]
    root: PathBuf,

    /// Path to the input spreadsheet. Defaults to `<root>/<input_file>` from the configuration.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Path to a JSON configuration file overriding the built-in defaults. Example:
    ///
    /// ```json
    /// { "developer_name": "Acme", "url_base": "https://example.org/" }
    /// ```
    #[arg(long, env = "CENYKATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// How the catalog is produced.
    #[arg(long, value_enum, default_value_t = Mode::Rebuild)]
    mode: Mode,

    /// Processing date (YYYY-MM-DD). Defaults to today's local date.
    #[arg(long)]
    date: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Regenerate the catalog from every CSV of the current year.
    Rebuild,
    /// Append only missing dates to the existing catalog.
    Merge,
}

impl From<Mode> for CatalogMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Rebuild => CatalogMode::Rebuild,
            Mode::Merge => CatalogMode::Merge,
        }
    }
}

fn register_logger() {
    let log_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(log_filter).init();
}

fn run(args: Args) -> Result<RunOutcome, CatalogError> {
    let config = match &args.config {
        Some(path) => CatalogConfig::from_json_file(path)?,
        None => CatalogConfig::default(),
    };

    let mut builder = PipelineBuilder::new()
        .with_config(config)
        .with_root(args.root)
        .with_mode(args.mode.into());
    if let Some(input) = args.input {
        builder = builder.with_input(input);
    }
    if let Some(date) = args.date {
        builder = builder.with_date(date.parse()?);
    }

    builder.build()?.run()
}

fn main() {
    register_logger();
    let args = Args::parse();

    match run(args) {
        Ok(RunOutcome::Completed(summary)) => {
            info!(
                xml = %summary.catalog.xml_path.display(),
                md5 = %summary.catalog.digest,
                "Done"
            );
        }
        // Already reported by the pipeline
        Ok(RunOutcome::InputMissing(_)) => {}
        Err(e) => error!(error = %describe(&e), "Catalog run failed"),
    }
}

/// Error message followed by the causes not already part of it
fn describe(e: &dyn Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
