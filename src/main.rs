use std::path::PathBuf;

use clap::Parser;
use sprint_sheets::config::{
    DEFAULT_GSHEETS_CREDS, DEFAULT_TAIGA_CREDS, ServiceAccountKey, TaigaCredentials,
};
use sprint_sheets::io::gsheets::GoogleSheets;
use sprint_sheets::io::sheet::{SheetBackend, SheetWriter};
use sprint_sheets::io::taiga::TaigaClient;
use sprint_sheets::io::workbook::XlsxWorkbook;
use sprint_sheets::retry::RetryPolicy;
use sprint_sheets::sync::{self, SyncReport};
use sprint_sheets::{Result, logging};
use tracing::{info, warn};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose)?;
    let retry = RetryPolicy::default().with_max_attempts(cli.max_attempts);

    let credentials = TaigaCredentials::load(&cli.taiga_creds)?;
    let taiga = TaigaClient::connect(&credentials, retry.clone())?;

    let report = match &cli.workbook {
        Some(path) => execute(&taiga, XlsxWorkbook::open(path)?, &cli.output_table)?,
        None => {
            let key = ServiceAccountKey::load(&cli.gsheets_creds)?;
            let sheets = GoogleSheets::connect(&cli.sheet_name, &key, retry)?;
            execute(&taiga, sheets, &cli.output_table)?
        }
    };

    summarize(&report);
    if let Some(path) = &cli.report {
        report.write_json(path)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn execute<B: SheetBackend>(
    taiga: &TaigaClient,
    backend: B,
    output_table: &str,
) -> Result<SyncReport> {
    let mut writer = SheetWriter::new(backend);
    sync::run(taiga, &mut writer, output_table)
}

fn summarize(report: &SyncReport) {
    for project in &report.skipped_projects {
        warn!(project = %project, "project skipped: no worksheet");
    }
    for skipped in &report.skipped {
        warn!(
            sheet = %skipped.sheet,
            row = %skipped.row_header,
            column = %skipped.col_header,
            reason = %skipped.reason,
            "cell skipped"
        );
    }
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        skipped_projects = report.skipped_projects.len(),
        "synchronisation complete"
    );
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Load completed sprint points from Taiga into a spreadsheet."
)]
struct Cli {
    /// Name of the spreadsheet document.
    #[arg(long)]
    sheet_name: String,

    /// Header text of the column receiving each sprint's total points.
    #[arg(long)]
    output_table: String,

    /// Taiga credentials (JSON with 'host', 'username' and 'password').
    #[arg(long, default_value = DEFAULT_TAIGA_CREDS)]
    taiga_creds: PathBuf,

    /// Google service-account key file.
    #[arg(long, default_value = DEFAULT_GSHEETS_CREDS)]
    gsheets_creds: PathBuf,

    /// Write into a local .xlsx workbook instead of Google Sheets.
    #[arg(long)]
    workbook: Option<PathBuf>,

    /// Save the written and skipped cells as JSON.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Attempts per remote call before giving up on transient failures.
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}
