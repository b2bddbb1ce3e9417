use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::sprint::sheets::error::Result;
use crate::sprint::sheets::io::sheet::{CellRef, SheetBackend, SheetWriter, SkipReason, WriteOutcome};
use crate::sprint::sheets::io::taiga::TaigaClient;
use crate::sprint::sheets::model::{ProjectStats, normalize_points};

/// A value that made it into the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrittenCell {
    pub sheet: String,
    pub row_header: String,
    pub col_header: String,
    pub cell: CellRef,
    pub value: String,
}

/// A value that was not written, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCell {
    pub sheet: String,
    pub row_header: String,
    pub col_header: String,
    pub reason: SkipReason,
}

/// Outcome of a synchronisation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub written: Vec<WrittenCell>,
    pub skipped: Vec<SkippedCell>,
    /// Projects without a worksheet of the same name.
    pub skipped_projects: Vec<String>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.skipped_projects.is_empty()
    }

    /// Writes the report as pretty-printed JSON.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!(written = self.written.len(), skipped = self.skipped.len(), "report saved");
        Ok(())
    }

    fn record(&mut self, sheet: &str, row_header: &str, col_header: &str, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written { cell, value } => self.written.push(WrittenCell {
                sheet: sheet.to_string(),
                row_header: row_header.to_string(),
                col_header: col_header.to_string(),
                cell,
                value,
            }),
            WriteOutcome::Skipped(reason) => self.skipped.push(SkippedCell {
                sheet: sheet.to_string(),
                row_header: row_header.to_string(),
                col_header: col_header.to_string(),
                reason,
            }),
        }
    }
}

/// Fetches statistics from the tracker, writes them, and flushes the sheet
/// target.
#[instrument(level = "info", skip_all, fields(output_table = %output_table))]
pub fn run<B: SheetBackend>(
    taiga: &TaigaClient,
    writer: &mut SheetWriter<B>,
    output_table: &str,
) -> Result<SyncReport> {
    let stats = taiga.compute_stats()?;
    let report = sync_projects(&stats, writer, output_table);
    writer.finish()?;
    Ok(report)
}

/// Writes every project's sprint statistics into the worksheet named after
/// the project.
///
/// For each sprint, assignee points land in the (sprint, assignee) cell and
/// the sprint's declared total in the (sprint, `output_table`) cell. Missing
/// worksheets and cells are recorded in the report; the run always continues.
#[instrument(level = "info", skip_all, fields(project_count = stats.len(), output_table = %output_table))]
pub fn sync_projects<B: SheetBackend>(
    stats: &[ProjectStats],
    writer: &mut SheetWriter<B>,
    output_table: &str,
) -> SyncReport {
    let mut report = SyncReport::default();

    for project in stats {
        if !writer.select_sheet(&project.name) {
            report.skipped_projects.push(project.name.clone());
            continue;
        }
        debug!(project = %project.name, sprint_count = project.sprints.len(), "syncing project");

        for sprint in &project.sprints {
            for user in &sprint.users {
                let outcome =
                    writer.write_cell(&sprint.name, &user.name, normalize_points(user.points));
                report.record(&project.name, &sprint.name, &user.name, outcome);
            }

            let outcome = match sprint.total_points {
                Some(total) => {
                    writer.write_cell(&sprint.name, output_table, normalize_points(total))
                }
                None => {
                    warn!(project = %project.name, sprint = %sprint.name, "sprint has no total points");
                    WriteOutcome::Skipped(SkipReason::NoValue)
                }
            };
            report.record(&project.name, &sprint.name, output_table, outcome);
        }
    }

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        skipped_projects = report.skipped_projects.len(),
        "sync finished"
    );
    report
}
