use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::sprint::sheets::error::{Result, SyncError};

/// 1-based cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1-style address, e.g. `(3, 28)` becomes `AB3`.
    pub fn to_a1(&self) -> String {
        let mut letters = Vec::new();
        let mut col = self.col;
        while col > 0 {
            let rem = (col - 1) % 26;
            letters.push(b'A' + rem as u8);
            col = (col - 1) / 26;
        }
        letters.reverse();
        format!("{}{}", String::from_utf8_lossy(&letters), self.row)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// Cell-level operations a spreadsheet target has to provide.
pub trait SheetBackend {
    /// Makes `name` the worksheet that subsequent calls operate on. Returns
    /// `Ok(false)` when the document has no worksheet of that name.
    fn select_sheet(&mut self, name: &str) -> Result<bool>;

    /// First cell, in row-major order, whose text equals `text`.
    fn find(&mut self, text: &str) -> Result<Option<CellRef>>;

    /// Overwrites the content of `cell` in the selected worksheet.
    fn update_cell(&mut self, cell: CellRef, value: &str) -> Result<()>;

    /// Flushes pending state. Called once after all writes.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Why a single write did not happen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum SkipReason {
    /// A header text was not present in the sheet.
    CellNotFound(String),
    /// The header search itself failed.
    LookupFailed(String),
    /// The backend rejected the write.
    WriteFailed(String),
    /// There was nothing to write.
    NoValue,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::CellNotFound(text) => write!(f, "no cell contains '{text}'"),
            SkipReason::LookupFailed(error) => write!(f, "lookup failed: {error}"),
            SkipReason::WriteFailed(error) => write!(f, "write failed: {error}"),
            SkipReason::NoValue => f.write_str("no value to write"),
        }
    }
}

/// Result of one [`SheetWriter::write_cell`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Written { cell: CellRef, value: String },
    Skipped(SkipReason),
}

/// Locates cells by header text and writes values into them, never failing
/// the caller on a single missed cell.
pub struct SheetWriter<B> {
    backend: B,
    current: Option<String>,
}

impl<B: SheetBackend> SheetWriter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// Name of the worksheet currently selected.
    pub fn current_sheet(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Selects a worksheet by name. Failures are logged and reported as
    /// `false` so callers can skip the project.
    pub fn select_sheet(&mut self, name: &str) -> bool {
        match self.backend.select_sheet(name) {
            Ok(true) => {
                self.current = Some(name.to_string());
                true
            }
            Ok(false) => {
                warn!(error = %SyncError::WorksheetNotFound(name.to_string()), "skipping worksheet");
                self.current = None;
                false
            }
            Err(error) => {
                warn!(worksheet = name, %error, "worksheet selection failed");
                self.current = None;
                false
            }
        }
    }

    /// Row of the first cell matching `row_header` combined with the column
    /// of the first cell matching `col_header`.
    ///
    /// Both searches cover the whole sheet, so a header text repeated in the
    /// body of the sheet can shadow the intended header.
    pub fn locate_cell(&mut self, row_header: &str, col_header: &str) -> Option<CellRef> {
        self.resolve(row_header, col_header).ok()
    }

    /// Writes `value` into the cell at (`row_header`, `col_header`), with the
    /// decimal point rendered as a comma.
    pub fn write_cell(
        &mut self,
        row_header: &str,
        col_header: &str,
        value: impl fmt::Display,
    ) -> WriteOutcome {
        let cell = match self.resolve(row_header, col_header) {
            Ok(cell) => cell,
            Err(reason) => return WriteOutcome::Skipped(reason),
        };

        let value = to_cell_text(&value.to_string());
        match self.backend.update_cell(cell, &value) {
            Ok(()) => {
                debug!(%cell, row_header, col_header, value, "cell updated");
                WriteOutcome::Written { cell, value }
            }
            Err(error) => {
                warn!(%cell, row_header, col_header, %error, "cell update failed");
                WriteOutcome::Skipped(SkipReason::WriteFailed(error.to_string()))
            }
        }
    }

    /// Flushes the backend.
    pub fn finish(&mut self) -> Result<()> {
        self.backend.finish()
    }

    fn resolve(
        &mut self,
        row_header: &str,
        col_header: &str,
    ) -> std::result::Result<CellRef, SkipReason> {
        let row = self.search(row_header)?.row;
        let col = self.search(col_header)?.col;
        Ok(CellRef::new(row, col))
    }

    fn search(&mut self, text: &str) -> std::result::Result<CellRef, SkipReason> {
        match self.backend.find(text) {
            Ok(Some(cell)) => Ok(cell),
            Ok(None) => {
                warn!(error = %SyncError::CellNotFound(text.to_string()), "header lookup missed");
                Err(SkipReason::CellNotFound(text.to_string()))
            }
            Err(error) => {
                warn!(text, %error, "header lookup failed");
                Err(SkipReason::LookupFailed(error.to_string()))
            }
        }
    }
}

/// Renders a value with a comma as decimal separator.
pub fn to_cell_text(value: &str) -> String {
    value.replace('.', ",")
}
