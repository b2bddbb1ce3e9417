use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calamine::{CellType, DataType, Range, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, info, instrument};

use crate::sprint::sheets::error::{Result, SyncError};
use crate::sprint::sheets::io::grid::Grid;
use crate::sprint::sheets::io::memory::MemorySheets;
use crate::sprint::sheets::io::sheet::{CellRef, SheetBackend};

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Cell content as found in the file, keyed by 1-based (row, column).
type CellMap = BTreeMap<(u32, u32), StoredCell>;

/// Typed content of one cell, kept so that cells the sync never touches are
/// written back unchanged.
#[derive(Debug, Clone, PartialEq)]
enum StoredCell {
    Text(String),
    Number(f64),
    Boolean(bool),
    DateTime(f64),
    Formula(String),
}

impl StoredCell {
    fn from_data(cell: &DataType) -> Option<Self> {
        Some(match cell {
            DataType::Empty => return None,
            DataType::String(value) => StoredCell::Text(value.clone()),
            DataType::Float(value) => StoredCell::Number(*value),
            DataType::Int(value) => StoredCell::Number(*value as f64),
            DataType::Bool(value) => StoredCell::Boolean(*value),
            DataType::DateTime(value) => StoredCell::DateTime(*value),
            other => StoredCell::Text(other.to_string()),
        })
    }

    /// Values written by the sync are entered the way a user would type
    /// them: comma-decimal numbers become numbers, anything else stays text.
    fn entered(value: &str) -> Self {
        match value.replace(',', ".").parse::<f64>() {
            Ok(number) if number.is_finite() => StoredCell::Number(number),
            _ => StoredCell::Text(value.to_string()),
        }
    }

    fn write(&self, worksheet: &mut Worksheet, row: u32, col: u16, date: &Format) -> Result<()> {
        match self {
            StoredCell::Text(value) => worksheet.write_string(row, col, value)?,
            StoredCell::Number(value) => worksheet.write_number(row, col, *value)?,
            StoredCell::Boolean(value) => worksheet.write_boolean(row, col, *value)?,
            StoredCell::DateTime(serial) => {
                worksheet.write_number_with_format(row, col, *serial, date)?
            }
            StoredCell::Formula(formula) => worksheet.write_formula(row, col, formula.as_str())?,
        };
        Ok(())
    }
}

/// Local `.xlsx` file used as the sync target.
///
/// The workbook is read into memory on open and written back when
/// [`SheetBackend::finish`] is called. Numbers, booleans, dates and formulas
/// survive; cell styling does not.
pub struct XlsxWorkbook {
    path: PathBuf,
    sheets: MemorySheets,
    cells: Vec<(String, CellMap)>,
}

impl XlsxWorkbook {
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SyncError::InvalidWorkbook(format!(
                "{} does not exist",
                path.display()
            )));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let mut sheets = MemorySheets::default();
        let mut cells = Vec::new();
        for name in workbook.sheet_names().to_owned() {
            let range = workbook
                .worksheet_range(&name)
                .ok_or_else(|| SyncError::InvalidWorkbook(format!("missing sheet '{name}'")))??;
            let formulas = workbook.worksheet_formula(&name).transpose()?;

            sheets.insert_grid(&name, range_to_grid(&range));
            cells.push((name, stored_cells(&range, formulas.as_ref())));
        }
        info!(sheet_count = cells.len(), "workbook loaded");

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
            cells,
        })
    }

    pub fn sheets(&self) -> &MemorySheets {
        &self.sheets
    }

    fn save(&self) -> Result<()> {
        let date = Format::new().set_num_format(DATETIME_FORMAT);
        let mut writer = Workbook::new();
        for (name, cells) in &self.cells {
            let worksheet = writer.add_worksheet();
            worksheet.set_name(name)?;
            for (&(row, col), cell) in cells {
                cell.write(worksheet, row - 1, (col - 1) as u16, &date)?;
            }
        }
        writer.save(&self.path)?;
        debug!(path = %self.path.display(), "workbook saved");
        Ok(())
    }
}

impl SheetBackend for XlsxWorkbook {
    fn select_sheet(&mut self, name: &str) -> Result<bool> {
        self.sheets.select_sheet(name)
    }

    fn find(&mut self, text: &str) -> Result<Option<CellRef>> {
        self.sheets.find(text)
    }

    fn update_cell(&mut self, cell: CellRef, value: &str) -> Result<()> {
        self.sheets.update_cell(cell, value)?;
        let sheet = self
            .sheets
            .selected_sheet()
            .ok_or(SyncError::NoWorksheetSelected)?;
        if let Some((_, cells)) = self.cells.iter_mut().find(|(name, _)| name == sheet) {
            cells.insert((cell.row, cell.col), StoredCell::entered(value));
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.save()
    }
}

/// Visits the non-empty cells of a range at their absolute 1-based position.
fn absolute_cells<T: CellType>(range: &Range<T>, mut visit: impl FnMut(CellRef, &T)) {
    let Some((start_row, start_col)) = range.start() else {
        return;
    };
    let empty = T::default();
    for (row, col, cell) in range.cells() {
        if *cell == empty {
            continue;
        }
        visit(
            CellRef::new(start_row + row as u32 + 1, start_col + col as u32 + 1),
            cell,
        );
    }
}

fn range_to_grid(range: &Range<DataType>) -> Grid {
    let mut grid = Grid::default();
    absolute_cells(range, |cell, data| grid.set(cell, &cell_to_string(data)));
    grid
}

/// Formulas take precedence over the cached values calamine reports for the
/// same cells.
fn stored_cells(range: &Range<DataType>, formulas: Option<&Range<String>>) -> CellMap {
    let mut cells = CellMap::new();
    absolute_cells(range, |cell, data| {
        if let Some(stored) = StoredCell::from_data(data) {
            cells.insert((cell.row, cell.col), stored);
        }
    });
    if let Some(formulas) = formulas {
        absolute_cells(formulas, |cell, formula| {
            cells.insert((cell.row, cell.col), StoredCell::Formula(formula.clone()));
        });
    }
    cells
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}
