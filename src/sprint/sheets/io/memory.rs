use crate::sprint::sheets::error::{Result, SyncError};
use crate::sprint::sheets::io::grid::Grid;
use crate::sprint::sheets::io::sheet::{CellRef, SheetBackend};

/// A recorded cell update.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub sheet: String,
    pub cell: CellRef,
    pub value: String,
}

/// Spreadsheet document held in memory. Backs the local workbook target and
/// doubles as a recording backend.
#[derive(Debug, Clone, Default)]
pub struct MemorySheets {
    sheets: Vec<(String, Grid)>,
    selected: Option<usize>,
    writes: Vec<CellWrite>,
}

impl MemorySheets {
    /// Adds (or replaces) a worksheet with the given cell texts.
    pub fn add_sheet<S: Into<String>>(&mut self, name: &str, rows: Vec<Vec<S>>) {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.insert_grid(name, Grid::from_rows(rows));
    }

    pub fn insert_grid(&mut self, name: &str, grid: Grid) {
        match self.sheets.iter_mut().find(|(sheet, _)| sheet == name) {
            Some((_, existing)) => *existing = grid,
            None => self.sheets.push((name.to_string(), grid)),
        }
    }

    /// Worksheets in document order.
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Grid)> {
        self.sheets.iter().map(|(name, grid)| (name.as_str(), grid))
    }

    pub fn value(&self, sheet: &str, cell: CellRef) -> Option<&str> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .and_then(|(_, grid)| grid.get(cell))
    }

    /// Name of the worksheet operations currently apply to.
    pub fn selected_sheet(&self) -> Option<&str> {
        self.selected.map(|index| self.sheets[index].0.as_str())
    }

    /// Every update applied so far, in order.
    pub fn writes(&self) -> &[CellWrite] {
        &self.writes
    }

    fn selected_mut(&mut self) -> Result<&mut (String, Grid)> {
        let index = self.selected.ok_or(SyncError::NoWorksheetSelected)?;
        Ok(&mut self.sheets[index])
    }
}

impl SheetBackend for MemorySheets {
    fn select_sheet(&mut self, name: &str) -> Result<bool> {
        self.selected = self.sheets.iter().position(|(sheet, _)| sheet == name);
        Ok(self.selected.is_some())
    }

    fn find(&mut self, text: &str) -> Result<Option<CellRef>> {
        let (_, grid) = self.selected_mut()?;
        Ok(grid.find(text))
    }

    fn update_cell(&mut self, cell: CellRef, value: &str) -> Result<()> {
        let (name, grid) = self.selected_mut()?;
        grid.set(cell, value);
        let sheet = name.clone();
        self.writes.push(CellWrite {
            sheet,
            cell,
            value: value.to_string(),
        });
        Ok(())
    }
}
