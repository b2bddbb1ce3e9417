use crate::sprint::sheets::io::sheet::CellRef;

/// Displayed text of a worksheet, stored row-major. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// First cell whose text equals `text`, scanning row by row.
    pub fn find(&self, text: &str) -> Option<CellRef> {
        self.rows.iter().enumerate().find_map(|(row_idx, row)| {
            row.iter()
                .position(|cell| cell == text)
                .map(|col_idx| CellRef::new(row_idx as u32 + 1, col_idx as u32 + 1))
        })
    }

    pub fn get(&self, cell: CellRef) -> Option<&str> {
        let (row, col) = indices(cell)?;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
    }

    /// Sets the text of `cell`, growing the grid as needed.
    pub fn set(&mut self, cell: CellRef, value: &str) {
        let Some((row, col)) = indices(cell) else {
            return;
        };
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.to_string();
    }
}

fn indices(cell: CellRef) -> Option<(usize, usize)> {
    if cell.row == 0 || cell.col == 0 {
        return None;
    }
    Some((cell.row as usize - 1, cell.col as usize - 1))
}
