use sprint_sheets::SyncError;
use sprint_sheets::io::grid::Grid;
use sprint_sheets::io::memory::{CellWrite, MemorySheets};
use sprint_sheets::io::sheet::{CellRef, SheetBackend, SheetWriter, SkipReason, WriteOutcome};

fn writer() -> SheetWriter<MemorySheets> {
    let mut sheets = MemorySheets::default();
    sheets.add_sheet(
        "Alpha",
        vec![
            vec!["", "Alice", "Bob", "Done"],
            vec!["Sprint 1", "", "", ""],
            vec!["Sprint 2", "", "", ""],
        ],
    );
    SheetWriter::new(sheets)
}

fn grid() -> Grid {
    Grid::from_rows(vec![
        vec!["".into(), "Alice".into()],
        vec!["Sprint 1".into()],
    ])
}

#[test]
fn a1_addresses() {
    assert_eq!(CellRef::new(1, 1).to_a1(), "A1");
    assert_eq!(CellRef::new(3, 26).to_a1(), "Z3");
    assert_eq!(CellRef::new(3, 28).to_a1(), "AB3");
    assert_eq!(CellRef::new(10, 703).to_a1(), "AAA10");
}

#[test]
fn locates_cell_from_independent_searches() {
    let mut writer = writer();
    assert!(writer.select_sheet("Alpha"));
    assert_eq!(
        writer.locate_cell("Sprint 2", "Bob"),
        Some(CellRef::new(3, 3))
    );
    assert_eq!(writer.locate_cell("Sprint 3", "Bob"), None);
    assert_eq!(writer.locate_cell("Sprint 1", "Carol"), None);
}

#[test]
fn write_replaces_decimal_point() {
    let mut writer = writer();
    writer.select_sheet("Alpha");

    let outcome = writer.write_cell("Sprint 1", "Bob", 2.5);
    assert_eq!(
        outcome,
        WriteOutcome::Written {
            cell: CellRef::new(2, 3),
            value: "2,5".into()
        }
    );
    assert_eq!(
        writer.backend().value("Alpha", CellRef::new(2, 3)),
        Some("2,5")
    );
}

#[test]
fn missing_header_skips_write() {
    let mut writer = writer();
    writer.select_sheet("Alpha");

    let outcome = writer.write_cell("Sprint 1", "Carol", "4");
    assert_eq!(
        outcome,
        WriteOutcome::Skipped(SkipReason::CellNotFound("Carol".into()))
    );
    assert!(writer.backend().writes().is_empty());
}

#[test]
fn unknown_worksheet_is_not_selected() {
    let mut writer = writer();
    assert!(!writer.select_sheet("Beta"));
    assert_eq!(writer.current_sheet(), None);
}

#[test]
fn duplicated_header_text_resolves_to_first_occurrence() {
    let mut sheets = MemorySheets::default();
    sheets.add_sheet(
        "Alpha",
        vec![vec!["Notes", "Sprint 1", "Alice"], vec!["Sprint 1", "", ""]],
    );
    let mut writer = SheetWriter::new(sheets);
    writer.select_sheet("Alpha");
    assert_eq!(
        writer.locate_cell("Sprint 1", "Alice"),
        Some(CellRef::new(1, 3))
    );
}

#[test]
fn grid_find_scans_row_major() {
    let grid = grid();
    assert_eq!(grid.find("Alice"), Some(CellRef::new(1, 2)));
    assert_eq!(grid.find("Sprint 1"), Some(CellRef::new(2, 1)));
    assert_eq!(grid.find("Bob"), None);
}

#[test]
fn grid_set_grows_ragged_rows() {
    let mut grid = grid();
    grid.set(CellRef::new(2, 2), "3");
    grid.set(CellRef::new(4, 3), "x");
    assert_eq!(grid.get(CellRef::new(2, 2)), Some("3"));
    assert_eq!(grid.get(CellRef::new(4, 3)), Some("x"));
    assert_eq!(grid.get(CellRef::new(3, 1)), None);
    assert_eq!(grid.rows().len(), 4);
}

#[test]
fn grid_ignores_zero_coordinates() {
    let mut grid = grid();
    grid.set(CellRef::new(0, 1), "x");
    assert_eq!(grid.get(CellRef::new(0, 1)), None);
    assert_eq!(grid, self::grid());
}

#[test]
fn memory_operations_require_a_selected_sheet() {
    let mut sheets = MemorySheets::default();
    sheets.add_sheet("Alpha", vec![vec!["Alice"]]);
    assert!(matches!(
        sheets.find("Alice"),
        Err(SyncError::NoWorksheetSelected)
    ));
    assert!(sheets.select_sheet("Alpha").expect("selected"));
    assert_eq!(sheets.selected_sheet(), Some("Alpha"));
    assert_eq!(
        sheets.find("Alice").expect("searched"),
        Some(CellRef::new(1, 1))
    );
}

#[test]
fn memory_updates_are_recorded_per_sheet() {
    let mut sheets = MemorySheets::default();
    sheets.add_sheet("Alpha", vec![vec!["", "Alice"], vec!["Sprint 1", ""]]);
    sheets.select_sheet("Alpha").expect("selected");
    sheets
        .update_cell(CellRef::new(2, 2), "3")
        .expect("updated");

    assert_eq!(sheets.value("Alpha", CellRef::new(2, 2)), Some("3"));
    assert_eq!(
        sheets.writes(),
        [CellWrite {
            sheet: "Alpha".into(),
            cell: CellRef::new(2, 2),
            value: "3".into()
        }]
    );
}

#[test]
fn memory_selecting_a_missing_sheet_clears_selection() {
    let mut sheets = MemorySheets::default();
    sheets.add_sheet("Alpha", vec![vec!["Alice"]]);
    sheets.select_sheet("Alpha").expect("selected");
    assert!(!sheets.select_sheet("Beta").expect("searched"));
    assert_eq!(sheets.selected_sheet(), None);
    assert!(sheets.find("Alice").is_err());
}
