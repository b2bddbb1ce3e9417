pub mod grid;
pub mod gsheets;
pub mod memory;
pub mod sheet;
pub mod taiga;
pub mod workbook;
