//! Core library for the sprint-sheets command line application.
//!
//! The library pulls completed story points out of a task tracker and writes
//! them into a spreadsheet. Remote clients live under [`sprint::sheets::io`]
//! (the tracker in `taiga`, sheet targets behind the `sheet::SheetBackend`
//! trait), response and aggregate types inside [`sprint::sheets::model`], and
//! the write orchestration under [`sprint::sheets::sync`].

pub mod sprint;

pub use sprint::sheets::{Result, SyncError, config, error, io, logging, model, retry, sync};
