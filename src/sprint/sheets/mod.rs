pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod retry;
pub mod sync;

pub use error::{Result, SyncError};
