//! ledgergrid - Editable ledger grid: sheet files, configuration and the
//! terminal front end around `ledgergrid-core`.

pub mod config;
pub mod demo;
pub mod error;
pub mod logging;
pub mod storage;
#[cfg(feature = "tui")]
pub mod tui;
