//! `load-dash` library crate.
//!
//! The binary (`load-dash`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes or a terminal
//! - the TUI and the text report share one code path
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod series;
pub mod tui;
