//! Input/output helpers.
//!
//! - CSV ingest of the hourly load file (`ingest`)
//! - table and bucket exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
