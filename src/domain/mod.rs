//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and normalized observations (`RawRecord`, `Record`, `RecordSet`)
//! - derived labels and view knobs (`Season`, `Granularity`, `TableMode`)
//! - aggregation outputs (`AggregationBucket`)

pub mod types;

pub use types::*;
