//! Data sources other than the input file.

pub mod synth;

pub use synth::{SynthConfig, generate_series, write_source_csv};
