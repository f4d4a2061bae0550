//! HTML and JSON report rendering.

pub mod generator;
pub mod markup;

pub use generator::{build_output_map, ReportInput};
