//! Static output writing.

pub mod writer;

pub use writer::{write_files, OutputMap};
