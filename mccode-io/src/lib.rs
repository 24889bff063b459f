//! mccode-io: File I/O for McCode histogram conversion.
//!
//! This crate reads McCode `.dat` files from disk and produces the JSON
//! documents consumed downstream: histogram payloads and the file-writer
//! structure descriptor.
//!

mod error;
pub mod json;
mod reader;
pub mod structure;

pub use error::{Error, Result};
pub use json::{to_json, write_json};
pub use reader::read_mccode_dat;
pub use structure::{
    edge, nexus_structure, structure_for_dimensions, EdgeDescriptor, ElementType, HistogramConfig,
    NexusStructure, StructureOptions, DEFAULT_SOURCE,
};
