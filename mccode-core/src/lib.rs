//! mccode-core: Parsing and conversion of McStas/McXtrace monitor files.
//!
//! This crate reads the `#`-annotated text tables written by McCode
//! monitors, validates the data block against the declared histogram shape,
//! and builds histogram payloads with bin-edge metadata for streaming.
//!

pub mod block;
pub mod datfile;
pub mod dims;
pub mod error;
pub mod header;
pub mod histogram;

pub use datfile::{DatFile, DatFile1D, DatFile2D, DatHeader, DatType, Field, HistogramSource};
pub use dims::{split_label_unit, DimensionDescriptor};
pub use error::{Error, Result};
pub use header::Header;
pub use histogram::{build_payload, now_in_ns_since_epoch, HistogramPayload, PayloadOptions, Schema};
