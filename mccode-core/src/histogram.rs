//! Histogram payloads for the `hs00`/`hs01` streaming schemas.

use crate::datfile::{DatFile, HistogramSource};
use crate::dims::DimensionDescriptor;
use crate::Result;
use ndarray::ArrayD;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize, Serializer};

/// Variable holding the histogram counts.
pub const SIGNAL: &str = "I";
/// Variable holding the count errors.
pub const SIGNAL_ERROR: &str = "I_err";
/// Variable holding the monitor counts used for normalisation.
pub const MONITOR: &str = "N";

/// Streaming histogram schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Schema {
    /// Unsigned integer types only.
    #[default]
    Hs00,
    /// Signed integer types allowed.
    Hs01,
}

impl Schema {
    /// Module identifier used by the file writer.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hs00 => "hs00",
            Self::Hs01 => "hs01",
        }
    }
}

/// Options for building a payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayloadOptions {
    /// Source name; defaults to the file path.
    pub source: Option<String>,
    /// Free-text information attached to the message.
    pub info: Option<String>,
    /// Timestamp in nanoseconds since the epoch; defaults to now.
    pub timestamp: Option<u64>,
    /// Divide counts and errors by the monitor counts.
    pub normalise: bool,
}

impl PayloadOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the info text.
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set monitor normalisation.
    #[must_use]
    pub fn with_normalise(mut self, normalise: bool) -> Self {
        self.normalise = normalise;
        self
    }
}

/// Histogram ready for serialisation as a streaming message.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HistogramPayload {
    pub source: String,
    pub timestamp: u64,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub info: Option<String>,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_flat"))]
    pub data: ArrayD<f64>,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_flat"))]
    pub errors: ArrayD<f64>,
    pub current_shape: Vec<usize>,
    pub dim_metadata: Vec<DimensionDescriptor>,
}

/// Arrays are written flat in row-major order; `current_shape` carries the shape.
#[cfg(feature = "serde")]
fn serialize_flat<S: Serializer>(array: &ArrayD<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(array.iter())
}

/// Builds the payload for any parsed histogram.
///
/// With `normalise`, bins where the monitor count is zero become `inf` or
/// `NaN`; that marks "no counts" and is not an error.
///
/// # Errors
/// Returns an error if `I`, `I_err` (or `N` when normalising) are not
/// variables of the file, or its axis metadata is invalid.
pub fn build_payload<S: HistogramSource + ?Sized>(
    file: &S,
    options: &PayloadOptions,
) -> Result<HistogramPayload> {
    let signal = file.variable(SIGNAL)?;
    let signal_error = file.variable(SIGNAL_ERROR)?;

    let (data, errors) = if options.normalise {
        let monitor = file.variable(MONITOR)?;
        (&signal / &monitor, &signal_error / &monitor)
    } else {
        (signal.to_owned(), signal_error.to_owned())
    };

    Ok(HistogramPayload {
        source: options
            .source
            .clone()
            .filter(|source| !source.is_empty())
            .unwrap_or_else(|| file.header().source().display().to_string()),
        timestamp: options.timestamp.unwrap_or_else(now_in_ns_since_epoch),
        info: options.info.clone().filter(|info| !info.is_empty()),
        current_shape: data.shape().to_vec(),
        dim_metadata: file.dim_metadata()?,
        data,
        errors,
    })
}

impl DatFile {
    /// Builds a payload for the given schema.
    ///
    /// Both schemas carry the same content: values are always `f64`.
    ///
    /// # Errors
    /// See [`build_payload`].
    pub fn to_payload(&self, schema: Schema, options: &PayloadOptions) -> Result<HistogramPayload> {
        log::debug!(
            "building {} payload from {}",
            schema.as_str(),
            self.header().source().display()
        );
        build_payload(self, options)
    }
}

/// Current time in nanoseconds since the Unix epoch.
#[must_use]
pub fn now_in_ns_since_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
}
