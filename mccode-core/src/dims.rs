//! Per-axis bin-edge metadata.
//!
//! McCode writes the first and last bin *centres* as axis limits, so the
//! computed boundaries extend half a bin beyond the declared limits.

use crate::{Error, Result};
use ndarray::Array1;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unit token McCode writes for microseconds.
pub const MICROSECOND_SYMBOL: &str = "\\gms";

/// Bin-edge description of one histogram axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimensionDescriptor {
    /// Number of bins.
    pub length: usize,
    /// Axis label without the unit.
    pub label: String,
    /// Axis unit.
    pub unit: String,
    /// `length + 1` increasing bin boundaries.
    pub bin_boundaries: Vec<f64>,
}

impl DimensionDescriptor {
    /// Builds the descriptor for an axis of `length` bins centred on
    /// evenly spaced points from `lower` to `upper` inclusive.
    ///
    /// # Errors
    /// Returns [`Error::DegenerateAxis`] if `length < 2`, where the bin width
    /// is undefined.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(length: usize, label_unit: &str, lower: f64, upper: f64) -> Result<Self> {
        let (label, unit) = split_label_unit(label_unit);
        if length < 2 {
            return Err(Error::DegenerateAxis { label, length });
        }

        let bin_width = (upper - lower) / (length - 1) as f64;
        let bin_boundaries = Array1::linspace(
            lower - bin_width / 2.0,
            upper + bin_width / 2.0,
            length + 1,
        )
        .to_vec();

        Ok(Self {
            length,
            label,
            unit,
            bin_boundaries,
        })
    }

    /// Returns the bin centres (midpoints of adjacent boundaries).
    #[must_use]
    pub fn centres(&self) -> Vec<f64> {
        self.bin_boundaries
            .windows(2)
            .map(|pair| 0.5 * (pair[0] + pair[1]))
            .collect()
    }
}

/// Splits `"label words [unit]"` into label and unit.
///
/// The last space-separated token, stripped of brackets, is the unit.
#[must_use]
pub fn split_label_unit(label_unit: &str) -> (String, String) {
    let mut parts: Vec<&str> = label_unit.split(' ').collect();
    let unit = parts
        .pop()
        .unwrap_or_default()
        .trim_matches(|c: char| c == '[' || c == ']' || c == ' ');
    (parts.join(" "), normalise_unit(unit))
}

fn normalise_unit(unit: &str) -> String {
    if unit == MICROSECOND_SYMBOL {
        "microseconds".to_string()
    } else {
        unit.to_string()
    }
}

/// Parses exactly `N` whitespace-separated limits from the field `key`.
///
/// # Errors
/// Returns [`Error::InvalidField`] on a non-numeric token or wrong count.
pub fn parse_limits<const N: usize>(key: &str, text: &str) -> Result<[f64; N]> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| Error::InvalidField {
                key: key.to_string(),
                reason: format!("{token:?} is not a number"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    <[f64; N]>::try_from(values).map_err(|values| Error::InvalidField {
        key: key.to_string(),
        reason: format!("expected {N} limits, found {}", values.len()),
    })
}
