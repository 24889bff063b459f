//! JSON output of payloads and structure descriptors.

use crate::Result;
use serde::Serialize;
use std::io::Write;

/// Serializes `value` as JSON to a string.
///
/// Non-finite floats, such as normalised bins without monitor counts, are
/// written as `null`.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// Writes `value` as one JSON document followed by a newline.
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
    pretty: bool,
) -> Result<()> {
    let text = to_json(value, pretty)?;
    writeln!(writer, "{text}")?;
    writer.flush()?;
    Ok(())
}
