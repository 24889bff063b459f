//! Header parsing for McCode `.dat` files.
//!
//! Header lines start with `#`. Ordinary header lines are `key: value`
//! metadata; lines starting with `Param` carry `name=value` instrument
//! parameters. Everything else is part of the numeric data block.

use crate::{Error, Result};
use log::debug;
use std::collections::HashMap;

/// Marker that starts every header line.
pub const COMMENT_MARKER: char = '#';

/// Prefix of header lines holding instrument parameters.
pub const PARAMETER_PREFIX: &str = "Param";

/// A line of input paired with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Input lines partitioned into header and data lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitLines<'a> {
    pub header: Vec<Line<'a>>,
    pub data: Vec<Line<'a>>,
}

/// Partitions raw lines into header lines and data lines.
///
/// Lines containing only whitespace belong to neither group.
pub fn split_lines<S: AsRef<str>>(lines: &[S]) -> SplitLines<'_> {
    let mut split = SplitLines::default();
    for (index, raw) in lines.iter().enumerate() {
        let text = raw.as_ref();
        if text.trim().is_empty() {
            continue;
        }
        let line = Line {
            number: index + 1,
            text,
        };
        if text.starts_with(COMMENT_MARKER) {
            split.header.push(line);
        } else {
            split.data.push(line);
        }
    }
    split
}

/// Metadata and parameter maps read from the header lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub metadata: HashMap<String, String>,
    pub parameters: HashMap<String, String>,
}

impl Header {
    /// Parses header lines into metadata and parameters.
    ///
    /// Repeated keys keep the value of their last occurrence.
    ///
    /// # Errors
    /// Returns an error if a header line has no `:` separator, or a
    /// parameter line has no `=` assignment.
    pub fn parse(lines: &[Line<'_>]) -> Result<Self> {
        let mut header = Self::default();
        for line in lines {
            let text = strip_marker(line.text);
            let Some((key, value)) = text.split_once(':') else {
                return Err(Error::MalformedHeader {
                    line: line.number,
                    text: text.to_string(),
                });
            };

            if text.starts_with(PARAMETER_PREFIX) {
                let Some((name, value)) = value.split_once('=') else {
                    return Err(Error::MalformedParameter {
                        line: line.number,
                        text: text.to_string(),
                    });
                };
                insert(&mut header.parameters, name, value);
            } else {
                insert(&mut header.metadata, key, value);
            }
        }
        Ok(header)
    }
}

fn strip_marker(text: &str) -> &str {
    text.trim_matches(|c: char| c == COMMENT_MARKER || c.is_whitespace())
}

fn insert(map: &mut HashMap<String, String>, key: &str, value: &str) {
    let key = key.trim();
    if let Some(previous) = map.insert(key.to_string(), value.trim().to_string()) {
        debug!("header key {key:?} repeated, replacing {previous:?}");
    }
}
