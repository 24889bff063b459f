//! Parsed McCode data files.
//!
//! A file declares its histogram shape in the `type` header field
//! (`array_1d(N)` or `array_2d(Nx, Ny)`) and the names of the stacked data
//! columns in `variables`. Construction validates the data block against
//! that declaration and stores it with the variable as the leading axis.

use crate::block::load_block;
use crate::dims::{parse_limits, DimensionDescriptor};
use crate::header::{split_lines, Header};
use crate::{Error, Result};
use log::debug;
use ndarray::{Array2, Array3, ArrayViewD, Axis};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Header key holding the declared type tag.
pub const TYPE_KEY: &str = "type";
/// Header key holding the variable names.
pub const VARIABLES_KEY: &str = "variables";

const XLABEL: &str = "xlabel";
const YLABEL: &str = "ylabel";
const XLIMITS: &str = "xlimits";
const XYLIMITS: &str = "xylimits";

/// Declared histogram shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatType {
    /// `array_1d(nx)`
    Array1d { nx: usize },
    /// `array_2d(nx, ny)`
    Array2d { nx: usize, ny: usize },
}

impl DatType {
    /// Parses a type tag such as `array_2d(100, 50)`.
    ///
    /// # Errors
    /// Returns [`Error::Dimensionality`] for anything but one or two sizes,
    /// or [`Error::InvalidField`] if the tag is malformed.
    pub fn parse(tag: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidField {
            key: TYPE_KEY.to_string(),
            reason,
        };

        let (_, args) = tag
            .split_once('(')
            .ok_or_else(|| invalid(format!("missing '(' in {tag:?}")))?;
        let args: Vec<&str> = args.trim().trim_end_matches(')').split(',').collect();
        if !(1..=2).contains(&args.len()) {
            return Err(Error::Dimensionality(args.len()));
        }

        let sizes = args
            .iter()
            .map(|arg| {
                arg.trim()
                    .parse::<usize>()
                    .map_err(|_| invalid(format!("{arg:?} is not a bin count in {tag:?}")))
            })
            .collect::<Result<Vec<_>>>()?;

        match sizes.as_slice() {
            [nx] => Ok(Self::Array1d { nx: *nx }),
            [nx, ny] => Ok(Self::Array2d { nx: *nx, ny: *ny }),
            other => Err(Error::Dimensionality(other.len())),
        }
    }

    /// Number of histogram axes.
    #[must_use]
    pub fn ndim(self) -> usize {
        match self {
            Self::Array1d { .. } => 1,
            Self::Array2d { .. } => 2,
        }
    }
}

/// Header content shared by both file variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatHeader {
    source: PathBuf,
    metadata: HashMap<String, String>,
    parameters: HashMap<String, String>,
    variables: Vec<String>,
}

impl DatHeader {
    /// Wraps parsed header maps, reading variable names from `variables`.
    #[must_use]
    pub fn new(source: PathBuf, header: Header) -> Self {
        let variables = header
            .metadata
            .get(VARIABLES_KEY)
            .map(|names| names.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        Self {
            source,
            metadata: header.metadata,
            parameters: header.parameters,
            variables,
        }
    }

    /// Path of the originating file.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Non-parameter header fields.
    #[must_use]
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Instrument parameters, as written.
    #[must_use]
    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    /// Variable names in data-block order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Raw `type` tag.
    ///
    /// # Errors
    /// Returns [`Error::UnknownKey`] if the header has no `type` field.
    pub fn type_tag(&self) -> Result<&str> {
        self.metadata
            .get(TYPE_KEY)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownKey(TYPE_KEY.to_string()))
    }

    /// Parsed `type` tag.
    ///
    /// # Errors
    /// Returns an error if `type` is missing or malformed.
    pub fn dat_type(&self) -> Result<DatType> {
        DatType::parse(self.type_tag()?)
    }

    fn shape_mismatch(&self, expected: Vec<usize>, found: &[usize]) -> Error {
        Error::ShapeMismatch {
            expected,
            found: found.to_vec(),
            declared: self.metadata.get(TYPE_KEY).cloned().unwrap_or_default(),
            variables: self.variables.len(),
        }
    }
}

/// A value resolved by name from a parsed file.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<'a> {
    /// Slice of the data array for one variable.
    Variable(ArrayViewD<'a, f64>),
    /// Instrument parameter value.
    Parameter(&'a str),
    /// Header metadata value.
    Metadata(&'a str),
}

impl<'a> Field<'a> {
    /// Returns the text of a parameter or metadata field.
    #[must_use]
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Self::Variable(_) => None,
            Self::Parameter(text) | Self::Metadata(text) => Some(*text),
        }
    }
}

/// Common view of a parsed histogram file.
pub trait HistogramSource {
    /// Header maps and variable names.
    fn header(&self) -> &DatHeader;

    /// Data array in canonical layout, variable axis first.
    fn data(&self) -> ArrayViewD<'_, f64>;

    /// Bin-edge descriptors, one per histogram axis in `(x, y)` order.
    ///
    /// # Errors
    /// Returns an error if the axis labels or limits are missing or invalid.
    fn dim_metadata(&self) -> Result<Vec<DimensionDescriptor>>;

    /// Looks up `name` as a variable, then a parameter, then metadata.
    ///
    /// # Errors
    /// Returns [`Error::AmbiguousKey`] if the variable is listed more than
    /// once and [`Error::UnknownKey`] if the name is not found at all.
    fn resolve(&self, name: &str) -> Result<Field<'_>> {
        let header = self.header();
        let indices: Vec<usize> = header
            .variables
            .iter()
            .enumerate()
            .filter(|(_, variable)| *variable == name)
            .map(|(index, _)| index)
            .collect();

        if indices.len() > 1 {
            return Err(Error::AmbiguousKey {
                key: name.to_string(),
                indices,
            });
        }
        if let Some(&index) = indices.first() {
            return Ok(Field::Variable(self.data().index_axis_move(Axis(0), index)));
        }

        if let Some(value) = header.parameters.get(name) {
            Ok(Field::Parameter(value))
        } else if let Some(value) = header.metadata.get(name) {
            Ok(Field::Metadata(value))
        } else {
            Err(Error::UnknownKey(name.to_string()))
        }
    }

    /// Resolves `name` to a variable's data.
    ///
    /// # Errors
    /// Returns an error if the name is unknown or is not a variable.
    fn variable(&self, name: &str) -> Result<ArrayViewD<'_, f64>> {
        match self.resolve(name)? {
            Field::Variable(view) => Ok(view),
            Field::Parameter(_) | Field::Metadata(_) => Err(Error::NotAVariable(name.to_string())),
        }
    }

    /// Resolves `name` to parameter or metadata text.
    ///
    /// # Errors
    /// Returns an error if the name is unknown or is a variable.
    fn text(&self, name: &str) -> Result<&str> {
        self.resolve(name)?
            .as_text()
            .ok_or_else(|| Error::NotText(name.to_string()))
    }
}

/// One-dimensional histogram, data stored as `(variable, x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatFile1D {
    header: DatHeader,
    data: Array2<f64>,
}

impl DatFile1D {
    /// Validates a raw `(nx, variables)` block and transposes it.
    fn from_parts(header: DatHeader, nx: usize, raw: Array2<f64>) -> Result<Self> {
        let nv = header.variables.len();
        if raw.dim() != (nx, nv) {
            return Err(header.shape_mismatch(vec![nx, nv], raw.shape()));
        }
        let data = raw.reversed_axes().as_standard_layout().into_owned();
        Ok(Self { header, data })
    }

    /// Canonical `(variable, x)` data.
    #[must_use]
    pub fn canonical_data(&self) -> &Array2<f64> {
        &self.data
    }
}

impl HistogramSource for DatFile1D {
    fn header(&self) -> &DatHeader {
        &self.header
    }

    fn data(&self) -> ArrayViewD<'_, f64> {
        self.data.view().into_dyn()
    }

    fn dim_metadata(&self) -> Result<Vec<DimensionDescriptor>> {
        let [lower, upper] = parse_limits::<2>(XLIMITS, self.text(XLIMITS)?)?;
        let x = DimensionDescriptor::new(self.data.ncols(), self.text(XLABEL)?, lower, upper)?;
        Ok(vec![x])
    }
}

/// Two-dimensional histogram, data stored as `(variable, y, x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatFile2D {
    header: DatHeader,
    data: Array3<f64>,
}

impl DatFile2D {
    /// Validates a raw `(ny * variables, nx)` block and splits it into one
    /// `ny` by `nx` block per variable, in declared order.
    fn from_parts(header: DatHeader, nx: usize, ny: usize, raw: Array2<f64>) -> Result<Self> {
        let nv = header.variables.len();
        let Some(rows) = ny.checked_mul(nv) else {
            return Err(header.shape_mismatch(vec![nv, ny, nx], raw.shape()));
        };
        if raw.dim() != (rows, nx) {
            return Err(header.shape_mismatch(vec![rows, nx], raw.shape()));
        }
        let found = raw.shape().to_vec();
        let data = raw
            .into_shape_with_order((nv, ny, nx))
            .map_err(|_| header.shape_mismatch(vec![nv, ny, nx], &found))?;
        Ok(Self { header, data })
    }

    /// Canonical `(variable, y, x)` data.
    #[must_use]
    pub fn canonical_data(&self) -> &Array3<f64> {
        &self.data
    }
}

impl HistogramSource for DatFile2D {
    fn header(&self) -> &DatHeader {
        &self.header
    }

    fn data(&self) -> ArrayViewD<'_, f64> {
        self.data.view().into_dyn()
    }

    fn dim_metadata(&self) -> Result<Vec<DimensionDescriptor>> {
        let [lower_x, upper_x, lower_y, upper_y] =
            parse_limits::<4>(XYLIMITS, self.text(XYLIMITS)?)?;
        let (_, ny, nx) = self.data.dim();
        Ok(vec![
            DimensionDescriptor::new(nx, self.text(XLABEL)?, lower_x, upper_x)?,
            DimensionDescriptor::new(ny, self.text(YLABEL)?, lower_y, upper_y)?,
        ])
    }
}

/// A parsed McCode data file of either dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub enum DatFile {
    OneDimensional(DatFile1D),
    TwoDimensional(DatFile2D),
}

impl DatFile {
    /// Parses already-split lines of a data file.
    ///
    /// `source` is recorded as given; callers reading from disk pass the
    /// resolved absolute path.
    ///
    /// # Errors
    /// Returns an error if the header or data block is malformed, the
    /// declared type is unsupported, or the data shape does not match it.
    pub fn from_lines<S: AsRef<str>>(source: impl Into<PathBuf>, lines: &[S]) -> Result<Self> {
        let split = split_lines(lines);
        let header = DatHeader::new(source.into(), Header::parse(&split.header)?);
        let dat_type = header.dat_type()?;
        let raw = load_block(&split.data)?;

        debug!(
            "{}: {} header lines, {:?} data block, {:?} with variables {:?}",
            header.source.display(),
            split.header.len(),
            raw.shape(),
            dat_type,
            header.variables
        );

        match dat_type {
            DatType::Array1d { nx } => DatFile1D::from_parts(header, nx, raw).map(Self::OneDimensional),
            DatType::Array2d { nx, ny } => {
                DatFile2D::from_parts(header, nx, ny, raw).map(Self::TwoDimensional)
            }
        }
    }

    /// Parses the full text of a data file.
    ///
    /// # Errors
    /// See [`DatFile::from_lines`].
    pub fn from_text(source: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().collect();
        Self::from_lines(source, &lines)
    }

    /// Number of histogram axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        match self {
            Self::OneDimensional(_) => 1,
            Self::TwoDimensional(_) => 2,
        }
    }

    fn inner(&self) -> &dyn HistogramSource {
        match self {
            Self::OneDimensional(file) => file,
            Self::TwoDimensional(file) => file,
        }
    }
}

impl HistogramSource for DatFile {
    fn header(&self) -> &DatHeader {
        self.inner().header()
    }

    fn data(&self) -> ArrayViewD<'_, f64> {
        self.inner().data()
    }

    fn dim_metadata(&self) -> Result<Vec<DimensionDescriptor>> {
        self.inner().dim_metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_D: &str = "\
# Format: McCode with text headers
# type: array_1d(4)
# Param: L=I
# xlabel: Wavelength [AA]
# xlimits: 1 4
# variables: L I I_err N
1 10 1 100
2 20 2 200
3 30 3 300
4 40 4 400
";

    #[test]
    fn test_dat_type_parse() {
        assert_eq!(DatType::parse("array_1d(10)").unwrap(), DatType::Array1d { nx: 10 });
        assert_eq!(
            DatType::parse("array_2d(90, 20)").unwrap(),
            DatType::Array2d { nx: 90, ny: 20 }
        );
        assert!(matches!(
            DatType::parse("array_3d(2,3,4)"),
            Err(Error::Dimensionality(3))
        ));
        assert!(matches!(
            DatType::parse("array_1d"),
            Err(Error::InvalidField { .. })
        ));
        assert!(matches!(
            DatType::parse("array_1d(ten)"),
            Err(Error::InvalidField { .. })
        ));
    }

    #[test]
    fn test_one_d_transposed() {
        let file = DatFile::from_text("/tmp/monitor.dat", ONE_D).unwrap();
        assert_eq!(file.ndim(), 1);
        assert_eq!(file.data().shape(), &[4, 4]);

        let DatFile::OneDimensional(one) = &file else {
            panic!("expected a 1D file");
        };
        assert_eq!(one.canonical_data().row(1).to_vec(), vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_variable_precedes_parameter() {
        let file = DatFile::from_text("/tmp/monitor.dat", ONE_D).unwrap();
        let Field::Variable(view) = file.resolve("L").unwrap() else {
            panic!("L should resolve to a variable");
        };
        assert_eq!(view.iter().copied().collect::<Vec<f64>>(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_resolve_fallbacks() {
        let file = DatFile::from_text("/tmp/monitor.dat", ONE_D).unwrap();
        assert_eq!(
            file.resolve("xlabel").unwrap(),
            Field::Metadata("Wavelength [AA]")
        );
        assert!(matches!(file.resolve("missing"), Err(Error::UnknownKey(_))));
        assert!(matches!(file.text("I"), Err(Error::NotText(_))));
        assert!(matches!(
            file.variable("xlimits"),
            Err(Error::NotAVariable(_))
        ));
    }

    #[test]
    fn test_ambiguous_variable() {
        let text = "# type: array_1d(2)\n# variables: I I\n1 2\n3 4\n";
        let file = DatFile::from_text("dup.dat", text).unwrap();
        match file.resolve("I") {
            Err(Error::AmbiguousKey { indices, .. }) => assert_eq!(indices, vec![0, 1]),
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_two_d_blocks_per_variable() {
        let text = "\
# type: array_2d(3, 2)
# variables: I I_err
# Data [detector/psd.dat] I:
1 2 3
4 5 6
# Errors [detector/psd.dat] I_err:
0.1 0.2 0.3
0.4 0.5 0.6
";
        let file = DatFile::from_text("psd.dat", text).unwrap();
        let DatFile::TwoDimensional(two) = &file else {
            panic!("expected a 2D file");
        };
        let data = two.canonical_data();
        assert_eq!(data.dim(), (2, 2, 3));
        assert_eq!(data[[0, 1, 2]], 6.0);
        assert_eq!(data[[1, 0, 1]], 0.2);
        assert_eq!(file.variable("I_err").unwrap().shape(), &[2, 3]);
    }

    #[test]
    fn test_missing_type() {
        let err = DatFile::from_text("x.dat", "# variables: I\n1\n").unwrap_err();
        assert!(matches!(err, Error::UnknownKey(key) if key == "type"));
    }

    #[test]
    fn test_oversized_two_d_declaration() {
        let text = "# type: array_2d(1,9223372036854775808)\n# variables: I I_err\n1\n";
        let err = DatFile::from_text("big.dat", text).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_split_lines() {
        let lines: Vec<String> = ONE_D.lines().map(str::to_string).collect();
        let file = DatFile::from_lines("/tmp/monitor.dat", &lines).unwrap();

        assert_eq!(file, DatFile::from_text("/tmp/monitor.dat", ONE_D).unwrap());
        assert_eq!(file.header().source(), Path::new("/tmp/monitor.dat"));
        assert_eq!(file.variable("N").unwrap().iter().copied().collect::<Vec<f64>>(), vec![100.0, 200.0, 300.0, 400.0]);
    }
}
