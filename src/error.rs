//! Errors raised while parsing descriptor text or constructing descriptors.

use std::fmt;

/// A point in the source text: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Compute line/column for `offset` within `source`.
    pub fn in_source(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        match pest::Position::new(source, offset) {
            Some(pos) => {
                let (line, column) = pos.line_col();
                Location { offset, line, column }
            }
            None => Location { offset, line: 1, column: offset + 1 },
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Semantic failure of a descriptor constructor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DescriptorError {
    #[error("illegal storage type size: {0}")]
    IllegalStorageWidth(u32),
    #[error("illegal storage min and storage max: ({min}:{max})")]
    IllegalStorageRange { min: i64, max: i64 },
    #[error("illegal scale: {0}")]
    IllegalScale(f64),
    #[error("illegal quantized dimension: {0}")]
    IllegalAxis(i32),
    #[error("at least one scale/zeroPoint is required")]
    EmptyScales,
    #[error("illegal quantile type width: {0}")]
    IllegalQuantileWidth(u32),
    #[error("quantile table must not be empty")]
    EmptyQuantiles,
    #[error("illegal quantile value: {0}")]
    IllegalQuantile(f64),
    #[error("illegal calibrated bound: {0}")]
    IllegalCalibratedBound(f64),
}

/// What went wrong at a [`ParseError`] location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {0}")]
    Expected(&'static str),
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("integer literal out of range: {0}")]
    IntegerOutOfRange(String),
    #[error("floating point literal out of range: {0}")]
    FloatOutOfRange(String),
    #[error("illegal quantized storage type alias")]
    IllegalStorageTypeAlias,
    #[error("illegal storage type size: {0}")]
    IllegalStorageTypeSize(u64),
    #[error("illegal quantile type alias")]
    IllegalQuantileTypeAlias,
    #[error("illegal storage type minimum: {0}")]
    IllegalStorageMinimum(i64),
    #[error("illegal storage type maximum: {0}")]
    IllegalStorageMaximum(i64),
    #[error("expecting float expressed type")]
    ExpectedFloatExpressedType,
    #[error("calibrated values must be present")]
    CalibratedValuesMissing,
    #[error("multiple scales/zeroPoints provided, but quantizedDimension wasn't specified")]
    MultipleScalesWithoutAxis,
    #[error("unknown quantized type {0}")]
    UnknownQuantizedType(String),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// A fatal parse failure. No partial descriptor is ever produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{location}: {kind}")]
pub struct ParseError {
    pub location: Location,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(location: Location, kind: ParseErrorKind) -> Self {
        ParseError { location, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_line_col() {
        let src = "uniform<\n  i8:f32, 1.0>";
        let loc = Location::in_source(src, 11);
        assert_eq!((loc.line, loc.column), (2, 3));
        assert_eq!(loc.to_string(), "2:3");
    }

    #[test]
    fn messages() {
        let e = ParseError::new(
            Location::in_source("x", 0),
            ParseErrorKind::UnknownQuantizedType("bogus".to_string()),
        );
        assert_eq!(e.to_string(), "1:1: unknown quantized type bogus");
        let e: ParseErrorKind = DescriptorError::IllegalScale(-1.0).into();
        assert_eq!(e.to_string(), "illegal scale: -1");
    }
}
