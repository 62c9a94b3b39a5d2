//! Recursive-descent parser for quantized type descriptors.
//!
//! ```text
//! type         ::= `any` any-body | `uniform` uni-body | `quantile` uni-body | `calibrated` cal-body
//! any-body     ::= `<` storage-spec (`:` expressed-type)? `>`
//! uni-body     ::= `<` storage-spec (`:` quantile-type)? `:` expressed-type (`:` axis)?
//!                  `,` table? scale-spec `>`
//! storage-spec ::= storage-type (`<` integer `:` integer `>`)?
//! table        ::= `{` float (`,` float)* `}` `:`
//! scale-spec   ::= scale-zero | `{` scale-zero (`,` scale-zero)* `}`
//! scale-zero   ::= float (`:` integer)?
//! cal-body     ::= `<` expressed-type `<` float `:` float `>` `>`
//! ```

use crate::error::{DescriptorError, Location, ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::numeric::{FloatKind, NumericType, MAX_INTEGER_WIDTH};
use crate::storage::{natural_bounds, QuantileType, StorageSpec, StorageType, MAX_STORAGE_BITS};
use crate::types::*;

/// Parse one complete descriptor; trailing input is an error.
pub fn parse(source: &str) -> Result<QuantizedType, ParseError> {
    let mut parser = TypeParser::new(source);
    let result = parser.parse_quantized_type().and_then(|ty| {
        parser.parse_end()?;
        Ok(ty)
    });
    if let Err(e) = &result {
        tracing::debug!(error = %e, offset = e.location.offset, "quantized type parse failed");
    }
    result
}

impl std::str::FromStr for QuantizedType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Token-level parsing primitives plus the descriptor entry point.
///
/// A host embedding descriptors in a larger syntax can call
/// [`TypeParser::parse_quantized_type`] and continue from [`TypeParser::offset`].
#[derive(Debug, Clone)]
pub struct TypeParser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> TypeParser<'a> {
    pub fn new(source: &'a str) -> Self {
        TypeParser { lexer: Lexer::new(source) }
    }

    /// Byte offset of the next unconsumed token.
    pub fn offset(&self) -> usize {
        self.lexer.offset()
    }

    pub fn current_location(&self) -> Location {
        self.lexer.location()
    }

    pub fn emit_error(&self, location: Location, kind: ParseErrorKind) -> ParseError {
        ParseError::new(location, kind)
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        self.emit_error(self.current_location(), kind)
    }

    fn peek(&self) -> Result<Option<Token<'a>>, ParseError> {
        self.lexer.peek()
    }

    /// Consume the next token if it has `kind`.
    fn eat(&mut self, kind: TokenKind) -> Result<Option<Token<'a>>, ParseError> {
        match self.peek()? {
            Some(t) if t.kind == kind => {
                self.lexer.bump(&t);
                Ok(Some(t))
            }
            _ => Ok(None),
        }
    }

    pub fn parse_keyword(&mut self, what: &'static str) -> Result<&'a str, ParseError> {
        match self.eat(TokenKind::Ident)? {
            Some(t) => Ok(t.text),
            None => Err(self.error_here(ParseErrorKind::Expected(what))),
        }
    }

    /// Consume a type reference if the next token names a builtin type.
    pub fn parse_optional_type(&mut self) -> Result<Option<NumericType>, ParseError> {
        match self.peek()? {
            Some(t) if t.kind == TokenKind::Ident => match NumericType::from_keyword(t.text) {
                Some(ty) => {
                    self.lexer.bump(&t);
                    Ok(Some(ty))
                }
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }

    pub fn parse_type(&mut self) -> Result<NumericType, ParseError> {
        match self.parse_optional_type()? {
            Some(ty) => Ok(ty),
            None => Err(self.error_here(ParseErrorKind::Expected("type"))),
        }
    }

    pub fn parse_float_type(&mut self) -> Result<FloatKind, ParseError> {
        let loc = self.current_location();
        self.parse_type()?
            .as_float()
            .ok_or_else(|| self.emit_error(loc, ParseErrorKind::ExpectedFloatExpressedType))
    }

    /// Integer literal, decimal or `0x` hex, with optional leading `-`.
    pub fn parse_integer<T: TryFrom<i128>>(&mut self) -> Result<T, ParseError> {
        let loc = self.current_location();
        let Some(t) = self.eat(TokenKind::Integer)? else {
            return Err(self.error_here(ParseErrorKind::Expected("integer value")));
        };
        let (negative, digits) = match t.text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, t.text),
        };
        let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            Some(hex) => i128::from_str_radix(hex, 16),
            None => digits.parse::<i128>(),
        };
        let out_of_range = || self.emit_error(loc, ParseErrorKind::IntegerOutOfRange(t.text.to_string()));
        let magnitude = magnitude.map_err(|_| out_of_range())?;
        let value = if negative { -magnitude } else { magnitude };
        T::try_from(value).map_err(|_| out_of_range())
    }

    /// Floating point literal; a decimal integer literal is accepted too.
    pub fn parse_float(&mut self) -> Result<f64, ParseError> {
        let loc = self.current_location();
        let token = match self.peek()? {
            Some(t) if t.kind == TokenKind::Float => t,
            Some(t) if t.kind == TokenKind::Integer && !t.text.contains(|c: char| c == 'x' || c == 'X') => t,
            _ => return Err(self.error_here(ParseErrorKind::Expected("floating point value"))),
        };
        self.lexer.bump(&token);
        match token.text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.emit_error(loc, ParseErrorKind::FloatOutOfRange(token.text.to_string()))),
        }
    }

    fn parse_optional_punct(&mut self, p: &str) -> Result<bool, ParseError> {
        match self.peek()? {
            Some(t) if t.is_punct(p) => {
                self.lexer.bump(&t);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn parse_punct(&mut self, p: &str, expected: &'static str) -> Result<(), ParseError> {
        if self.parse_optional_punct(p)? {
            Ok(())
        } else {
            Err(self.error_here(ParseErrorKind::Expected(expected)))
        }
    }

    pub fn parse_less(&mut self) -> Result<(), ParseError> {
        self.parse_punct("<", "'<'")
    }

    pub fn parse_optional_less(&mut self) -> Result<bool, ParseError> {
        self.parse_optional_punct("<")
    }

    pub fn parse_greater(&mut self) -> Result<(), ParseError> {
        self.parse_punct(">", "'>'")
    }

    pub fn parse_colon(&mut self) -> Result<(), ParseError> {
        self.parse_punct(":", "':'")
    }

    pub fn parse_optional_colon(&mut self) -> Result<bool, ParseError> {
        self.parse_optional_punct(":")
    }

    pub fn parse_comma(&mut self) -> Result<(), ParseError> {
        self.parse_punct(",", "','")
    }

    pub fn parse_optional_comma(&mut self) -> Result<bool, ParseError> {
        self.parse_optional_punct(",")
    }

    pub fn parse_lbrace(&mut self) -> Result<(), ParseError> {
        self.parse_punct("{", "'{'")
    }

    pub fn parse_optional_lbrace(&mut self) -> Result<bool, ParseError> {
        self.parse_optional_punct("{")
    }

    pub fn parse_rbrace(&mut self) -> Result<(), ParseError> {
        self.parse_punct("}", "'}'")
    }

    pub fn parse_end(&mut self) -> Result<(), ParseError> {
        match self.peek()? {
            None => Ok(()),
            Some(_) => Err(self.error_here(ParseErrorKind::Expected("end of input"))),
        }
    }

    /// `elem (',' elem)*`
    fn parse_comma_separated<T>(
        &mut self,
        mut elem: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut out = vec![elem(&mut *self)?];
        while self.parse_optional_comma()? {
            out.push(elem(&mut *self)?);
        }
        Ok(out)
    }

    /// Read the leading keyword and parse the matching descriptor.
    pub fn parse_quantized_type(&mut self) -> Result<QuantizedType, ParseError> {
        let loc = self.current_location();
        let name = self.parse_keyword("quantized type name")?;
        tracing::trace!(keyword = name, offset = loc.offset, "dispatching quantized type");
        match name {
            "uniform" => parse_uniform_type(self, false, loc),
            "quantile" => parse_uniform_type(self, true, loc),
            "any" => parse_any_type(self, loc),
            "calibrated" => parse_calibrated_type(self, loc),
            other => Err(self.emit_error(loc, ParseErrorKind::UnknownQuantizedType(other.to_string()))),
        }
    }
}

fn checked<T>(p: &TypeParser<'_>, loc: Location, built: Result<T, DescriptorError>) -> Result<T, ParseError> {
    built.map_err(|e| p.emit_error(loc, e.into()))
}

/// `u<digits>` width, if the identifier has that shape. Widths past `u64` saturate.
fn unsigned_width(ident: &str) -> Option<u64> {
    let digits = ident.strip_prefix('u')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

fn parse_storage_type(p: &mut TypeParser<'_>) -> Result<StorageType, ParseError> {
    let loc = p.current_location();
    let storage = match p.parse_optional_type()? {
        Some(ty) => {
            let storage = match ty {
                NumericType::Integer { .. } => ty
                    .as_integer()
                    .map(|(width, signed)| StorageType::integer(width, signed)),
                NumericType::Float(kind) => StorageType::float8(kind),
                NumericType::Index => None,
            };
            storage.ok_or_else(|| p.emit_error(loc, ParseErrorKind::IllegalStorageTypeAlias))?
        }
        None => {
            let ident = p.parse_keyword("storage type")?;
            let width = unsigned_width(ident)
                .ok_or_else(|| p.emit_error(loc, ParseErrorKind::IllegalStorageTypeAlias))?;
            match u32::try_from(width) {
                Ok(width) => StorageType::integer(width, false),
                Err(_) => return Err(p.emit_error(loc, ParseErrorKind::IllegalStorageTypeSize(width))),
            }
        }
    };
    if storage.width() == 0 || storage.width() > MAX_STORAGE_BITS {
        return Err(p.emit_error(loc, ParseErrorKind::IllegalStorageTypeSize(u64::from(storage.width()))));
    }
    Ok(storage)
}

fn parse_quantile_type(p: &mut TypeParser<'_>) -> Result<QuantileType, ParseError> {
    let loc = p.current_location();
    let quantile = match p.parse_optional_type()? {
        Some(ty) => QuantileType::from_numeric(ty),
        None => {
            let ident = p.parse_keyword("quantile type")?;
            unsigned_width(ident)
                .and_then(|width| u32::try_from(width).ok())
                .filter(|&width| width <= MAX_INTEGER_WIDTH)
                .map(|width| QuantileType::Integer { width, signed: false })
        }
    };
    quantile.ok_or_else(|| p.emit_error(loc, ParseErrorKind::IllegalQuantileTypeAlias))
}

/// Optional `<min:max>` after a storage type; defaults to the natural bounds.
fn parse_storage_range(p: &mut TypeParser<'_>, storage: &StorageType) -> Result<(i64, i64), ParseError> {
    let (default_min, default_max) = natural_bounds(storage);
    if !p.parse_optional_less()? {
        return Ok((default_min, default_max));
    }
    let min_loc = p.current_location();
    let min: i64 = p.parse_integer()?;
    p.parse_colon()?;
    let max_loc = p.current_location();
    let max: i64 = p.parse_integer()?;
    p.parse_greater()?;

    if min < default_min {
        return Err(p.emit_error(min_loc, ParseErrorKind::IllegalStorageMinimum(min)));
    }
    if max > default_max {
        return Err(p.emit_error(max_loc, ParseErrorKind::IllegalStorageMaximum(max)));
    }
    Ok((min, max))
}

fn parse_storage_spec(p: &mut TypeParser<'_>) -> Result<StorageSpec, ParseError> {
    let loc = p.current_location();
    let storage = parse_storage_type(p)?;
    let (min, max) = parse_storage_range(p, &storage)?;
    checked(p, loc, StorageSpec::new(storage, min, max))
}

fn parse_calibrated_range(p: &mut TypeParser<'_>) -> Result<(FloatKind, f64, f64), ParseError> {
    let expressed = p.parse_float_type()?;
    p.parse_less()?;
    let min = p.parse_float()?;
    p.parse_colon()?;
    let max = p.parse_float()?;
    p.parse_greater()?;
    Ok((expressed, min, max))
}

/// Expressed type followed by the mandatory `<min:max>` observed range.
fn parse_expressed_type_and_range(p: &mut TypeParser<'_>) -> Result<(FloatKind, f64, f64), ParseError> {
    let loc = p.current_location();
    parse_calibrated_range(p).map_err(|_| p.emit_error(loc, ParseErrorKind::CalibratedValuesMissing))
}

fn parse_scale_zero_point(p: &mut TypeParser<'_>) -> Result<ScaleZeroPoint, ParseError> {
    let scale = p.parse_float()?;
    let zero_point = if p.parse_optional_colon()? { p.parse_integer()? } else { 0 };
    Ok(ScaleZeroPoint::new(scale, zero_point))
}

fn parse_any_type(p: &mut TypeParser<'_>, loc: Location) -> Result<QuantizedType, ParseError> {
    p.parse_less()?;
    let storage = parse_storage_spec(p)?;
    let expressed = if p.parse_optional_colon()? { Some(p.parse_float_type()?) } else { None };
    p.parse_greater()?;
    checked(p, loc, AnyQuantizedType::new(storage, expressed)).map(QuantizedType::from)
}

enum ScaleLayout {
    PerLayer(ScaleZeroPoint),
    PerAxis { axis: i32, scale_zeros: Vec<ScaleZeroPoint> },
}

/// Shared body of `uniform` and `quantile`; the quantile form adds a
/// quantile type and a table ahead of the scales.
fn parse_uniform_type(p: &mut TypeParser<'_>, is_quantile: bool, loc: Location) -> Result<QuantizedType, ParseError> {
    p.parse_less()?;
    let storage = parse_storage_spec(p)?;

    let quantile_type = if is_quantile {
        p.parse_colon()?;
        Some(parse_quantile_type(p)?)
    } else {
        None
    };

    p.parse_colon()?;
    let expressed = p.parse_float_type()?;

    let axis: Option<i32> = if p.parse_optional_colon()? { Some(p.parse_integer()?) } else { None };

    p.parse_comma()?;

    let quantiles = if is_quantile {
        p.parse_lbrace()?;
        let table = p.parse_comma_separated(|p| p.parse_float())?;
        p.parse_rbrace()?;
        p.parse_colon()?;
        table
    } else {
        Vec::new()
    };

    let scales_loc = p.current_location();
    let braced = match axis {
        Some(_) => {
            p.parse_lbrace()?;
            true
        }
        None => p.parse_optional_lbrace()?,
    };
    let mut scale_zeros = if braced {
        let list = p.parse_comma_separated(parse_scale_zero_point)?;
        p.parse_rbrace()?;
        list
    } else {
        vec![parse_scale_zero_point(p)?]
    };
    p.parse_greater()?;

    let layout = match axis {
        Some(axis) => ScaleLayout::PerAxis { axis, scale_zeros },
        None if scale_zeros.len() == 1 => ScaleLayout::PerLayer(scale_zeros.remove(0)),
        None => return Err(p.emit_error(scales_loc, ParseErrorKind::MultipleScalesWithoutAxis)),
    };

    let built = match (quantile_type, layout) {
        (None, ScaleLayout::PerLayer(sz)) => {
            UniformQuantizedType::new(storage, expressed, sz).map(QuantizedType::from)
        }
        (None, ScaleLayout::PerAxis { axis, scale_zeros }) => {
            UniformQuantizedPerAxisType::new(storage, expressed, axis, scale_zeros).map(QuantizedType::from)
        }
        (Some(qt), ScaleLayout::PerLayer(sz)) => {
            QuantileQuantizedType::new(storage, qt, expressed, quantiles, sz).map(QuantizedType::from)
        }
        (Some(qt), ScaleLayout::PerAxis { axis, scale_zeros }) => {
            QuantileQuantizedPerAxisType::new(storage, qt, expressed, axis, quantiles, scale_zeros)
                .map(QuantizedType::from)
        }
    };
    checked(p, loc, built)
}

fn parse_calibrated_type(p: &mut TypeParser<'_>, loc: Location) -> Result<QuantizedType, ParseError> {
    p.parse_less()?;
    let (expressed, min, max) = parse_expressed_type_and_range(p)?;
    p.parse_greater()?;
    checked(p, loc, CalibratedQuantizedType::new(expressed, min, max)).map(QuantizedType::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives() {
        let mut p = TypeParser::new("foo -0x10 2.5 7 <");
        assert_eq!(p.parse_keyword("name").unwrap(), "foo");
        assert_eq!(p.parse_integer::<i64>().unwrap(), -16);
        assert_eq!(p.parse_float().unwrap(), 2.5);
        assert_eq!(p.parse_float().unwrap(), 7.0);
        assert!(!p.parse_optional_colon().unwrap());
        assert!(p.parse_optional_less().unwrap());
        p.parse_end().unwrap();
    }

    #[test]
    fn integer_range() {
        let mut p = TypeParser::new("300");
        let err = p.parse_integer::<i8>().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::IntegerOutOfRange("300".to_string()));
    }

    #[test]
    fn float_overflow() {
        let mut p = TypeParser::new("1e999");
        assert_eq!(
            p.parse_float().unwrap_err().kind,
            ParseErrorKind::FloatOutOfRange("1e999".to_string())
        );
    }

    #[test]
    fn optional_type_leaves_non_types() {
        let mut p = TypeParser::new("u8 i8");
        assert_eq!(p.parse_optional_type().unwrap(), None);
        assert_eq!(p.parse_keyword("x").unwrap(), "u8");
        assert!(p.parse_optional_type().unwrap().is_some());
    }

    #[test]
    fn storage_type_forms() {
        let st = parse_storage_type(&mut TypeParser::new("u4")).unwrap();
        assert_eq!((st.width(), st.is_signed()), (4, false));
        let st = parse_storage_type(&mut TypeParser::new("si16")).unwrap();
        assert_eq!((st.width(), st.is_signed()), (16, true));
        let st = parse_storage_type(&mut TypeParser::new("f8E5M2")).unwrap();
        assert_eq!((st.width(), st.is_signed()), (8, true));
        for bad in ["f32", "index", "x8", "uabc"] {
            let err = parse_storage_type(&mut TypeParser::new(bad)).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::IllegalStorageTypeAlias, "{}", bad);
        }
        for (bad, width) in [("i0", 0), ("u33", 33), ("i64", 64), ("u4294967296", 4294967296)] {
            let err = parse_storage_type(&mut TypeParser::new(bad)).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::IllegalStorageTypeSize(width), "{}", bad);
        }
    }

    #[test]
    fn quantile_type_forms() {
        assert_eq!(
            parse_quantile_type(&mut TypeParser::new("u64")).unwrap(),
            QuantileType::Integer { width: 64, signed: false }
        );
        assert_eq!(
            parse_quantile_type(&mut TypeParser::new("f16")).unwrap(),
            QuantileType::Float(FloatKind::F16)
        );
        assert_eq!(
            parse_quantile_type(&mut TypeParser::new("index")).unwrap_err().kind,
            ParseErrorKind::IllegalQuantileTypeAlias
        );
    }

    #[test]
    fn storage_range_default_and_override() {
        let i8s = StorageType::integer(8, true);
        let mut p = TypeParser::new(":");
        assert_eq!(parse_storage_range(&mut p, &i8s).unwrap(), (-128, 127));
        assert_eq!(p.offset(), 0);

        let mut p = TypeParser::new("<-100:100>");
        assert_eq!(parse_storage_range(&mut p, &i8s).unwrap(), (-100, 100));

        let err = parse_storage_range(&mut TypeParser::new("<-129:0>"), &i8s).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::IllegalStorageMinimum(-129));
        assert_eq!(err.location.offset, 1);

        let err = parse_storage_range(&mut TypeParser::new("<0:128>"), &i8s).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::IllegalStorageMaximum(128));
        assert_eq!(err.location.offset, 3);
    }

    #[test]
    fn scale_zero_point_default() {
        let sz = parse_scale_zero_point(&mut TypeParser::new("0.25")).unwrap();
        assert_eq!(sz, ScaleZeroPoint::new(0.25, 0));
        let sz = parse_scale_zero_point(&mut TypeParser::new("3:-4")).unwrap();
        assert_eq!(sz, ScaleZeroPoint::new(3.0, -4));
    }
}
