//! Host numeric types referenced by quantized type descriptors.
//!
//! The registry is closed: a type reference in descriptor text is an identifier
//! naming one of the builtin integer or floating-point types below.

use std::fmt;

/// Largest integer width the registry recognizes (`i16777215`).
pub const MAX_INTEGER_WIDTH: u32 = (1 << 24) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    /// `i<w>`
    Signless,
    /// `si<w>`
    Signed,
    /// `ui<w>`
    Unsigned,
}

/// Floating-point kinds, including the two 8-bit encodings usable as storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F8E5M2,
    F8E4M3FN,
    BF16,
    F16,
    TF32,
    F32,
    F64,
    F80,
    F128,
}

impl FloatKind {
    pub fn name(self) -> &'static str {
        match self {
            FloatKind::F8E5M2 => "f8E5M2",
            FloatKind::F8E4M3FN => "f8E4M3FN",
            FloatKind::BF16 => "bf16",
            FloatKind::F16 => "f16",
            FloatKind::TF32 => "tf32",
            FloatKind::F32 => "f32",
            FloatKind::F64 => "f64",
            FloatKind::F80 => "f80",
            FloatKind::F128 => "f128",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "f8E5M2" => FloatKind::F8E5M2,
            "f8E4M3FN" => FloatKind::F8E4M3FN,
            "bf16" => FloatKind::BF16,
            "f16" => FloatKind::F16,
            "tf32" => FloatKind::TF32,
            "f32" => FloatKind::F32,
            "f64" => FloatKind::F64,
            "f80" => FloatKind::F80,
            "f128" => FloatKind::F128,
            _ => return None,
        })
    }

    pub fn width(self) -> u32 {
        match self {
            FloatKind::F8E5M2 | FloatKind::F8E4M3FN => 8,
            FloatKind::BF16 | FloatKind::F16 => 16,
            FloatKind::TF32 => 19,
            FloatKind::F32 => 32,
            FloatKind::F64 => 64,
            FloatKind::F80 => 80,
            FloatKind::F128 => 128,
        }
    }

    /// True for the 8-bit float encodings that may serve as a storage type.
    pub fn is_float8(self) -> bool {
        matches!(self, FloatKind::F8E5M2 | FloatKind::F8E4M3FN)
    }
}

impl fmt::Display for FloatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A builtin type as named by a type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericType {
    Integer { width: u32, signedness: Signedness },
    Float(FloatKind),
    Index,
}

impl NumericType {
    /// Resolve an identifier to a builtin type, if it names one.
    pub fn from_keyword(s: &str) -> Option<Self> {
        if s == "index" {
            return Some(NumericType::Index);
        }
        if let Some(kind) = FloatKind::from_name(s) {
            return Some(NumericType::Float(kind));
        }
        let (signedness, digits) = if let Some(rest) = s.strip_prefix("si") {
            (Signedness::Signed, rest)
        } else if let Some(rest) = s.strip_prefix("ui") {
            (Signedness::Unsigned, rest)
        } else if let Some(rest) = s.strip_prefix('i') {
            (Signedness::Signless, rest)
        } else {
            return None;
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let width: u32 = digits.parse().ok()?;
        if width > MAX_INTEGER_WIDTH {
            return None;
        }
        Some(NumericType::Integer { width, signedness })
    }

    /// `(width, is_signed)` for integer types; signless counts as signed.
    pub fn as_integer(&self) -> Option<(u32, bool)> {
        match *self {
            NumericType::Integer { width, signedness } => {
                Some((width, signedness != Signedness::Unsigned))
            }
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<FloatKind> {
        match *self {
            NumericType::Float(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericType::Integer { width, signedness } => {
                let prefix = match signedness {
                    Signedness::Signless => "i",
                    Signedness::Signed => "si",
                    Signedness::Unsigned => "ui",
                };
                write!(f, "{}{}", prefix, width)
            }
            NumericType::Float(kind) => fmt::Display::fmt(kind, f),
            NumericType::Index => f.write_str("index"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_integers() {
        assert_eq!(
            NumericType::from_keyword("i8"),
            Some(NumericType::Integer { width: 8, signedness: Signedness::Signless })
        );
        assert_eq!(
            NumericType::from_keyword("si16"),
            Some(NumericType::Integer { width: 16, signedness: Signedness::Signed })
        );
        assert_eq!(
            NumericType::from_keyword("ui4"),
            Some(NumericType::Integer { width: 4, signedness: Signedness::Unsigned })
        );
        assert_eq!(NumericType::from_keyword("ui4").and_then(|t| t.as_integer()), Some((4, false)));
        assert_eq!(NumericType::from_keyword("i4").and_then(|t| t.as_integer()), Some((4, true)));
    }

    #[test]
    fn keyword_not_a_type() {
        assert_eq!(NumericType::from_keyword("u8"), None);
        assert_eq!(NumericType::from_keyword("i"), None);
        assert_eq!(NumericType::from_keyword("i8x"), None);
        assert_eq!(NumericType::from_keyword("i+8"), None);
        assert_eq!(NumericType::from_keyword("i99999999"), None);
        assert_eq!(NumericType::from_keyword("uniform"), None);
    }

    #[test]
    fn keyword_floats_and_index() {
        assert_eq!(NumericType::from_keyword("f8E4M3FN"), Some(NumericType::Float(FloatKind::F8E4M3FN)));
        assert_eq!(NumericType::from_keyword("bf16"), Some(NumericType::Float(FloatKind::BF16)));
        assert_eq!(NumericType::from_keyword("index"), Some(NumericType::Index));
        assert!(FloatKind::F8E5M2.is_float8());
        assert!(!FloatKind::F16.is_float8());
    }

    #[test]
    fn spelling_matches_keyword() {
        for s in ["i1", "si32", "ui7", "f8E5M2", "f8E4M3FN", "bf16", "tf32", "f64", "f128", "index"] {
            let ty = NumericType::from_keyword(s).expect(s);
            assert_eq!(ty.to_string(), s);
        }
    }
}
