//! Storage types, their natural code ranges, and quantile-table entry types.

use crate::error::DescriptorError;
use crate::numeric::{FloatKind, NumericType};

/// Widest integer storage a quantized type may use.
pub const MAX_STORAGE_BITS: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Integer,
    Float8E5M2,
    Float8E4M3FN,
}

/// The narrow encoding that holds a quantized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageType {
    kind: StorageKind,
    width: u32,
    signed: bool,
}

impl StorageType {
    pub fn integer(width: u32, signed: bool) -> Self {
        StorageType { kind: StorageKind::Integer, width, signed }
    }

    /// 8-bit float storage; always signed. `None` for any other float kind.
    pub fn float8(kind: FloatKind) -> Option<Self> {
        let kind = match kind {
            FloatKind::F8E5M2 => StorageKind::Float8E5M2,
            FloatKind::F8E4M3FN => StorageKind::Float8E4M3FN,
            _ => return None,
        };
        Some(StorageType { kind, width: 8, signed: true })
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }
}

/// Default `(min, max)` stored code for a storage type.
///
/// Both the range parser and the printer go through this function; a storage
/// range equal to it is never printed.
pub fn natural_bounds(ty: &StorageType) -> (i64, i64) {
    match ty.kind {
        StorageKind::Integer => {
            let w = ty.width.min(64);
            if w == 0 {
                return (0, 0);
            }
            let (min, max): (i128, i128) = if ty.signed {
                (-(1i128 << (w - 1)), (1i128 << (w - 1)) - 1)
            } else {
                (0, (1i128 << w) - 1)
            };
            (
                min.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
                max.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
            )
        }
        StorageKind::Float8E5M2 => (-57344, 57344),
        StorageKind::Float8E4M3FN => (-448, 448),
    }
}

/// A storage type plus its stored-code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageSpec {
    ty: StorageType,
    min: i64,
    max: i64,
}

impl StorageSpec {
    /// Storage with an explicit range, which may only narrow the natural one.
    pub fn new(ty: StorageType, min: i64, max: i64) -> Result<Self, DescriptorError> {
        if ty.width == 0 || ty.width > MAX_STORAGE_BITS {
            return Err(DescriptorError::IllegalStorageWidth(ty.width));
        }
        let (lo, hi) = natural_bounds(&ty);
        if min > max || min < lo || max > hi {
            return Err(DescriptorError::IllegalStorageRange { min, max });
        }
        Ok(StorageSpec { ty, min, max })
    }

    pub fn with_natural_range(ty: StorageType) -> Result<Self, DescriptorError> {
        let (min, max) = natural_bounds(&ty);
        StorageSpec::new(ty, min, max)
    }

    pub fn storage_type(&self) -> &StorageType {
        &self.ty
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn has_natural_range(&self) -> bool {
        natural_bounds(&self.ty) == (self.min, self.max)
    }
}

/// Type of the entries of a quantile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantileType {
    Integer { width: u32, signed: bool },
    Float(FloatKind),
}

impl QuantileType {
    /// Integer and float builtins qualify; `index` does not.
    pub fn from_numeric(ty: NumericType) -> Option<Self> {
        if let Some((width, signed)) = ty.as_integer() {
            return Some(QuantileType::Integer { width, signed });
        }
        ty.as_float().map(QuantileType::Float)
    }
}
