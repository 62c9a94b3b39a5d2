//! Canonical textual form of quantized type descriptors.
//!
//! Fields equal to their defaults are omitted: the storage range when it is the
//! natural range of the storage type, and zero points equal to 0. Per-axis
//! scale lists are always braced; per-layer scales never are.

use crate::storage::{QuantileType, StorageKind, StorageSpec, StorageType};
use crate::types::*;
use std::fmt::{self, Display, Formatter};

/// Print a descriptor in its canonical spelling.
pub fn print(ty: &QuantizedType) -> String {
    ty.to_string()
}

/// Shortest spelling that parses back to the same value (`1.0`, `0.1`, `1e-7`).
fn write_float(f: &mut Formatter<'_>, v: f64) -> fmt::Result {
    write!(f, "{:?}", v)
}

fn write_list<T>(
    f: &mut Formatter<'_>,
    items: &[T],
    mut item: impl FnMut(&mut Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    f.write_str("{")?;
    for (i, x) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        item(f, x)?;
    }
    f.write_str("}")
}

fn write_quantiles(f: &mut Formatter<'_>, quantiles: &[f64]) -> fmt::Result {
    write_list(f, quantiles, |f, q| write_float(f, *q))
}

fn write_scale_zeros(f: &mut Formatter<'_>, scale_zeros: &[ScaleZeroPoint]) -> fmt::Result {
    write_list(f, scale_zeros, |f, sz| sz.fmt(f))
}

impl Display for StorageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind() {
            StorageKind::Float8E5M2 => f.write_str("f8E5M2"),
            StorageKind::Float8E4M3FN => f.write_str("f8E4M3FN"),
            StorageKind::Integer if self.is_signed() => write!(f, "i{}", self.width()),
            StorageKind::Integer => write!(f, "u{}", self.width()),
        }
    }
}

impl Display for StorageSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.storage_type().fmt(f)?;
        if !self.has_natural_range() {
            write!(f, "<{}:{}>", self.min(), self.max())?;
        }
        Ok(())
    }
}

impl Display for QuantileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            QuantileType::Integer { width, signed: false } => write!(f, "u{}", width),
            QuantileType::Integer { width, signed: true } => write!(f, "i{}", width),
            QuantileType::Float(kind) => kind.fmt(f),
        }
    }
}

impl Display for ScaleZeroPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_float(f, self.scale)?;
        if self.zero_point != 0 {
            write!(f, ":{}", self.zero_point)?;
        }
        Ok(())
    }
}

impl Display for AnyQuantizedType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "any<{}", self.storage())?;
        if let Some(expressed) = self.expressed() {
            write!(f, ":{}", expressed)?;
        }
        f.write_str(">")
    }
}

impl Display for UniformQuantizedType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "uniform<{}:{}, {}>", self.storage(), self.expressed(), self.scale_zero())
    }
}

impl Display for UniformQuantizedPerAxisType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "uniform<{}:{}:{}, ", self.storage(), self.expressed(), self.axis())?;
        write_scale_zeros(f, self.scale_zeros())?;
        f.write_str(">")
    }
}

impl Display for QuantileQuantizedType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "quantile<{}:{}:{}, ", self.storage(), self.quantile_type(), self.expressed())?;
        write_quantiles(f, self.quantiles())?;
        write!(f, ":{}>", self.scale_zero())
    }
}

impl Display for QuantileQuantizedPerAxisType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quantile<{}:{}:{}:{}, ",
            self.storage(),
            self.quantile_type(),
            self.expressed(),
            self.axis()
        )?;
        write_quantiles(f, self.quantiles())?;
        f.write_str(":")?;
        write_scale_zeros(f, self.scale_zeros())?;
        f.write_str(">")
    }
}

impl Display for CalibratedQuantizedType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "calibrated<{}<", self.expressed())?;
        write_float(f, self.min())?;
        f.write_str(":")?;
        write_float(f, self.max())?;
        f.write_str(">>")
    }
}

impl Display for QuantizedType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            QuantizedType::Any(t) => t.fmt(f),
            QuantizedType::Uniform(t) => t.fmt(f),
            QuantizedType::UniformPerAxis(t) => t.fmt(f),
            QuantizedType::Quantile(t) => t.fmt(f),
            QuantizedType::QuantilePerAxis(t) => t.fmt(f),
            QuantizedType::Calibrated(t) => t.fmt(f),
        }
    }
}
