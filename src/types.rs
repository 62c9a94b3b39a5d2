//! Quantized type descriptors.
//!
//! Descriptors are immutable values built through checked constructors; the
//! parser is one client of those constructors, program logic is another.

use crate::error::DescriptorError;
use crate::numeric::{FloatKind, MAX_INTEGER_WIDTH};
use crate::storage::{QuantileType, StorageSpec};

/// Affine parameters: `real ~= scale * (stored - zero_point)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleZeroPoint {
    pub scale: f64,
    pub zero_point: i64,
}

impl ScaleZeroPoint {
    pub fn new(scale: f64, zero_point: i64) -> Self {
        ScaleZeroPoint { scale, zero_point }
    }

    fn check(&self) -> Result<(), DescriptorError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(DescriptorError::IllegalScale(self.scale));
        }
        Ok(())
    }
}

fn check_scales(scale_zeros: &[ScaleZeroPoint]) -> Result<(), DescriptorError> {
    if scale_zeros.is_empty() {
        return Err(DescriptorError::EmptyScales);
    }
    scale_zeros.iter().try_for_each(ScaleZeroPoint::check)
}

fn check_axis(axis: i32) -> Result<(), DescriptorError> {
    if axis < 0 {
        return Err(DescriptorError::IllegalAxis(axis));
    }
    Ok(())
}

fn check_quantile_type(quantile_type: QuantileType) -> Result<(), DescriptorError> {
    match quantile_type {
        QuantileType::Integer { width, .. } if width > MAX_INTEGER_WIDTH => {
            Err(DescriptorError::IllegalQuantileWidth(width))
        }
        _ => Ok(()),
    }
}

fn check_quantiles(quantiles: &[f64]) -> Result<(), DescriptorError> {
    if quantiles.is_empty() {
        return Err(DescriptorError::EmptyQuantiles);
    }
    match quantiles.iter().find(|q| !q.is_finite()) {
        Some(&q) => Err(DescriptorError::IllegalQuantile(q)),
        None => Ok(()),
    }
}

/// Storage type only; no scale or zero point.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyQuantizedType {
    storage: StorageSpec,
    expressed: Option<FloatKind>,
}

impl AnyQuantizedType {
    pub fn new(storage: StorageSpec, expressed: Option<FloatKind>) -> Result<Self, DescriptorError> {
        Ok(AnyQuantizedType { storage, expressed })
    }

    pub fn storage(&self) -> &StorageSpec {
        &self.storage
    }

    pub fn expressed(&self) -> Option<FloatKind> {
        self.expressed
    }
}

/// Per-layer uniform quantization.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformQuantizedType {
    storage: StorageSpec,
    expressed: FloatKind,
    scale_zero: ScaleZeroPoint,
}

impl UniformQuantizedType {
    pub fn new(
        storage: StorageSpec,
        expressed: FloatKind,
        scale_zero: ScaleZeroPoint,
    ) -> Result<Self, DescriptorError> {
        scale_zero.check()?;
        Ok(UniformQuantizedType { storage, expressed, scale_zero })
    }

    pub fn storage(&self) -> &StorageSpec {
        &self.storage
    }

    pub fn expressed(&self) -> FloatKind {
        self.expressed
    }

    pub fn scale_zero(&self) -> ScaleZeroPoint {
        self.scale_zero
    }
}

/// Uniform quantization with one scale/zero point per slice of `axis`.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformQuantizedPerAxisType {
    storage: StorageSpec,
    expressed: FloatKind,
    axis: i32,
    scale_zeros: Vec<ScaleZeroPoint>,
}

impl UniformQuantizedPerAxisType {
    pub fn new(
        storage: StorageSpec,
        expressed: FloatKind,
        axis: i32,
        scale_zeros: Vec<ScaleZeroPoint>,
    ) -> Result<Self, DescriptorError> {
        check_axis(axis)?;
        check_scales(&scale_zeros)?;
        Ok(UniformQuantizedPerAxisType { storage, expressed, axis, scale_zeros })
    }

    pub fn storage(&self) -> &StorageSpec {
        &self.storage
    }

    pub fn expressed(&self) -> FloatKind {
        self.expressed
    }

    pub fn axis(&self) -> i32 {
        self.axis
    }

    pub fn scale_zeros(&self) -> &[ScaleZeroPoint] {
        &self.scale_zeros
    }
}

/// Per-layer quantization through a quantile lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileQuantizedType {
    storage: StorageSpec,
    quantile_type: QuantileType,
    expressed: FloatKind,
    quantiles: Vec<f64>,
    scale_zero: ScaleZeroPoint,
}

impl QuantileQuantizedType {
    pub fn new(
        storage: StorageSpec,
        quantile_type: QuantileType,
        expressed: FloatKind,
        quantiles: Vec<f64>,
        scale_zero: ScaleZeroPoint,
    ) -> Result<Self, DescriptorError> {
        check_quantile_type(quantile_type)?;
        check_quantiles(&quantiles)?;
        scale_zero.check()?;
        Ok(QuantileQuantizedType { storage, quantile_type, expressed, quantiles, scale_zero })
    }

    pub fn storage(&self) -> &StorageSpec {
        &self.storage
    }

    pub fn quantile_type(&self) -> QuantileType {
        self.quantile_type
    }

    pub fn expressed(&self) -> FloatKind {
        self.expressed
    }

    pub fn quantiles(&self) -> &[f64] {
        &self.quantiles
    }

    pub fn scale_zero(&self) -> ScaleZeroPoint {
        self.scale_zero
    }
}

/// Quantile quantization with one scale/zero point per slice; the table is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileQuantizedPerAxisType {
    storage: StorageSpec,
    quantile_type: QuantileType,
    expressed: FloatKind,
    axis: i32,
    quantiles: Vec<f64>,
    scale_zeros: Vec<ScaleZeroPoint>,
}

impl QuantileQuantizedPerAxisType {
    pub fn new(
        storage: StorageSpec,
        quantile_type: QuantileType,
        expressed: FloatKind,
        axis: i32,
        quantiles: Vec<f64>,
        scale_zeros: Vec<ScaleZeroPoint>,
    ) -> Result<Self, DescriptorError> {
        check_axis(axis)?;
        check_quantile_type(quantile_type)?;
        check_quantiles(&quantiles)?;
        check_scales(&scale_zeros)?;
        Ok(QuantileQuantizedPerAxisType {
            storage,
            quantile_type,
            expressed,
            axis,
            quantiles,
            scale_zeros,
        })
    }

    pub fn storage(&self) -> &StorageSpec {
        &self.storage
    }

    pub fn quantile_type(&self) -> QuantileType {
        self.quantile_type
    }

    pub fn expressed(&self) -> FloatKind {
        self.expressed
    }

    pub fn axis(&self) -> i32 {
        self.axis
    }

    pub fn quantiles(&self) -> &[f64] {
        &self.quantiles
    }

    pub fn scale_zeros(&self) -> &[ScaleZeroPoint] {
        &self.scale_zeros
    }
}

/// Observed real-valued range, before a quantization scheme is chosen.
///
/// `min` and `max` are not ordered against each other.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedQuantizedType {
    expressed: FloatKind,
    min: f64,
    max: f64,
}

impl CalibratedQuantizedType {
    pub fn new(expressed: FloatKind, min: f64, max: f64) -> Result<Self, DescriptorError> {
        for bound in [min, max] {
            if !bound.is_finite() {
                return Err(DescriptorError::IllegalCalibratedBound(bound));
            }
        }
        Ok(CalibratedQuantizedType { expressed, min, max })
    }

    pub fn expressed(&self) -> FloatKind {
        self.expressed
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Any quantized type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizedType {
    Any(AnyQuantizedType),
    Uniform(UniformQuantizedType),
    UniformPerAxis(UniformQuantizedPerAxisType),
    Quantile(QuantileQuantizedType),
    QuantilePerAxis(QuantileQuantizedPerAxisType),
    Calibrated(CalibratedQuantizedType),
}

impl QuantizedType {
    /// Storage spec; `None` for calibrated types, which have no storage.
    pub fn storage(&self) -> Option<&StorageSpec> {
        match self {
            QuantizedType::Any(t) => Some(t.storage()),
            QuantizedType::Uniform(t) => Some(t.storage()),
            QuantizedType::UniformPerAxis(t) => Some(t.storage()),
            QuantizedType::Quantile(t) => Some(t.storage()),
            QuantizedType::QuantilePerAxis(t) => Some(t.storage()),
            QuantizedType::Calibrated(_) => None,
        }
    }

    pub fn expressed(&self) -> Option<FloatKind> {
        match self {
            QuantizedType::Any(t) => t.expressed(),
            QuantizedType::Uniform(t) => Some(t.expressed()),
            QuantizedType::UniformPerAxis(t) => Some(t.expressed()),
            QuantizedType::Quantile(t) => Some(t.expressed()),
            QuantizedType::QuantilePerAxis(t) => Some(t.expressed()),
            QuantizedType::Calibrated(t) => Some(t.expressed()),
        }
    }

    /// Leading keyword of the textual form.
    pub fn keyword(&self) -> &'static str {
        match self {
            QuantizedType::Any(_) => "any",
            QuantizedType::Uniform(_) | QuantizedType::UniformPerAxis(_) => "uniform",
            QuantizedType::Quantile(_) | QuantizedType::QuantilePerAxis(_) => "quantile",
            QuantizedType::Calibrated(_) => "calibrated",
        }
    }

    pub fn axis(&self) -> Option<i32> {
        match self {
            QuantizedType::UniformPerAxis(t) => Some(t.axis()),
            QuantizedType::QuantilePerAxis(t) => Some(t.axis()),
            _ => None,
        }
    }
}

impl From<AnyQuantizedType> for QuantizedType {
    fn from(t: AnyQuantizedType) -> Self {
        QuantizedType::Any(t)
    }
}

impl From<UniformQuantizedType> for QuantizedType {
    fn from(t: UniformQuantizedType) -> Self {
        QuantizedType::Uniform(t)
    }
}

impl From<UniformQuantizedPerAxisType> for QuantizedType {
    fn from(t: UniformQuantizedPerAxisType) -> Self {
        QuantizedType::UniformPerAxis(t)
    }
}

impl From<QuantileQuantizedType> for QuantizedType {
    fn from(t: QuantileQuantizedType) -> Self {
        QuantizedType::Quantile(t)
    }
}

impl From<QuantileQuantizedPerAxisType> for QuantizedType {
    fn from(t: QuantileQuantizedPerAxisType) -> Self {
        QuantizedType::QuantilePerAxis(t)
    }
}

impl From<CalibratedQuantizedType> for QuantizedType {
    fn from(t: CalibratedQuantizedType) -> Self {
        QuantizedType::Calibrated(t)
    }
}
