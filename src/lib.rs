//! # quantdsl — Quantized Type Descriptors
//!
//! Parser and canonical printer for the textual form of quantized numeric
//! types: how a real number is held in a narrow integer (or 8-bit float)
//! code, plus the parameters needed to recover an approximate real value.
//!
//! ## Descriptor kinds
//!
//! - **any**: storage type only, optional expressed type
//! - **uniform**: affine `scale[:zeroPoint]`, per layer or per axis
//! - **quantile**: quantile lookup table plus scale/zero point, per layer or per axis
//! - **calibrated**: observed `min:max` range of the expressed type, no storage
//!
//! ## Examples
//!
//! ```text
//! any<i8:f32>
//! uniform<i8<-127:127>:f32, 0.5:-3>
//! uniform<u8:f32:1, {2.0:128,0.25}>
//! quantile<i8:f16:f32, {-1.0,0.0,1.0}:0.1>
//! calibrated<f32<-1.0:1.0>>
//! ```
//!
//! ## Usage
//!
//! ```
//! let ty = quantdsl::parse("uniform<i8<-128:127>:f32, 1.0:0>").unwrap();
//! assert_eq!(quantdsl::print(&ty), "uniform<i8:f32, 1.0>");
//! ```
//!
//! Defaults are omitted when printing, so `parse(print(t)) == t` and the printed
//! form is stable under a second round trip.

pub mod error;
pub mod format;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod printer;
pub mod storage;
pub mod types;

pub use error::{DescriptorError, Location, ParseError, ParseErrorKind};
pub use numeric::{FloatKind, NumericType, Signedness, MAX_INTEGER_WIDTH};
pub use parser::{parse, TypeParser};
pub use printer::print;
pub use storage::{natural_bounds, QuantileType, StorageKind, StorageSpec, StorageType, MAX_STORAGE_BITS};
pub use types::{
    AnyQuantizedType, CalibratedQuantizedType, QuantileQuantizedPerAxisType, QuantileQuantizedType,
    QuantizedType, ScaleZeroPoint, UniformQuantizedPerAxisType, UniformQuantizedType,
};
