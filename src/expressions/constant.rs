//! Constant and null literals.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{ConstructionError, Result};
use crate::metadata::{PrimitiveTypeKind, TypeOracle, TypeUsageRef};

// ============================================================================
// Constant payloads
// ============================================================================

/// Owned, immutable byte buffer.
///
/// The buffer is never handed out by reference outside the crate: every
/// clone, and every read through [`ConstantExpression::value`], produces an
/// independent copy, so no holder can observe another holder's writes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BinaryValue(Box<[u8]>);

impl BinaryValue {
    /// Copies `bytes` into a new buffer.
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a fresh copy of the bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Converts this copy into a vector the caller may mutate freely.
    pub fn into_vec(self) -> Vec<u8> {
        self.0.into_vec()
    }
}

impl From<Vec<u8>> for BinaryValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }
}

impl From<&[u8]> for BinaryValue {
    fn from(bytes: &[u8]) -> Self {
        Self::copy_from(bytes)
    }
}

impl fmt::Debug for BinaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.0.iter() {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// Fixed-point decimal: `mantissa * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecimalValue {
    mantissa: i128,
    scale: u32,
}

impl DecimalValue {
    /// Largest scale the model's decimal type carries.
    pub const MAX_SCALE: u32 = 28;

    pub fn new(mantissa: i128, scale: u32) -> Result<Self> {
        if scale > Self::MAX_SCALE {
            return Err(ConstructionError::ScaleOutOfRange {
                argument: "scale",
                scale,
                max: Self::MAX_SCALE,
            });
        }
        Ok(Self { mantissa, scale })
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        let sign = if self.mantissa < 0 { "-" } else { "" };
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

/// Value carried by a constant. Enum constants carry their underlying
/// integral value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Binary(BinaryValue),
    Boolean(bool),
    Byte(u8),
    Decimal(DecimalValue),
    Double(f64),
    Guid(u128),
    Single(f32),
    SByte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    String(SmolStr),
}

impl ConstantValue {
    /// Primitive kind this value is a runtime representation of.
    pub fn kind(&self) -> PrimitiveTypeKind {
        match self {
            ConstantValue::Binary(_) => PrimitiveTypeKind::Binary,
            ConstantValue::Boolean(_) => PrimitiveTypeKind::Boolean,
            ConstantValue::Byte(_) => PrimitiveTypeKind::Byte,
            ConstantValue::Decimal(_) => PrimitiveTypeKind::Decimal,
            ConstantValue::Double(_) => PrimitiveTypeKind::Double,
            ConstantValue::Guid(_) => PrimitiveTypeKind::Guid,
            ConstantValue::Single(_) => PrimitiveTypeKind::Single,
            ConstantValue::SByte(_) => PrimitiveTypeKind::SByte,
            ConstantValue::Int16(_) => PrimitiveTypeKind::Int16,
            ConstantValue::Int32(_) => PrimitiveTypeKind::Int32,
            ConstantValue::Int64(_) => PrimitiveTypeKind::Int64,
            ConstantValue::String(_) => PrimitiveTypeKind::String,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Binary(b) => write!(f, "{b:?}"),
            ConstantValue::Boolean(b) => write!(f, "{b}"),
            ConstantValue::Byte(v) => write!(f, "{v}"),
            ConstantValue::Decimal(v) => write!(f, "{v}"),
            ConstantValue::Double(v) => write!(f, "{v}"),
            ConstantValue::Guid(v) => {
                let hex = format!("{v:032x}");
                write!(
                    f,
                    "{}-{}-{}-{}-{}",
                    &hex[0..8],
                    &hex[8..12],
                    &hex[12..16],
                    &hex[16..20],
                    &hex[20..32]
                )
            }
            ConstantValue::Single(v) => write!(f, "{v}"),
            ConstantValue::SByte(v) => write!(f, "{v}"),
            ConstantValue::Int16(v) => write!(f, "{v}"),
            ConstantValue::Int32(v) => write!(f, "{v}"),
            ConstantValue::Int64(v) => write!(f, "{v}"),
            ConstantValue::String(s) => write!(f, "'{s}'"),
        }
    }
}

macro_rules! impl_constant_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ConstantValue {
                fn from(value: $ty) -> Self {
                    ConstantValue::$variant(value.into())
                }
            }
        )*
    };
}

impl_constant_from! {
    bool => Boolean,
    u8 => Byte,
    i8 => SByte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Single,
    f64 => Double,
    DecimalValue => Decimal,
    Vec<u8> => Binary,
    BinaryValue => Binary,
    &str => String,
    SmolStr => String,
    String => String,
}

// ============================================================================
// Nodes
// ============================================================================

/// A constant scalar or enum value.
#[derive(Debug, Clone)]
pub struct ConstantExpression {
    result_type: TypeUsageRef,
    value: ConstantValue,
}

impl ConstantExpression {
    /// Builds a constant, checking that `value` is a runtime representation
    /// of `result_type` (enums are compared through their underlying type).
    pub fn new(
        oracle: &dyn TypeOracle,
        result_type: TypeUsageRef,
        value: impl Into<ConstantValue>,
    ) -> Result<Self> {
        let value = value.into();
        if !oracle.is_scalar(&result_type) {
            return Err(ConstructionError::UnexpectedType {
                argument: "result_type",
                expected: "a primitive or enum type",
                found: result_type.to_string(),
            });
        }
        let expected = oracle.underlying_primitive(&result_type);
        if expected != Some(value.kind()) {
            return Err(ConstructionError::ValueTypeMismatch {
                argument: "value",
                expected: result_type.to_string(),
                found: value.kind().to_string(),
            });
        }
        Ok(Self { result_type, value })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    /// Returns the constant value. Binary values are copied on every read.
    pub fn value(&self) -> ConstantValue {
        self.value.clone()
    }

    /// Direct access for in-crate passes that only read the value.
    pub(crate) fn value_ref(&self) -> &ConstantValue {
        &self.value
    }
}

/// A typed null literal.
#[derive(Debug, Clone)]
pub struct NullExpression {
    result_type: TypeUsageRef,
}

impl NullExpression {
    pub fn new(result_type: TypeUsageRef) -> Self {
        Self { result_type }
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }
}
