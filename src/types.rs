//! Value types carried by IR statements
//!
//! Every statement produces exactly one result value, described by a
//! [`VectorType`]: a scalar element kind plus a lane count ("width") for
//! SIMD-style vectorization. A width-N value represents N scalar lanes
//! computed together. Side-effect-only statements carry the `Void` marker.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Untyped marker for statements that produce no data value
    Void,
}

impl DataType {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::I8
                | DataType::I16
                | DataType::I32
                | DataType::I64
                | DataType::U8
                | DataType::U16
                | DataType::U32
                | DataType::U64
        )
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            DataType::I8 | DataType::I16 | DataType::I32 | DataType::I64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::F32 | DataType::F64)
    }

    /// Storage size of one scalar element
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DataType::I8 | DataType::U8 => 1,
            DataType::I16 | DataType::U16 => 2,
            DataType::I32 | DataType::U32 | DataType::F32 => 4,
            DataType::I64 | DataType::U64 | DataType::F64 => 8,
            DataType::Void => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::I8 => "i8",
            DataType::I16 => "i16",
            DataType::I32 => "i32",
            DataType::I64 => "i64",
            DataType::U8 => "u8",
            DataType::U16 => "u16",
            DataType::U32 => "u32",
            DataType::U64 => "u64",
            DataType::F32 => "f32",
            DataType::F64 => "f64",
            DataType::Void => "void",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result type of a statement: element kind + lane count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VectorType {
    pub dt: DataType,
    pub width: usize,
}

impl VectorType {
    /// Void marker type for side-effect-only statements
    pub const VOID: VectorType = VectorType {
        dt: DataType::Void,
        width: 1,
    };

    pub fn new(dt: DataType, width: usize) -> Self {
        Self { dt, width }
    }

    pub fn scalar(dt: DataType) -> Self {
        Self { dt, width: 1 }
    }

    pub fn is_void(&self) -> bool {
        self.dt == DataType::Void
    }

    /// Storage size of the whole vector value
    pub fn size_in_bytes(&self) -> usize {
        self.dt.size_in_bytes() * self.width
    }
}

impl fmt::Display for VectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 1 {
            write!(f, "{}", self.dt)
        } else {
            write!(f, "{}x{}", self.dt, self.width)
        }
    }
}
