use std::fmt;

/// Represents a HCL number.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Number {
    /// Represents a signed integer.
    Int(i64),
    /// Represents an unsigned integer that does not fit into an `i64`.
    UInt(u64),
    /// Represents a float.
    Float(f64),
}

impl Number {
    /// Returns `false` for floats that are `NaN` or infinite. HCL has no literal for these.
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Float(float) => float.is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(int) => write!(f, "{}", int),
            Number::UInt(uint) => write!(f, "{}", uint),
            // `Debug` keeps the fraction of whole floats, e.g. `1.0` instead of `1`.
            Number::Float(float) => write!(f, "{:?}", float),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::Int(n as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, isize, u8, u16, u32);

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(int) => Number::Int(int),
            Err(_) => Number::UInt(n),
        }
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::from(n as u64)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        // Widening directly would expose binary noise, e.g. `0.1f32` as `0.10000000149011612`.
        Number::Float(n.to_string().parse().unwrap_or(n as f64))
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::Float(n)
    }
}
