//! Element types the reduction engine is generic over
//!
//! [`Scalar`] is the minimum an element needs to flow through the engine:
//! it is copied into per-task partials, compared against terminal values and
//! shared read-only across worker threads. [`Arithmetic`] adds the numeric
//! operations the built-in PLUS/TIMES/MIN/MAX monoids are made of.

use num_traits::{Bounded, Float, WrappingAdd, WrappingMul};
use std::fmt::Debug;

/// An element type stored in a matrix value array
pub trait Scalar: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Short type name used in monoid names and the disable list (`int8`, `fp64`, ...)
    const TYPE_NAME: &'static str;
}

/// Numeric element types with the operations of the built-in arithmetic monoids
///
/// Integer addition and multiplication wrap on overflow. Floating-point
/// `min`/`max` ignore a NaN operand.
pub trait Arithmetic: Scalar {
    /// True for `f32`/`f64`
    const IS_FLOAT: bool;

    /// Additive identity
    fn zero() -> Self;
    /// Multiplicative identity
    fn one() -> Self;
    /// Smallest value (`MIN` for integers, `-inf` for floats)
    fn lowest() -> Self;
    /// Largest value (`MAX` for integers, `+inf` for floats)
    fn highest() -> Self;

    fn plus(a: Self, b: Self) -> Self;
    fn times(a: Self, b: Self) -> Self;
    fn min(a: Self, b: Self) -> Self;
    fn max(a: Self, b: Self) -> Self;
}

impl Scalar for bool {
    const TYPE_NAME: &'static str = "bool";
}

macro_rules! impl_integer {
    ($($t:ty => $name:literal),* $(,)?) => {$(
        impl Scalar for $t {
            const TYPE_NAME: &'static str = $name;
        }

        impl Arithmetic for $t {
            const IS_FLOAT: bool = false;

            #[inline]
            fn zero() -> Self { 0 }
            #[inline]
            fn one() -> Self { 1 }
            #[inline]
            fn lowest() -> Self { <$t as Bounded>::min_value() }
            #[inline]
            fn highest() -> Self { <$t as Bounded>::max_value() }
            #[inline]
            fn plus(a: Self, b: Self) -> Self { WrappingAdd::wrapping_add(&a, &b) }
            #[inline]
            fn times(a: Self, b: Self) -> Self { WrappingMul::wrapping_mul(&a, &b) }
            #[inline]
            fn min(a: Self, b: Self) -> Self { if b < a { b } else { a } }
            #[inline]
            fn max(a: Self, b: Self) -> Self { if b > a { b } else { a } }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty => $name:literal),* $(,)?) => {$(
        impl Scalar for $t {
            const TYPE_NAME: &'static str = $name;
        }

        impl Arithmetic for $t {
            const IS_FLOAT: bool = true;

            #[inline]
            fn zero() -> Self { 0.0 }
            #[inline]
            fn one() -> Self { 1.0 }
            #[inline]
            fn lowest() -> Self { <$t as Float>::neg_infinity() }
            #[inline]
            fn highest() -> Self { <$t as Float>::infinity() }
            #[inline]
            fn plus(a: Self, b: Self) -> Self { a + b }
            #[inline]
            fn times(a: Self, b: Self) -> Self { a * b }
            #[inline]
            fn min(a: Self, b: Self) -> Self { Float::min(a, b) }
            #[inline]
            fn max(a: Self, b: Self) -> Self { Float::max(a, b) }
        }
    )*};
}

impl_integer! {
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
}

impl_float! {
    f32 => "fp32",
    f64 => "fp64",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_ops_wrap() {
        assert_eq!(<u8 as Arithmetic>::plus(250, 10), 4);
        assert_eq!(<i8 as Arithmetic>::times(64, 4), 0);
        assert_eq!(<i16 as Arithmetic>::lowest(), i16::MIN);
    }

    #[test]
    fn test_float_min_max_ignore_nan() {
        assert_eq!(<f64 as Arithmetic>::min(f64::NAN, 2.0), 2.0);
        assert_eq!(<f32 as Arithmetic>::max(1.0, f32::NAN), 1.0);
        assert_eq!(<f64 as Arithmetic>::highest(), f64::INFINITY);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(<u64 as Scalar>::TYPE_NAME, "uint64");
        assert_eq!(<bool as Scalar>::TYPE_NAME, "bool");
        assert_eq!(<f32 as Scalar>::TYPE_NAME, "fp32");
    }
}
