//! The built-in monoid catalogue
//!
//! | monoid | identity | terminal | panel |
//! |---|---|---|---|
//! | PLUS | 0 | none | 64 (1-byte types), 32 |
//! | TIMES | 1 | 0 for integers, none for floats | 64 (1-byte types), 32 |
//! | MIN | MAX / +inf | MIN / -inf | 16 |
//! | MAX | MIN / -inf | MAX / +inf | 16 |
//! | ANY | default | every value | 1 |
//! | LOR, LAND | false, true | true, false | 8 |
//! | LXOR, EQ | false, true | none | 8 |
//! | BOR, BAND | 0, all ones | all ones, 0 | 8 |
//! | BXOR, BXNOR | 0, all ones | none | 8 |

use num_traits::{PrimInt, Unsigned};

use super::Monoid;
use crate::types::{Arithmetic, Scalar};

impl<T: Arithmetic> Monoid<T> {
    /// Sum; integers wrap on overflow
    pub fn plus() -> Self {
        Monoid::new("plus", T::zero(), T::plus)
    }

    /// Product; zero is absorbing for integer types
    ///
    /// Floating-point products have no terminal since `0 * NaN` is NaN.
    pub fn times() -> Self {
        let m = Monoid::new("times", T::one(), T::times);
        if T::IS_FLOAT {
            m
        } else {
            m.with_terminal(T::zero())
        }
    }

    pub fn min() -> Self {
        Monoid::new("min", T::highest(), T::min)
            .with_terminal(T::lowest())
            .with_panel(16)
    }

    pub fn max() -> Self {
        Monoid::new("max", T::lowest(), T::max)
            .with_terminal(T::highest())
            .with_panel(16)
    }
}

impl<T: Scalar + Default> Monoid<T> {
    /// Returns any one of the live entries; the first one found ends the scan
    pub fn any() -> Self {
        Monoid::new("any", T::default(), |_, b| b)
            .with_any_terminal()
            .with_panel(1)
    }
}

impl Monoid<bool> {
    pub fn lor() -> Self {
        Monoid::new("lor", false, |a, b| a || b)
            .with_terminal(true)
            .with_panel(8)
    }

    pub fn land() -> Self {
        Monoid::new("land", true, |a, b| a && b)
            .with_terminal(false)
            .with_panel(8)
    }

    pub fn lxor() -> Self {
        Monoid::new("lxor", false, |a, b| a != b).with_panel(8)
    }

    /// Logical equality (LXNOR)
    pub fn eq() -> Self {
        Monoid::new("eq", true, |a, b| a == b).with_panel(8)
    }
}

impl<T: Scalar + PrimInt + Unsigned> Monoid<T> {
    pub fn bor() -> Self {
        Monoid::new("bor", T::zero(), |a: T, b: T| a | b)
            .with_terminal(!T::zero())
            .with_panel(8)
    }

    pub fn band() -> Self {
        Monoid::new("band", !T::zero(), |a: T, b: T| a & b)
            .with_terminal(T::zero())
            .with_panel(8)
    }

    pub fn bxor() -> Self {
        Monoid::new("bxor", T::zero(), |a: T, b: T| a ^ b).with_panel(8)
    }

    pub fn bxnor() -> Self {
        Monoid::new("bxnor", !T::zero(), |a: T, b: T| !(a ^ b)).with_panel(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_identity<T: Scalar>(m: &Monoid<T>, samples: &[T]) {
        for &x in samples {
            assert_eq!(m.combine(m.identity(), x), x, "{} identity", m.full_name());
        }
    }

    fn check_absorbing<T: Scalar>(m: &Monoid<T>, samples: &[T]) {
        if let Some(t) = m.terminal_value() {
            for &x in samples {
                assert_eq!(m.combine(t, x), t, "{} terminal", m.full_name());
                assert_eq!(m.combine(x, t), t, "{} terminal", m.full_name());
            }
        }
    }

    #[test]
    fn test_integer_laws() {
        let samples = [i8::MIN, -7, -1, 0, 1, 3, i8::MAX];
        for m in [
            Monoid::<i8>::plus(),
            Monoid::times(),
            Monoid::min(),
            Monoid::max(),
        ] {
            check_identity(&m, &samples);
            check_absorbing(&m, &samples);
        }
    }

    #[test]
    fn test_unsigned_bitwise_laws() {
        let samples = [0u16, 1, 0x00ff, 0xf0f0, u16::MAX];
        for m in [
            Monoid::<u16>::bor(),
            Monoid::band(),
            Monoid::bxor(),
            Monoid::bxnor(),
        ] {
            check_identity(&m, &samples);
            check_absorbing(&m, &samples);
        }
    }

    #[test]
    fn test_bool_laws() {
        let samples = [false, true];
        for m in [
            Monoid::lor(),
            Monoid::land(),
            Monoid::lxor(),
            Monoid::eq(),
        ] {
            check_identity(&m, &samples);
            check_absorbing(&m, &samples);
        }
    }

    #[test]
    fn test_float_catalogue() {
        let samples = [-2.5f64, 0.0, 1.0, 1e300];
        check_identity(&Monoid::<f64>::plus(), &samples);
        check_identity(&Monoid::<f64>::times(), &samples);
        check_identity(&Monoid::<f64>::min(), &samples);
        check_absorbing(&Monoid::<f64>::max(), &samples);
        assert!(!Monoid::<f64>::times().has_terminal());
        assert_eq!(Monoid::<f64>::min().terminal_value(), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_panel_sizes() {
        assert_eq!(Monoid::<i8>::times().panel(), 64);
        assert_eq!(Monoid::<u64>::plus().panel(), 32);
        assert_eq!(Monoid::<u64>::min().panel(), 16);
        assert_eq!(Monoid::lor().panel(), 8);
        assert_eq!(Monoid::<u32>::any().panel(), 1);
    }

    #[test]
    fn test_names() {
        assert_eq!(Monoid::<i8>::times().full_name(), "times_int8");
        assert_eq!(Monoid::<u64>::plus().full_name(), "plus_uint64");
        assert_eq!(Monoid::land().full_name(), "land_bool");
    }
}
