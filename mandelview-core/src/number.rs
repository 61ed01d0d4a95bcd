use std::fmt;

use crate::error::CoreError;

/// The real scalar a [`ComplexNumber`] is built from.
pub trait Real: Clone + PartialEq + PartialOrd + fmt::Debug + fmt::Display {
    /// Nearest `f64` to this value.
    fn to_f64(&self) -> f64;
}

impl Real for f64 {
    #[inline]
    fn to_f64(&self) -> f64 {
        *self
    }
}

/// Arithmetic shared by the fixed- and arbitrary-precision complex types.
///
/// Every operation is pure: operands are borrowed and a new value is
/// returned. Operations taking a real operand are separate named methods
/// (`add_scalar`, `mul_scalar`, ...) rather than overloads of the complex
/// ones.
///
/// The escape-time loop is written against this trait, so swapping
/// [`Complex`](crate::Complex) for [`BigComplex`](crate::BigComplex) changes
/// precision without touching the iteration logic.
pub trait ComplexNumber: Clone + PartialEq + fmt::Debug + fmt::Display {
    type Real: Real;

    /// Build `re + im·i`.
    fn from_parts(re: Self::Real, im: Self::Real) -> Self;

    /// Real part.
    fn re(&self) -> &Self::Real;

    /// Imaginary part.
    fn im(&self) -> &Self::Real;

    /// `√(re² + im²)`.
    fn magnitude(&self) -> Self::Real;

    /// `re − im·i`.
    fn conjugate(&self) -> Self;

    fn add(&self, rhs: &Self) -> Self;

    fn sub(&self, rhs: &Self) -> Self;

    fn mul(&self, rhs: &Self) -> Self;

    /// `self · conj(rhs) / |rhs|²`.
    ///
    /// Dividing by a zero value is a domain error. What happens then is up
    /// to the implementation; use [`checked_div`](Self::checked_div) to get
    /// an error instead.
    fn div(&self, rhs: &Self) -> Self;

    /// Adds `c` to the real part only.
    fn add_scalar(&self, c: &Self::Real) -> Self;

    /// Subtracts `c` from the real part only.
    fn sub_scalar(&self, c: &Self::Real) -> Self;

    /// Scales both parts by `c`.
    fn mul_scalar(&self, c: &Self::Real) -> Self;

    /// Divides both parts by `c`.
    fn div_scalar(&self, c: &Self::Real) -> Self;

    fn is_zero(&self) -> bool;

    fn square(&self) -> Self {
        self.mul(self)
    }

    /// Division that reports a zero divisor as [`CoreError::DivisionByZero`].
    fn checked_div(&self, rhs: &Self) -> crate::Result<Self> {
        if rhs.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        Ok(self.div(rhs))
    }
}

/// Render a real part the way complex values print: at most three
/// fractional digits, trailing zeros and a dangling point removed.
pub(crate) fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        let kept = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(kept);
    }
    s
}
