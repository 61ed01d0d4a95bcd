use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;

use serde::{Deserialize, Serialize};

use crate::number::{trim_fraction, ComplexNumber};

/// A complex number represented as two `f64` components.
///
/// Lightweight and `Copy`; one is created per pixel per iteration.
///
/// Equality is exact and bitwise rather than IEEE comparison: all NaNs
/// compare equal to each other and `0.0` differs from `-0.0`. This is what
/// makes `Eq` and `Hash` lawful.
///
/// Division by a zero value follows IEEE semantics and yields NaN or
/// infinite components. Use [`ComplexNumber::checked_div`] to reject it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// A value on the real axis.
    #[inline]
    pub const fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl ComplexNumber for Complex {
    type Real = f64;

    #[inline]
    fn from_parts(re: f64, im: f64) -> Self {
        Self::new(re, im)
    }

    #[inline]
    fn re(&self) -> &f64 {
        &self.re
    }

    #[inline]
    fn im(&self) -> &f64 {
        &self.im
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    #[inline]
    fn conjugate(&self) -> Self {
        Self::new(self.re, -self.im)
    }

    #[inline]
    fn add(&self, rhs: &Self) -> Self {
        *self + *rhs
    }

    #[inline]
    fn sub(&self, rhs: &Self) -> Self {
        *self - *rhs
    }

    #[inline]
    fn mul(&self, rhs: &Self) -> Self {
        *self * *rhs
    }

    #[inline]
    fn div(&self, rhs: &Self) -> Self {
        *self / *rhs
    }

    #[inline]
    fn add_scalar(&self, c: &f64) -> Self {
        *self + *c
    }

    #[inline]
    fn sub_scalar(&self, c: &f64) -> Self {
        *self - *c
    }

    #[inline]
    fn mul_scalar(&self, c: &f64) -> Self {
        *self * *c
    }

    #[inline]
    fn div_scalar(&self, c: &f64) -> Self {
        *self / *c
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }
}

// -- Equality --

/// Bit pattern used for equality and hashing; every NaN maps to one pattern.
#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        canonical_bits(self.re) == canonical_bits(other.re)
            && canonical_bits(self.im) == canonical_bits(other.im)
    }
}

impl Eq for Complex {}

impl Hash for Complex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.re).hash(state);
        canonical_bits(self.im).hash(state);
    }
}

// -- Arithmetic operators --

impl ops::Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl ops::Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl ops::Mul for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl ops::Div for Complex {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        (self * rhs.conjugate()) / rhs.norm_sq()
    }
}

impl ops::Neg for Complex {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

/// Real-axis shift: `Complex + f64` only touches the real part.
impl ops::Add<f64> for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: f64) -> Self {
        Self::new(self.re + rhs, self.im)
    }
}

impl ops::Sub<f64> for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: f64) -> Self {
        Self::new(self.re - rhs, self.im)
    }
}

/// Scalar multiplication: `Complex * f64`.
impl ops::Mul<f64> for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(rhs * self.re, rhs * self.im)
    }
}

impl ops::Div<f64> for Complex {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::new(self.re / rhs, self.im / rhs)
    }
}

// -- Display --

fn format_part(v: f64) -> String {
    trim_fraction(format!("{v:.3}"))
}

/// `(re)` or `(re,imi)`, each part with at most three fractional digits,
/// e.g. `(2.5,4i)`.
impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", format_part(self.re))?;
        if self.im != 0.0 {
            write!(f, ",{}i", format_part(self.im))?;
        }
        f.write_str(")")
    }
}
