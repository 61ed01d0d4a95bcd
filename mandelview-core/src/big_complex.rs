use std::fmt;

use dashu_int::IBig;

use crate::complex::Complex;
use crate::decimal::{div_round_half_even, scaled_to_string, unit, Decimal, DECIMAL_SCALE};
use crate::number::ComplexNumber;

/// A complex number with [`Decimal`] components.
///
/// Same contract as [`Complex`], but each part is held at ten fractional
/// digits with half-even rounding applied whenever a value is produced.
/// Products and quotients are computed on the exact mantissas and rounded
/// once, so `(a + bi)(c + di)` does not accumulate per-term rounding.
///
/// Not used by the renderer; it is the precision step for deep zooms, and
/// runs through the same escape-time loop as [`Complex`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BigComplex {
    pub re: Decimal,
    pub im: Decimal,
}

impl BigComplex {
    pub const ZERO: Self = Self {
        re: Decimal::ZERO,
        im: Decimal::ZERO,
    };

    pub fn new(re: Decimal, im: Decimal) -> Self {
        Self { re, im }
    }

    pub fn real(re: Decimal) -> Self {
        Self {
            re,
            im: Decimal::ZERO,
        }
    }

    /// Build from `f64` parts, taking each part's exact binary value.
    pub fn from_f64(re: f64, im: f64) -> crate::Result<Self> {
        Ok(Self::new(Decimal::try_from(re)?, Decimal::try_from(im)?))
    }

    /// Nearest [`Complex`]; digits beyond `f64` precision are lost.
    pub fn to_complex(&self) -> Complex {
        Complex::new(self.re.to_f64(), self.im.to_f64())
    }

    /// Exact `re² + im²` mantissa, at twice the working scale.
    fn norm_sq_mantissa(&self) -> IBig {
        let (a, b) = (self.re.mantissa(), self.im.mantissa());
        a * a + b * b
    }
}

impl TryFrom<Complex> for BigComplex {
    type Error = crate::CoreError;

    fn try_from(c: Complex) -> crate::Result<Self> {
        Self::from_f64(c.re, c.im)
    }
}

impl ComplexNumber for BigComplex {
    type Real = Decimal;

    fn from_parts(re: Decimal, im: Decimal) -> Self {
        Self::new(re, im)
    }

    fn re(&self) -> &Decimal {
        &self.re
    }

    fn im(&self) -> &Decimal {
        &self.im
    }

    /// The square root is taken in `f64`, so the result carries double
    /// precision even though the parts carry more digits. A squared norm
    /// beyond the `f64` range saturates at `f64::MAX`.
    fn magnitude(&self) -> Decimal {
        let norm_sq: f64 = scaled_to_string(&self.norm_sq_mantissa(), 2 * DECIMAL_SCALE)
            .parse()
            .unwrap_or(f64::MAX);
        let root = norm_sq.sqrt();
        Decimal::from_finite_f64(if root.is_finite() { root } else { f64::MAX })
    }

    fn conjugate(&self) -> Self {
        Self::new(self.re.clone(), -&self.im)
    }

    fn add(&self, rhs: &Self) -> Self {
        Self::new(&self.re + &rhs.re, &self.im + &rhs.im)
    }

    fn sub(&self, rhs: &Self) -> Self {
        Self::new(&self.re - &rhs.re, &self.im - &rhs.im)
    }

    fn mul(&self, rhs: &Self) -> Self {
        let (a, b) = (self.re.mantissa(), self.im.mantissa());
        let (c, d) = (rhs.re.mantissa(), rhs.im.mantissa());
        let unit = unit();
        Self::new(
            Decimal::from_mantissa(div_round_half_even(&(a * c - b * d), &unit)),
            Decimal::from_mantissa(div_round_half_even(&(a * d + b * c), &unit)),
        )
    }

    /// # Panics
    ///
    /// Panics when `rhs` is zero; see [`ComplexNumber::checked_div`].
    fn div(&self, rhs: &Self) -> Self {
        assert!(!rhs.is_zero(), "attempt to divide a complex decimal by zero");
        let (a, b) = (self.re.mantissa(), self.im.mantissa());
        let (c, d) = (rhs.re.mantissa(), rhs.im.mantissa());
        let unit = unit();
        let denominator = rhs.norm_sq_mantissa();
        Self::new(
            Decimal::from_mantissa(div_round_half_even(&((a * c + b * d) * &unit), &denominator)),
            Decimal::from_mantissa(div_round_half_even(&((b * c - a * d) * &unit), &denominator)),
        )
    }

    fn add_scalar(&self, c: &Decimal) -> Self {
        Self::new(&self.re + c, self.im.clone())
    }

    fn sub_scalar(&self, c: &Decimal) -> Self {
        Self::new(&self.re - c, self.im.clone())
    }

    fn mul_scalar(&self, c: &Decimal) -> Self {
        Self::new(c * &self.re, c * &self.im)
    }

    /// # Panics
    ///
    /// Panics when `c` is zero.
    fn div_scalar(&self, c: &Decimal) -> Self {
        Self::new(&self.re / c, &self.im / c)
    }

    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}

/// Same shape as [`Complex`]'s form: `(10,4i)`, `(2.5)`.
impl fmt::Display for BigComplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.re.to_short_string())?;
        if !self.im.is_zero() {
            write!(f, ",{}i", self.im.to_short_string())?;
        }
        f.write_str(")")
    }
}
