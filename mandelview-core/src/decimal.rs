use std::fmt;
use std::ops;
use std::str::FromStr;

use dashu_int::IBig;

use crate::error::CoreError;
use crate::number::{trim_fraction, Real};

/// Number of fractional digits every [`Decimal`] is held at.
pub const DECIMAL_SCALE: usize = 10;

/// Largest power of ten parsed text may be scaled up by.
const MAX_SCALE_UP: isize = 4096;

/// A fixed-scale decimal: an arbitrary-size integer mantissa over
/// `10^DECIMAL_SCALE`.
///
/// Every value is rounded half-even to [`DECIMAL_SCALE`] fractional digits
/// when it is created, whether parsed, converted from `f64`, or produced by
/// multiplication or division. Addition and subtraction are exact. With a
/// single scale there is one representation per number, so equality,
/// ordering and hashing are plain mantissa comparisons.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal {
    mantissa: IBig,
}

fn pow10(exp: usize) -> IBig {
    IBig::from(10u8).pow(exp)
}

pub(crate) fn unit() -> IBig {
    pow10(DECIMAL_SCALE)
}

fn abs(v: &IBig) -> IBig {
    if *v < IBig::ZERO {
        IBig::ZERO - v
    } else {
        v.clone()
    }
}

/// `num / den` rounded to the nearest integer, ties to even.
///
/// Panics when `den` is zero.
pub(crate) fn div_round_half_even(num: &IBig, den: &IBig) -> IBig {
    let (num, den) = if *den < IBig::ZERO {
        (IBig::ZERO - num, IBig::ZERO - den)
    } else {
        (num.clone(), den.clone())
    };
    let quotient = &num / &den;
    let remainder = &num - &quotient * &den;
    let twice = abs(&remainder) * IBig::from(2u8);
    let odd = &quotient % IBig::from(2u8) != IBig::ZERO;
    if twice > den || (twice == den && odd) {
        if num < IBig::ZERO {
            quotient - IBig::ONE
        } else {
            quotient + IBig::ONE
        }
    } else {
        quotient
    }
}

impl Decimal {
    pub const ZERO: Self = Self {
        mantissa: IBig::ZERO,
    };

    /// Mantissa `value · 10^shift`, rounded when `shift` is negative.
    fn from_shifted(value: IBig, shift: isize) -> Self {
        let mantissa = if shift >= 0 {
            value * pow10(shift as usize)
        } else {
            div_round_half_even(&value, &pow10(shift.unsigned_abs()))
        };
        Self { mantissa }
    }

    /// Exact binary value of a finite `f64`, rounded to the working scale.
    pub(crate) fn from_finite_f64(v: f64) -> Self {
        debug_assert!(v.is_finite());
        let bits = v.to_bits();
        let negative = bits >> 63 == 1;
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << 52) - 1);
        let (significand, exp2) = if biased == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), biased - 1075)
        };

        let mut scaled = IBig::from(significand) * unit();
        if negative {
            scaled = IBig::ZERO - scaled;
        }
        let mantissa = if exp2 >= 0 {
            scaled * IBig::from(2u8).pow(exp2 as usize)
        } else {
            div_round_half_even(&scaled, &IBig::from(2u8).pow(exp2.unsigned_abs() as usize))
        };
        Self { mantissa }
    }

    pub(crate) fn from_mantissa(mantissa: IBig) -> Self {
        Self { mantissa }
    }

    pub(crate) fn mantissa(&self) -> &IBig {
        &self.mantissa
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == IBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa < IBig::ZERO
    }

    pub fn abs(&self) -> Self {
        Self {
            mantissa: abs(&self.mantissa),
        }
    }

    /// Nearest `f64`. Values beyond the `f64` range become infinite.
    pub fn to_f64(&self) -> f64 {
        // The decimal text is exact, and `f64` parsing rounds correctly.
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// At most three fractional digits (half-even), trailing zeros removed.
    pub fn to_short_string(&self) -> String {
        let thousandths = div_round_half_even(&self.mantissa, &pow10(DECIMAL_SCALE - 3));
        let text = scaled_to_string(&thousandths, 3);
        // Keep the sign of values that round to zero, e.g. `-0`.
        if self.is_negative() && !text.starts_with('-') {
            trim_fraction(format!("-{text}"))
        } else {
            trim_fraction(text)
        }
    }

    /// Rejects non-finite input instead of panicking.
    pub fn try_from_f64(v: f64) -> crate::Result<Self> {
        if !v.is_finite() {
            return Err(CoreError::NonFiniteDecimal(v));
        }
        Ok(Self::from_finite_f64(v))
    }
}

impl Real for Decimal {
    fn to_f64(&self) -> f64 {
        Decimal::to_f64(self)
    }
}

impl From<i64> for Decimal {
    fn from(v: i64) -> Self {
        Self {
            mantissa: IBig::from(v) * unit(),
        }
    }
}

impl TryFrom<f64> for Decimal {
    type Error = CoreError;

    fn try_from(v: f64) -> crate::Result<Self> {
        Self::try_from_f64(v)
    }
}

/// Accepts an optional sign, digits with an optional fractional part, and
/// an optional `e`/`E` exponent: `-1.25`, `3`, `.5`, `2.5e-3`.
impl FromStr for Decimal {
    type Err = CoreError;

    fn from_str(input: &str) -> crate::Result<Self> {
        let invalid = |reason: &str| CoreError::InvalidDecimal {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let s = input.trim();
        let (negative, s) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (number, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let exp: isize = s[pos + 1..]
                    .parse()
                    .map_err(|_| invalid("malformed exponent"))?;
                (&s[..pos], exp)
            }
            None => (s, 0),
        };
        let (int, frac) = number.split_once('.').unwrap_or((number, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(invalid("no digits"));
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid("unexpected character"));
        }

        let digits = format!("{int}{frac}");
        let mut value =
            IBig::from_str_radix(&digits, 10).map_err(|e| invalid(&e.to_string()))?;
        if negative {
            value = IBig::ZERO - value;
        }
        let out_of_range = || invalid("exponent out of range");
        let shift = (frac.len() as isize)
            .checked_sub(exponent)
            .and_then(|scale| (DECIMAL_SCALE as isize).checked_sub(scale))
            .ok_or_else(out_of_range)?;
        // |value| < 10^digits.len(), so a longer downward shift rounds to zero.
        if value == IBig::ZERO || shift < -(digits.len() as isize) {
            return Ok(Self::ZERO);
        }
        if shift > MAX_SCALE_UP {
            return Err(out_of_range());
        }
        Ok(Self::from_shifted(value, shift))
    }
}

/// Text of `mantissa · 10^-scale` with exactly `scale` fractional digits.
pub(crate) fn scaled_to_string(mantissa: &IBig, scale: usize) -> String {
    let sign = if *mantissa < IBig::ZERO { "-" } else { "" };
    let digits = format!("{:0>width$}", abs(mantissa).to_string(), width = scale + 1);
    let (int, frac) = digits.split_at(digits.len() - scale);
    format!("{sign}{int}.{frac}")
}

/// Full precision, always [`DECIMAL_SCALE`] fractional digits.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&scaled_to_string(&self.mantissa, DECIMAL_SCALE))
    }
}

// -- Arithmetic operators --

impl ops::Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal {
            mantissa: &self.mantissa + &rhs.mantissa,
        }
    }
}

impl ops::Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        Decimal {
            mantissa: &self.mantissa - &rhs.mantissa,
        }
    }
}

impl ops::Mul<&Decimal> for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal {
            mantissa: div_round_half_even(&(&self.mantissa * &rhs.mantissa), &unit()),
        }
    }
}

/// # Panics
///
/// Panics when `rhs` is zero, like integer division.
impl ops::Div<&Decimal> for &Decimal {
    type Output = Decimal;

    fn div(self, rhs: &Decimal) -> Decimal {
        assert!(!rhs.is_zero(), "attempt to divide a decimal by zero");
        Decimal {
            mantissa: div_round_half_even(&(&self.mantissa * unit()), &rhs.mantissa),
        }
    }
}

impl ops::Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal {
            mantissa: IBig::ZERO - &self.mantissa,
        }
    }
}

macro_rules! forward_owned_binop {
    ($($trait:ident :: $method:ident),*) => {$(
        impl ops::$trait for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: Decimal) -> Decimal {
                ops::$trait::$method(&self, &rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

impl ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_displays_at_working_scale() {
        assert_eq!(dec("1.5").to_string(), "1.5000000000");
        assert_eq!(dec("-0.25").to_string(), "-0.2500000000");
        assert_eq!(dec("42").to_string(), "42.0000000000");
        assert_eq!(dec(".5").to_string(), "0.5000000000");
        assert_eq!(dec("2.5e-3").to_string(), "0.0025000000");
        assert_eq!(dec("1E2").to_string(), "100.0000000000");
    }

    #[test]
    fn rounds_half_even_on_construction() {
        // Ties go to the even neighbour.
        assert_eq!(dec("0.00000000005"), dec("0"));
        assert_eq!(dec("0.00000000015"), dec("0.0000000002"));
        assert_eq!(dec("-0.00000000025"), dec("-0.0000000002"));
        // Non-ties round to nearest.
        assert_eq!(dec("0.123456789049"), dec("0.1234567890"));
        assert_eq!(dec("0.123456789051"), dec("0.1234567891"));
    }

    #[test]
    fn equality_ignores_written_scale() {
        assert_eq!(dec("4"), dec("4.000"));
        assert_eq!(dec("4.0"), Decimal::from(4));
        assert_eq!(Decimal::try_from(4.0).unwrap(), Decimal::from(4));
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in ["", "-", "1.2.3", "abc", "1e", "--1", "1_000"] {
            assert!(
                matches!(bad.parse::<Decimal>(), Err(CoreError::InvalidDecimal { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn extreme_exponents() {
        assert_eq!(dec("1e-999999999"), Decimal::ZERO);
        assert_eq!(dec("-123.45e-5000000"), Decimal::ZERO);
        assert_eq!(dec("0e999999999"), Decimal::ZERO);
        assert!(matches!(
            "1e-9223372036854775808".parse::<Decimal>(),
            Err(CoreError::InvalidDecimal { .. })
        ));
        assert!(matches!(
            "1e999999999".parse::<Decimal>(),
            Err(CoreError::InvalidDecimal { .. })
        ));
        assert!("1e9223372036854775807".parse::<Decimal>().is_err());
    }

    #[test]
    fn exponent_at_the_rounding_edge() {
        // One digit just below the last kept place still rounds.
        assert_eq!(dec("5e-11"), Decimal::ZERO);
        assert_eq!(dec("6e-11"), dec("0.0000000001"));
        assert_eq!(dec("15e-11"), dec("0.0000000002"));
        assert_eq!(dec("9e-12"), Decimal::ZERO);
    }

    #[test]
    fn converts_from_f64_exactly_then_rounds() {
        // 0.1 is slightly above one tenth in binary; at ten digits it is 0.1.
        assert_eq!(Decimal::try_from(0.1).unwrap(), dec("0.1"));
        assert_eq!(Decimal::try_from(-2.75).unwrap(), dec("-2.75"));
        assert_eq!(
            Decimal::try_from(2.0_f64.sqrt()).unwrap(),
            dec("1.4142135624")
        );
        assert_eq!(Decimal::try_from(1e-12).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_non_finite_f64() {
        assert!(matches!(
            Decimal::try_from(f64::NAN),
            Err(CoreError::NonFiniteDecimal(_))
        ));
        assert!(Decimal::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn to_f64_round_trips_short_values() {
        assert_eq!(dec("-3.125").to_f64(), -3.125);
        assert_eq!(dec("0.1").to_f64(), 0.1);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(dec("1.25") + dec("2.5"), dec("3.75"));
        assert_eq!(dec("1.25") - dec("2.5"), dec("-1.25"));
        assert_eq!(dec("1.5") * dec("-4"), dec("-6"));
        assert_eq!(dec("1") / dec("4"), dec("0.25"));
        assert_eq!(-dec("7"), dec("-7"));
    }

    #[test]
    fn products_and_quotients_are_rounded() {
        // 0.00001 * 0.00001 = 1e-10 exactly; 0.00001 * 0.000005 = 5e-11 ties to 0.
        assert_eq!(dec("0.00001") * dec("0.00001"), dec("0.0000000001"));
        assert_eq!(dec("0.00001") * dec("0.000005"), Decimal::ZERO);
        assert_eq!(dec("1") / dec("3"), dec("0.3333333333"));
        assert_eq!(dec("2") / dec("3"), dec("0.6666666667"));
        assert_eq!(dec("-2") / dec("3"), dec("-0.6666666667"));
        assert_eq!(dec("1") / dec("-8"), dec("-0.125"));
    }

    #[test]
    #[should_panic(expected = "divide a decimal by zero")]
    fn division_by_zero_panics() {
        let _ = dec("1") / Decimal::ZERO;
    }

    #[test]
    fn short_string() {
        assert_eq!(dec("10").to_short_string(), "10");
        assert_eq!(dec("2.5").to_short_string(), "2.5");
        assert_eq!(dec("0.3333333333").to_short_string(), "0.333");
        assert_eq!(dec("-1.0005").to_short_string(), "-1");
        assert_eq!(dec("1.0015").to_short_string(), "1.002");
        assert_eq!(dec("-0.0001").to_short_string(), "-0");
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(dec("-1") < dec("0.5"));
        assert!(dec("2.0000000001") > dec("2"));
    }
}
