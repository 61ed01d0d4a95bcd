use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::number::{ComplexNumber, Real};

/// Iteration budget and escape bound for an escape-time function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscapeParams {
    /// Maximum number of iterations per point.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// An orbit whose magnitude reaches this value has escaped.
    #[serde(default = "default_bound")]
    pub bound: f64,
}

fn default_max_iterations() -> u32 {
    EscapeParams::DEFAULT_MAX_ITERATIONS
}

fn default_bound() -> f64 {
    EscapeParams::DEFAULT_BOUND
}

impl EscapeParams {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 50;
    pub const DEFAULT_BOUND: f64 = 2.0;

    pub fn new(max_iterations: u32, bound: f64) -> crate::Result<Self> {
        if max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        if bound <= 0.0 || !bound.is_finite() {
            return Err(CoreError::InvalidBound(bound));
        }
        Ok(Self {
            max_iterations,
            bound,
        })
    }
}

impl Default for EscapeParams {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            bound: Self::DEFAULT_BOUND,
        }
    }
}

/// An iterated map classified by how fast orbits escape.
///
/// Generic over the number type so the same function runs at `f64` or at
/// decimal precision. Designed for static dispatch: renderers are generic
/// over `F: EscapeTime`.
pub trait EscapeTime {
    fn params(&self) -> &EscapeParams;

    /// Iterations until the orbit of `c` escapes, capped at `max_iterations`.
    fn iteration_count_with<C: ComplexNumber>(&self, c: &C, max_iterations: u32, bound: f64)
        -> u32;

    /// Whether the orbit of `c` stays within `bound` for `max_iterations`
    /// steps.
    fn is_inside_with<C: ComplexNumber>(&self, c: &C, max_iterations: u32, bound: f64) -> bool;

    fn iteration_count<C: ComplexNumber>(&self, c: &C) -> u32 {
        let p = self.params();
        self.iteration_count_with(c, p.max_iterations, p.bound)
    }

    fn is_inside<C: ComplexNumber>(&self, c: &C) -> bool {
        let p = self.params();
        self.is_inside_with(c, p.max_iterations, p.bound)
    }
}

/// The Mandelbrot map `z ← z² + c`, with the orbit seeded at `z₀ = c`.
#[derive(Debug, Clone, Default)]
pub struct Mandelbrot {
    params: EscapeParams,
}

impl Mandelbrot {
    pub fn new(params: EscapeParams) -> Self {
        Self { params }
    }
}

impl EscapeTime for Mandelbrot {
    fn params(&self) -> &EscapeParams {
        &self.params
    }

    /// The count is bumped after each update and the loop always runs at
    /// least once, so the smallest result is 1 even when `|c|` is already
    /// past the bound. Stops on `count >= max_iterations` or `|z| >= bound`.
    fn iteration_count_with<C: ComplexNumber>(
        &self,
        c: &C,
        max_iterations: u32,
        bound: f64,
    ) -> u32 {
        let mut z = c.clone();
        let mut count = 0;
        loop {
            z = z.square().add(c);
            count += 1;
            if count >= max_iterations || z.magnitude().to_f64() >= bound {
                return count;
            }
        }
    }

    /// Tests `|z| > bound` before each update. This is not the complement of
    /// `iteration_count_with` reaching the budget: the two disagree for
    /// orbits that sit exactly on the bound (`c = -2` lands on `|z| = 2`
    /// forever, counts 1 and is inside).
    fn is_inside_with<C: ComplexNumber>(&self, c: &C, max_iterations: u32, bound: f64) -> bool {
        let mut z = c.clone();
        for _ in 0..max_iterations {
            if z.magnitude().to_f64() > bound {
                return false;
            }
            z = z.square().add(c);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BigComplex, Complex};

    fn mb() -> Mandelbrot {
        Mandelbrot::default()
    }

    #[test]
    fn default_params() {
        let p = EscapeParams::default();
        assert_eq!(p.max_iterations, 50);
        assert_eq!(p.bound, 2.0);
    }

    #[test]
    fn invalid_params() {
        assert_eq!(
            EscapeParams::new(0, 2.0),
            Err(CoreError::InvalidMaxIterations(0))
        );
        assert!(EscapeParams::new(50, 0.0).is_err());
        assert!(EscapeParams::new(50, -1.0).is_err());
        assert!(EscapeParams::new(50, f64::NAN).is_err());
        assert!(EscapeParams::new(50, f64::INFINITY).is_err());
        assert!(EscapeParams::new(1, 0.5).is_ok());
    }

    #[test]
    fn params_fill_missing_fields() {
        let p: EscapeParams = serde_json::from_str(r#"{"max_iterations":200}"#).unwrap();
        assert_eq!(p, EscapeParams::new(200, 2.0).unwrap());
    }

    #[test]
    fn point_outside_escapes_on_first_step() {
        assert_eq!(mb().iteration_count(&Complex::new(4.0, 2.0)), 1);
    }

    #[test]
    fn origin_uses_whole_budget() {
        assert_eq!(
            mb().iteration_count(&Complex::ZERO),
            EscapeParams::DEFAULT_MAX_ITERATIONS
        );
    }

    #[test]
    fn known_escape_count() {
        // (0.74, 0.2) → (1.0076, 0.396) → (1.358, 0.898) → (1.539, 2.540)
        assert_eq!(mb().iteration_count(&Complex::new(0.5, 0.1)), 4);
    }

    #[test]
    fn caller_supplied_budget_and_bound() {
        let m = mb();
        assert_eq!(m.iteration_count_with(&Complex::ZERO, 7, 2.0), 7);
        assert_eq!(m.iteration_count_with(&Complex::new(0.5, 0.1), 50, 100.0), 7);
        // The loop body always runs once.
        assert_eq!(m.iteration_count_with(&Complex::ZERO, 0, 2.0), 1);
    }

    #[test]
    fn inside_classification() {
        let m = mb();
        assert!(m.is_inside(&Complex::ZERO));
        assert!(m.is_inside(&Complex::new(-1.0, 0.0)));
        assert!(m.is_inside(&Complex::new(-0.1, 0.1)));
        assert!(!m.is_inside(&Complex::new(4.0, 2.0)));
        assert!(!m.is_inside(&Complex::new(0.5, 0.1)));
        assert!(m.is_inside_with(&Complex::new(4.0, 2.0), 0, 2.0));
    }

    #[test]
    fn predicates_disagree_on_the_bound() {
        // The orbit of -2 is -2, 2, 2, 2, ...: never `> 2`, but `>= 2` at once.
        let c = Complex::new(-2.0, 0.0);
        assert_eq!(mb().iteration_count(&c), 1);
        assert!(mb().is_inside(&c));
    }

    #[test]
    fn decimal_precision_matches_f64_away_from_the_boundary() {
        let m = mb();
        for (re, im) in [(4.0, 2.0), (0.0, 0.0), (0.5, 0.1), (-1.0, 0.0), (-0.75, 0.25)] {
            let fast = Complex::new(re, im);
            let precise = BigComplex::from_f64(re, im).unwrap();
            assert_eq!(
                m.iteration_count(&fast),
                m.iteration_count(&precise),
                "count differs at {fast}"
            );
            assert_eq!(m.is_inside(&fast), m.is_inside(&precise), "inside differs at {fast}");
        }
    }

    #[test]
    fn deterministic_results() {
        let m = mb();
        let points = [
            Complex::new(0.0, 0.0),
            Complex::new(-0.75, 0.1),
            Complex::new(0.3, 0.5),
            Complex::new(-2.0, 0.0),
            Complex::new(1.0, 1.0),
        ];
        let run1: Vec<_> = points.iter().map(|c| m.iteration_count(c)).collect();
        let run2: Vec<_> = points.iter().map(|c| m.iteration_count(c)).collect();
        assert_eq!(run1, run2);
    }
}
