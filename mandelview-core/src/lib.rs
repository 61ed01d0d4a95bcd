pub mod big_complex;
pub mod complex;
pub mod decimal;
pub mod error;
pub mod escape_time;
pub mod number;
pub mod pixel_mapper;

// Re-export primary types for convenience.
pub use big_complex::BigComplex;
pub use complex::Complex;
pub use decimal::{Decimal, DECIMAL_SCALE};
pub use error::CoreError;
pub use escape_time::{EscapeParams, EscapeTime, Mandelbrot};
pub use number::{ComplexNumber, Real};
pub use pixel_mapper::{PixelMapper, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
