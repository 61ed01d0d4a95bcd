use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;

/// Pixel dimension used when a non-positive width or height is given.
pub const DEFAULT_WIDTH: u32 = 700;
pub const DEFAULT_HEIGHT: u32 = 700;

/// Maps pixel coordinates onto a quadrilateral region of the complex plane.
///
/// The region is given by its upper-left and lower-right corners; the other
/// two corners combine the real part of one with the imaginary part of the
/// other. Pixels are blended between the four corners with bilinear shape
/// functions over `u = x / width`, `v = y / height`.
///
/// A mapper is a plain value: zooming builds a new one rather than
/// mutating the current one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMapper {
    width: u32,
    height: u32,
    upper_left: Complex,
    upper_right: Complex,
    lower_left: Complex,
    lower_right: Complex,
}

impl PixelMapper {
    pub const DEFAULT_UPPER_LEFT: Complex = Complex::new(-2.0, 2.0);
    pub const DEFAULT_LOWER_RIGHT: Complex = Complex::new(2.0, -2.0);

    /// Create a mapper for the region spanned by two corners.
    ///
    /// Non-positive dimensions fall back to [`DEFAULT_WIDTH`] and
    /// [`DEFAULT_HEIGHT`]. Corners with NaN or infinite parts are rejected.
    /// A zero-area region is allowed and maps pixels onto a line or a point.
    pub fn new(
        width: i32,
        height: i32,
        upper_left: Complex,
        lower_right: Complex,
    ) -> crate::Result<Self> {
        check_corner("upper-left", upper_left)?;
        check_corner("lower-right", lower_right)?;
        Ok(Self {
            width: dimension_or(width, DEFAULT_WIDTH),
            height: dimension_or(height, DEFAULT_HEIGHT),
            upper_left,
            upper_right: Complex::new(lower_right.re, upper_left.im),
            lower_left: Complex::new(upper_left.re, lower_right.im),
            lower_right,
        })
    }

    /// Like [`new`](Self::new), for corners that may be absent (e.g. read
    /// back from a settings file). A missing corner is an error, never
    /// silently replaced by a default.
    pub fn from_corners(
        width: i32,
        height: i32,
        upper_left: Option<Complex>,
        lower_right: Option<Complex>,
    ) -> crate::Result<Self> {
        let upper_left = upper_left.ok_or(CoreError::MissingCorner {
            corner: "upper-left",
        })?;
        let lower_right = lower_right.ok_or(CoreError::MissingCorner {
            corner: "lower-right",
        })?;
        Self::new(width, height, upper_left, lower_right)
    }

    /// The default `[-2, 2] × [-2, 2]` region at the given size.
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width: dimension_or(width, DEFAULT_WIDTH),
            height: dimension_or(height, DEFAULT_HEIGHT),
            upper_left: Self::DEFAULT_UPPER_LEFT,
            upper_right: Complex::new(Self::DEFAULT_LOWER_RIGHT.re, Self::DEFAULT_UPPER_LEFT.im),
            lower_left: Complex::new(Self::DEFAULT_UPPER_LEFT.re, Self::DEFAULT_LOWER_RIGHT.im),
            lower_right: Self::DEFAULT_LOWER_RIGHT,
        }
    }

    /// Map a pixel coordinate to a point on the complex plane.
    ///
    /// Coordinates are not clamped: pixels outside `[0, width] × [0, height]`
    /// extrapolate beyond the region.
    #[inline]
    pub fn map(&self, x: i32, y: i32) -> Complex {
        let u = x as f64 / self.width as f64;
        let v = y as f64 / self.height as f64;

        // Bilinear shape functions.
        Complex::ZERO
            + self.upper_left * (1.0 - u) * (1.0 - v)
            + self.upper_right * (1.0 - u) * v
            + self.lower_left * u * (1.0 - v)
            + self.lower_right * u * v
    }

    /// The region between two pixels of this mapper, at the same size.
    ///
    /// This is how a drag-selection zooms: the pressed and released points
    /// become the new upper-left and lower-right corners.
    pub fn zoomed(&self, pressed: (i32, i32), released: (i32, i32)) -> crate::Result<Self> {
        let upper_left = self.map(pressed.0, pressed.1);
        let lower_right = self.map(released.0, released.1);
        debug!(%upper_left, %lower_right, "Zooming to selection");
        Self::new(
            self.width as i32,
            self.height as i32,
            upper_left,
            lower_right,
        )
    }

    /// The same region at a new pixel size.
    pub fn resized(&self, width: i32, height: i32) -> Self {
        Self {
            width: dimension_or(width, DEFAULT_WIDTH),
            height: dimension_or(height, DEFAULT_HEIGHT),
            ..*self
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn upper_left(&self) -> Complex {
        self.upper_left
    }

    pub fn upper_right(&self) -> Complex {
        self.upper_right
    }

    pub fn lower_left(&self) -> Complex {
        self.lower_left
    }

    pub fn lower_right(&self) -> Complex {
        self.lower_right
    }
}

impl Default for PixelMapper {
    fn default() -> Self {
        Self::with_size(DEFAULT_WIDTH as i32, DEFAULT_HEIGHT as i32)
    }
}

fn dimension_or(value: i32, fallback: u32) -> u32 {
    if value <= 0 {
        debug!(value, fallback, "Non-positive pixel dimension, using default");
        fallback
    } else {
        value as u32
    }
}

fn check_corner(corner: &'static str, value: Complex) -> crate::Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::InvalidCorner {
            corner,
            value: format!("{value:?}"),
        })
    }
}
