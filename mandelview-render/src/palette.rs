use rayon::prelude::*;

use crate::buffer::RenderBuffer;
use crate::iteration_buffer::{IterationBuffer, PixelSample};

/// Number of colors in the default spectrum.
pub const DEFAULT_COLOR_COUNT: usize = 50;

/// Color of points classified inside the set, and of counts past the palette.
pub const INSIDE_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Color of escaping points in two-tone mode (`#fffff0`).
pub const OUTSIDE_COLOR: [u8; 4] = [0xff, 0xff, 0xf0, 255];

const SATURATION: f32 = 0.85;
const BRIGHTNESS: f32 = 1.0;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// An indexed color table.
///
/// A sample with iteration count `n` gets `colors[n]` when `n` is below the
/// palette length and [`INSIDE_COLOR`] otherwise, so points that used up the
/// whole budget come out black when the palette is as long as the budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
}

impl Palette {
    /// A palette from explicit RGBA colors, indexed by iteration count.
    pub fn new(colors: Vec<[u8; 4]>) -> Self {
        Self { colors }
    }

    /// `count` colors sweeping the hue circle, `hue = i / count`.
    pub fn spectrum(count: usize) -> Self {
        let colors = (0..count)
            .map(|i| {
                let [r, g, b] = hsb_to_rgb(i as f32 / count as f32, SATURATION, BRIGHTNESS);
                [r, g, b, 255]
            })
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    /// Palette color for an iteration count.
    #[inline]
    pub fn color_for_count(&self, iterations: u32) -> [u8; 4] {
        self.colors
            .get(iterations as usize)
            .copied()
            .unwrap_or(INSIDE_COLOR)
    }

    /// Color for one sample. Samples carrying an inside test are two-tone;
    /// the rest index the palette.
    #[inline]
    pub fn color(&self, sample: PixelSample) -> [u8; 4] {
        match sample.inside {
            Some(true) => INSIDE_COLOR,
            Some(false) => OUTSIDE_COLOR,
            None => self.color_for_count(sample.iterations),
        }
    }

    /// Colorize an entire iteration buffer into an RGBA pixel buffer.
    pub fn colorize(&self, iter_buf: &IterationBuffer) -> RenderBuffer {
        let len = iter_buf.data.len();
        let mut pixels = vec![0u8; len * 4];
        pixels
            .par_chunks_mut(4)
            .zip(iter_buf.data.par_iter())
            .for_each(|(pixel, &sample)| {
                pixel.copy_from_slice(&self.color(sample));
            });
        RenderBuffer {
            width: iter_buf.width,
            height: iter_buf.height,
            pixels,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::spectrum(DEFAULT_COLOR_COUNT)
    }
}

// ---------------------------------------------------------------------------
// HSB conversion
// ---------------------------------------------------------------------------

/// Convert hue/saturation/brightness in `[0, 1]` to 8-bit RGB.
///
/// Only the fractional part of `hue` is used. Channels round half up.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> [u8; 3] {
    let to_u8 = |v: f32| (v * 255.0 + 0.5) as u8;
    if saturation == 0.0 {
        let v = to_u8(brightness);
        return [v, v, v];
    }
    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));
    let (r, g, b) = match h as u32 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };
    [to_u8(r), to_u8(g), to_u8(b)]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
