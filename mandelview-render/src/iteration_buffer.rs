/// Escape-time output for one pixel.
///
/// `inside` is only filled in when the render asked for the inside test
/// (two-tone mode); palette renders leave it `None` and color by count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelSample {
    pub iterations: u32,
    pub inside: Option<bool>,
}

/// Stores per-pixel samples for a full frame.
///
/// This is the raw output of the renderer before coloring, so a palette or
/// color mode change can be applied without recomputing iterations.
#[derive(Debug, Clone)]
pub struct IterationBuffer {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    pub data: Vec<PixelSample>,
}

impl IterationBuffer {
    pub fn new(width: u32, height: u32, max_iterations: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            max_iterations,
            data: vec![PixelSample::default(); size],
        }
    }

    /// Copy one computed row into place. Rows past the bottom are ignored.
    pub fn blit_row(&mut self, y: u32, row: &[PixelSample]) {
        if y >= self.height {
            return;
        }
        let start = y as usize * self.width as usize;
        let len = row.len().min(self.width as usize);
        self.data[start..start + len].copy_from_slice(&row[..len]);
    }

    pub fn get(&self, x: u32, y: u32) -> Option<PixelSample> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Smallest and largest iteration count in the buffer.
    pub fn iteration_range(&self) -> Option<(u32, u32)> {
        iteration_range(&self.data)
    }
}

pub(crate) fn iteration_range(samples: &[PixelSample]) -> Option<(u32, u32)> {
    samples.iter().fold(None, |acc, s| match acc {
        None => Some((s.iterations, s.iterations)),
        Some((lo, hi)) => Some((lo.min(s.iterations), hi.max(s.iterations))),
    })
}
