use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use mandelview_core::{EscapeTime, PixelMapper};

use crate::iteration_buffer::{iteration_range, IterationBuffer, PixelSample};

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Tracks the current render generation for cancellation and progress.
///
/// Advancing the generation makes every row that has not started yet skip
/// its work. Progress is counted in rows.
#[derive(Debug)]
pub struct RenderCancel {
    generation: AtomicU64,
    progress_done: AtomicUsize,
    progress_total: AtomicUsize,
}

impl RenderCancel {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            progress_done: AtomicUsize::new(0),
            progress_total: AtomicUsize::new(0),
        }
    }

    /// Cancel the current render by advancing the generation.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn reset_progress(&self, total: usize) {
        self.progress_total.store(total, Ordering::Relaxed);
        self.progress_done.store(0, Ordering::Relaxed);
    }

    fn inc_progress(&self) {
        self.progress_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current progress as `(rows done, rows total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.progress_done.load(Ordering::Relaxed),
            self.progress_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for RenderCancel {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Color mode
// ---------------------------------------------------------------------------

/// How a frame is colored, and therefore what the renderer computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Index a palette by iteration count.
    #[default]
    Palette,
    /// Two tones from the inside test: black inside, ivory outside.
    InsideOutside,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// The result of a full-frame render.
///
/// Holds raw samples only; the caller applies a `Palette` to get pixels.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub iterations: IterationBuffer,
    pub elapsed: Duration,
    pub cancelled: bool,
    pub rows_rendered: usize,
    /// Smallest and largest iteration count among the rendered rows.
    pub iteration_range: Option<(u32, u32)>,
}

// ---------------------------------------------------------------------------
// Full-frame render
// ---------------------------------------------------------------------------

fn render_row<F: EscapeTime>(
    function: &F,
    mapper: &PixelMapper,
    mode: ColorMode,
    y: u32,
) -> Vec<PixelSample> {
    (0..mapper.width())
        .map(|x| {
            let c = mapper.map(x as i32, y as i32);
            PixelSample {
                iterations: function.iteration_count(&c),
                inside: match mode {
                    ColorMode::Palette => None,
                    ColorMode::InsideOutside => Some(function.is_inside(&c)),
                },
            }
        })
        .collect()
}

/// Render a full frame, one rayon task per row.
///
/// Every pixel `(x, y)` of the mapper's grid is sampled at `mapper.map(x, y)`.
/// The `cancel` handle can be used from another thread to abort; rows that
/// were skipped keep the default sample.
pub fn render<F: EscapeTime + Sync>(
    function: &F,
    mapper: &PixelMapper,
    mode: ColorMode,
    cancel: &Arc<RenderCancel>,
) -> RenderResult {
    let start = Instant::now();
    let gen = cancel.generation();
    let (width, height) = (mapper.width(), mapper.height());
    let max_iterations = function.params().max_iterations;

    debug!(
        width,
        height,
        max_iterations,
        ?mode,
        upper_left = %mapper.upper_left(),
        lower_right = %mapper.lower_right(),
        "Starting render"
    );
    cancel.reset_progress(height as usize);

    let rows: Vec<Option<Vec<PixelSample>>> = (0..height)
        .into_par_iter()
        .map(|y| {
            if cancel.generation() != gen {
                return None;
            }
            let row = render_row(function, mapper, mode, y);
            cancel.inc_progress();
            Some(row)
        })
        .collect();

    let cancelled = cancel.generation() != gen;
    let mut iterations = IterationBuffer::new(width, height, max_iterations);
    let mut rows_rendered = 0;
    let mut range: Option<(u32, u32)> = None;
    for (y, row) in rows.iter().enumerate() {
        if let Some(row) = row {
            iterations.blit_row(y as u32, row);
            rows_rendered += 1;
            if let Some((lo, hi)) = iteration_range(row) {
                range = Some(match range {
                    None => (lo, hi),
                    Some((a, b)) => (a.min(lo), b.max(hi)),
                });
            }
        }
    }

    let elapsed = start.elapsed();
    info!(
        elapsed_ms = elapsed.as_millis(),
        rows_rendered,
        cancelled,
        ?range,
        "Render complete"
    );

    RenderResult {
        iterations,
        elapsed,
        cancelled,
        rows_rendered,
        iteration_range: range,
    }
}
