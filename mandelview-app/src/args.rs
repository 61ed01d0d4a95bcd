use std::path::PathBuf;

use clap::Parser;

use mandelview_render::ColorMode;

use crate::preferences::ViewerPreferences;

/// Render the Mandelbrot set, optionally zooming in by replaying
/// drag-selections, and write the frame to an image file.
#[derive(Debug, Parser)]
#[command(name = "mandelview", version)]
pub struct CliArgs {
    /// Frame width in pixels (non-positive values use the default).
    #[arg(allow_negative_numbers = true)]
    pub width: Option<i32>,

    /// Frame height in pixels (non-positive values use the default).
    #[arg(allow_negative_numbers = true)]
    pub height: Option<i32>,

    /// Replay a selection from pixel (X0, Y0) to (X1, Y1). Repeatable; applied in order.
    #[arg(
        long,
        num_args = 4,
        value_names = ["X0", "Y0", "X1", "Y1"],
        allow_negative_numbers = true,
        action = clap::ArgAction::Append
    )]
    pub zoom: Vec<i32>,

    /// Output image; the format follows the extension (png, bmp, ico).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Iteration budget per point.
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Escape bound.
    #[arg(long)]
    pub bound: Option<f64>,

    /// Number of palette colors.
    #[arg(long)]
    pub colors: Option<usize>,

    /// Two-tone coloring from the inside test instead of the palette.
    #[arg(long)]
    pub inside_outside: bool,

    /// Ignore saved preferences and do not write them back.
    #[arg(long)]
    pub fresh: bool,
}

impl CliArgs {
    /// Selections as `(pressed, released)` pixel pairs.
    pub fn selections(&self) -> Vec<((i32, i32), (i32, i32))> {
        self.zoom
            .chunks_exact(4)
            .map(|z| ((z[0], z[1]), (z[2], z[3])))
            .collect()
    }

    /// Preferences for this run: `base` with command-line overrides applied.
    pub fn apply(&self, base: &ViewerPreferences) -> ViewerPreferences {
        let mut prefs = base.clone();
        if let Some(width) = self.width {
            prefs.width = width;
        }
        if let Some(height) = self.height {
            prefs.height = height;
        }
        if let Some(iterations) = self.iterations {
            prefs.max_iterations = iterations;
        }
        if let Some(bound) = self.bound {
            prefs.bound = bound;
        }
        if let Some(colors) = self.colors {
            prefs.num_colors = colors;
        }
        if self.inside_outside {
            prefs.color_mode = ColorMode::InsideOutside;
        }
        prefs
    }
}
