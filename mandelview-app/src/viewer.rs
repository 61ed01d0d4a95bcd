use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use mandelview_core::{EscapeTime, Mandelbrot, PixelMapper};
use mandelview_render::{
    export_image, render, ColorMode, ExportMetadata, Palette, RenderBuffer, RenderCancel,
    SELECTION_COLOR,
};

use crate::preferences::LastView;

/// Drag-selection state: the pressed corner, the current (or released)
/// corner, and whether a drag is in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Selection {
    pressed: (i32, i32),
    released: (i32, i32),
    selecting: bool,
}

/// The viewing session: current region, how it is colored, and the
/// selection being dragged out.
pub struct Viewer {
    mapper: PixelMapper,
    function: Mandelbrot,
    palette: Palette,
    mode: ColorMode,
    selection: Selection,
}

impl Viewer {
    pub fn new(mapper: PixelMapper, function: Mandelbrot, palette: Palette, mode: ColorMode) -> Self {
        Self {
            mapper,
            function,
            palette,
            mode,
            selection: Selection::default(),
        }
    }

    pub fn mapper(&self) -> &PixelMapper {
        &self.mapper
    }

    pub fn press(&mut self, x: i32, y: i32) {
        self.selection = Selection {
            pressed: (x, y),
            released: (x, y),
            selecting: true,
        };
    }

    pub fn drag(&mut self, x: i32, y: i32) {
        self.selection.released = (x, y);
    }

    /// Finish the selection and zoom to it.
    ///
    /// A release without a drag still zooms, to a single point.
    pub fn release(&mut self, x: i32, y: i32) -> mandelview_core::Result<()> {
        self.selection.released = (x, y);
        self.selection.selecting = false;
        self.mapper = self
            .mapper
            .zoomed(self.selection.pressed, self.selection.released)?;
        info!(
            upper_left = %self.mapper.upper_left(),
            lower_right = %self.mapper.lower_right(),
            "Zoomed"
        );
        Ok(())
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.mapper = self.mapper.resized(width, height);
        debug!(
            width = self.mapper.width(),
            height = self.mapper.height(),
            "Resized"
        );
    }

    /// Render and colorize the current region. While a drag is in progress
    /// the selection rectangle is outlined on top.
    pub fn render_frame(&self, cancel: &Arc<RenderCancel>) -> RenderBuffer {
        let result = render(&self.function, &self.mapper, self.mode, cancel);
        let mut buffer = self.palette.colorize(&result.iterations);
        if self.selection.selecting {
            buffer.stroke_rect(
                self.selection.pressed,
                self.selection.released,
                SELECTION_COLOR,
            );
        }
        buffer
    }

    pub fn export_metadata(&self) -> ExportMetadata {
        let params = self.function.params();
        ExportMetadata::for_view(
            &self.mapper,
            params.max_iterations,
            params.bound,
            self.mode,
            self.palette.len(),
        )
    }

    /// Render a frame and write it to `path`; the format follows the extension.
    pub fn export(&self, path: &Path, cancel: &Arc<RenderCancel>) -> mandelview_render::Result<()> {
        let buffer = self.render_frame(cancel);
        export_image(&buffer, path, &self.export_metadata())
    }

    pub fn last_view(&self) -> LastView {
        LastView::from_mapper(&self.mapper)
    }
}
