pub mod buffer;
pub mod error;
pub mod export;
pub mod iteration_buffer;
pub mod palette;
pub mod renderer;

pub use buffer::{RenderBuffer, SELECTION_COLOR};
pub use error::RenderError;
pub use export::{export_image, export_png, ExportMetadata};
pub use iteration_buffer::{IterationBuffer, PixelSample};
pub use palette::{hsb_to_rgb, Palette, DEFAULT_COLOR_COUNT, INSIDE_COLOR, OUTSIDE_COLOR};
pub use renderer::{render, ColorMode, RenderCancel, RenderResult};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
