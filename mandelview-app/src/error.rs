use thiserror::Error;

/// Errors that end a viewer run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] mandelview_core::CoreError),

    #[error(transparent)]
    Render(#[from] mandelview_render::RenderError),

    #[error("failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),
}
