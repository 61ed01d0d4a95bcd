mod app_dir;
mod args;
mod error;
mod preferences;
mod viewer;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use mandelview_core::Mandelbrot;
use mandelview_render::{Palette, RenderCancel};

use args::CliArgs;
use error::AppError;
use preferences::ViewerPreferences;
use viewer::Viewer;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting mandelview");

    match run(&CliArgs::parse()) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<PathBuf, AppError> {
    let mut stored = if args.fresh {
        ViewerPreferences::default()
    } else {
        ViewerPreferences::load()
    };
    let prefs = args.apply(&stored);

    let function = Mandelbrot::new(prefs.escape_params()?);
    let mut viewer = Viewer::new(
        stored.initial_mapper(),
        function,
        Palette::spectrum(prefs.num_colors),
        prefs.color_mode,
    );
    viewer.resize(prefs.width, prefs.height);

    for (pressed, released) in args.selections() {
        viewer.press(pressed.0, pressed.1);
        viewer.drag(released.0, released.1);
        viewer.release(released.0, released.1)?;
    }

    let path = args.output.clone().unwrap_or_else(|| prefs.output_path());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mapper = viewer.mapper();
    info!(
        width = mapper.width(),
        height = mapper.height(),
        upper_left = %mapper.upper_left(),
        lower_right = %mapper.lower_right(),
        "Rendering view"
    );
    let cancel = Arc::new(RenderCancel::new());
    viewer.export(&path, &cancel)?;

    if !args.fresh {
        stored.last_view = Some(viewer.last_view());
        stored.save();
    }
    Ok(path)
}
