use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use mandelview_core::{Complex, EscapeParams, PixelMapper, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use mandelview_render::{ColorMode, DEFAULT_COLOR_COUNT};

// ---------------------------------------------------------------------------
// Last-view snapshot
// ---------------------------------------------------------------------------

/// Region shown at the end of the previous run.
///
/// Corners are optional so a hand-edited or truncated file still parses;
/// a view with a missing corner is not restored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastView {
    #[serde(default)]
    pub upper_left: Option<Complex>,
    #[serde(default)]
    pub lower_right: Option<Complex>,
}

impl LastView {
    pub fn from_mapper(mapper: &PixelMapper) -> Self {
        Self {
            upper_left: Some(mapper.upper_left()),
            lower_right: Some(mapper.lower_right()),
        }
    }

    pub fn to_mapper(&self, width: i32, height: i32) -> mandelview_core::Result<PixelMapper> {
        PixelMapper::from_corners(width, height, self.upper_left, self.lower_right)
    }
}

// ---------------------------------------------------------------------------
// Viewer preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerPreferences {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_bound")]
    pub bound: f64,
    #[serde(default = "default_num_colors")]
    pub num_colors: usize,
    #[serde(default)]
    pub color_mode: ColorMode,
    /// Where exports go. When empty, an `images/` folder next to the executable is used.
    #[serde(default)]
    pub output_dir: String,
    #[serde(default = "default_true")]
    pub restore_last_view: bool,
    #[serde(default)]
    pub last_view: Option<LastView>,
}

fn default_width() -> i32 {
    DEFAULT_WIDTH as i32
}
fn default_height() -> i32 {
    DEFAULT_HEIGHT as i32
}
fn default_max_iterations() -> u32 {
    EscapeParams::DEFAULT_MAX_ITERATIONS
}
fn default_bound() -> f64 {
    EscapeParams::DEFAULT_BOUND
}
fn default_num_colors() -> usize {
    DEFAULT_COLOR_COUNT
}
fn default_true() -> bool {
    true
}

impl Default for ViewerPreferences {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            max_iterations: default_max_iterations(),
            bound: default_bound(),
            num_colors: default_num_colors(),
            color_mode: ColorMode::default(),
            output_dir: String::new(),
            restore_last_view: true,
            last_view: None,
        }
    }
}

impl ViewerPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Persist preferences next to the executable.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<ViewerPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    return prefs;
                }
                Err(e) => error!("Failed to parse preferences: {e}"),
            },
            Err(e) => error!("Failed to read preferences file: {e}"),
        }
        Self::default()
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create preferences directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences to {}", path.display());
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    pub fn escape_params(&self) -> mandelview_core::Result<EscapeParams> {
        EscapeParams::new(self.max_iterations, self.bound)
    }

    /// The mapper to start from: the stored view when restoring is enabled
    /// and the view is complete, otherwise the default region.
    pub fn initial_mapper(&self) -> PixelMapper {
        if self.restore_last_view {
            if let Some(view) = &self.last_view {
                match view.to_mapper(self.width, self.height) {
                    Ok(mapper) => {
                        debug!("Restoring last view");
                        return mapper;
                    }
                    Err(e) => warn!("Discarding stored view: {e}"),
                }
            }
        }
        PixelMapper::with_size(self.width, self.height)
    }

    /// Default export path inside the output directory.
    pub fn output_path(&self) -> PathBuf {
        crate::app_dir::output_directory(&self.output_dir).join("mandelbrot.png")
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("mandelview_prefs_tests");
        let _ = fs::create_dir_all(&dir);
        dir.join(name)
    }

    #[test]
    fn empty_object_gives_defaults() {
        let prefs: ViewerPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, ViewerPreferences::default());
        assert_eq!(prefs.width, 700);
        assert_eq!(prefs.max_iterations, 50);
        assert_eq!(prefs.bound, 2.0);
        assert_eq!(prefs.num_colors, 50);
        assert_eq!(prefs.color_mode, ColorMode::Palette);
        assert!(prefs.restore_last_view);
    }

    #[test]
    fn color_mode_uses_snake_case() {
        let prefs: ViewerPreferences =
            serde_json::from_str(r#"{"color_mode":"inside_outside"}"#).unwrap();
        assert_eq!(prefs.color_mode, ColorMode::InsideOutside);
        let json = serde_json::to_string(&prefs).unwrap();
        assert!(json.contains(r#""color_mode":"inside_outside""#));
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_file("round_trip.json");
        let mut prefs = ViewerPreferences {
            width: 320,
            num_colors: 12,
            ..Default::default()
        };
        prefs.last_view = Some(LastView {
            upper_left: Some(Complex::new(-1.0, 0.5)),
            lower_right: Some(Complex::new(-0.5, 0.0)),
        });
        prefs.save_to(&path);

        assert_eq!(ViewerPreferences::load_from(&path), prefs);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let path = temp_file("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ViewerPreferences::load_from(&path), ViewerPreferences::default());
        let _ = fs::remove_file(&path);

        let missing = temp_file("does_not_exist.json");
        assert_eq!(ViewerPreferences::load_from(&missing), ViewerPreferences::default());
    }

    #[test]
    fn restores_complete_last_view() {
        let view = LastView {
            upper_left: Some(Complex::new(-1.0, 1.0)),
            lower_right: Some(Complex::new(0.0, 0.0)),
        };
        let prefs = ViewerPreferences {
            width: 100,
            height: 80,
            last_view: Some(view),
            ..Default::default()
        };
        let mapper = prefs.initial_mapper();
        assert_eq!(mapper.upper_left(), Complex::new(-1.0, 1.0));
        assert_eq!(mapper.width(), 100);
        assert_eq!(mapper.height(), 80);
    }

    #[test]
    fn incomplete_last_view_is_discarded() {
        let prefs: ViewerPreferences = serde_json::from_str(
            r#"{"last_view":{"upper_left":{"re":-1.0,"im":1.0}}}"#,
        )
        .unwrap();
        let view = prefs.last_view.clone().unwrap();
        assert_eq!(view.lower_right, None);
        assert!(view.to_mapper(10, 10).is_err());
        assert_eq!(prefs.initial_mapper(), PixelMapper::default());
    }

    #[test]
    fn restore_can_be_disabled() {
        let prefs = ViewerPreferences {
            restore_last_view: false,
            last_view: Some(LastView::from_mapper(
                &PixelMapper::new(10, 10, Complex::new(0.0, 1.0), Complex::new(1.0, 0.0)).unwrap(),
            )),
            ..Default::default()
        };
        assert_eq!(prefs.initial_mapper(), PixelMapper::default());
    }

    #[test]
    fn invalid_escape_settings_are_reported() {
        let prefs = ViewerPreferences {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(prefs.escape_params().is_err());
        assert!(ViewerPreferences::default().escape_params().is_ok());
    }

    #[test]
    fn output_path_uses_configured_dir() {
        let prefs = ViewerPreferences {
            output_dir: "/tmp/frames".into(),
            ..Default::default()
        };
        assert_eq!(prefs.output_path(), PathBuf::from("/tmp/frames/mandelbrot.png"));
    }
}
