//! Image export. PNG carries view metadata in tEXt chunks; other formats are
//! written through the `image` crate without metadata.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::ImageFormat;
use tracing::{debug, info};

use mandelview_core::PixelMapper;

use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::renderer::ColorMode;

const SOFTWARE: &str = "mandelview";

/// Metadata to embed in an exported PNG as tEXt chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMetadata {
    pub upper_left: String,
    pub lower_right: String,
    pub max_iterations: u32,
    pub bound: f64,
    pub color_mode: ColorMode,
    pub num_colors: usize,
    pub width: u32,
    pub height: u32,
}

impl ExportMetadata {
    /// Describe a frame of `mapper`'s region.
    pub fn for_view(
        mapper: &PixelMapper,
        max_iterations: u32,
        bound: f64,
        color_mode: ColorMode,
        num_colors: usize,
    ) -> Self {
        Self {
            upper_left: mapper.upper_left().to_string(),
            lower_right: mapper.lower_right().to_string(),
            max_iterations,
            bound,
            color_mode,
            num_colors,
            width: mapper.width(),
            height: mapper.height(),
        }
    }

    fn description(&self) -> String {
        format!(
            "Mandelbrot - Upper left: {}, Lower right: {}, Iterations: {}",
            self.upper_left, self.lower_right, self.max_iterations,
        )
    }

    fn pairs(&self) -> Vec<(String, String)> {
        let mode = match self.color_mode {
            ColorMode::Palette => "palette",
            ColorMode::InsideOutside => "inside_outside",
        };
        vec![
            ("mandelview.UpperLeft".into(), self.upper_left.clone()),
            ("mandelview.LowerRight".into(), self.lower_right.clone()),
            ("mandelview.MaxIterations".into(), self.max_iterations.to_string()),
            ("mandelview.Bound".into(), self.bound.to_string()),
            ("mandelview.ColorMode".into(), mode.into()),
            ("mandelview.Colors".into(), self.num_colors.to_string()),
            ("mandelview.Resolution".into(), format!("{}x{}", self.width, self.height)),
        ]
    }
}

fn check_dimensions(buffer: &RenderBuffer) -> crate::Result<()> {
    let expected = buffer.width as usize * buffer.height as usize * 4;
    if buffer.width == 0 || buffer.height == 0 || buffer.pixels.len() != expected {
        return Err(RenderError::InvalidDimensions {
            width: buffer.width,
            height: buffer.height,
        });
    }
    Ok(())
}

/// Write an RGBA buffer as a PNG file with embedded view metadata.
///
/// Uses the `png` crate directly (rather than `image`) so custom tEXt chunks
/// can be added.
pub fn export_png(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    check_dimensions(buffer)?;
    let writer = BufWriter::new(File::create(path)?);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), SOFTWARE.to_string())?;
    encoder.add_text_chunk("Description".to_string(), metadata.description())?;
    for (key, value) in metadata.pairs() {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;

    debug!(
        "Exported PNG {}x{} to {}",
        buffer.width,
        buffer.height,
        path.display()
    );
    Ok(())
}

/// Write `buffer` in the format named by the file extension.
///
/// `.png` goes through [`export_png`]; `.bmp` and `.ico` are encoded by the
/// `image` crate. Anything else is [`RenderError::UnsupportedFormat`].
pub fn export_image(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ImageFormat::from_extension(&extension) {
        Some(ImageFormat::Png) => export_png(buffer, path, metadata)?,
        Some(format @ (ImageFormat::Bmp | ImageFormat::Ico)) => {
            check_dimensions(buffer)?;
            image::save_buffer_with_format(
                path,
                &buffer.pixels,
                buffer.width,
                buffer.height,
                image::ColorType::Rgba8,
                format,
            )?;
        }
        _ => return Err(RenderError::UnsupportedFormat(extension)),
    }

    info!(path = %path.display(), "Image exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn metadata(width: u32, height: u32) -> ExportMetadata {
        ExportMetadata {
            upper_left: "(-2,2i)".into(),
            lower_right: "(2,-2i)".into(),
            max_iterations: 50,
            bound: 2.0,
            color_mode: ColorMode::Palette,
            num_colors: 50,
            width,
            height,
        }
    }

    #[test]
    fn export_creates_valid_png() {
        let mut buffer = RenderBuffer::new(4, 4);
        buffer.pixels.fill(128);
        let dir = std::env::temp_dir().join("mandelview_test_export");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_export.png");
        export_png(&buffer, &path, &metadata(4, 4)).expect("export should succeed");

        let mut file = std::fs::File::open(&path).expect("file should exist");
        let mut header = [0u8; 8];
        file.read_exact(&mut header).expect("should read header");
        assert_eq!(&header, b"\x89PNG\r\n\x1a\n", "valid PNG signature");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_embeds_text_chunks() {
        let buffer = RenderBuffer::new(2, 2);
        let dir = std::env::temp_dir().join("mandelview_test_export_meta");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_meta.png");
        let mut meta = metadata(2, 2);
        meta.color_mode = ColorMode::InsideOutside;
        export_png(&buffer, &path, &meta).expect("export should succeed");

        let decoder = png::Decoder::new(std::fs::File::open(&path).expect("file should exist"));
        let reader = decoder.read_info().expect("should read info");
        let texts: Vec<_> = reader.info().uncompressed_latin1_text.iter().collect();
        assert!(
            texts.iter().any(|t| t.keyword == "Software" && t.text == "mandelview"),
            "Should contain Software text chunk"
        );
        assert!(
            texts
                .iter()
                .any(|t| t.keyword == "mandelview.UpperLeft" && t.text == "(-2,2i)"),
            "Should contain upper-left corner chunk"
        );
        assert!(
            texts
                .iter()
                .any(|t| t.keyword == "mandelview.ColorMode" && t.text == "inside_outside"),
            "Should contain color mode chunk"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn format_follows_extension() {
        let buffer = RenderBuffer::new(3, 2);
        let dir = std::env::temp_dir().join("mandelview_test_export_ext");
        let _ = std::fs::create_dir_all(&dir);

        let bmp = dir.join("frame.BMP");
        export_image(&buffer, &bmp, &metadata(3, 2)).expect("bmp export should succeed");
        let mut header = [0u8; 2];
        std::fs::File::open(&bmp)
            .and_then(|mut f| f.read_exact(&mut header))
            .expect("should read header");
        assert_eq!(&header, b"BM");

        let png = dir.join("frame.png");
        export_image(&buffer, &png, &metadata(3, 2)).expect("png export should succeed");
        assert!(png.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let buffer = RenderBuffer::new(2, 2);
        let path = std::env::temp_dir().join("mandelview_never_written.xyz");
        let err = export_image(&buffer, &path, &metadata(2, 2)).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(ext) if ext == "xyz"));
        assert!(!path.exists());

        let err = export_image(&buffer, Path::new("no_extension"), &metadata(2, 2)).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(_)));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let buffer = RenderBuffer::new(0, 5);
        let path = std::env::temp_dir().join("mandelview_empty.png");
        let err = export_png(&buffer, &path, &metadata(0, 5)).unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidDimensions {
                width: 0,
                height: 5
            }
        ));
    }

    #[test]
    fn metadata_describes_view() {
        let mapper = PixelMapper::with_size(700, 700);
        let meta = ExportMetadata::for_view(&mapper, 50, 2.0, ColorMode::Palette, 50);
        assert_eq!(meta, metadata(700, 700));
    }
}
