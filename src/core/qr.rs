//! QR rendering to PNG

use crate::domain::{QrBatchError, Result};
use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};

const DARK: u8 = 0;
const LIGHT: u8 = 255;
/// Pixels per module when the requested width is too small to fit the symbol
const FALLBACK_SCALE: f64 = 4.0;

/// Renders token strings into square grayscale PNGs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrEncoder {
    width: u32,
    margin: u32,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new(600, 1)
    }
}

impl QrEncoder {
    /// `width` is the target image side in pixels, `margin` the quiet zone in modules
    pub fn new(width: u32, margin: u32) -> Self {
        Self { width, margin }
    }

    /// Encodes `data` at error-correction level M and returns PNG bytes
    ///
    /// # Errors
    ///
    /// [`QrBatchError::Encoding`] when the data does not fit in a QR symbol or the
    /// PNG cannot be written.
    pub fn render(&self, data: &str) -> Result<Vec<u8>> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
            .map_err(|e| QrBatchError::Encoding(format!("QR generation failed: {e}")))?;

        let modules = code.width();
        let colors = code.to_colors();
        let margin = self.margin as f64;
        let span = modules as f64 + 2.0 * margin;
        let (scale, side) = if self.width as f64 >= span {
            (self.width as f64 / span, self.width)
        } else {
            (FALLBACK_SCALE, (span * FALLBACK_SCALE).floor() as u32)
        };
        let scaled_margin = margin * scale;
        let limit = side as f64 - scaled_margin;

        let img = ImageBuffer::<Luma<u8>, Vec<u8>>::from_fn(side, side, |x, y| {
            let (px, py) = (x as f64, y as f64);
            if px < scaled_margin || py < scaled_margin || px >= limit || py >= limit {
                return Luma([LIGHT]);
            }
            let col = (((px - scaled_margin) / scale).floor() as usize).min(modules - 1);
            let row = (((py - scaled_margin) / scale).floor() as usize).min(modules - 1);
            match colors[row * modules + col] {
                Color::Dark => Luma([DARK]),
                Color::Light => Luma([LIGHT]),
            }
        });

        let mut png_buf = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut png_buf, ImageOutputFormat::Png)
            .map_err(|e| QrBatchError::Encoding(format!("Failed to encode PNG: {e}")))?;

        tracing::trace!(
            modules,
            side,
            png_size = png_buf.get_ref().len(),
            "Rendered QR image"
        );

        Ok(png_buf.into_inner())
    }
}
