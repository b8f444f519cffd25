//! Background image: the uploaded flat sketch (or a generated rendering)
//! painted beneath the ink, scaled to fit and centered.

use crate::surface::RasterSurface;
use base64::{Engine as _, engine::general_purpose};
use sk_core::{Size, SketchError, fit_centered};
use std::fmt;
use tiny_skia::{ColorU8, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

/// Reject anything that is not an `image/*` media type.
pub fn validate_media_type(mime: &str) -> Result<(), SketchError> {
    if mime.trim().to_ascii_lowercase().starts_with("image/") {
        Ok(())
    } else {
        Err(SketchError::InvalidInput(format!(
            "please upload an image file (got {mime:?})"
        )))
    }
}

/// A decoded raster image held premultiplied, ready to composite.
pub struct BackgroundImage {
    pixmap: Pixmap,
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl BackgroundImage {
    /// Decode PNG/JPEG/WebP/GIF/BMP bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, SketchError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| SketchError::Decode(format!("cannot decode image: {e}")))?;
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        Self::from_rgba8(w, h, rgba.into_raw())
    }

    /// Decode a `data:<mime>;base64,<payload>` URL as produced by a file
    /// picker or returned by the generation service.
    pub fn from_data_url(url: &str) -> Result<Self, SketchError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| SketchError::InvalidInput("not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| SketchError::InvalidInput("data URL has no payload".to_string()))?;
        let mime = header.split(';').next().unwrap_or_default();
        validate_media_type(mime)?;
        if !header.split(';').any(|p| p == "base64") {
            return Err(SketchError::InvalidInput(
                "data URL payload is not base64".to_string(),
            ));
        }
        let bytes = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| SketchError::Decode(format!("bad base64 payload: {e}")))?;
        Self::decode(&bytes)
    }

    /// Build from straight-alpha RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> Result<Self, SketchError> {
        let size = IntSize::from_wh(width, height)
            .ok_or_else(|| SketchError::Decode(format!("empty image {width}x{height}")))?;
        for px in rgba.chunks_exact_mut(4) {
            let p = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            px.copy_from_slice(&[p.red(), p.green(), p.blue(), p.alpha()]);
        }
        let pixmap = Pixmap::from_vec(rgba, size).ok_or_else(|| {
            SketchError::Decode(format!("pixel buffer does not match {width}x{height}"))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as f64, self.height() as f64)
    }

    /// Composite onto `surface`, scaled to fit with aspect ratio preserved
    /// and centered.
    pub fn draw_onto(&self, surface: &mut RasterSurface) {
        let dest = fit_centered(self.size(), surface.size());
        if dest.area() <= 0.0 {
            return;
        }
        let sx = (dest.width() / self.width() as f64) as f32;
        let sy = (dest.height() / self.height() as f64) as f32;
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, dest.x0 as f32, dest.y0 as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        log::trace!(
            "BACKGROUND {}x{} -> ({:.1}, {:.1}) {:.1}x{:.1}",
            self.width(),
            self.height(),
            dest.x0,
            dest.y0,
            dest.width(),
            dest.height()
        );
        surface
            .pixmap_mut()
            .draw_pixmap(0, 0, self.pixmap.as_ref(), &paint, transform, None);
    }
}
