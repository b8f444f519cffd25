//! The raster surface: a fixed-size pixel buffer holding the background
//! image and all ink.

use crate::codec;
use base64::{Engine as _, engine::general_purpose};
use sk_core::{RasterSnapshot, Size, SketchError};
use tiny_skia::{Color, Pixmap};

/// An owned RGBA bitmap with fixed dimensions.
///
/// Created once from the host element's layout size and never resized;
/// a new surface is created when the host element is re-attached.
pub struct RasterSurface {
    pixmap: Pixmap,
}

impl RasterSurface {
    /// Allocate a transparent surface. Fails for a zero dimension.
    pub fn new(width: u32, height: u32) -> Result<Self, SketchError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            SketchError::Surface(format!("cannot allocate a {width}x{height} surface"))
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

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Premultiplied RGBA of one pixel, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap
            .pixel(x, y)
            .map(|p| [p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Raw premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha RGBA bytes, row-major, as a browser `ImageData`
    /// expects them.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for p in self.pixmap.pixels() {
            let c = p.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Capture the full pixel content for the history stack.
    pub fn snapshot(&self) -> Result<RasterSnapshot, SketchError> {
        codec::encode(self.width(), self.height(), self.pixmap.data())
    }

    /// Replace the full pixel content with a previously captured snapshot.
    ///
    /// On any failure the current pixels are left untouched.
    pub fn restore(&mut self, snapshot: &RasterSnapshot) -> Result<(), SketchError> {
        if snapshot.width != self.width() || snapshot.height != self.height() {
            return Err(SketchError::Surface(format!(
                "snapshot is {}x{}, surface is {}x{}",
                snapshot.width,
                snapshot.height,
                self.width(),
                self.height()
            )));
        }
        let data = codec::decode(snapshot)?;
        let dst = self.pixmap.data_mut();
        if data.len() != dst.len() {
            return Err(SketchError::Decode(format!(
                "snapshot holds {} bytes, surface needs {}",
                data.len(),
                dst.len()
            )));
        }
        dst.copy_from_slice(&data);
        Ok(())
    }

    /// Encode the surface as a regular (straight-alpha) PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, SketchError> {
        self.pixmap
            .encode_png()
            .map_err(|e| SketchError::Surface(format!("cannot encode PNG: {e}")))
    }

    /// The surface as a `data:image/png;base64,…` URL, the form the
    /// generation service accepts for the sketch image.
    pub fn export_data_url(&self) -> Result<String, SketchError> {
        let png = self.export_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(png)
        ))
    }
}
