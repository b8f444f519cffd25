//! Canvas2D presentation of the raster surface.

use sk_render::RasterSurface;
use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, ImageData};

/// Copy the whole surface onto `ctx` at the origin. `ImageData` wants
/// straight alpha, so the premultiplied buffer is converted first.
pub fn blit_surface(
    ctx: &CanvasRenderingContext2d,
    surface: &RasterSurface,
) -> Result<(), JsValue> {
    let rgba = surface.to_rgba8();
    let image = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(&rgba[..]),
        surface.width(),
        surface.height(),
    )?;
    ctx.put_image_data(&image, 0.0, 0.0)
}
