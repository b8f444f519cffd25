//! Coordinate mapping between screen space and the editor's two local
//! frames.
//!
//! Pointer events arrive in screen (client) coordinates. Ink is drawn in
//! the raster surface's frame; text annotations are positioned in the
//! surrounding container's frame. The two frames usually differ by the
//! container's padding, so every conversion names its reference bounds
//! explicitly instead of assuming one.

pub use kurbo::{Point, Rect, Size, Vec2};

/// Which on-screen element a pointer position should be made relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFrame {
    /// The raster surface itself. Used for stroke drawing.
    Surface,
    /// The container holding the surface and the text overlay. Used for
    /// text placement and dragging.
    Container,
}

/// Convert a screen-space pointer position into the local space of the
/// element whose screen bounds are `reference`.
///
/// An element that is not attached yet has no bounds; the result is then
/// the origin.
pub fn to_local(pointer: Point, reference: Option<Rect>) -> Point {
    match reference {
        Some(bounds) => Point::new(pointer.x - bounds.x0, pointer.y - bounds.y0),
        None => Point::ZERO,
    }
}

/// Scale `image` to fit inside `surface` preserving aspect ratio, centered.
///
/// Returns the destination rectangle in surface coordinates. A zero-sized
/// image has nothing to fit and yields `Rect::ZERO`.
pub fn fit_centered(image: Size, surface: Size) -> Rect {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rect::ZERO;
    }
    let scale = (surface.width / image.width).min(surface.height / image.height);
    let w = image.width * scale;
    let h = image.height * scale;
    let x = (surface.width - w) / 2.0;
    let y = (surface.height - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}
