//! Host-agnostic pointer input.
//!
//! Positions are screen (client) coordinates; the controller maps them
//! into the surface frame before drawing.

/// A pointer event on the raster surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    /// The pointer left the surface; ends a stroke like `PointerUp`.
    PointerLeave,
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64) -> Self {
        InputEvent::PointerDown { x, y }
    }

    pub fn from_pointer_move(x: f64, y: f64) -> Self {
        InputEvent::PointerMove { x, y }
    }

    pub fn from_pointer_up(x: f64, y: f64) -> Self {
        InputEvent::PointerUp { x, y }
    }
}
