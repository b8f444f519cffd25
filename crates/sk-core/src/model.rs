//! Annotation data model.
//!
//! Two kinds of state make up a sketch: ink, which lives only as pixels in
//! the raster surface, and text labels, which stay as editable vector
//! elements layered above it. A `HistoryState` pairs one of each.

use crate::geometry::Point;
use crate::id::ElementId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ─── Tools ───────────────────────────────────────────────────────────────

/// The active interaction mode; decides how pointer events are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Draw,
    Erase,
    Text,
}

impl Tool {
    pub fn name(self) -> &'static str {
        match self {
            Tool::Draw => "draw",
            Tool::Erase => "erase",
            Tool::Text => "text",
        }
    }

    /// Parse a host-side tool name. Unknown names fall back to `Draw`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "erase" => Tool::Erase,
            "text" => Tool::Text,
            _ => Tool::Draw,
        }
    }

    /// The raster compositing mode for ink tools, `None` for text.
    pub fn stroke_mode(self) -> Option<StrokeMode> {
        match self {
            Tool::Draw => Some(StrokeMode::Draw),
            Tool::Erase => Some(StrokeMode::Erase),
            Tool::Text => None,
        }
    }
}

/// How a stroke composites onto the raster surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    /// Solid ink painted over existing pixels.
    Draw,
    /// Cut-out: clears whatever is underneath, background included.
    Erase,
}

// ─── Text elements ───────────────────────────────────────────────────────

/// A draggable, editable text label positioned in the container frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: ElementId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub is_editing: bool,
    pub is_dragging: bool,
}

impl TextElement {
    /// A freshly placed label: empty and in edit mode.
    pub fn new(id: ElementId, at: Point) -> Self {
        Self {
            id,
            text: String::new(),
            x: at.x,
            y: at.y,
            is_editing: true,
            is_dragging: false,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ─── History ─────────────────────────────────────────────────────────────

/// An encoded capture of the full raster surface.
///
/// The bytes are immutable and shared, so cloning a snapshot (or a
/// `HistoryState` holding one) never copies pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSnapshot {
    pub width: u32,
    pub height: u32,
    pub bytes: Arc<[u8]>,
}

impl RasterSnapshot {
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes: bytes.into(),
        }
    }
}

/// One undo step: raster pixels and text labels captured at the same
/// instant.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    pub raster: RasterSnapshot,
    pub text_elements: Vec<TextElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names_roundtrip() {
        for tool in [Tool::Draw, Tool::Erase, Tool::Text] {
            assert_eq!(Tool::from_name(tool.name()), tool);
        }
        assert_eq!(Tool::from_name("lasso"), Tool::Draw);
    }

    #[test]
    fn only_ink_tools_stroke() {
        assert_eq!(Tool::Draw.stroke_mode(), Some(StrokeMode::Draw));
        assert_eq!(Tool::Erase.stroke_mode(), Some(StrokeMode::Erase));
        assert_eq!(Tool::Text.stroke_mode(), None);
    }

    #[test]
    fn text_element_json_uses_camel_case() {
        let el = TextElement::new(ElementId::intern("text_json"), Point::new(10.0, 20.0));
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["id"], "text_json");
        assert_eq!(json["isEditing"], true);
        assert_eq!(json["isDragging"], false);
        assert_eq!(json["x"], 10.0);
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let mut el = TextElement::new(ElementId::intern("text_blank"), Point::ZERO);
        el.text = "  \t ".to_string();
        assert!(el.is_blank());
        el.text = " sleeve ".to_string();
        assert!(!el.is_blank());
    }
}
