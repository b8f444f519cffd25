//! Editor configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a drawing session. Every field has a default, so a host
/// may pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of history entries kept (oldest evicted first).
    pub history_depth: usize,
    /// Line width of the draw tool, in surface pixels.
    pub draw_width: f32,
    /// Line width of the erase tool, in surface pixels.
    pub erase_width: f32,
    /// Straight-alpha RGBA ink colour.
    pub ink_color: [u8; 4],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 20,
            draw_width: 2.0,
            erase_width: 20.0,
            ink_color: [0, 0, 0, 255],
        }
    }
}

impl EditorConfig {
    /// History depth with the degenerate 0 raised to 1.
    pub fn effective_history_depth(&self) -> usize {
        self.history_depth.max(1)
    }
}
