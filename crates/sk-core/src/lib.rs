pub mod config;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;

pub use config::EditorConfig;
pub use error::SketchError;
pub use geometry::{Point, Rect, ReferenceFrame, Size, Vec2, fit_centered, to_local};
pub use id::ElementId;
pub use model::*;
