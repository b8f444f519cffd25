pub mod background;
pub mod codec;
pub mod stroke;
pub mod surface;

pub use background::{BackgroundImage, validate_media_type};
pub use stroke::StrokeRenderer;
pub use surface::RasterSurface;
