//! Helper functions for page rendering
//!
//! URL generation, escaping, image asset URLs and date formatting shared by
//! the templates and the rich-text renderer.

mod date;
mod html;
mod image;
mod url;

pub use date::*;
pub use html::*;
pub use image::ImageUrlBuilder;
pub use url::*;
