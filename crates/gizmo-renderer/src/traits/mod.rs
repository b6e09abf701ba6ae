//! Renderer traits

mod sub_renderer;

pub use sub_renderer::*;
