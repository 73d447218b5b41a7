//! WebGPU rendering module
//!
//! Shapes are tessellated on the CPU into colored triangles in play-area
//! pixels; the pipeline maps them to the letterboxed surface.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, Viewport};
pub use shapes::build_scene;
pub use vertex::Vertex;
