pub mod fit;
pub mod pipeline;
pub mod pixels;
pub mod viewer;
