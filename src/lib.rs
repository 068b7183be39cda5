pub mod cli;
pub mod core;
pub mod error;
pub mod events;
pub mod gpu;
pub mod report;
pub mod traits;

pub use cli::{Cli, ViewerConfig, DEFAULT_MAX_DIM};
pub use error::ViewerError;
pub use events::{route, WindowAction};

pub use crate::core::fit::{fit, Rect};
pub use crate::core::pipeline::{target_dimensions, ImageSource, LoadedBitmap, PreparedImage};
pub use crate::core::pixels::{AlphaMode, PixelBuffer};
pub use crate::core::viewer::{PaintOutcome, Phase, Viewer};
pub use traits::{PresentOutcome, RenderTarget, TargetFactory, Viewport};
