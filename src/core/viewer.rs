use log::debug;

use crate::core::fit::fit;
use crate::core::pipeline::{ImageSource, LoadedBitmap};
use crate::error::ViewerError;
use crate::traits::{PresentOutcome, RenderTarget, TargetFactory, Viewport};

/// Bitmap cache of one target.
enum BitmapSlot<B> {
    Empty,
    Ready(LoadedBitmap<B>),
    /// The pipeline failed; only the background is drawn
    Failed,
}

/// Rendering resources of one window.
///
/// The bitmap lives inside the target variant, so it cannot outlive the
/// context that created it. A failed load is remembered across a lost
/// target so the pipeline never runs twice.
enum RenderState<T: RenderTarget> {
    NoTarget {
        load_failed: bool,
    },
    HasTarget {
        target: T,
        bitmap: BitmapSlot<T::Bitmap>,
    },
}

impl<T: RenderTarget> RenderState<T> {
    fn load_failed(&self) -> bool {
        matches!(
            self,
            RenderState::NoTarget { load_failed: true }
                | RenderState::HasTarget {
                    bitmap: BitmapSlot::Failed,
                    ..
                }
        )
    }
}

/// Observable state of the resource state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoTarget,
    NoBitmap,
    HasBitmap,
    /// The pipeline failed once; only the background is drawn from now on
    LoadFailed,
}

/// Result of a paint, telling the host whether to schedule another one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    Presented,
    Skipped,
    /// Surface needed reconfiguring; paint again
    Retry,
    /// Target and bitmap were discarded; the next paint rebuilds them
    Rebuild,
}

/// Per-window context: what to show, how to build targets, and the
/// resources currently built.
pub struct Viewer<F: TargetFactory> {
    source: ImageSource,
    factory: F,
    viewport: Viewport,
    state: RenderState<F::Target>,
    loads: u32,
}

impl<F: TargetFactory> Viewer<F> {
    pub fn new(source: ImageSource, factory: F, viewport: Viewport) -> Self {
        Self {
            source,
            factory,
            viewport,
            state: RenderState::NoTarget { load_failed: false },
            loads: 0,
        }
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of times the image pipeline has run
    pub fn loads(&self) -> u32 {
        self.loads
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            RenderState::NoTarget { .. } => Phase::NoTarget,
            RenderState::HasTarget { bitmap, .. } => match bitmap {
                BitmapSlot::Empty => Phase::NoBitmap,
                BitmapSlot::Ready(_) => Phase::HasBitmap,
                BitmapSlot::Failed => Phase::LoadFailed,
            },
        }
    }

    /// Pixel size of the cached bitmap
    pub fn bitmap_size(&self) -> Option<(u32, u32)> {
        match &self.state {
            RenderState::HasTarget {
                bitmap: BitmapSlot::Ready(loaded),
                ..
            } => Some((loaded.width, loaded.height)),
            _ => None,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let RenderState::HasTarget { target, .. } = &mut self.state {
            target.resize(viewport);
        }
    }

    /// Draw one frame, building the target and bitmap first if needed
    pub fn paint(&mut self) -> Result<PaintOutcome, ViewerError> {
        if let RenderState::NoTarget { load_failed } = self.state {
            let target = self.factory.create_target(self.viewport)?;
            debug!(
                "render target created at {}x{}",
                self.viewport.width, self.viewport.height
            );
            self.state = RenderState::HasTarget {
                target,
                bitmap: if load_failed {
                    BitmapSlot::Failed
                } else {
                    BitmapSlot::Empty
                },
            };
        }

        let outcome = match &mut self.state {
            RenderState::NoTarget { .. } => return Ok(PaintOutcome::Skipped),
            RenderState::HasTarget { target, bitmap } => {
                if let BitmapSlot::Empty = bitmap {
                    self.loads += 1;
                    match self.source.load(target) {
                        Ok(loaded) => *bitmap = BitmapSlot::Ready(loaded),
                        Err(err) => {
                            *bitmap = BitmapSlot::Failed;
                            return Err(err);
                        }
                    }
                }

                let frame = match bitmap {
                    BitmapSlot::Ready(loaded) => {
                        let dst = fit(
                            loaded.width,
                            loaded.height,
                            self.viewport.width,
                            self.viewport.height,
                        );
                        Some((&loaded.bitmap, dst))
                    }
                    BitmapSlot::Empty | BitmapSlot::Failed => None,
                };
                target.present(frame)?
            }
        };

        Ok(match outcome {
            PresentOutcome::Presented => PaintOutcome::Presented,
            PresentOutcome::Skipped => PaintOutcome::Skipped,
            PresentOutcome::Retry => PaintOutcome::Retry,
            PresentOutcome::TargetLost => {
                debug!("render target lost, discarding target and bitmap");
                self.discard();
                PaintOutcome::Rebuild
            }
        })
    }

    /// Release the bitmap, then the target that owns it
    pub fn discard(&mut self) {
        let load_failed = self.state.load_failed();
        if let RenderState::HasTarget { target, bitmap } =
            std::mem::replace(&mut self.state, RenderState::NoTarget { load_failed })
        {
            drop(bitmap);
            drop(target);
        }
    }
}

impl<F: TargetFactory> Drop for Viewer<F> {
    fn drop(&mut self) {
        self.discard();
    }
}
