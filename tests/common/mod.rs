#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use image_viewer::{
    AlphaMode, PixelBuffer, PresentOutcome, Rect, RenderTarget, TargetFactory, ViewerError,
    Viewport,
};

/// A file in the temp dir, removed when dropped
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Take ownership of an existing temp file
    pub fn adopt(path: PathBuf) -> Self {
        Self { path }
    }

    /// Unique per-process path; nothing is written yet
    pub fn reserve(name: &str, extension: &str) -> Self {
        Self::adopt(std::env::temp_dir().join(format!(
            "image_viewer_{}_{}.{}",
            std::process::id(),
            name,
            extension
        )))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename on disk, keeping the guard in charge of the new name
    pub fn rename_to_extension(mut self, extension: &str) -> Self {
        let renamed = self.path.with_extension(extension);
        std::fs::rename(&self.path, &renamed).expect("rename temp file");
        self.path = renamed;
        self
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Write a solid PNG to the temp dir
pub fn write_png(name: &str, width: u32, height: u32, pixel: [u8; 4]) -> TempFile {
    let file = TempFile::reserve(name, "png");
    RgbaImage::from_pixel(width, height, Rgba(pixel))
        .save(file.path())
        .expect("write test image");
    file
}

/// Write arbitrary bytes that no decoder accepts
pub fn write_garbage(name: &str) -> TempFile {
    let file = TempFile::reserve(name, "png");
    std::fs::write(file.path(), b"definitely not an image").expect("write garbage");
    file
}

/// Everything the mock backend was asked to do
#[derive(Debug, Default)]
pub struct Calls {
    pub targets_created: u32,
    pub bitmap_attempts: Vec<AlphaMode>,
    pub first_pixels: Vec<[u8; 4]>,
    pub presents: Vec<Option<Rect>>,
    pub resizes: Vec<Viewport>,
    /// Next present reports a lost context
    pub lose_next_present: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rejection {
    #[default]
    None,
    Premultiplied,
    Everything,
}

pub struct MockBitmap {
    pub width: u32,
    pub height: u32,
    pub alpha_mode: AlphaMode,
}

pub struct MockTarget {
    calls: Rc<RefCell<Calls>>,
    rejection: Rejection,
    viewport: Viewport,
}

impl RenderTarget for MockTarget {
    type Bitmap = MockBitmap;

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.calls.borrow_mut().resizes.push(viewport);
    }

    fn create_bitmap(&mut self, pixels: &PixelBuffer) -> Result<MockBitmap, ViewerError> {
        let mut calls = self.calls.borrow_mut();
        calls.bitmap_attempts.push(pixels.alpha_mode);

        let rejected = match self.rejection {
            Rejection::None => false,
            Rejection::Premultiplied => pixels.alpha_mode == AlphaMode::Premultiplied,
            Rejection::Everything => true,
        };
        if rejected {
            return Err(ViewerError::Bitmap("mock rejection".into()));
        }

        let mut first = [0u8; 4];
        first.copy_from_slice(&pixels.data[..4]);
        calls.first_pixels.push(first);

        Ok(MockBitmap {
            width: pixels.width,
            height: pixels.height,
            alpha_mode: pixels.alpha_mode,
        })
    }

    fn present(
        &mut self,
        frame: Option<(&MockBitmap, Rect)>,
    ) -> Result<PresentOutcome, ViewerError> {
        let mut calls = self.calls.borrow_mut();
        if std::mem::take(&mut calls.lose_next_present) {
            return Ok(PresentOutcome::TargetLost);
        }
        calls.presents.push(frame.map(|(_, dst)| dst));
        if self.viewport.is_empty() {
            Ok(PresentOutcome::Skipped)
        } else {
            Ok(PresentOutcome::Presented)
        }
    }
}

pub struct MockFactory {
    pub calls: Rc<RefCell<Calls>>,
    pub rejection: Rejection,
    pub fail: bool,
}

impl MockFactory {
    pub fn new(rejection: Rejection) -> (Self, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let factory = Self {
            calls: calls.clone(),
            rejection,
            fail: false,
        };
        (factory, calls)
    }
}

impl TargetFactory for MockFactory {
    type Target = MockTarget;

    fn create_target(&mut self, viewport: Viewport) -> Result<MockTarget, ViewerError> {
        if self.fail {
            return Err(ViewerError::NoSurfaceFormat);
        }
        self.calls.borrow_mut().targets_created += 1;
        Ok(MockTarget {
            calls: self.calls.clone(),
            rejection: self.rejection,
            viewport,
        })
    }
}
