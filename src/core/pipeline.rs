use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use log::{debug, info};

use crate::core::pixels::{AlphaMode, PixelBuffer};
use crate::error::ViewerError;
use crate::traits::RenderTarget;

/// Downsampling filter; never used to enlarge
const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Size after applying the longer-side limit.
///
/// Unchanged when `max(w, h) <= max_dim`. Otherwise the longer side becomes
/// `max_dim` and the shorter side is scaled and rounded, never below 1.
/// A limit of 0 means no limit.
pub fn target_dimensions(w: u32, h: u32, max_dim: u32) -> (u32, u32) {
    if max_dim == 0 || w.max(h) <= max_dim {
        return (w, h);
    }

    let scaled = |shorter: u32, longer: u32| -> u32 {
        let v = (shorter as f64 * max_dim as f64 / longer as f64).round() as u32;
        v.clamp(1, max_dim)
    };

    if w >= h {
        (max_dim, scaled(h, w))
    } else {
        (scaled(w, h), max_dim)
    }
}

/// Decoded (and possibly downsampled) image, not yet uploaded
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub image: DynamicImage,
    pub source_size: (u32, u32),
    pub target_size: (u32, u32),
}

impl PreparedImage {
    pub fn was_resampled(&self) -> bool {
        self.source_size != self.target_size
    }
}

/// Bitmap created by a render target, with its pixel size
#[derive(Debug)]
pub struct LoadedBitmap<B> {
    pub bitmap: B,
    pub width: u32,
    pub height: u32,
    pub alpha_mode: AlphaMode,
}

/// The file to show and the limit to apply to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    path: PathBuf,
    max_dim: u32,
}

impl ImageSource {
    pub fn new(path: impl Into<PathBuf>, max_dim: u32) -> Self {
        Self {
            path: path.into(),
            max_dim,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_dim(&self) -> u32 {
        self.max_dim
    }

    /// Decode the first frame
    pub fn decode(&self) -> Result<DynamicImage, ViewerError> {
        let io_err = |source| ViewerError::Io {
            path: self.path.clone(),
            source,
        };

        ImageReader::open(&self.path)
            .map_err(io_err)?
            .with_guessed_format()
            .map_err(io_err)?
            .decode()
            .map_err(|source| ViewerError::Decode {
                path: self.path.clone(),
                source,
            })
    }

    /// Decode, then downsample if the image exceeds the limit
    pub fn prepare(&self) -> Result<PreparedImage, ViewerError> {
        let image = self.decode()?;
        let (w, h) = image.dimensions();
        let (tw, th) = target_dimensions(w, h, self.max_dim);

        let image = if (tw, th) != (w, h) {
            debug!("resampling {}x{} -> {}x{}", w, h, tw, th);
            image.resize_exact(tw, th, RESAMPLE_FILTER)
        } else {
            image
        };

        Ok(PreparedImage {
            image,
            source_size: (w, h),
            target_size: (tw, th),
        })
    }

    /// Run the whole pipeline against `target`.
    ///
    /// Tries a premultiplied bitmap first; if the target refuses it, retries
    /// once with straight pixels drawn opaque. Only the second failure is an
    /// error.
    pub fn load<T: RenderTarget>(
        &self,
        target: &mut T,
    ) -> Result<LoadedBitmap<T::Bitmap>, ViewerError> {
        let prepared = self.prepare()?;
        let (width, height) = prepared.target_size;

        let (bitmap, alpha_mode) =
            match target.create_bitmap(&PixelBuffer::premultiplied(&prepared.image)) {
                Ok(bitmap) => (bitmap, AlphaMode::Premultiplied),
                Err(err) => {
                    debug!("premultiplied bitmap refused ({}), ignoring alpha", err);
                    let bitmap = target.create_bitmap(&PixelBuffer::opaque(&prepared.image))?;
                    (bitmap, AlphaMode::Ignore)
                }
            };

        info!(
            "loaded {} ({}x{} -> {}x{}, {:?})",
            self.path.display(),
            prepared.source_size.0,
            prepared.source_size.1,
            width,
            height,
            alpha_mode
        );

        Ok(LoadedBitmap {
            bitmap,
            width,
            height,
            alpha_mode,
        })
    }
}
