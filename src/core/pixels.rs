use image::DynamicImage;

/// How the renderer should interpret the alpha channel of a bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    /// Colour channels are already scaled by alpha
    Premultiplied,
    /// Alpha is ignored and the bitmap is drawn fully opaque
    Ignore,
}

/// Tightly packed 32-bit RGBA pixels ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub alpha_mode: AlphaMode,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Premultiplied RGBA8, the preferred upload format
    pub fn premultiplied(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();

        for px in data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }

        Self {
            width,
            height,
            alpha_mode: AlphaMode::Premultiplied,
            data,
        }
    }

    /// Straight RGBA8 with alpha forced to opaque
    pub fn opaque(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();

        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }

        Self {
            width,
            height,
            alpha_mode: AlphaMode::Ignore,
            data,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}
