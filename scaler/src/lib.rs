use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;

/// Holds a decoded source image, normalized to RGBA8 so every derived icon
/// keeps an alpha channel.
pub struct Scaler {
    img: RgbaImage,
}

impl Scaler {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = ImageReader::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .with_guessed_format()?
            .decode()
            .with_context(|| format!("failed to decode {}", path.display()))?;
        Ok(Self::from_image(img))
    }

    pub fn from_image(img: DynamicImage) -> Self {
        let img = match img {
            DynamicImage::ImageRgba8(img) => img,
            img => img.to_rgba8(),
        };
        let (width, height) = img.dimensions();
        if width != height {
            tracing::warn!("source is {}x{}, icons will be stretched", width, height);
        }
        Self { img }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    pub fn resize(&self, size: u32) -> RgbaImage {
        image::imageops::resize(&self.img, size, size, FilterType::Lanczos3)
    }
}

/// Scales the alpha of every pixel by its coverage of the inscribed circle.
///
/// Pixels fully inside are left untouched, pixels fully outside become
/// transparent and edge pixels are supersampled on a 4x4 grid.
pub fn mask_circle(img: &mut RgbaImage) {
    const SAMPLES: u32 = 4;
    let (width, height) = img.dimensions();
    let radius = width.min(height) as f32 / 2.0;
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let r2 = radius * radius;
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let mut inside = 0;
        for sy in 0..SAMPLES {
            for sx in 0..SAMPLES {
                let px = x as f32 + (sx as f32 + 0.5) / SAMPLES as f32 - cx;
                let py = y as f32 + (sy as f32 + 0.5) / SAMPLES as f32 - cy;
                if px * px + py * py <= r2 {
                    inside += 1;
                }
            }
        }
        if inside == SAMPLES * SAMPLES {
            continue;
        }
        let alpha = pixel[3] as u32 * inside / (SAMPLES * SAMPLES);
        pixel[3] = alpha as u8;
    }
}

/// Encodes `img` as lossless WebP with alpha.
pub fn save_webp<P: AsRef<Path>>(img: &RgbaImage, path: P) -> Result<()> {
    let path = path.as_ref();
    img.save_with_format(path, ImageFormat::WebP)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
