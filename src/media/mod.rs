//! Product image normalization and media storage.
//!
//! Every product image is decoded, flattened to RGB, resized to a fixed
//! 200x200 canvas and re-encoded as JPEG before it is stored. The aspect
//! ratio of the source is not preserved.

pub mod storage;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::config::ImageConfig;

pub use storage::{FileSystemStorage, MediaStorage};

/// Width of every stored product image.
pub const TARGET_WIDTH: u32 = 200;
/// Height of every stored product image.
pub const TARGET_HEIGHT: u32 = 200;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

const STORED_EXTENSION: &str = "jpg";
const FALLBACK_STEM: &str = "image";
/// Keeps stored names inside the 100-character image column, suffix included.
const MAX_STEM_LEN: usize = 80;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image resolution {width}x{height} is below the minimum {min}")]
    ResolutionTooLow {
        width: u32,
        height: u32,
        min: Resolution,
    },

    #[error("image resolution {width}x{height} is above the maximum {max}")]
    ResolutionTooHigh {
        width: u32,
        height: u32,
        max: Resolution,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Accepted source resolutions. Both bounds are off unless configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionBand {
    pub min: Option<Resolution>,
    pub max: Option<Resolution>,
}

impl ResolutionBand {
    pub fn check(&self, width: u32, height: u32) -> Result<(), ImageError> {
        if let Some(min) = self.min {
            if width < min.width || height < min.height {
                return Err(ImageError::ResolutionTooLow { width, height, min });
            }
        }
        if let Some(max) = self.max {
            if width > max.width || height > max.height {
                return Err(ImageError::ResolutionTooHigh { width, height, max });
            }
        }
        Ok(())
    }
}

impl From<&ImageConfig> for ResolutionBand {
    fn from(cfg: &ImageConfig) -> Self {
        let min = match (cfg.min_width, cfg.min_height) {
            (None, None) => None,
            (w, h) => Some(Resolution::new(w.unwrap_or(0), h.unwrap_or(0))),
        };
        let max = match (cfg.max_width, cfg.max_height) {
            (None, None) => None,
            (w, h) => Some(Resolution::new(
                w.unwrap_or(u32::MAX),
                h.unwrap_or(u32::MAX),
            )),
        };
        Self { min, max }
    }
}

/// Raw upload as received from the caller.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Name the normalized image is stored under: the sanitized stem of the
    /// upload with a `.jpg` extension.
    pub fn stored_name(&self) -> String {
        let stem: String = Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .take(MAX_STEM_LEN)
            .collect();
        let stem = if stem.is_empty() { FALLBACK_STEM } else { &stem };
        format!("{}.{}", stem, STORED_EXTENSION)
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    quality: u8,
    band: ResolutionBand,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ImageNormalizer {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            band: ResolutionBand::default(),
        }
    }

    pub fn with_band(mut self, band: ResolutionBand) -> Self {
        self.band = band;
        self
    }

    pub fn from_config(cfg: &ImageConfig) -> Self {
        Self::new(cfg.jpeg_quality).with_band(ResolutionBand::from(cfg))
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Decodes `raw`, converts it to RGB, resizes it to exactly
    /// `TARGET_WIDTH` x `TARGET_HEIGHT` and re-encodes it as JPEG.
    pub fn normalize(&self, raw: &[u8]) -> Result<NormalizedImage, ImageError> {
        let decoded = image::load_from_memory(raw).map_err(ImageError::Decode)?;
        self.band.check(decoded.width(), decoded.height())?;

        let rgb = decoded.to_rgb8();
        let resized = imageops::resize(&rgb, TARGET_WIDTH, TARGET_HEIGHT, FilterType::CatmullRom);

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality)
            .encode_image(&resized)
            .map_err(ImageError::Encode)?;

        Ok(NormalizedImage {
            bytes,
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{ColorType, DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 120, 200, 128]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode png fixture");
        out.into_inner()
    }

    #[test]
    fn wide_rgba_source_becomes_square_rgb_jpeg() {
        let normalized = ImageNormalizer::default()
            .normalize(&png(640, 120))
            .expect("normalize");

        assert_eq!((normalized.width, normalized.height), (200, 200));
        assert_eq!(
            image::guess_format(&normalized.bytes).expect("format"),
            ImageFormat::Jpeg
        );
        let reopened = image::load_from_memory(&normalized.bytes).expect("decode output");
        assert_eq!((reopened.width(), reopened.height()), (200, 200));
        assert_eq!(reopened.color(), ColorType::Rgb8);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = ImageNormalizer::default()
            .normalize(b"definitely not an image")
            .unwrap_err();
        assert_matches!(err, ImageError::Decode(_));
    }

    #[test]
    fn band_is_inactive_by_default() {
        let normalizer = ImageNormalizer::default();
        assert!(normalizer.normalize(&png(1, 1)).is_ok());
        assert!(normalizer.normalize(&png(2000, 30)).is_ok());
    }

    #[test]
    fn configured_band_rejects_out_of_range_sources() {
        let normalizer = ImageNormalizer::default().with_band(ResolutionBand {
            min: Some(Resolution::new(100, 100)),
            max: Some(Resolution::new(1000, 1000)),
        });

        assert_matches!(
            normalizer.normalize(&png(50, 400)),
            Err(ImageError::ResolutionTooLow { width: 50, height: 400, .. })
        );
        assert_matches!(
            normalizer.normalize(&png(1200, 400)),
            Err(ImageError::ResolutionTooHigh { width: 1200, .. })
        );
        assert!(normalizer.normalize(&png(400, 400)).is_ok());
    }

    #[test]
    fn quality_is_clamped() {
        assert_eq!(ImageNormalizer::new(0).quality(), 1);
        assert_eq!(ImageNormalizer::new(255).quality(), 100);
    }

    #[test]
    fn stored_name_keeps_a_safe_stem() {
        let upload = ImageUpload::new("../My Laptop (1).PNG", vec![]);
        assert_eq!(upload.stored_name(), "MyLaptop1.jpg");
        assert_eq!(ImageUpload::new("macbook-pro_14.webp", vec![]).stored_name(), "macbook-pro_14.jpg");
        assert_eq!(ImageUpload::new("", vec![]).stored_name(), "image.jpg");

        let long = ImageUpload::new(format!("{}.png", "x".repeat(300)), vec![]);
        assert_eq!(long.stored_name().len(), MAX_STEM_LEN + 4);
    }
}
