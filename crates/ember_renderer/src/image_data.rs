//! Decoded image assets for image textures.
//!
//! Images are decoded once at scene construction through the `image` crate
//! and are read-only afterwards.

use crate::error::{RenderError, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming an extra directory to search for images.
pub const IMAGE_DIR_ENV: &str = "EMBER_IMAGES";

/// How many parent directories of the working directory are searched for `images/`.
const MAX_PARENT_LEVELS: usize = 6;

/// Gamma applied when linearizing 8-bit sRGB-ish input.
const DECODE_GAMMA: f32 = 2.2;

/// 8-bit RGB pixels in row-major order, already linearized.
#[derive(Clone, Debug, Default)]
pub struct ImageData {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl ImageData {
    /// An image with no data; `height() == 0` marks it as failed to load.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap raw RGB bytes that are already linear.
    pub fn from_rgb8(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(RenderError::InvalidSettings(format!(
                "image data has {} bytes, expected {expected} for {width}x{height}",
                bytes.len()
            )));
        }
        Ok(Self { width, height, bytes })
    }

    /// Locate and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resolved = Self::resolve(path).ok_or_else(|| RenderError::AssetNotFound(path.to_path_buf()))?;

        let decoded = image::open(&resolved)
            .map_err(|source| RenderError::AssetLoad {
                path: resolved.clone(),
                source,
            })?
            .to_rgb8();

        let (width, height) = decoded.dimensions();
        let bytes = decoded.into_raw().into_iter().map(linearize).collect();

        log::debug!("Loaded image {} ({width}x{height})", resolved.display());
        Ok(Self { width, height, bytes })
    }

    /// Search the image directory variable, the path itself, then `images/`
    /// in the working directory and its parents.
    fn resolve(path: &Path) -> Option<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(dir) = std::env::var(IMAGE_DIR_ENV) {
            candidates.push(Path::new(&dir).join(path));
        }
        candidates.push(path.to_path_buf());

        let mut prefix = PathBuf::new();
        for _ in 0..=MAX_PARENT_LEVELS {
            candidates.push(prefix.join("images").join(path));
            prefix.push("..");
        }

        candidates.into_iter().find(|candidate| candidate.is_file())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_loaded(&self) -> bool {
        self.height > 0 && self.width > 0
    }

    /// RGB bytes at (x, y), with coordinates clamped into the image.
    ///
    /// Returns magenta when there is no image data.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if !self.is_loaded() {
            return [255, 0, 255];
        }

        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;
        [self.bytes[idx], self.bytes[idx + 1], self.bytes[idx + 2]]
    }
}

/// Convert an sRGB-ish byte to a linear byte.
fn linearize(byte: u8) -> u8 {
    let linear = (byte as f32 / 255.0).powf(DECODE_GAMMA);
    if linear <= 0.0 {
        0
    } else if linear >= 1.0 {
        255
    } else {
        (256.0 * linear) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_image_is_not_loaded() {
        let image = ImageData::empty();
        assert!(!image.is_loaded());
        assert_eq!(image.height(), 0);
        assert_eq!(image.pixel(3, 4), [255, 0, 255]);
    }

    #[test]
    fn test_pixel_clamps_coordinates() {
        let bytes = vec![
            10, 20, 30, 40, 50, 60, //
            70, 80, 90, 100, 110, 120,
        ];
        let image = ImageData::from_rgb8(2, 2, bytes).unwrap();

        assert_eq!(image.pixel(0, 0), [10, 20, 30]);
        assert_eq!(image.pixel(1, 1), [100, 110, 120]);
        assert_eq!(image.pixel(9, 0), [40, 50, 60]);
        assert_eq!(image.pixel(0, 9), [70, 80, 90]);
    }

    #[test]
    fn test_from_rgb8_rejects_wrong_size() {
        assert!(ImageData::from_rgb8(2, 2, vec![0; 5]).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ImageData::load("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, RenderError::AssetNotFound(_)));
    }

    #[test]
    fn test_linearize_endpoints() {
        assert_eq!(linearize(0), 0);
        assert_eq!(linearize(255), 255);
        assert!(linearize(128) < 128);
    }

    #[test]
    fn test_load_round_trips_through_png() {
        let dir = std::env::temp_dir().join(format!("ember_image_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.png");

        let img = image::RgbImage::from_raw(1, 1, vec![255, 0, 255]).unwrap();
        img.save(&path).unwrap();

        let loaded = ImageData::load(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (1, 1));
        assert_eq!(loaded.pixel(0, 0), [255, 0, 255]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
