//! CPU-side texture loading.

use image::{DynamicImage, GenericImageView};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("texture has zero size: {width}x{height}")]
    Empty { width: u32, height: u32 },
}

/// Decoded RGBA8 pixels, row 0 first.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureData {
    /// Decode an image file. With `flip_vertically` the bottom row comes
    /// first, matching texture coordinates with v = 0 at the bottom.
    pub fn from_file(path: impl AsRef<Path>, flip_vertically: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let img = image::open(path)?;
        Self::from_image(img, &name, flip_vertically)
    }

    /// Decode an in-memory encoded image.
    pub fn from_bytes(bytes: &[u8], name: &str, flip_vertically: bool) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(img, name, flip_vertically)
    }

    fn from_image(img: DynamicImage, name: &str, flip_vertically: bool) -> Result<Self, TextureError> {
        let img = if flip_vertically { img.flipv() } else { img };
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }

        Ok(Self {
            name: name.to_string(),
            width,
            height,
            data: img.to_rgba8().into_raw(),
        })
    }

    /// Two-colour checkerboard with 8-pixel squares. Used when the configured
    /// image cannot be loaded.
    pub fn checkerboard(size: u32, color1: [u8; 4], color2: [u8; 4]) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let even = ((x / 8) + (y / 8)) % 2 == 0;
                data.extend_from_slice(if even { &color1 } else { &color2 });
            }
        }

        Self {
            name: "checkerboard".into(),
            width: size,
            height: size,
            data,
        }
    }

    /// Load `path`, or fall back to a checkerboard if it cannot be decoded.
    pub fn load_or_fallback(path: impl AsRef<Path>, flip_vertically: bool) -> Self {
        let path = path.as_ref();
        match Self::from_file(path, flip_vertically) {
            Ok(texture) => {
                tracing::info!(
                    path = %path.display(),
                    width = texture.width,
                    height = texture.height,
                    "loaded texture"
                );
                texture
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "texture unavailable, using checkerboard: {e}");
                Self::checkerboard(64, [255, 255, 255, 255], [255, 128, 0, 255])
            }
        }
    }

    /// Bytes per row of the RGBA8 data.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}
