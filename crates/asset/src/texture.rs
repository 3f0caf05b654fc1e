//! Texture loading and data structures.
//! PNG files are decoded to RGBA8, optionally flipped so that row 0 is the
//! bottom of the image (the layout glTexImage2D expects).

use std::path::Path;

use anyhow::Context;

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> anyhow::Result<Self> {
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            data.len() == expected,
            "RGBA8 {}x{} needs {} bytes, got {}",
            width,
            height,
            expected,
            data.len()
        );
        Ok(Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    /// Load a texture from an image file.
    pub fn load<P: AsRef<Path>>(path: P, flip_vertically: bool) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);

        let img = image::open(path).with_context(|| format!("Failed to open image {:?}", path))?;
        let img = if flip_vertically { img.flipv() } else { img };

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!("Loaded texture {}x{} with {} bytes", width, height, data.len());

        Self::new_rgba8(width, height, data)
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// RGBA value of the pixel at (`x`, `y`), row 0 first.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.bytes_per_pixel() as usize;
        let offset = (y as usize * self.width as usize + x as usize) * bpp;
        self.data
            .get(offset..offset + bpp)
            .and_then(|px| px.try_into().ok())
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size =
            self.width as usize * self.height as usize * self.bytes_per_pixel() as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_are_addressed_row_major() {
        let data = (0..2 * 3 * 4).map(|b| b as u8).collect();
        let tex = TextureData::new_rgba8(2, 3, data).expect("2x3 rgba");
        assert!(tex.is_valid());
        assert_eq!(tex.pixel(0, 0), Some([0, 1, 2, 3]));
        assert_eq!(tex.pixel(1, 2), Some([20, 21, 22, 23]));
        assert_eq!(tex.pixel(2, 0), None);
        assert_eq!(tex.pixel(0, 3), None);
    }

    #[test]
    fn huge_dimensions_do_not_overflow() {
        let tex = TextureData {
            data: Vec::new(),
            width: 40_000,
            height: 40_000,
            format: TextureFormat::Rgba8,
        };
        assert!(!tex.is_valid());
        assert_eq!(tex.pixel(39_999, 39_999), None);
    }

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(TextureData::new_rgba8(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn load_png_with_and_without_flip() {
        let path = std::env::temp_dir().join(format!("objlab-tex-{}.png", std::process::id()));
        let mut img = image::RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        img.save(&path).expect("write png");

        let top_first = TextureData::load(&path, false).expect("load png");
        assert_eq!(top_first.pixel(0, 0), Some([255, 0, 0, 255]));

        let bottom_first = TextureData::load(&path, true).expect("load png flipped");
        assert_eq!(bottom_first.pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!((bottom_first.width, bottom_first.height), (1, 2));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(TextureData::load("/no/such/texture.png", true).is_err());
    }
}
