//! Image loading for sprite data
//!
//! Decodes PNG files into RGBA8 pixel buffers.

use std::path::Path;

use crate::assets::{AssetError, Loader, LoaderContext};

/// Decoded image data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            return Err(AssetError::NotFound(path_ref.display().to_string()));
        }

        let img = image::open(path_ref)?;
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Decode an image from memory (useful for embedded resources)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let rgba_img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Create a solid color image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let data = color.repeat(pixel_count);

        Self {
            data,
            width,
            height,
        }
    }

    /// Image size as `[width, height]`
    pub fn size(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// Get the color of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let bytes = self.data.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Loads [`ImageData`] from files under the asset root
#[derive(Debug, Clone)]
pub struct ImageLoader {
    context: LoaderContext,
}

impl ImageLoader {
    /// Create a loader resolving keys through `context`
    pub fn new(context: &LoaderContext) -> Self {
        Self {
            context: context.clone(),
        }
    }
}

impl Loader for ImageLoader {
    type Resource = ImageData;

    fn load(&mut self, key: &str) -> Result<ImageData, AssetError> {
        ImageData::from_file(self.context.resolve(key))
    }

    fn release(&mut self, key: &str, _resource: std::rc::Rc<ImageData>) {
        log::trace!("Released image '{}'", key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.data.len(), 4 * 4 * 4);
        assert_eq!(img.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(img.pixel(4, 0), None);
    }

    #[test]
    fn test_load_png_from_root() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 255, 0, 255]))
            .save(dir.path().join("green.png"))
            .unwrap();

        let mut loader = ImageLoader::new(&LoaderContext::new(dir.path()));
        let img = loader.load("green.png").unwrap();

        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.pixel(2, 1), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = ImageLoader::new(&LoaderContext::new(dir.path()));
        assert!(matches!(loader.load("nope.png"), Err(AssetError::NotFound(_))));
    }
}
