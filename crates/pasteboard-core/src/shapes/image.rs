//! Image shape for pasted and uploaded raster images.

use super::{NodeAttrs, ShapeId, ShapeTrait};
use crate::error::ImportError;
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::Point;
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

/// Encoded format the image was imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Bmp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }
        if data.starts_with(b"BM") {
            return Some(ImageFormat::Bmp);
        }

        None
    }
}

/// An image node. Displayed at its natural size until resized.
#[derive(Debug, Clone)]
pub struct Image {
    pub(crate) id: ShapeId,
    pub attrs: NodeAttrs,
    /// Natural width in pixels.
    pub source_width: u32,
    /// Natural height in pixels.
    pub source_height: u32,
    pub format: Option<ImageFormat>,
    /// Decoded RGBA8 pixels, straight alpha, row-major. Shared between clones.
    pixels: Arc<[u8]>,
}

impl Image {
    /// Build an image node from encoded bytes.
    ///
    /// The whole image is decoded here, so data that cannot be drawn never
    /// becomes a node.
    pub fn from_bytes(position: Point, data: impl AsRef<[u8]>) -> Result<Self, ImportError> {
        let data = data.as_ref();
        if data.is_empty() {
            return Err(ImportError::Empty);
        }

        let decoded = ::image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .decode()?
            .into_rgba8();
        let (source_width, source_height) = decoded.dimensions();
        if source_width == 0 || source_height == 0 {
            return Err(ImportError::ZeroSize);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            attrs: NodeAttrs::new(position, source_width as f64, source_height as f64),
            source_width,
            source_height,
            format: ImageFormat::from_magic_bytes(data),
            pixels: decoded.into_raw().into(),
        })
    }

    /// Build an image node from a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(position: Point, url: &str) -> Result<Self, ImportError> {
        let (meta, payload) = url
            .trim()
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or(ImportError::NotDataUrl)?;
        if !meta.ends_with(";base64") {
            return Err(ImportError::NotDataUrl);
        }
        let bytes = STANDARD.decode(payload.trim())?;
        Self::from_bytes(position, bytes)
    }

    /// RGBA8 pixels, `source_width * source_height * 4` bytes.
    pub fn pixels(&self) -> &Arc<[u8]> {
        &self.pixels
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn attrs(&self) -> &NodeAttrs {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut NodeAttrs {
        &mut self.attrs
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode a solid RGBA PNG in memory.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            let pixels = vec![200u8; (width * height * 4) as usize];
            writer.write_image_data(&pixels).unwrap();
        }
        out
    }

    #[test]
    fn test_from_png_bytes() {
        let img = Image::from_bytes(Point::new(50.0, 50.0), png_bytes(30, 20)).unwrap();
        assert_eq!((img.source_width, img.source_height), (30, 20));
        assert_eq!(img.format, Some(ImageFormat::Png));
        assert_eq!(img.bounds(), kurbo::Rect::new(50.0, 50.0, 80.0, 70.0));
        assert!(img.attrs.draggable);
    }

    #[test]
    fn test_from_data_url() {
        let url = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(4, 8)));
        let img = Image::from_data_url(Point::ZERO, &url).unwrap();
        assert_eq!((img.source_width, img.source_height), (4, 8));
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert!(matches!(
            Image::from_bytes(Point::ZERO, Vec::new()),
            Err(ImportError::Empty)
        ));
        assert!(Image::from_bytes(Point::ZERO, b"definitely not an image".to_vec()).is_err());
        let mut truncated = png_bytes(4, 4);
        truncated.truncate(10);
        assert!(Image::from_bytes(Point::ZERO, truncated).is_err());
        assert!(matches!(
            Image::from_data_url(Point::ZERO, "hello"),
            Err(ImportError::NotDataUrl)
        ));
        assert!(Image::from_data_url(Point::ZERO, "data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_pixels_are_decoded_at_import() {
        let img = Image::from_bytes(Point::ZERO, png_bytes(3, 2)).unwrap();
        assert_eq!(img.pixels().len(), 3 * 2 * 4);
        assert!(img.pixels().iter().all(|&b| b == 200));
    }

    #[test]
    fn test_corrupt_pixel_data_is_rejected() {
        // Header intact, compressed pixel stream scrambled
        let mut corrupt = png_bytes(64, 64);
        let end = corrupt.len() - 12;
        for byte in &mut corrupt[41..end] {
            *byte ^= 0x5a;
        }
        assert!(matches!(
            Image::from_bytes(Point::ZERO, &corrupt),
            Err(ImportError::Decode(_))
        ));

        let mut half = png_bytes(64, 64);
        half.truncate(half.len() / 2);
        assert!(Image::from_bytes(Point::ZERO, &half).is_err());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a.."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"abc"), None);
    }
}
