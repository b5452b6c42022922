//! Turning uploaded bytes into [`ImageAttributes`].
//!
//! The validator never touches pixels; it only sees the attributes produced
//! here. Anything implementing [`AttributeDecoder`] can stand in for the real
//! decoder, which is how the HTTP layer is tested without image fixtures.

use image::{DynamicImage, ImageBuffer, ImageFormat, ImageReader, Pixel, Primitive};
use std::io::Cursor;

use super::attributes::ImageAttributes;
use crate::error::CheckError;

/// Which alpha values count as a transparent pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransparencyPolicy {
    /// Alpha is exactly zero
    #[default]
    FullyTransparent,
    /// Alpha is anything below full opacity
    BelowOpaque,
}

impl TransparencyPolicy {
    pub fn is_transparent<T: Primitive>(self, alpha: T) -> bool {
        match self {
            TransparencyPolicy::FullyTransparent => alpha <= T::DEFAULT_MIN_VALUE,
            TransparencyPolicy::BelowOpaque => alpha < T::DEFAULT_MAX_VALUE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransparencyPolicy::FullyTransparent => "fully-transparent",
            TransparencyPolicy::BelowOpaque => "below-opaque",
        }
    }
}

/// Bytes in, attributes out
pub trait AttributeDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<ImageAttributes, CheckError>;
}

/// Decoder backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder {
    policy: TransparencyPolicy,
}

impl ImageCrateDecoder {
    pub fn new(policy: TransparencyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TransparencyPolicy {
        self.policy
    }
}

impl AttributeDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<ImageAttributes, CheckError> {
        // Format comes from the magic bytes, not from whatever name the client sent
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CheckError::Decode(e.to_string()))?;

        let format = reader
            .format()
            .ok_or_else(|| CheckError::Decode("unrecognized image format".to_string()))?;

        let img = reader
            .decode()
            .map_err(|e| CheckError::Decode(e.to_string()))?;

        Ok(ImageAttributes {
            format: format_name(format),
            width: img.width(),
            height: img.height(),
            mode: mode_name(&img).to_string(),
            transparent_pixels: count_transparent_pixels(&img, self.policy),
        })
    }
}

/// Uppercase container name
pub fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

/// Short color mode name of a decoded image
pub fn mode_name(img: &DynamicImage) -> &'static str {
    match img {
        DynamicImage::ImageLuma8(_) => "L",
        DynamicImage::ImageLumaA8(_) => "LA",
        DynamicImage::ImageRgb8(_) => "RGB",
        DynamicImage::ImageRgba8(_) => "RGBA",
        DynamicImage::ImageLuma16(_) => "L;16",
        DynamicImage::ImageLumaA16(_) => "LA;16",
        DynamicImage::ImageRgb16(_) => "RGB;16",
        DynamicImage::ImageRgba16(_) => "RGBA;16",
        DynamicImage::ImageRgb32F(_) => "RGB;F",
        DynamicImage::ImageRgba32F(_) => "RGBA;F",
        _ => "UNKNOWN",
    }
}

/// Count pixels whose alpha channel is transparent under `policy`
///
/// Images without an alpha channel always count zero. Palette images with a
/// transparency chunk arrive here already expanded to RGBA.
pub fn count_transparent_pixels(img: &DynamicImage, policy: TransparencyPolicy) -> u64 {
    match img {
        DynamicImage::ImageLumaA8(buf) => count_alpha(buf, policy),
        DynamicImage::ImageRgba8(buf) => count_alpha(buf, policy),
        DynamicImage::ImageLumaA16(buf) => count_alpha(buf, policy),
        DynamicImage::ImageRgba16(buf) => count_alpha(buf, policy),
        DynamicImage::ImageRgba32F(buf) => count_alpha(buf, policy),
        _ => 0,
    }
}

fn count_alpha<P: Pixel>(buf: &ImageBuffer<P, Vec<P::Subpixel>>, policy: TransparencyPolicy) -> u64 {
    buf.pixels()
        .filter(|p| {
            p.channels()
                .last()
                .is_some_and(|&alpha| policy.is_transparent(alpha))
        })
        .count() as u64
}
