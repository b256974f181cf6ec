//! Decode, resize and re-encode of the derived variants.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` with a guessed format |
//! | Orientation | EXIF orientation from the decoder, applied before resizing |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → lossy WebP | `webp::Encoder` (libwebp) |

use crate::config::PipelineOptions;
use crate::error::{PipelineError, Result};
use crate::naming::VariantKind;
use bytes::Bytes;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageError, ImageReader};
use std::io::Cursor;
use tracing::debug;

/// One encoded derived variant, ready to upload.
#[derive(Debug, Clone)]
pub struct DerivedVariant {
    pub kind: VariantKind,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

/// The `display` and `thumbnail` renditions of one source image.
#[derive(Debug, Clone)]
pub struct DerivedVariants {
    pub source_width: u32,
    pub source_height: u32,
    pub display: DerivedVariant,
    pub thumbnail: DerivedVariant,
}

/// Dimensions with the longer edge capped at `max_edge`, aspect preserved.
///
/// Never upscales: if the longer edge already fits, the input is returned.
/// The shorter edge is rounded to the nearest pixel and kept at least 1.
///
/// ```
/// use portfolio_images::processing::fit_within;
///
/// assert_eq!(fit_within(4000, 3000, 1920), (1920, 1440));
/// assert_eq!(fit_within(3000, 4000, 400), (300, 400));
/// assert_eq!(fit_within(800, 600, 1920), (800, 600));
/// ```
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max_edge || longer == 0 {
        return (width, height);
    }

    let scale = |edge: u32| -> u32 {
        ((edge as f64 * max_edge as f64 / longer as f64).round() as u32).max(1)
    };

    if width >= height {
        (max_edge, scale(height))
    } else {
        (scale(width), max_edge)
    }
}

/// Decode raw bytes, sniffing the container format, and turn the pixels
/// upright according to any EXIF orientation tag.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode(ImageError::IoError(e)))?
        .into_decoder()
        .map_err(PipelineError::Decode)?;

    // Unreadable EXIF counts as upright
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder).map_err(PipelineError::Decode)?;
    if orientation != Orientation::NoTransforms {
        debug!(?orientation, "applying EXIF orientation");
        img.apply_orientation(orientation);
    }
    Ok(img)
}

/// Resize so the longer edge is at most `max_edge`.
pub fn resize_to_bound(img: &DynamicImage, max_edge: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (target_w, target_h) = fit_within(width, height, max_edge);

    if (target_w, target_h) == (width, height) {
        return img.clone();
    }

    debug!(width, height, target_w, target_h, "resizing");
    img.resize_exact(target_w, target_h, FilterType::Lanczos3)
}

/// Encode `img` as the lossy WebP rendition of `kind`. `quality` is on
/// libwebp's 0-100 scale.
pub fn encode_webp(img: &DynamicImage, kind: VariantKind, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(PipelineError::Encode {
            variant: kind.prefix(),
            reason: format!("cannot encode empty {}x{} image", width, height),
        });
    }

    // libwebp only takes 8-bit RGB or RGBA buffers
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height)
            .encode_simple(false, quality as f32)
            .map(|memory| memory.to_vec())
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height)
            .encode_simple(false, quality as f32)
            .map(|memory| memory.to_vec())
    };

    encoded.map_err(|e| PipelineError::Encode {
        variant: kind.prefix(),
        reason: format!("libwebp rejected the image: {:?}", e),
    })
}

fn derive_variant(
    img: &DynamicImage,
    kind: VariantKind,
    max_edge: u32,
    quality: u8,
) -> Result<DerivedVariant> {
    let resized = resize_to_bound(img, max_edge);
    let data = encode_webp(&resized, kind, quality)?;

    Ok(DerivedVariant {
        kind,
        width: resized.width(),
        height: resized.height(),
        data: Bytes::from(data),
    })
}

/// Decode `data` and produce both derived variants in memory.
pub fn derive_variants(data: &[u8], options: &PipelineOptions) -> Result<DerivedVariants> {
    let img = decode_image(data)?;
    let (source_width, source_height) = img.dimensions();

    let display = derive_variant(
        &img,
        VariantKind::Display,
        options.display_max_edge,
        options.quality,
    )?;
    let thumbnail = derive_variant(
        &img,
        VariantKind::Thumbnail,
        options.thumbnail_max_edge,
        options.quality,
    )?;

    Ok(DerivedVariants {
        source_width,
        source_height,
        display,
        thumbnail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage, RgbaImage};

    fn encoded(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    /// Insert an APP1 EXIF segment carrying only an orientation tag right
    /// after the JPEG SOI marker.
    fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\x00\x2a\x00\x00\x00\x08");
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x0112u16.to_be_bytes());
        tiff.extend_from_slice(&3u16.to_be_bytes());
        tiff.extend_from_slice(&1u32.to_be_bytes());
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0, 0]);
        tiff.extend_from_slice(&0u32.to_be_bytes());

        let mut segment = b"Exif\x00\x00".to_vec();
        segment.extend_from_slice(&tiff);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&((segment.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(&segment);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(fit_within(4000, 3000, 1920), (1920, 1440));
        assert_eq!(fit_within(4000, 3000, 400), (400, 300));
    }

    #[test]
    fn test_fit_within_portrait() {
        assert_eq!(fit_within(3000, 4000, 1920), (1440, 1920));
    }

    #[test]
    fn test_fit_within_square_and_exact() {
        assert_eq!(fit_within(5000, 5000, 400), (400, 400));
        assert_eq!(fit_within(1920, 1080, 1920), (1920, 1080));
    }

    #[test]
    fn test_fit_within_no_upscale() {
        assert_eq!(fit_within(300, 200, 400), (300, 200));
    }

    #[test]
    fn test_fit_within_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_within(10_000, 1, 400), (400, 1));
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(PipelineError::Decode(_))));
    }

    #[test]
    fn test_decode_image_png() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(12, 8));
        let decoded = decode_image(&encoded(&img, ImageFormat::Png)).unwrap();
        assert_eq!(decoded.dimensions(), (12, 8));
    }

    #[test]
    fn test_encode_webp_empty_image_is_typed_error() {
        let img = DynamicImage::new_rgb8(0, 0);
        let result = encode_webp(&img, VariantKind::Thumbnail, 80);
        assert!(matches!(
            result,
            Err(PipelineError::Encode {
                variant: "thumbnail",
                ..
            })
        ));
    }

    #[test]
    fn test_decode_image_applies_exif_rotation() {
        let img = DynamicImage::new_rgb8(40, 20);
        let data = with_exif_orientation(&encoded(&img, ImageFormat::Jpeg), 6);

        let decoded = decode_image(&data).unwrap();
        assert_eq!(decoded.dimensions(), (20, 40));
    }

    #[test]
    fn test_derive_variants_portrait_photo_stays_upright() {
        let img = DynamicImage::new_rgb8(800, 600);
        let data = with_exif_orientation(&encoded(&img, ImageFormat::Jpeg), 6);
        let variants = derive_variants(&data, &PipelineOptions::default()).unwrap();

        assert_eq!((variants.source_width, variants.source_height), (600, 800));
        assert_eq!((variants.thumbnail.width, variants.thumbnail.height), (300, 400));
    }

    #[test]
    fn test_resize_to_bound_downscales() {
        let img = DynamicImage::new_rgb8(800, 600);
        assert_eq!(resize_to_bound(&img, 400).dimensions(), (400, 300));
    }

    #[test]
    fn test_resize_to_bound_leaves_small_images() {
        let img = DynamicImage::new_rgb8(320, 240);
        assert_eq!(resize_to_bound(&img, 400).dimensions(), (320, 240));
    }

    #[test]
    fn test_encode_webp_produces_riff_container() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, image::Rgb([200, 30, 30])));
        let data = encode_webp(&img, VariantKind::Display, 80).unwrap();
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WEBP");
    }

    #[test]
    fn test_encode_webp_with_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(10, 10));
        let data = encode_webp(&img, VariantKind::Thumbnail, 80).unwrap();
        let decoded = decode_image(&data).unwrap();
        assert_eq!(decoded.dimensions(), (10, 10));
    }

    #[test]
    fn test_derive_variants_dimensions() {
        let img = DynamicImage::new_rgb8(2400, 1800);
        let data = encoded(&img, ImageFormat::Png);
        let variants = derive_variants(&data, &PipelineOptions::default()).unwrap();

        assert_eq!((variants.source_width, variants.source_height), (2400, 1800));
        assert_eq!((variants.display.width, variants.display.height), (1920, 1440));
        assert_eq!((variants.thumbnail.width, variants.thumbnail.height), (400, 300));
        assert_eq!(variants.display.kind, VariantKind::Display);
        assert_eq!(variants.thumbnail.kind, VariantKind::Thumbnail);

        let display = decode_image(&variants.display.data).unwrap();
        assert_eq!(display.dimensions(), (1920, 1440));
    }

    #[test]
    fn test_derive_variants_small_source_not_upscaled() {
        let img = DynamicImage::new_rgb8(300, 200);
        let data = encoded(&img, ImageFormat::Jpeg);
        let variants = derive_variants(&data, &PipelineOptions::default()).unwrap();

        assert_eq!((variants.display.width, variants.display.height), (300, 200));
        assert_eq!((variants.thumbnail.width, variants.thumbnail.height), (300, 200));
    }
}
