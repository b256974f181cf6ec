use crate::config::PipelineOptions;
use crate::constants::WARNING_PREFIX;
use crate::error::Result;
use crate::formats::MediaType;
use crate::processing::{decode_image, fit_within};
use crate::source::SourceImage;
use crate::utils::format_file_size;
use image::GenericImageView;
use serde::Serialize;
use std::path::Path;

/// What an upload of a given file would produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReport {
    pub file_name: String,
    pub declared_type: String,
    pub accepted: bool,
    /// False when the bytes are in a different container than declared
    pub content_matches: bool,
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub color: String,
    pub display: (u32, u32),
    pub thumbnail: (u32, u32),
    pub original_extension: String,
}

/// Decode `path` and report its dimensions and the planned variant sizes.
pub async fn inspect_image(path: &Path, options: &PipelineOptions) -> Result<ImageReport> {
    let source = SourceImage::from_path(path).await?;
    let img = decode_image(source.data())?;
    let (width, height) = img.dimensions();
    let declared = MediaType::from_content_type(source.content_type()).ok();
    let content_matches = match (declared, image::guess_format(source.data())) {
        (Some(media_type), Ok(format)) => media_type.to_image_format() == format,
        _ => false,
    };

    Ok(ImageReport {
        file_name: source.file_name().to_string(),
        declared_type: source.content_type().to_string(),
        accepted: declared.is_some(),
        content_matches,
        size: source.size(),
        width,
        height,
        color: format!("{:?}", img.color()),
        display: fit_within(width, height, options.display_max_edge),
        thumbnail: fit_within(width, height, options.thumbnail_max_edge),
        original_extension: source.original_extension(),
    })
}

pub fn print_image_report(report: &ImageReport) {
    println!("📋 Basic Information:");
    println!("  📁 File: {}", report.file_name);
    println!(
        "  🎭 Declared type: {}{}",
        report.declared_type,
        if report.accepted { "" } else { " (not accepted for upload)" }
    );
    println!(
        "  📦 File size: {} bytes ({})",
        report.size,
        format_file_size(report.size)
    );
    println!("  📏 Dimensions: {}x{} pixels", report.width, report.height);
    println!("  🎨 Color type: {}", report.color);
    if report.accepted && !report.content_matches {
        println!(
            "  {} File contents do not match the {} extension",
            WARNING_PREFIX, report.original_extension
        );
    }

    println!("\n🖼️  Planned variants:");
    println!(
        "  original/<id>.{}  {}x{} (stored unchanged)",
        report.original_extension, report.width, report.height
    );
    println!(
        "  display/<id>.webp   {}x{}",
        report.display.0, report.display.1
    );
    println!(
        "  thumbnail/<id>.webp {}x{}",
        report.thumbnail.0, report.thumbnail.1
    );
}
