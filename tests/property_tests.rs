use portfolio_images::naming::{delete_candidates, generate_base_id, Collection, VariantKind};
use portfolio_images::processing::fit_within;
use portfolio_images::validation::is_image_file;
use portfolio_images::{MediaType, PipelineOptions};
use proptest::prelude::*;
use std::path::Path;

proptest! {
    #[test]
    fn pipeline_options_quality_in_range(quality in 1u8..=100u8) {
        let options = PipelineOptions::new(Some(quality), None, None);
        assert_eq!(options.unwrap().quality, quality);
    }

    #[test]
    fn pipeline_options_invalid_quality(quality in 0u8..=255u8) {
        let result = PipelineOptions::new(Some(quality), None, None);
        if quality == 0 || quality > 100 {
            assert!(result.is_err());
        } else {
            assert!(result.is_ok());
        }
    }

    #[test]
    fn fit_within_respects_bound(
        width in 1u32..=12000u32,
        height in 1u32..=12000u32,
        max_edge in 1u32..=4000u32
    ) {
        let (w, h) = fit_within(width, height, max_edge);

        assert!(w >= 1 && h >= 1);
        assert!(w.max(h) <= max_edge || (w, h) == (width, height));
        // Never upscales
        assert!(w <= width && h <= height);
    }

    #[test]
    fn fit_within_is_identity_when_small(
        width in 1u32..=1920u32,
        height in 1u32..=1920u32
    ) {
        assert_eq!(fit_within(width, height, 1920), (width, height));
    }

    #[test]
    fn fit_within_longer_edge_hits_bound(
        width in 1u32..=10000u32,
        height in 1u32..=10000u32,
        max_edge in 1u32..=2000u32
    ) {
        prop_assume!(width.max(height) > max_edge);

        let (w, h) = fit_within(width, height, max_edge);
        assert_eq!(w.max(h), max_edge);
        // Orientation is preserved
        assert_eq!(width >= height, w >= h);
    }

    #[test]
    fn fit_within_preserves_aspect_ratio(
        width in 100u32..=8000u32,
        height in 100u32..=8000u32
    ) {
        let (w, h) = fit_within(width, height, 400);
        let source_ratio = width as f64 / height as f64;
        let target_ratio = w as f64 / h as f64;

        // Half a pixel of rounding on the short edge
        let short = w.min(h) as f64;
        assert!((source_ratio - target_ratio).abs() / source_ratio <= 1.0 / short);
    }

    #[test]
    fn is_image_file_recognizes_extensions(
        extension in prop::sample::select(&["jpg", "jpeg", "png", "webp", "JPG", "gif", "bmp", "txt", "pdf"])
    ) {
        let filename = format!("test.{}", extension);
        let expected = matches!(
            extension.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp"
        );
        assert_eq!(is_image_file(Path::new(&filename)), expected);
    }

    #[test]
    fn media_type_accepts_only_allow_list(
        content_type in prop::sample::select(&[
            "image/jpeg", "image/png", "image/webp", "IMAGE/PNG", "image/jpeg; charset=binary",
            "image/gif", "image/svg+xml", "application/pdf", "text/plain", ""
        ])
    ) {
        let accepted = MediaType::from_content_type(content_type).is_ok();
        let base = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        let expected = matches!(base.as_str(), "image/jpeg" | "image/png" | "image/webp");
        assert_eq!(accepted, expected);
    }

    #[test]
    fn variant_paths_share_base_id(extension in prop::sample::select(&["jpg", "png", "webp"])) {
        let base_id = generate_base_id();
        let original = VariantKind::Original.path(&base_id, extension);
        let display = VariantKind::Display.path(&base_id, extension);
        let thumbnail = VariantKind::Thumbnail.path(&base_id, extension);

        assert_eq!(original, format!("original/{}.{}", base_id, extension));
        assert_eq!(display, format!("display/{}.webp", base_id));
        assert_eq!(thumbnail, format!("thumbnail/{}.webp", base_id));

        let candidates = delete_candidates(&base_id);
        assert!(candidates.contains(&original));
        assert!(candidates.contains(&display));
        assert!(candidates.contains(&thumbnail));
    }

    #[test]
    fn collection_parse_is_case_insensitive(
        name in prop::sample::select(&["artworks", "exhibitions", "series"]),
        upper in any::<bool>()
    ) {
        let input = if upper { name.to_uppercase() } else { name.to_string() };
        let collection: Collection = input.parse().unwrap();
        assert_eq!(collection.bucket(), name);
    }
}

#[test]
fn base_id_shape() {
    for _ in 0..50 {
        let id = generate_base_id();
        let (timestamp, suffix) = id.split_once('-').unwrap();
        assert!(timestamp.parse::<i64>().unwrap() > 0);
        assert_eq!(suffix.len(), 13);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
