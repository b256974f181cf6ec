pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Long-edge bound of the `display` variant, in pixels.
pub const DISPLAY_MAX_EDGE: u32 = 1920;
/// Long-edge bound of the `thumbnail` variant, in pixels.
pub const THUMBNAIL_MAX_EDGE: u32 = 400;

pub const DEFAULT_CACHE_CONTROL: &str = "3600";

/// Extension used for originals whose file name has none.
pub const FALLBACK_ORIGINAL_EXTENSION: &str = "jpg";
/// Original extensions probed when deleting a set.
pub const ORIGINAL_EXTENSION_CANDIDATES: &[&str] = &["jpg", "jpeg", "png", "webp"];
pub const VARIANT_EXTENSION: &str = "webp";
pub const VARIANT_CONTENT_TYPE: &str = "image/webp";

pub const BASE_ID_SUFFIX_LEN: usize = 13;
pub const BASE_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub const DEFAULT_LIST_LIMIT: usize = 100;
pub const MAX_OBJECT_KEY_LEN: usize = 1024;

pub const DEFAULT_STORE_ROOT: &str = "./storage";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080/storage";

pub const ENV_STORE: &str = "PORTFOLIO_STORE";
pub const ENV_STORE_ROOT: &str = "PORTFOLIO_STORE_ROOT";
pub const ENV_PUBLIC_URL: &str = "PORTFOLIO_PUBLIC_URL";
pub const ENV_STORAGE_URL: &str = "PORTFOLIO_STORAGE_URL";
pub const ENV_STORAGE_KEY: &str = "PORTFOLIO_STORAGE_KEY";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const INFO_PREFIX: &str = "📋";
pub const UPLOAD_PREFIX: &str = "📤";
pub const LINK_PREFIX: &str = "🌐";
pub const SIZE_PREFIX: &str = "📊";
