//! Base identifiers and the object path layout.
//!
//! ```text
//! <collection>/original/<baseId>.<original-ext-or-jpg>
//! <collection>/display/<baseId>.webp
//! <collection>/thumbnail/<baseId>.webp
//! ```
//!
//! The collection is the bucket; everything after it is the path inside
//! the bucket.

use crate::constants::{
    BASE_ID_ALPHABET, BASE_ID_SUFFIX_LEN, ORIGINAL_EXTENSION_CANDIDATES, VARIANT_EXTENSION,
};
use crate::error::{PipelineError, Result};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named buckets that own uploaded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Artworks,
    Exhibitions,
    Series,
}

impl Collection {
    pub fn bucket(&self) -> &'static str {
        match self {
            Collection::Artworks => "artworks",
            Collection::Exhibitions => "exhibitions",
            Collection::Series => "series",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket())
    }
}

impl FromStr for Collection {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "artworks" => Ok(Collection::Artworks),
            "exhibitions" => Ok(Collection::Exhibitions),
            "series" => Ok(Collection::Series),
            _ => Err(PipelineError::UnknownCollection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Original,
    Display,
    Thumbnail,
}

impl VariantKind {
    /// Sub-path the variant lives under inside its collection.
    pub fn prefix(&self) -> &'static str {
        match self {
            VariantKind::Original => "original",
            VariantKind::Display => "display",
            VariantKind::Thumbnail => "thumbnail",
        }
    }

    /// Path of this variant for `base_id`. Derived variants ignore
    /// `original_extension` and always use the WebP extension.
    pub fn path(&self, base_id: &str, original_extension: &str) -> String {
        let extension = match self {
            VariantKind::Original => original_extension,
            VariantKind::Display | VariantKind::Thumbnail => VARIANT_EXTENSION,
        };
        format!("{}/{}.{}", self.prefix(), base_id, extension)
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for VariantKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(VariantKind::Original),
            "display" => Ok(VariantKind::Display),
            "thumbnail" => Ok(VariantKind::Thumbnail),
            _ => Err(PipelineError::UnknownVariant(s.to_string())),
        }
    }
}

/// Generate `<millisecond-timestamp>-<random [a-z0-9] suffix>`.
pub fn generate_base_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..BASE_ID_SUFFIX_LEN)
        .map(|_| BASE_ID_ALPHABET[rng.random_range(0..BASE_ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// Every path a set for `base_id` may occupy, for best-effort deletion.
pub fn delete_candidates(base_id: &str) -> Vec<String> {
    let mut paths: Vec<String> = ORIGINAL_EXTENSION_CANDIDATES
        .iter()
        .map(|ext| VariantKind::Original.path(base_id, ext))
        .collect();
    paths.push(VariantKind::Display.path(base_id, VARIANT_EXTENSION));
    paths.push(VariantKind::Thumbnail.path(base_id, VARIANT_EXTENSION));
    paths
}
