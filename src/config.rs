use crate::constants::{
    DEFAULT_CACHE_CONTROL, DEFAULT_PUBLIC_URL, DEFAULT_QUALITY, DEFAULT_STORE_ROOT,
    DISPLAY_MAX_EDGE, ENV_PUBLIC_URL, ENV_STORAGE_KEY, ENV_STORAGE_URL, ENV_STORE,
    ENV_STORE_ROOT, MAX_QUALITY, MIN_QUALITY, THUMBNAIL_MAX_EDGE,
};
use crate::error::{PipelineError, Result};
use std::path::PathBuf;

/// Resize and encode settings shared by every upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub quality: u8,
    pub display_max_edge: u32,
    pub thumbnail_max_edge: u32,
    pub cache_control: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            display_max_edge: DISPLAY_MAX_EDGE,
            thumbnail_max_edge: THUMBNAIL_MAX_EDGE,
            cache_control: DEFAULT_CACHE_CONTROL.to_string(),
        }
    }
}

impl PipelineOptions {
    pub fn new(
        quality: Option<u8>,
        display_max_edge: Option<u32>,
        thumbnail_max_edge: Option<u32>,
    ) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(PipelineError::InvalidQuality(quality));
        }

        let display_max_edge = display_max_edge.unwrap_or(DISPLAY_MAX_EDGE);
        let thumbnail_max_edge = thumbnail_max_edge.unwrap_or(THUMBNAIL_MAX_EDGE);
        for bound in [display_max_edge, thumbnail_max_edge] {
            if bound == 0 {
                return Err(PipelineError::InvalidBound(bound));
            }
        }

        Ok(Self {
            quality,
            display_max_edge,
            thumbnail_max_edge,
            ..Self::default()
        })
    }
}

/// Which object store backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreKind {
    /// In-process store, discarded on exit
    Memory,
    /// Local directory
    Fs,
    /// Hosted storage REST API
    Remote,
}

impl std::str::FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "fs" => Ok(StoreKind::Fs),
            "remote" => Ok(StoreKind::Remote),
            other => Err(format!("unknown store `{}`", other)),
        }
    }
}

/// Store overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct StoreOverrides {
    pub store: Option<StoreKind>,
    pub root: Option<PathBuf>,
    pub public_url: Option<String>,
    pub storage_url: Option<String>,
    pub storage_key: Option<String>,
}

/// Resolved store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    Memory {
        public_url: String,
    },
    Fs {
        root: PathBuf,
        public_url: String,
    },
    Remote {
        storage_url: String,
        storage_key: String,
    },
}

impl StoreSettings {
    /// Merge CLI overrides over environment variables over defaults.
    pub fn from_env_and_args(overrides: &StoreOverrides) -> anyhow::Result<Self> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`StoreSettings::from_env_and_args`] with an explicit
    /// environment lookup.
    pub fn resolve<F>(overrides: &StoreOverrides, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        use anyhow::{anyhow, Context};

        let kind = match overrides.store {
            Some(kind) => kind,
            None => match env(ENV_STORE) {
                Some(value) => value
                    .parse::<StoreKind>()
                    .map_err(|e| anyhow!(e))
                    .with_context(|| format!("parsing {} value `{}`", ENV_STORE, value))?,
                None => StoreKind::Fs,
            },
        };

        let public_url = overrides
            .public_url
            .clone()
            .or_else(|| env(ENV_PUBLIC_URL))
            .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string());

        let settings = match kind {
            StoreKind::Memory => StoreSettings::Memory { public_url },
            StoreKind::Fs => StoreSettings::Fs {
                root: overrides
                    .root
                    .clone()
                    .or_else(|| env(ENV_STORE_ROOT).map(PathBuf::from))
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_ROOT)),
                public_url,
            },
            StoreKind::Remote => StoreSettings::Remote {
                storage_url: overrides
                    .storage_url
                    .clone()
                    .or_else(|| env(ENV_STORAGE_URL))
                    .with_context(|| {
                        format!("remote store needs --storage-url or {}", ENV_STORAGE_URL)
                    })?,
                storage_key: overrides
                    .storage_key
                    .clone()
                    .or_else(|| env(ENV_STORAGE_KEY))
                    .with_context(|| {
                        format!("remote store needs --storage-key or {}", ENV_STORAGE_KEY)
                    })?,
            },
        };

        Ok(settings)
    }
}
