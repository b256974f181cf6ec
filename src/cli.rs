use crate::config::{StoreKind, StoreOverrides};
use crate::naming::{Collection, VariantKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-images",
    about = "Upload artwork images as original, display and thumbnail variants",
    long_about = "portfolio-images stores every uploaded image three times under one base id: \
                  the untouched original, a display copy bounded to 1920px and a thumbnail \
                  bounded to 400px, both encoded as WebP. Storage can be a local directory, \
                  a hosted object store or an in-memory store for dry runs.",
    version,
    after_help = "EXAMPLES:\n  \
    portfolio-images upload painting.jpg --collection artworks\n  \
    portfolio-images upload ./scans -r --collection series --json\n  \
    portfolio-images --store remote list artworks --variant thumbnail\n  \
    portfolio-images delete artworks 1718000000000-a1b2c3d4e5f6g\n  \
    portfolio-images info photo.png"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_enum,
        help = "Object store backend (memory, fs, remote)",
        long_help = "Object store backend. Falls back to PORTFOLIO_STORE, then `fs`."
    )]
    pub store: Option<StoreKind>,

    #[arg(
        long,
        global = true,
        help = "Root directory for the fs store",
        long_help = "Directory the fs store writes into. Falls back to PORTFOLIO_STORE_ROOT, then ./storage."
    )]
    pub root: Option<PathBuf>,

    #[arg(long, global = true, help = "Base URL public links are built from (memory, fs)")]
    pub public_url: Option<String>,

    #[arg(long, global = true, help = "Hosted storage base URL (remote)")]
    pub storage_url: Option<String>,

    #[arg(long, global = true, help = "Hosted storage API key (remote)")]
    pub storage_key: Option<String>,

    #[arg(
        short = 'Q',
        long,
        global = true,
        help = "WebP quality for derived variants (1-100, default: 80)"
    )]
    pub quality: Option<u8>,

    #[arg(long, global = true, help = "Longest edge of the display variant (default: 1920)")]
    pub display_edge: Option<u32>,

    #[arg(long, global = true, help = "Longest edge of the thumbnail variant (default: 400)")]
    pub thumbnail_edge: Option<u32>,

    #[arg(short, long, global = true, conflicts_with = "quiet", help = "Show debug logs")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only show warnings and errors")]
    pub quiet: bool,
}

impl Args {
    pub fn store_overrides(&self) -> StoreOverrides {
        StoreOverrides {
            store: self.store,
            root: self.root.clone(),
            public_url: self.public_url.clone(),
            storage_url: self.storage_url.clone(),
            storage_key: self.storage_key.clone(),
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Upload one or more images",
        long_about = "Upload images one after another. Each input may be a file, a directory \
                      or a glob pattern. The batch stops at the first failure."
    )]
    Upload {
        #[arg(
            required = true,
            help = "Image files, directories or glob patterns",
            long_help = "Examples: 'painting.jpg', './scans', './scans/*.{jpg,png}'"
        )]
        inputs: Vec<String>,

        #[arg(short, long, help = "Target collection (artworks, exhibitions, series)")]
        collection: Collection,

        #[arg(short, long, help = "Scan directories recursively")]
        recursive: bool,

        #[arg(long, help = "Print results as JSON")]
        json: bool,
    },

    #[command(about = "Delete every variant stored under a base id")]
    Delete {
        #[arg(help = "Collection the image set belongs to")]
        collection: Collection,

        #[arg(help = "Base id returned by upload")]
        base_id: String,
    },

    #[command(about = "List stored objects of one variant")]
    List {
        #[arg(help = "Collection to list")]
        collection: Collection,

        #[arg(long, default_value = "original", help = "Variant to list (original, display, thumbnail)")]
        variant: VariantKind,

        #[arg(long, help = "Maximum number of entries (default: 100)")]
        limit: Option<usize>,

        #[arg(long, default_value_t = 0, help = "Entries to skip")]
        offset: usize,
    },

    #[command(
        about = "Show image information and planned variant sizes",
        long_about = "Decode an image and show its dimensions, declared media type, file size \
                      and the sizes its display and thumbnail variants would have."
    )]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,
    },
}
