pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod formats;
pub mod info;
pub mod naming;
pub mod pipeline;
pub mod processing;
pub mod source;
pub mod store;
pub mod utils;
pub mod validation;

pub use batch::{collect_all_image_files, collect_image_files};
pub use config::{PipelineOptions, StoreKind, StoreOverrides, StoreSettings};
pub use error::{PipelineError, Result};
pub use formats::MediaType;
pub use info::{inspect_image, print_image_report, ImageReport};
pub use naming::{delete_candidates, generate_base_id, Collection, VariantKind};
pub use pipeline::{ImagePipeline, NoProgress, ProgressReporter, UploadResult, VariantUrls};
pub use processing::{derive_variants, fit_within, DerivedVariant, DerivedVariants};
pub use source::SourceImage;
pub use store::{FsStore, MemoryStore, ObjectStore, RemoteStore, StoreError};
