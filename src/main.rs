use anyhow::{Context, Result};
use clap::Parser;
use portfolio_images::cli::{Args, Commands};
use portfolio_images::constants::{
    DEFAULT_LIST_LIMIT, INFO_PREFIX, LINK_PREFIX, SIZE_PREFIX, SUCCESS_PREFIX, UPLOAD_PREFIX,
    WARNING_PREFIX,
};
use portfolio_images::store::ListOptions;
use portfolio_images::utils::{create_progress_bar, format_file_size};
use portfolio_images::{
    collect_all_image_files, inspect_image, print_image_report, FsStore, ImagePipeline,
    MemoryStore, ObjectStore, PipelineError, PipelineOptions, RemoteStore, SourceImage,
    StoreSettings, UploadResult,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = PipelineOptions::new(args.quality, args.display_edge, args.thumbnail_edge)
        .context("invalid pipeline options")?;

    if let Commands::Info { input } = &args.command {
        println!("{} Getting info for: {}", INFO_PREFIX, input.display());
        let report = inspect_image(input, &options)
            .await
            .with_context(|| format!("inspecting {}", input.display()))?;
        print_image_report(&report);
        return Ok(());
    }

    let settings = StoreSettings::from_env_and_args(&args.store_overrides())?;
    let pipeline = ImagePipeline::new(build_store(settings), options);

    match args.command {
        Commands::Upload {
            inputs,
            collection,
            recursive,
            json,
        } => {
            let files = collect_all_image_files(&inputs, recursive)?;
            let mut sources = Vec::with_capacity(files.len());
            for path in &files {
                sources.push(
                    SourceImage::from_path(path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?,
                );
            }

            if !json {
                println!(
                    "{} Uploading {} image(s) to {}",
                    UPLOAD_PREFIX,
                    sources.len(),
                    collection
                );
            }
            let bar = create_progress_bar("uploading");
            let outcome = pipeline
                .upload_images(&sources, collection, &|p: u8| bar.set_position(p as u64))
                .await;

            match outcome {
                Ok(results) => {
                    bar.finish_with_message("done");
                    print_results(&results, json)?;
                }
                Err(e) => {
                    bar.abandon_with_message("aborted");
                    if let PipelineError::BatchAborted { completed, .. } = &e {
                        if !completed.is_empty() {
                            eprintln!(
                                "{} {} image(s) were stored before the failure:",
                                WARNING_PREFIX,
                                completed.len()
                            );
                            print_results(completed, json)?;
                        }
                    }
                    return Err(e.into());
                }
            }
        }
        Commands::Delete {
            collection,
            base_id,
        } => {
            pipeline.delete_images(collection, &base_id).await;
            println!(
                "{} Deleted image set {} from {}",
                SUCCESS_PREFIX, base_id, collection
            );
        }
        Commands::List {
            collection,
            variant,
            limit,
            offset,
        } => {
            let entries = pipeline
                .list_images(
                    collection,
                    variant,
                    ListOptions {
                        limit: limit.unwrap_or(DEFAULT_LIST_LIMIT),
                        offset,
                    },
                )
                .await
                .with_context(|| format!("listing {}/{}", collection, variant))?;

            println!(
                "{} {} object(s) in {}/{}",
                INFO_PREFIX,
                entries.len(),
                collection,
                variant
            );
            for entry in entries {
                match entry.size {
                    Some(size) => println!("  {}  {}", entry.name, format_file_size(size)),
                    None => println!("  {}", entry.name),
                }
            }
        }
        // handled before the store is configured
        Commands::Info { .. } => {}
    }

    Ok(())
}

fn build_store(settings: StoreSettings) -> Arc<dyn ObjectStore> {
    match settings {
        StoreSettings::Memory { public_url } => Arc::new(MemoryStore::new(public_url)),
        StoreSettings::Fs { root, public_url } => Arc::new(FsStore::new(root, public_url)),
        StoreSettings::Remote {
            storage_url,
            storage_key,
        } => Arc::new(RemoteStore::new(storage_url, storage_key)),
    }
}

fn print_results(results: &[UploadResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    for result in results {
        println!("{} {}", SUCCESS_PREFIX, result.file_name);
        println!("  {} Size: {}", SIZE_PREFIX, format_file_size(result.size));
        println!("  {} Original:  {}", LINK_PREFIX, result.urls.original);
        println!("  {} Display:   {}", LINK_PREFIX, result.urls.display);
        println!("  {} Thumbnail: {}", LINK_PREFIX, result.urls.thumbnail);
    }
    Ok(())
}
