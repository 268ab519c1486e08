//! Build command - compile the collections and write the data directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::assets::AssetStore;
use crate::content::loader::ContentLoader;
use crate::content::Collections;
use crate::Vellum;

/// Run the load-and-validate pass and write all outputs
pub fn run(vellum: &Vellum, clean: bool) -> Result<Collections> {
    let start = std::time::Instant::now();

    if clean {
        clean_output(vellum)?;
    }

    let mut assets = AssetStore::new(vellum.assets_dir.clone(), &vellum.config.output.base);
    let loader = ContentLoader::new(vellum);
    let collections = loader.load(&mut assets)?;

    tracing::info!(
        "loaded {} posts, {} pages, {} authors",
        collections.posts.len(),
        collections.pages.len(),
        collections.authors.len()
    );

    write_data(vellum, &collections)?;

    let copied = assets
        .flush()
        .context("failed to copy referenced assets")?;
    if copied > 0 {
        tracing::info!("copied {} asset(s)", copied);
    }

    tracing::info!("built in {:.2}s", start.elapsed().as_secs_f64());
    Ok(collections)
}

/// Write one JSON file per collection into the data directory
fn write_data(vellum: &Vellum, collections: &Collections) -> Result<()> {
    fs::create_dir_all(&vellum.data_dir).with_context(|| {
        format!(
            "failed to create data directory {}",
            vellum.data_dir.display()
        )
    })?;

    write_json(&vellum.data_dir.join("posts.json"), &collections.posts)?;
    write_json(&vellum.data_dir.join("pages.json"), &collections.pages)?;
    write_json(&vellum.data_dir.join("authors.json"), &collections.authors)?;

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Remove the data and asset output directories
fn clean_output(vellum: &Vellum) -> Result<()> {
    for dir in [&vellum.data_dir, &vellum.assets_dir] {
        if dir.exists() {
            fs::remove_dir_all(dir)
                .with_context(|| format!("failed to remove {}", dir.display()))?;
            tracing::debug!("removed {}", dir.display());
        }
    }
    Ok(())
}
