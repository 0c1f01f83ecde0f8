//! Template fetching, parsing, and copying
//!
//! This module provides:
//! - Template manifest types (RootManifest, TemplateManifest)
//! - Template fetching from remote URLs or local directories
//! - Template tree copying with exclusions
//! - Version compatibility checking

pub mod copier;
pub mod fetcher;
pub mod manifest;
pub mod version;

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub use fetcher::{PreparedTemplate, TemplateFetcher, TemplateSource};
pub use manifest::{RootManifest, TemplateManifest, MANIFEST_FILE};
pub use version::check_compatibility;

/// Read the root manifest of a local templates directory
pub fn load_root_manifest(dir: &Path) -> Result<RootManifest> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        anyhow::bail!("Root template.yaml not found in {}", dir.display());
    }
    let content = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    serde_yaml::from_str(&content).context("Failed to parse root template.yaml")
}

/// Build zip files for all templates in a directory
pub fn build_zips<C: ProductConfig>(config: &C, template_dir: &Option<PathBuf>) -> Result<usize> {
    let dir = template_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("templates"));

    if !dir.exists() {
        anyhow::bail!("Template directory not found: {}", dir.display());
    }
    let root_manifest = load_root_manifest(&dir)?;

    println!(
        "{}",
        format!("Building {} template zips...", config.display_name())
            .cyan()
            .bold()
    );
    println!();

    let mut built = 0;
    for template_name in &root_manifest.templates {
        let template_path = dir.join(template_name);
        if !template_path.exists() {
            eprintln!(
                "{} Template directory not found: {}",
                "Warning:".yellow(),
                template_path.display()
            );
            continue;
        }

        print!("  {} {}...", "->".blue(), template_name);

        match fetcher::build_template_zip(&dir, template_name) {
            Ok(zip_bytes) => {
                let zip_path = dir.join(format!("{}.zip", template_name));
                std::fs::write(&zip_path, &zip_bytes)
                    .with_context(|| format!("Failed to write {}", zip_path.display()))?;
                println!(" {} ({} bytes)", "done".green(), zip_bytes.len());
                built += 1;
            }
            Err(e) => {
                println!(" {}", "failed".red());
                eprintln!("    Error: {:#}", e);
            }
        }
    }

    println!();
    println!(
        "{} {} template zip(s) in {}",
        "Built".green().bold(),
        built,
        dir.display()
    );

    Ok(built)
}
