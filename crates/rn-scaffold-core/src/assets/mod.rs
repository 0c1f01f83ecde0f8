//! Projection of user-supplied splash, icon and font directories

pub mod fonts;
pub mod icons;
pub mod pbxproj;
pub mod splash;

use crate::config::ProjectConfig;
use crate::error::{IoContext, Result, Warning};
use crate::materialize::layout::ProjectLayout;
use std::fs;
use std::path::{Path, PathBuf};

/// Valid 1x1 transparent PNG used when no splash source is given
pub const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// True for files with an image extension
pub fn is_image(path: &Path) -> bool {
    has_extension(path, &IMAGE_EXTENSIONS)
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Image files directly inside `dir`, sorted by name. Missing dirs yield nothing.
pub fn image_files(dir: &Path) -> Vec<PathBuf> {
    files_matching(dir, is_image)
}

pub(crate) fn files_matching(dir: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && keep(p))
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}

/// Copy one file, creating the destination's parent directories
pub fn copy_asset(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).io_context("create directory", parent)?;
    }
    fs::copy(source, target).io_context("copy", source)?;
    Ok(())
}

/// Write bytes to a file, creating the destination's parent directories
pub fn write_asset(target: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).io_context("create directory", parent)?;
    }
    fs::write(target, bytes).io_context("write", target)
}

/// Run splash, icon and font projection for a renamed destination tree
pub fn project_assets(layout: &ProjectLayout, config: &ProjectConfig) -> Vec<Warning> {
    let mut warnings = splash::project_splash(layout, config.assets.splash.as_deref());
    if let Some(icons) = config.assets.icons.as_deref() {
        warnings.extend(icons::project_icons(layout, icons));
    }
    if let Some(fonts) = config.assets.fonts.as_deref() {
        warnings.extend(fonts::project_fonts(layout, fonts));
    }
    warnings
}
