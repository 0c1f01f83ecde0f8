//! Template materialization: copy, substitute, rename, project assets, compose features

pub mod layout;
pub mod placeholders;
pub mod renamer;
pub mod replacer;

use crate::assets::project_assets;
use crate::config::ProjectConfig;
use crate::error::{IoContext, Result, ScaffoldError, Warning};
use crate::features::compose;
use crate::templates::copier::{copy_tree, Exclusions};
use crate::templates::manifest::TemplateManifest;
use layout::ProjectLayout;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when the destination directory already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overwrite {
    /// Refuse to touch a non-empty destination
    #[default]
    Fail,
    /// Delete the destination first
    Replace,
}

/// Inputs for one materialization run
#[derive(Debug, Clone)]
pub struct MaterializeRequest {
    pub template_root: PathBuf,
    pub destination: PathBuf,
    pub config: ProjectConfig,
    pub overwrite: Overwrite,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    pub destination: PathBuf,
    pub files_copied: usize,
    pub renamed: usize,
    pub warnings: Vec<Warning>,
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}

/// Make sure the destination can be written, honoring the overwrite policy
fn prepare_destination(destination: &Path, overwrite: Overwrite) -> Result<()> {
    if fs::symlink_metadata(destination).is_err() || is_empty_dir(destination) {
        return Ok(());
    }
    match overwrite {
        Overwrite::Fail => Err(ScaffoldError::DestinationExists(destination.to_path_buf())),
        Overwrite::Replace => {
            if destination.is_dir() {
                fs::remove_dir_all(destination).io_context("remove", destination)
            } else {
                fs::remove_file(destination).io_context("remove", destination)
            }
        }
    }
}

/// Build a project from a template.
///
/// The configuration is validated before anything on disk changes. Copy and
/// rename failures abort the run; problems with individual files in later
/// stages are collected as warnings. A failed run is not rolled back.
pub fn materialize(request: &MaterializeRequest) -> Result<MaterializeReport> {
    let config = &request.config;
    config.validate()?;
    let manifest = TemplateManifest::load(&request.template_root)?;
    prepare_destination(&request.destination, request.overwrite)?;

    let dest = request.destination.as_path();
    let exclusions = Exclusions::new(&request.template_root, manifest.exclusions());
    let stats = copy_tree(&request.template_root, dest, |path| exclusions.is_excluded(path))?;

    let mut warnings = placeholders::apply_placeholders(dest, &manifest, config);
    let renamed = renamer::rename_paths(dest, &manifest, config)?;

    let layout = ProjectLayout::new(dest, &manifest, &config.project_name);
    warnings.extend(project_assets(&layout, config));
    warnings.extend(compose(layout, &manifest, config));

    Ok(MaterializeReport {
        destination: request.destination.clone(),
        files_copied: stats.files,
        renamed,
        warnings,
    })
}
