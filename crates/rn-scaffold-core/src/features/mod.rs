//! Optional feature modules composed onto a materialized project
//!
//! Features run in a fixed order. Each one either materializes its
//! fragments and edits, or strips what the template ships for it. A feature
//! that fails is reported as a warning and the remaining features still run.

pub mod environments;
pub mod firebase;
pub mod fragments;
pub mod localization;
pub mod maps;
pub mod native;
pub mod navigation;
pub mod package_json;
pub mod root_component;
pub mod storage;
pub mod theme;

use crate::config::ProjectConfig;
use crate::error::{Result, Warning};
use crate::materialize::layout::ProjectLayout;
use crate::materialize::placeholders::edit_file;
use crate::templates::manifest::TemplateManifest;
use package_json::{update_package_json, PackageJson};
use std::path::{Component, PathBuf};

pub use storage::StoragePlan;

/// Optional feature modules, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Storage,
    Environments,
    Firebase,
    Maps,
    Navigation,
    Localization,
    Theme,
}

impl Feature {
    pub const PIPELINE: [Feature; 7] = [
        Feature::Storage,
        Feature::Environments,
        Feature::Firebase,
        Feature::Maps,
        Feature::Navigation,
        Feature::Localization,
        Feature::Theme,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Storage => "storage",
            Feature::Environments => "environments",
            Feature::Firebase => "firebase",
            Feature::Maps => "maps",
            Feature::Navigation => "navigation",
            Feature::Localization => "localization",
            Feature::Theme => "theme",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::Storage => "Persisted storage",
            Feature::Environments => "Environments",
            Feature::Firebase => "Firebase",
            Feature::Maps => "Maps",
            Feature::Navigation => "Navigation",
            Feature::Localization => "Localization",
            Feature::Theme => "Theme",
        }
    }

    pub fn apply(&self, ctx: &FeatureContext) -> Result<Vec<Warning>> {
        match self {
            Feature::Storage => storage::apply(ctx),
            Feature::Environments => environments::apply(ctx),
            Feature::Firebase => firebase::apply(ctx),
            Feature::Maps => maps::apply(ctx),
            Feature::Navigation => navigation::apply(ctx),
            Feature::Localization => localization::apply(ctx),
            Feature::Theme => theme::apply(ctx),
        }
    }
}

/// Everything a feature needs to edit the destination tree
#[derive(Debug, Clone, Copy)]
pub struct FeatureContext<'a> {
    pub layout: ProjectLayout<'a>,
    pub manifest: &'a TemplateManifest,
    pub config: &'a ProjectConfig,
    pub storage: StoragePlan,
}

impl<'a> FeatureContext<'a> {
    pub fn new(
        layout: ProjectLayout<'a>,
        manifest: &'a TemplateManifest,
        config: &'a ProjectConfig,
    ) -> Self {
        Self {
            layout,
            manifest,
            config,
            storage: StoragePlan::resolve(config),
        }
    }

    /// Path under the generated `src/` directory
    pub fn src(&self, relative: &str) -> PathBuf {
        self.layout.join("src").join(relative)
    }

    /// Lowercase project name, used for storage ids and similar slugs
    pub fn app_slug(&self) -> String {
        self.config.project_name.to_lowercase()
    }

    /// Persisted store variant when storage is persisted, fallback otherwise
    pub fn store_fragment(&self, persisted: &'static str, fallback: &'static str) -> &'static str {
        if self.storage.is_persisted() {
            persisted
        } else {
            fallback
        }
    }

    pub fn update_package_json<F>(&self, edit: F) -> Result<bool>
    where
        F: FnOnce(&mut PackageJson),
    {
        update_package_json(&self.layout.package_json(), edit)
    }

    /// Add the manifest's dependency groups to package.json
    pub fn add_dependency_groups(&self, groups: &[&str]) -> Result<bool> {
        self.update_package_json(|package| {
            for group in groups {
                package.add_dependencies(&self.manifest.dependency_group(group));
            }
        })
    }

    /// Remove every dependency listed in the manifest's groups
    pub fn remove_dependency_groups(&self, groups: &[&str]) -> Result<bool> {
        let names: Vec<String> = groups
            .iter()
            .flat_map(|group| self.manifest.dependency_group(group).into_keys())
            .collect();
        self.update_package_json(|package| {
            package.remove_dependencies(|name| names.iter().any(|n| n == name));
        })
    }

    pub fn edit_root_component<F>(&self, edit: F) -> Result<bool>
    where
        F: FnOnce(&str) -> String,
    {
        edit_file(&self.layout.root_component(), |content| Ok(edit(content)))
    }

    /// Import specifier for `src/<module>` as seen from the root component
    pub fn src_import(&self, module: &str) -> String {
        let root_component = self
            .manifest
            .structured
            .root_component
            .resolve(self.layout.project_name());
        let parent: Vec<String> = root_component
            .parent()
            .map(|p| {
                p.components()
                    .filter_map(|c| match c {
                        Component::Normal(s) => Some(s.to_string_lossy().to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        match parent.as_slice() {
            [] => format!("./src/{}", module),
            [only] if only == "src" => format!("./{}", module),
            _ if parent.first().is_some_and(|first| first == "src") => {
                format!("{}{}", "../".repeat(parent.len() - 1), module)
            }
            _ => format!("{}src/{}", "../".repeat(parent.len()), module),
        }
    }
}

/// Run every feature in pipeline order, collecting warnings
pub fn compose(
    layout: ProjectLayout,
    manifest: &TemplateManifest,
    config: &ProjectConfig,
) -> Vec<Warning> {
    let ctx = FeatureContext::new(layout, manifest, config);
    let mut warnings = Vec::new();
    for feature in Feature::PIPELINE {
        match feature.apply(&ctx) {
            Ok(feature_warnings) => warnings.extend(feature_warnings),
            Err(e) => warnings.push(Warning::new(
                feature.name(),
                format!("{} setup aborted: {}", feature.display_name(), e),
            )),
        }
    }
    warnings
}
