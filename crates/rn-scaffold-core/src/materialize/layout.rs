//! Resolved locations inside a destination tree after renaming

use crate::templates::manifest::{ManifestPath, TemplateManifest};
use std::path::{Path, PathBuf};

/// Destination paths resolved with the real project name
#[derive(Debug, Clone, Copy)]
pub struct ProjectLayout<'a> {
    root: &'a Path,
    manifest: &'a TemplateManifest,
    project_name: &'a str,
}

impl<'a> ProjectLayout<'a> {
    pub fn new(root: &'a Path, manifest: &'a TemplateManifest, project_name: &'a str) -> Self {
        Self {
            root,
            manifest,
            project_name,
        }
    }

    pub fn root(&self) -> &Path {
        self.root
    }

    pub fn project_name(&self) -> &str {
        self.project_name
    }

    /// Absolute path of a manifest path
    pub fn resolve(&self, path: &ManifestPath) -> PathBuf {
        self.root.join(path.resolve(self.project_name))
    }

    /// Absolute path of a plain relative path
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn package_json(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.package_json)
    }

    pub fn root_component(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.root_component)
    }

    pub fn android_manifest(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.android_manifest)
    }

    pub fn android_build_gradle(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.android_build_gradle)
    }

    pub fn app_build_gradle(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.app_build_gradle)
    }

    pub fn android_res(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.android_res)
    }

    pub fn android_assets(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.android_assets)
    }

    /// Android `app/` module directory (parent of `src/`)
    pub fn android_app_dir(&self) -> PathBuf {
        self.app_build_gradle()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.join("android/app"))
    }

    pub fn info_plist(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.info_plist)
    }

    pub fn pbxproj(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.pbxproj)
    }

    pub fn podfile(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.podfile)
    }

    pub fn ios_assets(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.ios_assets)
    }

    pub fn ios_app_dir(&self) -> PathBuf {
        self.resolve(&self.manifest.structured.ios_app_dir)
    }

    /// First existing AppDelegate candidate
    pub fn app_delegate(&self) -> Option<PathBuf> {
        self.manifest
            .structured
            .app_delegate
            .iter()
            .map(|candidate| self.resolve(candidate))
            .find(|path| path.is_file())
    }

    /// `ios/` directory (parent of the Podfile)
    pub fn ios_dir(&self) -> PathBuf {
        self.podfile()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.join("ios"))
    }

    /// `android/` directory (parent of the top-level build.gradle)
    pub fn android_dir(&self) -> PathBuf {
        self.android_build_gradle()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.join("android"))
    }
}
