//! Renaming of placeholder-named paths and package directory restructuring

use crate::config::ProjectConfig;
use crate::error::{IoContext, Result};
use crate::templates::manifest::TemplateManifest;
use std::fs;
use std::path::Path;

/// Scratch directory used while moving a package tree into a nested location
const PACKAGE_STAGING_DIR: &str = ".rn-scaffold-package";

/// Apply the manifest's rename rules and restructure every package root.
///
/// Entries missing from this template variant are skipped. Returns the
/// number of entries moved.
pub fn rename_paths(
    dest: &Path,
    manifest: &TemplateManifest,
    config: &ProjectConfig,
) -> Result<usize> {
    let template_name = manifest.placeholders.project_name.as_str();
    let mut moved = 0;

    for rule in manifest.ordered_renames() {
        let from = dest.join(rule.resolve(template_name));
        let to = dest.join(rule.resolve(&config.project_name));
        if rename_entry(&from, &to)? {
            moved += 1;
        }
    }

    let old_package = manifest.placeholders.bundle_path();
    let new_package = config.bundle_path();
    for root in &manifest.package_roots {
        if restructure_package(&dest.join(root), &old_package, &new_package)? {
            moved += 1;
        }
    }

    Ok(moved)
}

/// Move `from` to `to`, merging into an existing destination with overwrite
pub fn rename_entry(from: &Path, to: &Path) -> Result<bool> {
    if from == to || fs::symlink_metadata(from).is_err() {
        return Ok(false);
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).io_context("create directory", parent)?;
    }
    move_merge(from, to)?;
    Ok(true)
}

/// Move the package tree `old_package` under `root` to `new_package`.
///
/// The old tree is parked in a staging directory first so the new path may
/// be nested inside the old one. Emptied placeholder directories are pruned.
pub fn restructure_package(root: &Path, old_package: &Path, new_package: &Path) -> Result<bool> {
    let old = root.join(old_package);
    if !old.is_dir() || old_package == new_package {
        return Ok(false);
    }

    let staging = root.join(PACKAGE_STAGING_DIR);
    if staging.exists() {
        fs::remove_dir_all(&staging).io_context("remove", &staging)?;
    }
    fs::rename(&old, &staging).io_context("move", &old)?;
    if let Some(parent) = old.parent() {
        prune_empty_dirs(parent, root)?;
    }

    let new = root.join(new_package);
    if let Some(parent) = new.parent() {
        fs::create_dir_all(parent).io_context("create directory", parent)?;
    }
    move_merge(&staging, &new)?;
    Ok(true)
}

/// Move a file or directory, merging directories and overwriting files
fn move_merge(src: &Path, dst: &Path) -> Result<()> {
    let src_meta = fs::symlink_metadata(src).io_context("inspect", src)?;
    let dst_meta = fs::symlink_metadata(dst).ok();

    match dst_meta {
        None => fs::rename(src, dst).io_context("move", src),
        Some(meta) if src_meta.is_dir() && meta.is_dir() => {
            for entry in fs::read_dir(src).io_context("read directory", src)? {
                let entry = entry.io_context("read directory", src)?;
                move_merge(&entry.path(), &dst.join(entry.file_name()))?;
            }
            fs::remove_dir(src).io_context("remove", src)
        }
        Some(meta) => {
            if meta.is_dir() {
                fs::remove_dir_all(dst).io_context("remove", dst)?;
            } else {
                fs::remove_file(dst).io_context("remove", dst)?;
            }
            fs::rename(src, dst).io_context("move", src)
        }
    }
}

/// Remove `dir` and its ancestors while they are empty, stopping at `stop`
fn prune_empty_dirs(dir: &Path, stop: &Path) -> Result<()> {
    let mut current = dir.to_path_buf();
    while current != stop && current.starts_with(stop) {
        let is_empty = fs::read_dir(&current)
            .io_context("read directory", &current)?
            .next()
            .is_none();
        if !is_empty {
            break;
        }
        fs::remove_dir(&current).io_context("remove", &current)?;
        if !current.pop() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Directories under `root` that directly contain files, relative to `root`
    fn leaf_dirs(root: &Path) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().parent().unwrap().strip_prefix(root).unwrap().to_path_buf())
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    #[test]
    fn test_package_restructured_to_bundle_segments() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("java");
        write(&root, "com/helloworld/MainActivity.kt", "package com.acme.myapp");
        write(&root, "com/helloworld/MainApplication.kt", "package com.acme.myapp");

        assert!(restructure_package(&root, Path::new("com/helloworld"), Path::new("com/acme/myapp")).unwrap());

        assert_eq!(leaf_dirs(&root), vec![PathBuf::from("com/acme/myapp")]);
        assert!(!root.join("com/helloworld").exists());
        assert!(!root.join(PACKAGE_STAGING_DIR).exists());
    }

    #[test]
    fn test_package_nested_inside_old_path() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("java");
        write(&root, "com/helloworld/MainActivity.kt", "a");

        restructure_package(&root, Path::new("com/helloworld"), Path::new("com/helloworld/beta")).unwrap();

        assert_eq!(leaf_dirs(&root), vec![PathBuf::from("com/helloworld/beta")]);
    }

    #[test]
    fn test_package_merges_into_existing_target() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("java");
        write(&root, "com/helloworld/MainActivity.kt", "new");
        write(&root, "org/acme/MainActivity.kt", "old");
        write(&root, "org/acme/Extra.kt", "keep");

        restructure_package(&root, Path::new("com/helloworld"), Path::new("org/acme")).unwrap();

        assert_eq!(fs::read_to_string(root.join("org/acme/MainActivity.kt")).unwrap(), "new");
        assert!(root.join("org/acme/Extra.kt").exists());
        assert!(!root.join("com").exists());
    }

    #[test]
    fn test_missing_sources_skipped() {
        let tmp = TempDir::new().unwrap();
        assert!(!rename_entry(&tmp.path().join("ios/HelloWorld"), &tmp.path().join("ios/MyApp")).unwrap());
        assert!(!restructure_package(tmp.path(), Path::new("com/helloworld"), Path::new("com/acme")).unwrap());
    }

    #[test]
    fn test_rename_paths_moves_ios_entries() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path();
        write(dest, "ios/HelloWorld/Info.plist", "<plist/>");
        write(dest, "ios/HelloWorld.xcodeproj/project.pbxproj", "");
        write(dest, "ios/HelloWorld.xcodeproj/xcshareddata/xcschemes/HelloWorld.xcscheme", "");
        write(dest, "ios/HelloWorld.xcworkspace/contents.xcworkspacedata", "");
        write(dest, "android/app/src/main/java/com/helloworld/MainActivity.kt", "");

        let manifest = TemplateManifest::default();
        let config = ProjectConfig::new("MyApp", "com.acme.myapp", "My App");
        rename_paths(dest, &manifest, &config).unwrap();

        assert!(dest.join("ios/MyApp/Info.plist").is_file());
        assert!(dest.join("ios/MyApp.xcodeproj/project.pbxproj").is_file());
        assert!(dest.join("ios/MyApp.xcodeproj/xcshareddata/xcschemes/MyApp.xcscheme").is_file());
        assert!(dest.join("ios/MyApp.xcworkspace").is_dir());
        assert!(!dest.join("ios/HelloWorld").exists());
        assert!(dest.join("android/app/src/main/java/com/acme/myapp/MainActivity.kt").is_file());
    }

    #[test]
    fn test_same_name_is_noop() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "ios/HelloWorld/Info.plist", "");
        let manifest = TemplateManifest::default();
        let config = ProjectConfig::new("HelloWorld", "com.helloworld", "Hello World");
        assert_eq!(rename_paths(tmp.path(), &manifest, &config).unwrap(), 0);
        assert!(tmp.path().join("ios/HelloWorld/Info.plist").is_file());
    }
}
