//! App icon projection from a structured icon set

use super::{copy_asset, files_matching, has_extension};
use crate::error::Warning;
use crate::materialize::layout::ProjectLayout;
use std::fs;
use std::path::{Path, PathBuf};

const SCOPE: &str = "icons";

const LAUNCHER_ICONS: [&str; 2] = ["ic_launcher.png", "ic_launcher_round.png"];
const APPICONSET: &str = "AppIcon.appiconset";

/// Locate `AppIcon.appiconset` under `ios/Assets.xcassets` or `Assets.xcassets`
fn find_appiconset(source: &Path) -> Option<PathBuf> {
    [
        source.join("ios/Assets.xcassets").join(APPICONSET),
        source.join("Assets.xcassets").join(APPICONSET),
    ]
    .into_iter()
    .find(|p| p.is_dir())
}

/// `mipmap-*` directories under `android/`, sorted
fn mipmap_dirs(source: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(source.join("android"))
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.is_dir()
                        && p.file_name()
                            .is_some_and(|n| n.to_string_lossy().starts_with("mipmap-"))
                })
                .collect()
        })
        .unwrap_or_default();
    dirs.sort();
    dirs
}

/// Copy launcher icons and the iOS icon set into the destination
pub fn project_icons(layout: &ProjectLayout, source: &Path) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if !source.is_dir() {
        warnings.push(Warning::new(
            SCOPE,
            format!("App icon directory not found: {} (skipping)", source.display()),
        ));
        return warnings;
    }

    let mipmaps = mipmap_dirs(source);
    let appiconset = find_appiconset(source);
    if mipmaps.is_empty() && appiconset.is_none() {
        warnings.push(Warning::new(
            SCOPE,
            format!(
                "{} has no android/mipmap-* or Assets.xcassets/{} structure; icons were not copied",
                source.display(),
                APPICONSET
            ),
        ));
        return warnings;
    }

    let res = layout.android_res();
    for dir in &mipmaps {
        let Some(bucket) = dir.file_name() else {
            continue;
        };
        for icon in LAUNCHER_ICONS {
            let src = dir.join(icon);
            if !src.is_file() {
                continue;
            }
            if let Err(e) = copy_asset(&src, &res.join(bucket).join(icon)) {
                warnings.push(Warning::new(SCOPE, e.to_string()));
            }
        }
    }

    if let Some(set) = appiconset {
        let target = layout.ios_assets().join(APPICONSET);
        let files = files_matching(&set, |p| {
            has_extension(p, &["png"]) || p.file_name().is_some_and(|n| n == "Contents.json")
        });
        for file in files {
            let Some(name) = file.file_name() else {
                continue;
            };
            if let Err(e) = copy_asset(&file, &target.join(name)) {
                warnings.push(Warning::new(SCOPE, e.to_string()));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::manifest::TemplateManifest;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_structured_icons_copied() {
        let src = TempDir::new().unwrap();
        write(src.path(), "android/mipmap-hdpi/ic_launcher.png", b"h");
        write(src.path(), "android/mipmap-hdpi/ic_launcher_round.png", b"hr");
        write(src.path(), "android/mipmap-xxhdpi/ic_launcher.png", b"xx");
        write(src.path(), "android/mipmap-xxhdpi/other.png", b"skip");
        write(src.path(), "ios/Assets.xcassets/AppIcon.appiconset/Contents.json", b"{}");
        write(src.path(), "ios/Assets.xcassets/AppIcon.appiconset/icon-60@2x.png", b"i");

        let dest = TempDir::new().unwrap();
        let manifest = TemplateManifest::default();
        let layout = ProjectLayout::new(dest.path(), &manifest, "MyApp");
        let warnings = project_icons(&layout, src.path());
        assert!(warnings.is_empty(), "{:?}", warnings);

        let res = dest.path().join("android/app/src/main/res");
        assert_eq!(fs::read(res.join("mipmap-hdpi/ic_launcher.png")).unwrap(), b"h");
        assert_eq!(fs::read(res.join("mipmap-hdpi/ic_launcher_round.png")).unwrap(), b"hr");
        assert_eq!(fs::read(res.join("mipmap-xxhdpi/ic_launcher.png")).unwrap(), b"xx");
        assert!(!res.join("mipmap-xxhdpi/other.png").exists());

        let set = dest.path().join("ios/MyApp/Images.xcassets/AppIcon.appiconset");
        assert_eq!(fs::read(set.join("Contents.json")).unwrap(), b"{}");
        assert!(set.join("icon-60@2x.png").is_file());
    }

    #[test]
    fn test_flat_layout_warns_without_copy() {
        let src = TempDir::new().unwrap();
        write(src.path(), "icon.png", b"flat");
        let dest = TempDir::new().unwrap();
        let manifest = TemplateManifest::default();
        let layout = ProjectLayout::new(dest.path(), &manifest, "MyApp");

        let warnings = project_icons(&layout, src.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].scope, SCOPE);
        assert!(fs::read_dir(dest.path()).unwrap().next().is_none());
    }
}
