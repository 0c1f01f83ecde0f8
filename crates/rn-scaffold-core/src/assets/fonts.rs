//! Font bundling: asset copies, link manifests, Info.plist and Xcode registration

use super::{copy_asset, files_matching, has_extension, pbxproj};
use crate::error::{soften, IoContext, Result, ScaffoldError, Warning};
use crate::materialize::layout::ProjectLayout;
use crate::materialize::placeholders::{edit_file, xml_escape};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

const SCOPE: &str = "fonts";

const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// Shared fonts directory, relative to the project root
pub const FONTS_DIR: &str = "assets/fonts";
pub const LINK_MANIFEST: &str = "link-assets-manifest.json";

static UI_APP_FONTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<key>UIAppFonts</key>\s*(?:<array>(.*?)</array>|<array\s*/>)")
        .expect("valid regex")
});
static PLIST_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<string>([^<]*)</string>").expect("valid regex"));

/// Link manifest consumed by the asset linker (`{"migIndex":1,"data":[...]}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkManifest {
    pub mig_index: u32,
    #[serde(default)]
    pub data: Vec<LinkEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub path: String,
    pub sha1: String,
}

impl Default for LinkManifest {
    fn default() -> Self {
        Self {
            mig_index: 1,
            data: Vec::new(),
        }
    }
}

impl LinkManifest {
    /// Insert or refresh entries by path, keeping entries sorted
    pub fn merge(&mut self, entries: &[LinkEntry]) {
        for entry in entries {
            match self.data.iter_mut().find(|e| e.path == entry.path) {
                Some(existing) => existing.sha1 = entry.sha1.clone(),
                None => self.data.push(entry.clone()),
            }
        }
        self.data.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

/// Hex SHA-1 of a file's bytes
pub fn file_sha1(path: &Path) -> Result<String> {
    let bytes = fs::read(path).io_context("read", path)?;
    Ok(hex::encode(Sha1::digest(&bytes)))
}

/// Merge entries into the link manifest at `path`, writing only on change
pub fn update_link_manifest(path: &Path, entries: &[LinkEntry]) -> Result<bool> {
    let mut manifest = if path.is_file() {
        let content = fs::read_to_string(path).io_context("read", path)?;
        serde_json::from_str(&content).map_err(|e| {
            ScaffoldError::Template(format!("invalid link manifest {}: {}", path.display(), e))
        })?
    } else {
        LinkManifest::default()
    };
    let before = manifest.clone();
    manifest.merge(entries);
    if path.is_file() && manifest == before {
        return Ok(false);
    }

    let mut out = serde_json::to_string_pretty(&manifest).map_err(|e| {
        ScaffoldError::Template(format!("failed to serialize {}: {}", path.display(), e))
    })?;
    out.push('\n');
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).io_context("create directory", parent)?;
    }
    fs::write(path, out).io_context("write", path)?;
    Ok(true)
}

/// Add font file names to the Info.plist `UIAppFonts` array
pub fn register_plist_fonts(path: &Path, fonts: &[String]) -> Result<bool> {
    edit_file(path, |content| Ok(add_ui_app_fonts(content, fonts)))
}

pub(crate) fn add_ui_app_fonts(content: &str, fonts: &[String]) -> String {
    let escaped: Vec<String> = fonts.iter().map(|f| xml_escape(f)).collect();

    let Some(caps) = UI_APP_FONTS.captures(content) else {
        return match content.rfind("</dict>") {
            Some(index) => format!(
                "{}\t{}\n{}",
                &content[..index],
                render_font_array(&escaped),
                &content[index..]
            ),
            None => content.to_string(),
        };
    };

    // Existing values are already escaped and kept byte-for-byte
    let mut merged: Vec<String> = caps
        .get(1)
        .map(|body| {
            PLIST_STRING
                .captures_iter(body.as_str())
                .map(|c| c[1].to_string())
                .collect()
        })
        .unwrap_or_default();
    if escaped.iter().all(|f| merged.contains(f)) {
        return content.to_string();
    }
    for font in escaped {
        if !merged.contains(&font) {
            merged.push(font);
        }
    }
    let whole = caps.get(0).expect("whole match");
    format!(
        "{}{}{}",
        &content[..whole.start()],
        render_font_array(&merged),
        &content[whole.end()..]
    )
}

fn render_font_array(names: &[String]) -> String {
    let mut out = String::from("<key>UIAppFonts</key>\n\t<array>\n");
    for name in names {
        out.push_str(&format!("\t\t<string>{}</string>\n", name));
    }
    out.push_str("\t</array>");
    out
}

/// Copy fonts into the project and register them on both platforms
pub fn project_fonts(layout: &ProjectLayout, source: &Path) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if !source.is_dir() {
        warnings.push(Warning::new(
            SCOPE,
            format!("Fonts directory not found: {} (skipping)", source.display()),
        ));
        return warnings;
    }

    let fonts = files_matching(source, |p| has_extension(p, &FONT_EXTENSIONS));
    if fonts.is_empty() {
        warnings.push(Warning::new(
            SCOPE,
            format!("No .ttf or .otf files in {}", source.display()),
        ));
        return warnings;
    }

    let has_android = layout.android_dir().is_dir();
    let shared_dir = layout.join(FONTS_DIR);
    let android_dir = layout.android_assets().join("fonts");
    let mut entries = Vec::new();
    let mut names = Vec::new();

    for font in &fonts {
        let Some(name) = font.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let shared = shared_dir.join(&name);
        if soften(copy_asset(font, &shared), SCOPE, &mut warnings).is_none() {
            continue;
        }
        if has_android {
            soften(copy_asset(font, &android_dir.join(&name)), SCOPE, &mut warnings);
        }
        if let Some(sha1) = soften(file_sha1(&shared), SCOPE, &mut warnings) {
            entries.push(LinkEntry {
                path: format!("{}/{}", FONTS_DIR, name),
                sha1,
            });
        }
        names.push(name);
    }

    if names.is_empty() {
        return warnings;
    }

    for platform_dir in [layout.android_dir(), layout.ios_dir()] {
        if platform_dir.is_dir() {
            let manifest = platform_dir.join(LINK_MANIFEST);
            soften(update_link_manifest(&manifest, &entries), SCOPE, &mut warnings);
        }
    }

    soften(register_plist_fonts(&layout.info_plist(), &names), SCOPE, &mut warnings);

    let project = layout.pbxproj();
    soften(
        edit_file(&project, |content| {
            Ok(names.iter().fold(content.to_string(), |acc, name| {
                pbxproj::add_resource(&acc, name, &format!("../{}/{}", FONTS_DIR, name))
            }))
        }),
        SCOPE,
        &mut warnings,
    );

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::manifest::TemplateManifest;
    use tempfile::TempDir;

    const PLIST: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<plist version=\"1.0\">\n<dict>\n\t<key>CFBundleName</key>\n\t<string>MyApp</string>\n</dict>\n</plist>\n";

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_ui_app_fonts_inserted_and_merged() {
        let fonts = vec!["Inter.ttf".to_string()];
        let once = add_ui_app_fonts(PLIST, &fonts);
        assert!(once.contains("<key>UIAppFonts</key>\n\t<array>\n\t\t<string>Inter.ttf</string>\n\t</array>\n</dict>"));
        assert_eq!(add_ui_app_fonts(&once, &fonts), once);

        let more = add_ui_app_fonts(&once, &["Lora.otf".to_string()]);
        assert!(more.contains("<string>Inter.ttf</string>\n\t\t<string>Lora.otf</string>"));
        assert_eq!(more.matches("UIAppFonts").count(), 1);
    }

    #[test]
    fn test_empty_array_filled() {
        let content = PLIST.replace("</dict>", "\t<key>UIAppFonts</key>\n\t<array/>\n</dict>");
        let out = add_ui_app_fonts(&content, &["A.ttf".to_string()]);
        assert!(out.contains("<string>A.ttf</string>"));
        assert_eq!(out.matches("UIAppFonts").count(), 1);
    }

    #[test]
    fn test_link_manifest_merge() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("android").join(LINK_MANIFEST);
        let entry = |p: &str, s: &str| LinkEntry {
            path: p.to_string(),
            sha1: s.to_string(),
        };

        assert!(update_link_manifest(&path, &[entry("assets/fonts/B.ttf", "1")]).unwrap());
        assert!(!update_link_manifest(&path, &[entry("assets/fonts/B.ttf", "1")]).unwrap());
        update_link_manifest(&path, &[entry("assets/fonts/A.ttf", "2")]).unwrap();

        let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["migIndex"], 1);
        assert_eq!(doc["data"][0]["path"], "assets/fonts/A.ttf");
        assert_eq!(doc["data"][1]["sha1"], "1");
    }

    #[test]
    fn test_project_fonts_end_to_end() {
        let src = TempDir::new().unwrap();
        write(src.path(), "Inter-Regular.ttf", b"font-bytes");
        write(src.path(), "README.md", b"not a font");

        let dest = TempDir::new().unwrap();
        write(dest.path(), "ios/MyApp/Info.plist", PLIST.as_bytes());
        fs::create_dir_all(dest.path().join("android")).unwrap();
        let manifest = TemplateManifest::default();
        let layout = ProjectLayout::new(dest.path(), &manifest, "MyApp");

        let warnings = project_fonts(&layout, src.path());
        assert!(warnings.is_empty(), "{:?}", warnings);

        let d = dest.path();
        assert!(d.join("assets/fonts/Inter-Regular.ttf").is_file());
        assert!(d.join("android/app/src/main/assets/fonts/Inter-Regular.ttf").is_file());
        assert!(!d.join("assets/fonts/README.md").exists());

        let expected_sha = hex::encode(Sha1::digest(b"font-bytes"));
        for platform in ["android", "ios"] {
            let doc: serde_json::Value = serde_json::from_str(
                &fs::read_to_string(d.join(platform).join(LINK_MANIFEST)).unwrap(),
            )
            .unwrap();
            assert_eq!(doc["data"][0]["path"], "assets/fonts/Inter-Regular.ttf");
            assert_eq!(doc["data"][0]["sha1"], expected_sha.as_str());
        }

        let plist = fs::read_to_string(d.join("ios/MyApp/Info.plist")).unwrap();
        assert!(plist.contains("<string>Inter-Regular.ttf</string>"));

        // Running again changes nothing
        let before = fs::read_to_string(d.join("ios/link-assets-manifest.json")).unwrap();
        project_fonts(&layout, src.path());
        assert_eq!(fs::read_to_string(d.join("ios/link-assets-manifest.json")).unwrap(), before);
        assert_eq!(fs::read_to_string(d.join("ios/MyApp/Info.plist")).unwrap(), plist);
    }
}
