//! Splash screen projection onto iOS scale slots and Android density buckets

use super::{copy_asset, image_files, write_asset, PLACEHOLDER_PNG};
use crate::error::Warning;
use crate::materialize::layout::ProjectLayout;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const SCOPE: &str = "splash";

/// Android drawable buckets receiving `splash.png`
pub const ANDROID_BUCKETS: [&str; 6] = [
    "drawable",
    "drawable-hdpi",
    "drawable-mdpi",
    "drawable-xhdpi",
    "drawable-xxhdpi",
    "drawable-xxxhdpi",
];

/// Density buckets that loose Android images are broadcast to
const DENSITY_BUCKETS: [&str; 5] = [
    "drawable-hdpi",
    "drawable-mdpi",
    "drawable-xhdpi",
    "drawable-xxhdpi",
    "drawable-xxxhdpi",
];

/// Filename markers for the flat layout, longest first so `-xxxhdpi` wins over `-xxhdpi`
const FLAT_DENSITY_MARKERS: [(&str, &str); 5] = [
    ("-xxxhdpi", "drawable-xxxhdpi"),
    ("-xxhdpi", "drawable-xxhdpi"),
    ("-xhdpi", "drawable-xhdpi"),
    ("-hdpi", "drawable-hdpi"),
    ("-mdpi", "drawable-mdpi"),
];

pub const ANDROID_SPLASH_FILE: &str = "splash.png";
pub const IOS_IMAGESET: &str = "SplashScreen.imageset";

/// iOS scale slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    X1,
    X2,
    X3,
}

impl Scale {
    pub const ALL: [Scale; 3] = [Scale::X1, Scale::X2, Scale::X3];

    pub fn file_name(&self) -> &'static str {
        match self {
            Scale::X1 => "SplashScreen.png",
            Scale::X2 => "SplashScreen@2x.png",
            Scale::X3 => "SplashScreen@3x.png",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Scale::X1 => "1x",
            Scale::X2 => "2x",
            Scale::X3 => "3x",
        }
    }

    fn index(&self) -> usize {
        match self {
            Scale::X1 => 0,
            Scale::X2 => 1,
            Scale::X3 => 2,
        }
    }
}

/// Source file chosen for every destination slot
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SplashPlan {
    pub ios: [Option<PathBuf>; 3],
    pub android: BTreeMap<String, PathBuf>,
}

impl SplashPlan {
    fn set_ios(&mut self, scale: Scale, source: &Path) {
        let slot = &mut self.ios[scale.index()];
        if slot.is_none() {
            *slot = Some(source.to_path_buf());
        }
    }

    fn set_android(&mut self, bucket: &str, source: &Path) {
        self.android
            .entry(bucket.to_string())
            .or_insert_with(|| source.to_path_buf());
    }

    fn fill_all(&mut self, source: &Path) {
        for scale in Scale::ALL {
            self.set_ios(scale, source);
        }
        for bucket in ANDROID_BUCKETS {
            self.set_android(bucket, source);
        }
    }

    /// A missing 1x slot reuses 2x, then 3x
    fn fill_missing_1x(&mut self) {
        if self.ios[0].is_none() {
            self.ios[0] = self.ios[1].clone().or_else(|| self.ios[2].clone());
        }
    }
}

/// Scale encoded in an iOS file name (`@3x`/`3x`, `@2x`/`2x`, otherwise 1x)
fn classify_ios(path: &Path) -> Scale {
    scale_suffix(&file_stem_lower(path)).unwrap_or(Scale::X1)
}

/// Scale marker at the end of a file stem; `logo_12x` carries none
fn scale_suffix(stem: &str) -> Option<Scale> {
    let rest = stem.strip_suffix('x')?;
    let scale = match rest.chars().last()? {
        '2' => Scale::X2,
        '3' => Scale::X3,
        _ => return None,
    };
    let before = &rest[..rest.len() - 1];
    match before.chars().last() {
        Some(c) if c.is_ascii_digit() => None,
        _ => Some(scale),
    }
}

fn file_stem_lower(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Plan from `ios/` and `android/` subdirectories
pub fn plan_structured(source: &Path) -> SplashPlan {
    let mut plan = SplashPlan::default();

    let ios_images = image_files(&source.join("ios"));
    if let [single] = ios_images.as_slice() {
        for scale in Scale::ALL {
            plan.set_ios(scale, single);
        }
    } else {
        for image in &ios_images {
            plan.set_ios(classify_ios(image), image);
        }
        plan.fill_missing_1x();
    }

    let android = source.join("android");
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(&android)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect()
        })
        .unwrap_or_default();
    subdirs.sort();
    for dir in subdirs {
        let Some(name) = dir.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if name != "drawable" && !name.starts_with("drawable-") {
            continue;
        }
        if let Some(first) = image_files(&dir).first() {
            plan.set_android(&name, first);
        }
    }
    if let Some(loose) = image_files(&android).first() {
        for bucket in DENSITY_BUCKETS {
            plan.set_android(bucket, loose);
        }
    }

    plan
}

/// Plan from a flat directory of marker-named files
pub fn plan_flat(source: &Path) -> SplashPlan {
    let mut plan = SplashPlan::default();
    let images = image_files(source);

    if let [single] = images.as_slice() {
        plan.fill_all(single);
        return plan;
    }

    let mut base: Option<&PathBuf> = None;
    for image in &images {
        let stem = file_stem_lower(image);
        if let Some((_, bucket)) = FLAT_DENSITY_MARKERS
            .iter()
            .find(|(marker, _)| stem.contains(marker))
        {
            plan.set_android(bucket, image);
        } else if stem.ends_with("@3x") {
            plan.set_ios(Scale::X3, image);
        } else if stem.ends_with("@2x") {
            plan.set_ios(Scale::X2, image);
        } else if stem.starts_with("splash") && base.is_none() {
            base = Some(image);
        }
    }

    if let Some(base) = base {
        plan.set_ios(Scale::X1, base);
        for bucket in ANDROID_BUCKETS {
            plan.set_android(bucket, base);
        }
    }
    plan.fill_missing_1x();
    plan
}

/// True when the source uses the `ios/` + `android/` layout
fn is_structured(source: &Path) -> bool {
    source.join("ios").is_dir() || source.join("android").is_dir()
}

fn imageset_dir(layout: &ProjectLayout) -> PathBuf {
    layout.ios_assets().join(IOS_IMAGESET)
}

fn imageset_contents() -> String {
    let images: Vec<serde_json::Value> = Scale::ALL
        .iter()
        .map(|scale| {
            serde_json::json!({
                "idiom": "universal",
                "filename": scale.file_name(),
                "scale": scale.label(),
            })
        })
        .collect();
    let doc = serde_json::json!({
        "images": images,
        "info": { "author": "xcode", "version": 1 },
    });
    let mut out = serde_json::to_string_pretty(&doc).unwrap_or_default();
    out.push('\n');
    out
}

/// Write the imageset `Contents.json` unless the template already ships one
fn ensure_imageset_contents(layout: &ProjectLayout, warnings: &mut Vec<Warning>) {
    let path = imageset_dir(layout).join("Contents.json");
    if !path.exists() {
        if let Err(e) = write_asset(&path, imageset_contents().as_bytes()) {
            warnings.push(Warning::new(SCOPE, e.to_string()));
        }
    }
}

/// Project splash screens onto the platforms present in the destination.
///
/// `source = None` writes placeholder images everywhere.
pub fn project_splash(layout: &ProjectLayout, source: Option<&Path>) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let has_ios = layout.ios_dir().is_dir();
    let has_android = layout.android_dir().is_dir();

    let plan = match source {
        None => SplashPlan::default(),
        Some(dir) if !dir.is_dir() => {
            warnings.push(Warning::new(
                SCOPE,
                format!(
                    "Splash screen directory not found: {} (skipping)",
                    dir.display()
                ),
            ));
            return warnings;
        }
        Some(dir) if is_structured(dir) => plan_structured(dir),
        Some(dir) => plan_flat(dir),
    };

    if has_ios {
        let ios_dir = imageset_dir(layout);
        for scale in Scale::ALL {
            let target = ios_dir.join(scale.file_name());
            let result = match &plan.ios[scale.index()] {
                Some(src) => copy_asset(src, &target),
                None => {
                    if source.is_some() {
                        warnings.push(Warning::new(
                            SCOPE,
                            format!(
                                "No iOS {} splash image found; using a placeholder",
                                scale.label()
                            ),
                        ));
                    }
                    write_asset(&target, PLACEHOLDER_PNG)
                }
            };
            if let Err(e) = result {
                warnings.push(Warning::new(SCOPE, e.to_string()));
            }
        }
        ensure_imageset_contents(layout, &mut warnings);
    }

    if has_android {
        let res = layout.android_res();
        if source.is_some() && plan.android.is_empty() {
            warnings.push(Warning::new(SCOPE, "No Android splash images found"));
        }
        for bucket in ANDROID_BUCKETS {
            let target = res.join(bucket).join(ANDROID_SPLASH_FILE);
            let result = match (plan.android.get(bucket), source) {
                (Some(src), _) => copy_asset(src, &target),
                (None, None) => write_asset(&target, PLACEHOLDER_PNG),
                (None, Some(_)) => continue,
            };
            if let Err(e) = result {
                warnings.push(Warning::new(SCOPE, e.to_string()));
            }
        }
    }

    warnings
}
