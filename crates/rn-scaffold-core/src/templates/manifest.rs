//! Template manifest types and parsing

use crate::error::{IoContext, Result, ScaffoldError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name of both the root and the per-template manifest
pub const MANIFEST_FILE: &str = "template.yaml";

/// Variable substituted in manifest paths with a project name
const PROJECT_NAME_VAR: &str = "{project_name}";

/// Root template manifest (templates/template.yaml)
/// Lists available template directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    /// List of template directory names
    pub templates: Vec<String>,
}

/// Literal values the template tree uses in place of project-specific ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholders {
    pub project_name: String,
    pub bundle_identifier: String,
    pub display_name: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            project_name: "HelloWorld".to_string(),
            bundle_identifier: "com.helloworld".to_string(),
            display_name: "Hello World".to_string(),
        }
    }
}

impl Placeholders {
    /// Package directory path of the placeholder bundle id (`com/helloworld`)
    pub fn bundle_path(&self) -> PathBuf {
        self.bundle_identifier.split('.').collect()
    }
}

/// A destination-relative path that may embed `{project_name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestPath(pub String);

impl ManifestPath {
    pub fn new(path: &str) -> Self {
        Self(path.to_string())
    }

    /// Expand `{project_name}` and turn the result into a relative path
    pub fn resolve(&self, project_name: &str) -> PathBuf {
        PathBuf::from(self.0.replace(PROJECT_NAME_VAR, project_name))
    }

    /// Number of path components, used to rename children before parents
    fn depth(&self) -> usize {
        self.0.split('/').filter(|s| !s.is_empty()).count()
    }
}

/// Locations of files that get format-aware edits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredFiles {
    pub package_json: ManifestPath,
    pub app_json: ManifestPath,
    /// Field of `app_json` that holds the human-facing name
    pub display_name_field: String,
    pub root_component: ManifestPath,
    pub android_manifest: ManifestPath,
    pub strings_xml: ManifestPath,
    pub android_build_gradle: ManifestPath,
    pub app_build_gradle: ManifestPath,
    pub android_res: ManifestPath,
    pub android_assets: ManifestPath,
    pub info_plist: ManifestPath,
    pub pbxproj: ManifestPath,
    pub podfile: ManifestPath,
    /// Candidates in preference order; the first that exists is edited
    pub app_delegate: Vec<ManifestPath>,
    pub ios_assets: ManifestPath,
    pub ios_app_dir: ManifestPath,
}

impl Default for StructuredFiles {
    fn default() -> Self {
        Self {
            package_json: ManifestPath::new("package.json"),
            app_json: ManifestPath::new("app.json"),
            display_name_field: "displayName".to_string(),
            root_component: ManifestPath::new("App.tsx"),
            android_manifest: ManifestPath::new("android/app/src/main/AndroidManifest.xml"),
            strings_xml: ManifestPath::new("android/app/src/main/res/values/strings.xml"),
            android_build_gradle: ManifestPath::new("android/build.gradle"),
            app_build_gradle: ManifestPath::new("android/app/build.gradle"),
            android_res: ManifestPath::new("android/app/src/main/res"),
            android_assets: ManifestPath::new("android/app/src/main/assets"),
            info_plist: ManifestPath::new("ios/{project_name}/Info.plist"),
            pbxproj: ManifestPath::new("ios/{project_name}.xcodeproj/project.pbxproj"),
            podfile: ManifestPath::new("ios/Podfile"),
            app_delegate: vec![
                ManifestPath::new("ios/{project_name}/AppDelegate.swift"),
                ManifestPath::new("ios/{project_name}/AppDelegate.mm"),
                ManifestPath::new("ios/{project_name}/AppDelegate.m"),
            ],
            ios_assets: ManifestPath::new("ios/{project_name}/Images.xcassets"),
            ios_app_dir: ManifestPath::new("ios/{project_name}"),
        }
    }
}

fn default_text_files() -> Vec<ManifestPath> {
    [
        "package.json",
        "app.json",
        "index.js",
        "ios/Podfile",
        "ios/{project_name}/Info.plist",
        "ios/{project_name}/AppDelegate.swift",
        "ios/{project_name}/AppDelegate.mm",
        "ios/{project_name}/LaunchScreen.storyboard",
        "ios/{project_name}.xcodeproj/project.pbxproj",
        "ios/{project_name}.xcodeproj/xcshareddata/xcschemes/{project_name}.xcscheme",
        "ios/{project_name}.xcworkspace/contents.xcworkspacedata",
        "ios/{project_name}Tests/{project_name}Tests.m",
        "android/settings.gradle",
        "android/app/build.gradle",
        "android/app/src/main/AndroidManifest.xml",
        "android/app/src/main/res/values/strings.xml",
    ]
    .into_iter()
    .map(ManifestPath::new)
    .collect()
}

fn default_renames() -> Vec<ManifestPath> {
    [
        "ios/{project_name}",
        "ios/{project_name}.xcodeproj",
        "ios/{project_name}.xcworkspace",
        "ios/{project_name}Tests",
        "ios/{project_name}Tests/{project_name}Tests.m",
        "ios/{project_name}.xcodeproj/xcshareddata/xcschemes/{project_name}.xcscheme",
    ]
    .into_iter()
    .map(ManifestPath::new)
    .collect()
}

fn default_package_roots() -> Vec<String> {
    [
        "android/app/src/main/java",
        "android/app/src/debug/java",
        "android/app/src/release/java",
        "android/app/src/androidTest/java",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Built-in exclusion patterns (see [`matches_pattern`] for syntax)
pub fn default_exclusions() -> Vec<String> {
    [
        ".git",
        ".svn",
        ".hg",
        "node_modules",
        "Pods",
        ".gradle",
        "DerivedData",
        ".DS_Store",
        "ios/build",
        "android/build",
        "android/app/build",
        "*.zip",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn group(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .collect()
}

/// Built-in dependency versions per feature group
pub fn default_dependencies() -> BTreeMap<String, BTreeMap<String, String>> {
    let mut groups = BTreeMap::new();
    groups.insert("state".to_string(), group(&[("zustand", "^5.0.3")]));
    groups.insert(
        "storage".to_string(),
        group(&[("react-native-mmkv", "^3.2.0")]),
    );
    groups.insert(
        "navigation".to_string(),
        group(&[
            ("@react-navigation/native", "^7.0.14"),
            ("@react-navigation/native-stack", "^7.2.0"),
            ("react-native-safe-area-context", "^5.2.0"),
            ("react-native-screens", "^4.6.0"),
        ]),
    );
    groups.insert(
        "environments".to_string(),
        group(&[("react-native-config", "^1.5.5")]),
    );
    groups.insert(
        "localization".to_string(),
        group(&[("react-native-localize", "^3.4.1")]),
    );
    groups.insert(
        "maps".to_string(),
        group(&[
            ("react-native-maps", "^1.20.1"),
            ("react-native-maps-directions", "^1.9.0"),
        ]),
    );
    groups.insert(
        "firebase".to_string(),
        group(&[
            ("@react-native-firebase/app", "^21.7.1"),
            ("@react-native-firebase/analytics", "^21.7.1"),
            ("@react-native-firebase/auth", "^21.7.1"),
            ("@react-native-firebase/firestore", "^21.7.1"),
            ("@react-native-firebase/database", "^21.7.1"),
            ("@react-native-firebase/messaging", "^21.7.1"),
            ("@react-native-firebase/crashlytics", "^21.7.1"),
            ("@react-native-firebase/remote-config", "^21.7.1"),
            ("@react-native-firebase/storage", "^21.7.1"),
            ("@react-native-firebase/functions", "^21.7.1"),
        ]),
    );
    groups
}

/// Per-template manifest (templates/<name>/template.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Semver version of the template itself
    pub version: String,

    /// Oldest CLI version able to materialize this template
    #[serde(default)]
    pub min_cli_version: Option<String>,

    #[serde(default)]
    pub placeholders: Placeholders,

    /// Files that receive blanket placeholder substitution, on top of the
    /// Java/Kotlin sources found under [`Self::package_sources`]
    #[serde(default = "default_text_files")]
    pub text_files: Vec<ManifestPath>,

    #[serde(default)]
    pub structured: StructuredFiles,

    /// Paths embedding the project name, renamed after substitution
    #[serde(default = "default_renames")]
    pub renames: Vec<ManifestPath>,

    /// Java/Kotlin source roots holding the placeholder package tree
    #[serde(default = "default_package_roots")]
    pub package_roots: Vec<String>,

    /// Extra copy exclusions, appended to the built-in ones
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Dependency versions per feature group, overriding the built-in table
    #[serde(default)]
    pub dependencies: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for TemplateManifest {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            description: "React Native app".to_string(),
            version: "0.1.0".to_string(),
            min_cli_version: None,
            placeholders: Placeholders::default(),
            text_files: default_text_files(),
            structured: StructuredFiles::default(),
            renames: default_renames(),
            package_roots: default_package_roots(),
            exclude: Vec::new(),
            dependencies: BTreeMap::new(),
        }
    }
}

impl TemplateManifest {
    /// Load `template.yaml` from a template root, falling back to built-in defaults
    pub fn load(template_root: &Path) -> Result<Self> {
        if !template_root.is_dir() {
            return Err(ScaffoldError::Template(format!(
                "Template directory not found: {}",
                template_root.display()
            )));
        }
        let path = template_root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).io_context("read", &path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ScaffoldError::Template(format!("Failed to parse {}: {}", MANIFEST_FILE, e)))
    }

    /// Rename rules ordered so nested entries move before their parents
    pub fn ordered_renames(&self) -> Vec<&ManifestPath> {
        let mut renames: Vec<&ManifestPath> = self.renames.iter().collect();
        renames.sort_by_key(|rule| std::cmp::Reverse(rule.depth()));
        renames
    }

    /// Java/Kotlin sources inside the placeholder package of every package root
    pub fn package_sources(&self, dest: &Path) -> Vec<PathBuf> {
        let package = self.placeholders.bundle_path();
        let mut sources = Vec::new();
        for root in &self.package_roots {
            let dir = dest.join(root).join(&package);
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&dir).sort_by_file_name().into_iter().flatten() {
                let is_source = entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| matches!(e, "kt" | "java"));
                if entry.file_type().is_file() && is_source {
                    sources.push(entry.into_path());
                }
            }
        }
        sources
    }

    /// Built-in plus template-specific exclusion patterns
    pub fn exclusions(&self) -> Vec<String> {
        let mut patterns = default_exclusions();
        patterns.extend(self.exclude.iter().cloned());
        patterns
    }

    /// Dependency versions for a feature group
    pub fn dependency_group(&self, name: &str) -> BTreeMap<String, String> {
        self.dependencies
            .get(name)
            .cloned()
            .or_else(|| default_dependencies().remove(name))
            .unwrap_or_default()
    }
}

/// Match a relative path against an exclusion pattern.
///
/// Patterns containing `/` compare against the whole relative path; others
/// compare against the final component. `*x` is a suffix match, `x*` a
/// prefix match, anything else exact.
pub fn matches_pattern(relative_path: &str, pattern: &str) -> bool {
    let subject = if pattern.contains('/') {
        relative_path
    } else {
        relative_path.rsplit('/').next().unwrap_or(relative_path)
    };
    if let Some(suffix) = pattern.strip_prefix('*') {
        subject.ends_with(suffix)
    } else if let Some(prefix) = pattern.strip_suffix('*') {
        subject.starts_with(prefix)
    } else {
        subject == pattern
    }
}
