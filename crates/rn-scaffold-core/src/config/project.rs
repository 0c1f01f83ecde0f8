//! Resolved project configuration consumed by `materialize`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Package manager used for dependency installation
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// Command line used to run a package.json script
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            PackageManager::Yarn => format!("yarn {}", script),
            PackageManager::Pnpm => format!("pnpm {}", script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Which navigation scaffold to generate
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationMode {
    #[default]
    None,
    AppOnly,
    WithAuth,
}

impl NavigationMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            NavigationMode::None => "No navigation",
            NavigationMode::AppOnly => "App stack only",
            NavigationMode::WithAuth => "App and auth stacks",
        }
    }
}

/// Map tile provider used on iOS (Android always uses Google Maps)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MapsProvider {
    #[default]
    Google,
    Apple,
}

/// Firebase submodules that can be wired into the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FirebaseModule {
    Analytics,
    Auth,
    Firestore,
    Database,
    Messaging,
    Crashlytics,
    RemoteConfig,
    Storage,
    Functions,
}

impl FirebaseModule {
    pub const ALL: [FirebaseModule; 9] = [
        FirebaseModule::Analytics,
        FirebaseModule::Auth,
        FirebaseModule::Firestore,
        FirebaseModule::Database,
        FirebaseModule::Messaging,
        FirebaseModule::Crashlytics,
        FirebaseModule::RemoteConfig,
        FirebaseModule::Storage,
        FirebaseModule::Functions,
    ];

    /// Suffix of the `@react-native-firebase/*` package
    pub fn slug(&self) -> &'static str {
        match self {
            FirebaseModule::Analytics => "analytics",
            FirebaseModule::Auth => "auth",
            FirebaseModule::Firestore => "firestore",
            FirebaseModule::Database => "database",
            FirebaseModule::Messaging => "messaging",
            FirebaseModule::Crashlytics => "crashlytics",
            FirebaseModule::RemoteConfig => "remote-config",
            FirebaseModule::Storage => "storage",
            FirebaseModule::Functions => "functions",
        }
    }

    pub fn package_name(&self) -> String {
        format!("@react-native-firebase/{}", self.slug())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FirebaseModule::Analytics => "Analytics",
            FirebaseModule::Auth => "Authentication",
            FirebaseModule::Firestore => "Cloud Firestore",
            FirebaseModule::Database => "Realtime Database",
            FirebaseModule::Messaging => "Cloud Messaging",
            FirebaseModule::Crashlytics => "Crashlytics",
            FirebaseModule::RemoteConfig => "Remote Config",
            FirebaseModule::Storage => "Cloud Storage",
            FirebaseModule::Functions => "Cloud Functions",
        }
    }
}

/// Where the Google service config files come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirebaseConfigSource {
    /// One directory holding both platform files (single environment)
    Single(PathBuf),
    /// A base directory with one subdirectory per environment
    PerEnvironment(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseOptions {
    #[serde(default)]
    pub modules: Vec<FirebaseModule>,

    /// Environments that get their own Firebase project (empty for single)
    #[serde(default)]
    pub environments: Vec<String>,

    pub config_source: FirebaseConfigSource,
}

impl FirebaseOptions {
    pub fn has_module(&self, module: FirebaseModule) -> bool {
        self.modules.contains(&module)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapsOptions {
    #[serde(default)]
    pub provider: MapsProvider,

    #[serde(default)]
    pub api_key: Option<String>,
}

/// Persisted key-value storage choices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageOptions {
    /// User explicitly opted into persisted storage
    #[serde(default)]
    pub persisted: bool,

    /// User declined the persistence follow-up asked by dependent features
    #[serde(default)]
    pub declined_persistence: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationOptions {
    /// Language code of the bundled default resource file (e.g. "en", "ar")
    pub default_language: String,

    /// Pull translation overrides from Firebase Remote Config
    #[serde(default)]
    pub remote_config: bool,
}

/// Optional asset source directories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSources {
    #[serde(default)]
    pub splash: Option<PathBuf>,
    #[serde(default)]
    pub icons: Option<PathBuf>,
    #[serde(default)]
    pub fonts: Option<PathBuf>,
}

/// Fully resolved configuration for one scaffolding run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project_name: String,
    pub bundle_identifier: String,
    pub display_name: String,

    #[serde(default)]
    pub package_manager: PackageManager,

    #[serde(default)]
    pub skip_install: bool,
    #[serde(default)]
    pub skip_git: bool,
    #[serde(default)]
    pub skip_pods: bool,
    #[serde(default)]
    pub yes: bool,

    /// Ordered build environments (e.g. development, staging, production)
    #[serde(default)]
    pub environments: Vec<String>,

    #[serde(default)]
    pub firebase: Option<FirebaseOptions>,

    #[serde(default)]
    pub maps: Option<MapsOptions>,

    #[serde(default)]
    pub storage: StorageOptions,

    #[serde(default)]
    pub navigation: NavigationMode,

    #[serde(default)]
    pub localization: Option<LocalizationOptions>,

    #[serde(default)]
    pub theme: bool,

    #[serde(default)]
    pub assets: AssetSources,
}

impl ProjectConfig {
    /// Minimal configuration with every optional feature disabled
    pub fn new(
        project_name: impl Into<String>,
        bundle_identifier: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            bundle_identifier: bundle_identifier.into(),
            display_name: display_name.into(),
            package_manager: PackageManager::default(),
            skip_install: false,
            skip_git: false,
            skip_pods: false,
            yes: false,
            environments: Vec::new(),
            firebase: None,
            maps: None,
            storage: StorageOptions::default(),
            navigation: NavigationMode::default(),
            localization: None,
            theme: false,
            assets: AssetSources::default(),
        }
    }

    /// Bundle identifier as nested path segments (`com.acme.app` -> `com/acme/app`)
    pub fn bundle_path(&self) -> PathBuf {
        self.bundle_identifier.split('.').collect()
    }

    /// True when the Firebase Remote Config module is selected
    pub fn has_remote_config(&self) -> bool {
        self.firebase
            .as_ref()
            .is_some_and(|f| f.has_module(FirebaseModule::RemoteConfig))
    }

    /// Load a configuration file (YAML) for non-interactive runs
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).map_err(|e| anyhow::anyhow!("Invalid config file: {}", e))
    }
}
