//! Project configuration model and validation

pub mod project;
pub mod validate;

pub use project::{
    AssetSources, FirebaseConfigSource, FirebaseModule, FirebaseOptions, LocalizationOptions,
    MapsOptions, MapsProvider, NavigationMode, PackageManager, ProjectConfig, StorageOptions,
};
pub use validate::{
    validate_bundle_identifier, validate_environment_name, validate_language_code,
    validate_project_name,
};
