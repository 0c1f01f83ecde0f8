//! Persisted key-value storage shared by feature stores

use super::fragments::{remove_path, write_fragment, APP_SLUG_TOKEN, STORAGE};
use super::FeatureContext;
use crate::config::{NavigationMode, ProjectConfig};
use crate::error::{Result, Warning};

pub const STORAGE_FILE: &str = "storage/storage.ts";

/// How feature stores are backed in the generated app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePlan {
    /// No storage layer and no dependent stores
    Disabled,
    /// `storage.ts` is generated and stores persist through it
    Persisted,
    /// Dependent stores exist but keep state in memory
    Fallback,
}

/// True when a selected feature ships a store that can be persisted
pub fn has_persistence_dependents(config: &ProjectConfig) -> bool {
    config.navigation == NavigationMode::WithAuth || config.localization.is_some() || config.theme
}

impl StoragePlan {
    pub fn resolve(config: &ProjectConfig) -> Self {
        let dependents = has_persistence_dependents(config);
        if config.storage.persisted {
            StoragePlan::Persisted
        } else if dependents && config.storage.declined_persistence {
            StoragePlan::Fallback
        } else if dependents {
            StoragePlan::Persisted
        } else {
            StoragePlan::Disabled
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, StoragePlan::Persisted)
    }
}

pub fn apply(ctx: &FeatureContext) -> Result<Vec<Warning>> {
    let path = ctx.src(STORAGE_FILE);

    if !ctx.storage.is_persisted() {
        remove_path(&path)?;
        if let Some(dir) = path.parent() {
            if dir.read_dir().is_ok_and(|mut entries| entries.next().is_none()) {
                remove_path(dir)?;
            }
        }
        ctx.remove_dependency_groups(&["storage"])?;
        return Ok(Vec::new());
    }

    let tokens = vec![(APP_SLUG_TOKEN.to_string(), ctx.app_slug())];
    write_fragment(&path, STORAGE, &tokens)?;
    ctx.add_dependency_groups(&["storage", "state"])?;
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocalizationOptions;

    fn config() -> ProjectConfig {
        ProjectConfig::new("MyApp", "com.acme.myapp", "My App")
    }

    #[test]
    fn test_plan_without_dependents() {
        assert_eq!(StoragePlan::resolve(&config()), StoragePlan::Disabled);

        let mut explicit = config();
        explicit.storage.persisted = true;
        assert_eq!(StoragePlan::resolve(&explicit), StoragePlan::Persisted);
    }

    #[test]
    fn test_dependents_force_persistence() {
        let mut with_auth = config();
        with_auth.navigation = NavigationMode::WithAuth;
        assert_eq!(StoragePlan::resolve(&with_auth), StoragePlan::Persisted);

        let mut app_only = config();
        app_only.navigation = NavigationMode::AppOnly;
        assert_eq!(StoragePlan::resolve(&app_only), StoragePlan::Disabled);

        let mut localized = config();
        localized.localization = Some(LocalizationOptions {
            default_language: "ar".to_string(),
            remote_config: false,
        });
        assert_eq!(StoragePlan::resolve(&localized), StoragePlan::Persisted);
    }

    #[test]
    fn test_declined_follow_up_falls_back() {
        let mut themed = config();
        themed.theme = true;
        themed.storage.declined_persistence = true;
        assert_eq!(StoragePlan::resolve(&themed), StoragePlan::Fallback);

        // Declining only matters when something depends on storage
        let mut plain = config();
        plain.storage.declined_persistence = true;
        assert_eq!(StoragePlan::resolve(&plain), StoragePlan::Disabled);
    }
}
