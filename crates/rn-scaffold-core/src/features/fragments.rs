//! Source fragments written into generated projects

use crate::error::{IoContext, Result};
use crate::materialize::replacer::replace_tokens;
use std::fs;
use std::path::Path;

pub const APP_SLUG_TOKEN: &str = "__APP_SLUG__";
pub const DEFAULT_LANGUAGE_TOKEN: &str = "__DEFAULT_LANGUAGE__";
pub const TEXT_DIRECTION_TOKEN: &str = "__TEXT_DIRECTION__";

pub const STORAGE: &str = include_str!("../../fragments/storage/storage.ts");

pub const NAVIGATION_TYPES_APP: &str = include_str!("../../fragments/navigation/types.app.ts");
pub const NAVIGATION_TYPES_AUTH: &str = include_str!("../../fragments/navigation/types.auth.ts");
pub const APP_NAVIGATOR: &str = include_str!("../../fragments/navigation/AppNavigator.tsx");
pub const AUTH_NAVIGATOR: &str = include_str!("../../fragments/navigation/AuthNavigator.tsx");
pub const ROOT_NAVIGATOR: &str = include_str!("../../fragments/navigation/RootNavigator.tsx");
pub const NAVIGATION_INDEX_APP: &str = include_str!("../../fragments/navigation/index.app.ts");
pub const NAVIGATION_INDEX_AUTH: &str = include_str!("../../fragments/navigation/index.auth.ts");
pub const HOME_SCREEN: &str = include_str!("../../fragments/screens/HomeScreen.tsx");
pub const LOGIN_SCREEN: &str = include_str!("../../fragments/screens/LoginScreen.tsx");

pub const AUTH_TYPES: &str = include_str!("../../fragments/auth/types.ts");
pub const AUTH_STORE: &str = include_str!("../../fragments/auth/store.ts");
pub const AUTH_STORE_FALLBACK: &str = include_str!("../../fragments/auth/store.fallback.ts");
pub const AUTH_INDEX: &str = include_str!("../../fragments/auth/index.ts");

pub const LOCALIZATION_TYPES: &str = include_str!("../../fragments/localization/types.ts");
pub const LOCALIZATION_STORE: &str = include_str!("../../fragments/localization/store.ts");
pub const LOCALIZATION_STORE_FALLBACK: &str =
    include_str!("../../fragments/localization/store.fallback.ts");
pub const LOCALIZATION_PROVIDER: &str =
    include_str!("../../fragments/localization/LocalizationProvider.tsx");
pub const LOCALIZATION_INDEX: &str = include_str!("../../fragments/localization/index.ts");
pub const LOCALIZATION_LANGUAGE: &str = include_str!("../../fragments/localization/language.ts");
pub const LOCALIZATION_REMOTE_CONFIG: &str =
    include_str!("../../fragments/localization/remoteConfig.ts");

pub const THEME_TYPES: &str = include_str!("../../fragments/theme/types.ts");
pub const THEME_STORE: &str = include_str!("../../fragments/theme/store.ts");
pub const THEME_STORE_FALLBACK: &str = include_str!("../../fragments/theme/store.fallback.ts");
pub const THEME_THEMES: &str = include_str!("../../fragments/theme/themes.ts");
pub const THEME_PROVIDER: &str = include_str!("../../fragments/theme/ThemeProvider.tsx");
pub const THEME_INDEX: &str = include_str!("../../fragments/theme/index.ts");

/// Write a fragment with its tokens expanded. Unchanged files are not rewritten.
pub fn write_fragment(
    path: &Path,
    fragment: &str,
    tokens: &[(String, String)],
) -> Result<bool> {
    let content = replace_tokens(fragment, tokens)?;
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).io_context("create directory", parent)?;
    }
    fs::write(path, content).io_context("write", path)?;
    Ok(true)
}

/// Remove a file or directory if present
pub fn remove_path(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(path).io_context("remove", path)?;
            Ok(true)
        }
        Ok(_) => {
            fs::remove_file(path).io_context("remove", path)?;
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
