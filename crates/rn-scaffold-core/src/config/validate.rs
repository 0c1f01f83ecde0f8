//! Configuration validation, run before any filesystem mutation

use super::project::{FirebaseConfigSource, FirebaseOptions, ProjectConfig};
use crate::error::{Result, ScaffoldError};
use std::path::Path;

/// Platform config files every Firebase source directory must contain
pub const GOOGLE_SERVICES_JSON: &str = "google-services.json";
pub const GOOGLE_SERVICE_INFO_PLIST: &str = "GoogleService-Info.plist";

/// Environment that must be present when several Firebase projects are configured
pub const PRODUCTION_ENV: &str = "production";

/// Project names become directory names, Xcode targets and Gradle project names
pub fn validate_project_name(name: &str) -> std::result::Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Err("Project name cannot be empty".to_string()),
        Some(c) if !c.is_ascii_alphabetic() => {
            return Err(format!("Project name '{}' must start with a letter", name))
        }
        _ => {}
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(format!(
            "Project name '{}' contains invalid character '{}' (letters, digits and _ only)",
            name, bad
        ));
    }
    Ok(())
}

/// Reverse-domain identifier: at least two segments, each a lowercase identifier
pub fn validate_bundle_identifier(id: &str) -> std::result::Result<(), String> {
    let segments: Vec<&str> = id.split('.').collect();
    if segments.len() < 2 {
        return Err(format!(
            "Bundle identifier '{}' needs at least two dot-separated segments (e.g. com.example.app)",
            id
        ));
    }
    for segment in segments {
        let mut chars = segment.chars();
        let valid = match chars.next() {
            Some(c) if c.is_ascii_lowercase() => {
                chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            }
            _ => false,
        };
        if !valid {
            return Err(format!(
                "Bundle identifier segment '{}' in '{}' must start with a lowercase letter and contain only a-z, 0-9 and _",
                segment, id
            ));
        }
    }
    Ok(())
}

/// ISO 639 code with an optional region (`en`, `ar`, `pt-BR`)
pub fn validate_language_code(code: &str) -> std::result::Result<(), String> {
    let (lang, region) = match code.split_once('-') {
        Some((lang, region)) => (lang, Some(region)),
        None => (code, None),
    };
    let lang_ok = (2..=3).contains(&lang.len()) && lang.chars().all(|c| c.is_ascii_lowercase());
    let region_ok = region
        .map(|r| r.len() == 2 && r.chars().all(|c| c.is_ascii_uppercase()))
        .unwrap_or(true);
    if lang_ok && region_ok {
        Ok(())
    } else {
        Err(format!(
            "Language code '{}' must look like 'en' or 'pt-BR'",
            code
        ))
    }
}

/// Environment names become Gradle flavors and `.env.<name>` suffixes
pub fn validate_environment_name(name: &str) -> std::result::Result<(), String> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(format!(
            "Environment '{}' must be lowercase letters and digits, starting with a letter",
            name
        ))
    }
}

/// Check a directory holds both Google service config files
pub fn check_google_config_dir(dir: &Path) -> std::result::Result<(), String> {
    if !dir.is_dir() {
        return Err(format!(
            "Firebase config directory not found: {}",
            dir.display()
        ));
    }
    let missing: Vec<&str> = [GOOGLE_SERVICES_JSON, GOOGLE_SERVICE_INFO_PLIST]
        .into_iter()
        .filter(|name| !dir.join(name).is_file())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} is missing {}",
            dir.display(),
            missing.join(" and ")
        ))
    }
}

/// Validate Firebase environment rules and that every source directory is complete
pub fn validate_firebase(firebase: &FirebaseOptions) -> std::result::Result<(), String> {
    match &firebase.config_source {
        FirebaseConfigSource::Single(dir) => {
            if firebase.environments.len() > 1 {
                return Err(
                    "A single Firebase config directory cannot serve multiple environments"
                        .to_string(),
                );
            }
            check_google_config_dir(dir)
        }
        FirebaseConfigSource::PerEnvironment(base) => {
            if firebase.environments.is_empty() {
                return Err(
                    "Per-environment Firebase config needs at least one environment".to_string(),
                );
            }
            if firebase.environments.len() > 1
                && !firebase.environments.iter().any(|e| e == PRODUCTION_ENV)
            {
                return Err(format!(
                    "Multiple Firebase environments must include '{}'",
                    PRODUCTION_ENV
                ));
            }
            let problems: Vec<String> = firebase
                .environments
                .iter()
                .filter_map(|env| check_google_config_dir(&base.join(env)).err())
                .collect();
            if problems.is_empty() {
                Ok(())
            } else {
                Err(problems.join("; "))
            }
        }
    }
}

impl ProjectConfig {
    /// Validate everything that can be checked before materialization starts
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if let Err(e) = validate_project_name(&self.project_name) {
            problems.push(e);
        }
        if let Err(e) = validate_bundle_identifier(&self.bundle_identifier) {
            problems.push(e);
        }
        if self.display_name.trim().is_empty() {
            problems.push("Display name cannot be empty".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for env in &self.environments {
            if let Err(e) = validate_environment_name(env) {
                problems.push(e);
            }
            if !seen.insert(env.as_str()) {
                problems.push(format!("Environment '{}' is listed twice", env));
            }
        }

        if let Some(firebase) = &self.firebase {
            for env in &firebase.environments {
                if let Err(e) = validate_environment_name(env) {
                    problems.push(e);
                }
            }
            if let Err(e) = validate_firebase(firebase) {
                problems.push(e);
            }
        }

        if let Some(maps) = &self.maps {
            if maps.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                problems.push("Maps API key cannot be blank".to_string());
            }
        }

        if let Some(localization) = &self.localization {
            if let Err(e) = validate_language_code(&localization.default_language) {
                problems.push(e);
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ScaffoldError::validation(problems.join("\n")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_google_files(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(GOOGLE_SERVICES_JSON), "{}").unwrap();
        fs::write(dir.join(GOOGLE_SERVICE_INFO_PLIST), "<plist/>").unwrap();
    }

    #[test]
    fn test_project_name_rules() {
        assert!(validate_project_name("MyApp").is_ok());
        assert!(validate_project_name("my_app2").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("1App").is_err());
        assert!(validate_project_name("my-app").is_err());
    }

    #[test]
    fn test_bundle_identifier_rules() {
        assert!(validate_bundle_identifier("com.acme.myapp").is_ok());
        assert!(validate_bundle_identifier("io.app_1").is_ok());
        assert!(validate_bundle_identifier("myapp").is_err());
        assert!(validate_bundle_identifier("com.Acme.app").is_err());
        assert!(validate_bundle_identifier("com..app").is_err());
        assert!(validate_bundle_identifier("com.1acme").is_err());
    }

    #[test]
    fn test_language_codes() {
        assert!(validate_language_code("en").is_ok());
        assert!(validate_language_code("ar").is_ok());
        assert!(validate_language_code("pt-BR").is_ok());
        assert!(validate_language_code("EN").is_err());
        assert!(validate_language_code("english").is_err());
    }

    #[test]
    fn test_validate_collects_all_problems() {
        let config = ProjectConfig::new("1bad", "single", " ");
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must start with a letter"));
        assert!(err.contains("two dot-separated"));
        assert!(err.contains("Display name"));
    }

    #[test]
    fn test_duplicate_environments_rejected() {
        let mut config = ProjectConfig::new("MyApp", "com.acme.myapp", "My App");
        config.environments = vec!["staging".into(), "staging".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_firebase_multi_env_requires_production() {
        let tmp = TempDir::new().unwrap();
        write_google_files(&tmp.path().join("development"));
        write_google_files(&tmp.path().join("staging"));

        let firebase = FirebaseOptions {
            modules: vec![],
            environments: vec!["development".into(), "staging".into()],
            config_source: FirebaseConfigSource::PerEnvironment(tmp.path().to_path_buf()),
        };
        let err = validate_firebase(&firebase).unwrap_err();
        assert!(err.contains("production"));
    }

    #[test]
    fn test_firebase_per_env_reports_missing_files() {
        let tmp = TempDir::new().unwrap();
        write_google_files(&tmp.path().join("production"));
        fs::create_dir_all(tmp.path().join("development")).unwrap();
        fs::write(tmp.path().join("development").join(GOOGLE_SERVICES_JSON), "{}").unwrap();

        let firebase = FirebaseOptions {
            modules: vec![],
            environments: vec!["development".into(), "production".into()],
            config_source: FirebaseConfigSource::PerEnvironment(tmp.path().to_path_buf()),
        };
        let err = validate_firebase(&firebase).unwrap_err();
        assert!(err.contains(GOOGLE_SERVICE_INFO_PLIST));
        assert!(err.contains("development"));
    }

    #[test]
    fn test_firebase_single_dir_ok() {
        let tmp = TempDir::new().unwrap();
        write_google_files(tmp.path());
        let firebase = FirebaseOptions {
            modules: vec![],
            environments: vec![],
            config_source: FirebaseConfigSource::Single(tmp.path().to_path_buf()),
        };
        assert!(validate_firebase(&firebase).is_ok());
    }
}
