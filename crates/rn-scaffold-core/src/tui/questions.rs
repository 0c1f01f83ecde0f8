//! Project configuration prompts

use super::prompts::CreateArgs;
use crate::config::validate::{
    check_google_config_dir, validate_bundle_identifier, validate_environment_name,
    validate_language_code, validate_project_name,
};
use crate::config::{
    FirebaseConfigSource, FirebaseModule, FirebaseOptions, LocalizationOptions, MapsOptions,
    MapsProvider, NavigationMode, PackageManager, ProjectConfig,
};
use crate::features::storage::has_persistence_dependents;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Bundle identifier suggested for a project name
pub fn default_bundle_identifier(project_name: &str) -> String {
    let slug: String = project_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    format!("com.{}", if slug.is_empty() { "app".to_string() } else { slug })
}

/// Split a comma-separated environment list, dropping blanks and duplicates
pub fn parse_environments(input: &str) -> Vec<String> {
    let mut environments: Vec<String> = Vec::new();
    for env in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if !environments.iter().any(|e| e == env) {
            environments.push(env.to_string());
        }
    }
    environments
}

fn load_config_file(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ProjectConfig::from_yaml(&content)
}

/// Resolve the full project configuration from flags, a config file and prompts.
///
/// Flags win over the config file. Prompts are only shown for values neither
/// provides, and never with `--yes` or a config file.
pub fn resolve_project_config(args: &CreateArgs) -> Result<ProjectConfig> {
    let file = args.config_file.as_deref().map(load_config_file).transpose()?;
    let interactive = !args.yes && file.is_none();
    let mut config = file.unwrap_or_else(|| ProjectConfig::new("", "", ""));

    if let Some(name) = &args.name {
        config.project_name = name.clone();
    }
    if config.project_name.is_empty() {
        if !interactive {
            anyhow::bail!("A project name is required in non-interactive mode");
        }
        config.project_name = cliclack::input("Project name")
            .placeholder("MyApp")
            .validate(|input: &String| validate_project_name(input))
            .interact()?;
    }

    if let Some(id) = &args.bundle_id {
        config.bundle_identifier = id.clone();
    }
    if config.bundle_identifier.is_empty() {
        let suggested = default_bundle_identifier(&config.project_name);
        config.bundle_identifier = if interactive {
            cliclack::input("Bundle identifier")
                .default_input(&suggested)
                .validate(|input: &String| validate_bundle_identifier(input))
                .interact()?
        } else {
            suggested
        };
    }

    if let Some(display) = &args.display_name {
        config.display_name = display.clone();
    }
    if config.display_name.is_empty() {
        config.display_name = if interactive {
            cliclack::input("Display name")
                .default_input(&config.project_name)
                .interact()?
        } else {
            config.project_name.clone()
        };
    }

    if let Some(manager) = args.package_manager {
        config.package_manager = manager;
    } else if interactive {
        config.package_manager = cliclack::select("Package manager")
            .item(PackageManager::Npm, "npm", "")
            .item(PackageManager::Yarn, "yarn", "")
            .item(PackageManager::Pnpm, "pnpm", "")
            .interact()?;
    }

    config.skip_install |= args.skip_install;
    config.skip_git |= args.skip_git;
    config.skip_pods |= args.skip_pods;
    config.yes |= args.yes;

    if interactive {
        prompt_features(&mut config)?;
    }

    if let Some(dir) = &args.splash_dir {
        config.assets.splash = Some(dir.clone());
    }
    if let Some(dir) = &args.icons_dir {
        config.assets.icons = Some(dir.clone());
    }
    if let Some(dir) = &args.fonts_dir {
        config.assets.fonts = Some(dir.clone());
    }

    Ok(config)
}

fn prompt_features(config: &mut ProjectConfig) -> Result<()> {
    let environments: String = cliclack::input("Build environments (comma-separated, empty for none)")
        .placeholder("development,staging,production")
        .required(false)
        .validate(|input: &String| {
            parse_environments(input)
                .iter()
                .try_for_each(|env| validate_environment_name(env))
        })
        .interact()?;
    config.environments = parse_environments(&environments);

    config.firebase = prompt_firebase(&config.environments)?;
    config.maps = prompt_maps()?;

    config.navigation = cliclack::select("Navigation")
        .item(NavigationMode::None, NavigationMode::None.display_name(), "")
        .item(NavigationMode::AppOnly, NavigationMode::AppOnly.display_name(), "")
        .item(
            NavigationMode::WithAuth,
            NavigationMode::WithAuth.display_name(),
            "login flow plus app stack",
        )
        .interact()?;

    if cliclack::confirm("Add localization?")
        .initial_value(false)
        .interact()?
    {
        let default_language: String = cliclack::input("Default language code")
            .default_input("en")
            .validate(|input: &String| validate_language_code(input))
            .interact()?;
        let remote_config = config.has_remote_config()
            && cliclack::confirm("Load translation overrides from Remote Config?")
                .initial_value(true)
                .interact()?;
        config.localization = Some(LocalizationOptions {
            default_language,
            remote_config,
        });
    }

    config.theme = cliclack::confirm("Add light/dark theme support?")
        .initial_value(false)
        .interact()?;

    config.storage.persisted = cliclack::confirm("Add persisted key-value storage (MMKV)?")
        .initial_value(false)
        .interact()?;

    if !config.storage.persisted && has_persistence_dependents(config) {
        let persist = cliclack::confirm(
            "Persist session, language and theme state across launches? (adds MMKV)",
        )
        .initial_value(true)
        .interact()?;
        config.storage.persisted = persist;
        config.storage.declined_persistence = !persist;
    }

    Ok(())
}

fn prompt_firebase(environments: &[String]) -> Result<Option<FirebaseOptions>> {
    if !cliclack::confirm("Add Firebase?")
        .initial_value(false)
        .interact()?
    {
        return Ok(None);
    }

    let mut select = cliclack::multiselect("Firebase modules").required(false);
    for module in FirebaseModule::ALL {
        select = select.item(module, module.display_name(), module.package_name());
    }
    let modules: Vec<FirebaseModule> = select.interact()?;

    let per_environment = environments.len() > 1
        && cliclack::confirm("Use a separate Firebase project per environment?")
            .initial_value(true)
            .interact()?;

    let (config_source, firebase_envs) = if per_environment {
        let base: String = cliclack::input(
            "Directory with one subdirectory of Google config files per environment",
        )
        .placeholder("./firebase")
        .validate(|input: &String| {
            if Path::new(input).is_dir() {
                Ok(())
            } else {
                Err(format!("{} is not a directory", input))
            }
        })
        .interact()?;
        (
            FirebaseConfigSource::PerEnvironment(PathBuf::from(base)),
            environments.to_vec(),
        )
    } else {
        let dir: String = cliclack::input(
            "Directory with google-services.json and GoogleService-Info.plist",
        )
        .placeholder("./firebase")
        .validate(|input: &String| check_google_config_dir(Path::new(input)))
        .interact()?;
        (FirebaseConfigSource::Single(PathBuf::from(dir)), Vec::new())
    };

    Ok(Some(FirebaseOptions {
        modules,
        environments: firebase_envs,
        config_source,
    }))
}

fn prompt_maps() -> Result<Option<MapsOptions>> {
    if !cliclack::confirm("Add maps?").initial_value(false).interact()? {
        return Ok(None);
    }
    let provider = cliclack::select("Map provider on iOS")
        .item(MapsProvider::Google, "Google Maps", "same as Android")
        .item(MapsProvider::Apple, "Apple Maps", "no Google SDK on iOS")
        .interact()?;
    let api_key: String = cliclack::input("Google Maps API key")
        .placeholder("leave empty to fill in later")
        .required(false)
        .interact()?;
    let api_key = api_key.trim();

    Ok(Some(MapsOptions {
        provider,
        api_key: (!api_key.is_empty()).then(|| api_key.to_string()),
    }))
}
