//! Localization module with a bundled default language

use super::fragments::{self, write_fragment, DEFAULT_LANGUAGE_TOKEN, TEXT_DIRECTION_TOKEN};
use super::root_component::wrap_root;
use super::FeatureContext;
use crate::error::{Result, Warning};

const SCOPE: &str = "localization";
const PROVIDER: &str = "LocalizationProvider";
pub const LOCALIZATION_DIR: &str = "localization";

const RTL_LANGUAGES: [&str; 6] = ["ar", "fa", "he", "ps", "ur", "yi"];

/// `rtl` for right-to-left scripts, `ltr` otherwise
pub fn text_direction(language: &str) -> &'static str {
    let base = language.split('-').next().unwrap_or(language);
    if RTL_LANGUAGES.contains(&base) {
        "rtl"
    } else {
        "ltr"
    }
}

pub fn apply(ctx: &FeatureContext) -> Result<Vec<Warning>> {
    let Some(localization) = &ctx.config.localization else {
        return Ok(Vec::new());
    };
    let mut warnings = Vec::new();
    let language = localization.default_language.as_str();
    let tokens = vec![
        (DEFAULT_LANGUAGE_TOKEN.to_string(), language.to_string()),
        (TEXT_DIRECTION_TOKEN.to_string(), text_direction(language).to_string()),
    ];
    let file = |name: &str| ctx.src(&format!("{}/{}", LOCALIZATION_DIR, name));

    let store = ctx.store_fragment(
        fragments::LOCALIZATION_STORE,
        fragments::LOCALIZATION_STORE_FALLBACK,
    );
    write_fragment(&file("types.ts"), fragments::LOCALIZATION_TYPES, &tokens)?;
    write_fragment(&file("store.ts"), store, &tokens)?;
    write_fragment(&file("LocalizationProvider.tsx"), fragments::LOCALIZATION_PROVIDER, &tokens)?;
    write_fragment(&file("index.ts"), fragments::LOCALIZATION_INDEX, &tokens)?;
    write_fragment(
        &file(&format!("languages/{}.ts", language)),
        fragments::LOCALIZATION_LANGUAGE,
        &tokens,
    )?;

    if localization.remote_config {
        write_fragment(&file("remoteConfig.ts"), fragments::LOCALIZATION_REMOTE_CONFIG, &tokens)?;
        if !ctx.config.has_remote_config() {
            warnings.push(Warning::new(
                SCOPE,
                "Remote translations need the Firebase Remote Config module; enable it or \
                 add @react-native-firebase/remote-config manually",
            ));
        }
    }

    ctx.add_dependency_groups(&["localization", "state"])?;

    let import = format!(
        "import {{{}}} from '{}';",
        PROVIDER,
        ctx.src_import(LOCALIZATION_DIR)
    );
    ctx.edit_root_component(|content| wrap_root(content, PROVIDER, &import))?;
    Ok(warnings)
}
