//! React Navigation stacks: app-only or app + auth behind a root navigator

use super::fragments::{self, remove_path, write_fragment};
use super::root_component::{add_import, replace_root};
use super::FeatureContext;
use crate::config::NavigationMode;
use crate::error::{Result, Warning};

const CONTAINER_TAG: &str = "<NavigationContainer";
const CONTAINER_IMPORT: &str = "import {NavigationContainer} from '@react-navigation/native';";

pub const NAVIGATION_DIR: &str = "navigation";
pub const AUTH_DIR: &str = "auth";

/// Root-level navigator rendered inside the navigation container
fn entry_navigator(mode: NavigationMode) -> &'static str {
    match mode {
        NavigationMode::WithAuth => "RootNavigator",
        _ => "AppNavigator",
    }
}

fn render_container(ctx: &FeatureContext, content: &str) -> String {
    let navigator = entry_navigator(ctx.config.navigation);
    let element = format!("  <{} />", navigator);
    let out = replace_root(
        content,
        &["<NavigationContainer>", element.as_str(), "</NavigationContainer>"],
        CONTAINER_TAG,
    );
    if out == content {
        return out;
    }
    let out = add_import(&out, CONTAINER_IMPORT);
    add_import(
        &out,
        &format!(
            "import {{{}}} from '{}';",
            navigator,
            ctx.src_import(NAVIGATION_DIR)
        ),
    )
}

pub fn apply(ctx: &FeatureContext) -> Result<Vec<Warning>> {
    let nav = |name: &str| ctx.src(&format!("{}/{}", NAVIGATION_DIR, name));
    let screen = |name: &str| ctx.src(&format!("screens/{}", name));
    let no_tokens = Vec::new();

    match ctx.config.navigation {
        NavigationMode::None => {
            remove_path(&ctx.src(NAVIGATION_DIR))?;
            remove_path(&ctx.src(AUTH_DIR))?;
            ctx.remove_dependency_groups(&["navigation"])?;
            return Ok(Vec::new());
        }
        NavigationMode::AppOnly => {
            write_fragment(&nav("types.ts"), fragments::NAVIGATION_TYPES_APP, &no_tokens)?;
            write_fragment(&nav("index.ts"), fragments::NAVIGATION_INDEX_APP, &no_tokens)?;
            remove_path(&nav("RootNavigator.tsx"))?;
            remove_path(&nav("AuthNavigator.tsx"))?;
            remove_path(&ctx.src(AUTH_DIR))?;
            remove_path(&screen("LoginScreen.tsx"))?;
        }
        NavigationMode::WithAuth => {
            write_fragment(&nav("types.ts"), fragments::NAVIGATION_TYPES_AUTH, &no_tokens)?;
            write_fragment(&nav("index.ts"), fragments::NAVIGATION_INDEX_AUTH, &no_tokens)?;
            write_fragment(&nav("RootNavigator.tsx"), fragments::ROOT_NAVIGATOR, &no_tokens)?;
            write_fragment(&nav("AuthNavigator.tsx"), fragments::AUTH_NAVIGATOR, &no_tokens)?;
            write_fragment(&screen("LoginScreen.tsx"), fragments::LOGIN_SCREEN, &no_tokens)?;

            let auth = |name: &str| ctx.src(&format!("{}/{}", AUTH_DIR, name));
            let store = ctx.store_fragment(fragments::AUTH_STORE, fragments::AUTH_STORE_FALLBACK);
            write_fragment(&auth("types.ts"), fragments::AUTH_TYPES, &no_tokens)?;
            write_fragment(&auth("store.ts"), store, &no_tokens)?;
            write_fragment(&auth("index.ts"), fragments::AUTH_INDEX, &no_tokens)?;
            ctx.add_dependency_groups(&["state"])?;
        }
    }

    write_fragment(&nav("AppNavigator.tsx"), fragments::APP_NAVIGATOR, &no_tokens)?;
    write_fragment(&screen("HomeScreen.tsx"), fragments::HOME_SCREEN, &no_tokens)?;
    ctx.add_dependency_groups(&["navigation"])?;

    let mut warnings = Vec::new();
    let changed = ctx.edit_root_component(|content| render_container(ctx, content))?;
    if !changed && !ctx.layout.root_component().is_file() {
        warnings.push(Warning::new(
            "navigation",
            "Root component not found; render the navigator inside NavigationContainer manually",
        ));
    }
    Ok(warnings)
}
