//! Light/dark theme module wrapped around the root component

use super::fragments::{self, write_fragment};
use super::root_component::wrap_root;
use super::FeatureContext;
use crate::error::{Result, Warning};

const PROVIDER: &str = "ThemeProvider";
pub const THEME_DIR: &str = "theme";

pub fn apply(ctx: &FeatureContext) -> Result<Vec<Warning>> {
    if !ctx.config.theme {
        return Ok(Vec::new());
    }
    let file = |name: &str| ctx.src(&format!("{}/{}", THEME_DIR, name));
    let no_tokens = Vec::new();

    let store = ctx.store_fragment(fragments::THEME_STORE, fragments::THEME_STORE_FALLBACK);
    write_fragment(&file("types.ts"), fragments::THEME_TYPES, &no_tokens)?;
    write_fragment(&file("themes.ts"), fragments::THEME_THEMES, &no_tokens)?;
    write_fragment(&file("store.ts"), store, &no_tokens)?;
    write_fragment(&file("ThemeProvider.tsx"), fragments::THEME_PROVIDER, &no_tokens)?;
    write_fragment(&file("index.ts"), fragments::THEME_INDEX, &no_tokens)?;

    ctx.add_dependency_groups(&["state"])?;

    let import = format!("import {{{}}} from '{}';", PROVIDER, ctx.src_import(THEME_DIR));
    ctx.edit_root_component(|content| wrap_root(content, PROVIDER, &import))?;
    Ok(Vec::new())
}
