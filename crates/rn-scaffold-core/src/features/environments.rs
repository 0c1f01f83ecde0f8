//! Build environments: `.env.<name>` files, Android flavors and run scripts

use super::FeatureContext;
use crate::config::validate::PRODUCTION_ENV;
use crate::config::ProjectConfig;
use crate::error::{soften, IoContext, Result, Warning};
use crate::materialize::placeholders::edit_file;
use std::fs;

const SCOPE: &str = "environments";
const FLAVOR_DIMENSION: &str = "environment";

/// Contents of `.env.<env>`
pub fn env_file_contents(config: &ProjectConfig, env: &str) -> String {
    let display_name = if env == PRODUCTION_ENV {
        config.display_name.clone()
    } else {
        format!("{} ({})", config.display_name, env)
    };
    format!(
        "APP_ENV={}\nAPP_DISPLAY_NAME={}\nAPI_URL=\n",
        env, display_name
    )
}

/// `productFlavors` block for `android/app/build.gradle`
pub fn flavors_block(environments: &[String]) -> String {
    let mut out = format!(
        "    flavorDimensions \"{}\"\n    productFlavors {{\n",
        FLAVOR_DIMENSION
    );
    for env in environments {
        out.push_str(&format!("        {} {{\n", env));
        out.push_str(&format!("            dimension \"{}\"\n", FLAVOR_DIMENSION));
        if env != PRODUCTION_ENV {
            out.push_str(&format!("            applicationIdSuffix \".{}\"\n", env));
            out.push_str(&format!("            versionNameSuffix \"-{}\"\n", env));
        }
        out.push_str("        }\n");
    }
    out.push_str("    }\n");
    out
}

/// Insert product flavors as the first entries of the `android { }` block
pub(crate) fn insert_flavors(content: &str, environments: &[String]) -> String {
    if content.contains("productFlavors") {
        return content.to_string();
    }
    let Some(android) = content
        .match_indices("android {")
        .find(|(i, _)| *i == 0 || content[..*i].ends_with('\n'))
        .map(|(i, _)| i)
    else {
        return content.to_string();
    };
    let insert_at = content[android..]
        .find('\n')
        .map_or(content.len(), |i| android + i + 1);
    format!(
        "{}{}{}",
        &content[..insert_at],
        flavors_block(environments),
        &content[insert_at..]
    )
}

pub fn apply(ctx: &FeatureContext) -> Result<Vec<Warning>> {
    let environments = &ctx.config.environments;
    let mut warnings = Vec::new();
    if environments.is_empty() {
        return Ok(warnings);
    }

    for env in environments {
        let path = ctx.layout.join(format!(".env.{}", env));
        if !path.exists() {
            soften(
                fs::write(&path, env_file_contents(ctx.config, env)).io_context("write", &path),
                SCOPE,
                &mut warnings,
            );
        }
    }

    soften(
        edit_file(&ctx.layout.app_build_gradle(), |content| {
            Ok(insert_flavors(content, environments))
        }),
        SCOPE,
        &mut warnings,
    );

    ctx.add_dependency_groups(&["environments"])?;
    ctx.update_package_json(|package| {
        for env in environments {
            let mut flavor = env.clone();
            if let Some(first) = flavor.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            package.set_script(
                &format!("android:{}", env),
                &format!(
                    "ENVFILE=.env.{} react-native run-android --mode={}Debug",
                    env, env
                ),
            );
            package.set_script(
                &format!("ios:{}", env),
                &format!("ENVFILE=.env.{} react-native run-ios", env),
            );
            package.set_script(
                &format!("build:android:{}", env),
                &format!(
                    "cd android && ENVFILE=.env.{} ./gradlew assemble{}Release",
                    env, flavor
                ),
            );
        }
    })?;

    if !environments.iter().any(|e| e == PRODUCTION_ENV) {
        warnings.push(Warning::new(
            SCOPE,
            "No 'production' environment configured; release builds use the first flavor",
        ));
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_env_file_names_environment() {
        let config = ProjectConfig::new("MyApp", "com.acme.myapp", "My App");
        assert!(env_file_contents(&config, "staging").contains("APP_DISPLAY_NAME=My App (staging)\n"));
        assert!(env_file_contents(&config, "production").contains("APP_DISPLAY_NAME=My App\n"));
    }

    #[test]
    fn test_flavors_inserted_once() {
        let gradle = "apply plugin: \"com.android.application\"\n\nandroid {\n    namespace \"com.acme.myapp\"\n}\n";
        let out = insert_flavors(gradle, &envs(&["staging", "production"]));
        assert!(out.contains("android {\n    flavorDimensions \"environment\"\n    productFlavors {\n        staging {"));
        assert!(out.contains("applicationIdSuffix \".staging\""));
        assert_eq!(out.matches("applicationIdSuffix").count(), 1);
        assert!(out.contains("    }\n    namespace \"com.acme.myapp\""));
        assert_eq!(insert_flavors(&out, &envs(&["staging", "production"])), out);
    }

    #[test]
    fn test_nested_android_block_ignored() {
        let gradle = "react {\n    android {\n    }\n}\n";
        assert_eq!(insert_flavors(gradle, &envs(&["dev"])), gradle);
    }
}
