//! Firebase wiring: dependencies, Google config files, Gradle, Podfile and AppDelegate

use super::native::{
    add_gradle_classpath, add_native_import, apply_gradle_plugin, insert_after_line,
    insert_launch_statement, AppDelegateKind,
};
use super::FeatureContext;
use crate::assets::{copy_asset, pbxproj};
use crate::config::validate::{
    validate_firebase, GOOGLE_SERVICES_JSON, GOOGLE_SERVICE_INFO_PLIST, PRODUCTION_ENV,
};
use crate::config::{FirebaseConfigSource, FirebaseModule, FirebaseOptions};
use crate::error::{soften, Result, ScaffoldError, Warning};
use crate::materialize::layout::ProjectLayout;
use crate::materialize::placeholders::edit_file;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const SCOPE: &str = "firebase";

pub const PACKAGE_PREFIX: &str = "@react-native-firebase/";
pub const APP_PACKAGE: &str = "@react-native-firebase/app";

const GOOGLE_SERVICES_CLASSPATH: &str = "com.google.gms:google-services:4.4.2";
const GOOGLE_SERVICES_PLUGIN: &str = "com.google.gms.google-services";
const CRASHLYTICS_CLASSPATH: &str = "com.google.firebase:firebase-crashlytics-gradle:3.0.2";
const CRASHLYTICS_PLUGIN: &str = "com.google.firebase.crashlytics";

const PODFILE_PLATFORM: &str = "platform :ios";
const PODFILE_STATIC_FRAMEWORKS: [&str; 2] = [
    "use_frameworks! :linkage => :static",
    "$RNFirebaseAsStaticFramework = true",
];

/// One copy of a Google service file into the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCopy {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Environment whose config also lands in the default platform locations
pub fn default_environment(environments: &[String]) -> Option<&str> {
    environments
        .iter()
        .find(|e| e.as_str() == PRODUCTION_ENV)
        .or_else(|| environments.first())
        .map(String::as_str)
}

/// Every config file copy for the chosen source layout
pub fn plan_config_copies(layout: &ProjectLayout, firebase: &FirebaseOptions) -> Vec<ConfigCopy> {
    let android_app = layout.android_app_dir();
    let ios_app = layout.ios_app_dir();
    let mut copies = Vec::new();
    let mut push_pair = |dir: &Path, android: PathBuf, ios: PathBuf| {
        copies.push(ConfigCopy {
            source: dir.join(GOOGLE_SERVICES_JSON),
            target: android.join(GOOGLE_SERVICES_JSON),
        });
        copies.push(ConfigCopy {
            source: dir.join(GOOGLE_SERVICE_INFO_PLIST),
            target: ios.join(GOOGLE_SERVICE_INFO_PLIST),
        });
    };

    match &firebase.config_source {
        FirebaseConfigSource::Single(dir) => {
            push_pair(dir, android_app.clone(), ios_app.clone());
        }
        FirebaseConfigSource::PerEnvironment(base) => {
            for env in &firebase.environments {
                push_pair(
                    &base.join(env),
                    android_app.join("src").join(env),
                    ios_app.join("Firebase").join(env),
                );
            }
            if let Some(env) = default_environment(&firebase.environments) {
                push_pair(&base.join(env), android_app.clone(), ios_app.clone());
            }
        }
    }
    copies
}

/// Dependencies for the app package plus every selected module
pub fn module_dependencies(
    firebase: &FirebaseOptions,
    versions: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut packages = vec![APP_PACKAGE.to_string()];
    packages.extend(firebase.modules.iter().map(FirebaseModule::package_name));
    packages
        .into_iter()
        .filter_map(|name| versions.get(&name).map(|v| (name, v.clone())))
        .collect()
}

pub fn apply(ctx: &FeatureContext) -> Result<Vec<Warning>> {
    let Some(firebase) = &ctx.config.firebase else {
        ctx.update_package_json(|package| {
            package.remove_dependencies(|name| name.starts_with(PACKAGE_PREFIX));
        })?;
        return Ok(Vec::new());
    };

    // Every source must be complete before anything is copied
    validate_firebase(firebase).map_err(ScaffoldError::Validation)?;

    let mut warnings = Vec::new();
    let layout = &ctx.layout;

    for copy in plan_config_copies(layout, firebase) {
        soften(copy_asset(&copy.source, &copy.target), SCOPE, &mut warnings);
    }

    let versions = ctx.manifest.dependency_group("firebase");
    let deps = module_dependencies(firebase, &versions);
    let selected: Vec<String> = deps.keys().cloned().collect();
    ctx.update_package_json(|package| {
        package.remove_dependencies(|name| {
            name.starts_with(PACKAGE_PREFIX) && !selected.iter().any(|s| s == name)
        });
        package.add_dependencies(&deps);
    })?;

    let crashlytics = firebase.has_module(FirebaseModule::Crashlytics);
    soften(
        edit_file(&layout.android_build_gradle(), |content| {
            let mut out = add_gradle_classpath(content, GOOGLE_SERVICES_CLASSPATH);
            if crashlytics {
                out = add_gradle_classpath(&out, CRASHLYTICS_CLASSPATH);
            }
            Ok(out)
        }),
        SCOPE,
        &mut warnings,
    );
    soften(
        edit_file(&layout.app_build_gradle(), |content| {
            let mut out = apply_gradle_plugin(content, GOOGLE_SERVICES_PLUGIN);
            if crashlytics {
                out = apply_gradle_plugin(&out, CRASHLYTICS_PLUGIN);
            }
            Ok(out)
        }),
        SCOPE,
        &mut warnings,
    );

    soften(
        edit_file(&layout.podfile(), |content| {
            Ok(insert_after_line(
                content,
                PODFILE_PLATFORM,
                &PODFILE_STATIC_FRAMEWORKS,
            ))
        }),
        SCOPE,
        &mut warnings,
    );

    match layout.app_delegate() {
        Some(delegate) => {
            let kind = AppDelegateKind::from_path(&delegate);
            let (import, statement) = match kind {
                AppDelegateKind::Swift => ("import Firebase", "FirebaseApp.configure()"),
                AppDelegateKind::ObjC => ("#import <Firebase.h>", "[FIRApp configure];"),
            };
            soften(
                edit_file(&delegate, |content| {
                    let out = add_native_import(content, kind, import);
                    Ok(insert_launch_statement(&out, statement))
                }),
                SCOPE,
                &mut warnings,
            );
        }
        None => warnings.push(Warning::new(
            SCOPE,
            "No AppDelegate found; call FirebaseApp.configure() at launch manually",
        )),
    }

    let plist_path = format!("{}/{}", layout.project_name(), GOOGLE_SERVICE_INFO_PLIST);
    soften(
        edit_file(&layout.pbxproj(), |content| {
            Ok(pbxproj::add_resource(content, GOOGLE_SERVICE_INFO_PLIST, &plist_path))
        }),
        SCOPE,
        &mut warnings,
    );

    if !ctx.config.environments.is_empty() {
        for env in &firebase.environments {
            if !ctx.config.environments.contains(env) {
                warnings.push(Warning::new(
                    SCOPE,
                    format!(
                        "Firebase environment '{}' has no matching build environment",
                        env
                    ),
                ));
            }
        }
    }

    Ok(warnings)
}
