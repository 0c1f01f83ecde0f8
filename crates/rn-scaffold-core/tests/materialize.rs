//! End-to-end materialization against the bundled sample template

use rn_scaffold_core::config::{
    FirebaseConfigSource, FirebaseModule, FirebaseOptions, LocalizationOptions, MapsOptions,
    MapsProvider, NavigationMode, ProjectConfig,
};
use rn_scaffold_core::features::compose;
use rn_scaffold_core::features::maps::{API_KEY_PLACEHOLDER, DISABLED_MANIFEST_COMMENT};
use rn_scaffold_core::materialize::layout::ProjectLayout;
use rn_scaffold_core::templates::TemplateManifest;
use rn_scaffold_core::{materialize, MaterializeReport, MaterializeRequest, Overwrite, ScaffoldError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn template_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates/default")
}

fn base_config() -> ProjectConfig {
    ProjectConfig::new("MyApp", "com.acme.myapp", "My App")
}

fn run(config: ProjectConfig) -> (TempDir, PathBuf, MaterializeReport) {
    let out = TempDir::new().unwrap();
    let destination = out.path().join(&config.project_name);
    let report = materialize(&MaterializeRequest {
        template_root: template_root(),
        destination: destination.clone(),
        config,
        overwrite: Overwrite::Fail,
    })
    .unwrap();
    (out, destination, report)
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
}

fn package_json(root: &Path) -> serde_json::Value {
    serde_json::from_str(&read(root, "package.json")).unwrap()
}

fn has_dependency(package: &serde_json::Value, name: &str) -> bool {
    package["dependencies"].get(name).is_some() || package["devDependencies"].get(name).is_some()
}

#[test]
fn test_scenario_minimal_project() {
    let (_out, dest, report) = run(base_config());
    let package = package_json(&dest);

    let names: Vec<&String> = package["dependencies"].as_object().unwrap().keys().collect();
    assert!(!names.iter().any(|n| n.starts_with("@react-native-firebase/")));
    assert!(!has_dependency(&package, "react-native-maps"));
    assert!(!has_dependency(&package, "react-native-maps-directions"));
    assert!(!has_dependency(&package, "@react-navigation/native"));
    assert!(!has_dependency(&package, "react-native-mmkv"));
    assert!(has_dependency(&package, "react-native"));

    assert!(!dest.join("src/navigation").exists());
    assert!(!dest.join("src/auth").exists());
    assert!(!dest.join("src/storage/storage.ts").exists());

    let manifest = read(&dest, "android/app/src/main/AndroidManifest.xml");
    assert!(manifest.contains("package=\"com.acme.myapp\""));
    assert!(manifest.contains(DISABLED_MANIFEST_COMMENT));
    assert!(!manifest.contains("com.google.android.geo.API_KEY\" android:value"));

    assert_eq!(package["name"], "MyApp");
    assert!(report.files_copied > 20);
}

#[test]
fn test_identity_and_renames() {
    let (_out, dest, _) = run(base_config());

    assert!(dest.join("ios/MyApp/AppDelegate.swift").is_file());
    assert!(dest.join("ios/MyApp.xcodeproj/project.pbxproj").is_file());
    assert!(dest
        .join("ios/MyApp.xcodeproj/xcshareddata/xcschemes/MyApp.xcscheme")
        .is_file());
    assert!(dest.join("ios/MyAppTests/MyAppTests.m").is_file());
    assert!(!dest.join("ios/HelloWorld").exists());
    assert!(!dest.join("template.yaml").exists());

    let activity = read(&dest, "android/app/src/main/java/com/acme/myapp/MainActivity.kt");
    assert!(activity.starts_with("package com.acme.myapp\n"));
    assert!(activity.contains("\"MyApp\""));
    assert!(!dest.join("android/app/src/main/java/com/helloworld").exists());

    let gradle = read(&dest, "android/app/build.gradle");
    assert!(gradle.contains("applicationId \"com.acme.myapp\""));
    assert!(gradle.contains("namespace \"com.acme.myapp\""));

    let pbxproj = read(&dest, "ios/MyApp.xcodeproj/project.pbxproj");
    assert!(pbxproj.contains("PRODUCT_BUNDLE_IDENTIFIER = com.acme.myapp;"));
    assert!(!pbxproj.contains("org.reactjs.native.example"));

    let app_json: serde_json::Value = serde_json::from_str(&read(&dest, "app.json")).unwrap();
    assert_eq!(app_json["displayName"], "My App");
    assert_eq!(app_json["name"], "MyApp");

    let plist = read(&dest, "ios/MyApp/Info.plist");
    assert!(plist.contains("<key>CFBundleDisplayName</key>\n\t<string>My App</string>"));
    assert!(read(&dest, "android/app/src/main/res/values/strings.xml")
        .contains("<string name=\"app_name\">My App</string>"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(dest.join("android/gradlew")).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }
}

#[test]
fn test_display_name_containing_placeholder() {
    let mut config = base_config();
    config.display_name = "HelloWorld Deluxe".to_string();
    let (_out, dest, _) = run(config);

    let app_json: serde_json::Value = serde_json::from_str(&read(&dest, "app.json")).unwrap();
    assert_eq!(app_json["displayName"], "HelloWorld Deluxe");
    assert!(read(&dest, "android/app/src/main/res/values/strings.xml")
        .contains(">HelloWorld Deluxe<"));
    assert!(read(&dest, "ios/MyApp/Info.plist").contains("<string>HelloWorld Deluxe</string>"));
}

#[test]
fn test_display_name_with_markup_characters() {
    let name = r#"Say "Hi" <3 & Co"#;
    let mut config = base_config();
    config.display_name = name.to_string();
    let (_out, dest, report) = run(config);
    assert!(
        !report.warnings.iter().any(|w| w.scope == "placeholders"),
        "{:?}",
        report.warnings
    );

    let app_json: serde_json::Value =
        serde_json::from_str(&read(&dest, "app.json")).expect("app.json stays valid JSON");
    assert_eq!(app_json["displayName"], name);

    let plist = read(&dest, "ios/MyApp/Info.plist");
    assert_eq!(plist.matches("<key>CFBundleDisplayName</key>").count(), 1);
    assert_eq!(plist.matches("<key>CFBundleName</key>").count(), 1);
    assert_eq!(
        plist.matches("<string>Say &quot;Hi&quot; &lt;3 &amp; Co</string>").count(),
        2
    );
    assert!(!plist.contains("<3 &"));

    let strings = read(&dest, "android/app/src/main/res/values/strings.xml");
    assert_eq!(strings.matches("name=\"app_name\"").count(), 1);
    assert!(strings.contains(r#"<string name="app_name">Say \"Hi\" &lt;3 &amp; Co</string>"#));
}

#[test]
fn test_scenario_localization_with_persistence() {
    let mut config = base_config();
    config.localization = Some(LocalizationOptions {
        default_language: "ar".to_string(),
        remote_config: false,
    });
    config.storage.persisted = true;
    let (_out, dest, _) = run(config);

    let store = read(&dest, "src/localization/store.ts");
    assert!(store.contains("DEFAULT_LANGUAGE = 'ar'"));
    assert!(store.contains("persist("));
    assert!(dest.join("src/localization/languages/ar.ts").is_file());
    assert!(dest.join("src/storage/storage.ts").is_file());
    assert!(read(&dest, "src/localization/LocalizationProvider.tsx").contains("./languages/ar'"));
    assert!(read(&dest, "src/storage/storage.ts").contains("myapp-storage"));

    let app = read(&dest, "App.tsx");
    assert!(app.contains("<LocalizationProvider>"));
    assert!(app.contains("from './src/localization';"));

    let package = package_json(&dest);
    assert!(has_dependency(&package, "react-native-localize"));
    assert!(has_dependency(&package, "react-native-mmkv"));
    assert!(has_dependency(&package, "zustand"));
}

#[test]
fn test_scenario_theme_without_persistence() {
    let mut config = base_config();
    config.theme = true;
    config.storage.declined_persistence = true;
    let (_out, dest, _) = run(config);

    assert!(dest.join("src/theme/ThemeProvider.tsx").is_file());
    assert!(!dest.join("src/storage/storage.ts").exists());
    let store = read(&dest, "src/theme/store.ts");
    assert!(!store.contains("persist"));
    assert!(!store.contains("storage"));

    let app = read(&dest, "App.tsx");
    assert!(app.contains("<ThemeProvider>"));
    assert!(app.contains("</ThemeProvider>"));
    assert!(app.contains("from './src/theme';"));
    assert!(!has_dependency(&package_json(&dest), "react-native-mmkv"));
}

#[test]
fn test_navigation_with_auth() {
    let mut config = base_config();
    config.navigation = NavigationMode::WithAuth;
    let (_out, dest, _) = run(config);

    assert!(dest.join("src/navigation/RootNavigator.tsx").is_file());
    assert!(dest.join("src/navigation/AuthNavigator.tsx").is_file());
    assert!(dest.join("src/screens/LoginScreen.tsx").is_file());
    // Auth state persists unless the follow-up was declined
    assert!(read(&dest, "src/auth/store.ts").contains("persist("));
    assert!(dest.join("src/storage/storage.ts").is_file());

    let app = read(&dest, "App.tsx");
    assert!(app.contains("<NavigationContainer>"));
    assert!(app.contains("<RootNavigator />"));
    assert!(app.contains("import {RootNavigator} from './src/navigation';"));
    assert!(has_dependency(&package_json(&dest), "@react-navigation/native-stack"));
}

#[test]
fn test_navigation_app_only() {
    let mut config = base_config();
    config.navigation = NavigationMode::AppOnly;
    let (_out, dest, _) = run(config);

    assert!(dest.join("src/navigation/AppNavigator.tsx").is_file());
    assert!(!dest.join("src/navigation/RootNavigator.tsx").exists());
    assert!(!dest.join("src/auth").exists());
    assert!(!dest.join("src/screens/LoginScreen.tsx").exists());
    assert!(!dest.join("src/storage/storage.ts").exists());
    assert!(read(&dest, "App.tsx").contains("<AppNavigator />"));

    let types = read(&dest, "src/navigation/types.ts");
    assert!(types.contains("export enum AppRoutes"));
    assert!(!types.contains("RootRoutes"));
    assert!(!types.contains("AuthRoutes"));
}

#[test]
fn test_maps_with_key() {
    let mut config = base_config();
    config.maps = Some(MapsOptions {
        provider: MapsProvider::Google,
        api_key: Some("AIza-test".to_string()),
    });
    let (_out, dest, report) = run(config);

    let manifest = read(&dest, "android/app/src/main/AndroidManifest.xml");
    assert!(manifest.contains(
        "<meta-data android:name=\"com.google.android.geo.API_KEY\" android:value=\"AIza-test\"/>"
    ));
    assert!(!manifest.contains(API_KEY_PLACEHOLDER));

    let delegate = read(&dest, "ios/MyApp/AppDelegate.swift");
    assert!(delegate.contains("GMSServices.provideAPIKey(\"AIza-test\")"));
    assert!(read(&dest, "ios/Podfile").contains("react-native-google-maps"));
    assert!(has_dependency(&package_json(&dest), "react-native-maps"));
    assert!(!report.warnings.iter().any(|w| w.scope == "maps"));
}

#[test]
fn test_maps_google_without_key_keeps_placeholder() {
    let mut config = base_config();
    config.maps = Some(MapsOptions {
        provider: MapsProvider::Google,
        api_key: None,
    });
    let (_out, dest, report) = run(config);

    let delegate = read(&dest, "ios/MyApp/AppDelegate.swift");
    assert!(delegate.contains("import GoogleMaps"));
    assert_eq!(
        delegate
            .matches(&format!("GMSServices.provideAPIKey(\"{}\")", API_KEY_PLACEHOLDER))
            .count(),
        1
    );
    assert!(read(&dest, "ios/Podfile").contains("react-native-google-maps"));

    let manifest = read(&dest, "android/app/src/main/AndroidManifest.xml");
    assert!(manifest.contains(&format!(
        "<!-- <meta-data android:name=\"com.google.android.geo.API_KEY\" android:value=\"{}\"/> -->",
        API_KEY_PLACEHOLDER
    )));
    assert!(has_dependency(&package_json(&dest), "react-native-maps"));
    assert!(report.warnings.iter().any(|w| w.scope == "maps"));
}

#[test]
fn test_maps_apple_without_key() {
    let mut config = base_config();
    config.maps = Some(MapsOptions {
        provider: MapsProvider::Apple,
        api_key: None,
    });
    let (_out, dest, report) = run(config);

    let delegate = read(&dest, "ios/MyApp/AppDelegate.swift");
    assert!(!delegate.contains("GoogleMaps"));
    assert!(!delegate.contains("GMSServices"));
    assert!(!read(&dest, "ios/Podfile").contains("react-native-google-maps"));

    let manifest = read(&dest, "android/app/src/main/AndroidManifest.xml");
    assert!(manifest.contains(&format!(
        "<!-- <meta-data android:name=\"com.google.android.geo.API_KEY\" android:value=\"{}\"/> -->",
        API_KEY_PLACEHOLDER
    )));
    assert!(report.warnings.iter().any(|w| w.scope == "maps"));
}

#[test]
fn test_maps_disabled_strips_native_wiring() {
    let (_out, dest, _) = run(base_config());
    let delegate = read(&dest, "ios/MyApp/AppDelegate.swift");
    assert!(!delegate.contains("GoogleMaps"));
    assert!(delegate.contains("self.moduleName = \"MyApp\""));
    assert!(!read(&dest, "ios/Podfile").contains("rn_maps_path"));
}

#[test]
fn test_environments() {
    let mut config = base_config();
    config.environments = vec!["staging".to_string(), "production".to_string()];
    let (_out, dest, report) = run(config);

    assert!(read(&dest, ".env.staging").contains("APP_DISPLAY_NAME=My App (staging)"));
    assert!(dest.join(".env.production").is_file());
    assert!(read(&dest, "android/app/build.gradle").contains("productFlavors {"));

    let package = package_json(&dest);
    assert!(package["scripts"]["android:staging"]
        .as_str()
        .unwrap()
        .contains("ENVFILE=.env.staging"));
    assert!(has_dependency(&package, "react-native-config"));
    assert!(!report.warnings.iter().any(|w| w.scope == "environments"));
}

#[test]
fn test_firebase_single_project() {
    let firebase_dir = TempDir::new().unwrap();
    fs::write(firebase_dir.path().join("google-services.json"), "{\"project_info\":{}}").unwrap();
    fs::write(firebase_dir.path().join("GoogleService-Info.plist"), "<plist/>").unwrap();

    let mut config = base_config();
    config.firebase = Some(FirebaseOptions {
        modules: vec![FirebaseModule::Analytics, FirebaseModule::Crashlytics],
        environments: Vec::new(),
        config_source: FirebaseConfigSource::Single(firebase_dir.path().to_path_buf()),
    });
    let (_out, dest, _) = run(config);

    assert!(dest.join("android/app/google-services.json").is_file());
    assert!(dest.join("ios/MyApp/GoogleService-Info.plist").is_file());

    let package = package_json(&dest);
    assert!(has_dependency(&package, "@react-native-firebase/app"));
    assert!(has_dependency(&package, "@react-native-firebase/analytics"));
    assert!(has_dependency(&package, "@react-native-firebase/crashlytics"));
    assert!(!has_dependency(&package, "@react-native-firebase/auth"));

    assert!(read(&dest, "android/build.gradle")
        .contains("classpath(\"com.google.gms:google-services:4.4.2\")"));
    assert!(read(&dest, "android/app/build.gradle")
        .contains("apply plugin: \"com.google.gms.google-services\""));
    assert!(read(&dest, "ios/MyApp/AppDelegate.swift").contains("FirebaseApp.configure()"));
    assert!(read(&dest, "ios/MyApp.xcodeproj/project.pbxproj")
        .contains("path = \"MyApp/GoogleService-Info.plist\""));
}

#[test]
fn test_invalid_firebase_source_touches_nothing() {
    let empty = TempDir::new().unwrap();
    let mut config = base_config();
    config.firebase = Some(FirebaseOptions {
        modules: vec![FirebaseModule::Analytics],
        environments: Vec::new(),
        config_source: FirebaseConfigSource::Single(empty.path().to_path_buf()),
    });

    let out = TempDir::new().unwrap();
    let destination = out.path().join("MyApp");
    let result = materialize(&MaterializeRequest {
        template_root: template_root(),
        destination: destination.clone(),
        config,
        overwrite: Overwrite::Fail,
    });
    assert!(matches!(result, Err(ScaffoldError::Validation(_))));
    assert!(!destination.exists());
}

#[test]
fn test_default_splash_placeholders() {
    let (_out, dest, report) = run(base_config());

    let imageset = dest.join("ios/MyApp/Images.xcassets/SplashScreen.imageset");
    for file in ["SplashScreen.png", "SplashScreen@2x.png", "SplashScreen@3x.png", "Contents.json"] {
        assert!(imageset.join(file).is_file(), "missing {}", file);
    }
    for bucket in ["drawable", "drawable-mdpi", "drawable-xxxhdpi"] {
        assert!(dest
            .join("android/app/src/main/res")
            .join(bucket)
            .join("splash.png")
            .is_file());
    }
    assert!(!report.warnings.iter().any(|w| w.scope == "splash"));
}

#[test]
fn test_fonts_registered() {
    let fonts = TempDir::new().unwrap();
    fs::write(fonts.path().join("Inter-Regular.ttf"), b"font-bytes").unwrap();
    fs::write(fonts.path().join("notes.txt"), b"skip").unwrap();

    let mut config = base_config();
    config.assets.fonts = Some(fonts.path().to_path_buf());
    let (_out, dest, _) = run(config);

    assert!(dest.join("assets/fonts/Inter-Regular.ttf").is_file());
    assert!(!dest.join("assets/fonts/notes.txt").exists());
    assert!(dest
        .join("android/app/src/main/assets/fonts/Inter-Regular.ttf")
        .is_file());
    assert!(read(&dest, "android/link-assets-manifest.json").contains("assets/fonts/Inter-Regular.ttf"));
    assert!(dest.join("ios/link-assets-manifest.json").is_file());

    let plist = read(&dest, "ios/MyApp/Info.plist");
    assert!(plist.contains("<key>UIAppFonts</key>"));
    assert!(plist.contains("<string>Inter-Regular.ttf</string>"));
    assert!(read(&dest, "ios/MyApp.xcodeproj/project.pbxproj")
        .contains("path = \"../assets/fonts/Inter-Regular.ttf\""));
}

#[test]
fn test_composition_is_idempotent() {
    let mut config = base_config();
    config.navigation = NavigationMode::WithAuth;
    config.theme = true;
    config.localization = Some(LocalizationOptions {
        default_language: "en".to_string(),
        remote_config: false,
    });
    config.maps = Some(MapsOptions {
        provider: MapsProvider::Google,
        api_key: Some("AIza-test".to_string()),
    });
    config.environments = vec!["production".to_string()];
    let (_out, dest, _) = run(config.clone());

    let watched = [
        "App.tsx",
        "package.json",
        "android/app/build.gradle",
        "android/app/src/main/AndroidManifest.xml",
        "ios/MyApp/AppDelegate.swift",
    ];
    let before: Vec<String> = watched.iter().map(|f| read(&dest, f)).collect();

    let manifest = TemplateManifest::load(&template_root()).unwrap();
    let layout = ProjectLayout::new(&dest, &manifest, &config.project_name);
    compose(layout, &manifest, &config);

    let after: Vec<String> = watched.iter().map(|f| read(&dest, f)).collect();
    assert_eq!(before, after);
    assert_eq!(read(&dest, "App.tsx").matches("<ThemeProvider>").count(), 1);
}

#[test]
fn test_existing_destination_requires_overwrite() {
    let (_out, dest, _) = run(base_config());
    let request = MaterializeRequest {
        template_root: template_root(),
        destination: dest.clone(),
        config: base_config(),
        overwrite: Overwrite::Fail,
    };
    assert!(matches!(
        materialize(&request),
        Err(ScaffoldError::DestinationExists(_))
    ));

    fs::write(dest.join("stale.txt"), "old").unwrap();
    let request = MaterializeRequest {
        overwrite: Overwrite::Replace,
        ..request
    };
    materialize(&request).unwrap();
    assert!(!dest.join("stale.txt").exists());
    assert!(dest.join("App.tsx").is_file());
}
