//! Maps: dependency set, Google Maps SDK wiring and the Android API key entry

use super::native::{add_native_import, insert_launch_statement, remove_lines, AppDelegateKind};
use super::FeatureContext;
use crate::config::{MapsOptions, MapsProvider};
use crate::error::{soften, Result, Warning};
use crate::materialize::placeholders::{edit_file, xml_escape};
use regex::Regex;
use std::sync::LazyLock;

const SCOPE: &str = "maps";

/// Token left in native code and the manifest until a key is supplied
pub const API_KEY_PLACEHOLDER: &str = "<GOOGLE_MAPS_API_KEY>";

/// Comment left where the API key element lives when maps are disabled
pub const DISABLED_MANIFEST_COMMENT: &str =
    "<!-- Google Maps API key (com.google.android.geo.API_KEY) meta-data goes here when maps are enabled -->";

static MANIFEST_API_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)(?:<!--\s*)?<meta-data\s+android:name="com\.google\.android\.geo\.API_KEY"(?:"[^"]*"|[^>"])*?/>(?:\s*-->)?"#,
    )
    .expect("valid regex")
});
static PODFILE_GOOGLE_MAPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"pod\s+['"](?:GoogleMaps|Google-Maps-iOS-Utils|react-native-google-maps)['"]|^\s*rn_maps_path\s*=|^\s*#\s*Google Maps"#,
    )
    .expect("valid regex")
});
static NATIVE_GOOGLE_MAPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*import\s+GoogleMaps\b|^\s*#import\s+<GoogleMaps/|GMSServices\s*\.?\s*provideAPIKey")
        .expect("valid regex")
});

/// Manifest element for the given key, commented out when there is none
pub fn manifest_api_key_element(api_key: Option<&str>) -> String {
    match api_key {
        Some(key) => format!(
            "<meta-data android:name=\"com.google.android.geo.API_KEY\" android:value=\"{}\"/>",
            xml_escape(key)
        ),
        None => format!(
            "<!-- <meta-data android:name=\"com.google.android.geo.API_KEY\" android:value=\"{}\"/> -->",
            API_KEY_PLACEHOLDER
        ),
    }
}

/// Replace the manifest's API key entry (commented or not) with `element`.
///
/// Manifests without an entry get one as the last child of `<application>`.
pub(crate) fn set_manifest_api_key(content: &str, element: &str) -> String {
    if let Some(found) = MANIFEST_API_KEY.find(content) {
        return format!("{}{}{}", &content[..found.start()], element, &content[found.end()..]);
    }
    if let Some(at) = content.find(DISABLED_MANIFEST_COMMENT) {
        return format!(
            "{}{}{}",
            &content[..at],
            element,
            &content[at + DISABLED_MANIFEST_COMMENT.len()..]
        );
    }
    let Some(close) = content.find("</application>") else {
        return content.to_string();
    };
    let line_start = content[..close].rfind('\n').map_or(0, |i| i + 1);
    let indent = &content[line_start..close];
    let child_indent = if indent.trim().is_empty() {
        format!("{}    ", indent)
    } else {
        "        ".to_string()
    };
    format!(
        "{}{}{}\n{}",
        &content[..line_start],
        child_indent,
        element,
        &content[line_start..]
    )
}

/// Escape a key for a Swift or Objective-C string literal
fn string_literal_escape(key: &str) -> String {
    key.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Native init line for the Google Maps SDK
fn provide_api_key(kind: AppDelegateKind, key: &str) -> (&'static str, String) {
    let key = string_literal_escape(key);
    match kind {
        AppDelegateKind::Swift => (
            "import GoogleMaps",
            format!("GMSServices.provideAPIKey(\"{}\")", key),
        ),
        AppDelegateKind::ObjC => (
            "#import <GoogleMaps/GoogleMaps.h>",
            format!("[GMSServices provideAPIKey:@\"{}\"];", key),
        ),
    }
}

/// Put the key (or the placeholder) into the AppDelegate's Google Maps init
pub(crate) fn wire_native_key(content: &str, kind: AppDelegateKind, api_key: Option<&str>) -> String {
    let key = api_key.unwrap_or(API_KEY_PLACEHOLDER);
    if content.contains("provideAPIKey") {
        return match api_key {
            Some(key) => content.replacen(API_KEY_PLACEHOLDER, &string_literal_escape(key), 1),
            None => content.to_string(),
        };
    }
    let (import, statement) = provide_api_key(kind, key);
    let out = add_native_import(content, kind, import);
    insert_launch_statement(&out, &statement)
}

fn strip_ios_google_maps(ctx: &FeatureContext, warnings: &mut Vec<Warning>) {
    let layout = &ctx.layout;
    soften(
        edit_file(&layout.podfile(), |content| {
            Ok(remove_lines(content, &PODFILE_GOOGLE_MAPS))
        }),
        SCOPE,
        warnings,
    );
    if let Some(delegate) = layout.app_delegate() {
        soften(
            edit_file(&delegate, |content| Ok(remove_lines(content, &NATIVE_GOOGLE_MAPS))),
            SCOPE,
            warnings,
        );
    }
}

fn enable(ctx: &FeatureContext, maps: &MapsOptions) -> Result<Vec<Warning>> {
    let mut warnings = Vec::new();
    let api_key = maps.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty());

    ctx.add_dependency_groups(&["maps"])?;

    // Android always renders through Google Maps
    let element = manifest_api_key_element(api_key);
    soften(
        edit_file(&ctx.layout.android_manifest(), |content| {
            Ok(set_manifest_api_key(content, &element))
        }),
        SCOPE,
        &mut warnings,
    );

    match maps.provider {
        MapsProvider::Google => match ctx.layout.app_delegate() {
            Some(delegate) => {
                let kind = AppDelegateKind::from_path(&delegate);
                soften(
                    edit_file(&delegate, |content| Ok(wire_native_key(content, kind, api_key))),
                    SCOPE,
                    &mut warnings,
                );
            }
            None => warnings.push(Warning::new(
                SCOPE,
                "No AppDelegate found; initialize the Google Maps SDK manually",
            )),
        },
        MapsProvider::Apple => strip_ios_google_maps(ctx, &mut warnings),
    }

    if api_key.is_none() {
        warnings.push(Warning::new(
            SCOPE,
            format!(
                "No Google Maps API key given; replace {} before building",
                API_KEY_PLACEHOLDER
            ),
        ));
    }
    Ok(warnings)
}

fn disable(ctx: &FeatureContext) -> Result<Vec<Warning>> {
    let mut warnings = Vec::new();
    ctx.remove_dependency_groups(&["maps"])?;
    strip_ios_google_maps(ctx, &mut warnings);
    soften(
        edit_file(&ctx.layout.android_manifest(), |content| {
            Ok(match MANIFEST_API_KEY.find(content) {
                Some(found) => format!(
                    "{}{}{}",
                    &content[..found.start()],
                    DISABLED_MANIFEST_COMMENT,
                    &content[found.end()..]
                ),
                None => content.to_string(),
            })
        }),
        SCOPE,
        &mut warnings,
    );
    Ok(warnings)
}

pub fn apply(ctx: &FeatureContext) -> Result<Vec<Warning>> {
    match &ctx.config.maps {
        Some(maps) => enable(ctx, maps),
        None => disable(ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "<manifest xmlns:android=\"http://schemas.android.com/apk/res/android\">
    <application android:name=\".MainApplication\">
      <!-- <meta-data android:name=\"com.google.android.geo.API_KEY\" android:value=\"<GOOGLE_MAPS_API_KEY>\"/> -->
      <activity android:name=\".MainActivity\" />
    </application>
</manifest>
";

    const SWIFT: &str = "import UIKit
import GoogleMaps

class AppDelegate: RCTAppDelegate {
  override func application(_ application: UIApplication, didFinishLaunchingWithOptions launchOptions: [UIApplication.LaunchOptionsKey : Any]? = nil) -> Bool {
    GMSServices.provideAPIKey(\"<GOOGLE_MAPS_API_KEY>\")
    return true
  }
}
";

    #[test]
    fn test_key_uncomments_manifest_entry() {
        let out = set_manifest_api_key(MANIFEST, &manifest_api_key_element(Some("AIza123")));
        assert!(out.contains(
            "      <meta-data android:name=\"com.google.android.geo.API_KEY\" android:value=\"AIza123\"/>\n      <activity"
        ));
        assert!(!out.contains("<!--"));
        assert!(!out.contains(API_KEY_PLACEHOLDER));
    }

    #[test]
    fn test_disabled_comment_round_trip() {
        let disabled = MANIFEST_API_KEY.replace(MANIFEST, DISABLED_MANIFEST_COMMENT).into_owned();
        assert!(!disabled.contains("<meta-data"));
        let enabled = set_manifest_api_key(&disabled, &manifest_api_key_element(None));
        assert_eq!(enabled, MANIFEST);
    }

    #[test]
    fn test_missing_entry_inserted_in_application() {
        let bare = "<manifest>\n    <application>\n        <activity />\n    </application>\n</manifest>\n";
        let out = set_manifest_api_key(bare, &manifest_api_key_element(Some("k")));
        assert!(out.contains("        <activity />\n        <meta-data android:name=\"com.google.android.geo.API_KEY\" android:value=\"k\"/>\n    </application>"));
    }

    #[test]
    fn test_native_key_replaced_once() {
        let out = wire_native_key(SWIFT, AppDelegateKind::Swift, Some("AIza123"));
        assert_eq!(out.matches("AIza123").count(), 1);
        assert!(!out.contains(API_KEY_PLACEHOLDER));
        assert_eq!(wire_native_key(SWIFT, AppDelegateKind::Swift, None), SWIFT);
    }

    #[test]
    fn test_native_key_escaped_for_string_literal() {
        let out = wire_native_key(SWIFT, AppDelegateKind::Swift, Some(r#"ab"c\d"#));
        assert!(out.contains(r#"GMSServices.provideAPIKey("ab\"c\\d")"#));

        let bare = SWIFT
            .replace("import GoogleMaps\n", "")
            .replace("    GMSServices.provideAPIKey(\"<GOOGLE_MAPS_API_KEY>\")\n", "");
        let objc = provide_api_key(AppDelegateKind::ObjC, "k\"1").1;
        assert_eq!(objc, r#"[GMSServices provideAPIKey:@"k\"1"];"#);
        let swift = wire_native_key(&bare, AppDelegateKind::Swift, Some("k\"1"));
        assert!(swift.contains(r#"provideAPIKey("k\"1")"#));
    }

    #[test]
    fn test_native_init_added_when_missing() {
        let bare = SWIFT
            .replace("import GoogleMaps\n", "")
            .replace("    GMSServices.provideAPIKey(\"<GOOGLE_MAPS_API_KEY>\")\n", "");
        let out = wire_native_key(&bare, AppDelegateKind::Swift, None);
        assert!(out.contains("import GoogleMaps"));
        assert!(out.contains("GMSServices.provideAPIKey(\"<GOOGLE_MAPS_API_KEY>\")"));
    }

    #[test]
    fn test_strip_google_lines() {
        let stripped = remove_lines(SWIFT, &NATIVE_GOOGLE_MAPS);
        assert!(!stripped.contains("GoogleMaps"));
        assert!(!stripped.contains("GMSServices"));
        assert!(stripped.contains("return true"));

        let podfile = "target 'MyApp' do\n  # Google Maps\n  rn_maps_path = '../node_modules/react-native-maps'\n  pod 'react-native-google-maps', :path => rn_maps_path\n  pod 'GoogleMaps'\nend\n";
        assert_eq!(remove_lines(podfile, &PODFILE_GOOGLE_MAPS), "target 'MyApp' do\nend\n");
    }
}
