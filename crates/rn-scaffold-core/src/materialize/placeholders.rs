//! Placeholder substitution plus format-aware fixups for structured files

use crate::config::ProjectConfig;
use crate::error::{soften, IoContext, Result, ScaffoldError, Warning};
use crate::materialize::replacer::{replace_in_file, TokenMap};
use crate::templates::manifest::{Placeholders, TemplateManifest};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const SCOPE: &str = "placeholders";

static MANIFEST_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<manifest\b[^>]*?(/?)>").expect("valid regex"));
static PACKAGE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\spackage\s*=").expect("valid regex"));
static BUNDLE_ID_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PRODUCT_BUNDLE_IDENTIFIER = [^;]*;").expect("valid regex"));

/// Token map for blanket substitution, in evaluation order
pub fn token_map(placeholders: &Placeholders, config: &ProjectConfig) -> TokenMap {
    vec![
        (
            placeholders.project_name.clone(),
            config.project_name.clone(),
        ),
        (
            placeholders.project_name.to_lowercase(),
            config.project_name.to_lowercase(),
        ),
        (
            placeholders.bundle_identifier.clone(),
            config.bundle_identifier.clone(),
        ),
        (
            placeholders.display_name.clone(),
            config.display_name.clone(),
        ),
    ]
}

/// How replacement text must be escaped for the file it lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Json,
    Xml,
    /// Android `res/values*` resources, which add backslash escapes on top of XML
    AndroidResource,
    Plain,
}

impl TextFormat {
    pub fn of(path: &Path) -> Self {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let in_values_dir = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("values"));
        match extension {
            "json" => Self::Json,
            "xml" if in_values_dir => Self::AndroidResource,
            "xml" | "plist" | "storyboard" | "xib" | "xcscheme" | "xcworkspacedata" => Self::Xml,
            _ => Self::Plain,
        }
    }

    pub fn escape(self, value: &str) -> String {
        match self {
            Self::Json => json_string_escape(value),
            Self::Xml => xml_escape(value),
            Self::AndroidResource => android_string_escape(value),
            Self::Plain => value.to_string(),
        }
    }
}

/// Escape replacements so they stay well-formed inside `format` files
pub fn escape_tokens(tokens: &TokenMap, format: TextFormat) -> TokenMap {
    tokens
        .iter()
        .map(|(token, replacement)| (token.clone(), format.escape(replacement)))
        .collect()
}

/// Body of a JSON string literal for `value`, without the surrounding quotes
pub fn json_string_escape(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Rewrite the manifest's text files and fix up structured formats.
///
/// Runs on the freshly copied tree, before paths are renamed, so every
/// manifest path is resolved with the placeholder project name.
pub fn apply_placeholders(
    dest: &Path,
    manifest: &TemplateManifest,
    config: &ProjectConfig,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let tokens = token_map(&manifest.placeholders, config);
    let template_name = manifest.placeholders.project_name.as_str();

    let mut paths: Vec<PathBuf> = manifest
        .text_files
        .iter()
        .map(|file| dest.join(file.resolve(template_name)))
        .collect();
    for source in manifest.package_sources(dest) {
        if !paths.contains(&source) {
            paths.push(source);
        }
    }
    for path in paths {
        let escaped = escape_tokens(&tokens, TextFormat::of(&path));
        soften(replace_in_file(&path, &escaped), SCOPE, &mut warnings);
    }

    let files = &manifest.structured;

    let app_json = dest.join(files.app_json.resolve(template_name));
    if let Err(e) = set_json_field(&app_json, &files.display_name_field, &config.display_name) {
        warnings.push(Warning::new(
            SCOPE,
            format!(
                "Could not set '{}' in {} ({}); keeping text substitution",
                files.display_name_field,
                app_json.display(),
                e
            ),
        ));
    }

    let android_manifest = dest.join(files.android_manifest.resolve(template_name));
    soften(
        ensure_manifest_package(&android_manifest, &config.bundle_identifier),
        SCOPE,
        &mut warnings,
    );

    let plist = dest.join(files.info_plist.resolve(template_name));
    for key in ["CFBundleDisplayName", "CFBundleName"] {
        soften(
            upsert_plist_string(&plist, key, &config.display_name),
            SCOPE,
            &mut warnings,
        );
    }

    let pbxproj = dest.join(files.pbxproj.resolve(template_name));
    soften(
        set_bundle_identifier(&pbxproj, &config.bundle_identifier),
        SCOPE,
        &mut warnings,
    );

    let strings = dest.join(files.strings_xml.resolve(template_name));
    soften(
        upsert_string_resource(&strings, "app_name", &config.display_name),
        SCOPE,
        &mut warnings,
    );

    warnings
}

/// Read a file, transform it, and write it back only if it changed.
///
/// Missing files are skipped and reported as `Ok(false)`.
pub fn edit_file<F>(path: &Path, edit: F) -> Result<bool>
where
    F: FnOnce(&str) -> Result<String>,
{
    if !path.is_file() {
        return Ok(false);
    }
    let content = fs::read_to_string(path).io_context("read", path)?;
    let updated = edit(&content)?;
    if updated == content {
        return Ok(false);
    }
    fs::write(path, updated).io_context("write", path)?;
    Ok(true)
}

/// Escape text for XML element content and attribute values
pub fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape a value for an Android string resource
pub fn android_string_escape(value: &str) -> String {
    xml_escape(value)
        .replace('\'', "\\'")
        .replace("&quot;", "\\\"")
}

/// Set a top-level string field of a JSON document exactly
pub fn set_json_field(path: &Path, field: &str, value: &str) -> Result<bool> {
    edit_file(path, |content| {
        let mut doc: serde_json::Value = serde_json::from_str(content).map_err(|e| {
            ScaffoldError::Template(format!("invalid JSON in {}: {}", path.display(), e))
        })?;
        let object = doc.as_object_mut().ok_or_else(|| {
            ScaffoldError::Template(format!("{} is not a JSON object", path.display()))
        })?;
        if object.get(field).and_then(|v| v.as_str()) == Some(value) {
            return Ok(content.to_string());
        }
        object.insert(field.to_string(), serde_json::Value::String(value.to_string()));
        let mut out = serde_json::to_string_pretty(&doc).map_err(|e| {
            ScaffoldError::Template(format!("failed to serialize {}: {}", path.display(), e))
        })?;
        out.push('\n');
        Ok(out)
    })
}

/// Insert `package="<bundle>"` on the root `<manifest>` element if it has none
pub fn ensure_manifest_package(path: &Path, bundle_identifier: &str) -> Result<bool> {
    edit_file(path, |content| Ok(insert_manifest_package(content, bundle_identifier)))
}

pub(crate) fn insert_manifest_package(content: &str, bundle_identifier: &str) -> String {
    let Some(caps) = MANIFEST_TAG.captures(content) else {
        return content.to_string();
    };
    let tag = caps.get(0).expect("whole match");
    if PACKAGE_ATTR.is_match(tag.as_str()) {
        return content.to_string();
    }
    // Insert after the last attribute, before `>` or `/>`
    let close_len = 1 + caps.get(1).map_or(0, |m| m.len());
    let body = &content[tag.start()..tag.end() - close_len];
    let trimmed = body.trim_end();
    let attribute = format!("package=\"{}\"", xml_escape(bundle_identifier));
    let separator = match trimmed.rfind('\n') {
        Some(newline) => {
            let last_line = &trimmed[newline + 1..];
            let indent: String = last_line.chars().take_while(|c| c.is_whitespace()).collect();
            format!("\n{}", indent)
        }
        None => " ".to_string(),
    };
    format!(
        "{}{}{}{}{}",
        &content[..tag.start()],
        trimmed,
        separator,
        attribute,
        &content[tag.start() + body.len()..]
    )
}

/// Set `<key>KEY</key><string>VALUE</string>` in an Info.plist, inserting it if absent
pub fn upsert_plist_string(path: &Path, key: &str, value: &str) -> Result<bool> {
    edit_file(path, |content| Ok(upsert_plist_string_in(content, key, value)))
}

pub(crate) fn upsert_plist_string_in(content: &str, key: &str, value: &str) -> String {
    let escaped = xml_escape(value);
    let pattern = format!(
        r"<key>{}</key>(\s*)(?:<string>(?s:.*?)</string>|<string\s*/>)",
        regex::escape(key)
    );
    let re = Regex::new(&pattern).expect("escaped key yields valid regex");
    if re.is_match(content) {
        return re
            .replace(content, |caps: &regex::Captures| {
                format!("<key>{}</key>{}<string>{}</string>", key, &caps[1], escaped)
            })
            .into_owned();
    }
    match content.rfind("</dict>") {
        Some(index) => format!(
            "{}\t<key>{}</key>\n\t<string>{}</string>\n{}",
            &content[..index],
            key,
            escaped,
            &content[index..]
        ),
        None => content.to_string(),
    }
}

/// Point every build configuration at the project's bundle identifier
pub fn set_bundle_identifier(path: &Path, bundle_identifier: &str) -> Result<bool> {
    edit_file(path, |content| {
        Ok(BUNDLE_ID_ASSIGNMENT
            .replace_all(content, |_: &regex::Captures| {
                format!("PRODUCT_BUNDLE_IDENTIFIER = {};", bundle_identifier)
            })
            .into_owned())
    })
}

/// Set `<string name="NAME">` in an Android resources file, inserting it if absent
pub fn upsert_string_resource(path: &Path, name: &str, value: &str) -> Result<bool> {
    edit_file(path, |content| Ok(upsert_string_resource_in(content, name, value)))
}

pub(crate) fn upsert_string_resource_in(content: &str, name: &str, value: &str) -> String {
    let escaped = android_string_escape(value);
    let pattern = format!(
        r#"<string\s+name="{}"([^>/]*)>(?s:.*?)</string>"#,
        regex::escape(name)
    );
    let re = Regex::new(&pattern).expect("escaped name yields valid regex");
    if re.is_match(content) {
        return re
            .replace(content, |caps: &regex::Captures| {
                format!("<string name=\"{}\"{}>{}</string>", name, &caps[1], escaped)
            })
            .into_owned();
    }
    match content.rfind("</resources>") {
        Some(index) => format!(
            "{}    <string name=\"{}\">{}</string>\n{}",
            &content[..index],
            name,
            escaped,
            &content[index..]
        ),
        None => content.to_string(),
    }
}
