//! Dependency and script edits on the generated `package.json`

use crate::error::{IoContext, Result, ScaffoldError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// A loaded `package.json` document, key order preserved
#[derive(Debug, Clone)]
pub struct PackageJson {
    path: PathBuf,
    original: String,
    doc: Map<String, Value>,
}

impl PackageJson {
    /// Load `path`, or `None` when the template has no package.json
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let original = fs::read_to_string(path).io_context("read", path)?;
        let value: Value = serde_json::from_str(&original).map_err(|e| {
            ScaffoldError::Template(format!("invalid JSON in {}: {}", path.display(), e))
        })?;
        let Value::Object(doc) = value else {
            return Err(ScaffoldError::Template(format!(
                "{} is not a JSON object",
                path.display()
            )));
        };
        Ok(Some(Self {
            path: path.to_path_buf(),
            original,
            doc,
        }))
    }

    fn section_mut(&mut self, name: &str) -> &mut Map<String, Value> {
        let entry = self
            .doc
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        entry.as_object_mut().expect("section replaced with an object above")
    }

    fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.doc.get(name).and_then(Value::as_object)
    }

    /// Add runtime dependencies, keeping versions already pinned by the template
    pub fn add_dependencies(&mut self, deps: &BTreeMap<String, String>) {
        if deps.is_empty() {
            return;
        }
        let section = self.section_mut("dependencies");
        for (name, version) in deps {
            if !section.contains_key(name) {
                section.insert(name.clone(), Value::String(version.clone()));
            }
        }
        section.sort_keys();
    }

    /// Remove every dependency whose name matches, from all dependency sections
    pub fn remove_dependencies<F>(&mut self, matches: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let mut removed = 0;
        for section in DEPENDENCY_SECTIONS {
            if let Some(Value::Object(map)) = self.doc.get_mut(section) {
                let before = map.len();
                map.retain(|name, _| !matches(name));
                removed += before - map.len();
            }
        }
        removed
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        DEPENDENCY_SECTIONS
            .iter()
            .any(|s| self.section(s).is_some_and(|m| m.contains_key(name)))
    }

    pub fn dependency_version(&self, name: &str) -> Option<&str> {
        DEPENDENCY_SECTIONS
            .iter()
            .find_map(|s| self.section(s).and_then(|m| m.get(name)))
            .and_then(Value::as_str)
    }

    /// Set an npm script, replacing any existing command of the same name
    pub fn set_script(&mut self, name: &str, command: &str) {
        self.section_mut("scripts")
            .insert(name.to_string(), Value::String(command.to_string()));
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.section("scripts")
            .and_then(|m| m.get(name))
            .and_then(Value::as_str)
    }

    /// Write back with 2-space indentation if anything changed
    pub fn save(&self) -> Result<bool> {
        let mut out = serde_json::to_string_pretty(&self.doc).map_err(|e| {
            ScaffoldError::Template(format!("failed to serialize {}: {}", self.path.display(), e))
        })?;
        out.push('\n');
        if out == self.original {
            return Ok(false);
        }
        fs::write(&self.path, out).io_context("write", &self.path)?;
        Ok(true)
    }
}

/// Load, edit and save in one step. Missing package.json is a no-op.
pub fn update_package_json<F>(path: &Path, edit: F) -> Result<bool>
where
    F: FnOnce(&mut PackageJson),
{
    let Some(mut package) = PackageJson::load(path)? else {
        return Ok(false);
    };
    edit(&mut package);
    package.save()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
  "name": "helloworld",
  "scripts": {
    "start": "react-native start"
  },
  "dependencies": {
    "react": "18.3.1",
    "react-native-maps": "^1.18.0"
  },
  "devDependencies": {
    "@react-native-firebase/app": "^21.0.0"
  }
}
"#;

    fn sample() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("package.json");
        fs::write(&path, SAMPLE).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_add_keeps_existing_versions_and_sorts() {
        let (_tmp, path) = sample();
        let mut deps = BTreeMap::new();
        deps.insert("zustand".to_string(), "^5.0.3".to_string());
        deps.insert("react-native-maps".to_string(), "^9.9.9".to_string());
        update_package_json(&path, |p| p.add_dependencies(&deps)).unwrap();

        let package = PackageJson::load(&path).unwrap().unwrap();
        assert_eq!(package.dependency_version("react-native-maps"), Some("^1.18.0"));
        assert_eq!(package.dependency_version("zustand"), Some("^5.0.3"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.find("\"react\"").unwrap() < content.find("\"zustand\"").unwrap());
        // Top-level key order preserved
        assert!(content.find("\"name\"").unwrap() < content.find("\"scripts\"").unwrap());
    }

    #[test]
    fn test_remove_across_sections() {
        let (_tmp, path) = sample();
        let mut package = PackageJson::load(&path).unwrap().unwrap();
        let removed = package.remove_dependencies(|n| {
            n.starts_with("@react-native-firebase/") || n == "react-native-maps"
        });
        assert_eq!(removed, 2);
        assert!(!package.has_dependency("react-native-maps"));
        assert!(package.has_dependency("react"));
    }

    #[test]
    fn test_unchanged_document_not_rewritten() {
        let (_tmp, path) = sample();
        assert!(!update_package_json(&path, |_| {}).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn test_scripts_and_missing_file() {
        let (tmp, path) = sample();
        update_package_json(&path, |p| p.set_script("android:staging", "react-native run-android --mode=stagingDebug")).unwrap();
        let package = PackageJson::load(&path).unwrap().unwrap();
        assert_eq!(package.script("start"), Some("react-native start"));
        assert!(package.script("android:staging").is_some());

        assert!(!update_package_json(&tmp.path().join("nope.json"), |_| {}).unwrap());
    }
}
