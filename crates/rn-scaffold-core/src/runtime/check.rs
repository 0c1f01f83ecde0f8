//! Tool detection for Node.js, the package manager, git and CocoaPods

use crate::config::{PackageManager, ProjectConfig};
use anyhow::Result;
use semver::Version;
use std::process::Command;

/// Oldest Node.js release supported by current React Native
pub const MIN_NODE_VERSION: Version = Version::new(18, 0, 0);

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl ToolInfo {
    fn missing(name: &'static str) -> Self {
        Self {
            name,
            version: None,
            available: false,
        }
    }
}

/// Run `<binary> --version` and report what was found
pub fn check_tool(binary: &str, name: &'static str) -> ToolInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            ToolInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => ToolInfo::missing(name),
    }
}

pub fn check_node() -> ToolInfo {
    check_tool("node", "Node.js")
}

pub fn check_package_manager(manager: PackageManager) -> ToolInfo {
    check_tool(manager.command(), manager.command())
}

pub fn check_git() -> ToolInfo {
    check_tool("git", "git")
}

pub fn check_cocoapods() -> ToolInfo {
    check_tool("pod", "CocoaPods")
}

/// Extract a semver version from output like `v20.11.1` or `git version 2.43.0`
pub fn parse_tool_version(output: &str) -> Option<Version> {
    output.split_whitespace().find_map(|word| {
        let word = word.strip_prefix('v').unwrap_or(word);
        Version::parse(word).ok()
    })
}

/// True when a Node.js version string is older than [`MIN_NODE_VERSION`]
pub fn node_too_old(version: &str) -> bool {
    parse_tool_version(version).is_some_and(|v| v < MIN_NODE_VERSION)
}

/// Whether this host can run `pod install`
pub fn supports_pods() -> bool {
    cfg!(target_os = "macos")
}

/// Check the tools the requested run needs.
///
/// Node.js is always required and the package manager is required unless
/// installation is skipped. git and CocoaPods are advisory: their
/// availability is reported but never fails the check.
pub fn check_tools(config: &ProjectConfig) -> Result<Vec<ToolInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    let node = check_node();
    if !node.available {
        missing.push("Node.js 18 or newer (install from https://nodejs.org)".to_string());
    } else if node.version.as_deref().is_some_and(node_too_old) {
        missing.push(format!(
            "Node.js {} or newer (found {})",
            MIN_NODE_VERSION,
            node.version.as_deref().unwrap_or_default()
        ));
    }
    results.push(node);

    if !config.skip_install {
        let manager = check_package_manager(config.package_manager);
        if !manager.available {
            missing.push(format!(
                "{} (or choose another package manager)",
                config.package_manager
            ));
        }
        results.push(manager);
    }

    if !config.skip_git {
        results.push(check_git());
    }

    if !config.skip_pods && supports_pods() {
        results.push(check_cocoapods());
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_version() {
        assert_eq!(parse_tool_version("v20.11.1"), Some(Version::new(20, 11, 1)));
        assert_eq!(parse_tool_version("git version 2.43.0"), Some(Version::new(2, 43, 0)));
        assert_eq!(parse_tool_version("1.15.2"), Some(Version::new(1, 15, 2)));
        assert_eq!(parse_tool_version("unknown"), None);
    }

    #[test]
    fn test_node_too_old() {
        assert!(node_too_old("v16.20.0"));
        assert!(!node_too_old("v20.11.1"));
        assert!(!node_too_old("garbage"));
    }

    #[test]
    fn test_missing_tool_reported() {
        let info = check_tool("rn-scaffold-definitely-not-a-binary", "nothing");
        assert!(!info.available);
        assert!(info.version.is_none());
    }
}
