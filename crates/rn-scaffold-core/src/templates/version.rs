//! Version comparison for CLI and template compatibility

use anyhow::Result;
use semver::Version;

/// Parse version string, tolerating a leading `v`
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Compare the CLI version against a template's minimum CLI version.
///
/// Returns a warning message if the CLI is older than the template expects.
/// Unparseable versions are not compared.
pub fn check_compatibility(
    cli_version: &str,
    min_cli_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let cli_ver = parse_version(cli_version).ok()?;
    let min_ver = parse_version(min_cli_version).ok()?;

    if cli_ver < min_ver {
        Some(format!(
            "This template requires CLI version {} or newer.\n\
             You are running version {}.\n\
             Consider updating: {}",
            min_cli_version, cli_version, upgrade_command
        ))
    } else {
        None
    }
}
