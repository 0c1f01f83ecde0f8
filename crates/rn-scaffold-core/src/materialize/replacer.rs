//! Literal token replacement inside a single file

use crate::error::{IoContext, Result, ScaffoldError};
use aho_corasick::{AhoCorasick, MatchKind};
use std::fs;
use std::path::Path;

/// Ordered `(token, replacement)` pairs
pub type TokenMap = Vec<(String, String)>;

/// Replace every token occurrence in one left-to-right pass.
///
/// At each position the leftmost match wins; when several tokens start at
/// the same position the one listed first wins. Replacement text is emitted
/// as-is and never scanned again.
pub fn replace_tokens(content: &str, tokens: &[(String, String)]) -> Result<String> {
    let patterns: Vec<&str> = tokens
        .iter()
        .map(|(token, _)| token.as_str())
        .filter(|token| !token.is_empty())
        .collect();
    if patterns.is_empty() {
        return Ok(content.to_string());
    }
    let replacements: Vec<&str> = tokens
        .iter()
        .filter(|(token, _)| !token.is_empty())
        .map(|(_, replacement)| replacement.as_str())
        .collect();

    let matcher = AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostFirst)
        .build(&patterns)
        .map_err(|e| ScaffoldError::Template(format!("Invalid replacement tokens: {}", e)))?;
    Ok(matcher.replace_all(content, &replacements))
}

/// Apply `tokens` to the file at `path` in place.
///
/// Returns `Ok(false)` when the file does not exist or nothing changed.
pub fn replace_in_file(path: &Path, tokens: &[(String, String)]) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let content = fs::read_to_string(path).io_context("read", path)?;
    let updated = replace_tokens(&content, tokens)?;
    if updated == content {
        return Ok(false);
    }
    fs::write(path, updated).io_context("write", path)?;
    Ok(true)
}
