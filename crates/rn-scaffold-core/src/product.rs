//! What a binary shipping the React Native scaffolder supplies
//!
//! The core stays product-agnostic: where templates are published, which
//! template is preselected and what the user is told once the project exists
//! all come from here.

use crate::config::ProjectConfig;
use crate::runtime::ExternalStep;
use std::path::Path;

pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Binary name; prefixes the HTTP user agent
    fn name(&self) -> &'static str;

    /// Heading of the interactive session
    fn display_name(&self) -> &'static str;

    /// Base URL holding the root `template.yaml` and one `<template>.zip` per template
    fn template_base_url(&self) -> &'static str;

    /// Environment variable that replaces [`Self::template_base_url`]
    fn template_url_env(&self) -> &'static str;

    /// Template preselected when the root manifest lists several
    fn default_template(&self) -> &'static str {
        "default"
    }

    /// Getting-started page linked from the last next step
    fn docs_url(&self) -> &'static str;

    /// Command that upgrades the binary when a template needs a newer one
    fn upgrade_command(&self) -> &'static str;

    /// Instructions printed once the project exists.
    ///
    /// `pending` holds the external steps that were skipped or failed, in
    /// run order, so their manual commands can be listed.
    fn next_steps(&self, dir: &Path, config: &ProjectConfig, pending: &[ExternalStep])
        -> Vec<String>;

    /// Template base URL after applying the environment override
    fn template_url(&self) -> String {
        std::env::var(self.template_url_env())
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.template_base_url().to_string())
    }

    /// User agent for template downloads
    fn user_agent(&self) -> String {
        format!("{}/{}", self.name(), env!("CARGO_PKG_VERSION"))
    }
}
