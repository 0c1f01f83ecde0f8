//! rn-scaffold core - template materialization engine for React Native projects
//!
//! Turns a template tree (a bare React Native app using placeholder names)
//! into a ready-to-build project: identity substitution, path renames, asset
//! projection and optional feature composition.
//!
//! # Architecture
//!
//! - **Engine** - [`materialize`] runs the synchronous pipeline over a
//!   [`MaterializeRequest`] and returns a [`MaterializeReport`] with warnings
//! - **Orchestration** - template fetching, runtime checks and external
//!   commands, configured through the [`ProductConfig`] trait
//! - **CLI/TUI** - optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use rn_scaffold_core::{materialize, MaterializeRequest, Overwrite, ProjectConfig};
//!
//! let report = materialize(&MaterializeRequest {
//!     template_root: "templates/default".into(),
//!     destination: "MyApp".into(),
//!     config: ProjectConfig::new("MyApp", "com.acme.myapp", "My App"),
//!     overwrite: Overwrite::Fail,
//! })?;
//! for warning in &report.warnings {
//!     eprintln!("{}", warning);
//! }
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod features;
pub mod materialize;
pub mod product;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::ProjectConfig;
pub use error::{Result, ScaffoldError, Warning};
pub use materialize::{materialize, MaterializeReport, MaterializeRequest, Overwrite};
pub use product::ProductConfig;
pub use runtime::{check_tools, ToolInfo};
pub use templates::{RootManifest, TemplateFetcher, TemplateManifest, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;

/// CLI version - used for template compatibility checking
/// Each binary should define its own version, but this provides a fallback
pub const DEFAULT_CLI_VERSION: &str = "0.1.0";
