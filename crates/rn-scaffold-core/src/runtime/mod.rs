//! Tool detection and external commands
//!
//! This module provides:
//! - Node.js, package manager, git and CocoaPods detection
//! - Dependency install, `pod install` and git initialization

pub mod check;
pub mod commands;

pub use check::{check_tools, supports_pods, ToolInfo};
pub use commands::ExternalStep;
