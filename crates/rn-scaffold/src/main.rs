//! rn-scaffold CLI - React Native project scaffolding

use anyhow::Result;
use clap::{Parser, Subcommand};
use rn_scaffold_core::config::PackageManager;
use rn_scaffold_core::features::maps::API_KEY_PLACEHOLDER;
use rn_scaffold_core::runtime::ExternalStep;
use rn_scaffold_core::tui::CreateArgs;
use rn_scaffold_core::{ProductConfig, ProjectConfig};
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// rn-scaffold product configuration
#[derive(Clone)]
pub struct RnScaffoldConfig;

impl ProductConfig for RnScaffoldConfig {
    fn name(&self) -> &'static str {
        "rn-scaffold"
    }

    fn display_name(&self) -> &'static str {
        "React Native scaffold"
    }

    fn template_base_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/rn-scaffold/rn-scaffold/main/templates"
    }

    fn template_url_env(&self) -> &'static str {
        "RN_SCAFFOLD_TEMPLATE_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://reactnative.dev/docs/getting-started"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install rn-scaffold --force"
    }

    fn next_steps(
        &self,
        dir: &Path,
        config: &ProjectConfig,
        pending: &[ExternalStep],
    ) -> Vec<String> {
        let mut steps = Vec::new();
        let manager = config.package_manager;
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }
        steps.extend(pending.iter().map(ExternalStep::manual_command));

        if let Some(maps) = &config.maps {
            if maps.api_key.is_none() {
                steps.push(format!(
                    "Replace {} with your Google Maps API key",
                    API_KEY_PLACEHOLDER
                ));
            }
        }

        match config.environments.first() {
            Some(env) => {
                steps.push(manager.run_script(&format!("ios:{}", env)));
                steps.push(manager.run_script(&format!("android:{}", env)));
            }
            None => {
                steps.push(manager.run_script("ios"));
                steps.push(manager.run_script("android"));
            }
        }

        steps.push(format!("Read the docs: {}", self.docs_url()));
        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "rn-scaffold")]
#[command(about = "CLI for scaffolding React Native projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new React Native project
    Create(CliCreateArgs),
    /// Build zip files for all templates in the template directory (for development use)
    BuildZip(BuildZipArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project name (PascalCase, e.g. MyApp)
    pub name: Option<String>,

    /// Bundle identifier / application id (e.g. com.acme.myapp)
    #[arg(long = "bundle-id")]
    pub bundle_id: Option<String>,

    /// Name shown under the app icon
    #[arg(long = "display-name")]
    pub display_name: Option<String>,

    /// Package manager used to install dependencies
    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Local directory to use for templates instead of fetching from remote (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Template name to use
    #[arg(short, long)]
    pub template: Option<String>,

    /// Project directory to create (defaults to ./<name>)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// YAML file with the full project configuration (non-interactive)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory with splash screen images
    #[arg(long = "splash-dir")]
    pub splash_dir: Option<PathBuf>,

    /// Directory with prebuilt app icons
    #[arg(long = "icons-dir")]
    pub icons_dir: Option<PathBuf>,

    /// Directory with .ttf/.otf fonts
    #[arg(long = "fonts-dir")]
    pub fonts_dir: Option<PathBuf>,

    /// Skip dependency installation
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Skip git initialization
    #[arg(long = "skip-git")]
    pub skip_git: bool,

    /// Skip `pod install`
    #[arg(long = "skip-pods")]
    pub skip_pods: bool,

    /// Replace the project directory if it already exists
    #[arg(long)]
    pub overwrite: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name,
            bundle_id: args.bundle_id,
            display_name: args.display_name,
            package_manager: args.package_manager,
            template_dir: args.template_dir,
            template: args.template,
            directory: args.directory,
            config_file: args.config,
            splash_dir: args.splash_dir,
            icons_dir: args.icons_dir,
            fonts_dir: args.fonts_dir,
            skip_install: args.skip_install,
            skip_git: args.skip_git,
            skip_pods: args.skip_pods,
            overwrite: args.overwrite,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct BuildZipArgs {
    /// Local directory containing templates to build zips from (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = RnScaffoldConfig;

    match args.command {
        Some(Command::BuildZip(build_args)) => {
            rn_scaffold_core::templates::build_zips(&config, &build_args.template_dir).map(|_| ())
        }
        command => {
            // No subcommand provided, default to create behavior (interactive mode)
            let create_args = match command {
                Some(Command::Create(create_args)) => create_args.into(),
                _ => CreateArgs::default(),
            };
            let result = rn_scaffold_core::run(&config, create_args, CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
