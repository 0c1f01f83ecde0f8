//! Charm-style CLI flow using cliclack

use super::questions::resolve_project_config;
use crate::config::{PackageManager, ProjectConfig};
use crate::materialize::{materialize, MaterializeReport, MaterializeRequest, Overwrite};
use crate::product::ProductConfig;
use crate::runtime::{check, supports_pods, ExternalStep};
use crate::templates::fetcher::{PreparedTemplate, TemplateFetcher};
use crate::templates::version;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name (PascalCase identifier)
    pub name: Option<String>,

    pub bundle_id: Option<String>,

    pub display_name: Option<String>,

    pub package_manager: Option<PackageManager>,

    /// Local directory to use for templates instead of fetching from remote
    pub template_dir: Option<PathBuf>,

    /// Template name to use
    pub template: Option<String>,

    /// Project directory to create (defaults to ./<name>)
    pub directory: Option<PathBuf>,

    /// YAML file holding a full project configuration
    pub config_file: Option<PathBuf>,

    pub splash_dir: Option<PathBuf>,
    pub icons_dir: Option<PathBuf>,
    pub fonts_dir: Option<PathBuf>,

    pub skip_install: bool,
    pub skip_git: bool,
    pub skip_pods: bool,

    /// Replace an existing destination without asking
    pub overwrite: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Resolve the project configuration
    let project = resolve_project_config(&args)?;
    if let Err(e) = project.validate() {
        cliclack::log::error(e.to_string())?;
        anyhow::bail!("Setup cancelled.");
    }

    // Step 2: Check required tools
    check_tools(&project)?;

    // Step 3: Setup template fetcher and select a template
    let fetcher = setup_fetcher(config, &args.template_dir)?;
    let template = select_template(
        &fetcher,
        args.template.as_deref(),
        config.default_template(),
        project.yes,
    )
    .await?;

    let manifest = template.manifest()?;
    if let Some(min) = &manifest.min_cli_version {
        if let Some(warning) =
            version::check_compatibility(cli_version, min, config.upgrade_command())
        {
            cliclack::log::warning(warning)?;
        }
    }

    // Step 4: Select directory
    let (project_dir, overwrite) = select_directory(&args, &project)?;

    // Step 5: Materialize
    let report = create_project(&template, &project_dir, &project, overwrite).await?;
    for warning in &report.warnings {
        cliclack::log::warning(warning.to_string())?;
    }

    // Step 6: External commands
    let pending = run_external_steps(&project, &project_dir).await?;

    // Step 7: Show next steps
    print_next_steps(config, &project_dir, &project, &pending)?;

    Ok(())
}

fn check_tools(project: &ProjectConfig) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking tools...");

    match check::check_tools(project) {
        Ok(tools) => {
            let tool_info: Vec<String> = tools
                .iter()
                .map(|t| {
                    if t.available {
                        format!("{} ({})", t.name, t.version.as_deref().unwrap_or("unknown"))
                    } else {
                        format!("{} (not installed)", t.name)
                    }
                })
                .collect();
            spinner.stop(format!("Detected tools: {}", tool_info.join(", ")));
            Ok(())
        }
        Err(e) => {
            spinner.stop("Missing tools");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Please install the missing tools and try again.");
        }
    }
}

fn setup_fetcher<C: ProductConfig>(
    config: &C,
    template_dir: &Option<PathBuf>,
) -> Result<TemplateFetcher> {
    let fetcher = match template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateFetcher::from_local(path.clone(), &config.user_agent())
        }
        None => {
            cliclack::log::info("Using remote templates")?;
            TemplateFetcher::from_config(config)?
        }
    };

    Ok(fetcher)
}

async fn select_template(
    fetcher: &TemplateFetcher,
    specified_template: Option<&str>,
    default_template: &str,
    non_interactive: bool,
) -> Result<PreparedTemplate> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    let root_manifest = match fetcher.fetch_root_manifest().await {
        Ok(manifest) => manifest,
        Err(e) => {
            spinner.stop("Failed to load templates");
            return Err(e);
        }
    };
    spinner.stop("Templates loaded");

    let template_name = match specified_template {
        Some(name) => {
            if !root_manifest.templates.iter().any(|t| t == name) {
                anyhow::bail!(
                    "Template '{}' not found. Available templates: {}",
                    name,
                    root_manifest.templates.join(", ")
                );
            }
            name.to_string()
        }
        None => match root_manifest.templates.as_slice() {
            [] => anyhow::bail!("No templates found."),
            [only] => only.clone(),
            templates => {
                let listed_default = templates.iter().find(|t| *t == default_template);
                match listed_default {
                    Some(name) if non_interactive => name.clone(),
                    _ => {
                        let mut select = cliclack::select("Select a template");
                        for name in templates {
                            select = select.item(name.clone(), name, "");
                        }
                        if let Some(name) = listed_default {
                            select = select.initial_value(name.clone());
                        }
                        select.interact()?
                    }
                }
            }
        },
    };

    let spinner = cliclack::spinner();
    spinner.start(format!("Fetching template '{}'...", template_name));
    match fetcher.prepare(&template_name).await {
        Ok(template) => {
            let manifest = template.manifest()?;
            spinner.stop(format!(
                "Template: {} - {}",
                manifest.name, manifest.description
            ));
            Ok(template)
        }
        Err(e) => {
            spinner.stop("Failed to fetch template");
            Err(e)
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

fn select_directory(args: &CreateArgs, project: &ProjectConfig) -> Result<(PathBuf, Overwrite)> {
    let path = absolute(
        args.directory
            .as_deref()
            .unwrap_or_else(|| Path::new(&project.project_name)),
    );
    cliclack::log::info(format!("Project directory: {}", path.display()))?;

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    let count = std::fs::read_dir(&path).map(|entries| entries.count()).unwrap_or(0);
    if count == 0 && !path.is_file() {
        return Ok((path, Overwrite::Fail));
    }

    cliclack::log::warning(format!("{} already exists ({} items)", path.display(), count))?;
    let replace = if args.overwrite {
        true
    } else if args.yes {
        false
    } else {
        cliclack::confirm("Delete it and continue?")
            .initial_value(false)
            .interact()?
    };

    if !replace {
        anyhow::bail!("Destination exists. Re-run with --overwrite to replace it.");
    }
    Ok((path, Overwrite::Replace))
}

async fn create_project(
    template: &PreparedTemplate,
    project_dir: &Path,
    project: &ProjectConfig,
    overwrite: Overwrite,
) -> Result<MaterializeReport> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let request = MaterializeRequest {
        template_root: template.root().to_path_buf(),
        destination: project_dir.to_path_buf(),
        config: project.clone(),
        overwrite,
    };
    let result = tokio::task::spawn_blocking(move || materialize(&request)).await?;

    match result {
        Ok(report) => {
            spinner.stop(format!(
                "Created {} files in {}",
                report.files_copied,
                report.destination.display()
            ));
            Ok(report)
        }
        Err(e) => {
            spinner.stop("Failed to create project");
            let _ = console::Term::stderr().show_cursor();
            Err(e.into())
        }
    }
}

/// Run the planned steps; returns the ones left for the user to run
async fn run_external_steps(
    project: &ProjectConfig,
    project_dir: &Path,
) -> Result<Vec<ExternalStep>> {
    let pods = supports_pods();
    let mut pending = ExternalStep::deferred(project, pods);
    for step in ExternalStep::planned(project, pods) {
        cliclack::log::step(step.description())?;
        match step.run(project_dir).await {
            Ok(()) => cliclack::log::success(format!("{} done", step.description()))?,
            Err(e) => {
                cliclack::log::warning(format!("{:#}", e))?;
                pending.push(step);
            }
        }
    }
    pending.sort_by_key(ExternalStep::order);
    Ok(pending)
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    project: &ProjectConfig,
    pending: &[ExternalStep],
) -> Result<()> {
    let steps = config.next_steps(project_dir, project, pending);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
