//! Template fetching from a remote URL or a local directory
//!
//! Remote templates are published as `<name>.zip` next to a root
//! `template.yaml` and extracted into a temporary directory before
//! materialization. Local templates are used in place.

use super::copier::Exclusions;
use super::manifest::{RootManifest, TemplateManifest, MANIFEST_FILE};
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Template source - either remote URL or local directory
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Create a remote template source from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = config.template_url();
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// A template tree ready for materialization.
///
/// Extracted remote templates live in a temporary directory that is removed
/// when this value is dropped.
#[derive(Debug)]
pub struct PreparedTemplate {
    root: PathBuf,
    _extracted: Option<TempDir>,
}

impl PreparedTemplate {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> Result<TemplateManifest> {
        Ok(TemplateManifest::load(&self.root)?)
    }
}

/// Template fetcher - handles retrieving templates from remote or local sources
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let source = TemplateSource::from_config(config)?;
        Ok(Self::new(source, &config.user_agent()))
    }

    /// Create a fetcher for local templates
    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        Self::new(TemplateSource::local(path), user_agent)
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    async fn download(&self, url: Url) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;
        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
        }
        Ok(response)
    }

    /// Fetch the root manifest listing available templates
    pub async fn fetch_root_manifest(&self) -> Result<RootManifest> {
        let content = match &self.source {
            TemplateSource::Remote(base_url) => {
                let url = Self::build_url(base_url, MANIFEST_FILE)?;
                self.download(url).await?.text().await?
            }
            TemplateSource::Local(path) => {
                let manifest_path = path.join(MANIFEST_FILE);
                tokio::fs::read_to_string(&manifest_path)
                    .await
                    .with_context(|| format!("Failed to read {}", manifest_path.display()))?
            }
        };
        serde_yaml::from_str(&content).context("Failed to parse root manifest")
    }

    /// Resolve a template by name into a directory on disk
    pub async fn prepare(&self, template_name: &str) -> Result<PreparedTemplate> {
        match &self.source {
            TemplateSource::Local(path) => {
                let root = path.join(template_name);
                if !root.is_dir() {
                    anyhow::bail!("Template directory not found: {}", root.display());
                }
                Ok(PreparedTemplate {
                    root,
                    _extracted: None,
                })
            }
            TemplateSource::Remote(base_url) => {
                let zip_url = Self::build_url(base_url, &format!("{}.zip", template_name))?;
                let bytes = self
                    .download(zip_url)
                    .await
                    .with_context(|| format!("Failed to fetch template '{}'", template_name))?
                    .bytes()
                    .await?;
                let temp = TempDir::new().context("Failed to create temporary directory")?;
                extract_template_zip(&bytes, template_name, temp.path())?;
                Ok(PreparedTemplate {
                    root: temp.path().to_path_buf(),
                    _extracted: Some(temp),
                })
            }
        }
    }
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn file_mode(_metadata: &fs::Metadata) -> u32 {
    0o644
}

#[cfg(unix)]
fn set_file_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_file_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Package a local template directory as `<name>/...` zip entries.
///
/// The template's own `template.yaml` is included so remote consumers get
/// the same manifest; everything the manifest excludes is left out.
pub fn build_template_zip(template_dir: &Path, template_name: &str) -> Result<Vec<u8>> {
    let template_path = template_dir.join(template_name);
    let manifest = TemplateManifest::load(&template_path)
        .with_context(|| format!("Failed to load template '{}'", template_name))?;
    let exclusions = Exclusions::new(&template_path, manifest.exclusions());
    let keep = |path: &Path| {
        path.strip_prefix(&template_path)
            .is_ok_and(|rel| rel == Path::new(MANIFEST_FILE))
            || !exclusions.is_excluded(path)
    };

    let mut zip_buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let walker = WalkDir::new(&template_path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || keep(entry.path()));

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", template_path.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&template_path)?
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let metadata = entry.metadata()?;
            let content = fs::read(entry.path())
                .with_context(|| format!("Failed to read {}", entry.path().display()))?;

            zip.start_file(
                format!("{}/{}", template_name, relative),
                options.unix_permissions(file_mode(&metadata)),
            )?;
            zip.write_all(&content)?;
        }

        zip.finish()?;
    }

    Ok(zip_buffer)
}

/// Extract a template zip into `destination`, stripping the `<name>/` prefix.
///
/// Entries whose names would escape the destination are rejected.
pub fn extract_template_zip(zip_bytes: &[u8], template_name: &str, destination: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(zip_bytes)).with_context(|| {
        format!("Failed to read zip archive for template '{}'", template_name)
    })?;
    let prefix = Path::new(template_name);
    let mut extracted = 0usize;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let Some(enclosed) = file.enclosed_name() else {
            anyhow::bail!("Template '{}' zip has an unsafe entry: {}", template_name, file.name());
        };
        let relative = enclosed.strip_prefix(prefix).unwrap_or(&enclosed).to_path_buf();
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = destination.join(&relative);

        if file.is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        fs::write(&target, &contents)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        if let Some(mode) = file.unix_mode() {
            set_file_mode(&target, mode)?;
        }
        extracted += 1;
    }

    if extracted == 0 {
        anyhow::bail!("Template '{}' zip is empty", template_name);
    }
    Ok(())
}
