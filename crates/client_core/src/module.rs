//! Where the transform module's source text comes from.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::Settings;

/// Module source compiled into the binary, used when nothing else is configured.
pub const EMBEDDED_MODULE: &str = include_str!("../assets/transforms.toml");

const MODULE_PATH_FROM_ROOT: &str = "script/transforms.toml";
const MODULE_PATH_FROM_PAGES: &str = "../script/transforms.toml";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch transform module from {location}: {reason}")]
pub struct FetchError {
    pub location: String,
    pub reason: String,
}

impl FetchError {
    fn new(location: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
pub trait ModuleSource: Send + Sync {
    fn location(&self) -> String;
    async fn fetch(&self) -> Result<String, FetchError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedModule;

#[async_trait]
impl ModuleSource for EmbeddedModule {
    fn location(&self) -> String {
        "embedded".to_string()
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        Ok(EMBEDDED_MODULE.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct FileModule {
    path: PathBuf,
}

impl FileModule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ModuleSource for FileModule {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        debug!(path = %self.path.display(), "reading transform module");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| FetchError::new(self.location(), err))
    }
}

#[derive(Debug, Clone)]
pub struct HttpModule {
    client: Client,
    url: Url,
}

impl HttpModule {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ModuleSource for HttpModule {
    fn location(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        debug!(url = %self.url, "fetching transform module");
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| FetchError::new(self.location(), err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                self.location(),
                format!("unexpected HTTP status {status}"),
            ));
        }
        response
            .text()
            .await
            .map_err(|err| FetchError::new(self.location(), err))
    }
}

/// Resolves the module relative to the page that needs it. Pages living under
/// a `/pages/` directory reach the script directory one level up.
pub fn module_url_for_page(page: &Url) -> Result<Url, url::ParseError> {
    let relative = if page.path().contains("/pages/") {
        MODULE_PATH_FROM_PAGES
    } else {
        MODULE_PATH_FROM_ROOT
    };
    page.join(relative)
}

pub fn source_for_location(location: &str) -> anyhow::Result<Arc<dyn ModuleSource>> {
    let location = location.trim();
    match Url::parse(location) {
        Ok(url) => source_for_url(url),
        Err(_) => Ok(Arc::new(FileModule::new(location))),
    }
}

fn source_for_url(url: Url) -> anyhow::Result<Arc<dyn ModuleSource>> {
    match url.scheme() {
        "http" | "https" => Ok(Arc::new(HttpModule::new(Client::new(), url))),
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| anyhow::anyhow!("module url '{url}' is not a local path"))?;
            Ok(Arc::new(FileModule::new(path)))
        }
        // Windows drive letters parse as a one-letter scheme.
        scheme if scheme.len() == 1 => Ok(Arc::new(FileModule::new(url.as_str()))),
        scheme => anyhow::bail!("unsupported module url scheme '{scheme}'"),
    }
}

/// Explicit location first, then page-relative resolution, then the embedded module.
pub fn source_from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn ModuleSource>> {
    if let Some(location) = settings.module_location.as_deref() {
        return source_for_location(location);
    }
    if let Some(page) = settings.page_location.as_deref() {
        let page_url =
            Url::parse(page).with_context(|| format!("invalid page location '{page}'"))?;
        let module_url = module_url_for_page(&page_url)
            .with_context(|| format!("could not resolve module relative to '{page}'"))?;
        return source_for_url(module_url);
    }
    Ok(Arc::new(EmbeddedModule))
}
