//! Page template loading and rendering

use crate::config::{TemplateConfig, TemplateMode};
use minijinja::{AutoEscape, Environment};
use pvdash_common::Snapshot;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name used when the configured path has no usable file name
const FALLBACK_TEMPLATE_NAME: &str = "index.html";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template: {0}")]
    Parse(#[source] minijinja::Error),

    #[error("Failed to render template: {0}")]
    Render(#[source] minijinja::Error),
}

/// Where the dashboard template comes from on each request
pub enum TemplateSource {
    /// Re-read and parse the file for every render
    Reload { path: PathBuf },
    /// Parsed once; the file is not consulted again
    Cached {
        env: Environment<'static>,
        name: String,
    },
}

impl TemplateSource {
    /// Build the source for the configured mode.
    ///
    /// In cached mode the template is loaded here, so a missing or malformed
    /// file fails startup instead of every request.
    pub async fn from_config(config: &TemplateConfig) -> Result<Self, TemplateError> {
        match config.mode {
            TemplateMode::Reload => Ok(Self::reload(&config.path)),
            TemplateMode::Cached => Self::cached(&config.path).await,
        }
    }

    pub fn reload(path: impl Into<PathBuf>) -> Self {
        Self::Reload { path: path.into() }
    }

    pub async fn cached(path: &Path) -> Result<Self, TemplateError> {
        let (env, name) = load_environment(path).await?;
        tracing::info!(path = %path.display(), "Template loaded");
        Ok(Self::Cached { env, name })
    }

    /// Render the snapshot into a page
    pub async fn render(&self, snapshot: &Snapshot) -> Result<String, TemplateError> {
        match self {
            Self::Reload { path } => {
                let (env, name) = load_environment(path).await?;
                render_with(&env, &name, snapshot)
            }
            Self::Cached { env, name } => render_with(env, name, snapshot),
        }
    }
}

impl std::fmt::Debug for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reload { path } => f.debug_struct("Reload").field("path", path).finish(),
            Self::Cached { name, .. } => f.debug_struct("Cached").field("name", name).finish(),
        }
    }
}

/// The file name doubles as the template name in error messages
fn template_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(FALLBACK_TEMPLATE_NAME)
        .to_string()
}

async fn load_environment(path: &Path) -> Result<(Environment<'static>, String), TemplateError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let name = template_name(path);
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_template_owned(name.clone(), source)
        .map_err(TemplateError::Parse)?;

    Ok((env, name))
}

fn render_with(
    env: &Environment<'static>,
    name: &str,
    snapshot: &Snapshot,
) -> Result<String, TemplateError> {
    let template = env.get_template(name).map_err(TemplateError::Parse)?;
    template.render(snapshot).map_err(TemplateError::Render)
}
