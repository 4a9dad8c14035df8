//! Process-wide template registry.
//!
//! Templates are read from a directory into a [`minijinja::Environment`].
//! With [`ReloadPolicy::Once`] they are parsed at startup and served from
//! memory. With [`ReloadPolicy::EveryRender`] the directory is re-read before
//! each render, so edits show up without a restart. A reload builds a fresh
//! environment and swaps it in; renders already holding the previous one
//! finish against it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use minijinja::Environment;
use serde::Serialize;

use crate::config::RunMode;

/// Name of the summary page template.
pub const SUMMARY_TEMPLATE: &str = "summary.html";

const TEMPLATE_EXTENSION: &str = "html";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to read templates from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] minijinja::Error),

    #[error("Template registry lock poisoned")]
    Poisoned,
}

/// When the registry goes back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPolicy {
    Once,
    EveryRender,
}

impl From<RunMode> for ReloadPolicy {
    fn from(mode: RunMode) -> Self {
        match mode {
            RunMode::Development => Self::EveryRender,
            RunMode::Production => Self::Once,
        }
    }
}

struct LoadedTemplates {
    env: Environment<'static>,
    names: Vec<String>,
}

pub struct TemplateRegistry {
    dir: PathBuf,
    policy: ReloadPolicy,
    current: RwLock<Arc<LoadedTemplates>>,
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("dir", &self.dir)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl TemplateRegistry {
    /// Read every template under `dir`. Fails fast on I/O or syntax errors.
    pub fn load(dir: impl Into<PathBuf>, policy: ReloadPolicy) -> Result<Self, TemplateError> {
        let dir = dir.into();
        let loaded = load_dir(&dir)?;
        tracing::info!(
            dir = %dir.display(),
            templates = loaded.names.len(),
            ?policy,
            "Templates loaded"
        );
        Ok(Self {
            dir,
            policy,
            current: RwLock::new(Arc::new(loaded)),
        })
    }

    /// Re-read the template directory and replace the active set.
    pub fn reload(&self) -> Result<(), TemplateError> {
        let loaded = Arc::new(load_dir(&self.dir)?);
        let mut guard = self.current.write().map_err(|_| TemplateError::Poisoned)?;
        *guard = loaded;
        Ok(())
    }

    pub fn contains(&self, name: &str) -> Result<bool, TemplateError> {
        Ok(self.snapshot()?.names.iter().any(|n| n == name))
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, TemplateError> {
        if self.policy == ReloadPolicy::EveryRender {
            self.reload()?;
        }
        let loaded = self.snapshot()?;
        let template = loaded.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }

    fn snapshot(&self) -> Result<Arc<LoadedTemplates>, TemplateError> {
        self.current
            .read()
            .map(|guard| Arc::clone(&guard))
            .map_err(|_| TemplateError::Poisoned)
    }
}

fn load_dir(dir: &Path) -> Result<LoadedTemplates, TemplateError> {
    let io_err = |source| TemplateError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut env = Environment::new();
    env.add_filter("duration", format_duration);
    env.add_filter("percent", percent_of);

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
        {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let source = std::fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        env.add_template_owned(name.clone(), source)?;
        names.push(name);
    }
    names.sort();

    Ok(LoadedTemplates { env, names })
}

/// `3725` -> `"1h 02m"`, `125` -> `"2m"`, `20` -> `"0m"`.
fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}

fn percent_of(value: i64, total: i64) -> String {
    if total <= 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", value as f64 * 100.0 / total as f64)
}
