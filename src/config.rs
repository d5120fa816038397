use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Env var that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "KUBECTL_GUARD_CONFIG";

/// Default location relative to `$HOME`.
const DEFAULT_RELATIVE_PATH: &str = ".kube/guard.toml";

/// The protection list.
///
/// Entries keep insertion order and context names are unique; use
/// [`Config::add_context`] rather than pushing to `guarded_contexts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub guarded_contexts: Vec<GuardedContext>,
}

/// A protected kubectl context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GuardedContext {
    pub name: String,
    /// Empty means every namespace in the context is protected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
}

impl GuardedContext {
    pub fn new(name: impl Into<String>, namespaces: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespaces,
        }
    }

    /// Whether this entry protects all namespaces.
    pub fn covers_all_namespaces(&self) -> bool {
        self.namespaces.is_empty()
    }
}

impl Config {
    /// Resolve the config path: `$KUBECTL_GUARD_CONFIG` (tilde-expanded) if
    /// set, otherwise `~/.kube/guard.toml`.
    pub fn path() -> Result<PathBuf> {
        if let Some(custom) = std::env::var_os(CONFIG_ENV_VAR)
            && !custom.is_empty()
        {
            let custom = custom.to_string_lossy();
            return Ok(PathBuf::from(shellexpand::tilde(&custom).as_ref()));
        }
        let home = std::env::var_os("HOME").ok_or(Error::NoHomeDir)?;
        Ok(Path::new(&home).join(DEFAULT_RELATIVE_PATH))
    }

    /// Load from the resolved default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`. A missing file yields an empty config; a file that
    /// exists but does not parse is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save to the resolved default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save to `path`, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|source| Error::ConfigWrite {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let data = toml::to_string_pretty(self)?;
        std::fs::write(path, data).map_err(|source| Error::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    fn find(&self, context: &str) -> Option<&GuardedContext> {
        self.guarded_contexts.iter().find(|gc| gc.name == context)
    }

    /// Whether `context` has an entry.
    pub fn is_guarded(&self, context: &str) -> bool {
        self.find(context).is_some()
    }

    /// Whether `namespace` is protected under `context`.
    pub fn is_namespace_guarded(&self, context: &str, namespace: &str) -> bool {
        match self.find(context) {
            Some(gc) => {
                gc.covers_all_namespaces() || gc.namespaces.iter().any(|ns| ns == namespace)
            }
            None => false,
        }
    }

    /// Protect `context`. An existing entry has its namespace list replaced
    /// in place; otherwise a new entry is appended.
    pub fn add_context(&mut self, context: &str, namespaces: Vec<String>) {
        if let Some(gc) = self.guarded_contexts.iter_mut().find(|gc| gc.name == context) {
            gc.namespaces = namespaces;
            return;
        }
        self.guarded_contexts.push(GuardedContext::new(context, namespaces));
    }

    /// Remove protection from `context`. Returns false if it was not guarded.
    pub fn remove_context(&mut self, context: &str) -> bool {
        let before = self.guarded_contexts.len();
        self.guarded_contexts.retain(|gc| gc.name != context);
        self.guarded_contexts.len() != before
    }
}
