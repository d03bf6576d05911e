//! Environment-backed configuration provider.
//!
//! `ConfigService` is a read-only snapshot of key/value settings taken once at
//! startup from an optional `.env` file and the process environment. It is
//! shared as an `Arc<ConfigService>` with every component that needs settings,
//! instead of living in global mutable state. The process environment itself is
//! never modified.

use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Default env file, resolved relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Controls where `ConfigService::load` reads settings from.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Env file to read. `None` means [`DEFAULT_ENV_FILE`].
    pub env_file_path: Option<PathBuf>,
    /// Skip the env file entirely and read only the process environment.
    pub ignore_env_file: bool,
}

impl ConfigOptions {
    fn env_file(&self) -> PathBuf {
        self.env_file_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE))
    }
}

/// Immutable key/value view over environment-derived settings.
#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    values: HashMap<String, String>,
}

impl ConfigService {
    /// Loads settings from the env file (if any) and the process environment.
    ///
    /// Variables already present in the process environment win over values
    /// from the file. A missing env file is not an error; a malformed one is.
    pub fn load(options: &ConfigOptions) -> Result<Self> {
        Self::load_with(options, process_vars())
    }

    #[instrument(skip(process))]
    pub(crate) fn load_with<I>(options: &ConfigOptions, process: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut values = HashMap::new();

        if options.ignore_env_file {
            debug!("Env file ignored, reading process environment only");
        } else {
            let path = options.env_file();
            let loaded = read_env_file(&path, &mut values)?;
            if loaded {
                info!("Loaded {} entries from {:?}", values.len(), path);
            } else {
                debug!("No env file at {:?}, continuing without it", path);
            }
        }

        values.extend(process);
        Ok(Self { values })
    }

    /// Builds a service from explicit pairs, without looking at the environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value for `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or `default` when the key is absent.
    ///
    /// An empty value counts as set and is returned as-is.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Returns the value for `key` or a [`Error::MissingEnv`].
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::MissingEnv {
            key: key.to_string(),
        })
    }

    /// Whether `key` is set, even to an empty value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Reads `path` into `values`. Returns `false` when the file does not exist.
fn read_env_file(path: &Path, values: &mut HashMap<String, String>) -> Result<bool> {
    let env_file_error = |source| Error::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(false),
        Err(e) => return Err(env_file_error(e)),
    };

    for item in iter {
        let (key, value) = item.map_err(env_file_error)?;
        values.insert(key, value);
    }
    Ok(true)
}

/// Process environment, skipping entries that are not valid UTF-8.
fn process_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
}
