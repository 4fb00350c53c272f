use crate::errors::*;
use chrono::Duration;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Width of the request fingerprint used for deduplication.
pub const REQUEST_HASH_LEN: usize = 12;
/// Width of the content hash addressing a package set.
pub const PACKAGES_HASH_LEN: usize = 12;

/// A worker whose last heartbeat is older than this is not counted as live
/// when computing unmet demand. Eviction policy stays with the caller.
pub const WORKER_STALE_SECS: i64 = 300;
pub const HEARTBEAT_INTERVAL: u64 = 60;

pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<ConfigFile> {
    let mut config = ConfigFile::default();

    if let Some(c) = load_from("/etc/imagerd.conf")? {
        config.update(c);
    }

    if let Ok(path) = config_path() {
        if let Some(c) = load_from(path)? {
            config.update(c);
        }
    }

    if let Some(path) = path {
        let c = load_from(path)?.ok_or_else(|| format_err!("Failed to read config file"))?;
        config.update(c);
    }

    Ok(config)
}

fn config_path() -> Result<PathBuf> {
    let config_dir =
        dirs_next::config_dir().ok_or_else(|| format_err!("Failed to find config dir"))?;
    Ok(config_dir.join("imagerd.conf"))
}

fn load_from<P: AsRef<Path>>(path: P) -> Result<Option<ConfigFile>> {
    if let Ok(buf) = fs::read_to_string(path.as_ref()) {
        debug!("loading config file {:?}", path.as_ref());
        let config = toml::from_str(&buf).context("Failed to load config")?;
        Ok(Some(config))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl ConfigFile {
    pub fn update(&mut self, other: ConfigFile) {
        if other.database.path.is_some() {
            self.database.path = other.database.path;
        }
        if other.worker.stale_after_secs.is_some() {
            self.worker.stale_after_secs = other.worker.stale_after_secs;
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

impl DatabaseConfig {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("imagerd.db")
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct WorkerConfig {
    pub stale_after_secs: Option<i64>,
}

impl WorkerConfig {
    pub fn stale_after(&self) -> Duration {
        Duration::seconds(self.stale_after_secs.unwrap_or(WORKER_STALE_SECS))
    }
}
