use std::env::current_exe;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str;
use std::sync::{Arc, Mutex};
use directories_next::ProjectDirs;
use fd_lock::{RwLock, RwLockWriteGuard};
use log::{debug, info, warn};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::config::types::Config;
use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "hw-connect.json";

/// Where the config file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Passed on the command line.
    Explicit,
    /// Next to the executable, for installs on removable media.
    Portable,
    /// The OS config directory, such as %AppData% on windows.
    Local,
}

// F:\hw-connect.exe => F:\hw-connect.json
fn portable_config_path() -> Option<PathBuf> {
    let mut path = current_exe()
        .map_err(|err| warn!("Failed to get current exe path: {:?}", err))
        .ok()?;

    if !path.set_extension("json") {
        warn!("Current exe has no file name: {}", path.to_string_lossy());
        return None;
    }
    Some(path)
}

fn local_config_path() -> Option<PathBuf> {
    ProjectDirs::from("so", "onekey", "hw-connect").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn is_existing_file(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(attr) => attr.is_file(),
        Err(err) => {
            debug!("No portable config at {} ({:?})", path.to_string_lossy(), err);
            false
        },
    }
}

fn resolve_config_path(explicit: Option<PathBuf>) -> Result<(PathBuf, ConfigLocation), ConfigError> {
    if let Some(path) = explicit {
        return Ok((path, ConfigLocation::Explicit));
    }

    // the portable file is only used when somebody put it there
    if let Some(path) = portable_config_path().filter(|path| is_existing_file(path)) {
        return Ok((path, ConfigLocation::Portable));
    }

    local_config_path()
        .map(|path| (path, ConfigLocation::Local))
        .ok_or(ConfigError::NoConfigPath)
}

fn parse_config(content: &[u8]) -> Result<Config, ConfigError> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Config::default());
    }

    let mut config: Config = serde_json::from_str(str::from_utf8(content)?)?;
    config.normalize();
    Ok(config)
}

pub struct ConfigIOLocker {
    rw_lock: RwLock<std::fs::File>,
}

impl ConfigIOLocker {
    /// Fails if another process holds the lock, so only one scanner talks to the devices at once.
    pub fn lock(&mut self) -> Result<RwLockWriteGuard<std::fs::File>, ConfigError> {
        self.rw_lock.try_write().map_err(|source| ConfigError::CanNotLock { source })
    }
}

#[derive(Clone)]
pub struct ConfigIO {
    path: PathBuf,
    location: ConfigLocation,
    file: Arc<Mutex<std::fs::File>>,
}

impl ConfigIO {
    /// Opens the config file at `explicit`, or at the portable or local default location.
    pub fn open_sync(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let (path, location) = resolve_config_path(explicit)?;
        info!("Using {:?} config file {}", location, path.to_string_lossy());

        if let Some(directory) = path.parent().filter(|directory| !directory.as_os_str().is_empty()) {
            std::fs::create_dir_all(directory)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(false)
            .create(true)
            .open(&path)?;

        Ok(ConfigIO { path, location, file: Arc::new(Mutex::new(file)) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn location(&self) -> ConfigLocation {
        self.location
    }

    fn clone_file(&self) -> Result<std::fs::File, ConfigError> {
        let file = self.file.lock().expect("Failed to lock config file");
        Ok(file.try_clone()?)
    }

    pub fn locker(&self) -> Result<ConfigIOLocker, ConfigError> {
        Ok(ConfigIOLocker { rw_lock: RwLock::new(self.clone_file()?) })
    }

    // shares the descriptor (and its lock) with self, so it must never be closed early
    fn async_file(&self) -> Result<File, ConfigError> {
        Ok(File::from_std(self.clone_file()?))
    }

    pub async fn read(&self) -> Result<Config, ConfigError> {
        let mut file = self.async_file()?;
        debug!("Reading config file {}", self.path.to_string_lossy());

        let mut content = vec![];
        file.rewind().await?;
        file.read_to_end(&mut content).await?;
        parse_config(&content)
    }

    pub async fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let mut file = self.async_file()?;
        info!("Saving config to {}", self.path.to_string_lossy());

        let content = serde_json::to_string_pretty(config)?;
        file.rewind().await?;
        file.set_len(0).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
