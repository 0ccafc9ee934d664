use std::env;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "FINSTRIDE_DATA_DIR";
pub const DB_FILE_NAME: &str = "finstride.db";
const APP_DIR_NAME: &str = "finstride";

/// Where the database lives for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Explicit flag first, then the environment, then the platform data
    /// directory. Falls back to the working directory when the platform has
    /// no data directory.
    pub fn resolve(flag: Option<PathBuf>) -> Self {
        Self::resolve_with(flag, env::var_os(DATA_DIR_ENV).map(PathBuf::from), dirs::data_dir())
    }

    fn resolve_with(flag: Option<PathBuf>, from_env: Option<PathBuf>, platform: Option<PathBuf>) -> Self {
        let data_dir = flag
            .or(from_env.filter(|p| !p.as_os_str().is_empty()))
            .unwrap_or_else(|| {
                platform
                    .map(|dir| dir.join(APP_DIR_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
            });
        Self { data_dir }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
