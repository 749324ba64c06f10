use std::env;
use std::path::PathBuf;

use log::{debug, info};

pub const STORE_ENV: &str = "GROWTHLINK_STORE";

pub struct Config {
    pub store_path: PathBuf,
}

impl Config {
    /// Flag first, then `GROWTHLINK_STORE`, then the platform data directory.
    pub fn load(store_flag: Option<PathBuf>) -> Self {
        let store_path = resolve_store_path(store_flag, env::var(STORE_ENV).ok());
        debug!("store path resolved to {}", store_path.display());
        Self { store_path }
    }
}

fn resolve_store_path(flag: Option<PathBuf>, from_env: Option<String>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    match from_env {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => {
            info!("{} not set, using default store location", STORE_ENV);
            default_path()
        }
    }
}

fn default_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "growthlink") {
        proj_dirs.data_dir().join("growthlink.db")
    } else {
        PathBuf::from("growthlink.db")
    }
}
