use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::local_storage::FileStorage;

const STORAGE_FILE: &str = "storage.json";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("AEG_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("aeg").join("admin")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Client-side key/value state (theme, cached session) kept between runs
pub fn local_storage() -> anyhow::Result<Arc<FileStorage>> {
    let config_dir = get_config_dir()?;
    Ok(Arc::new(FileStorage::new(config_dir.join(STORAGE_FILE))))
}
