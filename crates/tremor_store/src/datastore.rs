use std::path::{Path, PathBuf};

use tremor_core::ModelResult;

use crate::{ProjectStore, StoreConfig};

const DEFAULT_DB_NAME: &str = "tremor.sqlite";

pub fn load_or_init_config(base: &Path) -> ModelResult<StoreConfig> {
    let default_sqlite = base.join(DEFAULT_DB_NAME);
    StoreConfig::load_or_init(base, &default_sqlite)
}

pub async fn open_store(base: &Path) -> ModelResult<ProjectStore> {
    let config = load_or_init_config(base)?;
    ProjectStore::connect(&config, base).await
}

pub fn default_sqlite_path(base: &Path) -> PathBuf {
    base.join(DEFAULT_DB_NAME)
}
