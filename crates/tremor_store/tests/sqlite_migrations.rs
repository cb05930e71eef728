use tempfile::tempdir;

use tremor_store::{StoreConfig, load_or_init_config, open_store};

#[tokio::test]
async fn migrations_apply_on_fresh_sqlite() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();

    let config = load_or_init_config(base).expect("config");
    assert_eq!(config.backend_name(), "sqlite");

    let store = open_store(base).await.expect("open store");
    assert_eq!(store.backend_name(), "sqlite");
    assert!(tremor_store::default_sqlite_path(base).exists());

    // Reconnecting against the migrated file is a no-op.
    let store = open_store(base).await.expect("reopen store");
    assert_eq!(store.list_projects().await.expect("list").len(), 0);
}

#[tokio::test]
async fn config_file_is_created_and_reused() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();

    let first = load_or_init_config(base).expect("init config");
    let second = load_or_init_config(base).expect("reload config");
    assert_eq!(first.backend_name(), second.backend_name());

    let explicit = StoreConfig::default_sqlite(base.join("elsewhere.sqlite").to_string_lossy());
    assert_eq!(explicit.backend_name(), "sqlite");
}
