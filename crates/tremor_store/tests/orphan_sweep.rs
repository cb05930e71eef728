use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;

use tremor_store::{
    Forecast, InjectionWell, ModelError, Project, SeismicCatalog, SeismicEvent, open_store,
};

fn dt(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap()
}

fn catalog(hours: &[u32]) -> SeismicCatalog {
    SeismicCatalog::new(hours.iter().map(|h| SeismicEvent::at(dt(*h))).collect())
}

#[tokio::test]
async fn deleting_a_forecast_sweeps_its_orphaned_snapshots() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await.expect("open store");

    let mut project = Project::new("sweep");
    project.seismiccatalogs.push(catalog(&[1, 2, 3]));
    project
        .wells
        .push(InjectionWell::new("smi:well/observed", Vec::new()));
    let project_id = store.save_project(&mut project).await.expect("save project");

    let mut forecast = Forecast::new("fc", dt(6), dt(12));
    forecast.seismiccatalog = Some(catalog(&[1, 2]));
    forecast.well = Some(InjectionWell::new("smi:well/snapshot", Vec::new()));
    let forecast_id = store
        .save_forecast(project_id, &mut forecast)
        .await
        .expect("save forecast");

    store.delete_forecast(forecast_id).await.expect("delete forecast");

    // The forecast is gone together with its orphaned snapshots; the
    // project-owned records survive.
    let err = store.load_forecast(forecast_id).await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound { .. }));

    let loaded = store.load_project(project_id).await.expect("load project");
    assert!(loaded.forecasts.is_empty());
    assert_eq!(loaded.seismiccatalogs.len(), 1);
    assert_eq!(loaded.seismiccatalogs[0].events.len(), 3);
    assert_eq!(loaded.wells.len(), 1);

    // Nothing left for a second sweep.
    assert_eq!(store.sweep_orphans().await.expect("sweep"), 0);
}

#[tokio::test]
async fn multi_parent_records_survive_while_one_owner_remains() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await.expect("open store");

    let mut project = Project::new("shared");
    project.seismiccatalogs.push(catalog(&[1]));
    let project_id = store.save_project(&mut project).await.expect("save project");

    // Attach the saved catalog to a forecast as well, so the row carries
    // two owner references.
    let catalog_id = project.seismiccatalogs[0].id.expect("catalog id");
    let mut forecast = Forecast::new("fc", dt(6), dt(12));
    let mut shared = catalog(&[1]);
    shared.id = Some(catalog_id);
    shared.project_id = Some(project_id);
    shared.events[0].id = project.seismiccatalogs[0].events[0].id;
    forecast.seismiccatalog = Some(shared);
    let forecast_id = store
        .save_forecast(project_id, &mut forecast)
        .await
        .expect("save forecast");

    // Dropping one owner keeps the record alive for the other.
    store.delete_forecast(forecast_id).await.expect("delete forecast");
    let loaded = store.load_project(project_id).await.expect("load project");
    assert_eq!(loaded.seismiccatalogs.len(), 1);

    // Dropping the last owner removes it.
    store.delete_project(project_id).await.expect("delete project");
    assert!(store.list_projects().await.expect("list").is_empty());
    assert_eq!(store.sweep_orphans().await.expect("sweep"), 0);
}
