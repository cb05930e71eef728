use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{
    Expr, InsertStatement, PostgresQueryBuilder, Query, QueryStatementWriter, SimpleExpr,
    SqliteQueryBuilder, Value as SeaValue,
};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, QueryResult, Statement, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use sea_orm_migration::prelude::Iden;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::StoreConfig;
use crate::config::DatabaseConfig;
use crate::db::*;
use crate::migration::Migrator;
use tremor_core::{
    CreationInfo, Epoch, Forecast, ForecastScenario, ForecastStage, GeoPoint, HazardCurve,
    HazardMap, HazardModel, HazardModelRun, HazardPointValue, HydraulicSample, Hydraulics,
    InjectionPlan, InjectionWell, ModelError, ModelKind, ModelResult, Project, ProjectSettings,
    RecordId, ReservoirSeismicityPrediction, RiskModelRun, RunState, SeismicCatalog, SeismicEvent,
    SeismicityModel, SeismicityModelRun, SeismicityPredictionBin, Signal, SkillTest, StagePayload,
    Status, TimeQuantity, WellSection,
};

const SERIES_KIND_HYDRAULICS: i16 = 1;
const SERIES_KIND_INJECTION_PLAN: i16 = 2;

/// Which owner a status row belongs to. Exactly one owner column is set.
#[derive(Clone, Copy, Debug)]
enum StatusOwner {
    Run(RecordId),
    Stage(RecordId),
    Scenario(RecordId),
    Forecast(RecordId),
}

/// Relational store for the forecasting data model.
///
/// Every public operation runs in one transaction. Deleting an owner of a
/// multi-parent record (seismic catalog, injection well) only detaches the
/// owner reference; the orphan sweep at the end of each delete transaction
/// removes records no owner references anymore.
pub struct ProjectStore {
    conn: DatabaseConnection,
    backend: DatabaseBackend,
}

impl ProjectStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(config: &StoreConfig, base_dir: &Path) -> ModelResult<Self> {
        let url = build_connection_url(config, base_dir)?;
        let mut options = ConnectOptions::new(url);
        if let Some(pool) = &config.pool {
            if let Some(max) = pool.max_connections {
                options.max_connections(max);
            }
            if let Some(min) = pool.min_connections {
                options.min_connections(min);
            }
            if let Some(timeout_ms) = pool.connect_timeout_ms {
                options.connect_timeout(Duration::from_millis(timeout_ms));
            }
            if let Some(timeout_ms) = pool.acquire_timeout_ms {
                options.acquire_timeout(Duration::from_millis(timeout_ms));
            }
            if let Some(timeout_ms) = pool.idle_timeout_ms {
                options.idle_timeout(Duration::from_millis(timeout_ms));
            }
        }
        let conn = Database::connect(options).await.map_err(db_err)?;
        Migrator::up(&conn, None).await.map_err(db_err)?;
        let backend = conn.get_database_backend();
        Ok(Self { conn, backend })
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            DatabaseBackend::Postgres => "postgres",
            _ => "sqlite",
        }
    }

    // ------------------------------------------------------------------
    // Projects

    /// Persist the project and its whole tree, assigning fresh ids to
    /// unsaved records.
    pub async fn save_project(&self, project: &mut Project) -> ModelResult<RecordId> {
        let tx = self.conn.begin().await.map_err(db_err)?;

        let project_id = match project.id {
            Some(id) => {
                let update = Query::update()
                    .table(Projects::Table)
                    .values([
                        (Projects::Name, project.name.clone().into()),
                        (Projects::Description, project.description.clone().into()),
                        (Projects::Starttime, project.starttime.into()),
                        (Projects::Endtime, project.endtime.into()),
                        (
                            Projects::ReferencepointJson,
                            json_value(&project.referencepoint)?,
                        ),
                    ])
                    .and_where(Expr::col(Projects::Id).eq(id.as_i64()))
                    .to_owned();
                exec(&tx, &update).await?;
                id
            }
            None => {
                let insert = Query::insert()
                    .into_table(Projects::Table)
                    .columns([
                        Projects::Name,
                        Projects::Description,
                        Projects::Starttime,
                        Projects::Endtime,
                        Projects::ReferencepointJson,
                    ])
                    .values_panic([
                        project.name.clone().into(),
                        project.description.clone().into(),
                        project.starttime.into(),
                        project.endtime.into(),
                        json_value(&project.referencepoint)?,
                    ])
                    .to_owned();
                let id = insert_returning_id(&tx, insert, Projects::Id).await?;
                project.id = Some(id);
                id
            }
        };

        project.settings.project_id = Some(project_id);
        project.settings.commit();
        save_settings(&tx, &mut project.settings).await?;

        for catalog in &mut project.seismiccatalogs {
            catalog.project_id = Some(project_id);
            save_catalog(&tx, catalog).await?;
        }
        for well in &mut project.wells {
            well.project_id = Some(project_id);
            save_well(&tx, well).await?;
        }
        for forecast in &mut project.forecasts {
            forecast.project_id = Some(project_id);
            save_forecast_tree(&tx, forecast).await?;
        }

        tx.commit().await.map_err(db_err)?;
        log::debug!("saved project {project_id}");
        Ok(project_id)
    }

    pub async fn load_project(&self, id: RecordId) -> ModelResult<Project> {
        let select = Query::select()
            .from(Projects::Table)
            .columns([
                Projects::Id,
                Projects::Name,
                Projects::Description,
                Projects::Starttime,
                Projects::Endtime,
                Projects::ReferencepointJson,
            ])
            .and_where(Expr::col(Projects::Id).eq(id.as_i64()))
            .limit(1)
            .to_owned();
        let row = query_one(&self.conn, &select)
            .await?
            .ok_or_else(|| ModelError::not_found(format!("project {id}")))?;

        let mut project = Project::new(read_string(&row, Projects::Name)?);
        project.id = Some(read_id(&row, Projects::Id)?);
        project.description = read_opt_string(&row, Projects::Description)?;
        project.starttime = read_datetime(&row, Projects::Starttime)?;
        project.endtime = read_opt_datetime(&row, Projects::Endtime)?;
        if let Some(point) = read_json(&row, Projects::ReferencepointJson)? {
            project.referencepoint = point;
        }
        project.update_project_time(project.starttime);
        project.settings = load_settings(&self.conn, id).await?;
        project.seismiccatalogs =
            load_catalogs_by_owner(&self.conn, SeismicCatalogs::ProjectId, id).await?;
        project.wells = load_wells_by_owner(&self.conn, InjectionWells::ProjectId, id).await?;

        let forecast_ids =
            select_ids(&self.conn, Forecasts::Table, Forecasts::Id, Forecasts::ProjectId, &[
                id.as_i64(),
            ])
            .await?;
        for forecast_id in forecast_ids {
            project
                .forecasts
                .push(load_forecast_tree(&self.conn, RecordId(forecast_id)).await?);
        }
        Ok(project)
    }

    pub async fn list_projects(&self) -> ModelResult<Vec<(RecordId, String)>> {
        let select = Query::select()
            .from(Projects::Table)
            .columns([Projects::Id, Projects::Name])
            .to_owned();
        let rows = query_all(&self.conn, &select).await?;
        rows.iter()
            .map(|row| Ok((read_id(row, Projects::Id)?, read_string(row, Projects::Name)?)))
            .collect()
    }

    /// Delete the project with its settings and forecasts. Catalogs and
    /// wells are detached and left to the orphan sweep.
    pub async fn delete_project(&self, id: RecordId) -> ModelResult<()> {
        let tx = self.conn.begin().await.map_err(db_err)?;

        let forecast_ids =
            select_ids(&tx, Forecasts::Table, Forecasts::Id, Forecasts::ProjectId, &[id.as_i64()])
                .await?;
        for forecast_id in &forecast_ids {
            delete_forecast_tx(&tx, RecordId(*forecast_id)).await?;
        }

        delete_where_in(&tx, Settings::Table, Settings::ProjectId, &[id.as_i64()]).await?;
        detach_where_in(&tx, SeismicCatalogs::Table, SeismicCatalogs::ProjectId, &[id.as_i64()])
            .await?;
        detach_where_in(&tx, InjectionWells::Table, InjectionWells::ProjectId, &[id.as_i64()])
            .await?;
        delete_where_in(&tx, Projects::Table, Projects::Id, &[id.as_i64()]).await?;

        let swept = sweep_orphans_tx(&tx).await?;
        tx.commit().await.map_err(db_err)?;
        log::info!("deleted project {id}, swept {swept} orphaned records");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Forecasts

    /// Persist a forecast tree under an already saved project.
    pub async fn save_forecast(
        &self,
        project_id: RecordId,
        forecast: &mut Forecast,
    ) -> ModelResult<RecordId> {
        let tx = self.conn.begin().await.map_err(db_err)?;
        forecast.project_id = Some(project_id);
        save_forecast_tree(&tx, forecast).await?;
        tx.commit().await.map_err(db_err)?;
        forecast
            .id
            .ok_or_else(|| ModelError::storage("forecast id missing after save"))
    }

    pub async fn load_forecast(&self, id: RecordId) -> ModelResult<Forecast> {
        load_forecast_tree(&self.conn, id).await
    }

    /// Delete a forecast tree. Its catalog/well snapshots are detached and
    /// swept once no other owner holds them.
    pub async fn delete_forecast(&self, id: RecordId) -> ModelResult<()> {
        let tx = self.conn.begin().await.map_err(db_err)?;
        delete_forecast_tx(&tx, id).await?;
        let swept = sweep_orphans_tx(&tx).await?;
        tx.commit().await.map_err(db_err)?;
        log::info!("deleted forecast {id}, swept {swept} orphaned records");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Model templates

    pub async fn save_seismicity_model(&self, model: &mut SeismicityModel) -> ModelResult<RecordId> {
        let tx = self.conn.begin().await.map_err(db_err)?;
        let id = save_model_row(
            &tx,
            model.id,
            ModelKind::Seismicity,
            &model.name,
            model.enabled,
            &model.config,
            model.url.as_deref(),
            [
                (Models::Sfmwid, model.sfmwid.clone().into()),
                (Models::Logictreetemplate, SeaValue::String(None).into()),
                (Models::Jobconfigfile, SeaValue::String(None).into()),
                (Models::Gmpefile, SeaValue::String(None).into()),
            ],
        )
        .await?;
        model.id = Some(id);
        tx.commit().await.map_err(db_err)?;
        Ok(id)
    }

    pub async fn save_hazard_model(&self, model: &mut HazardModel) -> ModelResult<RecordId> {
        let tx = self.conn.begin().await.map_err(db_err)?;
        let id = save_model_row(
            &tx,
            model.id,
            ModelKind::Hazard,
            &model.name,
            model.enabled,
            &model.config,
            model.url.as_deref(),
            [
                (Models::Sfmwid, SeaValue::String(None).into()),
                (Models::Logictreetemplate, model.logictreetemplate.clone().into()),
                (Models::Jobconfigfile, model.jobconfigfile.clone().into()),
                (Models::Gmpefile, model.gmpefile.clone().into()),
            ],
        )
        .await?;
        model.id = Some(id);
        tx.commit().await.map_err(db_err)?;
        Ok(id)
    }

    pub async fn list_seismicity_models(&self) -> ModelResult<Vec<SeismicityModel>> {
        let rows = model_rows(&self.conn, ModelKind::Seismicity).await?;
        rows.iter()
            .map(|row| {
                Ok(SeismicityModel {
                    id: Some(read_id(row, Models::Id)?),
                    name: read_string(row, Models::Name)?,
                    config: read_json(row, Models::ConfigJson)?.unwrap_or_default(),
                    enabled: read_bool(row, Models::Enabled)?,
                    url: read_opt_string(row, Models::Url)?,
                    sfmwid: read_opt_string(row, Models::Sfmwid)?,
                })
            })
            .collect()
    }

    pub async fn list_hazard_models(&self) -> ModelResult<Vec<HazardModel>> {
        let rows = model_rows(&self.conn, ModelKind::Hazard).await?;
        rows.iter()
            .map(|row| {
                Ok(HazardModel {
                    id: Some(read_id(row, Models::Id)?),
                    name: read_string(row, Models::Name)?,
                    config: read_json(row, Models::ConfigJson)?.unwrap_or_default(),
                    enabled: read_bool(row, Models::Enabled)?,
                    url: read_opt_string(row, Models::Url)?,
                    logictreetemplate: read_opt_string(row, Models::Logictreetemplate)?,
                    jobconfigfile: read_opt_string(row, Models::Jobconfigfile)?,
                    gmpefile: read_opt_string(row, Models::Gmpefile)?,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Orphans

    /// Remove multi-parent records no owner references anymore. Runs
    /// automatically at the end of each delete transaction; callable
    /// directly for manual housekeeping.
    pub async fn sweep_orphans(&self) -> ModelResult<u64> {
        let tx = self.conn.begin().await.map_err(db_err)?;
        let swept = sweep_orphans_tx(&tx).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(swept)
    }
}

// ----------------------------------------------------------------------
// Save

async fn save_settings(
    tx: &DatabaseTransaction,
    settings: &mut ProjectSettings,
) -> ModelResult<()> {
    let config: SimpleExpr = settings.serialized().map(str::to_owned).into();
    match settings.id {
        Some(id) => {
            let update = Query::update()
                .table(Settings::Table)
                .values([
                    (Settings::ProjectId, rid_value(settings.project_id)),
                    (Settings::Updated, settings.updated.into()),
                    (Settings::Config, config),
                ])
                .and_where(Expr::col(Settings::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(Settings::Table)
                .columns([
                    Settings::ProjectId,
                    Settings::Kind,
                    Settings::Updated,
                    Settings::Config,
                ])
                .values_panic([
                    rid_value(settings.project_id),
                    "project".into(),
                    settings.updated.into(),
                    config,
                ])
                .to_owned();
            settings.id = Some(insert_returning_id(tx, insert, Settings::Id).await?);
        }
    }
    Ok(())
}

async fn save_catalog(tx: &DatabaseTransaction, catalog: &mut SeismicCatalog) -> ModelResult<()> {
    match catalog.id {
        Some(id) => {
            let update = Query::update()
                .table(SeismicCatalogs::Table)
                .values([
                    (SeismicCatalogs::ProjectId, rid_value(catalog.project_id)),
                    (SeismicCatalogs::ForecastId, rid_value(catalog.forecast_id)),
                    (SeismicCatalogs::SkilltestId, rid_value(catalog.skilltest_id)),
                    (
                        SeismicCatalogs::CreationinfoJson,
                        json_value(&catalog.creationinfo)?,
                    ),
                ])
                .and_where(Expr::col(SeismicCatalogs::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(SeismicCatalogs::Table)
                .columns([
                    SeismicCatalogs::ProjectId,
                    SeismicCatalogs::ForecastId,
                    SeismicCatalogs::SkilltestId,
                    SeismicCatalogs::CreationinfoJson,
                ])
                .values_panic([
                    rid_value(catalog.project_id),
                    rid_value(catalog.forecast_id),
                    rid_value(catalog.skilltest_id),
                    json_value(&catalog.creationinfo)?,
                ])
                .to_owned();
            catalog.id = Some(insert_returning_id(tx, insert, SeismicCatalogs::Id).await?);
        }
    }

    let catalog_id = catalog.id;
    for event in &mut catalog.events {
        event.catalog_id = catalog_id;
        save_event(tx, event).await?;
    }
    Ok(())
}

async fn save_event(tx: &DatabaseTransaction, event: &mut SeismicEvent) -> ModelResult<()> {
    match event.id {
        Some(id) => {
            let update = Query::update()
                .table(SeismicEvents::Table)
                .values([
                    (SeismicEvents::CatalogId, rid_value(event.catalog_id)),
                    (SeismicEvents::Quakeml, event.quakeml.clone().into()),
                    (SeismicEvents::DatetimeJson, json_value(&event.datetime)?),
                    (SeismicEvents::XJson, opt_json_value(&event.x)?),
                    (SeismicEvents::YJson, opt_json_value(&event.y)?),
                    (SeismicEvents::ZJson, opt_json_value(&event.z)?),
                    (SeismicEvents::MagnitudeJson, opt_json_value(&event.magnitude)?),
                ])
                .and_where(Expr::col(SeismicEvents::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(SeismicEvents::Table)
                .columns([
                    SeismicEvents::CatalogId,
                    SeismicEvents::Quakeml,
                    SeismicEvents::DatetimeJson,
                    SeismicEvents::XJson,
                    SeismicEvents::YJson,
                    SeismicEvents::ZJson,
                    SeismicEvents::MagnitudeJson,
                ])
                .values_panic([
                    rid_value(event.catalog_id),
                    event.quakeml.clone().into(),
                    json_value(&event.datetime)?,
                    opt_json_value(&event.x)?,
                    opt_json_value(&event.y)?,
                    opt_json_value(&event.z)?,
                    opt_json_value(&event.magnitude)?,
                ])
                .to_owned();
            event.id = Some(insert_returning_id(tx, insert, SeismicEvents::Id).await?);
        }
    }
    Ok(())
}

async fn save_well(tx: &DatabaseTransaction, well: &mut InjectionWell) -> ModelResult<()> {
    match well.id {
        Some(id) => {
            let update = Query::update()
                .table(InjectionWells::Table)
                .values([
                    (InjectionWells::ProjectId, rid_value(well.project_id)),
                    (InjectionWells::ForecastId, rid_value(well.forecast_id)),
                    (InjectionWells::ScenarioId, rid_value(well.scenario_id)),
                    (InjectionWells::Publicid, well.publicid.clone().into()),
                    (
                        InjectionWells::CreationinfoJson,
                        json_value(&well.creationinfo)?,
                    ),
                ])
                .and_where(Expr::col(InjectionWells::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(InjectionWells::Table)
                .columns([
                    InjectionWells::ProjectId,
                    InjectionWells::ForecastId,
                    InjectionWells::ScenarioId,
                    InjectionWells::Publicid,
                    InjectionWells::CreationinfoJson,
                ])
                .values_panic([
                    rid_value(well.project_id),
                    rid_value(well.forecast_id),
                    rid_value(well.scenario_id),
                    well.publicid.clone().into(),
                    json_value(&well.creationinfo)?,
                ])
                .to_owned();
            well.id = Some(insert_returning_id(tx, insert, InjectionWells::Id).await?);
        }
    }

    let well_id = well.id;
    for section in &mut well.sections {
        section.well_id = well_id;
        save_section(tx, section).await?;
    }
    Ok(())
}

async fn save_section(tx: &DatabaseTransaction, section: &mut WellSection) -> ModelResult<()> {
    match section.id {
        Some(id) => {
            let update = Query::update()
                .table(WellSections::Table)
                .values([
                    (WellSections::WellId, rid_value(section.well_id)),
                    (WellSections::ToplongitudeJson, opt_json_value(&section.toplongitude)?),
                    (WellSections::ToplatitudeJson, opt_json_value(&section.toplatitude)?),
                    (WellSections::TopdepthJson, opt_json_value(&section.topdepth)?),
                    (
                        WellSections::BottomlongitudeJson,
                        opt_json_value(&section.bottomlongitude)?,
                    ),
                    (
                        WellSections::BottomlatitudeJson,
                        opt_json_value(&section.bottomlatitude)?,
                    ),
                    (WellSections::BottomdepthJson, opt_json_value(&section.bottomdepth)?),
                    (WellSections::HolediameterJson, opt_json_value(&section.holediameter)?),
                    (
                        WellSections::CasingdiameterJson,
                        opt_json_value(&section.casingdiameter)?,
                    ),
                    (WellSections::Cased, section.cased.into()),
                ])
                .and_where(Expr::col(WellSections::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(WellSections::Table)
                .columns([
                    WellSections::WellId,
                    WellSections::ToplongitudeJson,
                    WellSections::ToplatitudeJson,
                    WellSections::TopdepthJson,
                    WellSections::BottomlongitudeJson,
                    WellSections::BottomlatitudeJson,
                    WellSections::BottomdepthJson,
                    WellSections::HolediameterJson,
                    WellSections::CasingdiameterJson,
                    WellSections::Cased,
                ])
                .values_panic([
                    rid_value(section.well_id),
                    opt_json_value(&section.toplongitude)?,
                    opt_json_value(&section.toplatitude)?,
                    opt_json_value(&section.topdepth)?,
                    opt_json_value(&section.bottomlongitude)?,
                    opt_json_value(&section.bottomlatitude)?,
                    opt_json_value(&section.bottomdepth)?,
                    opt_json_value(&section.holediameter)?,
                    opt_json_value(&section.casingdiameter)?,
                    section.cased.into(),
                ])
                .to_owned();
            section.id = Some(insert_returning_id(tx, insert, WellSections::Id).await?);
        }
    }

    let section_id = section.id;
    if let Some(hydraulics) = &mut section.hydraulics {
        hydraulics.section_id = section_id;
        let series_id = save_series_row(
            tx,
            hydraulics.id,
            hydraulics.section_id,
            None,
            SERIES_KIND_HYDRAULICS,
            &hydraulics.creationinfo,
        )
        .await?;
        hydraulics.id = Some(series_id);
        for sample in &mut hydraulics.samples {
            sample.series_id = Some(series_id);
            save_sample(tx, sample).await?;
        }
    }
    if let Some(plan) = &mut section.injectionplan {
        plan.section_id = section_id;
        let series_id = save_series_row(
            tx,
            plan.id,
            plan.section_id,
            plan.scenario_id,
            SERIES_KIND_INJECTION_PLAN,
            &plan.creationinfo,
        )
        .await?;
        plan.id = Some(series_id);
        for sample in &mut plan.samples {
            sample.series_id = Some(series_id);
            save_sample(tx, sample).await?;
        }
    }
    Ok(())
}

async fn save_series_row(
    tx: &DatabaseTransaction,
    id: Option<RecordId>,
    section_id: Option<RecordId>,
    scenario_id: Option<RecordId>,
    kind: i16,
    creationinfo: &CreationInfo,
) -> ModelResult<RecordId> {
    match id {
        Some(id) => {
            let update = Query::update()
                .table(HydraulicSeries::Table)
                .values([
                    (HydraulicSeries::SectionId, rid_value(section_id)),
                    (HydraulicSeries::ScenarioId, rid_value(scenario_id)),
                    (HydraulicSeries::Kind, kind.into()),
                    (HydraulicSeries::CreationinfoJson, json_value(creationinfo)?),
                ])
                .and_where(Expr::col(HydraulicSeries::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
            Ok(id)
        }
        None => {
            let insert = Query::insert()
                .into_table(HydraulicSeries::Table)
                .columns([
                    HydraulicSeries::SectionId,
                    HydraulicSeries::ScenarioId,
                    HydraulicSeries::Kind,
                    HydraulicSeries::CreationinfoJson,
                ])
                .values_panic([
                    rid_value(section_id),
                    rid_value(scenario_id),
                    kind.into(),
                    json_value(creationinfo)?,
                ])
                .to_owned();
            insert_returning_id(tx, insert, HydraulicSeries::Id).await
        }
    }
}

async fn save_sample(tx: &DatabaseTransaction, sample: &mut HydraulicSample) -> ModelResult<()> {
    match sample.id {
        Some(id) => {
            let update = Query::update()
                .table(HydraulicSamples::Table)
                .values([
                    (HydraulicSamples::SeriesId, rid_value(sample.series_id)),
                    (HydraulicSamples::DatetimeJson, json_value(&sample.datetime)?),
                    (
                        HydraulicSamples::ToptemperatureJson,
                        opt_json_value(&sample.toptemperature)?,
                    ),
                    (HydraulicSamples::TopflowJson, opt_json_value(&sample.topflow)?),
                    (HydraulicSamples::ToppressureJson, opt_json_value(&sample.toppressure)?),
                    (
                        HydraulicSamples::BottomtemperatureJson,
                        opt_json_value(&sample.bottomtemperature)?,
                    ),
                    (HydraulicSamples::BottomflowJson, opt_json_value(&sample.bottomflow)?),
                    (
                        HydraulicSamples::BottompressureJson,
                        opt_json_value(&sample.bottompressure)?,
                    ),
                ])
                .and_where(Expr::col(HydraulicSamples::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(HydraulicSamples::Table)
                .columns([
                    HydraulicSamples::SeriesId,
                    HydraulicSamples::DatetimeJson,
                    HydraulicSamples::ToptemperatureJson,
                    HydraulicSamples::TopflowJson,
                    HydraulicSamples::ToppressureJson,
                    HydraulicSamples::BottomtemperatureJson,
                    HydraulicSamples::BottomflowJson,
                    HydraulicSamples::BottompressureJson,
                ])
                .values_panic([
                    rid_value(sample.series_id),
                    json_value(&sample.datetime)?,
                    opt_json_value(&sample.toptemperature)?,
                    opt_json_value(&sample.topflow)?,
                    opt_json_value(&sample.toppressure)?,
                    opt_json_value(&sample.bottomtemperature)?,
                    opt_json_value(&sample.bottomflow)?,
                    opt_json_value(&sample.bottompressure)?,
                ])
                .to_owned();
            sample.id = Some(insert_returning_id(tx, insert, HydraulicSamples::Id).await?);
        }
    }
    Ok(())
}

async fn save_forecast_tree(tx: &DatabaseTransaction, forecast: &mut Forecast) -> ModelResult<()> {
    match forecast.id {
        Some(id) => {
            let update = Query::update()
                .table(Forecasts::Table)
                .values([
                    (Forecasts::ProjectId, rid_value(forecast.project_id)),
                    (Forecasts::Name, forecast.name.clone().into()),
                    (Forecasts::Starttime, forecast.interval.starttime.into()),
                    (Forecasts::Endtime, forecast.interval.endtime.into()),
                    (Forecasts::CreationinfoJson, json_value(&forecast.creationinfo)?),
                ])
                .and_where(Expr::col(Forecasts::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(Forecasts::Table)
                .columns([
                    Forecasts::ProjectId,
                    Forecasts::Name,
                    Forecasts::Starttime,
                    Forecasts::Endtime,
                    Forecasts::CreationinfoJson,
                ])
                .values_panic([
                    rid_value(forecast.project_id),
                    forecast.name.clone().into(),
                    forecast.interval.starttime.into(),
                    forecast.interval.endtime.into(),
                    json_value(&forecast.creationinfo)?,
                ])
                .to_owned();
            forecast.id = Some(insert_returning_id(tx, insert, Forecasts::Id).await?);
        }
    }
    let forecast_id = forecast
        .id
        .ok_or_else(|| ModelError::storage("forecast id missing after save"))?;

    save_status(tx, &mut forecast.status, StatusOwner::Forecast(forecast_id)).await?;

    if let Some(catalog) = &mut forecast.seismiccatalog {
        catalog.forecast_id = Some(forecast_id);
        save_catalog(tx, catalog).await?;
    }
    if let Some(well) = &mut forecast.well {
        well.forecast_id = Some(forecast_id);
        save_well(tx, well).await?;
    }
    for scenario in &mut forecast.scenarios {
        scenario.forecast_id = Some(forecast_id);
        save_scenario(tx, scenario).await?;
    }
    Ok(())
}

async fn save_scenario(
    tx: &DatabaseTransaction,
    scenario: &mut ForecastScenario,
) -> ModelResult<()> {
    match scenario.id {
        Some(id) => {
            let update = Query::update()
                .table(ForecastScenarios::Table)
                .values([
                    (ForecastScenarios::ForecastId, rid_value(scenario.forecast_id)),
                    (ForecastScenarios::Name, scenario.name.clone().into()),
                    (ForecastScenarios::ConfigJson, json_value(&scenario.config)?),
                    (
                        ForecastScenarios::ReservoirgeomWkt,
                        scenario.reservoirgeom.clone().into(),
                    ),
                ])
                .and_where(Expr::col(ForecastScenarios::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(ForecastScenarios::Table)
                .columns([
                    ForecastScenarios::ForecastId,
                    ForecastScenarios::Name,
                    ForecastScenarios::ConfigJson,
                    ForecastScenarios::ReservoirgeomWkt,
                ])
                .values_panic([
                    rid_value(scenario.forecast_id),
                    scenario.name.clone().into(),
                    json_value(&scenario.config)?,
                    scenario.reservoirgeom.clone().into(),
                ])
                .to_owned();
            scenario.id = Some(insert_returning_id(tx, insert, ForecastScenarios::Id).await?);
        }
    }
    let scenario_id = scenario
        .id
        .ok_or_else(|| ModelError::storage("scenario id missing after save"))?;

    save_status(tx, &mut scenario.status, StatusOwner::Scenario(scenario_id)).await?;

    if let Some(well) = &mut scenario.well {
        well.scenario_id = Some(scenario_id);
        save_well(tx, well).await?;
    }
    for stage in &mut scenario.stages {
        stage.scenario_id = Some(scenario_id);
        save_stage(tx, stage).await?;
    }
    Ok(())
}

async fn save_stage(tx: &DatabaseTransaction, stage: &mut ForecastStage) -> ModelResult<()> {
    let kind = stage.kind();
    match stage.id {
        Some(id) => {
            let update = Query::update()
                .table(ForecastStages::Table)
                .values([
                    (ForecastStages::ScenarioId, rid_value(stage.scenario_id)),
                    (ForecastStages::Kind, kind.as_i16().into()),
                    (ForecastStages::ConfigJson, json_value(&stage.config)?),
                    (ForecastStages::Enabled, stage.enabled.into()),
                ])
                .and_where(Expr::col(ForecastStages::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(ForecastStages::Table)
                .columns([
                    ForecastStages::ScenarioId,
                    ForecastStages::Kind,
                    ForecastStages::ConfigJson,
                    ForecastStages::Enabled,
                ])
                .values_panic([
                    rid_value(stage.scenario_id),
                    kind.as_i16().into(),
                    json_value(&stage.config)?,
                    stage.enabled.into(),
                ])
                .to_owned();
            stage.id = Some(insert_returning_id(tx, insert, ForecastStages::Id).await?);
        }
    }
    let stage_id = stage
        .id
        .ok_or_else(|| ModelError::storage("stage id missing after save"))?;

    save_status(tx, &mut stage.status, StatusOwner::Stage(stage_id)).await?;

    match &mut stage.payload {
        StagePayload::Seismicity { runs } => {
            for run in runs {
                run.stage_id = Some(stage_id);
                save_seismicity_run(tx, run).await?;
            }
        }
        StagePayload::SeismicitySkill { skilltests } => {
            for skilltest in skilltests {
                skilltest.stage_id = Some(stage_id);
                save_skilltest(tx, skilltest).await?;
            }
        }
        StagePayload::Hazard { runs } => {
            for run in runs {
                run.stage_id = Some(stage_id);
                save_hazard_run(tx, run).await?;
            }
        }
        StagePayload::Risk { runs } => {
            for run in runs {
                run.stage_id = Some(stage_id);
                save_risk_run(tx, run).await?;
            }
        }
    }
    Ok(())
}

async fn save_run_row(
    tx: &DatabaseTransaction,
    id: Option<RecordId>,
    stage_id: Option<RecordId>,
    kind: ModelKind,
    model_id: Option<RecordId>,
    config: &serde_json::Map<String, serde_json::Value>,
    enabled: bool,
    runid: Option<Uuid>,
    interval: Option<&Epoch>,
) -> ModelResult<RecordId> {
    let interval_start: SimpleExpr = interval.and_then(|e| e.starttime).into();
    let interval_end: SimpleExpr = interval.and_then(|e| e.endtime).into();
    match id {
        Some(id) => {
            let update = Query::update()
                .table(ModelRuns::Table)
                .values([
                    (ModelRuns::StageId, rid_value(stage_id)),
                    (ModelRuns::Kind, kind.as_i16().into()),
                    (ModelRuns::ModelId, rid_value(model_id)),
                    (ModelRuns::ConfigJson, json_value(config)?),
                    (ModelRuns::Enabled, enabled.into()),
                    (ModelRuns::Runid, runid.map(|u| u.to_string()).into()),
                    (ModelRuns::DescribedintervalStart, interval_start),
                    (ModelRuns::DescribedintervalEnd, interval_end),
                ])
                .and_where(Expr::col(ModelRuns::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
            Ok(id)
        }
        None => {
            let insert = Query::insert()
                .into_table(ModelRuns::Table)
                .columns([
                    ModelRuns::StageId,
                    ModelRuns::Kind,
                    ModelRuns::ModelId,
                    ModelRuns::ConfigJson,
                    ModelRuns::Enabled,
                    ModelRuns::Runid,
                    ModelRuns::DescribedintervalStart,
                    ModelRuns::DescribedintervalEnd,
                ])
                .values_panic([
                    rid_value(stage_id),
                    kind.as_i16().into(),
                    rid_value(model_id),
                    json_value(config)?,
                    enabled.into(),
                    runid.map(|u| u.to_string()).into(),
                    interval_start,
                    interval_end,
                ])
                .to_owned();
            insert_returning_id(tx, insert, ModelRuns::Id).await
        }
    }
}

async fn save_seismicity_run(
    tx: &DatabaseTransaction,
    run: &mut SeismicityModelRun,
) -> ModelResult<()> {
    let run_id = save_run_row(
        tx,
        run.id,
        run.stage_id,
        ModelKind::Seismicity,
        run.model_id,
        &run.config,
        run.enabled,
        run.runid,
        None,
    )
    .await?;
    run.id = Some(run_id);
    run.status.run_id = Some(run_id);
    save_status(tx, &mut run.status, StatusOwner::Run(run_id)).await?;

    if let Some(result) = &mut run.result {
        result.run_id = Some(run_id);
        save_prediction(tx, result).await?;
    }
    Ok(())
}

async fn save_hazard_run(tx: &DatabaseTransaction, run: &mut HazardModelRun) -> ModelResult<()> {
    let run_id = save_run_row(
        tx,
        run.id,
        run.stage_id,
        ModelKind::Hazard,
        run.model_id,
        &run.config,
        run.enabled,
        run.runid,
        Some(&run.describedinterval),
    )
    .await?;
    run.id = Some(run_id);
    run.status.run_id = Some(run_id);
    save_status(tx, &mut run.status, StatusOwner::Run(run_id)).await?;

    delete_where_in(
        tx,
        HazardSeismicityRuns::Table,
        HazardSeismicityRuns::HazardRunId,
        &[run_id.as_i64()],
    )
    .await?;
    for seismicity_run_id in &run.seismicityrun_ids {
        let insert = Query::insert()
            .into_table(HazardSeismicityRuns::Table)
            .columns([
                HazardSeismicityRuns::HazardRunId,
                HazardSeismicityRuns::SeismicityRunId,
            ])
            .values_panic([run_id.as_i64().into(), seismicity_run_id.as_i64().into()])
            .to_owned();
        exec(tx, &insert).await?;
    }

    for curve in &mut run.hazardcurves {
        curve.run_id = Some(run_id);
        save_curve(tx, curve, run_id).await?;
    }
    for map in &mut run.hazardmaps {
        map.run_id = Some(run_id);
        save_map(tx, map, run_id).await?;
    }
    for value in &mut run.hazardpointvalues {
        value.run_id = Some(run_id);
        save_point_value(tx, value).await?;
    }
    Ok(())
}

async fn save_risk_run(tx: &DatabaseTransaction, run: &mut RiskModelRun) -> ModelResult<()> {
    let run_id = save_run_row(
        tx,
        run.id,
        run.stage_id,
        ModelKind::Risk,
        run.model_id,
        &run.config,
        run.enabled,
        run.runid,
        None,
    )
    .await?;
    run.id = Some(run_id);
    run.status.run_id = Some(run_id);
    save_status(tx, &mut run.status, StatusOwner::Run(run_id)).await
}

async fn save_prediction(
    tx: &DatabaseTransaction,
    prediction: &mut ReservoirSeismicityPrediction,
) -> ModelResult<()> {
    match prediction.id {
        Some(id) => {
            let update = Query::update()
                .table(SeismicityPredictions::Table)
                .values([
                    (SeismicityPredictions::RunId, rid_value(prediction.run_id)),
                    (SeismicityPredictions::GeomWkt, prediction.geom.clone().into()),
                    (SeismicityPredictions::RateJson, opt_json_value(&prediction.rate)?),
                    (SeismicityPredictions::BvalueJson, opt_json_value(&prediction.bvalue)?),
                ])
                .and_where(Expr::col(SeismicityPredictions::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(SeismicityPredictions::Table)
                .columns([
                    SeismicityPredictions::RunId,
                    SeismicityPredictions::GeomWkt,
                    SeismicityPredictions::RateJson,
                    SeismicityPredictions::BvalueJson,
                ])
                .values_panic([
                    rid_value(prediction.run_id),
                    prediction.geom.clone().into(),
                    opt_json_value(&prediction.rate)?,
                    opt_json_value(&prediction.bvalue)?,
                ])
                .to_owned();
            prediction.id =
                Some(insert_returning_id(tx, insert, SeismicityPredictions::Id).await?);
        }
    }

    let prediction_id = prediction.id;
    for bin in &mut prediction.bins {
        bin.prediction_id = prediction_id;
        save_bin(tx, bin).await?;
    }
    Ok(())
}

async fn save_bin(tx: &DatabaseTransaction, bin: &mut SeismicityPredictionBin) -> ModelResult<()> {
    match bin.id {
        Some(id) => {
            let update = Query::update()
                .table(SeismicityPredictionBins::Table)
                .values([
                    (SeismicityPredictionBins::PredictionId, rid_value(bin.prediction_id)),
                    (SeismicityPredictionBins::Starttime, bin.starttime.into()),
                    (SeismicityPredictionBins::Endtime, bin.endtime.into()),
                    (
                        SeismicityPredictionBins::NumbereventsJson,
                        opt_json_value(&bin.numberevents)?,
                    ),
                    (SeismicityPredictionBins::AJson, opt_json_value(&bin.a)?),
                    (SeismicityPredictionBins::BJson, opt_json_value(&bin.b)?),
                    (SeismicityPredictionBins::McJson, opt_json_value(&bin.mc)?),
                ])
                .and_where(Expr::col(SeismicityPredictionBins::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(SeismicityPredictionBins::Table)
                .columns([
                    SeismicityPredictionBins::PredictionId,
                    SeismicityPredictionBins::Starttime,
                    SeismicityPredictionBins::Endtime,
                    SeismicityPredictionBins::NumbereventsJson,
                    SeismicityPredictionBins::AJson,
                    SeismicityPredictionBins::BJson,
                    SeismicityPredictionBins::McJson,
                ])
                .values_panic([
                    rid_value(bin.prediction_id),
                    bin.starttime.into(),
                    bin.endtime.into(),
                    opt_json_value(&bin.numberevents)?,
                    opt_json_value(&bin.a)?,
                    opt_json_value(&bin.b)?,
                    opt_json_value(&bin.mc)?,
                ])
                .to_owned();
            bin.id = Some(insert_returning_id(tx, insert, SeismicityPredictionBins::Id).await?);
        }
    }
    Ok(())
}

async fn save_curve(
    tx: &DatabaseTransaction,
    curve: &mut HazardCurve,
    run_id: RecordId,
) -> ModelResult<()> {
    if curve.id.is_none() {
        let insert = Query::insert()
            .into_table(HazardCurves::Table)
            .columns([HazardCurves::RunId])
            .values_panic([rid_value(curve.run_id)])
            .to_owned();
        curve.id = Some(insert_returning_id(tx, insert, HazardCurves::Id).await?);
    }
    for value in &mut curve.samples {
        value.run_id = Some(run_id);
        value.curve_id = curve.id;
        save_point_value(tx, value).await?;
    }
    Ok(())
}

async fn save_map(
    tx: &DatabaseTransaction,
    map: &mut HazardMap,
    run_id: RecordId,
) -> ModelResult<()> {
    if map.id.is_none() {
        let insert = Query::insert()
            .into_table(HazardMaps::Table)
            .columns([HazardMaps::RunId])
            .values_panic([rid_value(map.run_id)])
            .to_owned();
        map.id = Some(insert_returning_id(tx, insert, HazardMaps::Id).await?);
    }
    for value in &mut map.samples {
        value.run_id = Some(run_id);
        value.map_id = map.id;
        save_point_value(tx, value).await?;
    }
    Ok(())
}

async fn save_point_value(
    tx: &DatabaseTransaction,
    value: &mut HazardPointValue,
) -> ModelResult<()> {
    let geopoint_id = match &mut value.geopoint {
        Some(point) => {
            if point.id.is_none() {
                let insert = Query::insert()
                    .into_table(GeoPoints::Table)
                    .columns([GeoPoints::Lat, GeoPoints::Lon])
                    .values_panic([point.lat.into(), point.lon.into()])
                    .to_owned();
                point.id = Some(insert_returning_id(tx, insert, GeoPoints::Id).await?);
            }
            point.id
        }
        None => None,
    };

    match value.id {
        Some(id) => {
            let update = Query::update()
                .table(HazardPointValues::Table)
                .values([
                    (HazardPointValues::RunId, rid_value(value.run_id)),
                    (HazardPointValues::CurveId, rid_value(value.curve_id)),
                    (HazardPointValues::MapId, rid_value(value.map_id)),
                    (HazardPointValues::GeopointId, rid_value(geopoint_id)),
                    (HazardPointValues::Groundmotion, value.groundmotion.into()),
                    (HazardPointValues::Poe, value.poe.into()),
                    (
                        HazardPointValues::Hazardintensitytype,
                        value.hazardintensitytype.clone().into(),
                    ),
                    (HazardPointValues::Spectralperiod, value.spectralperiod.into()),
                ])
                .and_where(Expr::col(HazardPointValues::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(HazardPointValues::Table)
                .columns([
                    HazardPointValues::RunId,
                    HazardPointValues::CurveId,
                    HazardPointValues::MapId,
                    HazardPointValues::GeopointId,
                    HazardPointValues::Groundmotion,
                    HazardPointValues::Poe,
                    HazardPointValues::Hazardintensitytype,
                    HazardPointValues::Spectralperiod,
                ])
                .values_panic([
                    rid_value(value.run_id),
                    rid_value(value.curve_id),
                    rid_value(value.map_id),
                    rid_value(geopoint_id),
                    value.groundmotion.into(),
                    value.poe.into(),
                    value.hazardintensitytype.clone().into(),
                    value.spectralperiod.into(),
                ])
                .to_owned();
            value.id = Some(insert_returning_id(tx, insert, HazardPointValues::Id).await?);
        }
    }
    Ok(())
}

async fn save_skilltest(tx: &DatabaseTransaction, skilltest: &mut SkillTest) -> ModelResult<()> {
    match skilltest.id {
        Some(id) => {
            let update = Query::update()
                .table(SkillTests::Table)
                .values([
                    (SkillTests::StageId, rid_value(skilltest.stage_id)),
                    (SkillTests::SkillScore, skilltest.skill_score.into()),
                    (SkillTests::TestInterval, skilltest.test_interval.into()),
                    (SkillTests::SpatialExtent, skilltest.spatial_extent.into()),
                ])
                .and_where(Expr::col(SkillTests::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(SkillTests::Table)
                .columns([
                    SkillTests::StageId,
                    SkillTests::SkillScore,
                    SkillTests::TestInterval,
                    SkillTests::SpatialExtent,
                ])
                .values_panic([
                    rid_value(skilltest.stage_id),
                    skilltest.skill_score.into(),
                    skilltest.test_interval.into(),
                    skilltest.spatial_extent.into(),
                ])
                .to_owned();
            skilltest.id = Some(insert_returning_id(tx, insert, SkillTests::Id).await?);
        }
    }

    if let Some(catalog) = &mut skilltest.reference_catalog {
        catalog.skilltest_id = skilltest.id;
        save_catalog(tx, catalog).await?;
    }
    Ok(())
}

async fn save_status(
    tx: &DatabaseTransaction,
    status: &mut Status,
    owner: StatusOwner,
) -> ModelResult<()> {
    let (run_id, stage_id, scenario_id, forecast_id) = match owner {
        StatusOwner::Run(id) => (Some(id), None, None, None),
        StatusOwner::Stage(id) => (None, Some(id), None, None),
        StatusOwner::Scenario(id) => (None, None, Some(id), None),
        StatusOwner::Forecast(id) => (None, None, None, Some(id)),
    };
    match status.id {
        Some(id) => {
            let update = Query::update()
                .table(Statuses::Table)
                .values([
                    (Statuses::RunId, rid_value(run_id)),
                    (Statuses::StageId, rid_value(stage_id)),
                    (Statuses::ScenarioId, rid_value(scenario_id)),
                    (Statuses::ForecastId, rid_value(forecast_id)),
                    (Statuses::Uuid, status.uuid.to_string().into()),
                    (Statuses::State, status.state.as_i16().into()),
                    (Statuses::InfoJson, json_value(&status.info)?),
                    (Statuses::Starttime, status.starttime.into()),
                    (Statuses::Endtime, status.endtime.into()),
                ])
                .and_where(Expr::col(Statuses::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
        }
        None => {
            let insert = Query::insert()
                .into_table(Statuses::Table)
                .columns([
                    Statuses::RunId,
                    Statuses::StageId,
                    Statuses::ScenarioId,
                    Statuses::ForecastId,
                    Statuses::Uuid,
                    Statuses::State,
                    Statuses::InfoJson,
                    Statuses::Starttime,
                    Statuses::Endtime,
                ])
                .values_panic([
                    rid_value(run_id),
                    rid_value(stage_id),
                    rid_value(scenario_id),
                    rid_value(forecast_id),
                    status.uuid.to_string().into(),
                    status.state.as_i16().into(),
                    json_value(&status.info)?,
                    status.starttime.into(),
                    status.endtime.into(),
                ])
                .to_owned();
            status.id = Some(insert_returning_id(tx, insert, Statuses::Id).await?);
        }
    }
    Ok(())
}

async fn save_model_row(
    tx: &DatabaseTransaction,
    id: Option<RecordId>,
    kind: ModelKind,
    name: &str,
    enabled: bool,
    config: &serde_json::Map<String, serde_json::Value>,
    url: Option<&str>,
    extra: [(Models, SimpleExpr); 4],
) -> ModelResult<RecordId> {
    match id {
        Some(id) => {
            let mut values = vec![
                (Models::Kind, kind.as_i16().into()),
                (Models::Name, name.to_owned().into()),
                (Models::Enabled, enabled.into()),
                (Models::ConfigJson, json_value(config)?),
                (Models::Url, url.map(str::to_owned).into()),
            ];
            values.extend(extra);
            let update = Query::update()
                .table(Models::Table)
                .values(values)
                .and_where(Expr::col(Models::Id).eq(id.as_i64()))
                .to_owned();
            exec(tx, &update).await?;
            Ok(id)
        }
        None => {
            let mut columns = vec![
                Models::Kind,
                Models::Name,
                Models::Enabled,
                Models::ConfigJson,
                Models::Url,
            ];
            let mut values: Vec<SimpleExpr> = vec![
                kind.as_i16().into(),
                name.to_owned().into(),
                enabled.into(),
                json_value(config)?,
                url.map(str::to_owned).into(),
            ];
            for (column, value) in extra {
                columns.push(column);
                values.push(value);
            }
            let insert = Query::insert()
                .into_table(Models::Table)
                .columns(columns)
                .values_panic(values)
                .to_owned();
            insert_returning_id(tx, insert, Models::Id).await
        }
    }
}

// ----------------------------------------------------------------------
// Load

async fn load_settings<C: ConnectionTrait>(
    conn: &C,
    project_id: RecordId,
) -> ModelResult<ProjectSettings> {
    let select = Query::select()
        .from(Settings::Table)
        .columns([Settings::Id, Settings::ProjectId, Settings::Updated, Settings::Config])
        .and_where(Expr::col(Settings::ProjectId).eq(project_id.as_i64()))
        .limit(1)
        .to_owned();
    let row = match query_one(conn, &select).await? {
        Some(row) => row,
        None => return Ok(ProjectSettings::new()),
    };
    let mut settings = match read_opt_string(&row, Settings::Config)? {
        Some(config) => ProjectSettings::from_config(&config)?,
        None => ProjectSettings::new(),
    };
    settings.id = Some(read_id(&row, Settings::Id)?);
    settings.project_id = read_opt_id(&row, Settings::ProjectId)?;
    settings.updated = read_opt_datetime(&row, Settings::Updated)?;
    Ok(settings)
}

async fn load_catalogs_by_owner<C: ConnectionTrait>(
    conn: &C,
    owner_col: SeismicCatalogs,
    owner_id: RecordId,
) -> ModelResult<Vec<SeismicCatalog>> {
    let select = Query::select()
        .from(SeismicCatalogs::Table)
        .columns([
            SeismicCatalogs::Id,
            SeismicCatalogs::ProjectId,
            SeismicCatalogs::ForecastId,
            SeismicCatalogs::SkilltestId,
            SeismicCatalogs::CreationinfoJson,
        ])
        .and_where(Expr::col(owner_col).eq(owner_id.as_i64()))
        .to_owned();
    let rows = query_all(conn, &select).await?;

    let mut catalogs = Vec::with_capacity(rows.len());
    for row in rows {
        let mut catalog = SeismicCatalog {
            id: Some(read_id(&row, SeismicCatalogs::Id)?),
            project_id: read_opt_id(&row, SeismicCatalogs::ProjectId)?,
            forecast_id: read_opt_id(&row, SeismicCatalogs::ForecastId)?,
            skilltest_id: read_opt_id(&row, SeismicCatalogs::SkilltestId)?,
            creationinfo: read_json(&row, SeismicCatalogs::CreationinfoJson)?.unwrap_or_default(),
            events: Vec::new(),
            catalog_changed: Signal::new(),
        };
        catalog.events = load_events(conn, read_id(&row, SeismicCatalogs::Id)?).await?;
        catalogs.push(catalog);
    }
    Ok(catalogs)
}

async fn load_events<C: ConnectionTrait>(
    conn: &C,
    catalog_id: RecordId,
) -> ModelResult<Vec<SeismicEvent>> {
    let select = Query::select()
        .from(SeismicEvents::Table)
        .columns([
            SeismicEvents::Id,
            SeismicEvents::CatalogId,
            SeismicEvents::Quakeml,
            SeismicEvents::DatetimeJson,
            SeismicEvents::XJson,
            SeismicEvents::YJson,
            SeismicEvents::ZJson,
            SeismicEvents::MagnitudeJson,
        ])
        .and_where(Expr::col(SeismicEvents::CatalogId).eq(catalog_id.as_i64()))
        .to_owned();
    let rows = query_all(conn, &select).await?;

    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        let datetime: TimeQuantity = read_json(&row, SeismicEvents::DatetimeJson)?
            .ok_or_else(|| ModelError::storage("seismic event without datetime"))?;
        events.push(SeismicEvent {
            id: Some(read_id(&row, SeismicEvents::Id)?),
            catalog_id: read_opt_id(&row, SeismicEvents::CatalogId)?,
            quakeml: read_bytes(&row, SeismicEvents::Quakeml)?,
            datetime,
            x: read_json(&row, SeismicEvents::XJson)?,
            y: read_json(&row, SeismicEvents::YJson)?,
            z: read_json(&row, SeismicEvents::ZJson)?,
            magnitude: read_json(&row, SeismicEvents::MagnitudeJson)?,
        });
    }
    events.sort_by_key(tremor_core::Timestamped::timestamp);
    Ok(events)
}

async fn load_wells_by_owner<C: ConnectionTrait>(
    conn: &C,
    owner_col: InjectionWells,
    owner_id: RecordId,
) -> ModelResult<Vec<InjectionWell>> {
    let select = Query::select()
        .from(InjectionWells::Table)
        .columns([
            InjectionWells::Id,
            InjectionWells::ProjectId,
            InjectionWells::ForecastId,
            InjectionWells::ScenarioId,
            InjectionWells::Publicid,
            InjectionWells::CreationinfoJson,
        ])
        .and_where(Expr::col(owner_col).eq(owner_id.as_i64()))
        .to_owned();
    let rows = query_all(conn, &select).await?;

    let mut wells = Vec::with_capacity(rows.len());
    for row in rows {
        let well_id = read_id(&row, InjectionWells::Id)?;
        wells.push(InjectionWell {
            id: Some(well_id),
            project_id: read_opt_id(&row, InjectionWells::ProjectId)?,
            forecast_id: read_opt_id(&row, InjectionWells::ForecastId)?,
            scenario_id: read_opt_id(&row, InjectionWells::ScenarioId)?,
            publicid: read_opt_string(&row, InjectionWells::Publicid)?,
            creationinfo: read_json(&row, InjectionWells::CreationinfoJson)?.unwrap_or_default(),
            sections: load_sections(conn, well_id).await?,
        });
    }
    Ok(wells)
}

async fn load_sections<C: ConnectionTrait>(
    conn: &C,
    well_id: RecordId,
) -> ModelResult<Vec<WellSection>> {
    let select = Query::select()
        .from(WellSections::Table)
        .columns([
            WellSections::Id,
            WellSections::WellId,
            WellSections::ToplongitudeJson,
            WellSections::ToplatitudeJson,
            WellSections::TopdepthJson,
            WellSections::BottomlongitudeJson,
            WellSections::BottomlatitudeJson,
            WellSections::BottomdepthJson,
            WellSections::HolediameterJson,
            WellSections::CasingdiameterJson,
            WellSections::Cased,
        ])
        .and_where(Expr::col(WellSections::WellId).eq(well_id.as_i64()))
        .to_owned();
    let rows = query_all(conn, &select).await?;

    let mut sections = Vec::with_capacity(rows.len());
    for row in rows {
        let section_id = read_id(&row, WellSections::Id)?;
        let (hydraulics, injectionplan) = load_series_for_section(conn, section_id).await?;
        sections.push(WellSection {
            id: Some(section_id),
            well_id: read_opt_id(&row, WellSections::WellId)?,
            toplongitude: read_json(&row, WellSections::ToplongitudeJson)?,
            toplatitude: read_json(&row, WellSections::ToplatitudeJson)?,
            topdepth: read_json(&row, WellSections::TopdepthJson)?,
            bottomlongitude: read_json(&row, WellSections::BottomlongitudeJson)?,
            bottomlatitude: read_json(&row, WellSections::BottomlatitudeJson)?,
            bottomdepth: read_json(&row, WellSections::BottomdepthJson)?,
            holediameter: read_json(&row, WellSections::HolediameterJson)?,
            casingdiameter: read_json(&row, WellSections::CasingdiameterJson)?,
            cased: read_opt_bool(&row, WellSections::Cased)?,
            hydraulics,
            injectionplan,
        });
    }
    sections.sort_by(|a, b| {
        let depth = |s: &WellSection| s.topdepth.as_ref().map(|q| q.value).unwrap_or(0.0);
        depth(a).total_cmp(&depth(b))
    });
    Ok(sections)
}

async fn load_series_for_section<C: ConnectionTrait>(
    conn: &C,
    section_id: RecordId,
) -> ModelResult<(Option<Hydraulics>, Option<InjectionPlan>)> {
    let select = Query::select()
        .from(HydraulicSeries::Table)
        .columns([
            HydraulicSeries::Id,
            HydraulicSeries::SectionId,
            HydraulicSeries::ScenarioId,
            HydraulicSeries::Kind,
            HydraulicSeries::CreationinfoJson,
        ])
        .and_where(Expr::col(HydraulicSeries::SectionId).eq(section_id.as_i64()))
        .to_owned();
    let rows = query_all(conn, &select).await?;

    let mut hydraulics = None;
    let mut injectionplan = None;
    for row in rows {
        let series_id = read_id(&row, HydraulicSeries::Id)?;
        let creationinfo: CreationInfo =
            read_json(&row, HydraulicSeries::CreationinfoJson)?.unwrap_or_default();
        let samples = load_samples(conn, series_id).await?;
        match read_i16(&row, HydraulicSeries::Kind)? {
            SERIES_KIND_HYDRAULICS => {
                hydraulics = Some(Hydraulics {
                    id: Some(series_id),
                    section_id: read_opt_id(&row, HydraulicSeries::SectionId)?,
                    creationinfo,
                    samples,
                    history_changed: Signal::new(),
                });
            }
            SERIES_KIND_INJECTION_PLAN => {
                injectionplan = Some(InjectionPlan {
                    id: Some(series_id),
                    section_id: read_opt_id(&row, HydraulicSeries::SectionId)?,
                    scenario_id: read_opt_id(&row, HydraulicSeries::ScenarioId)?,
                    creationinfo,
                    samples,
                });
            }
            other => {
                return Err(ModelError::storage(format!(
                    "unknown hydraulic series kind {other}"
                )));
            }
        }
    }
    Ok((hydraulics, injectionplan))
}

async fn load_samples<C: ConnectionTrait>(
    conn: &C,
    series_id: RecordId,
) -> ModelResult<Vec<HydraulicSample>> {
    let select = Query::select()
        .from(HydraulicSamples::Table)
        .columns([
            HydraulicSamples::Id,
            HydraulicSamples::SeriesId,
            HydraulicSamples::DatetimeJson,
            HydraulicSamples::ToptemperatureJson,
            HydraulicSamples::TopflowJson,
            HydraulicSamples::ToppressureJson,
            HydraulicSamples::BottomtemperatureJson,
            HydraulicSamples::BottomflowJson,
            HydraulicSamples::BottompressureJson,
        ])
        .and_where(Expr::col(HydraulicSamples::SeriesId).eq(series_id.as_i64()))
        .to_owned();
    let rows = query_all(conn, &select).await?;

    let mut samples = Vec::with_capacity(rows.len());
    for row in rows {
        let datetime: TimeQuantity = read_json(&row, HydraulicSamples::DatetimeJson)?
            .ok_or_else(|| ModelError::storage("hydraulic sample without datetime"))?;
        samples.push(HydraulicSample {
            id: Some(read_id(&row, HydraulicSamples::Id)?),
            series_id: read_opt_id(&row, HydraulicSamples::SeriesId)?,
            datetime,
            toptemperature: read_json(&row, HydraulicSamples::ToptemperatureJson)?,
            topflow: read_json(&row, HydraulicSamples::TopflowJson)?,
            toppressure: read_json(&row, HydraulicSamples::ToppressureJson)?,
            bottomtemperature: read_json(&row, HydraulicSamples::BottomtemperatureJson)?,
            bottomflow: read_json(&row, HydraulicSamples::BottomflowJson)?,
            bottompressure: read_json(&row, HydraulicSamples::BottompressureJson)?,
        });
    }
    samples.sort_by_key(tremor_core::Timestamped::timestamp);
    Ok(samples)
}

async fn load_forecast_tree<C: ConnectionTrait>(conn: &C, id: RecordId) -> ModelResult<Forecast> {
    let select = Query::select()
        .from(Forecasts::Table)
        .columns([
            Forecasts::Id,
            Forecasts::ProjectId,
            Forecasts::Name,
            Forecasts::Starttime,
            Forecasts::Endtime,
            Forecasts::CreationinfoJson,
        ])
        .and_where(Expr::col(Forecasts::Id).eq(id.as_i64()))
        .limit(1)
        .to_owned();
    let row = query_one(conn, &select)
        .await?
        .ok_or_else(|| ModelError::not_found(format!("forecast {id}")))?;

    let mut forecast = Forecast {
        id: Some(read_id(&row, Forecasts::Id)?),
        project_id: read_opt_id(&row, Forecasts::ProjectId)?,
        name: read_opt_string(&row, Forecasts::Name)?,
        creationinfo: read_json(&row, Forecasts::CreationinfoJson)?.unwrap_or_default(),
        interval: Epoch {
            starttime: read_opt_datetime(&row, Forecasts::Starttime)?,
            endtime: read_opt_datetime(&row, Forecasts::Endtime)?,
        },
        status: load_status(conn, Statuses::ForecastId, id).await?,
        seismiccatalog: None,
        well: None,
        scenarios: Vec::new(),
    };

    forecast.seismiccatalog = load_catalogs_by_owner(conn, SeismicCatalogs::ForecastId, id)
        .await?
        .into_iter()
        .next();
    forecast.well = load_wells_by_owner(conn, InjectionWells::ForecastId, id)
        .await?
        .into_iter()
        .next();

    let scenario_ids = select_ids(
        conn,
        ForecastScenarios::Table,
        ForecastScenarios::Id,
        ForecastScenarios::ForecastId,
        &[id.as_i64()],
    )
    .await?;
    for scenario_id in scenario_ids {
        forecast
            .scenarios
            .push(load_scenario(conn, RecordId(scenario_id)).await?);
    }
    Ok(forecast)
}

async fn load_scenario<C: ConnectionTrait>(
    conn: &C,
    id: RecordId,
) -> ModelResult<ForecastScenario> {
    let select = Query::select()
        .from(ForecastScenarios::Table)
        .columns([
            ForecastScenarios::Id,
            ForecastScenarios::ForecastId,
            ForecastScenarios::Name,
            ForecastScenarios::ConfigJson,
            ForecastScenarios::ReservoirgeomWkt,
        ])
        .and_where(Expr::col(ForecastScenarios::Id).eq(id.as_i64()))
        .limit(1)
        .to_owned();
    let row = query_one(conn, &select)
        .await?
        .ok_or_else(|| ModelError::not_found(format!("scenario {id}")))?;

    let mut scenario = ForecastScenario {
        id: Some(read_id(&row, ForecastScenarios::Id)?),
        forecast_id: read_opt_id(&row, ForecastScenarios::ForecastId)?,
        name: read_opt_string(&row, ForecastScenarios::Name)?,
        config: read_json(&row, ForecastScenarios::ConfigJson)?.unwrap_or_default(),
        status: load_status(conn, Statuses::ScenarioId, id).await?,
        reservoirgeom: read_opt_string(&row, ForecastScenarios::ReservoirgeomWkt)?,
        well: None,
        stages: Vec::new(),
    };

    scenario.well = load_wells_by_owner(conn, InjectionWells::ScenarioId, id)
        .await?
        .into_iter()
        .next();

    let stage_ids = select_ids(
        conn,
        ForecastStages::Table,
        ForecastStages::Id,
        ForecastStages::ScenarioId,
        &[id.as_i64()],
    )
    .await?;
    for stage_id in stage_ids {
        scenario.stages.push(load_stage(conn, RecordId(stage_id)).await?);
    }
    Ok(scenario)
}

async fn load_stage<C: ConnectionTrait>(conn: &C, id: RecordId) -> ModelResult<ForecastStage> {
    let select = Query::select()
        .from(ForecastStages::Table)
        .columns([
            ForecastStages::Id,
            ForecastStages::ScenarioId,
            ForecastStages::Kind,
            ForecastStages::ConfigJson,
            ForecastStages::Enabled,
        ])
        .and_where(Expr::col(ForecastStages::Id).eq(id.as_i64()))
        .limit(1)
        .to_owned();
    let row = query_one(conn, &select)
        .await?
        .ok_or_else(|| ModelError::not_found(format!("forecast stage {id}")))?;

    let kind = ModelKind::from_i16(read_i16(&row, ForecastStages::Kind)?)
        .ok_or_else(|| ModelError::storage("unknown forecast stage kind"))?;
    let payload = match kind {
        ModelKind::Seismicity => StagePayload::Seismicity {
            runs: load_seismicity_runs(conn, id).await?,
        },
        ModelKind::SeismicitySkill => StagePayload::SeismicitySkill {
            skilltests: load_skilltests(conn, id).await?,
        },
        ModelKind::Hazard => StagePayload::Hazard {
            runs: load_hazard_runs(conn, id).await?,
        },
        ModelKind::Risk => StagePayload::Risk {
            runs: load_risk_runs(conn, id).await?,
        },
    };

    Ok(ForecastStage {
        id: Some(read_id(&row, ForecastStages::Id)?),
        scenario_id: read_opt_id(&row, ForecastStages::ScenarioId)?,
        config: read_json(&row, ForecastStages::ConfigJson)?.unwrap_or_default(),
        enabled: read_bool(&row, ForecastStages::Enabled)?,
        status: load_status(conn, Statuses::StageId, id).await?,
        payload,
    })
}

async fn run_rows<C: ConnectionTrait>(
    conn: &C,
    stage_id: RecordId,
    kind: ModelKind,
) -> ModelResult<Vec<QueryResult>> {
    let select = Query::select()
        .from(ModelRuns::Table)
        .columns([
            ModelRuns::Id,
            ModelRuns::StageId,
            ModelRuns::ModelId,
            ModelRuns::ConfigJson,
            ModelRuns::Enabled,
            ModelRuns::Runid,
            ModelRuns::DescribedintervalStart,
            ModelRuns::DescribedintervalEnd,
        ])
        .and_where(Expr::col(ModelRuns::StageId).eq(stage_id.as_i64()))
        .and_where(Expr::col(ModelRuns::Kind).eq(kind.as_i16()))
        .to_owned();
    query_all(conn, &select).await
}

async fn load_seismicity_runs<C: ConnectionTrait>(
    conn: &C,
    stage_id: RecordId,
) -> ModelResult<Vec<SeismicityModelRun>> {
    let rows = run_rows(conn, stage_id, ModelKind::Seismicity).await?;
    let mut runs = Vec::with_capacity(rows.len());
    for row in rows {
        let run_id = read_id(&row, ModelRuns::Id)?;
        runs.push(SeismicityModelRun {
            id: Some(run_id),
            stage_id: read_opt_id(&row, ModelRuns::StageId)?,
            model_id: read_opt_id(&row, ModelRuns::ModelId)?,
            config: read_json(&row, ModelRuns::ConfigJson)?.unwrap_or_default(),
            enabled: read_bool(&row, ModelRuns::Enabled)?,
            runid: read_opt_uuid(&row, ModelRuns::Runid)?,
            status: load_status(conn, Statuses::RunId, run_id).await?,
            result: load_prediction(conn, run_id).await?,
        });
    }
    Ok(runs)
}

async fn load_hazard_runs<C: ConnectionTrait>(
    conn: &C,
    stage_id: RecordId,
) -> ModelResult<Vec<HazardModelRun>> {
    let rows = run_rows(conn, stage_id, ModelKind::Hazard).await?;
    let mut runs = Vec::with_capacity(rows.len());
    for row in rows {
        let run_id = read_id(&row, ModelRuns::Id)?;

        let assoc = Query::select()
            .from(HazardSeismicityRuns::Table)
            .column(HazardSeismicityRuns::SeismicityRunId)
            .and_where(Expr::col(HazardSeismicityRuns::HazardRunId).eq(run_id.as_i64()))
            .to_owned();
        let seismicityrun_ids = query_all(conn, &assoc)
            .await?
            .iter()
            .map(|row| read_id(row, HazardSeismicityRuns::SeismicityRunId))
            .collect::<ModelResult<Vec<_>>>()?;

        runs.push(HazardModelRun {
            id: Some(run_id),
            stage_id: read_opt_id(&row, ModelRuns::StageId)?,
            model_id: read_opt_id(&row, ModelRuns::ModelId)?,
            config: read_json(&row, ModelRuns::ConfigJson)?.unwrap_or_default(),
            enabled: read_bool(&row, ModelRuns::Enabled)?,
            runid: read_opt_uuid(&row, ModelRuns::Runid)?,
            status: load_status(conn, Statuses::RunId, run_id).await?,
            describedinterval: Epoch {
                starttime: read_opt_datetime(&row, ModelRuns::DescribedintervalStart)?,
                endtime: read_opt_datetime(&row, ModelRuns::DescribedintervalEnd)?,
            },
            seismicityrun_ids,
            hazardcurves: load_curves(conn, run_id).await?,
            hazardmaps: load_maps(conn, run_id).await?,
            hazardpointvalues: load_point_values(conn, PointValueScope::Standalone(run_id)).await?,
        });
    }
    Ok(runs)
}

async fn load_risk_runs<C: ConnectionTrait>(
    conn: &C,
    stage_id: RecordId,
) -> ModelResult<Vec<RiskModelRun>> {
    let rows = run_rows(conn, stage_id, ModelKind::Risk).await?;
    let mut runs = Vec::with_capacity(rows.len());
    for row in rows {
        let run_id = read_id(&row, ModelRuns::Id)?;
        runs.push(RiskModelRun {
            id: Some(run_id),
            stage_id: read_opt_id(&row, ModelRuns::StageId)?,
            model_id: read_opt_id(&row, ModelRuns::ModelId)?,
            config: read_json(&row, ModelRuns::ConfigJson)?.unwrap_or_default(),
            enabled: read_bool(&row, ModelRuns::Enabled)?,
            runid: read_opt_uuid(&row, ModelRuns::Runid)?,
            status: load_status(conn, Statuses::RunId, run_id).await?,
        });
    }
    Ok(runs)
}

async fn load_prediction<C: ConnectionTrait>(
    conn: &C,
    run_id: RecordId,
) -> ModelResult<Option<ReservoirSeismicityPrediction>> {
    let select = Query::select()
        .from(SeismicityPredictions::Table)
        .columns([
            SeismicityPredictions::Id,
            SeismicityPredictions::RunId,
            SeismicityPredictions::GeomWkt,
            SeismicityPredictions::RateJson,
            SeismicityPredictions::BvalueJson,
        ])
        .and_where(Expr::col(SeismicityPredictions::RunId).eq(run_id.as_i64()))
        .limit(1)
        .to_owned();
    let row = match query_one(conn, &select).await? {
        Some(row) => row,
        None => return Ok(None),
    };

    let prediction_id = read_id(&row, SeismicityPredictions::Id)?;
    Ok(Some(ReservoirSeismicityPrediction {
        id: Some(prediction_id),
        run_id: read_opt_id(&row, SeismicityPredictions::RunId)?,
        geom: read_string(&row, SeismicityPredictions::GeomWkt)?,
        rate: read_json(&row, SeismicityPredictions::RateJson)?,
        bvalue: read_json(&row, SeismicityPredictions::BvalueJson)?,
        bins: load_bins(conn, prediction_id).await?,
    }))
}

async fn load_bins<C: ConnectionTrait>(
    conn: &C,
    prediction_id: RecordId,
) -> ModelResult<Vec<SeismicityPredictionBin>> {
    let select = Query::select()
        .from(SeismicityPredictionBins::Table)
        .columns([
            SeismicityPredictionBins::Id,
            SeismicityPredictionBins::PredictionId,
            SeismicityPredictionBins::Starttime,
            SeismicityPredictionBins::Endtime,
            SeismicityPredictionBins::NumbereventsJson,
            SeismicityPredictionBins::AJson,
            SeismicityPredictionBins::BJson,
            SeismicityPredictionBins::McJson,
        ])
        .and_where(Expr::col(SeismicityPredictionBins::PredictionId).eq(prediction_id.as_i64()))
        .to_owned();
    let rows = query_all(conn, &select).await?;
    rows.iter()
        .map(|row| {
            Ok(SeismicityPredictionBin {
                id: Some(read_id(row, SeismicityPredictionBins::Id)?),
                prediction_id: read_opt_id(row, SeismicityPredictionBins::PredictionId)?,
                starttime: read_opt_datetime(row, SeismicityPredictionBins::Starttime)?,
                endtime: read_opt_datetime(row, SeismicityPredictionBins::Endtime)?,
                numberevents: read_json(row, SeismicityPredictionBins::NumbereventsJson)?,
                a: read_json(row, SeismicityPredictionBins::AJson)?,
                b: read_json(row, SeismicityPredictionBins::BJson)?,
                mc: read_json(row, SeismicityPredictionBins::McJson)?,
            })
        })
        .collect()
}

enum PointValueScope {
    Standalone(RecordId),
    Curve(RecordId),
    Map(RecordId),
}

async fn load_point_values<C: ConnectionTrait>(
    conn: &C,
    scope: PointValueScope,
) -> ModelResult<Vec<HazardPointValue>> {
    let mut select = Query::select()
        .from(HazardPointValues::Table)
        .columns([
            HazardPointValues::Id,
            HazardPointValues::RunId,
            HazardPointValues::CurveId,
            HazardPointValues::MapId,
            HazardPointValues::GeopointId,
            HazardPointValues::Groundmotion,
            HazardPointValues::Poe,
            HazardPointValues::Hazardintensitytype,
            HazardPointValues::Spectralperiod,
        ])
        .to_owned();
    match scope {
        PointValueScope::Standalone(run_id) => {
            select
                .and_where(Expr::col(HazardPointValues::RunId).eq(run_id.as_i64()))
                .and_where(Expr::col(HazardPointValues::CurveId).is_null())
                .and_where(Expr::col(HazardPointValues::MapId).is_null());
        }
        PointValueScope::Curve(curve_id) => {
            select.and_where(Expr::col(HazardPointValues::CurveId).eq(curve_id.as_i64()));
        }
        PointValueScope::Map(map_id) => {
            select.and_where(Expr::col(HazardPointValues::MapId).eq(map_id.as_i64()));
        }
    }
    let rows = query_all(conn, &select).await?;

    let mut values = Vec::with_capacity(rows.len());
    for row in rows {
        let geopoint = match read_opt_id(&row, HazardPointValues::GeopointId)? {
            Some(geopoint_id) => load_geopoint(conn, geopoint_id).await?,
            None => None,
        };
        values.push(HazardPointValue {
            id: Some(read_id(&row, HazardPointValues::Id)?),
            run_id: read_opt_id(&row, HazardPointValues::RunId)?,
            curve_id: read_opt_id(&row, HazardPointValues::CurveId)?,
            map_id: read_opt_id(&row, HazardPointValues::MapId)?,
            groundmotion: read_opt_f64(&row, HazardPointValues::Groundmotion)?,
            poe: read_opt_f64(&row, HazardPointValues::Poe)?,
            hazardintensitytype: read_opt_string(&row, HazardPointValues::Hazardintensitytype)?,
            spectralperiod: read_opt_f64(&row, HazardPointValues::Spectralperiod)?,
            geopoint,
        });
    }
    Ok(values)
}

async fn load_geopoint<C: ConnectionTrait>(
    conn: &C,
    id: RecordId,
) -> ModelResult<Option<GeoPoint>> {
    let select = Query::select()
        .from(GeoPoints::Table)
        .columns([GeoPoints::Id, GeoPoints::Lat, GeoPoints::Lon])
        .and_where(Expr::col(GeoPoints::Id).eq(id.as_i64()))
        .limit(1)
        .to_owned();
    Ok(match query_one(conn, &select).await? {
        Some(row) => Some(GeoPoint {
            id: Some(read_id(&row, GeoPoints::Id)?),
            lat: read_f64(&row, GeoPoints::Lat)?,
            lon: read_f64(&row, GeoPoints::Lon)?,
        }),
        None => None,
    })
}

async fn load_curves<C: ConnectionTrait>(
    conn: &C,
    run_id: RecordId,
) -> ModelResult<Vec<HazardCurve>> {
    let curve_ids =
        select_ids(conn, HazardCurves::Table, HazardCurves::Id, HazardCurves::RunId, &[
            run_id.as_i64(),
        ])
        .await?;
    let mut curves = Vec::with_capacity(curve_ids.len());
    for curve_id in curve_ids {
        curves.push(HazardCurve {
            id: Some(RecordId(curve_id)),
            run_id: Some(run_id),
            samples: load_point_values(conn, PointValueScope::Curve(RecordId(curve_id))).await?,
        });
    }
    Ok(curves)
}

async fn load_maps<C: ConnectionTrait>(conn: &C, run_id: RecordId) -> ModelResult<Vec<HazardMap>> {
    let map_ids =
        select_ids(conn, HazardMaps::Table, HazardMaps::Id, HazardMaps::RunId, &[run_id.as_i64()])
            .await?;
    let mut maps = Vec::with_capacity(map_ids.len());
    for map_id in map_ids {
        maps.push(HazardMap {
            id: Some(RecordId(map_id)),
            run_id: Some(run_id),
            samples: load_point_values(conn, PointValueScope::Map(RecordId(map_id))).await?,
        });
    }
    Ok(maps)
}

async fn load_skilltests<C: ConnectionTrait>(
    conn: &C,
    stage_id: RecordId,
) -> ModelResult<Vec<SkillTest>> {
    let select = Query::select()
        .from(SkillTests::Table)
        .columns([
            SkillTests::Id,
            SkillTests::StageId,
            SkillTests::SkillScore,
            SkillTests::TestInterval,
            SkillTests::SpatialExtent,
        ])
        .and_where(Expr::col(SkillTests::StageId).eq(stage_id.as_i64()))
        .to_owned();
    let rows = query_all(conn, &select).await?;

    let mut skilltests = Vec::with_capacity(rows.len());
    for row in rows {
        let skilltest_id = read_id(&row, SkillTests::Id)?;
        skilltests.push(SkillTest {
            id: Some(skilltest_id),
            stage_id: read_opt_id(&row, SkillTests::StageId)?,
            skill_score: read_opt_f64(&row, SkillTests::SkillScore)?,
            test_interval: read_opt_f64(&row, SkillTests::TestInterval)?,
            spatial_extent: read_opt_f64(&row, SkillTests::SpatialExtent)?,
            reference_catalog: load_catalogs_by_owner(conn, SeismicCatalogs::SkilltestId, skilltest_id)
                .await?
                .into_iter()
                .next(),
        });
    }
    Ok(skilltests)
}

async fn load_status<C: ConnectionTrait>(
    conn: &C,
    owner_col: Statuses,
    owner_id: RecordId,
) -> ModelResult<Status> {
    let select = Query::select()
        .from(Statuses::Table)
        .columns([
            Statuses::Id,
            Statuses::RunId,
            Statuses::Uuid,
            Statuses::State,
            Statuses::InfoJson,
            Statuses::Starttime,
            Statuses::Endtime,
        ])
        .and_where(Expr::col(owner_col).eq(owner_id.as_i64()))
        .limit(1)
        .to_owned();
    let row = match query_one(conn, &select).await? {
        Some(row) => row,
        None => return Ok(Status::new()),
    };

    let mut status = Status::new();
    status.id = Some(read_id(&row, Statuses::Id)?);
    status.run_id = read_opt_id(&row, Statuses::RunId)?;
    status.uuid = read_uuid(&row, Statuses::Uuid)?;
    status.state = RunState::from_i16(read_i16(&row, Statuses::State)?)
        .ok_or_else(|| ModelError::storage("unknown status state"))?;
    status.info = read_json(&row, Statuses::InfoJson)?.unwrap_or_default();
    status.starttime = read_datetime(&row, Statuses::Starttime)?;
    status.endtime = read_opt_datetime(&row, Statuses::Endtime)?;
    Ok(status)
}

async fn model_rows<C: ConnectionTrait>(
    conn: &C,
    kind: ModelKind,
) -> ModelResult<Vec<QueryResult>> {
    let select = Query::select()
        .from(Models::Table)
        .columns([
            Models::Id,
            Models::Name,
            Models::Enabled,
            Models::ConfigJson,
            Models::Url,
            Models::Sfmwid,
            Models::Logictreetemplate,
            Models::Jobconfigfile,
            Models::Gmpefile,
        ])
        .and_where(Expr::col(Models::Kind).eq(kind.as_i16()))
        .to_owned();
    query_all(conn, &select).await
}

// ----------------------------------------------------------------------
// Delete & sweep

async fn delete_forecast_tx(tx: &DatabaseTransaction, id: RecordId) -> ModelResult<()> {
    let forecast_id = id.as_i64();
    let scenario_ids = select_ids(
        tx,
        ForecastScenarios::Table,
        ForecastScenarios::Id,
        ForecastScenarios::ForecastId,
        &[forecast_id],
    )
    .await?;
    let stage_ids = select_ids(
        tx,
        ForecastStages::Table,
        ForecastStages::Id,
        ForecastStages::ScenarioId,
        &scenario_ids,
    )
    .await?;
    let run_ids =
        select_ids(tx, ModelRuns::Table, ModelRuns::Id, ModelRuns::StageId, &stage_ids).await?;

    // Seismicity results.
    let prediction_ids = select_ids(
        tx,
        SeismicityPredictions::Table,
        SeismicityPredictions::Id,
        SeismicityPredictions::RunId,
        &run_ids,
    )
    .await?;
    delete_where_in(
        tx,
        SeismicityPredictionBins::Table,
        SeismicityPredictionBins::PredictionId,
        &prediction_ids,
    )
    .await?;
    delete_where_in(tx, SeismicityPredictions::Table, SeismicityPredictions::Id, &prediction_ids)
        .await?;

    // Hazard results.
    let geopoint_ids = select_ids(
        tx,
        HazardPointValues::Table,
        HazardPointValues::GeopointId,
        HazardPointValues::RunId,
        &run_ids,
    )
    .await?;
    delete_where_in(tx, HazardPointValues::Table, HazardPointValues::RunId, &run_ids).await?;
    delete_where_in(tx, GeoPoints::Table, GeoPoints::Id, &geopoint_ids).await?;
    delete_where_in(tx, HazardCurves::Table, HazardCurves::RunId, &run_ids).await?;
    delete_where_in(tx, HazardMaps::Table, HazardMaps::RunId, &run_ids).await?;
    delete_where_in(
        tx,
        HazardSeismicityRuns::Table,
        HazardSeismicityRuns::HazardRunId,
        &run_ids,
    )
    .await?;

    // Skill tests detach their reference catalogs before going away.
    let skilltest_ids =
        select_ids(tx, SkillTests::Table, SkillTests::Id, SkillTests::StageId, &stage_ids).await?;
    detach_where_in(tx, SeismicCatalogs::Table, SeismicCatalogs::SkilltestId, &skilltest_ids)
        .await?;
    delete_where_in(tx, SkillTests::Table, SkillTests::Id, &skilltest_ids).await?;

    // Statuses on every level.
    delete_where_in(tx, Statuses::Table, Statuses::RunId, &run_ids).await?;
    delete_where_in(tx, Statuses::Table, Statuses::StageId, &stage_ids).await?;
    delete_where_in(tx, Statuses::Table, Statuses::ScenarioId, &scenario_ids).await?;
    delete_where_in(tx, Statuses::Table, Statuses::ForecastId, &[forecast_id]).await?;

    delete_where_in(tx, ModelRuns::Table, ModelRuns::Id, &run_ids).await?;
    delete_where_in(tx, ForecastStages::Table, ForecastStages::Id, &stage_ids).await?;

    // Multi-parent records are detached, not deleted.
    detach_where_in(tx, InjectionWells::Table, InjectionWells::ScenarioId, &scenario_ids).await?;
    detach_where_in(tx, HydraulicSeries::Table, HydraulicSeries::ScenarioId, &scenario_ids)
        .await?;
    delete_where_in(tx, ForecastScenarios::Table, ForecastScenarios::Id, &scenario_ids).await?;

    detach_where_in(tx, SeismicCatalogs::Table, SeismicCatalogs::ForecastId, &[forecast_id])
        .await?;
    detach_where_in(tx, InjectionWells::Table, InjectionWells::ForecastId, &[forecast_id])
        .await?;

    delete_where_in(tx, Forecasts::Table, Forecasts::Id, &[forecast_id]).await?;
    Ok(())
}

async fn sweep_orphans_tx(tx: &DatabaseTransaction) -> ModelResult<u64> {
    let mut swept = 0u64;

    // Catalogs with no remaining owner.
    let orphan_catalogs = Query::select()
        .from(SeismicCatalogs::Table)
        .column(SeismicCatalogs::Id)
        .and_where(Expr::col(SeismicCatalogs::ProjectId).is_null())
        .and_where(Expr::col(SeismicCatalogs::ForecastId).is_null())
        .and_where(Expr::col(SeismicCatalogs::SkilltestId).is_null())
        .to_owned();
    let catalog_ids = query_all(tx, &orphan_catalogs)
        .await?
        .iter()
        .map(|row| row.try_get::<i64>("", &col_name(SeismicCatalogs::Id)).map_err(db_err))
        .collect::<ModelResult<Vec<_>>>()?;
    delete_where_in(tx, SeismicEvents::Table, SeismicEvents::CatalogId, &catalog_ids).await?;
    delete_where_in(tx, SeismicCatalogs::Table, SeismicCatalogs::Id, &catalog_ids).await?;
    swept += catalog_ids.len() as u64;

    // Wells with no remaining owner, including their hydraulic series.
    let orphan_wells = Query::select()
        .from(InjectionWells::Table)
        .column(InjectionWells::Id)
        .and_where(Expr::col(InjectionWells::ProjectId).is_null())
        .and_where(Expr::col(InjectionWells::ForecastId).is_null())
        .and_where(Expr::col(InjectionWells::ScenarioId).is_null())
        .to_owned();
    let well_ids = query_all(tx, &orphan_wells)
        .await?
        .iter()
        .map(|row| row.try_get::<i64>("", &col_name(InjectionWells::Id)).map_err(db_err))
        .collect::<ModelResult<Vec<_>>>()?;
    let section_ids =
        select_ids(tx, WellSections::Table, WellSections::Id, WellSections::WellId, &well_ids)
            .await?;
    let series_ids = select_ids(
        tx,
        HydraulicSeries::Table,
        HydraulicSeries::Id,
        HydraulicSeries::SectionId,
        &section_ids,
    )
    .await?;
    delete_where_in(tx, HydraulicSamples::Table, HydraulicSamples::SeriesId, &series_ids).await?;
    delete_where_in(tx, HydraulicSeries::Table, HydraulicSeries::Id, &series_ids).await?;
    delete_where_in(tx, WellSections::Table, WellSections::Id, &section_ids).await?;
    delete_where_in(tx, InjectionWells::Table, InjectionWells::Id, &well_ids).await?;
    swept += well_ids.len() as u64;

    if swept > 0 {
        log::info!("orphan sweep removed {swept} records");
    }
    Ok(swept)
}

// ----------------------------------------------------------------------
// Query plumbing

fn build_connection_url(config: &StoreConfig, base_dir: &Path) -> ModelResult<String> {
    match &config.database {
        DatabaseConfig::Sqlite { .. } => {
            let path = config.sqlite_path(base_dir)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| ModelError::storage(format!("create db dir: {err}")))?;
            }
            Ok(format!("sqlite://{}?mode=rwc", path.to_string_lossy()))
        }
        DatabaseConfig::Postgres { url } => Ok(url.clone()),
    }
}

fn db_err(err: sea_orm::DbErr) -> ModelError {
    ModelError::storage(err.to_string())
}

fn rid_value(id: Option<RecordId>) -> SimpleExpr {
    SeaValue::BigInt(id.map(RecordId::as_i64)).into()
}

fn json_value<T: Serialize>(value: &T) -> ModelResult<SimpleExpr> {
    let raw = serde_json::to_string(value).map_err(|err| ModelError::storage(err.to_string()))?;
    Ok(raw.into())
}

fn opt_json_value<T: Serialize>(value: &Option<T>) -> ModelResult<SimpleExpr> {
    match value {
        Some(value) => json_value(value),
        None => Ok(SeaValue::String(None).into()),
    }
}

fn col_name(column: impl Iden) -> String {
    column.to_string()
}

fn read_json<T: DeserializeOwned>(
    row: &QueryResult,
    column: impl Iden,
) -> ModelResult<Option<T>> {
    let raw: Option<String> = row.try_get("", &col_name(column)).map_err(db_err)?;
    match raw {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| ModelError::storage(err.to_string())),
        None => Ok(None),
    }
}

fn read_id(row: &QueryResult, column: impl Iden) -> ModelResult<RecordId> {
    let value: i64 = row.try_get("", &col_name(column)).map_err(db_err)?;
    Ok(RecordId(value))
}

fn read_opt_id(row: &QueryResult, column: impl Iden) -> ModelResult<Option<RecordId>> {
    let value: Option<i64> = row.try_get("", &col_name(column)).map_err(db_err)?;
    Ok(value.map(RecordId))
}

fn read_string(row: &QueryResult, column: impl Iden) -> ModelResult<String> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_opt_string(row: &QueryResult, column: impl Iden) -> ModelResult<Option<String>> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_bool(row: &QueryResult, column: impl Iden) -> ModelResult<bool> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_opt_bool(row: &QueryResult, column: impl Iden) -> ModelResult<Option<bool>> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_i16(row: &QueryResult, column: impl Iden) -> ModelResult<i16> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_f64(row: &QueryResult, column: impl Iden) -> ModelResult<f64> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_opt_f64(row: &QueryResult, column: impl Iden) -> ModelResult<Option<f64>> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_bytes(row: &QueryResult, column: impl Iden) -> ModelResult<Vec<u8>> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_datetime(row: &QueryResult, column: impl Iden) -> ModelResult<DateTime<Utc>> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_opt_datetime(
    row: &QueryResult,
    column: impl Iden,
) -> ModelResult<Option<DateTime<Utc>>> {
    row.try_get("", &col_name(column)).map_err(db_err)
}

fn read_uuid(row: &QueryResult, column: impl Iden) -> ModelResult<Uuid> {
    let raw: String = row.try_get("", &col_name(column)).map_err(db_err)?;
    Uuid::parse_str(&raw).map_err(|err| ModelError::storage(format!("invalid uuid: {err}")))
}

fn read_opt_uuid(row: &QueryResult, column: impl Iden) -> ModelResult<Option<Uuid>> {
    let raw: Option<String> = row.try_get("", &col_name(column)).map_err(db_err)?;
    raw.map(|raw| {
        Uuid::parse_str(&raw).map_err(|err| ModelError::storage(format!("invalid uuid: {err}")))
    })
    .transpose()
}

fn build_stmt<S: QueryStatementWriter>(
    backend: DatabaseBackend,
    stmt: &S,
) -> (String, sea_orm::sea_query::Values) {
    match backend {
        DatabaseBackend::Postgres => stmt.build(PostgresQueryBuilder),
        _ => stmt.build(SqliteQueryBuilder),
    }
}

async fn exec<C, S>(conn: &C, stmt: &S) -> ModelResult<()>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    let backend = conn.get_database_backend();
    let (sql, values) = build_stmt(backend, stmt);
    conn.execute(Statement::from_sql_and_values(backend, sql, values))
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn query_all<C, S>(conn: &C, stmt: &S) -> ModelResult<Vec<QueryResult>>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    let backend = conn.get_database_backend();
    let (sql, values) = build_stmt(backend, stmt);
    conn.query_all(Statement::from_sql_and_values(backend, sql, values))
        .await
        .map_err(db_err)
}

async fn query_one<C, S>(conn: &C, stmt: &S) -> ModelResult<Option<QueryResult>>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    let backend = conn.get_database_backend();
    let (sql, values) = build_stmt(backend, stmt);
    conn.query_one(Statement::from_sql_and_values(backend, sql, values))
        .await
        .map_err(db_err)
}

async fn insert_returning_id<C, T>(
    conn: &C,
    mut insert: InsertStatement,
    id_col: T,
) -> ModelResult<RecordId>
where
    C: ConnectionTrait,
    T: Iden + Copy + 'static,
{
    insert.returning(Query::returning().column(id_col));
    let row = query_one(conn, &insert)
        .await?
        .ok_or_else(|| ModelError::storage("insert returned no id"))?;
    read_id(&row, id_col)
}

async fn select_ids<C, T>(
    conn: &C,
    table: T,
    select_col: T,
    filter_col: T,
    values: &[i64],
) -> ModelResult<Vec<i64>>
where
    C: ConnectionTrait,
    T: Iden + Copy + 'static,
{
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let select = Query::select()
        .from(table)
        .column(select_col)
        .and_where(Expr::col(filter_col).is_in(values.iter().copied()))
        .and_where(Expr::col(select_col).is_not_null())
        .to_owned();
    let rows = query_all(conn, &select).await?;
    rows.iter()
        .map(|row| row.try_get::<i64>("", &col_name(select_col)).map_err(db_err))
        .collect()
}

async fn delete_where_in<C, T>(conn: &C, table: T, column: T, ids: &[i64]) -> ModelResult<()>
where
    C: ConnectionTrait,
    T: Iden + Copy + 'static,
{
    if ids.is_empty() {
        return Ok(());
    }
    let delete = Query::delete()
        .from_table(table)
        .and_where(Expr::col(column).is_in(ids.iter().copied()))
        .to_owned();
    exec(conn, &delete).await
}

async fn detach_where_in<C, T>(conn: &C, table: T, column: T, ids: &[i64]) -> ModelResult<()>
where
    C: ConnectionTrait,
    T: Iden + Copy + 'static,
{
    if ids.is_empty() {
        return Ok(());
    }
    let update = Query::update()
        .table(table)
        .values([(column, SeaValue::BigInt(None).into())])
        .and_where(Expr::col(column).is_in(ids.iter().copied()))
        .to_owned();
    exec(conn, &update).await
}
