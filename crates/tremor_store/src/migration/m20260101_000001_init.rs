use sea_orm_migration::prelude::*;

use crate::db::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(id_col(Projects::Id))
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).text())
                    .col(
                        ColumnDef::new(Projects::Starttime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Projects::Endtime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Projects::ReferencepointJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(id_col(Settings::Id))
                    .col(fk_col(Settings::ProjectId))
                    .col(ColumnDef::new(Settings::Kind).string().not_null())
                    .col(ColumnDef::new(Settings::Updated).timestamp_with_time_zone())
                    .col(ColumnDef::new(Settings::Config).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Models::Table)
                    .if_not_exists()
                    .col(id_col(Models::Id))
                    .col(ColumnDef::new(Models::Kind).small_integer().not_null())
                    .col(ColumnDef::new(Models::Name).string().not_null())
                    .col(
                        ColumnDef::new(Models::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Models::ConfigJson).text())
                    .col(ColumnDef::new(Models::Url).string())
                    .col(ColumnDef::new(Models::Sfmwid).string())
                    .col(ColumnDef::new(Models::Logictreetemplate).string())
                    .col(ColumnDef::new(Models::Jobconfigfile).string())
                    .col(ColumnDef::new(Models::Gmpefile).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Forecasts::Table)
                    .if_not_exists()
                    .col(id_col(Forecasts::Id))
                    .col(fk_col(Forecasts::ProjectId))
                    .col(ColumnDef::new(Forecasts::Name).string())
                    .col(ColumnDef::new(Forecasts::Starttime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Forecasts::Endtime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Forecasts::CreationinfoJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ForecastScenarios::Table)
                    .if_not_exists()
                    .col(id_col(ForecastScenarios::Id))
                    .col(fk_col(ForecastScenarios::ForecastId))
                    .col(ColumnDef::new(ForecastScenarios::Name).string())
                    .col(ColumnDef::new(ForecastScenarios::ConfigJson).text())
                    .col(ColumnDef::new(ForecastScenarios::ReservoirgeomWkt).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ForecastStages::Table)
                    .if_not_exists()
                    .col(id_col(ForecastStages::Id))
                    .col(fk_col(ForecastStages::ScenarioId))
                    .col(ColumnDef::new(ForecastStages::Kind).small_integer().not_null())
                    .col(ColumnDef::new(ForecastStages::ConfigJson).text())
                    .col(
                        ColumnDef::new(ForecastStages::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ModelRuns::Table)
                    .if_not_exists()
                    .col(id_col(ModelRuns::Id))
                    .col(fk_col(ModelRuns::StageId))
                    .col(ColumnDef::new(ModelRuns::Kind).small_integer().not_null())
                    .col(fk_col(ModelRuns::ModelId))
                    .col(ColumnDef::new(ModelRuns::ConfigJson).text())
                    .col(
                        ColumnDef::new(ModelRuns::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ModelRuns::Runid).string())
                    .col(
                        ColumnDef::new(ModelRuns::DescribedintervalStart)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(ModelRuns::DescribedintervalEnd).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Statuses::Table)
                    .if_not_exists()
                    .col(id_col(Statuses::Id))
                    .col(fk_col(Statuses::RunId))
                    .col(fk_col(Statuses::StageId))
                    .col(fk_col(Statuses::ScenarioId))
                    .col(fk_col(Statuses::ForecastId))
                    .col(ColumnDef::new(Statuses::Uuid).string().not_null())
                    .col(ColumnDef::new(Statuses::State).small_integer().not_null())
                    .col(ColumnDef::new(Statuses::InfoJson).text())
                    .col(
                        ColumnDef::new(Statuses::Starttime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Statuses::Endtime).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_statuses_run")
                    .table(Statuses::Table)
                    .col(Statuses::RunId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeismicCatalogs::Table)
                    .if_not_exists()
                    .col(id_col(SeismicCatalogs::Id))
                    .col(fk_col(SeismicCatalogs::ProjectId))
                    .col(fk_col(SeismicCatalogs::ForecastId))
                    .col(fk_col(SeismicCatalogs::SkilltestId))
                    .col(ColumnDef::new(SeismicCatalogs::CreationinfoJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seismiccatalogs_owners")
                    .table(SeismicCatalogs::Table)
                    .col(SeismicCatalogs::ProjectId)
                    .col(SeismicCatalogs::ForecastId)
                    .col(SeismicCatalogs::SkilltestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeismicEvents::Table)
                    .if_not_exists()
                    .col(id_col(SeismicEvents::Id))
                    .col(fk_col(SeismicEvents::CatalogId))
                    .col(ColumnDef::new(SeismicEvents::Quakeml).blob().not_null())
                    .col(ColumnDef::new(SeismicEvents::DatetimeJson).text().not_null())
                    .col(ColumnDef::new(SeismicEvents::XJson).text())
                    .col(ColumnDef::new(SeismicEvents::YJson).text())
                    .col(ColumnDef::new(SeismicEvents::ZJson).text())
                    .col(ColumnDef::new(SeismicEvents::MagnitudeJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seismicevents_catalog")
                    .table(SeismicEvents::Table)
                    .col(SeismicEvents::CatalogId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InjectionWells::Table)
                    .if_not_exists()
                    .col(id_col(InjectionWells::Id))
                    .col(fk_col(InjectionWells::ProjectId))
                    .col(fk_col(InjectionWells::ForecastId))
                    .col(fk_col(InjectionWells::ScenarioId))
                    .col(ColumnDef::new(InjectionWells::Publicid).string())
                    .col(ColumnDef::new(InjectionWells::CreationinfoJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_injectionwells_owners")
                    .table(InjectionWells::Table)
                    .col(InjectionWells::ProjectId)
                    .col(InjectionWells::ForecastId)
                    .col(InjectionWells::ScenarioId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WellSections::Table)
                    .if_not_exists()
                    .col(id_col(WellSections::Id))
                    .col(fk_col(WellSections::WellId))
                    .col(ColumnDef::new(WellSections::ToplongitudeJson).text())
                    .col(ColumnDef::new(WellSections::ToplatitudeJson).text())
                    .col(ColumnDef::new(WellSections::TopdepthJson).text())
                    .col(ColumnDef::new(WellSections::BottomlongitudeJson).text())
                    .col(ColumnDef::new(WellSections::BottomlatitudeJson).text())
                    .col(ColumnDef::new(WellSections::BottomdepthJson).text())
                    .col(ColumnDef::new(WellSections::HolediameterJson).text())
                    .col(ColumnDef::new(WellSections::CasingdiameterJson).text())
                    .col(ColumnDef::new(WellSections::Cased).boolean())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HydraulicSeries::Table)
                    .if_not_exists()
                    .col(id_col(HydraulicSeries::Id))
                    .col(fk_col(HydraulicSeries::SectionId))
                    .col(fk_col(HydraulicSeries::ScenarioId))
                    .col(ColumnDef::new(HydraulicSeries::Kind).small_integer().not_null())
                    .col(ColumnDef::new(HydraulicSeries::CreationinfoJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HydraulicSamples::Table)
                    .if_not_exists()
                    .col(id_col(HydraulicSamples::Id))
                    .col(fk_col(HydraulicSamples::SeriesId))
                    .col(
                        ColumnDef::new(HydraulicSamples::DatetimeJson)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HydraulicSamples::ToptemperatureJson).text())
                    .col(ColumnDef::new(HydraulicSamples::TopflowJson).text())
                    .col(ColumnDef::new(HydraulicSamples::ToppressureJson).text())
                    .col(ColumnDef::new(HydraulicSamples::BottomtemperatureJson).text())
                    .col(ColumnDef::new(HydraulicSamples::BottomflowJson).text())
                    .col(ColumnDef::new(HydraulicSamples::BottompressureJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hydraulicsamples_series")
                    .table(HydraulicSamples::Table)
                    .col(HydraulicSamples::SeriesId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeismicityPredictions::Table)
                    .if_not_exists()
                    .col(id_col(SeismicityPredictions::Id))
                    .col(fk_col(SeismicityPredictions::RunId))
                    .col(
                        ColumnDef::new(SeismicityPredictions::GeomWkt)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SeismicityPredictions::RateJson).text())
                    .col(ColumnDef::new(SeismicityPredictions::BvalueJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeismicityPredictionBins::Table)
                    .if_not_exists()
                    .col(id_col(SeismicityPredictionBins::Id))
                    .col(fk_col(SeismicityPredictionBins::PredictionId))
                    .col(
                        ColumnDef::new(SeismicityPredictionBins::Starttime)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(SeismicityPredictionBins::Endtime)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(SeismicityPredictionBins::NumbereventsJson).text())
                    .col(ColumnDef::new(SeismicityPredictionBins::AJson).text())
                    .col(ColumnDef::new(SeismicityPredictionBins::BJson).text())
                    .col(ColumnDef::new(SeismicityPredictionBins::McJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HazardCurves::Table)
                    .if_not_exists()
                    .col(id_col(HazardCurves::Id))
                    .col(fk_col(HazardCurves::RunId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HazardMaps::Table)
                    .if_not_exists()
                    .col(id_col(HazardMaps::Id))
                    .col(fk_col(HazardMaps::RunId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GeoPoints::Table)
                    .if_not_exists()
                    .col(id_col(GeoPoints::Id))
                    .col(ColumnDef::new(GeoPoints::Lat).double().not_null())
                    .col(ColumnDef::new(GeoPoints::Lon).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HazardPointValues::Table)
                    .if_not_exists()
                    .col(id_col(HazardPointValues::Id))
                    .col(fk_col(HazardPointValues::RunId))
                    .col(fk_col(HazardPointValues::CurveId))
                    .col(fk_col(HazardPointValues::MapId))
                    .col(fk_col(HazardPointValues::GeopointId))
                    .col(ColumnDef::new(HazardPointValues::Groundmotion).double())
                    .col(ColumnDef::new(HazardPointValues::Poe).double())
                    .col(ColumnDef::new(HazardPointValues::Hazardintensitytype).string())
                    .col(ColumnDef::new(HazardPointValues::Spectralperiod).double())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HazardSeismicityRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HazardSeismicityRuns::HazardRunId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HazardSeismicityRuns::SeismicityRunId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_hazard_seismicity_runs")
                            .col(HazardSeismicityRuns::HazardRunId)
                            .col(HazardSeismicityRuns::SeismicityRunId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SkillTests::Table)
                    .if_not_exists()
                    .col(id_col(SkillTests::Id))
                    .col(fk_col(SkillTests::StageId))
                    .col(ColumnDef::new(SkillTests::SkillScore).double())
                    .col(ColumnDef::new(SkillTests::TestInterval).double())
                    .col(ColumnDef::new(SkillTests::SpatialExtent).double())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Table::drop().table(SkillTests::Table).to_owned(),
            Table::drop().table(HazardSeismicityRuns::Table).to_owned(),
            Table::drop().table(HazardPointValues::Table).to_owned(),
            Table::drop().table(GeoPoints::Table).to_owned(),
            Table::drop().table(HazardMaps::Table).to_owned(),
            Table::drop().table(HazardCurves::Table).to_owned(),
            Table::drop().table(SeismicityPredictionBins::Table).to_owned(),
            Table::drop().table(SeismicityPredictions::Table).to_owned(),
            Table::drop().table(HydraulicSamples::Table).to_owned(),
            Table::drop().table(HydraulicSeries::Table).to_owned(),
            Table::drop().table(WellSections::Table).to_owned(),
            Table::drop().table(InjectionWells::Table).to_owned(),
            Table::drop().table(SeismicEvents::Table).to_owned(),
            Table::drop().table(SeismicCatalogs::Table).to_owned(),
            Table::drop().table(Statuses::Table).to_owned(),
            Table::drop().table(ModelRuns::Table).to_owned(),
            Table::drop().table(ForecastStages::Table).to_owned(),
            Table::drop().table(ForecastScenarios::Table).to_owned(),
            Table::drop().table(Forecasts::Table).to_owned(),
            Table::drop().table(Models::Table).to_owned(),
            Table::drop().table(Settings::Table).to_owned(),
            Table::drop().table(Projects::Table).to_owned(),
        ] {
            manager.drop_table(table).await?;
        }
        Ok(())
    }
}

fn id_col(col: impl Iden + 'static) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.big_integer().not_null().auto_increment().primary_key();
    def
}

fn fk_col(col: impl Iden + 'static) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.big_integer();
    def
}
