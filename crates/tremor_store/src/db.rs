use sea_orm::sea_query;
use sea_orm_migration::prelude::Iden;

#[derive(Iden, Clone, Copy)]
pub enum Projects {
    Table,
    Id,
    Name,
    Description,
    Starttime,
    Endtime,
    ReferencepointJson,
}

#[derive(Iden, Clone, Copy)]
pub enum Settings {
    Table,
    Id,
    ProjectId,
    Kind,
    Updated,
    Config,
}

#[derive(Iden, Clone, Copy)]
pub enum Models {
    Table,
    Id,
    Kind,
    Name,
    Enabled,
    ConfigJson,
    Url,
    Sfmwid,
    Logictreetemplate,
    Jobconfigfile,
    Gmpefile,
}

#[derive(Iden, Clone, Copy)]
pub enum Forecasts {
    Table,
    Id,
    ProjectId,
    Name,
    Starttime,
    Endtime,
    CreationinfoJson,
}

#[derive(Iden, Clone, Copy)]
pub enum ForecastScenarios {
    Table,
    Id,
    ForecastId,
    Name,
    ConfigJson,
    ReservoirgeomWkt,
}

#[derive(Iden, Clone, Copy)]
pub enum ForecastStages {
    Table,
    Id,
    ScenarioId,
    Kind,
    ConfigJson,
    Enabled,
}

#[derive(Iden, Clone, Copy)]
pub enum ModelRuns {
    Table,
    Id,
    StageId,
    Kind,
    ModelId,
    ConfigJson,
    Enabled,
    Runid,
    DescribedintervalStart,
    DescribedintervalEnd,
}

#[derive(Iden, Clone, Copy)]
pub enum Statuses {
    Table,
    Id,
    RunId,
    StageId,
    ScenarioId,
    ForecastId,
    Uuid,
    State,
    InfoJson,
    Starttime,
    Endtime,
}

#[derive(Iden, Clone, Copy)]
pub enum SeismicCatalogs {
    Table,
    Id,
    ProjectId,
    ForecastId,
    SkilltestId,
    CreationinfoJson,
}

#[derive(Iden, Clone, Copy)]
pub enum SeismicEvents {
    Table,
    Id,
    CatalogId,
    Quakeml,
    DatetimeJson,
    XJson,
    YJson,
    ZJson,
    MagnitudeJson,
}

#[derive(Iden, Clone, Copy)]
pub enum InjectionWells {
    Table,
    Id,
    ProjectId,
    ForecastId,
    ScenarioId,
    Publicid,
    CreationinfoJson,
}

#[derive(Iden, Clone, Copy)]
pub enum WellSections {
    Table,
    Id,
    WellId,
    ToplongitudeJson,
    ToplatitudeJson,
    TopdepthJson,
    BottomlongitudeJson,
    BottomlatitudeJson,
    BottomdepthJson,
    HolediameterJson,
    CasingdiameterJson,
    Cased,
}

#[derive(Iden, Clone, Copy)]
pub enum HydraulicSeries {
    Table,
    Id,
    SectionId,
    ScenarioId,
    Kind,
    CreationinfoJson,
}

#[derive(Iden, Clone, Copy)]
pub enum HydraulicSamples {
    Table,
    Id,
    SeriesId,
    DatetimeJson,
    ToptemperatureJson,
    TopflowJson,
    ToppressureJson,
    BottomtemperatureJson,
    BottomflowJson,
    BottompressureJson,
}

#[derive(Iden, Clone, Copy)]
pub enum SeismicityPredictions {
    Table,
    Id,
    RunId,
    GeomWkt,
    RateJson,
    BvalueJson,
}

#[derive(Iden, Clone, Copy)]
pub enum SeismicityPredictionBins {
    Table,
    Id,
    PredictionId,
    Starttime,
    Endtime,
    NumbereventsJson,
    AJson,
    BJson,
    McJson,
}

#[derive(Iden, Clone, Copy)]
pub enum HazardCurves {
    Table,
    Id,
    RunId,
}

#[derive(Iden, Clone, Copy)]
pub enum HazardMaps {
    Table,
    Id,
    RunId,
}

#[derive(Iden, Clone, Copy)]
pub enum GeoPoints {
    Table,
    Id,
    Lat,
    Lon,
}

#[derive(Iden, Clone, Copy)]
pub enum HazardPointValues {
    Table,
    Id,
    RunId,
    CurveId,
    MapId,
    GeopointId,
    Groundmotion,
    Poe,
    Hazardintensitytype,
    Spectralperiod,
}

#[derive(Iden, Clone, Copy)]
pub enum HazardSeismicityRuns {
    Table,
    HazardRunId,
    SeismicityRunId,
}

#[derive(Iden, Clone, Copy)]
pub enum SkillTests {
    Table,
    Id,
    StageId,
    SkillScore,
    TestInterval,
    SpatialExtent,
}
