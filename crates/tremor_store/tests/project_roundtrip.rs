use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use tempfile::tempdir;

use tremor_store::{
    Forecast, ForecastScenario, ForecastStage, GeoPoint, HazardCurve, HazardModelRun,
    HazardPointValue, HydraulicSample, Hydraulics, InjectionPlan, InjectionWell, Project,
    RealQuantity, RecordId, ReservoirSeismicityPrediction, RiskModelRun, RunState, SeismicCatalog,
    SeismicEvent, SeismicityModel, SeismicityModelRun, SeismicityPredictionBin, SkillTest,
    StagePayload, Status, WellSection, open_store,
};

fn dt(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap()
}

fn event(hour: u32, magnitude: f64) -> SeismicEvent {
    let mut e = SeismicEvent::at(dt(hour));
    e.quakeml = format!("<event>M{magnitude}</event>").into_bytes();
    e.magnitude = Some(RealQuantity {
        value: magnitude,
        uncertainty: Some(0.1),
        ..RealQuantity::default()
    });
    e
}

fn sample(hour: u32, flow: f64) -> HydraulicSample {
    let mut s = HydraulicSample::at(dt(hour));
    s.topflow = Some(flow.into());
    s.bottompressure = Some((flow * 10.0).into());
    s
}

fn build_project() -> Project {
    let mut project = Project::new("basel-2006");
    project.description = Some("deep heat mining".to_string());
    project.starttime = dt(0);
    project.endtime = Some(dt(0) + Duration::days(30));

    project
        .seismiccatalogs
        .push(SeismicCatalog::new(vec![event(1, 0.8), event(2, 1.4)]));

    let section = WellSection {
        toplongitude: Some(8.925.into()),
        toplatitude: Some(46.906.into()),
        topdepth: Some(0.0.into()),
        bottomlongitude: Some(9.0.into()),
        bottomlatitude: Some(47.0.into()),
        bottomdepth: Some(500.0.into()),
        holediameter: Some(0.3.into()),
        cased: Some(true),
        hydraulics: Some(Hydraulics::new(vec![sample(1, 10.0), sample(2, 20.0)])),
        injectionplan: Some(InjectionPlan::new(vec![sample(3, 30.0)])),
        ..WellSection::default()
    };
    project
        .wells
        .push(InjectionWell::new("smi:well/basel-1", vec![section]));
    project
}

fn build_forecast(seismicity_model_id: RecordId) -> Forecast {
    let mut run = SeismicityModelRun::new();
    run.model_id = Some(seismicity_model_id);
    run.config.insert("em1_training_epoch_duration".into(), json!(3600));
    run.status = Status::with_state(RunState::Complete);
    let mut prediction = ReservoirSeismicityPrediction::new("POLYHEDRALSURFACE Z EMPTY");
    prediction.rate = Some(4.1.into());
    prediction.bvalue = Some(1.02.into());
    prediction.bins.push(SeismicityPredictionBin {
        starttime: Some(dt(6)),
        endtime: Some(dt(12)),
        numberevents: Some(17.0.into()),
        b: Some(1.02.into()),
        ..SeismicityPredictionBin::default()
    });
    run.result = Some(prediction);
    let seismicity_stage = ForecastStage::new(StagePayload::Seismicity { runs: vec![run] });

    let mut hazard_run = HazardModelRun::new();
    hazard_run.describedinterval = tremor_store::Epoch::finite(dt(6), dt(12));
    hazard_run.hazardcurves.push(HazardCurve {
        samples: vec![HazardPointValue {
            groundmotion: Some(0.2),
            poe: Some(0.05),
            hazardintensitytype: Some("PGA".to_string()),
            spectralperiod: Some(0.3),
            geopoint: Some(GeoPoint::new(47.5596, 7.5886)),
            ..HazardPointValue::default()
        }],
        ..HazardCurve::default()
    });
    let hazard_stage = ForecastStage::new(StagePayload::Hazard {
        runs: vec![hazard_run],
    });

    let skill_stage = ForecastStage::new(StagePayload::SeismicitySkill {
        skilltests: vec![SkillTest {
            skill_score: Some(0.82),
            test_interval: Some(6.0),
            spatial_extent: Some(2.5),
            reference_catalog: Some(SeismicCatalog::new(vec![event(3, 0.9)])),
            ..SkillTest::default()
        }],
    });

    let risk_stage = ForecastStage::new(StagePayload::Risk {
        runs: vec![RiskModelRun::new()],
    });

    let mut scenario = ForecastScenario::new(
        "continue injection",
        vec![seismicity_stage, skill_stage, hazard_stage, risk_stage],
    );
    scenario.config.insert("injection_rate_factor".into(), json!(1.0));
    scenario.reservoirgeom = Some("GEOMETRYCOLLECTION Z EMPTY".to_string());
    scenario.well = Some(InjectionWell::new("smi:well/basel-1/scenario", Vec::new()));

    let mut forecast = Forecast::new("fc-2020-01-01", dt(6), dt(12));
    forecast.seismiccatalog = Some(SeismicCatalog::new(vec![event(1, 0.8)]));
    forecast.well = Some(InjectionWell::new("smi:well/basel-1/snapshot", Vec::new()));
    forecast.scenarios.push(scenario);
    forecast
}

#[tokio::test]
async fn project_tree_roundtrips() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await.expect("open store");

    let mut model = SeismicityModel::new("EM1");
    model.url = Some("http://localhost:5000".to_string());
    model.sfmwid = Some("EM1".to_string());
    let model_id = store.save_seismicity_model(&mut model).await.expect("model");

    let mut project = build_project();
    let project_id = store.save_project(&mut project).await.expect("save project");

    let mut forecast = build_forecast(model_id);
    let forecast_id = store
        .save_forecast(project_id, &mut forecast)
        .await
        .expect("save forecast");

    // Every record got an id assigned in place.
    assert!(project.seismiccatalogs[0].id.is_some());
    assert!(project.seismiccatalogs[0].events[0].id.is_some());
    assert!(project.wells[0].sections[0].id.is_some());
    assert!(forecast.scenarios[0].stages[0].id.is_some());

    let loaded = store.load_project(project_id).await.expect("load project");
    assert_eq!(loaded.name, project.name);
    assert_eq!(loaded.description, project.description);
    assert_eq!(loaded.starttime, project.starttime);
    assert_eq!(loaded.endtime, project.endtime);
    assert_eq!(loaded.settings, project.settings);
    assert_eq!(loaded.seismiccatalogs, project.seismiccatalogs);
    assert_eq!(loaded.wells, project.wells);

    assert_eq!(loaded.forecasts.len(), 1);
    let loaded_forecast = &loaded.forecasts[0];
    assert_eq!(loaded_forecast, &forecast);
    assert_eq!(loaded_forecast.id, Some(forecast_id));

    // Run state and template reference survive the trip.
    let StagePayload::Seismicity { runs } = &loaded_forecast.scenarios[0].stages[0].payload
    else {
        panic!("expected seismicity stage first");
    };
    assert_eq!(runs[0].status.state, RunState::Complete);
    assert_eq!(runs[0].model_id, Some(model_id));
    assert_eq!(runs[0].status, forecast_stage_run_status(&forecast));

    let models = store.list_seismicity_models().await.expect("models");
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].name, "EM1");
    assert_eq!(models[0].id, Some(model_id));
}

fn forecast_stage_run_status(forecast: &Forecast) -> Status {
    let StagePayload::Seismicity { runs } = &forecast.scenarios[0].stages[0].payload else {
        panic!("expected seismicity stage first");
    };
    runs[0].status.clone()
}

#[tokio::test]
async fn settings_roundtrip_preserves_overrides() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await.expect("open store");

    let mut project = Project::new("settings");
    project.settings.set("fdsnws_enable", json!(true));
    project
        .settings
        .set("fdsnws_url", json!("http://arclink.ethz.ch/fdsnws"));
    let project_id = store.save_project(&mut project).await.expect("save");

    let loaded = store.load_project(project_id).await.expect("load");
    assert!(loaded.settings.get_bool("fdsnws_enable").unwrap());
    assert_eq!(
        loaded.settings.get_str("fdsnws_url").unwrap(),
        "http://arclink.ethz.ch/fdsnws"
    );
    // Untouched defaults are still there.
    assert_eq!(loaded.settings.get_f64("forecast_length").unwrap(), 6.0);
}
