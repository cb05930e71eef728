use chrono::{TimeZone, Utc};
use serde_json::json;

use tremor_core::{
    Forecast, ForecastScenario, ForecastStage, InjectionWell, ModelError, ModelKind, RecordId,
    ReservoirSeismicityPrediction, RunState, SeismicCatalog, SeismicEvent, SeismicityModelRun,
    StagePayload, Status, WellSection,
};

fn forecast_with_complete_run() -> Forecast {
    let mut run = SeismicityModelRun::new();
    run.model_id = Some(RecordId(11));
    run.config.insert("foo".into(), json!(42));
    run.runid = Some(uuid::Uuid::new_v4());
    run.status = Status::with_state(RunState::Complete);
    run.result = Some(ReservoirSeismicityPrediction::new(
        "POLYHEDRALSURFACE Z (((0 0 0, 0 2 0, 2 2 0, 2 0 0, 0 0 0)))",
    ));

    let stage = ForecastStage::new(StagePayload::Seismicity { runs: vec![run] });

    let mut scenario = ForecastScenario::new("scenario A", vec![stage]);
    scenario.well = Some(InjectionWell::new(
        "smi:well/01",
        vec![WellSection {
            topdepth: Some(0.0.into()),
            bottomdepth: Some(500.0.into()),
            ..WellSection::default()
        }],
    ));

    let mut forecast = Forecast::new(
        "Forecast",
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2020, 1, 1, 6, 0, 0).unwrap(),
    );
    forecast.seismiccatalog = Some(SeismicCatalog::new(vec![SeismicEvent::at(
        Utc.with_ymd_and_hms(2019, 12, 31, 23, 0, 0).unwrap(),
    )]));
    forecast.well = Some(InjectionWell::new("smi:well/01", Vec::new()));
    forecast.scenarios.push(scenario);
    forecast
}

#[test]
fn clone_without_results_strips_inputs_and_state() {
    let forecast = forecast_with_complete_run();
    let cloned = forecast.clone_forecast(false).expect("clone");

    assert!(cloned.seismiccatalog.is_none());
    assert!(cloned.well.is_none());
    assert_eq!(cloned.scenarios[0].well, forecast.scenarios[0].well);

    let stage = cloned.scenarios[0].stage(ModelKind::Seismicity).unwrap();
    let StagePayload::Seismicity { runs } = &stage.payload else {
        panic!("expected a seismicity stage");
    };
    assert_eq!(runs[0].status.state, RunState::Pending);
    assert!(runs[0].result.is_none());
    assert!(runs[0].runid.is_none());
    // Configuration and the template reference survive.
    assert_eq!(runs[0].config.get("foo"), Some(&json!(42)));
    assert_eq!(runs[0].model_id, Some(RecordId(11)));
}

#[test]
fn clone_with_results_keeps_inputs_but_rejects_run_results() {
    let forecast = forecast_with_complete_run();
    let err = forecast.clone_forecast(true).unwrap_err();
    assert!(matches!(err, ModelError::Unsupported { .. }));

    // Once runs carry no results the with-results clone works and keeps
    // the input snapshots.
    let mut forecast = forecast_with_complete_run();
    forecast.reset();
    forecast.seismiccatalog = Some(SeismicCatalog::new(vec![SeismicEvent::at(
        Utc.with_ymd_and_hms(2019, 12, 31, 23, 0, 0).unwrap(),
    )]));
    forecast.well = Some(InjectionWell::new("smi:well/01", Vec::new()));

    let cloned = forecast.clone_forecast(true).expect("clone with inputs");
    assert_eq!(cloned.seismiccatalog, forecast.seismiccatalog);
    assert_eq!(cloned.well, forecast.well);
}

#[test]
fn reset_discards_state_and_keeps_configuration() {
    let mut forecast = forecast_with_complete_run();
    forecast.reset();

    assert!(forecast.seismiccatalog.is_none());
    assert!(forecast.well.is_none());
    assert_eq!(forecast.status.state, RunState::Pending);

    let stage = forecast.scenarios[0].stage(ModelKind::Seismicity).unwrap();
    assert!(stage.enabled);
    let StagePayload::Seismicity { runs } = &stage.payload else {
        panic!("expected a seismicity stage");
    };
    assert_eq!(runs[0].status.state, RunState::Pending);
    assert!(runs[0].result.is_none());
    assert!(runs[0].runid.is_none());
    assert_eq!(runs[0].config.get("foo"), Some(&json!(42)));
    assert_eq!(runs[0].model_id, Some(RecordId(11)));

    // The scenario well is input configuration, not computed state.
    assert!(forecast.scenarios[0].well.is_some());
}

#[test]
fn stage_lookup_by_kind_reports_missing_stages() {
    let scenario = ForecastScenario::new("bare", Vec::new());
    let err = scenario.stage(ModelKind::Hazard).unwrap_err();
    assert!(matches!(err, ModelError::NotFound { .. }));
}
