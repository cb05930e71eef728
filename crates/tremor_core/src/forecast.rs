use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};

use crate::error::{ModelError, ModelResult};
use crate::meta::{CreationInfo, Epoch};
use crate::model::ModelKind;
use crate::record::{Record, RecordId, fk};
use crate::results::SkillTest;
use crate::runs::{HazardModelRun, RiskModelRun, SeismicityModelRun};
use crate::seismics::SeismicCatalog;
use crate::status::Status;
use crate::well::InjectionWell;

/// Kind-specific content of a forecast stage.
#[derive(Debug, PartialEq)]
pub enum StagePayload {
    Seismicity { runs: Vec<SeismicityModelRun> },
    SeismicitySkill { skilltests: Vec<SkillTest> },
    Hazard { runs: Vec<HazardModelRun> },
    Risk { runs: Vec<RiskModelRun> },
}

impl StagePayload {
    pub fn kind(&self) -> ModelKind {
        match self {
            StagePayload::Seismicity { .. } => ModelKind::Seismicity,
            StagePayload::SeismicitySkill { .. } => ModelKind::SeismicitySkill,
            StagePayload::Hazard { .. } => ModelKind::Hazard,
            StagePayload::Risk { .. } => ModelKind::Risk,
        }
    }
}

/// Groups the model runs of one kind within a scenario.
#[derive(Debug)]
pub struct ForecastStage {
    pub id: Option<RecordId>,
    pub scenario_id: Option<RecordId>,

    pub config: Map<String, JsonValue>,
    pub enabled: bool,
    pub status: Status,
    pub payload: StagePayload,
}

impl ForecastStage {
    pub fn new(payload: StagePayload) -> Self {
        Self {
            id: None,
            scenario_id: None,
            config: Map::new(),
            enabled: true,
            status: Status::new(),
            payload,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.payload.kind()
    }

    pub fn reset(&mut self) {
        self.status.reset();
        match &mut self.payload {
            StagePayload::Seismicity { runs } => runs.iter_mut().for_each(SeismicityModelRun::reset),
            StagePayload::SeismicitySkill { skilltests } => {
                skilltests.iter_mut().for_each(SkillTest::reset)
            }
            StagePayload::Hazard { runs } => runs.iter_mut().for_each(HazardModelRun::reset),
            StagePayload::Risk { runs } => runs.iter_mut().for_each(RiskModelRun::reset),
        }
    }

    pub fn clone_stage(&self, with_results: bool) -> ModelResult<Self> {
        let payload = match &self.payload {
            StagePayload::Seismicity { runs } => StagePayload::Seismicity {
                runs: runs
                    .iter()
                    .map(|r| r.clone_run(with_results))
                    .collect::<ModelResult<_>>()?,
            },
            StagePayload::SeismicitySkill { skilltests } => StagePayload::SeismicitySkill {
                skilltests: skilltests
                    .iter()
                    .map(|t| {
                        let mut copy = t.clone_record(false);
                        if !with_results {
                            copy.reset();
                        }
                        copy
                    })
                    .collect(),
            },
            StagePayload::Hazard { runs } => StagePayload::Hazard {
                runs: runs
                    .iter()
                    .map(|r| r.clone_run(with_results))
                    .collect::<ModelResult<_>>()?,
            },
            StagePayload::Risk { runs } => StagePayload::Risk {
                runs: runs
                    .iter()
                    .map(|r| r.clone_run(with_results))
                    .collect::<ModelResult<_>>()?,
            },
        };
        let mut new = ForecastStage::new(payload);
        new.config = self.config.clone();
        new.enabled = self.enabled;
        Ok(new)
    }
}

impl PartialEq for ForecastStage {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.enabled == other.enabled
            && self.payload == other.payload
    }
}

/// User-configurable input variant of a forecast: an injection strategy
/// plus the stages to compute for it.
#[derive(Debug, Default)]
pub struct ForecastScenario {
    pub id: Option<RecordId>,
    pub forecast_id: Option<RecordId>,

    pub name: Option<String>,
    pub config: Map<String, JsonValue>,
    pub status: Status,
    /// Reservoir geometry as WKT (GEOMETRYZ).
    pub reservoirgeom: Option<String>,
    pub well: Option<InjectionWell>,
    pub stages: Vec<ForecastStage>,
}

impl ForecastScenario {
    pub fn new(name: impl Into<String>, stages: Vec<ForecastStage>) -> Self {
        Self {
            name: Some(name.into()),
            stages,
            ..Self::default()
        }
    }

    /// The scenario's stage of the given kind.
    pub fn stage(&self, kind: ModelKind) -> ModelResult<&ForecastStage> {
        self.stages
            .iter()
            .find(|s| s.kind() == kind)
            .ok_or_else(|| ModelError::not_found(format!("scenario has no {kind:?} stage")))
    }

    pub fn stage_mut(&mut self, kind: ModelKind) -> ModelResult<&mut ForecastStage> {
        self.stages
            .iter_mut()
            .find(|s| s.kind() == kind)
            .ok_or_else(|| ModelError::not_found(format!("scenario has no {kind:?} stage")))
    }

    pub fn reset(&mut self) {
        self.status.reset();
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    pub fn clone_scenario(&self, with_results: bool) -> ModelResult<Self> {
        let mut new = self.clone_record(false);
        new.well = self.well.as_ref().map(|w| w.snapshot(None, None));
        new.stages = self
            .stages
            .iter()
            .map(|s| s.clone_stage(with_results))
            .collect::<ModelResult<_>>()?;
        Ok(new)
    }
}

impl Record for ForecastScenario {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            forecast_id: fk(with_foreign_keys, self.forecast_id),
            name: self.name.clone(),
            config: self.config.clone(),
            status: Status::new(),
            reservoirgeom: self.reservoirgeom.clone(),
            well: None,
            stages: Vec::new(),
        }
    }
}

impl PartialEq for ForecastScenario {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.config == other.config
            && self.reservoirgeom == other.reservoirgeom
            && self.well == other.well
            && self.stages == other.stages
    }
}

/// A forecast: scenarios to compute plus snapshots of the observed input
/// data (seismic catalog, injection well) taken when the forecast is
/// issued.
#[derive(Debug, Default)]
pub struct Forecast {
    pub id: Option<RecordId>,
    pub project_id: Option<RecordId>,

    pub name: Option<String>,
    pub creationinfo: CreationInfo,
    /// Finite interval this forecast covers.
    pub interval: Epoch,
    pub status: Status,
    pub seismiccatalog: Option<SeismicCatalog>,
    pub well: Option<InjectionWell>,
    pub scenarios: Vec<ForecastScenario>,
}

impl Forecast {
    pub fn new(
        name: impl Into<String>,
        starttime: DateTime<Utc>,
        endtime: DateTime<Utc>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            creationinfo: CreationInfo::stamped_now(),
            interval: Epoch::finite(starttime, endtime),
            ..Self::default()
        }
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.interval.duration()
    }

    /// Discard computed state on the whole subtree: input snapshots
    /// dropped, every status back to pending, results removed.
    /// Configuration, enabled flags and model template references stay
    /// untouched.
    pub fn reset(&mut self) {
        self.seismiccatalog = None;
        self.well = None;
        self.status.reset();
        for scenario in &mut self.scenarios {
            scenario.reset();
        }
    }

    /// New unsaved copy of the forecast tree.
    ///
    /// With `with_results` the input snapshots (catalog, well) are copied
    /// along; run results are never copied and make the clone fail (see
    /// the run types). Without, the copy starts from configuration only.
    pub fn clone_forecast(&self, with_results: bool) -> ModelResult<Self> {
        let mut new = self.clone_record(false);
        if with_results {
            new.seismiccatalog = self.seismiccatalog.as_ref().map(|c| c.snapshot(None));
            new.well = self.well.as_ref().map(|w| w.snapshot(None, None));
        }
        new.scenarios = self
            .scenarios
            .iter()
            .map(|s| s.clone_scenario(with_results))
            .collect::<ModelResult<_>>()?;
        Ok(new)
    }
}

impl Record for Forecast {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            project_id: fk(with_foreign_keys, self.project_id),
            name: self.name.clone(),
            creationinfo: self.creationinfo.clone(),
            interval: self.interval,
            status: Status::new(),
            seismiccatalog: None,
            well: None,
            scenarios: Vec::new(),
        }
    }
}

impl PartialEq for Forecast {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.interval == other.interval
            && self.seismiccatalog == other.seismiccatalog
            && self.well == other.well
            && self.scenarios == other.scenarios
    }
}
