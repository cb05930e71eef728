use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};
use crate::meta::Epoch;
use crate::record::{Record, RecordId, fk};
use crate::results::{HazardCurve, HazardMap, HazardPointValue, ReservoirSeismicityPrediction};
use crate::status::Status;

/// Run of a seismicity forecast model against one stage's input data.
#[derive(Debug, Default)]
pub struct SeismicityModelRun {
    pub id: Option<RecordId>,
    pub stage_id: Option<RecordId>,
    /// Template reference; templates are top-level and copied by
    /// reference on clone.
    pub model_id: Option<RecordId>,

    pub config: Map<String, JsonValue>,
    pub enabled: bool,
    /// Identifier the remote worker knows this run by.
    pub runid: Option<Uuid>,
    pub status: Status,
    pub result: Option<ReservoirSeismicityPrediction>,
}

impl SeismicityModelRun {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// New unsaved copy of the run.
    ///
    /// Without results the copy starts over: no result, no run id, status
    /// back to pending. Copying a run together with its result is not
    /// implemented and fails rather than silently dropping data.
    pub fn clone_run(&self, with_results: bool) -> ModelResult<Self> {
        if with_results && self.result.is_some() {
            return Err(ModelError::unsupported(
                "copying a seismicity run together with its result",
            ));
        }
        let mut new = self.clone_record(false);
        new.model_id = self.model_id;
        Ok(new)
    }

    pub fn reset(&mut self) {
        self.result = None;
        self.runid = None;
        self.status.reset();
    }
}

impl Record for SeismicityModelRun {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            stage_id: fk(with_foreign_keys, self.stage_id),
            model_id: fk(with_foreign_keys, self.model_id),
            config: self.config.clone(),
            enabled: self.enabled,
            runid: None,
            status: Status::new(),
            result: None,
        }
    }
}

impl PartialEq for SeismicityModelRun {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.enabled == other.enabled
            && self.result == other.result
    }
}

/// Run of a hazard model over the results of associated seismicity runs.
#[derive(Debug, Default)]
pub struct HazardModelRun {
    pub id: Option<RecordId>,
    pub stage_id: Option<RecordId>,
    pub model_id: Option<RecordId>,

    pub config: Map<String, JsonValue>,
    pub enabled: bool,
    pub runid: Option<Uuid>,
    pub status: Status,

    /// Interval of the seismicity predictions this run covers.
    pub describedinterval: Epoch,
    /// Seismicity runs whose predictions feed this hazard computation.
    pub seismicityrun_ids: Vec<RecordId>,
    pub hazardcurves: Vec<HazardCurve>,
    pub hazardmaps: Vec<HazardMap>,
    pub hazardpointvalues: Vec<HazardPointValue>,
}

impl HazardModelRun {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    fn has_results(&self) -> bool {
        !self.hazardcurves.is_empty()
            || !self.hazardmaps.is_empty()
            || !self.hazardpointvalues.is_empty()
    }

    pub fn clone_run(&self, with_results: bool) -> ModelResult<Self> {
        if with_results && self.has_results() {
            return Err(ModelError::unsupported(
                "copying a hazard run together with its results",
            ));
        }
        let mut new = self.clone_record(false);
        new.model_id = self.model_id;
        new.seismicityrun_ids = self.seismicityrun_ids.clone();
        Ok(new)
    }

    pub fn reset(&mut self) {
        self.hazardcurves.clear();
        self.hazardmaps.clear();
        self.hazardpointvalues.clear();
        self.runid = None;
        self.status.reset();
    }
}

impl Record for HazardModelRun {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            stage_id: fk(with_foreign_keys, self.stage_id),
            model_id: fk(with_foreign_keys, self.model_id),
            config: self.config.clone(),
            enabled: self.enabled,
            runid: None,
            status: Status::new(),
            describedinterval: self.describedinterval,
            seismicityrun_ids: Vec::new(),
            hazardcurves: Vec::new(),
            hazardmaps: Vec::new(),
            hazardpointvalues: Vec::new(),
        }
    }
}

impl PartialEq for HazardModelRun {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.enabled == other.enabled
            && self.describedinterval == other.describedinterval
            && self.hazardcurves == other.hazardcurves
            && self.hazardmaps == other.hazardmaps
            && self.hazardpointvalues == other.hazardpointvalues
    }
}

/// Run of a risk model. No result shape is defined for risk yet; the run
/// only tracks configuration and processing state.
#[derive(Debug, Default)]
pub struct RiskModelRun {
    pub id: Option<RecordId>,
    pub stage_id: Option<RecordId>,
    pub model_id: Option<RecordId>,

    pub config: Map<String, JsonValue>,
    pub enabled: bool,
    pub runid: Option<Uuid>,
    pub status: Status,
}

impl RiskModelRun {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn clone_run(&self, _with_results: bool) -> ModelResult<Self> {
        let mut new = self.clone_record(false);
        new.model_id = self.model_id;
        Ok(new)
    }

    pub fn reset(&mut self) {
        self.runid = None;
        self.status.reset();
    }
}

impl Record for RiskModelRun {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            stage_id: fk(with_foreign_keys, self.stage_id),
            model_id: fk(with_foreign_keys, self.model_id),
            config: self.config.clone(),
            enabled: self.enabled,
            runid: None,
            status: Status::new(),
        }
    }
}

impl PartialEq for RiskModelRun {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config && self.enabled == other.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::SeismicityModelRun;
    use crate::results::ReservoirSeismicityPrediction;
    use crate::status::{RunState, Status};

    #[test]
    fn clone_without_results_starts_over() {
        let mut run = SeismicityModelRun::new();
        run.id = Some(crate::RecordId(7));
        run.model_id = Some(crate::RecordId(2));
        run.runid = Some(uuid::Uuid::new_v4());
        run.status = Status::with_state(RunState::Complete);
        run.result = Some(ReservoirSeismicityPrediction::new("POLYHEDRALSURFACE Z EMPTY"));

        let cloned = run.clone_run(false).expect("clone without results");
        assert!(cloned.id.is_none());
        assert!(cloned.runid.is_none());
        assert!(cloned.result.is_none());
        assert_eq!(cloned.status.state, RunState::Pending);
        assert_eq!(cloned.model_id, run.model_id);
    }

    #[test]
    fn clone_with_results_is_unsupported() {
        let mut run = SeismicityModelRun::new();
        run.result = Some(ReservoirSeismicityPrediction::new("POLYHEDRALSURFACE Z EMPTY"));
        assert!(run.clone_run(true).is_err());

        run.result = None;
        assert!(run.clone_run(true).is_ok());
    }
}
