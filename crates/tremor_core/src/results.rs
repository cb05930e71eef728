use chrono::{DateTime, Utc};

use crate::quantity::RealQuantity;
use crate::record::{Record, RecordId, fk};
use crate::seismics::SeismicCatalog;

/// Result of a seismicity model run: predicted rate and b-value for a
/// reservoir volume, with per-interval bins.
#[derive(Debug, Default, PartialEq)]
pub struct ReservoirSeismicityPrediction {
    pub id: Option<RecordId>,
    pub run_id: Option<RecordId>,

    /// Reservoir geometry as WKT (POLYHEDRALSURFACE Z).
    pub geom: String,
    pub rate: Option<RealQuantity>,
    pub bvalue: Option<RealQuantity>,
    pub bins: Vec<SeismicityPredictionBin>,
}

impl ReservoirSeismicityPrediction {
    pub fn new(geom: impl Into<String>) -> Self {
        Self {
            geom: geom.into(),
            ..Self::default()
        }
    }
}

impl Record for ReservoirSeismicityPrediction {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            run_id: fk(with_foreign_keys, self.run_id),
            geom: self.geom.clone(),
            rate: self.rate.clone(),
            bvalue: self.bvalue.clone(),
            bins: Vec::new(),
        }
    }
}

/// One forecast interval of a reservoir prediction: expected event count
/// and Gutenberg-Richter parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeismicityPredictionBin {
    pub id: Option<RecordId>,
    pub prediction_id: Option<RecordId>,

    pub starttime: Option<DateTime<Utc>>,
    pub endtime: Option<DateTime<Utc>>,
    pub numberevents: Option<RealQuantity>,
    pub a: Option<RealQuantity>,
    pub b: Option<RealQuantity>,
    pub mc: Option<RealQuantity>,
}

impl Record for SeismicityPredictionBin {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            prediction_id: fk(with_foreign_keys, self.prediction_id),
            starttime: self.starttime,
            endtime: self.endtime,
            numberevents: self.numberevents.clone(),
            a: self.a.clone(),
            b: self.b.clone(),
            mc: self.mc.clone(),
        }
    }
}

/// Geographic sample point shared by hazard curves and maps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoPoint {
    pub id: Option<RecordId>,
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { id: None, lat, lon }
    }
}

impl Record for GeoPoint {
    fn clone_record(&self, _with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Ground motion vs. probability of exceedance at one point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HazardPointValue {
    pub id: Option<RecordId>,
    pub run_id: Option<RecordId>,
    pub curve_id: Option<RecordId>,
    pub map_id: Option<RecordId>,

    pub groundmotion: Option<f64>,
    pub poe: Option<f64>,
    pub hazardintensitytype: Option<String>,
    pub spectralperiod: Option<f64>,
    pub geopoint: Option<GeoPoint>,
}

impl Record for HazardPointValue {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            run_id: fk(with_foreign_keys, self.run_id),
            curve_id: fk(with_foreign_keys, self.curve_id),
            map_id: fk(with_foreign_keys, self.map_id),
            groundmotion: self.groundmotion,
            poe: self.poe,
            hazardintensitytype: self.hazardintensitytype.clone(),
            spectralperiod: self.spectralperiod,
            geopoint: None,
        }
    }
}

/// Hazard curve result: exceedance probabilities over ground motion
/// levels at a site.
#[derive(Debug, Default, PartialEq)]
pub struct HazardCurve {
    pub id: Option<RecordId>,
    pub run_id: Option<RecordId>,
    pub samples: Vec<HazardPointValue>,
}

impl Record for HazardCurve {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            run_id: fk(with_foreign_keys, self.run_id),
            samples: Vec::new(),
        }
    }
}

/// Hazard map result: ground motion at fixed probability over a grid.
#[derive(Debug, Default, PartialEq)]
pub struct HazardMap {
    pub id: Option<RecordId>,
    pub run_id: Option<RecordId>,
    pub samples: Vec<HazardPointValue>,
}

impl Record for HazardMap {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            run_id: fk(with_foreign_keys, self.run_id),
            samples: Vec::new(),
        }
    }
}

/// Retrospective skill evaluation of a forecast against a reference
/// catalog snapshot.
#[derive(Debug, Default)]
pub struct SkillTest {
    pub id: Option<RecordId>,
    pub stage_id: Option<RecordId>,

    pub skill_score: Option<f64>,
    pub test_interval: Option<f64>,
    pub spatial_extent: Option<f64>,
    pub reference_catalog: Option<SeismicCatalog>,
}

impl SkillTest {
    /// Drop the computed score and the reference snapshot, keeping the
    /// test configuration.
    pub fn reset(&mut self) {
        self.skill_score = None;
        self.reference_catalog = None;
    }
}

impl Record for SkillTest {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            stage_id: fk(with_foreign_keys, self.stage_id),
            skill_score: self.skill_score,
            test_interval: self.test_interval,
            spatial_extent: self.spatial_extent,
            reference_catalog: None,
        }
    }
}

impl PartialEq for SkillTest {
    fn eq(&self, other: &Self) -> bool {
        self.skill_score == other.skill_score
            && self.test_interval == other.test_interval
            && self.spatial_extent == other.spatial_extent
            && self.reference_catalog == other.reference_catalog
    }
}
