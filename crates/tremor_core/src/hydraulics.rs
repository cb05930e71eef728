use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::meta::CreationInfo;
use crate::quantity::{RealQuantity, TimeQuantity};
use crate::record::{Record, RecordId, fk};
use crate::series::{SampleFilter, TimeSeries, Timestamped};
use crate::signal::Signal;

/// One hydraulic measurement: flow, pressure and temperature at the top
/// and bottom of the borehole at a given time.
#[derive(Clone, Debug)]
pub struct HydraulicSample {
    pub id: Option<RecordId>,
    pub series_id: Option<RecordId>,

    pub datetime: TimeQuantity,
    pub toptemperature: Option<RealQuantity>,
    pub topflow: Option<RealQuantity>,
    pub toppressure: Option<RealQuantity>,
    pub bottomtemperature: Option<RealQuantity>,
    pub bottomflow: Option<RealQuantity>,
    pub bottompressure: Option<RealQuantity>,
}

impl HydraulicSample {
    pub fn at(datetime: DateTime<Utc>) -> Self {
        Self {
            id: None,
            series_id: None,
            datetime: TimeQuantity::from_value(datetime),
            toptemperature: None,
            topflow: None,
            toppressure: None,
            bottomtemperature: None,
            bottomflow: None,
            bottompressure: None,
        }
    }
}

impl Timestamped for HydraulicSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.datetime.value
    }
}

impl Record for HydraulicSample {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            series_id: fk(with_foreign_keys, self.series_id),
            datetime: self.datetime.clone(),
            toptemperature: self.toptemperature.clone(),
            topflow: self.topflow.clone(),
            toppressure: self.toppressure.clone(),
            bottomtemperature: self.bottomtemperature.clone(),
            bottomflow: self.bottomflow.clone(),
            bottompressure: self.bottompressure.clone(),
        }
    }
}

// Structural equality over value fields; identity and keys do not count.
impl PartialEq for HydraulicSample {
    fn eq(&self, other: &Self) -> bool {
        self.datetime == other.datetime
            && self.toptemperature == other.toptemperature
            && self.topflow == other.topflow
            && self.toppressure == other.toppressure
            && self.bottomtemperature == other.bottomtemperature
            && self.bottomflow == other.bottomflow
            && self.bottompressure == other.bottompressure
    }
}

impl PartialOrd for HydraulicSample {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.timestamp().cmp(&other.timestamp()))
    }
}

/// Observed hydraulic history of one well section.
#[derive(Debug, Default)]
pub struct Hydraulics {
    pub id: Option<RecordId>,
    pub section_id: Option<RecordId>,
    pub creationinfo: CreationInfo,
    pub samples: Vec<HydraulicSample>,
    pub history_changed: Signal<()>,
}

impl Hydraulics {
    pub fn new(samples: Vec<HydraulicSample>) -> Self {
        Self {
            samples,
            ..Self::default()
        }
    }

    /// New unsaved copy of this history with the samples matching
    /// `filter`. Copies share no identity with the originals.
    pub fn snapshot(&self, filter: SampleFilter<'_, HydraulicSample>) -> Self {
        let mut snap = self.clone_record(false);
        snap.samples = self.snapshot_samples(filter);
        snap
    }
}

impl TimeSeries for Hydraulics {
    type Sample = HydraulicSample;

    fn samples(&self) -> &[HydraulicSample] {
        &self.samples
    }

    fn samples_mut(&mut self) -> &mut Vec<HydraulicSample> {
        &mut self.samples
    }

    fn on_changed(&mut self) {
        self.history_changed.emit(&());
    }
}

impl Record for Hydraulics {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            section_id: fk(with_foreign_keys, self.section_id),
            creationinfo: self.creationinfo.clone(),
            samples: Vec::new(),
            history_changed: Signal::new(),
        }
    }
}

impl PartialEq for Hydraulics {
    fn eq(&self, other: &Self) -> bool {
        self.samples == other.samples
    }
}

/// Planned injection for one forecast scenario, same sample shape as the
/// observed history.
#[derive(Debug, Default)]
pub struct InjectionPlan {
    pub id: Option<RecordId>,
    pub section_id: Option<RecordId>,
    pub scenario_id: Option<RecordId>,
    pub creationinfo: CreationInfo,
    pub samples: Vec<HydraulicSample>,
}

impl InjectionPlan {
    pub fn new(samples: Vec<HydraulicSample>) -> Self {
        Self {
            samples,
            ..Self::default()
        }
    }

    pub fn snapshot(&self, filter: SampleFilter<'_, HydraulicSample>) -> Self {
        let mut snap = self.clone_record(false);
        snap.samples = self.snapshot_samples(filter);
        snap
    }
}

impl TimeSeries for InjectionPlan {
    type Sample = HydraulicSample;

    fn samples(&self) -> &[HydraulicSample] {
        &self.samples
    }

    fn samples_mut(&mut self) -> &mut Vec<HydraulicSample> {
        &mut self.samples
    }
}

impl Record for InjectionPlan {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            section_id: fk(with_foreign_keys, self.section_id),
            scenario_id: fk(with_foreign_keys, self.scenario_id),
            creationinfo: self.creationinfo.clone(),
            samples: Vec::new(),
        }
    }
}

impl PartialEq for InjectionPlan {
    fn eq(&self, other: &Self) -> bool {
        self.samples == other.samples
    }
}

#[cfg(test)]
mod tests {
    use super::{HydraulicSample, Hydraulics};
    use crate::quantity::RealQuantity;
    use crate::record::{Record, RecordId};
    use crate::series::TimeSeries;
    use chrono::{TimeZone, Utc};

    fn sample(hour: u32, topflow: f64) -> HydraulicSample {
        let mut s = HydraulicSample::at(Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap());
        s.topflow = Some(RealQuantity::from_value(topflow));
        s
    }

    #[test]
    fn sample_equality_ignores_keys() {
        let mut a = sample(0, 1.0);
        let mut b = sample(0, 1.0);
        a.id = Some(RecordId(1));
        b.series_id = Some(RecordId(9));
        assert_eq!(a, b);
        let c = sample(0, 2.0);
        assert_ne!(a, c);
    }

    #[test]
    fn clone_record_controls_foreign_keys() {
        let mut s = sample(0, 1.0);
        s.id = Some(RecordId(5));
        s.series_id = Some(RecordId(9));

        let bare = s.clone_record(false);
        assert!(bare.id.is_none());
        assert!(bare.series_id.is_none());
        assert_eq!(bare, s);

        let keyed = s.clone_record(true);
        assert!(keyed.id.is_none());
        assert_eq!(keyed.series_id, Some(RecordId(9)));
    }

    #[test]
    fn history_changed_fires_on_reduce() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut h = Hydraulics::new(vec![sample(0, 1.0), sample(1, 2.0)]);
        let fired = Arc::new(AtomicUsize::new(0));
        let slot_fired = Arc::clone(&fired);
        h.history_changed.connect(move |_| {
            slot_fired.fetch_add(1, Ordering::SeqCst);
        });

        h.reduce(Some(&|s: &HydraulicSample| {
            s.topflow.as_ref().is_some_and(|q| q.value > 1.5)
        }));
        assert_eq!(h.samples.len(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn snapshot_strips_identity() {
        let mut h = Hydraulics::new(vec![sample(0, 1.0)]);
        h.id = Some(RecordId(3));
        h.samples[0].id = Some(RecordId(4));
        h.samples[0].series_id = Some(RecordId(3));

        let snap = h.snapshot(None);
        assert!(snap.id.is_none());
        assert!(snap.samples[0].id.is_none());
        assert!(snap.samples[0].series_id.is_none());
        assert_eq!(snap, h);
    }
}
