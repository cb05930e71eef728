use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

use crate::forecast::Forecast;
use crate::hydraulics::HydraulicSample;
use crate::record::{Record, RecordId};
use crate::seismics::{SeismicCatalog, SeismicEvent};
use crate::series::Timestamped;
use crate::settings::ProjectSettings;
use crate::signal::Signal;
use crate::well::InjectionWell;

/// Reference point used when projecting data into a local coordinate
/// system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub lat: f64,
    pub lon: f64,
    pub h: f64,
}

impl Default for ReferencePoint {
    fn default() -> Self {
        // Zurich, the historical default of the desktop application.
        Self {
            lat: 47.379,
            lon: 8.547,
            h: 450.0,
        }
    }
}

/// Either kind of observed event a project can hold.
#[derive(Clone, Copy, Debug)]
pub enum ProjectEvent<'a> {
    Seismic(&'a SeismicEvent),
    Hydraulic(&'a HydraulicSample),
}

impl Timestamped for ProjectEvent<'_> {
    fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ProjectEvent::Seismic(event) => event.timestamp(),
            ProjectEvent::Hydraulic(sample) => sample.timestamp(),
        }
    }
}

/// Root of the data model: everything one injection site accumulates.
#[derive(Debug)]
pub struct Project {
    pub id: Option<RecordId>,

    pub name: String,
    pub description: Option<String>,
    pub starttime: DateTime<Utc>,
    pub endtime: Option<DateTime<Utc>>,
    pub referencepoint: ReferencePoint,
    pub settings: ProjectSettings,

    pub seismiccatalogs: Vec<SeismicCatalog>,
    pub wells: Vec<InjectionWell>,
    pub forecasts: Vec<Forecast>,

    project_time: DateTime<Utc>,
    pub project_time_changed: Signal<DateTime<Utc>>,
    pub will_close: Signal<()>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let starttime = Utc::now()
            .duration_trunc(Duration::minutes(1))
            .unwrap_or_else(|_| Utc::now());
        let mut settings = ProjectSettings::new();
        settings.set_datetime("forecast_start", starttime);
        settings.commit();

        Self {
            id: None,
            name: name.into(),
            description: None,
            starttime,
            endtime: Some(starttime + Duration::days(365)),
            referencepoint: ReferencePoint::default(),
            settings,
            seismiccatalogs: Vec::new(),
            wells: Vec::new(),
            forecasts: Vec::new(),
            project_time: starttime,
            project_time_changed: Signal::new(),
            will_close: Signal::new(),
        }
    }

    /// The catalog of observed seismicity, when the project holds one.
    /// Forecast snapshots live on the forecasts themselves.
    pub fn catalog(&self) -> Option<&SeismicCatalog> {
        self.seismiccatalogs.last()
    }

    pub fn project_time(&self) -> DateTime<Utc> {
        self.project_time
    }

    pub fn update_project_time(&mut self, t: DateTime<Utc>) {
        self.project_time = t;
        self.project_time_changed.emit(&t);
    }

    /// Announce that the project is going away; afterwards it must not be
    /// used anymore.
    pub fn close(&self) {
        self.will_close.emit(&());
    }

    fn hydraulic_samples(&self) -> impl Iterator<Item = &HydraulicSample> {
        self.wells
            .iter()
            .flat_map(|w| w.sections.iter())
            .flat_map(|s| s.hydraulics.iter())
            .flat_map(|h| h.samples.iter())
    }

    /// Earliest observed event, seismic or hydraulic.
    pub fn earliest_event(&self) -> Option<ProjectEvent<'_>> {
        let seismic = self
            .catalog()
            .and_then(|c| c.events.iter().min_by_key(|e| e.timestamp()))
            .map(ProjectEvent::Seismic);
        let hydraulic = self
            .hydraulic_samples()
            .min_by_key(|s| s.timestamp())
            .map(ProjectEvent::Hydraulic);
        match (seismic, hydraulic) {
            (Some(es), Some(eh)) => {
                if eh.timestamp() < es.timestamp() {
                    Some(eh)
                } else {
                    Some(es)
                }
            }
            (es, eh) => es.or(eh),
        }
    }

    /// Latest observed event, seismic or hydraulic.
    pub fn latest_event(&self) -> Option<ProjectEvent<'_>> {
        let seismic = self
            .catalog()
            .and_then(|c| c.events.iter().max_by_key(|e| e.timestamp()))
            .map(ProjectEvent::Seismic);
        let hydraulic = self
            .hydraulic_samples()
            .max_by_key(|s| s.timestamp())
            .map(ProjectEvent::Hydraulic);
        match (seismic, hydraulic) {
            (Some(es), Some(eh)) => {
                if eh.timestamp() > es.timestamp() {
                    Some(eh)
                } else {
                    Some(es)
                }
            }
            (es, eh) => es.or(eh),
        }
    }

    /// Time range spanned by all observed events.
    pub fn event_time_range(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (
            self.earliest_event().map(|e| e.timestamp()),
            self.latest_event().map(|e| e.timestamp()),
        )
    }
}

impl Record for Project {
    fn clone_record(&self, _with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            name: self.name.clone(),
            description: self.description.clone(),
            starttime: self.starttime,
            endtime: self.endtime,
            referencepoint: self.referencepoint,
            settings: self.settings.clone_record(false),
            seismiccatalogs: Vec::new(),
            wells: Vec::new(),
            forecasts: Vec::new(),
            project_time: self.starttime,
            project_time_changed: Signal::new(),
            will_close: Signal::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Project;
    use crate::hydraulics::{HydraulicSample, Hydraulics};
    use crate::seismics::{SeismicCatalog, SeismicEvent};
    use crate::series::Timestamped;
    use crate::well::{InjectionWell, WellSection};
    use chrono::{TimeZone, Utc};

    fn dt(hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn event_range_spans_both_kinds() {
        let mut project = Project::new("basel");
        project
            .seismiccatalogs
            .push(SeismicCatalog::new(vec![SeismicEvent::at(dt(2)), SeismicEvent::at(dt(5))]));

        let section = WellSection {
            hydraulics: Some(Hydraulics::new(vec![
                HydraulicSample::at(dt(1)),
                HydraulicSample::at(dt(4)),
            ])),
            ..WellSection::default()
        };
        project.wells.push(InjectionWell::new("well/0", vec![section]));

        assert_eq!(project.event_time_range(), (Some(dt(1)), Some(dt(5))));
        assert_eq!(project.earliest_event().unwrap().timestamp(), dt(1));
        assert_eq!(project.latest_event().unwrap().timestamp(), dt(5));
    }

    #[test]
    fn empty_project_has_no_event_range() {
        let project = Project::new("empty");
        assert_eq!(project.event_time_range(), (None, None));
    }

    #[test]
    fn project_time_updates_emit() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut project = Project::new("signals");
        let fired = Arc::new(AtomicUsize::new(0));
        let slot_fired = Arc::clone(&fired);
        project.project_time_changed.connect(move |_| {
            slot_fired.fetch_add(1, Ordering::SeqCst);
        });

        let t = dt(6);
        project.update_project_time(t);
        assert_eq!(project.project_time(), t);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
