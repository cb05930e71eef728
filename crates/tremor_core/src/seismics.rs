use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::error::{ModelError, ModelResult};
use crate::meta::CreationInfo;
use crate::quantity::{RealQuantity, TimeQuantity};
use crate::record::{Record, RecordId, fk};
use crate::series::{SampleFilter, TimeSeries, Timestamped};
use crate::signal::Signal;

const QUAKEML_HEADER: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<q:quakeml xmlns=\"http://quakeml.org/xmlns/bed/1.2\" \
xmlns:q=\"http://quakeml.org/xmlns/quakeml/1.2\">\
<eventParameters publicID=\"smi:scs/0.7/EventParameters\">";

const QUAKEML_FOOTER: &[u8] = b"</eventParameters></q:quakeml>";

/// A seismic event extracted from its QuakeML representation.
///
/// The original XML fragment is kept verbatim in `quakeml`; the flat
/// quantity fields hold the converted values the forecasting code works
/// with.
#[derive(Clone, Debug)]
pub struct SeismicEvent {
    pub id: Option<RecordId>,
    pub catalog_id: Option<RecordId>,

    pub quakeml: Vec<u8>,
    pub datetime: TimeQuantity,
    pub x: Option<RealQuantity>,
    pub y: Option<RealQuantity>,
    pub z: Option<RealQuantity>,
    pub magnitude: Option<RealQuantity>,
}

impl SeismicEvent {
    pub fn at(datetime: DateTime<Utc>) -> Self {
        Self {
            id: None,
            catalog_id: None,
            quakeml: Vec::new(),
            datetime: TimeQuantity::from_value(datetime),
            x: None,
            y: None,
            z: None,
            magnitude: None,
        }
    }

    pub fn magnitude_value(&self) -> Option<f64> {
        self.magnitude.as_ref().map(|q| q.value)
    }
}

impl Timestamped for SeismicEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.datetime.value
    }
}

impl Record for SeismicEvent {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            catalog_id: fk(with_foreign_keys, self.catalog_id),
            quakeml: self.quakeml.clone(),
            datetime: self.datetime.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
            magnitude: self.magnitude.clone(),
        }
    }
}

impl PartialEq for SeismicEvent {
    fn eq(&self, other: &Self) -> bool {
        self.quakeml == other.quakeml
            && self.datetime == other.datetime
            && self.x == other.x
            && self.y == other.y
            && self.z == other.z
            && self.magnitude == other.magnitude
    }
}

// Events order by time first, magnitude second.
impl PartialOrd for SeismicEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let by_time = self.timestamp().cmp(&other.timestamp());
        match by_time {
            Ordering::Equal => self
                .magnitude_value()
                .partial_cmp(&other.magnitude_value()),
            ordering => Some(ordering),
        }
    }
}

impl Hash for SeismicEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.quakeml.hash(state);
    }
}

/// A catalog of seismic events, ordered by event time.
///
/// Catalogs are multi-parent: a project holds the observed catalog while
/// forecasts and skill tests hold snapshots, so deletion is handled by the
/// store's orphan sweep rather than a single-parent cascade.
#[derive(Debug, Default)]
pub struct SeismicCatalog {
    pub id: Option<RecordId>,
    pub project_id: Option<RecordId>,
    pub forecast_id: Option<RecordId>,
    pub skilltest_id: Option<RecordId>,
    pub creationinfo: CreationInfo,
    pub events: Vec<SeismicEvent>,
    pub catalog_changed: Signal<()>,
}

impl SeismicCatalog {
    pub fn new(events: Vec<SeismicEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// New unsaved catalog containing copies of the events matching
    /// `filter`.
    pub fn snapshot(&self, filter: SampleFilter<'_, SeismicEvent>) -> Self {
        let mut snap = self.clone_record(false);
        snap.events = self.snapshot_samples(filter);
        snap
    }

    /// Serialize the catalog by concatenating the events' QuakeML
    /// fragments. `QUAKEML` is the only format understood.
    pub fn dumps(&self, oformat: &str) -> ModelResult<Vec<u8>> {
        if oformat != "QUAKEML" {
            return Err(ModelError::unsupported(format!(
                "unknown catalog output format {oformat:?}"
            )));
        }
        let mut out = QUAKEML_HEADER.to_vec();
        for event in &self.events {
            out.extend_from_slice(&event.quakeml);
        }
        out.extend_from_slice(QUAKEML_FOOTER);
        Ok(out)
    }
}

impl TimeSeries for SeismicCatalog {
    type Sample = SeismicEvent;

    fn samples(&self) -> &[SeismicEvent] {
        &self.events
    }

    fn samples_mut(&mut self) -> &mut Vec<SeismicEvent> {
        &mut self.events
    }

    fn on_changed(&mut self) {
        self.catalog_changed.emit(&());
    }
}

impl Record for SeismicCatalog {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            project_id: fk(with_foreign_keys, self.project_id),
            forecast_id: fk(with_foreign_keys, self.forecast_id),
            skilltest_id: fk(with_foreign_keys, self.skilltest_id),
            creationinfo: self.creationinfo.clone(),
            events: Vec::new(),
            catalog_changed: Signal::new(),
        }
    }
}

impl PartialEq for SeismicCatalog {
    fn eq(&self, other: &Self) -> bool {
        self.events == other.events
    }
}

#[cfg(test)]
mod tests {
    use super::{QUAKEML_FOOTER, QUAKEML_HEADER, SeismicCatalog, SeismicEvent};
    use chrono::{TimeZone, Utc};

    fn event(hour: u32, fragment: &[u8]) -> SeismicEvent {
        let mut e = SeismicEvent::at(Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap());
        e.quakeml = fragment.to_vec();
        e
    }

    #[test]
    fn dumps_concatenates_event_fragments() {
        let catalog = SeismicCatalog::new(vec![event(0, b"<event>a</event>"), event(1, b"<event>b</event>")]);
        let doc = catalog.dumps("QUAKEML").expect("quakeml dump");

        let mut expected = QUAKEML_HEADER.to_vec();
        expected.extend_from_slice(b"<event>a</event>");
        expected.extend_from_slice(b"<event>b</event>");
        expected.extend_from_slice(QUAKEML_FOOTER);
        assert_eq!(doc, expected);
    }

    #[test]
    fn dumps_rejects_unknown_formats() {
        let catalog = SeismicCatalog::default();
        assert!(catalog.dumps("SC3ML").is_err());
    }

    #[test]
    fn events_order_by_time_then_magnitude() {
        let mut small = event(1, b"");
        small.magnitude = Some(1.0.into());
        let mut big = event(1, b"");
        big.magnitude = Some(3.0.into());
        let later = event(2, b"");

        assert!(small < big);
        assert!(big < later);
    }
}
