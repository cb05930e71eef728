use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance metadata carried by catalogs, wells, hydraulic series and
/// forecasts, after the QuakeML creation-info shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreationInfo {
    pub author: Option<String>,
    pub agencyid: Option<String>,
    pub creationtime: Option<DateTime<Utc>>,
    pub version: Option<String>,
    pub copyrightowner: Option<String>,
    pub licence: Option<String>,
}

impl CreationInfo {
    pub fn stamped_now() -> Self {
        Self {
            creationtime: Some(Utc::now()),
            ..Self::default()
        }
    }
}

/// A time interval. Both bounds optional; forecasts use the finite form
/// where both bounds are required at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Epoch {
    pub starttime: Option<DateTime<Utc>>,
    pub endtime: Option<DateTime<Utc>>,
}

impl Epoch {
    pub fn finite(starttime: DateTime<Utc>, endtime: DateTime<Utc>) -> Self {
        Self {
            starttime: Some(starttime),
            endtime: Some(endtime),
        }
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.starttime, self.endtime) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Epoch;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn finite_epoch_has_duration() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 1, 1, 6, 0, 0).unwrap();
        let epoch = Epoch::finite(start, end);
        assert_eq!(epoch.duration(), Some(Duration::hours(6)));
        assert_eq!(Epoch::default().duration(), None);
    }
}
