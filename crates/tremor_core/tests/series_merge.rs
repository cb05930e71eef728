use chrono::{DateTime, Duration, TimeZone, Utc};

use tremor_core::{
    HydraulicSample, Hydraulics, ModelError, SeismicCatalog, SeismicEvent, TimeSeries,
};

fn dt(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, hour, minute, 0).unwrap()
}

fn hourly_samples(first: DateTime<Utc>, step_secs: i64, count: usize) -> Vec<HydraulicSample> {
    (0..count)
        .map(|i| HydraulicSample::at(first + Duration::seconds(step_secs * i as i64)))
        .collect()
}

fn timestamps(h: &Hydraulics) -> Vec<DateTime<Utc>> {
    h.samples.iter().map(|s| s.datetime.value).collect()
}

#[test]
fn merge_overlap_by_time() {
    // 7 samples at 1 h intervals, merged with 4 samples at 30 min
    // intervals starting 03:00. The overlapping window [03:00, 04:30] is
    // replaced and the replacement sits at the tail.
    let mut h1 = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 7));
    let h2 = Hydraulics::new(hourly_samples(dt(3, 0), 1800, 4));

    h1.merge(&h2, None, None).unwrap();

    assert_eq!(
        timestamps(&h1),
        vec![
            dt(0, 0),
            dt(1, 0),
            dt(2, 0),
            dt(5, 0),
            dt(6, 0),
            dt(3, 0),
            dt(3, 30),
            dt(4, 0),
            dt(4, 30),
        ]
    );
}

#[test]
fn merge_empty_other_is_a_noop() {
    let mut h1 = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 7));
    let h2 = Hydraulics::default();

    h1.merge(&h2, None, None).unwrap();

    assert_eq!(
        timestamps(&h1),
        (0..7).map(|i| dt(i, 0)).collect::<Vec<_>>()
    );
}

#[test]
fn merge_into_empty_self_takes_other_in_order() {
    let mut h1 = Hydraulics::default();
    let h2 = Hydraulics::new(hourly_samples(dt(3, 0), 1800, 4));

    h1.merge(&h2, None, None).unwrap();

    assert_eq!(timestamps(&h1), vec![dt(3, 0), dt(3, 30), dt(4, 0), dt(4, 30)]);
    assert_eq!(h1, h2);
}

#[test]
fn merge_single_sample_replaces_only_its_window() {
    let mut h1 = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 7));
    let h2 = Hydraulics::new(vec![HydraulicSample::at(dt(3, 0))]);

    h1.merge(&h2, None, None).unwrap();

    assert_eq!(
        timestamps(&h1),
        vec![dt(0, 0), dt(1, 0), dt(2, 0), dt(4, 0), dt(5, 0), dt(6, 0), dt(3, 0)]
    );
}

#[test]
fn merge_with_explicit_window_leaves_out_of_window_samples_alone() {
    // Window narrower than both series: only [02:00, 03:00] is replaced,
    // out-of-window samples of other are not merged at all.
    let mut h1 = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 7));
    let h2 = Hydraulics::new(hourly_samples(dt(1, 30), 1800, 6)); // 01:30 .. 04:00

    h1.merge(&h2, Some(dt(2, 0)), Some(dt(3, 0))).unwrap();

    assert_eq!(
        timestamps(&h1),
        vec![
            dt(0, 0),
            dt(1, 0),
            dt(4, 0),
            dt(5, 0),
            dt(6, 0),
            dt(2, 0),
            dt(2, 30),
            dt(3, 0),
        ]
    );
}

#[test]
fn merge_is_idempotent_within_one_window() {
    let mut once = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 7));
    let other = Hydraulics::new(hourly_samples(dt(1, 30), 1800, 6));
    let start = Some(dt(2, 0));
    let end = Some(dt(4, 0));

    once.merge(&other, start, end).unwrap();
    let after_one = timestamps(&once);

    once.merge(&other, start, end).unwrap();
    assert_eq!(timestamps(&once), after_one);
}

#[test]
fn merge_window_bounds_are_inclusive() {
    let mut h1 = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 5));
    let h2 = Hydraulics::new(hourly_samples(dt(1, 0), 3600, 3)); // 01:00, 02:00, 03:00

    // Samples exactly at window_start and window_end are removed and
    // re-added.
    h1.merge(&h2, Some(dt(1, 0)), Some(dt(3, 0))).unwrap();

    assert_eq!(
        timestamps(&h1),
        vec![dt(0, 0), dt(4, 0), dt(1, 0), dt(2, 0), dt(3, 0)]
    );
}

#[test]
fn merge_rejects_inverted_windows() {
    let mut h1 = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 3));
    let h2 = Hydraulics::new(hourly_samples(dt(1, 0), 3600, 1));

    let err = h1.merge(&h2, Some(dt(3, 0)), Some(dt(1, 0))).unwrap_err();
    assert!(matches!(err, ModelError::InvalidRange { .. }));

    let err = h1.merge(&h2, Some(dt(1, 0)), Some(dt(1, 0))).unwrap_err();
    assert!(matches!(err, ModelError::InvalidRange { .. }));

    // start alone after all of other's samples inverts the computed
    // window.
    let err = h1.merge(&h2, Some(dt(5, 0)), None).unwrap_err();
    assert!(matches!(err, ModelError::InvalidRange { .. }));

    // Failed merges leave the series untouched.
    assert_eq!(timestamps(&h1), vec![dt(0, 0), dt(1, 0), dt(2, 0)]);
}

#[test]
fn catalog_merge_matches_hydraulics_merge() {
    let events = |first: DateTime<Utc>, step: i64, count: usize| -> Vec<SeismicEvent> {
        (0..count)
            .map(|i| SeismicEvent::at(first + Duration::seconds(step * i as i64)))
            .collect()
    };

    let mut c1 = SeismicCatalog::new(events(dt(0, 0), 3600, 7));
    let c2 = SeismicCatalog::new(events(dt(3, 0), 1800, 4));

    c1.merge(&c2, None, None).unwrap();

    let got: Vec<DateTime<Utc>> = c1.events.iter().map(|e| e.datetime.value).collect();
    assert_eq!(
        got,
        vec![
            dt(0, 0),
            dt(1, 0),
            dt(2, 0),
            dt(5, 0),
            dt(6, 0),
            dt(3, 0),
            dt(3, 30),
            dt(4, 0),
            dt(4, 30),
        ]
    );
}

#[test]
fn reduce_none_removes_everything() {
    let mut h = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 4));
    h.reduce(None);
    assert!(h.is_empty());
}

#[test]
fn reduce_removes_matching_and_keeps_order() {
    let mut h = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 6));
    h.reduce(Some(&|s: &HydraulicSample| {
        s.datetime.value >= dt(2, 0) && s.datetime.value <= dt(3, 0)
    }));
    assert_eq!(timestamps(&h), vec![dt(0, 0), dt(1, 0), dt(4, 0), dt(5, 0)]);
}

#[test]
fn snapshot_filters_and_copies() {
    let mut h = Hydraulics::new(hourly_samples(dt(0, 0), 3600, 4));
    for (i, s) in h.samples.iter_mut().enumerate() {
        s.id = Some(tremor_core::RecordId(i as i64 + 1));
    }

    let snap = h.snapshot(Some(&|s: &HydraulicSample| s.datetime.value <= dt(1, 0)));
    assert_eq!(snap.samples.len(), 2);
    assert!(snap.samples.iter().all(|s| s.id.is_none()));
    assert_eq!(snap.samples[0], h.samples[0]);
    assert_eq!(snap.samples[1], h.samples[1]);

    // The snapshot is independent: mutating it leaves the source alone.
    let full = h.snapshot(None);
    assert_eq!(full, h);
    assert_eq!(h.samples.len(), 4);
}
