use chrono::{DateTime, Duration, TimeZone, Utc};

use tremor_core::{HydraulicSample, Hydraulics, InjectionWell, RecordId, WellSection};

fn dt(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap()
}

fn upper_section(hydraulics: Option<Hydraulics>) -> WellSection {
    WellSection {
        toplongitude: Some(8.925293642.into()),
        toplatitude: Some(46.90669014.into()),
        topdepth: Some(0.0.into()),
        bottomlongitude: Some(9.0.into()),
        bottomlatitude: Some(47.0.into()),
        bottomdepth: Some(500.0.into()),
        holediameter: Some(0.3.into()),
        casingdiameter: Some(0.25.into()),
        hydraulics,
        ..WellSection::default()
    }
}

fn lower_section() -> WellSection {
    WellSection {
        toplongitude: Some(9.0.into()),
        toplatitude: Some(47.0.into()),
        topdepth: Some(500.0.into()),
        bottomlongitude: Some(9.01.into()),
        bottomlatitude: Some(47.01.into()),
        bottomdepth: Some(1500.0.into()),
        holediameter: Some(0.25.into()),
        casingdiameter: Some(0.0.into()),
        ..WellSection::default()
    }
}

fn sample_history() -> Hydraulics {
    let samples = (0..7)
        .map(|i| {
            let mut s = HydraulicSample::at(dt(0) + Duration::hours(i));
            s.topflow = Some((i as f64).into());
            s.bottomflow = Some((i as f64 - 0.1).into());
            s
        })
        .collect();
    Hydraulics::new(samples)
}

#[test]
fn derived_coordinates_come_from_the_sections() {
    let well = InjectionWell::new("smi:well/basel", vec![upper_section(None), lower_section()]);

    assert_eq!(well.longitude(), Some(8.925293642));
    assert_eq!(well.latitude(), Some(46.90669014));
    assert_eq!(well.depth(), Some(1500.0));
    assert_eq!(well.injectionpoint(), Some((9.0, 47.0, 500.0)));
}

#[test]
fn snapshot_without_filters_copies_everything() {
    let mut well = InjectionWell::new(
        "smi:well/basel",
        vec![upper_section(Some(sample_history()))],
    );
    well.id = Some(RecordId(1));
    well.sections[0].id = Some(RecordId(2));

    let snap = well.snapshot(None, None);

    assert!(snap.id.is_none());
    assert_eq!(snap.publicid, well.publicid);
    assert!(snap.sections[0].id.is_none());
    assert_eq!(
        snap.sections[0].hydraulics,
        well.sections[0].hydraulics
    );
    assert_eq!(snap, well);
}

#[test]
fn snapshot_with_sample_filter_drops_samples() {
    let well = InjectionWell::new(
        "smi:well/basel",
        vec![upper_section(Some(sample_history()))],
    );

    let keep = |s: &HydraulicSample| s.topflow.as_ref().is_some_and(|q| q.value != 6.0);
    let snap = well.snapshot(Some(&keep), None);

    let original = well.sections[0].hydraulics.as_ref().unwrap();
    let copied = snap.sections[0].hydraulics.as_ref().unwrap();
    assert_eq!(original.samples.len(), 7);
    assert_eq!(copied.samples.len(), 6);
    assert_ne!(copied, original);
}

#[test]
fn snapshot_with_section_filter_drops_sections() {
    let well = InjectionWell::new(
        "smi:well/basel",
        vec![upper_section(Some(sample_history())), lower_section()],
    );

    let keep_upper = |s: &WellSection| {
        s.topdepth.as_ref().is_some_and(|q| q.value == 0.0)
            && s.bottomdepth.as_ref().is_some_and(|q| q.value == 500.0)
    };
    let snap = well.snapshot(None, Some(&keep_upper));

    assert_eq!(well.sections.len(), 2);
    assert_eq!(snap.sections.len(), 1);
    assert_eq!(
        snap.sections[0].hydraulics,
        well.sections[0].hydraulics
    );
}
