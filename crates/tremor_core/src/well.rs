use crate::hydraulics::{HydraulicSample, Hydraulics, InjectionPlan};
use crate::meta::CreationInfo;
use crate::quantity::RealQuantity;
use crate::record::{Record, RecordId, fk};
use crate::series::SampleFilter;

/// One cased or open-hole section of a borehole.
#[derive(Debug, Default)]
pub struct WellSection {
    pub id: Option<RecordId>,
    pub well_id: Option<RecordId>,

    pub toplongitude: Option<RealQuantity>,
    pub toplatitude: Option<RealQuantity>,
    pub topdepth: Option<RealQuantity>,
    pub bottomlongitude: Option<RealQuantity>,
    pub bottomlatitude: Option<RealQuantity>,
    pub bottomdepth: Option<RealQuantity>,
    pub holediameter: Option<RealQuantity>,
    pub casingdiameter: Option<RealQuantity>,
    pub cased: Option<bool>,

    pub hydraulics: Option<Hydraulics>,
    pub injectionplan: Option<InjectionPlan>,
}

impl WellSection {
    /// Copy of the section with filtered copies of its hydraulic series.
    fn snapshot(&self, sample_filter: SampleFilter<'_, HydraulicSample>) -> Self {
        let mut snap = self.clone_record(false);
        snap.hydraulics = self.hydraulics.as_ref().map(|h| h.snapshot(sample_filter));
        snap.injectionplan = self
            .injectionplan
            .as_ref()
            .map(|p| p.snapshot(sample_filter));
        snap
    }
}

// Structural equality over value fields; identity and keys do not count.
impl PartialEq for WellSection {
    fn eq(&self, other: &Self) -> bool {
        self.toplongitude == other.toplongitude
            && self.toplatitude == other.toplatitude
            && self.topdepth == other.topdepth
            && self.bottomlongitude == other.bottomlongitude
            && self.bottomlatitude == other.bottomlatitude
            && self.bottomdepth == other.bottomdepth
            && self.holediameter == other.holediameter
            && self.casingdiameter == other.casingdiameter
            && self.cased == other.cased
            && self.hydraulics == other.hydraulics
            && self.injectionplan == other.injectionplan
    }
}

impl Record for WellSection {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            well_id: fk(with_foreign_keys, self.well_id),
            toplongitude: self.toplongitude.clone(),
            toplatitude: self.toplatitude.clone(),
            topdepth: self.topdepth.clone(),
            bottomlongitude: self.bottomlongitude.clone(),
            bottomlatitude: self.bottomlatitude.clone(),
            bottomdepth: self.bottomdepth.clone(),
            holediameter: self.holediameter.clone(),
            casingdiameter: self.casingdiameter.clone(),
            cased: self.cased,
            hydraulics: None,
            injectionplan: None,
        }
    }
}

/// An injection borehole, described by its sections from top to bottom.
///
/// Wells are multi-parent (project, forecast snapshot, scenario), so like
/// catalogs they are removed by the store's orphan sweep once no owner
/// references them.
#[derive(Debug, Default)]
pub struct InjectionWell {
    pub id: Option<RecordId>,
    pub project_id: Option<RecordId>,
    pub forecast_id: Option<RecordId>,
    pub scenario_id: Option<RecordId>,

    pub publicid: Option<String>,
    pub creationinfo: CreationInfo,
    pub sections: Vec<WellSection>,
}

impl InjectionWell {
    pub fn new(publicid: impl Into<String>, sections: Vec<WellSection>) -> Self {
        Self {
            publicid: Some(publicid.into()),
            sections,
            ..Self::default()
        }
    }

    /// Longitude of the wellhead, taken from the top of the first section.
    pub fn longitude(&self) -> Option<f64> {
        self.sections
            .first()
            .and_then(|s| s.toplongitude.as_ref())
            .map(|q| q.value)
    }

    /// Latitude of the wellhead, taken from the top of the first section.
    pub fn latitude(&self) -> Option<f64> {
        self.sections
            .first()
            .and_then(|s| s.toplatitude.as_ref())
            .map(|q| q.value)
    }

    /// Total depth: the bottom of the last section.
    pub fn depth(&self) -> Option<f64> {
        self.sections
            .last()
            .and_then(|s| s.bottomdepth.as_ref())
            .map(|q| q.value)
    }

    /// Injection point: bottom coordinates of the uppermost section.
    pub fn injectionpoint(&self) -> Option<(f64, f64, f64)> {
        let first = self.sections.first()?;
        Some((
            first.bottomlongitude.as_ref()?.value,
            first.bottomlatitude.as_ref()?.value,
            first.bottomdepth.as_ref()?.value,
        ))
    }

    /// New unsaved copy of the well.
    ///
    /// `section_filter` selects the sections to keep, `sample_filter` the
    /// hydraulic samples within each kept section; `None` keeps
    /// everything. The public id is carried over, persisted identity is
    /// not.
    pub fn snapshot(
        &self,
        sample_filter: SampleFilter<'_, HydraulicSample>,
        section_filter: Option<&dyn Fn(&WellSection) -> bool>,
    ) -> Self {
        let mut snap = self.clone_record(false);
        snap.sections = self
            .sections
            .iter()
            .filter(|s| match section_filter {
                Some(cond) => cond(s),
                None => true,
            })
            .map(|s| s.snapshot(sample_filter))
            .collect();
        snap
    }
}

impl Record for InjectionWell {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            project_id: fk(with_foreign_keys, self.project_id),
            forecast_id: fk(with_foreign_keys, self.forecast_id),
            scenario_id: fk(with_foreign_keys, self.scenario_id),
            publicid: self.publicid.clone(),
            creationinfo: self.creationinfo.clone(),
            sections: Vec::new(),
        }
    }
}

impl PartialEq for InjectionWell {
    fn eq(&self, other: &Self) -> bool {
        self.publicid == other.publicid && self.sections == other.sections
    }
}
