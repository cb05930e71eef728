use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::record::{Record, RecordId};

/// Discriminator shared by the model, model-run and forecast-stage
/// families.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ModelKind {
    Seismicity = 0,
    SeismicitySkill = 1,
    Hazard = 2,
    Risk = 3,
}

impl ModelKind {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(ModelKind::Seismicity),
            1 => Some(ModelKind::SeismicitySkill),
            2 => Some(ModelKind::Hazard),
            3 => Some(ModelKind::Risk),
            _ => None,
        }
    }
}

/// Template for seismicity forecast model runs: where the worker lives
/// and the default configuration a run starts from.
///
/// Templates are top-level records; runs reference them and never own
/// them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeismicityModel {
    pub id: Option<RecordId>,
    pub name: String,
    pub config: Map<String, JsonValue>,
    pub enabled: bool,
    pub url: Option<String>,
    pub sfmwid: Option<String>,
}

impl SeismicityModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ..Self::default()
        }
    }
}

impl Record for SeismicityModel {
    fn clone_record(&self, _with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            name: self.name.clone(),
            config: self.config.clone(),
            enabled: self.enabled,
            url: self.url.clone(),
            sfmwid: self.sfmwid.clone(),
        }
    }
}

/// Template for hazard model runs, carrying the OpenQuake input files.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HazardModel {
    pub id: Option<RecordId>,
    pub name: String,
    pub config: Map<String, JsonValue>,
    pub enabled: bool,
    pub url: Option<String>,
    pub logictreetemplate: Option<String>,
    pub jobconfigfile: Option<String>,
    pub gmpefile: Option<String>,
}

impl HazardModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ..Self::default()
        }
    }
}

impl Record for HazardModel {
    fn clone_record(&self, _with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            name: self.name.clone(),
            config: self.config.clone(),
            enabled: self.enabled,
            url: self.url.clone(),
            logictreetemplate: self.logictreetemplate.clone(),
            jobconfigfile: self.jobconfigfile.clone(),
            gmpefile: self.gmpefile.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ModelKind;

    #[test]
    fn kind_codec_roundtrips() {
        for kind in [
            ModelKind::Seismicity,
            ModelKind::SeismicitySkill,
            ModelKind::Hazard,
            ModelKind::Risk,
        ] {
            assert_eq!(ModelKind::from_i16(kind.as_i16()), Some(kind));
        }
        assert_eq!(ModelKind::from_i16(-1), None);
    }
}
