use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value as JsonValue, json};

use crate::error::{ModelError, ModelResult};
use crate::record::{Record, RecordId, fk};

/// Date representation used inside the settings blob.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-project key/value configuration, persisted as one JSON document.
///
/// Every setting has a default, so adding and retiring keys never needs a
/// schema migration. Unknown keys are carried along untouched.
#[derive(Clone, Debug)]
pub struct ProjectSettings {
    pub id: Option<RecordId>,
    pub project_id: Option<RecordId>,

    pub updated: Option<DateTime<Utc>>,
    data: Map<String, JsonValue>,
    /// Serialized form as last committed; what the store persists.
    config: Option<String>,
}

impl ProjectSettings {
    pub fn new() -> Self {
        let mut settings = Self {
            id: None,
            project_id: None,
            updated: None,
            data: Map::new(),
            config: None,
        };
        for (key, value) in Self::defaults() {
            settings.data.entry(key).or_insert(value);
        }
        settings.commit();
        settings
    }

    fn defaults() -> Vec<(String, JsonValue)> {
        vec![
            ("fdsnws_enable".into(), json!(false)),
            ("fdsnws_url".into(), JsonValue::Null),
            ("fdsnws_interval".into(), json!(5.0)),
            ("hydws_enable".into(), json!(false)),
            ("hydws_url".into(), JsonValue::Null),
            ("hydws_interval".into(), json!(5.0)),
            ("auto_schedule_enable".into(), json!(true)),
            ("forecast_interval".into(), json!(6.0)),
            ("forecast_length".into(), json!(6.0)),
            (
                "forecast_start".into(),
                json!("1970-01-01 00:00:00"),
            ),
            ("seismic_rate_interval".into(), json!(1.0)),
            ("write_fc_results_to_disk".into(), json!(false)),
        ]
    }

    /// Rebuild settings from the persisted serialized form.
    pub fn from_config(config: &str) -> ModelResult<Self> {
        let data: Map<String, JsonValue> = serde_json::from_str(config)
            .map_err(|err| ModelError::validation(format!("settings blob: {err}")))?;
        Ok(Self {
            id: None,
            project_id: None,
            updated: None,
            data,
            config: Some(config.to_string()),
        })
    }

    /// Update the serialized form and the modification stamp. The store
    /// persists whatever the last commit produced.
    pub fn commit(&mut self) {
        self.config = Some(
            serde_json::to_string_pretty(&self.data)
                .unwrap_or_else(|_| "{}".to_string()),
        );
        self.updated = Some(Utc::now());
    }

    pub fn serialized(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: JsonValue) {
        self.data.insert(key.into(), value);
    }

    pub fn set_datetime(&mut self, key: impl Into<String>, value: DateTime<Utc>) {
        self.data
            .insert(key.into(), json!(value.format(DATE_FORMAT).to_string()));
    }

    pub fn get_bool(&self, key: &str) -> ModelResult<bool> {
        match self.require(key)? {
            JsonValue::Bool(value) => Ok(*value),
            other => Err(ModelError::type_mismatch(format!(
                "setting {key:?} holds {other}, expected a boolean"
            ))),
        }
    }

    pub fn get_f64(&self, key: &str) -> ModelResult<f64> {
        match self.require(key)? {
            JsonValue::Number(value) => value.as_f64().ok_or_else(|| {
                ModelError::type_mismatch(format!("setting {key:?} is not a float"))
            }),
            other => Err(ModelError::type_mismatch(format!(
                "setting {key:?} holds {other}, expected a number"
            ))),
        }
    }

    pub fn get_str(&self, key: &str) -> ModelResult<&str> {
        match self.require(key)? {
            JsonValue::String(value) => Ok(value),
            other => Err(ModelError::type_mismatch(format!(
                "setting {key:?} holds {other}, expected a string"
            ))),
        }
    }

    pub fn get_datetime(&self, key: &str) -> ModelResult<DateTime<Utc>> {
        let raw = self.get_str(key)?;
        let naive = NaiveDateTime::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
            ModelError::type_mismatch(format!(
                "setting {key:?} holds {raw:?}, expected a {DATE_FORMAT} date"
            ))
        })?;
        Ok(naive.and_utc())
    }

    fn require(&self, key: &str) -> ModelResult<&JsonValue> {
        self.data
            .get(key)
            .ok_or_else(|| ModelError::not_found(format!("setting {key:?}")))
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Record for ProjectSettings {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            project_id: fk(with_foreign_keys, self.project_id),
            updated: self.updated,
            data: self.data.clone(),
            config: self.config.clone(),
        }
    }
}

impl PartialEq for ProjectSettings {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectSettings;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn defaults_are_present() {
        let settings = ProjectSettings::new();
        assert!(!settings.get_bool("fdsnws_enable").unwrap());
        assert_eq!(settings.get_f64("forecast_interval").unwrap(), 6.0);
        assert!(settings.get_bool("auto_schedule_enable").unwrap());
        assert_eq!(
            settings.get_datetime("forecast_start").unwrap(),
            Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn commit_roundtrips_through_serialized_form() {
        let mut settings = ProjectSettings::new();
        settings.set("fdsnws_url", json!("http://localhost:8080/fdsnws"));
        settings.set_datetime(
            "forecast_start",
            Utc.with_ymd_and_hms(2020, 3, 1, 12, 0, 0).unwrap(),
        );
        settings.commit();

        let restored =
            ProjectSettings::from_config(settings.serialized().expect("committed")).unwrap();
        assert_eq!(restored, settings);
        assert_eq!(
            restored.get_str("fdsnws_url").unwrap(),
            "http://localhost:8080/fdsnws"
        );
        assert_eq!(
            restored.get_datetime("forecast_start").unwrap(),
            Utc.with_ymd_and_hms(2020, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn typed_accessors_reject_mismatched_values() {
        let mut settings = ProjectSettings::new();
        settings.set("forecast_interval", json!("six hours"));

        assert!(settings.get_f64("forecast_interval").is_err());
        assert!(settings.get_bool("forecast_interval").is_err());
        assert!(settings.get_datetime("fdsnws_enable").is_err());
        assert!(settings.get_f64("no_such_key").is_err());
    }
}
