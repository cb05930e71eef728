use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::record::{Record, RecordId, fk};

/// Processing state of a forecast, scenario, stage or model run.
///
/// Transitions are driven by the runner, not by this crate; `Dispatched`
/// marks work handed to a remote worker but not yet running.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RunState {
    #[default]
    Pending = 0,
    Running = 1,
    Error = 2,
    Complete = 3,
    Dispatched = 4,
}

impl RunState {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(RunState::Pending),
            1 => Some(RunState::Running),
            2 => Some(RunState::Error),
            3 => Some(RunState::Complete),
            4 => Some(RunState::Dispatched),
            _ => None,
        }
    }
}

/// Bookkeeping record for one unit of processing.
///
/// `info` holds free-form worker metadata, by convention e.g. the last
/// HTTP response received from a remote worker.
#[derive(Clone, Debug)]
pub struct Status {
    pub id: Option<RecordId>,
    pub run_id: Option<RecordId>,

    pub uuid: Uuid,
    pub state: RunState,
    pub info: Map<String, JsonValue>,
    pub starttime: DateTime<Utc>,
    pub endtime: Option<DateTime<Utc>>,
}

impl Status {
    pub fn new() -> Self {
        Self {
            id: None,
            run_id: None,
            uuid: Uuid::new_v4(),
            state: RunState::Pending,
            info: Map::new(),
            starttime: Utc::now(),
            endtime: None,
        }
    }

    pub fn with_state(state: RunState) -> Self {
        Self {
            state,
            ..Self::new()
        }
    }

    pub fn finished(&self) -> bool {
        matches!(self.state, RunState::Error | RunState::Complete)
    }

    /// Back to `Pending`, dropping worker metadata and the end stamp.
    pub fn reset(&mut self) {
        self.state = RunState::Pending;
        self.info = Map::new();
        self.endtime = None;
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}

impl Record for Status {
    fn clone_record(&self, with_foreign_keys: bool) -> Self {
        Self {
            id: None,
            run_id: fk(with_foreign_keys, self.run_id),
            uuid: self.uuid,
            state: self.state,
            info: self.info.clone(),
            starttime: self.starttime,
            endtime: self.endtime,
        }
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid && self.state == other.state && self.info == other.info
    }
}

#[cfg(test)]
mod tests {
    use super::{RunState, Status};

    #[test]
    fn finished_covers_terminal_states() {
        assert!(Status::with_state(RunState::Complete).finished());
        assert!(Status::with_state(RunState::Error).finished());
        assert!(!Status::with_state(RunState::Pending).finished());
        assert!(!Status::with_state(RunState::Running).finished());
        assert!(!Status::with_state(RunState::Dispatched).finished());
    }

    #[test]
    fn reset_returns_to_pending() {
        let mut status = Status::with_state(RunState::Running);
        status
            .info
            .insert("last_response".into(), serde_json::json!(202));
        status.reset();
        assert_eq!(status.state, RunState::Pending);
        assert!(status.info.is_empty());
        assert!(status.endtime.is_none());
    }

    #[test]
    fn state_codec_roundtrips() {
        for state in [
            RunState::Pending,
            RunState::Running,
            RunState::Error,
            RunState::Complete,
            RunState::Dispatched,
        ] {
            assert_eq!(RunState::from_i16(state.as_i16()), Some(state));
        }
        assert_eq!(RunState::from_i16(99), None);
    }
}
