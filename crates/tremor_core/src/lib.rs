pub mod error;
pub mod forecast;
pub mod hydraulics;
pub mod meta;
pub mod model;
pub mod project;
pub mod quantity;
pub mod record;
pub mod results;
pub mod runs;
pub mod seismics;
pub mod series;
pub mod settings;
pub mod signal;
pub mod status;
pub mod well;

pub use error::{ModelError, ModelResult};
pub use forecast::{Forecast, ForecastScenario, ForecastStage, StagePayload};
pub use hydraulics::{HydraulicSample, Hydraulics, InjectionPlan};
pub use meta::{CreationInfo, Epoch};
pub use model::{HazardModel, ModelKind, SeismicityModel};
pub use project::{Project, ProjectEvent, ReferencePoint};
pub use quantity::{RealQuantity, TimeQuantity};
pub use record::{Record, RecordId};
pub use results::{
    GeoPoint, HazardCurve, HazardMap, HazardPointValue, ReservoirSeismicityPrediction,
    SeismicityPredictionBin, SkillTest,
};
pub use runs::{HazardModelRun, RiskModelRun, SeismicityModelRun};
pub use seismics::{SeismicCatalog, SeismicEvent};
pub use series::{SampleFilter, TimeSeries, Timestamped};
pub use settings::ProjectSettings;
pub use signal::{Signal, SlotId};
pub use status::{RunState, Status};
pub use well::{InjectionWell, WellSection};
