//! Prediction monitoring model

use std::collections::BTreeMap;

use drift_core::Observation;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct PredictRequest {
    pub features: BTreeMap<String, Value>,

    #[validate(length(min = 1, message = "model_version must not be empty"))]
    pub model_version: String,

    #[validate(length(min = 1, message = "timestamp must not be empty"))]
    pub timestamp: String,
}

impl From<PredictRequest> for Observation {
    fn from(req: PredictRequest) -> Self {
        Observation {
            features: req.features,
            model_version: req.model_version,
            timestamp: req.timestamp,
        }
    }
}
