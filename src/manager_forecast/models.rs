use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A point forecast document as delivered by SMHI
///
/// Only the time series is kept; the records stay untyped until they are parsed one by one,
/// so that a single malformed record does not invalidate the whole document.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RawPayload {
    #[serde(rename = "timeSeries")]
    pub time_series: Vec<Value>,
}

#[derive(Deserialize)]
pub struct TimeStep {
    #[serde(rename = "validTime")]
    pub valid_time: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}
