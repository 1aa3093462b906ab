use std::fmt::Display;
use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;
use serde_json::Value;
use crate::manager_forecast::errors::ParseError;
use crate::manager_forecast::models::TimeStep;
use crate::models::Forecast;

/// Parses one SMHI time step record into a forecast with the valid time in local time
///
/// # Arguments
///
/// * 'record' - one entry from the payload time series
pub fn parse_time_step(record: &Value) -> Result<Forecast, ParseError> {
    parse_time_step_in(record, &Local)
}

/// Parses one SMHI time step record into a forecast with the valid time in the given time zone
///
/// Parameters may come in any order. Names outside the forecast fields are skipped, and each
/// known field takes the first of its values, so probabilistic spreads collapse to one number.
///
/// # Arguments
///
/// * 'record' - one entry from the payload time series
/// * 'tz' - time zone to present the valid time in
pub fn parse_time_step_in<Tz>(record: &Value, tz: &Tz) -> Result<Forecast, ParseError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time_step = TimeStep::deserialize(record)
        .map_err(|e| ParseError::MalformedRecordError(e.to_string()))?;

    let valid_time = DateTime::parse_from_rfc3339(&time_step.valid_time)
        .map_err(|e| ParseError::MalformedRecordError(format!("validTime '{}': {}", time_step.valid_time, e)))?
        .with_timezone(tz);

    let mut forecast = Forecast {
        valid_time: valid_time.format("%-H:00").to_string(),
        ..Default::default()
    };

    for p in time_step.parameters {
        if let Some(field) = forecast.field_mut(&p.name) {
            *field = match p.values.first() {
                Some(v) => Some(v.as_f64().ok_or_else(|| {
                    ParseError::MalformedRecordError(format!("parameter '{}' value {} is not a number", p.name, v))
                })?),
                None => None,
            };
        }
    }

    Ok(forecast)
}
