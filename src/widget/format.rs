use crate::models::Forecast;
use crate::wind_chill::apparent_temperature;

pub const LOADING_LABEL: &str = "Loading...";
pub const UNAVAILABLE_LABEL: &str = "Unavailable";
pub const TOOLTIP_TITLE: &str = "Weather";

/// Panel label, the current temperature rounded to whole degrees
///
/// # Arguments
///
/// * 'forecast' - the current forecast
pub fn label_text(forecast: &Forecast) -> String {
    match forecast.temp {
        // adding 0.0 turns a rounded -0 into 0
        Some(t) => format!("{} °C", t.round() + 0.0),
        None => "-- °C".to_string(),
    }
}

/// Panel tooltip with weather description and apparent temperature, where available
///
/// # Arguments
///
/// * 'forecast' - the current forecast
pub fn tooltip_text(forecast: &Forecast) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(desc) = forecast.weather_description() {
        parts.push(desc.to_string());
    }
    if let (Some(t), Some(ws)) = (forecast.temp, forecast.ws) {
        parts.push(format!("feels like {:.1} °C", apparent_temperature(t, ws)));
    }

    if parts.is_empty() {
        TOOLTIP_TITLE.to_string()
    } else {
        format!("{}: {}", TOOLTIP_TITLE, parts.join(", "))
    }
}

/// One menu line for an hourly forecast, parameters missing in the forecast are left out
///
/// # Arguments
///
/// * 'forecast' - the forecast to describe
pub fn menu_line(forecast: &Forecast) -> String {
    let mut line = format!("{:>5}", forecast.valid_time);

    if let Some(t) = forecast.temp {
        line.push_str(&format!("  {:.1} °C", t));
    }
    if let Some(desc) = forecast.weather_description() {
        line.push_str(&format!("  {}", desc));
    }
    if let Some(rain) = forecast.rain {
        line.push_str(&format!("  {:.1} mm", rain));
    }
    if let Some(ws) = forecast.ws {
        line.push_str(&format!("  {:.1} m/s", ws));
    }

    line
}
