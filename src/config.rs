use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use crate::models::{DEFAULT_LAT, DEFAULT_LONG};

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct GeoRef {
    pub lat: f64,
    pub long: f64,
}

impl Default for GeoRef {
    fn default() -> Self {
        GeoRef { lat: DEFAULT_LAT, long: DEFAULT_LONG }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct ForecastParameters {
    pub base_url: String,
}

impl Default for ForecastParameters {
    fn default() -> Self {
        ForecastParameters { base_url: "https://opendata-download-metfcst.smhi.se".to_string() }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct WidgetParameters {
    pub refresh_interval_secs: u64,
    pub upcoming_hours: usize,
}

impl Default for WidgetParameters {
    fn default() -> Self {
        // SMHI updates the point forecast about once an hour
        WidgetParameters { refresh_interval_secs: 900, upcoming_hours: 12 }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

impl Default for General {
    fn default() -> Self {
        General { log_path: "weather.log".to_string(), log_level: LevelFilter::Info, log_to_stdout: true }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub geo_ref: GeoRef,
    pub forecast: ForecastParameters,
    pub widget: WidgetParameters,
    pub general: General,
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, LoadConfigurationError> {
    let toml = fs::read_to_string(config_path)
        .map_err(|e| LoadConfigurationError::IOError(format!("{}: {}", config_path, e)))?;
    let config: Config = toml::from_str(&toml)?;

    if config.widget.refresh_interval_secs == 0 {
        return Err(LoadConfigurationError::ValueError("widget.refresh_interval_secs must be positive".to_string()));
    }

    Ok(config)
}

/// Error depicting errors that occur while loading the configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("IOError: {0}")]
    IOError(String),
    #[error("ParseError: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("ValueError: {0}")]
    ValueError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_full_config() {
        let file = write_config(r#"
            [geo_ref]
            lat = 59.3293
            long = 18.0686

            [forecast]
            base_url = "http://localhost:8080"

            [widget]
            refresh_interval_secs = 600
            upcoming_hours = 6

            [general]
            log_path = "/tmp/weather.log"
            log_level = "debug"
            log_to_stdout = false
        "#);

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.geo_ref.lat, 59.3293);
        assert_eq!(config.geo_ref.long, 18.0686);
        assert_eq!(config.forecast.base_url, "http://localhost:8080");
        assert_eq!(config.widget.refresh_interval_secs, 600);
        assert_eq!(config.widget.upcoming_hours, 6);
        assert_eq!(config.general.log_path, "/tmp/weather.log");
        assert_eq!(config.general.log_level, LevelFilter::Debug);
        assert!(!config.general.log_to_stdout);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let file = write_config("[geo_ref]\nlat = 57.7\nlong = 11.97\n");

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.geo_ref.lat, 57.7);
        assert_eq!(config.forecast.base_url, "https://opendata-download-metfcst.smhi.se");
        assert_eq!(config.widget.refresh_interval_secs, 900);
        assert_eq!(config.widget.upcoming_hours, 12);
        assert_eq!(config.general.log_level, LevelFilter::Info);
    }

    #[test]
    fn rejects_bad_files() {
        assert!(matches!(load_config("/nonexistent/weather.toml"), Err(LoadConfigurationError::IOError(_))));

        let broken = write_config("[geo_ref\nlat = ");
        assert!(matches!(load_config(broken.path().to_str().unwrap()), Err(LoadConfigurationError::ParseError(_))));

        let zero = write_config("[widget]\nrefresh_interval_secs = 0\n");
        assert!(matches!(load_config(zero.path().to_str().unwrap()), Err(LoadConfigurationError::ValueError(_))));
    }
}
