use std::env;
use std::sync::Arc;
use log::info;
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::data_store::DataStore;
use crate::host::console::{ConsoleMenu, ConsolePanel, ThreadTimer};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_forecast::errors::FetchError;
use crate::manager_forecast::Smhi;
use crate::models::{Location, LocationError};
use crate::widget::WeatherWidget;

pub type ConsoleWidget = WeatherWidget<ConsoleMenu, ThreadTimer>;

/// Initializes and returns the configured start location and a widget wired to the console host
///
pub fn init() -> Result<(Location, ConsoleWidget), InitializationError> {
    let args: Vec<String> = env::args().collect();
    let config_path = args.iter()
        .find_map(|p| p.strip_prefix("--config="));

    // Load configuration, defaults apply when no file is given
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    // Setup logging
    let _ = setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;

    // Print version
    info!("starting smhi panel weather version: {}", env!("CARGO_PKG_VERSION"));
    if config_path.is_none() {
        info!("no --config=<path> given, using default configuration");
    }

    let location = Location::new(config.geo_ref.lat, config.geo_ref.long)?;
    let smhi = Smhi::new(&config.forecast)?;
    let store = DataStore::new(Box::new(smhi), location);

    let widget = WeatherWidget::new(
        store,
        Arc::new(ConsolePanel),
        ConsoleMenu::default(),
        ThreadTimer::default(),
        &config.widget,
    );

    Ok((location, widget))
}

/// Error depicting errors that occur while initializing the widget
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("LocationError: {0}")]
    LocationError(#[from] LocationError),
    #[error("ForecastSetupError: {0}")]
    ForecastSetupError(#[from] FetchError),
}
