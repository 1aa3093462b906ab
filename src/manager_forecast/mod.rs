pub mod errors;
pub mod models;
pub mod parser;

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use crate::config::ForecastParameters;
use crate::manager_forecast::errors::FetchError;
use crate::manager_forecast::models::RawPayload;
use crate::models::Location;

pub type FetchCallback = Box<dyn FnOnce(Result<RawPayload, FetchError>) + Send + 'static>;

/// Abstraction over where point forecasts come from
///
pub trait ForecastSource: Send + Sync {
    /// Fetches a forecast for the given location, blocking until it has arrived
    ///
    /// # Arguments
    ///
    /// * 'location' - the point to get a forecast for
    fn fetch_sync(&self, location: &Location) -> Result<RawPayload, FetchError>;

    /// Fetches a forecast for the given location without blocking the caller.
    /// The callback is called exactly once, with either the payload or the error
    ///
    /// # Arguments
    ///
    /// * 'location' - the point to get a forecast for
    /// * 'on_complete' - callback receiving the outcome
    fn fetch_async(&self, location: Location, on_complete: FetchCallback);
}

/// Struct for fetching point forecasts from SMHI open data
pub struct Smhi {
    client: Client,
    base_url: String,
}

impl Smhi {
    /// Returns a Smhi struct ready for fetching forecasts
    ///
    /// No timeout is set here, the client default applies
    ///
    /// # Arguments
    ///
    /// * 'config' - forecast configuration to use
    pub fn new(config: &ForecastParameters) -> Result<Smhi, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Smhi {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the point forecast url for the given location
    ///
    /// # Arguments
    ///
    /// * 'location' - the point to get a forecast for
    pub fn url(&self, location: &Location) -> String {
        format!("{}/api/category/pmp3g/version/2/geotype/point/lon/{}/lat/{}/data.json",
                self.base_url, location.long, location.lat)
    }
}

impl ForecastSource for Smhi {
    fn fetch_sync(&self, location: &Location) -> Result<RawPayload, FetchError> {
        get_payload(&self.client, &self.url(location))
    }

    fn fetch_async(&self, location: Location, on_complete: FetchCallback) {
        let client = self.client.clone();
        let url = self.url(&location);

        rayon::spawn(move || {
            on_complete(get_payload(&client, &url));
        });
    }
}

/// Sends a GET request and decodes the response into a payload
///
/// # Arguments
///
/// * 'client' - the http client to use
/// * 'url' - the full url to the point forecast
fn get_payload(client: &Client, url: &str) -> Result<RawPayload, FetchError> {
    debug!("fetching forecast: {}", url);

    let response = client.get(url).send()?;
    let status = response.status();
    let body = response.text()?;

    decode_response(status, &body)
}

/// Validates status and body of a forecast response and parses the body
///
/// # Arguments
///
/// * 'status' - http status of the response
/// * 'body' - the response body
fn decode_response(status: StatusCode, body: &str) -> Result<RawPayload, FetchError> {
    if status != StatusCode::OK {
        return Err(FetchError::HttpStatusError(status.as_u16()));
    }
    if body.trim().is_empty() {
        return Err(FetchError::EmptyBodyError);
    }

    let json: Value = serde_json::from_str(body)?;
    if !json.get("timeSeries").is_some_and(Value::is_array) {
        return Err(FetchError::MalformedJsonError("document has no timeSeries array".to_string()));
    }

    Ok(serde_json::from_value(json)?)
}
