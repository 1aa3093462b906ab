use thiserror::Error;

/// Default coordinates point to Umeå
pub const DEFAULT_LAT: f64 = 63.838241;
pub const DEFAULT_LONG: f64 = 20.307247;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub long: f64,
}

impl Location {
    /// Returns a new location, rejecting coordinates that are not finite numbers
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude in decimal degrees
    /// * 'long' - longitude in decimal degrees
    pub fn new(lat: f64, long: f64) -> Result<Location, LocationError> {
        if !lat.is_finite() || !long.is_finite() {
            return Err(LocationError::InvalidLocationError(lat, long));
        }

        Ok(Location { lat, long })
    }
}

impl Default for Location {
    fn default() -> Self {
        Location { lat: DEFAULT_LAT, long: DEFAULT_LONG }
    }
}

/// One forecast time step with the parameters shown in the panel
///
/// Every parameter is optional since SMHI may leave any of them out for a given time step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Forecast {
    pub valid_time: String,
    pub temp: Option<f64>,
    pub vis: Option<f64>,
    pub ws: Option<f64>,
    pub rain: Option<f64>,
    pub rel_hum: Option<f64>,
    pub thunder_prob: Option<f64>,
    pub wsymb: Option<f64>,
    pub cloudiness: Option<f64>,
}

impl Forecast {
    /// Returns the forecast field that the given SMHI parameter name maps to, if any
    ///
    /// # Arguments
    ///
    /// * 'name' - SMHI parameter name, e.g. "t" or "Wsymb2"
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Option<f64>> {
        match name {
            "t"        => Some(&mut self.temp),
            "vis"      => Some(&mut self.vis),
            "ws"       => Some(&mut self.ws),
            "r"        => Some(&mut self.rel_hum),
            "tstm"     => Some(&mut self.thunder_prob),
            "tcc_mean" => Some(&mut self.cloudiness),
            "Wsymb2"   => Some(&mut self.wsymb),
            "pmedian"  => Some(&mut self.rain),
            _ => None,
        }
    }

    /// Returns the description of the weather symbol, if the symbol is present and known
    ///
    pub fn weather_description(&self) -> Option<&'static str> {
        self.wsymb.and_then(weather_description)
    }
}

// SMHI Wsymb2 codes 1-27, index 0 is code 1
const WEATHER_SYMBOLS: [&str; 27] = [
    "Clear sky",
    "Nearly clear sky",
    "Variable cloudiness",
    "Halfclear sky",
    "Cloudy sky",
    "Overcast",
    "Fog",
    "Light rain showers",
    "Moderate rain showers",
    "Heavy rain showers",
    "Thunderstorm",
    "Light sleet showers",
    "Moderate sleet showers",
    "Heavy sleet showers",
    "Light snow showers",
    "Moderate snow showers",
    "Heavy snow showers",
    "Light rain",
    "Moderate rain",
    "Heavy rain",
    "Thunder",
    "Light sleet",
    "Moderate sleet",
    "Heavy sleet",
    "Light snowfall",
    "Moderate snowfall",
    "Heavy snowfall",
];

/// Maps a Wsymb2 code to its description
///
/// # Arguments
///
/// * 'code' - weather symbol code as delivered by SMHI (a float holding an integer 1-27)
pub fn weather_description(code: f64) -> Option<&'static str> {
    if code.fract() != 0.0 || code < 1.0 {
        return None;
    }

    WEATHER_SYMBOLS.get(code as usize - 1).copied()
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("InvalidLocationError: lat {0}, long {1}")]
    InvalidLocationError(f64, f64),
}
