use std::mem;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use log::{debug, info, warn};
use thiserror::Error;
use crate::manager_forecast::errors::{FetchError, ParseError};
use crate::manager_forecast::models::RawPayload;
use crate::manager_forecast::parser::parse_time_step;
use crate::manager_forecast::ForecastSource;
use crate::models::{Forecast, Location, LocationError};

type UpdateCallback = Box<dyn FnOnce() + Send + 'static>;

/// Holds the most recently fetched forecast payload for one location
///
/// Cloning gives a handle to the same cache and location, which is how timer callbacks and
/// refresh completions reach the store. The payload is replaced by swapping the reference,
/// readers keep whatever payload they got hold of until they are done with it.
#[derive(Clone)]
pub struct DataStore {
    inner: Arc<Inner>,
}

struct Inner {
    source: Box<dyn ForecastSource>,
    payload: RwLock<Option<Arc<RawPayload>>>,
    location: Mutex<Location>,
    refresh: Mutex<RefreshState>,
}

/// Bookkeeping for the one refresh allowed in flight
#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    rerun: bool,
    waiting: Vec<UpdateCallback>,
}

impl DataStore {
    /// Returns a new data store with an empty cache
    ///
    /// # Arguments
    ///
    /// * 'source' - where to fetch forecasts from
    /// * 'location' - initial location
    pub fn new(source: Box<dyn ForecastSource>, location: Location) -> DataStore {
        DataStore {
            inner: Arc::new(Inner {
                source,
                payload: RwLock::new(None),
                location: Mutex::new(location),
                refresh: Mutex::new(RefreshState::default()),
            }),
        }
    }

    pub fn location(&self) -> Location {
        self.inner.location()
    }

    /// Sets the location used by the next fetch, it does not fetch anything by itself
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude in decimal degrees
    /// * 'long' - longitude in decimal degrees
    pub fn set_location(&self, lat: f64, long: f64) -> Result<(), DataStoreError> {
        let location = Location::new(lat, long)?;
        *self.inner.location.lock().unwrap_or_else(PoisonError::into_inner) = location;
        info!("location set to lat {}, long {}", lat, long);

        Ok(())
    }

    /// Returns the forecast for the first time step in the cached payload
    ///
    /// If nothing is cached yet, a blocking fetch is made first.
    pub fn current_forecast(&self) -> Result<Forecast, DataStoreError> {
        let payload = self.payload()?;
        let record = payload.time_series.first().ok_or(DataStoreError::NoDataError)?;

        Ok(parse_time_step(record)?)
    }

    /// Returns forecasts for up to 'n' time steps, in the order they appear in the payload
    ///
    /// If nothing is cached yet, a blocking fetch is made first.
    ///
    /// # Arguments
    ///
    /// * 'n' - max number of forecasts to return
    pub fn upcoming_forecasts(&self, n: usize) -> Result<Vec<Forecast>, DataStoreError> {
        let payload = self.payload()?;

        let forecasts = payload.time_series
            .iter()
            .take(n)
            .map(parse_time_step)
            .collect::<Result<Vec<Forecast>, ParseError>>()?;

        Ok(forecasts)
    }

    /// Starts a non-blocking fetch that replaces the cached payload on success
    ///
    /// A failed fetch is logged and otherwise ignored, the previous payload stays in place.
    pub fn refresh(&self) {
        self.refresh_and_then(|| {});
    }

    /// Same as refresh, calling 'on_updated' once the new payload is in place.
    ///
    /// Only one fetch is in flight at a time. Calls made meanwhile are folded into one more
    /// fetch, started for the then current location when the running one completes.
    /// 'on_updated' is dropped without being called if no fetch for it succeeds.
    ///
    /// # Arguments
    ///
    /// * 'on_updated' - called after a successful swap
    pub fn refresh_and_then<F>(&self, on_updated: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.inner.refresh.lock().unwrap_or_else(PoisonError::into_inner);
            state.waiting.push(Box::new(on_updated));
            if state.in_flight {
                debug!("refresh already in progress, rerunning when it completes");
                state.rerun = true;
                return;
            }
            state.in_flight = true;
        }

        Inner::start_refresh(&self.inner);
    }

    /// Returns the cached payload
    ///
    pub fn snapshot(&self) -> Option<Arc<RawPayload>> {
        self.inner.payload.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the cached payload, fetching it with a blocking call if the cache is empty
    ///
    /// A payload that a refresh put in place while the blocking fetch was running wins over
    /// the fetched one.
    fn payload(&self) -> Result<Arc<RawPayload>, DataStoreError> {
        if let Some(payload) = self.snapshot() {
            return Ok(payload);
        }

        info!("no forecast cached, fetching");
        let fetched = Arc::new(self.inner.source.fetch_sync(&self.location())?);

        let mut cached = self.inner.payload.write().unwrap_or_else(PoisonError::into_inner);
        let payload = cached.get_or_insert(fetched);

        Ok(Arc::clone(payload))
    }
}

impl Inner {
    fn location(&self) -> Location {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issues the async fetch for the current location
    ///
    fn start_refresh(inner: &Arc<Inner>) {
        let requested = inner.location();
        let completion = Arc::clone(inner);

        inner.source.fetch_async(requested, Box::new(move |result| {
            Inner::finish_refresh(&completion, requested, result);
        }));
    }

    /// Swaps in a fetched payload if it is still for the current location, then either
    /// notifies the waiting callers or starts the rerun they asked for
    ///
    /// # Arguments
    ///
    /// * 'inner' - the store
    /// * 'requested' - location the fetch was made for
    /// * 'result' - outcome of the fetch
    fn finish_refresh(inner: &Arc<Inner>, requested: Location, result: Result<RawPayload, FetchError>) {
        let updated = match result {
            Ok(payload) if requested == inner.location() => {
                debug!("refresh got {} time steps", payload.time_series.len());
                *inner.payload.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(payload));
                true
            }
            Ok(_) => {
                debug!("dropping forecast for previous location {:?}", requested);
                false
            }
            Err(e) => {
                warn!("refresh failed, keeping previous forecast: {}", e);
                false
            }
        };

        let (callbacks, rerun) = {
            let mut state = inner.refresh.lock().unwrap_or_else(PoisonError::into_inner);
            let callbacks = if updated || !state.rerun {
                mem::take(&mut state.waiting)
            } else {
                Vec::new()
            };
            let rerun = mem::replace(&mut state.rerun, false);
            state.in_flight = rerun;
            (callbacks, rerun)
        };

        if updated {
            callbacks.into_iter().for_each(|f| f());
        }
        if rerun {
            Inner::start_refresh(inner);
        }
    }
}

#[derive(Debug, Error)]
pub enum DataStoreError {
    #[error("NoDataError: forecast has no time steps")]
    NoDataError,
    #[error("{0}")]
    FetchError(#[from] FetchError),
    #[error("{0}")]
    ParseError(#[from] ParseError),
    #[error("{0}")]
    LocationError(#[from] LocationError),
}
