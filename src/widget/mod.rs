pub mod format;

use std::sync::Arc;
use std::time::Duration;
use log::{error, info, warn};
use crate::config::WidgetParameters;
use crate::data_store::{DataStore, DataStoreError};
use crate::host::{Panel, PopupMenu, Timer, TimerHandle};
use crate::models::Location;
use crate::widget::format::{label_text, menu_line, tooltip_text, LOADING_LABEL, TOOLTIP_TITLE, UNAVAILABLE_LABEL};

/// Panel weather widget, showing the current temperature with upcoming hours in a popup menu
///
/// The widget owns its data store and drives it from the host's lifecycle calls.
pub struct WeatherWidget<M: PopupMenu, T: Timer> {
    store: DataStore,
    panel: Arc<dyn Panel>,
    menu: Option<M>,
    timer: T,
    timer_handle: Option<TimerHandle>,
    refresh_interval: Duration,
    upcoming_hours: usize,
}

impl<M: PopupMenu, T: Timer> WeatherWidget<M, T> {
    /// Returns a new widget, nothing is fetched or shown until 'on_create' is called
    ///
    /// # Arguments
    ///
    /// * 'store' - data store to get forecasts from
    /// * 'panel' - host panel to show label and tooltip in
    /// * 'menu' - host popup menu for upcoming forecasts
    /// * 'timer' - host timer used for periodic refresh
    /// * 'params' - widget configuration
    pub fn new(store: DataStore, panel: Arc<dyn Panel>, menu: M, timer: T, params: &WidgetParameters) -> Self {
        WeatherWidget {
            store,
            panel,
            menu: Some(menu),
            timer,
            timer_handle: None,
            refresh_interval: Duration::from_secs(params.refresh_interval_secs),
            upcoming_hours: params.upcoming_hours,
        }
    }

    /// Shows the initial label, loads the first forecast (blocking) and starts periodic refresh
    ///
    /// # Arguments
    ///
    /// * 'location' - location to show the weather for
    pub fn on_create(&mut self, location: Location) {
        self.panel.set_tooltip(TOOLTIP_TITLE);
        self.panel.set_label(LOADING_LABEL);

        if let Err(e) = self.store.set_location(location.lat, location.long) {
            warn!("keeping location {:?}: {}", self.store.location(), e);
        }
        render(&self.store, self.panel.as_ref());

        if let Some(handle) = self.timer_handle.take() {
            self.timer.cancel(handle);
        }
        let store = self.store.clone();
        let panel = Arc::clone(&self.panel);
        let handle = self.timer.schedule_repeating(self.refresh_interval, Box::new(move || {
            refresh_and_render(&store, &panel);
        }));
        self.timer_handle = Some(handle);

        info!("widget created, refreshing every {}s", self.refresh_interval.as_secs());
    }

    /// Stops periodic refresh and releases the menu
    ///
    pub fn on_removed(&mut self) {
        if let Some(handle) = self.timer_handle.take() {
            self.timer.cancel(handle);
        }
        if let Some(mut menu) = self.menu.take() {
            menu.destroy();
        }

        info!("widget removed");
    }

    /// Rebuilds the menu from the upcoming forecasts and toggles it
    ///
    pub fn on_clicked(&mut self) {
        let Some(menu) = self.menu.as_mut() else {
            return;
        };

        menu.remove_all();
        match self.store.upcoming_forecasts(self.upcoming_hours) {
            Ok(forecasts) => forecasts.iter().for_each(|f| menu.add_text_item(&menu_line(f))),
            Err(e) => {
                error!("upcoming forecasts unavailable: {}", e);
                menu.add_text_item(UNAVAILABLE_LABEL);
            }
        }
        menu.toggle();
    }

    /// Sets the location for coming fetches. The shown forecast is kept until the next refresh
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude in decimal degrees
    /// * 'long' - longitude in decimal degrees
    pub fn set_location(&mut self, lat: f64, long: f64) -> Result<(), DataStoreError> {
        self.store.set_location(lat, long)
    }

    /// Starts a refresh outside the timer schedule
    ///
    pub fn refresh(&self) {
        refresh_and_render(&self.store, &self.panel);
    }
}

/// Refreshes the store and updates the panel once new data is in
///
/// # Arguments
///
/// * 'store' - the data store to refresh
/// * 'panel' - the panel to update
fn refresh_and_render(store: &DataStore, panel: &Arc<dyn Panel>) {
    let s = store.clone();
    let p = Arc::clone(panel);
    store.refresh_and_then(move || render(&s, p.as_ref()));
}

/// Shows the current forecast in the panel, or a fallback label if there is none
///
/// # Arguments
///
/// * 'store' - the data store to get the forecast from
/// * 'panel' - the panel to update
fn render(store: &DataStore, panel: &dyn Panel) {
    match store.current_forecast() {
        Ok(forecast) => {
            panel.set_label(&label_text(&forecast));
            panel.set_tooltip(&tooltip_text(&forecast));
        }
        Err(e) => {
            error!("current forecast unavailable: {}", e);
            panel.set_label(UNAVAILABLE_LABEL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::Ordering;
    use crate::data_store::tests::{payload, FakeSource};

    #[derive(Default)]
    struct RecordingPanel {
        labels: Mutex<Vec<String>>,
        tooltips: Mutex<Vec<String>>,
    }

    impl RecordingPanel {
        fn last_label(&self) -> String {
            self.labels.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    impl Panel for RecordingPanel {
        fn set_label(&self, text: &str) {
            self.labels.lock().unwrap().push(text.to_string());
        }
        fn set_tooltip(&self, text: &str) {
            self.tooltips.lock().unwrap().push(text.to_string());
        }
    }

    #[derive(Default)]
    struct MenuState {
        items: Vec<String>,
        toggles: usize,
        destroyed: bool,
    }

    #[derive(Clone, Default)]
    struct RecordingMenu(Arc<Mutex<MenuState>>);

    impl PopupMenu for RecordingMenu {
        fn add_text_item(&mut self, text: &str) {
            self.0.lock().unwrap().items.push(text.to_string());
        }
        fn remove_all(&mut self) {
            self.0.lock().unwrap().items.clear();
        }
        fn toggle(&mut self) {
            self.0.lock().unwrap().toggles += 1;
        }
        fn destroy(&mut self) {
            self.0.lock().unwrap().destroyed = true;
        }
    }

    #[derive(Default)]
    struct TimerState {
        callbacks: Vec<(TimerHandle, Duration, Box<dyn FnMut() + Send>)>,
        cancelled: Vec<TimerHandle>,
    }

    #[derive(Clone, Default)]
    struct ManualTimer(Arc<Mutex<TimerState>>);

    impl ManualTimer {
        fn fire(&self) {
            for (_, _, callback) in self.0.lock().unwrap().callbacks.iter_mut() {
                callback();
            }
        }
    }

    impl Timer for ManualTimer {
        fn schedule_repeating(&mut self, interval: Duration, callback: Box<dyn FnMut() + Send>) -> TimerHandle {
            let mut state = self.0.lock().unwrap();
            let handle = TimerHandle(state.callbacks.len() as u64);
            state.callbacks.push((handle, interval, callback));
            handle
        }
        fn cancel(&mut self, handle: TimerHandle) {
            let mut state = self.0.lock().unwrap();
            state.callbacks.retain(|(h, _, _)| *h != handle);
            state.cancelled.push(handle);
        }
    }

    fn widget(source: FakeSource) -> (WeatherWidget<RecordingMenu, ManualTimer>, Arc<RecordingPanel>, RecordingMenu, ManualTimer) {
        let panel = Arc::new(RecordingPanel::default());
        let menu = RecordingMenu::default();
        let timer = ManualTimer::default();
        let params = WidgetParameters { refresh_interval_secs: 900, upcoming_hours: 3 };
        let store = DataStore::new(Box::new(source), Location::default());
        let w = WeatherWidget::new(store, panel.clone(), menu.clone(), timer.clone(), &params);

        (w, panel, menu, timer)
    }

    #[test]
    fn on_create_shows_loading_then_current_temperature() {
        let (mut w, panel, _, timer) = widget(FakeSource::new(vec![Ok(payload(5, -3.4))]));
        w.on_create(Location { lat: 59.3293, long: 18.0686 });

        let labels = panel.labels.lock().unwrap().clone();
        assert_eq!(labels, vec!["Loading...".to_string(), "-3 °C".to_string()]);
        assert_eq!(panel.tooltips.lock().unwrap()[0], "Weather");
        assert_eq!(panel.tooltips.lock().unwrap()[1], "Weather: feels like -7.6 °C");

        let state = timer.0.lock().unwrap();
        assert_eq!(state.callbacks.len(), 1);
        assert_eq!(state.callbacks[0].1, Duration::from_secs(900));
    }

    #[test]
    fn cold_start_failure_shows_unavailable() {
        let (mut w, panel, _, _) = widget(FakeSource::new(vec![Err(500)]));
        w.on_create(Location::default());

        assert_eq!(panel.last_label(), "Unavailable");
    }

    #[test]
    fn timer_tick_refreshes_and_renders() {
        let source = FakeSource::new(vec![Ok(payload(5, 1.0)), Ok(payload(5, 4.0))]);
        let async_calls = Arc::clone(&source.async_calls);
        let (mut w, panel, _, timer) = widget(source);
        w.on_create(Location::default());
        assert_eq!(panel.last_label(), "1 °C");

        timer.fire();
        assert_eq!(async_calls.load(Ordering::SeqCst), 1);
        assert_eq!(panel.last_label(), "4 °C");
    }

    #[test]
    fn failed_tick_keeps_stale_label() {
        let source = FakeSource::new(vec![Ok(payload(5, 1.0)), Err(502)]);
        let (mut w, panel, _, timer) = widget(source);
        w.on_create(Location::default());
        let count = panel.labels.lock().unwrap().len();

        timer.fire();
        assert_eq!(panel.labels.lock().unwrap().len(), count);
        assert_eq!(panel.last_label(), "1 °C");
    }

    #[test]
    fn click_fills_menu_with_upcoming_hours() {
        let (mut w, _, menu, _) = widget(FakeSource::new(vec![Ok(payload(5, 2.0))]));
        w.on_create(Location::default());

        w.on_clicked();
        w.on_clicked();

        let state = menu.0.lock().unwrap();
        assert_eq!(state.items.len(), 3);
        assert!(state.items[0].ends_with("2.0 °C  3.0 m/s"), "{}", state.items[0]);
        assert_eq!(state.toggles, 2);
    }

    #[test]
    fn click_with_short_series_truncates() {
        let (mut w, _, menu, _) = widget(FakeSource::new(vec![Ok(payload(2, 2.0))]));
        w.on_clicked();

        assert_eq!(menu.0.lock().unwrap().items.len(), 2);
    }

    #[test]
    fn removed_cancels_timer_and_destroys_menu() {
        let (mut w, _, menu, timer) = widget(FakeSource::new(vec![Ok(payload(3, 2.0))]));
        w.on_create(Location::default());
        w.on_removed();

        assert!(menu.0.lock().unwrap().destroyed);
        let state = timer.0.lock().unwrap();
        assert!(state.callbacks.is_empty());
        assert_eq!(state.cancelled, vec![TimerHandle(0)]);
        drop(state);

        // clicks after removal are ignored
        w.on_clicked();
        assert_eq!(menu.0.lock().unwrap().toggles, 0);
    }

    #[test]
    fn set_location_is_used_by_next_refresh() {
        let source = FakeSource::new(vec![Ok(payload(3, 2.0))]);
        let locations = Arc::clone(&source.locations);
        let (mut w, _, _, _) = widget(source);
        w.on_create(Location::default());

        w.set_location(55.605, 13.0038).unwrap();
        w.refresh();

        let seen = locations.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], Location { lat: 55.605, long: 13.0038 });
        assert!(w.set_location(f64::NAN, 0.0).is_err());
    }
}
