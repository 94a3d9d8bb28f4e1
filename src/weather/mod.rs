//! Daily weather snapshot for the resort pages.
//!
//! Pulls recent conditions from Open-Meteo, reduces them to a small
//! per-resort summary, and writes a dated archive copy plus the public
//! `latest.json` the site serves.

mod api;
mod open_meteo;
mod snapshot;

pub use api::{Forecast, ForecastApi};
pub use open_meteo::OpenMeteoClient;
pub use snapshot::{
    build_snapshot, load_locations, write_snapshot, ResortConditions, ResortLocation,
    ResortWeather, SnapshotMeta, WeatherSnapshot,
};
