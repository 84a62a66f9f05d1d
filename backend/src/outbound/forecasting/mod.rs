//! Forecast engine adapters.

mod augurs_engine;

pub use augurs_engine::AugursForecastEngine;
