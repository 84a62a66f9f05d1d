//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the driving port and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::ForecastCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Driving port for `POST /predict/{userId}`.
    pub forecasts: Arc<dyn ForecastCommand>,
}

impl HttpState {
    /// Construct state from the forecast use-case.
    #[must_use]
    pub fn new(forecasts: Arc<dyn ForecastCommand>) -> Self {
        Self { forecasts }
    }
}
