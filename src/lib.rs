// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava Dashboard: year-to-date running charts from the Strava API
//!
//! This crate fetches an athlete's activities once at startup, aggregates
//! them by month and heart-rate zone, and serves five charts from a small
//! web dashboard that refreshes periodically.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::DashboardService;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub dashboard: Arc<DashboardService>,
}
