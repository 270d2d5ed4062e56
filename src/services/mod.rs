// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod charts;
pub mod dashboard;
pub mod strava;

pub use dashboard::{build_dashboard, Dashboard, DashboardService};
pub use strava::{AccessToken, StravaClient};
