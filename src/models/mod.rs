// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod stats;
pub mod zones;

pub use activity::{Activity, GeoPoint};
pub use stats::{aggregate, MonthKey, MonthlyTotals, YearToDate};
pub use zones::{HeartRateZone, HeartRateZoneCounts};
