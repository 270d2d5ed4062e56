// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard page and chart data routes.

use crate::error::Result;
use crate::models::{aggregate, HeartRateZone, HeartRateZoneCounts};
use crate::services::Dashboard;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Local};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const INDEX_TEMPLATE: &str = include_str!("index.html");

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/summary", get(get_summary))
}

/// Render the page shell; charts are loaded from `/api/dashboard`.
pub fn render_index(refresh_ms: u128) -> String {
    INDEX_TEMPLATE.replace("__REFRESH_MS__", &refresh_ms.to_string())
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(state.config.refresh_interval.as_millis()))
}

/// Current chart figures.
async fn get_dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let dashboard = state.dashboard.dashboard().await;
    Json(Dashboard::clone(&dashboard))
}

// ─── Summary ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthSummary {
    /// "YYYY-MM"
    pub month: String,
    pub activities: u32,
    pub distance_meters: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub moving_time_secs: i64,
    pub elevation_gain_meters: f64,
    pub pace_secs_per_km: Option<f64>,
    pub fastest_pace_secs_per_km: Option<f64>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ZoneSummary {
    pub zone: String,
    pub count: u32,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SummaryResponse {
    pub year: i32,
    pub fetched_at: String,
    /// Activities in the snapshot, any year
    pub total_activities: usize,
    /// Activities in `year`
    pub year_activities: usize,
    pub months: Vec<MonthSummary>,
    /// Absent when no activity has heart-rate data
    pub heart_rate_zones: Option<Vec<ZoneSummary>>,
}

/// Year-to-date monthly totals and zone counts.
async fn get_summary(State(state): State<Arc<AppState>>) -> Result<Json<SummaryResponse>> {
    let snapshot = state.dashboard.snapshot().await;
    let ytd = aggregate(&snapshot.activities, Local::now().year())?;

    let months = ytd
        .months
        .iter()
        .map(|(key, totals)| MonthSummary {
            month: key.to_string(),
            activities: totals.activities,
            distance_meters: totals.distance,
            moving_time_secs: totals.moving_time,
            elevation_gain_meters: totals.elevation_gain,
            pace_secs_per_km: totals.pace_secs_per_km(),
            fastest_pace_secs_per_km: totals.fastest_pace,
        })
        .collect();

    let heart_rate_zones = HeartRateZoneCounts::from_activities(&ytd.activities).map(|counts| {
        HeartRateZone::ALL
            .iter()
            .map(|&zone| ZoneSummary {
                zone: zone.label().to_string(),
                count: counts.get(zone),
            })
            .collect()
    });

    Ok(Json(SummaryResponse {
        year: ytd.year,
        fetched_at: format_utc_rfc3339(snapshot.fetched_at),
        total_activities: snapshot.activities.len(),
        year_activities: ytd.activities.len(),
        months,
        heart_rate_zones,
    }))
}
