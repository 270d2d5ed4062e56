// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard pipeline and periodic refresh.
//!
//! The pipeline is: activity snapshot -> year-to-date aggregates and
//! heart-rate zones -> five chart figures. The snapshot is fetched once at
//! startup; refresh ticks rebuild the charts from it, and re-fetch first only
//! when `refetch_on_tick` is enabled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{aggregate, Activity, HeartRateZoneCounts, YearToDate};
use crate::services::charts::{self, Figure, MAP_CHART_HEIGHT, MONTHLY_CHART_HEIGHT};
use crate::services::strava::StravaClient;
use crate::time_utils::format_utc_rfc3339;

/// DOM ids of the chart regions, in render order.
pub const CHART_IDS: [&str; 5] = [
    "distance-line-graph",
    "time-bar-chart",
    "locations-heatmap",
    "elevation-bar-chart",
    "heart-rate-pie-chart",
];

/// The five rendered charts.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub distance: Figure,
    pub time: Figure,
    pub map: Figure,
    pub elevation: Figure,
    pub heart_rate: Figure,
    /// Set when the dataset could not be charted at all.
    pub degraded: bool,
    pub generated_at: String,
}

impl Dashboard {
    /// All-placeholder dashboard, one placeholder per chart.
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        Self {
            distance: charts::placeholder("No Distance Data Available", MONTHLY_CHART_HEIGHT),
            time: charts::placeholder("No Time Data Available", MONTHLY_CHART_HEIGHT),
            map: charts::placeholder("No Location Data Available", MAP_CHART_HEIGHT),
            elevation: charts::placeholder("No Elevation Data Available", MONTHLY_CHART_HEIGHT),
            heart_rate: charts::placeholder("No Heart Rate Data Available", MONTHLY_CHART_HEIGHT),
            degraded: true,
            generated_at: format_utc_rfc3339(now),
        }
    }

    /// Figures paired with their DOM ids.
    pub fn charts(&self) -> [(&'static str, &Figure); 5] {
        [
            (CHART_IDS[0], &self.distance),
            (CHART_IDS[1], &self.time),
            (CHART_IDS[2], &self.map),
            (CHART_IDS[3], &self.elevation),
            (CHART_IDS[4], &self.heart_rate),
        ]
    }
}

/// Build charts from aggregated data.
pub fn render(ytd: &YearToDate, now: DateTime<Utc>) -> Dashboard {
    let zones = HeartRateZoneCounts::from_activities(&ytd.activities);
    Dashboard {
        distance: charts::distance_chart(ytd),
        time: charts::time_chart(ytd),
        map: charts::map_chart(&ytd.geo_points),
        elevation: charts::elevation_chart(ytd),
        heart_rate: charts::heart_rate_chart(zones.as_ref()),
        degraded: false,
        generated_at: format_utc_rfc3339(now),
    }
}

/// Run the whole pipeline. Never fails: malformed data degrades to placeholders.
pub fn build_dashboard(activities: &[Activity], current_year: i32, now: DateTime<Utc>) -> Dashboard {
    match aggregate(activities, current_year) {
        Ok(ytd) => render(&ytd, now),
        Err(e) => {
            tracing::warn!(error = %e, "Rendering placeholder charts");
            Dashboard::placeholder(now)
        }
    }
}

fn current_year() -> i32 {
    Local::now().year()
}

/// Activity snapshot plus when it was taken.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub activities: Arc<Vec<Activity>>,
    pub fetched_at: DateTime<Utc>,
}

/// Holds the current snapshot and dashboard and drives refreshes.
pub struct DashboardService {
    client: Option<StravaClient>,
    refetch_on_tick: bool,
    snapshot: RwLock<Snapshot>,
    dashboard: RwLock<Arc<Dashboard>>,
    refreshes: AtomicU64,
}

impl DashboardService {
    /// Fetch the startup snapshot and build the first dashboard.
    ///
    /// Any configuration, authentication or fetch failure is returned to the
    /// caller; startup does not proceed without data.
    pub async fn start(config: &Config) -> Result<Self, AppError> {
        let client = StravaClient::new(config)?;
        let activities = client.fetch_activities().await?;
        Ok(Self::with_snapshot(
            Some(client),
            config.refetch_on_tick,
            activities,
        ))
    }

    /// Build a service around an existing snapshot.
    pub fn with_snapshot(
        client: Option<StravaClient>,
        refetch_on_tick: bool,
        activities: Vec<Activity>,
    ) -> Self {
        let now = Utc::now();
        let dashboard = build_dashboard(&activities, current_year(), now);
        Self {
            client,
            refetch_on_tick,
            snapshot: RwLock::new(Snapshot {
                activities: Arc::new(activities),
                fetched_at: now,
            }),
            dashboard: RwLock::new(Arc::new(dashboard)),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Current dashboard.
    pub async fn dashboard(&self) -> Arc<Dashboard> {
        self.dashboard.read().await.clone()
    }

    /// Current activity snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Number of refresh ticks completed since startup.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    /// One refresh: optionally re-fetch, then rebuild the charts.
    pub async fn tick(&self) -> Arc<Dashboard> {
        if self.refetch_on_tick {
            if let Some(client) = &self.client {
                match client.fetch_activities().await {
                    Ok(activities) => {
                        *self.snapshot.write().await = Snapshot {
                            activities: Arc::new(activities),
                            fetched_at: Utc::now(),
                        };
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Re-fetch failed, keeping previous snapshot");
                    }
                }
            }
        }

        let snapshot = self.snapshot().await;
        let dashboard = Arc::new(build_dashboard(
            &snapshot.activities,
            current_year(),
            Utc::now(),
        ));
        *self.dashboard.write().await = dashboard.clone();
        let refreshes = self.refreshes.fetch_add(1, Ordering::Relaxed) + 1;

        tracing::info!(
            refreshes,
            activities = snapshot.activities.len(),
            degraded = dashboard.degraded,
            "Dashboard refreshed"
        );
        dashboard
    }

    /// Spawn the refresh timer.
    ///
    /// A single task awaits each tick to completion before waiting for the
    /// next, so refreshes never overlap. Missed ticks are skipped.
    pub fn spawn_refresh_loop(
        self: Arc<Self>,
        period: std::time::Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the startup build covers it.
            timer.tick().await;
            loop {
                timer.tick().await;
                self.tick().await;
            }
        })
    }
}
