//! Year-to-date monthly aggregates for the dashboard charts.
//!
//! Rebuilt from the full activity snapshot on every refresh; nothing here is
//! carried between refreshes.

use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::AppError;
use crate::models::{Activity, GeoPoint};

/// Calendar month key. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Chart axis label, `MM-YY`.
    pub fn label(&self) -> String {
        format!("{:02}-{:02}", self.month, self.year.rem_euclid(100))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Running sums for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub activities: u32,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub moving_time: i64,
    /// Meters
    pub elevation_gain: f64,
    /// Fastest single-activity pace, seconds per kilometer
    pub fastest_pace: Option<f64>,
}

impl MonthlyTotals {
    fn add(&mut self, activity: &Activity) {
        self.activities += 1;
        self.distance += activity.distance.unwrap_or_default();
        self.moving_time += activity.moving_time.unwrap_or_default();
        self.elevation_gain += activity.total_elevation_gain.unwrap_or_default();
        if let Some(pace) = activity.pace_secs_per_km() {
            self.fastest_pace = Some(self.fastest_pace.map_or(pace, |best| best.min(pace)));
        }
    }

    /// Average pace over the month in seconds per kilometer.
    pub fn pace_secs_per_km(&self) -> Option<f64> {
        (self.distance > 0.0).then(|| self.moving_time as f64 / (self.distance / 1000.0))
    }
}

/// Aggregated view of the current calendar year.
#[derive(Debug, Clone, Default)]
pub struct YearToDate {
    pub year: i32,
    /// Per-month sums, ascending by month.
    pub months: BTreeMap<MonthKey, MonthlyTotals>,
    /// Start coordinates in original activity order.
    pub geo_points: Vec<GeoPoint>,
    /// Activities that survived the year filter.
    pub activities: Vec<Activity>,
}

impl YearToDate {
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.months.keys().map(MonthKey::label).collect()
    }

    pub fn distances(&self) -> Vec<f64> {
        self.months.values().map(|m| m.distance).collect()
    }

    pub fn moving_times(&self) -> Vec<i64> {
        self.months.values().map(|m| m.moving_time).collect()
    }

    pub fn elevation_gains(&self) -> Vec<f64> {
        self.months.values().map(|m| m.elevation_gain).collect()
    }
}

/// Reject a dataset in which any activity lacks a required field.
pub fn validate_shape(activities: &[Activity]) -> Result<(), AppError> {
    for (index, activity) in activities.iter().enumerate() {
        let missing = activity.missing_required_fields();
        if !missing.is_empty() {
            return Err(AppError::DataShape(format!(
                "activity #{} ({}) lacks {}",
                index,
                activity
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "no id".to_string()),
                missing.join(", ")
            )));
        }
    }
    Ok(())
}

/// Group `activities` from `current_year` by month.
pub fn aggregate(activities: &[Activity], current_year: i32) -> Result<YearToDate, AppError> {
    validate_shape(activities)?;

    let mut ytd = YearToDate {
        year: current_year,
        ..Default::default()
    };

    for activity in activities {
        let start = activity.start_local().ok_or_else(|| {
            AppError::DataShape(format!(
                "unparseable start_date_local {:?}",
                activity.start_date_local
            ))
        })?;
        if start.year() != current_year {
            continue;
        }

        let key = MonthKey {
            year: start.year(),
            month: start.month(),
        };
        ytd.months.entry(key).or_default().add(activity);

        if let Some(point) = activity.geo_point() {
            ytd.geo_points.push(point);
        }
        ytd.activities.push(activity.clone());
    }

    Ok(ytd)
}
