// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model as returned by the athlete activities endpoint.

use chrono::{DateTime, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Summary activity from `GET /athlete/activities`.
///
/// The fields the dashboard cannot do without are still optional here so
/// that an incomplete dataset can be detected and degraded, rather than
/// failing the whole page decode. A field of the wrong JSON type decodes as
/// absent; numbers given as strings are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub sport_type: Option<String>,
    /// Start time in the athlete's time zone (ISO 8601)
    #[serde(default, deserialize_with = "lenient")]
    pub start_date_local: Option<String>,
    /// Distance in meters
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    /// Moving time in seconds, truncated if sent as a float
    #[serde(default, deserialize_with = "lenient_secs")]
    pub moving_time: Option<i64>,
    /// Elevation gain in meters
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_elevation_gain: Option<f64>,
    /// Average heart rate in bpm (only present for HR-equipped recordings)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_heartrate: Option<f64>,
    /// `[lat, lng]`, or `[]` when the activity has no GPS track
    #[serde(default)]
    pub start_latlng: Option<serde_json::Value>,
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl Activity {
    /// Names of required fields this activity lacks.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.start_date_local.is_none() {
            missing.push("start_date_local");
        }
        if self.distance.is_none() {
            missing.push("distance");
        }
        if self.moving_time.is_none() {
            missing.push("moving_time");
        }
        missing
    }

    /// Parse `start_date_local`.
    ///
    /// Strava suffixes local times with `Z` even though they carry no zone,
    /// so any offset is discarded and the wall-clock time kept.
    pub fn start_local(&self) -> Option<NaiveDateTime> {
        parse_local_timestamp(self.start_date_local.as_deref()?)
    }

    /// Start coordinate, if `start_latlng` is a well-formed two-number pair.
    pub fn geo_point(&self) -> Option<GeoPoint> {
        let pair = self.start_latlng.as_ref()?.as_array()?;
        if pair.len() != 2 {
            return None;
        }
        let lat = pair[0].as_f64()?;
        let lng = pair[1].as_f64()?;
        (lat.is_finite() && lng.is_finite()).then_some(GeoPoint { lat, lng })
    }

    /// Average heart rate, treating NaN as absent.
    pub fn heart_rate(&self) -> Option<f64> {
        self.average_heartrate.filter(|hr| !hr.is_nan())
    }

    /// Pace in seconds per kilometer.
    pub fn pace_secs_per_km(&self) -> Option<f64> {
        let distance = self.distance?;
        let moving_time = self.moving_time?;
        (distance > 0.0).then(|| moving_time as f64 / (distance / 1000.0))
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

fn lenient_secs<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(secs) = value.as_i64() {
        return Ok(Some(secs));
    }
    Ok(number(&value)
        .filter(|secs| secs.is_finite())
        .map(|secs| secs.trunc() as i64))
}

fn parse_local_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
