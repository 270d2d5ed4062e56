// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chart builders.
//!
//! Each builder is a pure function from aggregated data to a Plotly-style
//! figure description (`{ data, layout }`) that the dashboard page hands
//! directly to the browser renderer. Builders never look at each other's
//! output and each one produces its own "no data" placeholder.

use geo::{BoundingRect, Centroid, MultiPoint, Point};
use serde::Serialize;

use crate::models::{GeoPoint, HeartRateZone, HeartRateZoneCounts, YearToDate};

pub const MONTHLY_CHART_HEIGHT: u32 = 300;
pub const MAP_CHART_HEIGHT: u32 = 500;
const DISTANCE_COLOR: &str = "rgb(0, 204, 150)";
const BAR_COLOR: &str = "rgb(255, 99, 71)";
const MAP_STYLE: &str = "carto-positron";

/// Map view used when there is nothing to center on.
const DEFAULT_MAP_CENTER: MapCenter = MapCenter { lat: 54.5, lon: -3.5 };
const DEFAULT_MAP_ZOOM: f64 = 5.0;
const MAX_MAP_ZOOM: f64 = 12.0;

/// Renderable chart description.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    /// True when this is a "no data" stand-in.
    pub placeholder: bool,
}

/// One data series.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter {
        x: Vec<String>,
        y: Vec<f64>,
        mode: &'static str,
        marker: Marker,
    },
    Bar {
        x: Vec<String>,
        y: Vec<f64>,
        marker: Marker,
    },
    #[serde(rename = "scattermapbox")]
    ScatterMapbox {
        lat: Vec<f64>,
        lon: Vec<f64>,
        mode: &'static str,
    },
    Pie {
        labels: Vec<&'static str>,
        values: Vec<u32>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Marker {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layout {
    pub title: Title,
    pub height: u32,
    pub margin: Margin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Mapbox>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

const MARGIN: Margin = Margin {
    l: 20,
    r: 20,
    t: 50,
    b: 20,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Mapbox {
    pub style: &'static str,
    pub center: MapCenter,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

fn layout(title: &str, height: u32) -> Layout {
    Layout {
        title: Title {
            text: title.to_string(),
        },
        height,
        margin: MARGIN,
        xaxis: None,
        yaxis: None,
        mapbox: None,
    }
}

fn axes(mut layout: Layout, x: &str, y: &str) -> Layout {
    layout.xaxis = Some(Axis {
        title: Title { text: x.to_string() },
    });
    layout.yaxis = Some(Axis {
        title: Title { text: y.to_string() },
    });
    layout
}

/// Empty figure carrying only a "no data" title.
pub fn placeholder(title: &str, height: u32) -> Figure {
    Figure {
        data: Vec::new(),
        layout: layout(title, height),
        placeholder: true,
    }
}

/// Line chart of total distance per month.
pub fn distance_chart(ytd: &YearToDate) -> Figure {
    if ytd.months.is_empty() {
        return placeholder("No Distance Data Available", MONTHLY_CHART_HEIGHT);
    }
    Figure {
        data: vec![Trace::Scatter {
            x: ytd.labels(),
            y: ytd.distances(),
            mode: "lines+markers",
            marker: Marker {
                color: DISTANCE_COLOR,
            },
        }],
        layout: axes(
            layout("YTD Total Distance by Month", MONTHLY_CHART_HEIGHT),
            "Month",
            "Total Distance (m)",
        ),
        placeholder: false,
    }
}

/// Bar chart of total moving time per month.
pub fn time_chart(ytd: &YearToDate) -> Figure {
    if ytd.months.is_empty() {
        return placeholder("No Time Data Available", MONTHLY_CHART_HEIGHT);
    }
    Figure {
        data: vec![Trace::Bar {
            x: ytd.labels(),
            y: ytd.moving_times().into_iter().map(|s| s as f64).collect(),
            marker: Marker { color: BAR_COLOR },
        }],
        layout: axes(
            layout("YTD Total Time by Month", MONTHLY_CHART_HEIGHT),
            "Month",
            "Total Time (s)",
        ),
        placeholder: false,
    }
}

/// Bar chart of total elevation gain per month.
pub fn elevation_chart(ytd: &YearToDate) -> Figure {
    if ytd.months.is_empty() {
        return placeholder("No Elevation Data Available", MONTHLY_CHART_HEIGHT);
    }
    Figure {
        data: vec![Trace::Bar {
            x: ytd.labels(),
            y: ytd.elevation_gains(),
            marker: Marker { color: BAR_COLOR },
        }],
        layout: axes(
            layout("YTD Total Elevation Gain by Month", MONTHLY_CHART_HEIGHT),
            "Month",
            "Elevation Gain (m)",
        ),
        placeholder: false,
    }
}

/// Scatter map of activity start points.
pub fn map_chart(points: &[GeoPoint]) -> Figure {
    if points.is_empty() {
        return placeholder("No Location Data Available", MAP_CHART_HEIGHT);
    }

    let (center, zoom) = map_view(points);
    let mut layout = layout("Running Locations Map (YTD)", MAP_CHART_HEIGHT);
    layout.mapbox = Some(Mapbox {
        style: MAP_STYLE,
        center,
        zoom,
    });

    Figure {
        data: vec![Trace::ScatterMapbox {
            lat: points.iter().map(|p| p.lat).collect(),
            lon: points.iter().map(|p| p.lng).collect(),
            mode: "markers",
        }],
        layout,
        placeholder: false,
    }
}

/// Center on the centroid of the points, zoomed to fit their extent.
fn map_view(points: &[GeoPoint]) -> (MapCenter, f64) {
    let multi: MultiPoint<f64> = points.iter().map(|p| Point::new(p.lng, p.lat)).collect();

    let center = multi
        .centroid()
        .map(|c| MapCenter {
            lat: c.y(),
            lon: c.x(),
        })
        .unwrap_or(DEFAULT_MAP_CENTER);

    let zoom = multi
        .bounding_rect()
        .map(|rect| {
            let span = rect.width().max(rect.height());
            if span <= f64::EPSILON {
                MAX_MAP_ZOOM
            } else {
                (360.0 / span).log2().floor().clamp(1.0, MAX_MAP_ZOOM)
            }
        })
        .unwrap_or(DEFAULT_MAP_ZOOM);

    (center, zoom)
}

/// Pie chart of activities per heart-rate zone.
pub fn heart_rate_chart(zones: Option<&HeartRateZoneCounts>) -> Figure {
    let Some(zones) = zones else {
        return placeholder("No Heart Rate Data Available", MONTHLY_CHART_HEIGHT);
    };
    Figure {
        data: vec![Trace::Pie {
            labels: HeartRateZone::ALL.iter().map(|z| z.label()).collect(),
            values: HeartRateZone::ALL.iter().map(|&z| zones.get(z)).collect(),
        }],
        layout: layout("Heart Rate Zones Distribution", MONTHLY_CHART_HEIGHT),
        placeholder: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{aggregate, Activity};

    fn ytd_with(dates: &[(&str, f64)]) -> YearToDate {
        let activities: Vec<Activity> = dates
            .iter()
            .map(|(date, distance)| Activity {
                start_date_local: Some(date.to_string()),
                distance: Some(*distance),
                moving_time: Some(600),
                total_elevation_gain: Some(12.0),
                ..Default::default()
            })
            .collect();
        aggregate(&activities, 2026).unwrap()
    }

    #[test]
    fn test_distance_chart_series() {
        let ytd = ytd_with(&[("2026-02-01T07:00:00Z", 5000.0), ("2026-01-01T07:00:00Z", 3000.0)]);
        let fig = distance_chart(&ytd);

        assert!(!fig.placeholder);
        match &fig.data[0] {
            Trace::Scatter { x, y, mode, .. } => {
                assert_eq!(x, &vec!["01-26".to_string(), "02-26".to_string()]);
                assert_eq!(y, &vec![3000.0, 5000.0]);
                assert_eq!(*mode, "lines+markers");
            }
            other => panic!("unexpected trace {other:?}"),
        }
        assert_eq!(fig.layout.title.text, "YTD Total Distance by Month");
    }

    #[test]
    fn test_monthly_charts_placeholder_when_empty() {
        let ytd = YearToDate::default();
        for fig in [distance_chart(&ytd), time_chart(&ytd), elevation_chart(&ytd)] {
            assert!(fig.placeholder);
            assert!(fig.data.is_empty());
            assert!(fig.layout.title.text.starts_with("No "));
        }
    }

    #[test]
    fn test_time_and_elevation_are_bars() {
        let ytd = ytd_with(&[("2026-03-01T07:00:00Z", 1000.0)]);
        assert!(matches!(time_chart(&ytd).data[0], Trace::Bar { ref y, .. } if y == &vec![600.0]));
        assert!(
            matches!(elevation_chart(&ytd).data[0], Trace::Bar { ref y, .. } if y == &vec![12.0])
        );
    }

    #[test]
    fn test_map_chart_placeholder() {
        let fig = map_chart(&[]);
        assert!(fig.placeholder);
        assert_eq!(fig.layout.title.text, "No Location Data Available");
        assert_eq!(fig.layout.height, MAP_CHART_HEIGHT);
    }

    #[test]
    fn test_map_chart_centers_on_points() {
        let points = [
            GeoPoint { lat: 50.0, lng: -2.0 },
            GeoPoint { lat: 52.0, lng: 0.0 },
        ];
        let fig = map_chart(&points);
        let mapbox = fig.layout.mapbox.unwrap();

        assert!((mapbox.center.lat - 51.0).abs() < 1e-9);
        assert!((mapbox.center.lon + 1.0).abs() < 1e-9);
        assert_eq!(mapbox.zoom, 7.0);
        assert_eq!(mapbox.style, "carto-positron");
    }

    #[test]
    fn test_map_single_point_max_zoom() {
        let fig = map_chart(&[GeoPoint { lat: 51.5, lng: -0.1 }]);
        assert_eq!(fig.layout.mapbox.unwrap().zoom, MAX_MAP_ZOOM);
    }

    #[test]
    fn test_heart_rate_chart() {
        let counts = HeartRateZoneCounts {
            counts: [1, 2, 3, 4, 5],
        };
        let fig = heart_rate_chart(Some(&counts));
        match &fig.data[0] {
            Trace::Pie { labels, values } => {
                assert_eq!(labels.len(), 5);
                assert_eq!(labels[0], "Zone 1");
                assert_eq!(values, &vec![1, 2, 3, 4, 5]);
            }
            other => panic!("unexpected trace {other:?}"),
        }

        let empty = heart_rate_chart(None);
        assert!(empty.placeholder);
        assert_eq!(empty.layout.title.text, "No Heart Rate Data Available");
    }

    #[test]
    fn test_trace_serializes_with_plotly_type() {
        let fig = map_chart(&[GeoPoint { lat: 1.0, lng: 2.0 }]);
        let json = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["data"][0]["type"], "scattermapbox");
        assert_eq!(json["data"][0]["lon"][0], 2.0);
        assert!(json["layout"].get("xaxis").is_none());
    }
}
