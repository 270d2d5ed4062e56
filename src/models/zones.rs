// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Heart-rate zone classification.

use serde::Serialize;

use crate::models::Activity;

/// Lower bounds (bpm) of zones 2 through 5.
const ZONE_BOUNDARIES: [f64; 4] = [130.0, 150.0, 165.0, 180.0];

/// One of five fixed average-heart-rate bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HeartRateZone {
    Zone1,
    Zone2,
    Zone3,
    Zone4,
    Zone5,
}

impl HeartRateZone {
    pub const ALL: [HeartRateZone; 5] = [
        HeartRateZone::Zone1,
        HeartRateZone::Zone2,
        HeartRateZone::Zone3,
        HeartRateZone::Zone4,
        HeartRateZone::Zone5,
    ];

    /// Classify an average heart rate. Intervals are closed below, open above.
    pub fn classify(bpm: f64) -> Self {
        let index = ZONE_BOUNDARIES
            .iter()
            .take_while(|&&bound| bpm >= bound)
            .count();
        Self::ALL[index]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            HeartRateZone::Zone1 => "Zone 1",
            HeartRateZone::Zone2 => "Zone 2",
            HeartRateZone::Zone3 => "Zone 3",
            HeartRateZone::Zone4 => "Zone 4",
            HeartRateZone::Zone5 => "Zone 5",
        }
    }
}

/// Activity count per heart-rate zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeartRateZoneCounts {
    pub counts: [u32; 5],
}

impl HeartRateZoneCounts {
    /// Histogram of the activities that carry an average heart rate.
    ///
    /// Returns `None` when none of them do.
    pub fn from_activities(activities: &[Activity]) -> Option<Self> {
        let mut histogram = Self::default();
        let mut seen = false;
        for bpm in activities.iter().filter_map(Activity::heart_rate) {
            histogram.counts[HeartRateZone::classify(bpm).index()] += 1;
            seen = true;
        }
        seen.then_some(histogram)
    }

    pub fn get(&self, zone: HeartRateZone) -> u32 {
        self.counts[zone.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}
