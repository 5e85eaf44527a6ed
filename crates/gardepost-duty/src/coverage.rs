use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use gardepost_core::types::{ApiMode, GeoPoint};

use crate::types::{Duty, DutyShift, DutyWindow};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Rule deciding when a day's duties within radius count as sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoveragePolicy {
    /// At least one DAY and one NIGHT duty per day.
    Boolean,
    /// At least two DAY and two NIGHT duties per day — the stricter
    /// redundancy requirement of threshold-mode data sources.
    Threshold,
}

impl CoveragePolicy {
    fn required_per_shift(self) -> u32 {
        match self {
            CoveragePolicy::Boolean => 1,
            CoveragePolicy::Threshold => 2,
        }
    }
}

impl From<ApiMode> for CoveragePolicy {
    fn from(mode: ApiMode) -> Self {
        match mode {
            ApiMode::Boolean => CoveragePolicy::Boolean,
            ApiMode::Threshold => CoveragePolicy::Threshold,
        }
    }
}

/// Per-day shift tally for the coverage check.
#[derive(Debug, Default, Clone, Copy)]
struct ShiftCounts {
    day: u32,
    night: u32,
}

/// Decide whether `duties` within `radius_km` of `anchor` fully cover every
/// calendar day of `window` under `policy`.
///
/// Days absent from the dataset count zero — there is no carry-over from
/// adjacent days. Duties without a location never count.
pub fn is_covered(
    duties: &[Duty],
    anchor: GeoPoint,
    radius_km: u32,
    window: &DutyWindow,
    policy: CoveragePolicy,
) -> bool {
    let mut counts: HashMap<NaiveDate, ShiftCounts> = window
        .days()
        .into_iter()
        .map(|day| (day, ShiftCounts::default()))
        .collect();

    for duty in duties {
        let Some(location) = duty.location else {
            continue;
        };
        if haversine_km(anchor, location) > radius_km as f64 {
            continue;
        }
        if let Some(entry) = counts.get_mut(&duty.date) {
            match duty.shift {
                DutyShift::Day => entry.day += 1,
                DutyShift::Night => entry.night += 1,
            }
        }
    }

    let required = policy.required_per_shift();
    for (date, tally) in &counts {
        if tally.day < required || tally.night < required {
            debug!(
                %date,
                day = tally.day,
                night = tally.night,
                required,
                "incomplete coverage"
            );
            return false;
        }
    }
    true
}
