//! Circadian model
//!
//! Pure functions computing timezone delta, travel direction, arrival-time
//! optimality, and estimated recovery days for one flight. Timezone offsets
//! prefer the enrichment layer's resolved UTC offset and fall back to a
//! longitude estimate (15° per hour) when only coordinates are known.

use chrono::{DateTime, Duration, Timelike, Utc};
use jetrank_common::params;
use jetrank_common::types::{AirportInfo, CircadianAssessment, TravelDirection};

/// Normalize a longitude difference into (-180, 180] degrees
fn normalize_lon_delta(delta: f64) -> f64 {
    let mut d = delta % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Normalize an hour shift into (-12, 12]
fn normalize_shift(shift: f64) -> f64 {
    let mut s = shift % 24.0;
    if s > 12.0 {
        s -= 24.0;
    } else if s <= -12.0 {
        s += 24.0;
    }
    s
}

/// UTC offset for an airport, in hours.
///
/// Returns `None` when the airport has neither a resolved offset nor
/// coordinates to estimate one from.
fn utc_offset(info: &AirportInfo) -> Option<f64> {
    if let Some(offset) = info.utc_offset_hours {
        return Some(offset);
    }
    // Solar estimate: 15 degrees of longitude per hour
    info.coords.map(|c| (normalize_lon_delta(c.lon) / 15.0).round())
}

/// Arrival-time optimality (1-10) for a local arrival hour.
///
/// Morning arrivals (06:00-09:00) score highest: daylight exposure and a full
/// day awake anchor the body clock. Late-night arrivals score lowest.
pub fn arrival_optimality(local_hour: u8) -> f64 {
    for (start, end, score) in params::ARRIVAL_OPTIMALITY_BUCKETS {
        if local_hour >= start && local_hour < end {
            return score;
        }
    }
    params::ARRIVAL_OPTIMALITY_FLOOR
}

/// Estimated recovery days for a shift of `timezones_crossed` hours in the
/// given direction.
///
/// Asymmetric by direction: eastbound advances the body clock (1.0 day/zone),
/// every other direction delays it (2/3 day/zone). Shifts under 2h cost
/// nothing; the result is capped at 1.5x the zone delta.
pub fn recovery_days(timezones_crossed: f64, direction: TravelDirection) -> f64 {
    if direction == TravelDirection::None {
        return 0.0;
    }
    if timezones_crossed < params::MIN_SHIFT_FOR_RECOVERY_HOURS {
        return 0.0;
    }
    let rate = match direction {
        TravelDirection::Eastbound => params::EASTBOUND_RECOVERY_DAYS_PER_ZONE,
        _ => params::WESTBOUND_RECOVERY_DAYS_PER_ZONE,
    };
    (timezones_crossed * rate).min(timezones_crossed * params::RECOVERY_CAP_FACTOR)
}

/// Local arrival hour (0-23) given the arrival instant and a UTC offset
fn local_arrival_hour(arrival: DateTime<Utc>, offset_hours: f64) -> u8 {
    // Fractional offsets (e.g. +5.5) shift by whole minutes
    let shifted = arrival + Duration::minutes((offset_hours * 60.0).round() as i64);
    shifted.hour() as u8
}

/// Assess the circadian impact of one flight.
///
/// `origin`/`dest` are the resolved endpoints of the whole itinerary and
/// `arrival` its last-arrival instant. When neither endpoint can provide an
/// offset the assessment is returned degraded with neutral values; the caller
/// (holistic scorer) converts that into a fallback score rather than failing.
pub fn assess(
    origin: &AirportInfo,
    dest: &AirportInfo,
    arrival: DateTime<Utc>,
) -> CircadianAssessment {
    let (origin_offset, dest_offset) = match (utc_offset(origin), utc_offset(dest)) {
        (Some(o), Some(d)) => (o, d),
        _ => {
            return CircadianAssessment {
                timezones_crossed: 0.0,
                direction: TravelDirection::None,
                arrival_optimality: params::NEUTRAL_MIDPOINT,
                estimated_recovery_days: 0.0,
                degraded: true,
            };
        }
    };

    let shift = normalize_shift(dest_offset - origin_offset);
    let timezones_crossed = shift.abs();

    let direction = resolve_direction(origin, dest, shift);
    let estimated_recovery_days = recovery_days(timezones_crossed, direction);

    let local_hour = local_arrival_hour(arrival, dest_offset);
    CircadianAssessment {
        timezones_crossed,
        direction,
        arrival_optimality: arrival_optimality(local_hour),
        estimated_recovery_days,
        degraded: false,
    }
}

/// Direction by the larger of |Δlon| vs |Δlat|, with the same-timezone case
/// forced to `None` (and, downstream, zero recovery).
fn resolve_direction(origin: &AirportInfo, dest: &AirportInfo, shift: f64) -> TravelDirection {
    if shift.abs() < f64::EPSILON {
        return TravelDirection::None;
    }
    match (origin.coords, dest.coords) {
        (Some(o), Some(d)) => {
            let lon_delta = normalize_lon_delta(d.lon - o.lon);
            let lat_delta = d.lat - o.lat;
            if lon_delta.abs() >= lat_delta.abs() {
                if lon_delta > 0.0 {
                    TravelDirection::Eastbound
                } else {
                    TravelDirection::Westbound
                }
            } else if lat_delta > 0.0 {
                TravelDirection::Northbound
            } else {
                TravelDirection::Southbound
            }
        }
        // Offsets known but no coordinates: the shift sign still tells
        // east from west
        _ => {
            if shift > 0.0 {
                TravelDirection::Eastbound
            } else {
                TravelDirection::Westbound
            }
        }
    }
}
