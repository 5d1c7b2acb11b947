//! Summary statistics over a decoded activity
//!
//! Every function here is a plain reduction over the document tree. Averages
//! are not guarded against empty input: an activity without trackpoints
//! yields NaN, the same value floating-point division produces for `0 / 0`.

use std::fmt;

use chrono::{DateTime, Duration, Local};

use crate::models::{Activity, Trackpoint};

/// Meters to miles, rounded to the precision used throughout tcxrs
pub const METERS_TO_MILES: f64 = 0.00062137;

impl Activity {
    /// All trackpoints of all laps, in document order
    pub fn trackpoints(&self) -> impl Iterator<Item = &Trackpoint> + '_ {
        self.laps.iter().flat_map(|lap| lap.track.iter())
    }

    /// Start of the activity in the local time zone of this process
    pub fn start_time(&self) -> DateTime<Local> {
        self.id.with_timezone(&Local)
    }

    /// Sum of the elapsed time of every lap
    ///
    /// Each lap counts in whole seconds; the fractional part of a lap's
    /// `TotalTimeSeconds` is truncated before summing.
    pub fn total_duration(&self) -> Duration {
        let seconds: i64 = self
            .laps
            .iter()
            .map(|lap| lap.total_time_seconds as i64)
            .sum();
        Duration::seconds(seconds)
    }

    /// Sum of the distance of every lap, in meters
    pub fn total_distance(&self) -> f64 {
        self.laps.iter().map(|lap| lap.distance_meters).sum()
    }

    pub fn total_distance_in_miles(&self) -> f64 {
        self.total_distance() * METERS_TO_MILES
    }

    /// Mean heart rate over every trackpoint; NaN without trackpoints
    pub fn average_heartbeat(&self) -> f64 {
        let (total, count) = self
            .trackpoints()
            .fold((0i64, 0u64), |(total, count), point| {
                (total + point.heart_rate_bpm, count + 1)
            });
        total as f64 / count as f64
    }

    /// Pace derived from the mean trackpoint speed
    pub fn average_pace(&self) -> Pace {
        let (total, count) = self
            .trackpoints()
            .fold((0.0, 0u64), |(total, count), point| {
                (total + point.speed_meters_per_sec, count + 1)
            });
        Pace::from_speed(total / count as f64)
    }
}

/// Minutes per distance unit, derived from a speed
///
/// Rendered as `minutes:seconds`. Both parts are formatted with zero decimal
/// places, which rounds ties to even; the seconds part is not clamped, so a
/// fraction close to one can render as `60`. An infinite pace (zero speed)
/// renders its minutes as `+Inf` or `-Inf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pace(f64);

impl Pace {
    /// Pace for a speed in meters per second: `50 / (speed * 3)`
    pub fn from_speed(speed_meters_per_sec: f64) -> Self {
        Pace(50.0 / (speed_meters_per_sec * 3.0))
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            whole(self.0.trunc()),
            whole(self.0.fract() * 60.0)
        )
    }
}

fn whole(value: f64) -> String {
    if value.is_infinite() {
        let sign = if value.is_sign_positive() { '+' } else { '-' };
        format!("{}Inf", sign)
    } else {
        format!("{:.0}", value)
    }
}
