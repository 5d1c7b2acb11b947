use chrono::{DateTime, Utc};

/// Root of a Training Center XML document
///
/// Every field maps to a named element or attribute of the TCX schema. Paths
/// that are absent from the input leave the field at its default value, so a
/// renamed or misplaced element shows up as a zero rather than an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingCenterDatabase {
    /// `xmlns` attribute
    pub xmlns: String,

    /// `xmlns:xsi` attribute
    pub xsi: String,

    /// `xmlns:xsd` attribute
    pub xsd: String,

    /// `xsi:schemaLocation` attribute
    pub schema_location: String,

    /// `Activities>Activity`, in document order
    pub activities: Vec<Activity>,
}

impl TrainingCenterDatabase {
    /// Create an empty, unpopulated document
    pub fn new() -> Self {
        Self::default()
    }
}

/// One recorded exercise session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activity {
    /// `Sport` attribute (Running, Biking, Other, ...)
    pub sport: String,

    /// `Id` element; TCX identifies activities by their start timestamp
    pub id: DateTime<Utc>,

    /// `Creator` element
    pub creator: Creator,

    /// `Lap` elements, in document order
    pub laps: Vec<Lap>,
}

/// Device that recorded the activity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Creator {
    /// `Name`
    pub name: String,

    /// `UnitId`
    pub unit_id: i64,

    /// `ProductID`
    pub product_id: i64,
}

/// A contiguous segment of an activity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lap {
    /// `StartTime` attribute
    pub start_time: DateTime<Utc>,

    /// `TotalTimeSeconds`, elapsed time in seconds
    pub total_time_seconds: f64,

    /// `DistanceMeters`
    pub distance_meters: f64,

    /// `MaximumSpeed` in meters per second
    pub maximum_speed: f64,

    /// `Calories`
    pub calories: f64,

    /// `Intensity` (Active, Resting)
    pub intensity: String,

    /// `TriggerMethod` (Manual, Distance, Location, Time, HeartRate)
    pub trigger_method: String,

    /// `Track>Trackpoint`, gathered across every `Track` of the lap
    pub track: Vec<Trackpoint>,
}

/// A single timestamped sample within a lap
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trackpoint {
    /// `Time`
    pub time: DateTime<Utc>,

    /// `LatitudeDegrees`, a direct child of the trackpoint. Exports that nest
    /// it under `Position` leave this at zero.
    pub latitude_degrees: f64,

    /// `LongitudeDegrees`, read the same way as the latitude
    pub longitude_degrees: f64,

    /// `AltitudeMeters`
    pub altitude_meters: f64,

    /// `HeartRateBpm>Value`
    pub heart_rate_bpm: i64,

    /// `Cadence`
    pub cadence: i64,

    /// `Extensions>TPX>Speed` in meters per second
    pub speed_meters_per_sec: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_empty() {
        let tcx = TrainingCenterDatabase::new();
        assert!(tcx.activities.is_empty());
        assert!(tcx.xmlns.is_empty());
        assert_eq!(tcx, TrainingCenterDatabase::default());
    }

    #[test]
    fn test_default_timestamps_are_unix_epoch() {
        let point = Trackpoint::default();
        assert_eq!(point.time.timestamp(), 0);
        assert_eq!(point.heart_rate_bpm, 0);
    }
}
