use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Activity, TrainingCenterDatabase};

/// Distance units used when rendering summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

/// Computed metrics for one activity
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
    pub sport: String,
    pub id: DateTime<Utc>,
    pub start_time: DateTime<Local>,
    pub duration_seconds: f64,
    pub distance_meters: f64,
    pub distance_miles: f64,
    pub laps: usize,
    pub trackpoints: usize,
    /// NaN when the activity has no trackpoints; serialized as `null`
    pub average_heart_rate: f64,
    pub average_pace: String,
}

impl ActivitySummary {
    pub fn from_activity(activity: &Activity) -> Self {
        let duration = activity.total_duration();

        Self {
            sport: activity.sport.clone(),
            id: activity.id,
            start_time: activity.start_time(),
            duration_seconds: duration.num_seconds() as f64,
            distance_meters: activity.total_distance(),
            distance_miles: activity.total_distance_in_miles(),
            laps: activity.laps.len(),
            trackpoints: activity.trackpoints().count(),
            average_heart_rate: activity.average_heartbeat(),
            average_pace: activity.average_pace().to_string(),
        }
    }
}

/// Summaries for every activity of a document, in document order
pub fn summarize(tcx: &TrainingCenterDatabase) -> Vec<ActivitySummary> {
    tcx.activities.iter().map(ActivitySummary::from_activity).collect()
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Sport")]
    sport: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Laps")]
    laps: usize,
    #[tabled(rename = "Points")]
    trackpoints: usize,
    #[tabled(rename = "Avg HR")]
    heart_rate: String,
    #[tabled(rename = "Avg Pace")]
    pace: String,
}

impl SummaryRow {
    fn new(summary: &ActivitySummary, units: Units) -> Self {
        let distance = match units {
            Units::Metric => format!("{:.1} m", summary.distance_meters),
            Units::Imperial => format!("{:.2} mi", summary.distance_miles),
        };
        let heart_rate = if summary.average_heart_rate.is_nan() {
            "-".to_string()
        } else {
            format!("{:.0} bpm", summary.average_heart_rate)
        };

        Self {
            sport: summary.sport.clone(),
            start: summary.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            duration: format_duration(Duration::seconds(summary.duration_seconds as i64)),
            distance,
            laps: summary.laps,
            trackpoints: summary.trackpoints,
            heart_rate,
            pace: summary.average_pace.clone(),
        }
    }
}

/// Render summaries as a terminal table
pub fn render_table(summaries: &[ActivitySummary], units: Units) -> String {
    let rows: Vec<SummaryRow> = summaries
        .iter()
        .map(|summary| SummaryRow::new(summary, units))
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render summaries as pretty-printed JSON
pub fn render_json(summaries: &[ActivitySummary]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summaries)
}

/// `H:MM:SS`, with a leading `-` for negative durations
pub fn format_duration(duration: Duration) -> String {
    let sign = if duration < Duration::zero() { "-" } else { "" };
    let total = duration.num_seconds().abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lap, Trackpoint};
    use chrono::TimeZone;

    fn sample_activity() -> Activity {
        let point = |hr: i64, speed: f64| Trackpoint {
            heart_rate_bpm: hr,
            speed_meters_per_sec: speed,
            ..Default::default()
        };

        Activity {
            sport: "Running".to_string(),
            id: Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap(),
            laps: vec![
                Lap {
                    total_time_seconds: 1800.0,
                    distance_meters: 5000.0,
                    track: vec![point(140, 2.5), point(150, 3.5)],
                    ..Default::default()
                },
                Lap {
                    total_time_seconds: 62.5,
                    distance_meters: 200.0,
                    track: vec![point(160, 3.0)],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_from_activity() {
        let summary = ActivitySummary::from_activity(&sample_activity());

        assert_eq!(summary.sport, "Running");
        // the half second of the second lap is dropped
        assert_eq!(summary.duration_seconds, 1862.0);
        assert_eq!(summary.distance_meters, 5200.0);
        assert!((summary.distance_miles - 5200.0 * 0.00062137).abs() < 1e-12);
        assert_eq!(summary.laps, 2);
        assert_eq!(summary.trackpoints, 3);
        assert_eq!(summary.average_heart_rate, 150.0);
        assert_eq!(summary.average_pace, "5:33");
    }

    #[test]
    fn test_summarize_keeps_document_order() {
        let mut tcx = TrainingCenterDatabase::new();
        tcx.activities.push(sample_activity());
        tcx.activities.push(Activity {
            sport: "Biking".to_string(),
            ..Default::default()
        });

        let sports: Vec<String> = summarize(&tcx).into_iter().map(|s| s.sport).collect();
        assert_eq!(sports, vec!["Running", "Biking"]);
    }

    #[test]
    fn test_json_renders_nan_as_null() {
        let summaries = vec![ActivitySummary::from_activity(&Activity::default())];
        let json = render_json(&summaries).unwrap();

        assert!(json.contains("\"average_heart_rate\": null"));
        assert!(json.contains("\"average_pace\": \"NaN:NaN\""));
        assert!(json.contains("\"laps\": 0"));
    }

    #[test]
    fn test_table_respects_units() {
        let summaries = vec![ActivitySummary::from_activity(&sample_activity())];

        let metric = render_table(&summaries, Units::Metric);
        assert!(metric.contains("5200.0 m"));
        assert!(metric.contains("150 bpm"));
        assert!(metric.contains("0:31:02"));

        let imperial = render_table(&summaries, Units::Imperial);
        assert!(imperial.contains("3.23 mi"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::zero()), "0:00:00");
        assert_eq!(format_duration(Duration::seconds(3725)), "1:02:05");
        assert_eq!(format_duration(Duration::seconds(-90)), "-0:01:30");
    }
}
