use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::{DecodeError, Result, TcxError};
use crate::import::xml::{self, Element};
use crate::models::{Activity, Creator, Lap, TrainingCenterDatabase, Trackpoint};

/// Name of the document element every TCX file starts with
pub const ROOT_ELEMENT: &str = "TrainingCenterDatabase";

/// Parse a TCX document from any reader
pub fn parse<R: Read>(reader: R) -> Result<TrainingCenterDatabase> {
    let mut tcx = TrainingCenterDatabase::new();
    let root = xml::read_document(BufReader::new(reader))?;
    decode_root(&mut tcx, &root)?;

    debug!(activities = tcx.activities.len(), "Decoded TCX document");
    Ok(tcx)
}

/// Open `path` and parse its contents as TCX
///
/// Errors raised while opening the file are returned as they are; only
/// decoding failures carry the parse context.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<TrainingCenterDatabase> {
    let file = File::open(path.as_ref())?;
    parse(file)
}

/// Parse a TCX document held in memory
pub fn parse_str(content: &str) -> Result<TrainingCenterDatabase> {
    parse(content.as_bytes())
}

impl FromStr for TrainingCenterDatabase {
    type Err = TcxError;

    fn from_str(s: &str) -> Result<Self> {
        parse_str(s)
    }
}

/// Conversion from a decoded element into a schema record
trait FromElement: Sized {
    fn from_element(element: &Element) -> std::result::Result<Self, DecodeError>;
}

fn decode_root(tcx: &mut TrainingCenterDatabase, root: &Element) -> std::result::Result<(), DecodeError> {
    if root.name != ROOT_ELEMENT {
        return Err(DecodeError::UnexpectedRoot {
            expected: ROOT_ELEMENT.to_string(),
            found: root.name.clone(),
        });
    }

    tcx.xmlns = attribute_string(root, "xmlns");
    tcx.xsi = attribute_string(root, "xsi");
    tcx.xsd = attribute_string(root, "xsd");
    tcx.schema_location = attribute_string(root, "schemaLocation");
    tcx.activities = records(root, "Activities>Activity")?;
    Ok(())
}

impl FromElement for Activity {
    fn from_element(element: &Element) -> std::result::Result<Self, DecodeError> {
        let activity = Activity {
            sport: attribute_string(element, "Sport"),
            id: value(element, "Id")?,
            creator: match element.select("Creator").last() {
                Some(creator) => Creator::from_element(creator)?,
                None => Creator::default(),
            },
            laps: records(element, "Lap")?,
        };

        trace!(
            sport = %activity.sport,
            id = %activity.id,
            laps = activity.laps.len(),
            "Decoded activity"
        );
        Ok(activity)
    }
}

impl FromElement for Creator {
    fn from_element(element: &Element) -> std::result::Result<Self, DecodeError> {
        Ok(Creator {
            name: string(element, "Name"),
            unit_id: value(element, "UnitId")?,
            product_id: value(element, "ProductID")?,
        })
    }
}

impl FromElement for Lap {
    fn from_element(element: &Element) -> std::result::Result<Self, DecodeError> {
        Ok(Lap {
            start_time: attribute_value(element, "StartTime")?,
            total_time_seconds: value(element, "TotalTimeSeconds")?,
            distance_meters: value(element, "DistanceMeters")?,
            maximum_speed: value(element, "MaximumSpeed")?,
            calories: value(element, "Calories")?,
            intensity: string(element, "Intensity"),
            trigger_method: string(element, "TriggerMethod"),
            track: records(element, "Track>Trackpoint")?,
        })
    }
}

impl FromElement for Trackpoint {
    fn from_element(element: &Element) -> std::result::Result<Self, DecodeError> {
        Ok(Trackpoint {
            time: value(element, "Time")?,
            latitude_degrees: value(element, "LatitudeDegrees")?,
            longitude_degrees: value(element, "LongitudeDegrees")?,
            altitude_meters: value(element, "AltitudeMeters")?,
            heart_rate_bpm: value(element, "HeartRateBpm>Value")?,
            cadence: value(element, "Cadence")?,
            speed_meters_per_sec: value(element, "Extensions>TPX>Speed")?,
        })
    }
}

fn records<T: FromElement>(element: &Element, path: &str) -> std::result::Result<Vec<T>, DecodeError> {
    element.select(path).into_iter().map(T::from_element).collect()
}

/// Text at `path` exactly as written, whitespace included
fn string(element: &Element, path: &str) -> String {
    element.raw_text_at(path).unwrap_or_default().to_string()
}

fn attribute_string(element: &Element, name: &str) -> String {
    element.attribute(name).unwrap_or_default().to_string()
}

/// Typed value at `path`, or the type's default when the path is absent
fn value<T>(element: &Element, path: &str) -> std::result::Result<T, DecodeError>
where
    T: FromStr + Default,
    T::Err: Display,
{
    convert(element.text_at(path), path)
}

fn attribute_value<T>(element: &Element, name: &str) -> std::result::Result<T, DecodeError>
where
    T: FromStr + Default,
    T::Err: Display,
{
    let raw = element.attribute(name).map(str::trim).filter(|raw| !raw.is_empty());
    convert(raw, &format!("@{}", name))
}

fn convert<T>(raw: Option<&str>, path: &str) -> std::result::Result<T, DecodeError>
where
    T: FromStr + Default,
    T::Err: Display,
{
    match raw {
        None => Ok(T::default()),
        Some(raw) => raw.parse().map_err(|err: T::Err| DecodeError::InvalidValue {
            path: path.to_string(),
            value: raw.to_string(),
            reason: err.to_string(),
        }),
    }
}
