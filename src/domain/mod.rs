/// Domain models for the application
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Deep-sky catalog entry. Coordinates are J2000 degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialObject {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, rename = "const", alias = "constellation")]
    pub constellation: Option<String>,
    #[serde(rename = "mag")]
    pub magnitude: f64,
    /// Angular size in arcminutes
    #[serde(default, rename = "size")]
    pub size_arcmin: Option<f64>,
    pub ra: f64,
    pub dec: f64,
}

/// Where and when the sky is being looked at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObserverContext {
    pub latitude: f64,
    /// East-positive
    pub longitude: f64,
    /// Metres. Carried for the caller, not used by the transforms.
    pub elevation: f64,
    pub timestamp: DateTime<Utc>,
    /// 1 = darkest, 9 = inner city
    pub bortle: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalPosition {
    pub altitude: f64,
    /// Clockwise from north, [0, 360)
    pub azimuth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialPosition {
    pub ra: f64,
    pub dec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarState {
    /// 0 = new moon, 180 = full moon
    pub phase_angle: f64,
    /// Rounded percent
    pub illumination: u8,
    /// Unrounded 0..1, what the scorer uses
    pub illumination_fraction: f64,
    pub equatorial: Option<EquatorialPosition>,
    pub horizontal: Option<HorizontalPosition>,
    pub is_up: bool,
}

/// Camera/telescope combination, millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub focal_length: f64,
    pub sensor_width: f64,
    pub sensor_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FovMatch {
    Fits,
    TooLarge,
}

impl FovMatch {
    pub fn label(&self) -> &'static str {
        match self {
            FovMatch::Fits => "Fits in FOV",
            FovMatch::TooLarge => "Too Large",
        }
    }
}

impl Serialize for FovMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Next horizon crossings and meridian transit after the observation time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiseSet {
    Circumpolar {
        transit: DateTime<Utc>,
    },
    NeverRises,
    Events {
        rise: DateTime<Utc>,
        transit: DateTime<Utc>,
        set: DateTime<Utc>,
    },
    /// Event times fall outside the representable calendar
    Unavailable,
}

/// Catalog entry with everything derived for one observation.
/// Borrows the entry; the catalog itself is never touched.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredObject<'a> {
    #[serde(flatten)]
    pub object: &'a CelestialObject,
    #[serde(flatten)]
    pub position: HorizontalPosition,
    pub score: f64,
    #[serde(serialize_with = "airmass_or_dash")]
    pub airmass: Option<f64>,
    pub moon_separation: Option<f64>,
    pub fov_match: Option<FovMatch>,
    pub events: RiseSet,
}

pub(crate) fn airmass_or_dash<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(x) => serializer.serialize_f64(*x),
        None => serializer.serialize_str("-"),
    }
}

/// Current conditions from the weather feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Percent
    pub cloud_cover: Option<f64>,
    /// Metres
    pub visibility: Option<f64>,
    pub dew_point: Option<f64>,
    pub temperature: Option<f64>,
    pub transparency: Transparency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transparency {
    Excellent,
    Average,
    Poor,
}

impl Transparency {
    pub fn from_visibility(visibility_m: f64) -> Self {
        if visibility_m > 20_000.0 {
            Transparency::Excellent
        } else if visibility_m > 10_000.0 {
            Transparency::Average
        } else {
            Transparency::Poor
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
