/// Business logic services layer
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::astro::{airmass, field_of_view, horizontal_position, hour_angle, local_sidereal_time, lunar_state_at, rise_set};
use crate::catalog::{Catalog, CatalogFilter};
use crate::clients::WeatherClient;
use crate::config::ObserverDefaults;
use crate::domain::{CelestialObject, Equipment, LunarState, ObserverContext, RiseSet, ScoredObject, WeatherReport};
use crate::errors::{ApiError, ApiResult};
use crate::scoring::{rank_objects_under, RankOptions};
use crate::utils::{normalize_degrees, parse_timestamp, round_to};

/// Query for a ranked target list. Everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanRequest {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub time: Option<String>,
    pub bortle: Option<i32>,
    pub focal_length: Option<f64>,
    pub sensor_width: Option<f64>,
    pub sensor_height: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub constellation: Option<String>,
    pub mag_min: Option<f64>,
    pub mag_max: Option<f64>,
    pub min_altitude: Option<f64>,
    pub limit: Option<usize>,
}

impl PlanRequest {
    fn filter(&self) -> CatalogFilter {
        CatalogFilter {
            kind: self.kind.clone(),
            constellation: self.constellation.clone(),
            mag_min: self.mag_min,
            mag_max: self.mag_max,
        }
    }

    fn equipment(&self) -> Option<Equipment> {
        Some(Equipment {
            focal_length: self.focal_length?,
            sensor_width: self.sensor_width?,
            sensor_height: self.sensor_height?,
        })
    }
}

/// Observer echoed back in every response
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub bortle: i32,
    pub time: DateTime<Utc>,
}

impl From<&ObserverContext> for Location {
    fn from(o: &ObserverContext) -> Self {
        Self {
            lat: o.latitude,
            lon: o.longitude,
            bortle: o.bortle,
            time: o.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Plan<'a> {
    pub location: Location,
    pub moon: LunarState,
    pub weather: Option<WeatherReport>,
    /// Smaller FOV axis in degrees, when equipment was given
    pub fov: Option<f64>,
    pub objects: Vec<ScoredObject<'a>>,
}

#[derive(Debug, Serialize)]
pub struct MoonReport {
    pub location: Location,
    #[serde(flatten)]
    pub state: LunarState,
}

#[derive(Debug, Serialize)]
pub struct PositionReport {
    pub location: Location,
    pub ra: f64,
    pub dec: f64,
    pub altitude: f64,
    pub azimuth: f64,
    pub lst: f64,
    pub hour_angle: f64,
    #[serde(serialize_with = "crate::domain::airmass_or_dash")]
    pub airmass: Option<f64>,
    pub events: RiseSet,
}

/// Request orchestration: defaults, validation, ranking, weather
pub struct PlannerService {
    catalog: Arc<Catalog>,
    defaults: ObserverDefaults,
    weather: Option<WeatherClient>,
    result_limit: usize,
}

impl PlannerService {
    pub fn new(
        catalog: Arc<Catalog>,
        defaults: ObserverDefaults,
        weather: Option<WeatherClient>,
        result_limit: usize,
    ) -> Self {
        Self {
            catalog,
            defaults,
            weather,
            result_limit,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Fill in defaults and reject input the math cannot use
    pub fn observer(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        time: Option<&str>,
        bortle: Option<i32>,
    ) -> ApiResult<ObserverContext> {
        let latitude = lat.unwrap_or(self.defaults.latitude);
        let longitude = lon.unwrap_or(self.defaults.longitude);
        let bortle = bortle.unwrap_or(self.defaults.bortle);

        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ApiError::InvalidInput(format!(
                "latitude {latitude} must be within [-90, 90]"
            )));
        }
        if !longitude.is_finite() {
            return Err(ApiError::InvalidInput(format!("longitude {longitude} is not finite")));
        }
        if !(1..=9).contains(&bortle) {
            return Err(ApiError::InvalidInput(format!("bortle {bortle} must be within 1..=9")));
        }

        let timestamp = match time.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => parse_timestamp(t)
                .ok_or_else(|| ApiError::InvalidInput(format!("unrecognised time {t:?}")))?,
            None => Utc::now(),
        };

        Ok(ObserverContext {
            latitude,
            longitude,
            elevation: 0.0,
            timestamp,
            bortle,
        })
    }

    /// Ranked target list for one observer and instant
    pub async fn plan(&self, req: &PlanRequest) -> ApiResult<Plan<'_>> {
        let observer = self.observer(req.lat, req.lon, req.time.as_deref(), req.bortle)?;
        let filter = req.filter();
        let equipment = req.equipment();
        let limit = req.limit.unwrap_or(self.result_limit).min(self.result_limit);

        if let Some(min) = req.min_altitude {
            if !min.is_finite() {
                return Err(ApiError::InvalidInput("min_altitude is not finite".to_string()));
            }
        }

        debug!(
            "Planning for lat={} lon={} at {} (bortle {})",
            observer.latitude, observer.longitude, observer.timestamp, observer.bortle
        );

        let options = RankOptions {
            equipment,
            min_altitude: req.min_altitude,
            limit: Some(limit),
        };
        let moon = lunar_state_at(&observer.timestamp, observer.latitude, observer.longitude);
        let mut objects = rank_objects_under(self.catalog.filter(&filter), &observer, &moon, &options);

        let weather = self.fetch_weather(observer.latitude, observer.longitude).await;
        if let Some(cloud_cover) = weather.as_ref().and_then(|w| w.cloud_cover) {
            apply_cloud_cover(&mut objects, cloud_cover);
        }
        objects.iter_mut().for_each(round_for_display);

        info!(
            "Ranked {} objects for ({:.2}, {:.2})",
            objects.len(),
            observer.latitude,
            observer.longitude
        );

        Ok(Plan {
            location: Location::from(&observer),
            moon,
            weather,
            fov: equipment.as_ref().and_then(field_of_view),
            objects,
        })
    }

    /// Weather is best-effort: failures are logged and the plan goes ahead
    async fn fetch_weather(&self, lat: f64, lon: f64) -> Option<WeatherReport> {
        let client = self.weather.as_ref()?;
        match client.fetch_current(lat, lon).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Weather fetch from {} failed: {}", client.base_url(), e);
                None
            }
        }
    }

    pub fn moon(&self, lat: Option<f64>, lon: Option<f64>, time: Option<&str>) -> ApiResult<MoonReport> {
        let observer = self.observer(lat, lon, time, None)?;
        Ok(MoonReport {
            state: lunar_state_at(&observer.timestamp, observer.latitude, observer.longitude),
            location: Location::from(&observer),
        })
    }

    /// Place an arbitrary RA/Dec in the observer's sky
    pub fn position(
        &self,
        ra: f64,
        dec: f64,
        lat: Option<f64>,
        lon: Option<f64>,
        time: Option<&str>,
    ) -> ApiResult<PositionReport> {
        if !ra.is_finite() {
            return Err(ApiError::InvalidInput(format!("ra {ra} is not finite")));
        }
        if !dec.is_finite() || !(-90.0..=90.0).contains(&dec) {
            return Err(ApiError::InvalidInput(format!("dec {dec} must be within [-90, 90]")));
        }
        let observer = self.observer(lat, lon, time, None)?;
        let ra = normalize_degrees(ra);
        let ts = observer.timestamp;
        let pos = horizontal_position(ra, dec, observer.latitude, observer.longitude, &ts);

        Ok(PositionReport {
            location: Location::from(&observer),
            ra,
            dec,
            altitude: pos.altitude,
            azimuth: pos.azimuth,
            lst: local_sidereal_time(&ts, observer.longitude),
            hour_angle: hour_angle(ra, observer.longitude, &ts),
            airmass: airmass(pos.altitude),
            events: rise_set(ra, dec, observer.latitude, observer.longitude, &ts),
        })
    }

    pub fn list_catalog(&self, filter: &CatalogFilter) -> Vec<&CelestialObject> {
        self.catalog.filter(filter)
    }

    pub fn object(&self, id: &str) -> ApiResult<&CelestialObject> {
        self.catalog
            .get(id)
            .ok_or_else(|| ApiError::NotFound(format!("object {id}")))
    }
}

/// Scale scores by the clear fraction of the sky
pub fn apply_cloud_cover(objects: &mut [ScoredObject<'_>], cloud_cover: f64) {
    if !cloud_cover.is_finite() {
        return;
    }
    let factor = (100.0 - cloud_cover.clamp(0.0, 100.0)) / 100.0;
    for obj in objects {
        obj.score *= factor;
    }
}

fn round_for_display(obj: &mut ScoredObject<'_>) {
    obj.score = round_to(obj.score, 1);
    obj.position.altitude = round_to(obj.position.altitude, 1);
    obj.position.azimuth = normalize_degrees(round_to(obj.position.azimuth, 1));
    obj.moon_separation = obj.moon_separation.map(|s| round_to(s, 1));
    obj.airmass = obj.airmass.map(|a| round_to(a, 2));
}
