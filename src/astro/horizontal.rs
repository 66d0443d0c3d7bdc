/// Equatorial to horizontal conversion and horizon crossings
use chrono::{DateTime, Duration, Utc};

use crate::astro::sidereal::{local_sidereal_time, MILLIS_PER_DAY, SIDEREAL_RATE};
use crate::domain::{HorizontalPosition, RiseSet};
use crate::utils::{clamp_unit, normalize_degrees, signed_degrees};

/// Hour angle in degrees, (-180, 180]. Positive west of the meridian.
pub fn hour_angle(ra: f64, longitude: f64, ts: &DateTime<Utc>) -> f64 {
    signed_degrees(local_sidereal_time(ts, longitude) - ra)
}

/// Altitude and azimuth (degrees) of an equatorial position.
///
/// Azimuth is undefined at the zenith/nadir and for an observer on a pole;
/// those cases return an azimuth of 0 rather than NaN.
pub fn horizontal_position(
    ra: f64,
    dec: f64,
    lat: f64,
    lon: f64,
    ts: &DateTime<Utc>,
) -> HorizontalPosition {
    let ha = (local_sidereal_time(ts, lon) - ra).to_radians();
    let dec = dec.to_radians();
    let lat = lat.to_radians();

    let sin_alt = clamp_unit(dec.sin() * lat.sin() + dec.cos() * lat.cos() * ha.cos());
    let alt = sin_alt.asin();

    let denom = alt.cos() * lat.cos();
    let cos_az = (dec.sin() - alt.sin() * lat.sin()) / denom;
    let azimuth = if denom == 0.0 || !cos_az.is_finite() {
        0.0
    } else {
        let mut az = clamp_unit(cos_az).acos().to_degrees();
        if ha.sin() > 0.0 {
            az = 360.0 - az;
        }
        normalize_degrees(az)
    };

    HorizontalPosition {
        altitude: alt.to_degrees(),
        azimuth,
    }
}

/// Next meridian transit and geometric horizon crossings at or after `ts`.
/// No refraction or parallax. Events past the end of the representable
/// calendar yield `RiseSet::Unavailable`.
pub fn rise_set(ra: f64, dec: f64, lat: f64, lon: f64, ts: &DateTime<Utc>) -> RiseSet {
    let lst = local_sidereal_time(ts, lon);

    let (lat_r, dec_r) = (lat.to_radians(), dec.to_radians());
    let denom = lat_r.cos() * dec_r.cos();
    let cos_h0 = -(lat_r.sin() * dec_r.sin()) / denom;
    let degenerate = denom == 0.0 || !cos_h0.is_finite();

    if !degenerate && cos_h0 > 1.0 {
        return RiseSet::NeverRises;
    }
    let Some(transit) = after_sidereal(ts, ra - lst) else {
        return RiseSet::Unavailable;
    };

    if degenerate {
        // Pole observer or polar object: altitude never changes.
        let upper = horizontal_position(ra, dec, lat, lon, &transit);
        return if upper.altitude > 0.0 {
            RiseSet::Circumpolar { transit }
        } else {
            RiseSet::NeverRises
        };
    }
    if cos_h0 < -1.0 {
        return RiseSet::Circumpolar { transit };
    }

    let h0 = cos_h0.acos().to_degrees();
    match (
        after_sidereal(ts, ra - h0 - lst),
        after_sidereal(ts, ra + h0 - lst),
    ) {
        (Some(rise), Some(set)) => RiseSet::Events { rise, transit, set },
        _ => RiseSet::Unavailable,
    }
}

/// Time at which the sky has turned by `angle` degrees (taken modulo 360).
/// `None` past the end of chrono's calendar.
fn after_sidereal(ts: &DateTime<Utc>, angle: f64) -> Option<DateTime<Utc>> {
    let days = normalize_degrees(angle) / SIDEREAL_RATE;
    ts.checked_add_signed(Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64))
}
