/// Low-precision lunar phase and position.
///
/// Good enough to tell whether the moon is up and roughly how far it is from a
/// target. Errors of a degree or more are expected.
use std::f64::consts::TAU;

use chrono::{DateTime, Utc};

use crate::astro::horizontal::horizontal_position;
use crate::astro::sidereal::{days_since_j2000, julian_date};
use crate::domain::{EquatorialPosition, LunarState};
use crate::utils::{clamp_unit, normalize_degrees};

/// Phase reference epoch, 1979-12-31 00:00 UT
pub const LUNAR_EPOCH_JD: f64 = 2_444_238.5;
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// Fraction of the synodic month elapsed, [0, 1)
pub fn phase_fraction(ts: &DateTime<Utc>) -> f64 {
    let d = julian_date(ts) - LUNAR_EPOCH_JD;
    (d / SYNODIC_MONTH_DAYS).rem_euclid(1.0)
}

/// Illuminated fraction of the disc, 0..1
pub fn illumination_fraction(phase: f64) -> f64 {
    0.5 * (1.0 - (phase * TAU).cos())
}

/// Approximate geocentric equatorial position
pub fn moon_position(ts: &DateTime<Utc>) -> EquatorialPosition {
    let d = days_since_j2000(ts);

    let mean_longitude = 218.316 + 13.176_396 * d;
    let mean_anomaly = (134.963 + 13.064_993 * d).to_radians();
    let arg_latitude = (93.272 + 13.229_350 * d).to_radians();

    let lambda = (mean_longitude + 6.289 * mean_anomaly.sin()).to_radians();
    let beta = (5.128 * arg_latitude.sin()).to_radians();
    let eps = (23.4393 - 0.000_000_4 * d).to_radians();

    let ra = (lambda.sin() * eps.cos() - beta.tan() * eps.sin()).atan2(lambda.cos());
    let dec = clamp_unit(beta.sin() * eps.cos() + beta.cos() * eps.sin() * lambda.sin()).asin();

    EquatorialPosition {
        ra: normalize_degrees(ra.to_degrees()),
        dec: dec.to_degrees(),
    }
}

/// Phase, illumination and equatorial position. No observer, so the moon is
/// never reported as up.
pub fn lunar_state(ts: &DateTime<Utc>) -> LunarState {
    let phase = phase_fraction(ts);
    let fraction = illumination_fraction(phase);
    LunarState {
        phase_angle: phase * 360.0,
        illumination: (fraction * 100.0).round() as u8,
        illumination_fraction: fraction,
        equatorial: Some(moon_position(ts)),
        horizontal: None,
        is_up: false,
    }
}

/// `lunar_state` plus the moon's place in the observer's sky
pub fn lunar_state_at(ts: &DateTime<Utc>, lat: f64, lon: f64) -> LunarState {
    let mut state = lunar_state(ts);
    if let Some(eq) = state.equatorial {
        let pos = horizontal_position(eq.ra, eq.dec, lat, lon, ts);
        state.is_up = pos.altitude > 0.0;
        state.horizontal = Some(pos);
    }
    state
}

/// Great-circle separation in degrees between two equatorial points (degrees)
pub fn angular_separation(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let (d1, d2) = (dec1.to_radians(), dec2.to_radians());
    let cos_sep = d1.sin() * d2.sin() + d1.cos() * d2.cos() * (ra1 - ra2).to_radians().cos();
    clamp_unit(cos_sep).acos().to_degrees()
}
