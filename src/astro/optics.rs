/// Field of view and airmass
use crate::domain::{Equipment, FovMatch};

/// Smaller of the two rectilinear FOV axes, degrees.
/// `None` unless focal length and both sensor dimensions are positive.
pub fn field_of_view(equipment: &Equipment) -> Option<f64> {
    let Equipment {
        focal_length,
        sensor_width,
        sensor_height,
    } = *equipment;
    if !(focal_length > 0.0 && sensor_width > 0.0 && sensor_height > 0.0) {
        return None;
    }
    let axis = |dim: f64| 2.0 * (dim / (2.0 * focal_length)).atan().to_degrees();
    Some(axis(sensor_width).min(axis(sensor_height)))
}

/// Whether an object of `size_arcmin` fits inside `min_fov` degrees
pub fn fov_match(size_arcmin: Option<f64>, min_fov: Option<f64>) -> Option<FovMatch> {
    let size = size_arcmin.filter(|s| *s > 0.0)?;
    let fov = min_fov?;
    if size / 60.0 < fov {
        Some(FovMatch::Fits)
    } else {
        Some(FovMatch::TooLarge)
    }
}

/// Plane-parallel airmass, sec(z). Only defined above the horizon.
pub fn airmass(altitude: f64) -> Option<f64> {
    if altitude <= 0.0 {
        return None;
    }
    let zenith_angle = (90.0 - altitude).to_radians();
    Some(1.0 / zenith_angle.cos())
}
