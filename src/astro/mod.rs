/// Positional astronomy: sidereal time, horizontal coordinates, the moon, optics
pub mod horizontal;
pub mod lunar;
pub mod optics;
pub mod sidereal;

pub use horizontal::{horizontal_position, hour_angle, rise_set};
pub use lunar::{angular_separation, lunar_state, lunar_state_at, moon_position};
pub use optics::{airmass, field_of_view, fov_match};
pub use sidereal::{julian_date, local_sidereal_time};
