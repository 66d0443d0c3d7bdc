/// Deep-sky target ranking: alt/az transforms, lunar model, observability scoring
pub mod astro;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod scoring;
pub mod services;
pub mod utils;

pub use astro::{
    airmass, angular_separation, field_of_view, horizontal_position, julian_date, local_sidereal_time, lunar_state,
    lunar_state_at, rise_set,
};
pub use scoring::{rank_objects, rank_objects_under, rank_objects_with, RankOptions};
