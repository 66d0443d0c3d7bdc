/// Observability scoring and target ranking
use crate::astro::{airmass, angular_separation, field_of_view, fov_match, horizontal_position, lunar_state_at, rise_set};
use crate::domain::{CelestialObject, Equipment, HorizontalPosition, LunarState, ObserverContext, ScoredObject};

/// Altitude at which the altitude term saturates
pub const FULL_ALTITUDE_DEG: f64 = 30.0;
pub const ALTITUDE_WEIGHT: f64 = 50.0;
pub const MAGNITUDE_WEIGHT: f64 = 50.0;
/// Magnitude term points lost per magnitude
pub const MAGNITUDE_SLOPE: f64 = 5.0;
/// Effective magnitude added per Bortle class above 1
pub const BORTLE_MAG_STEP: f64 = 0.5;
pub const MOON_PENALTY_MAX: f64 = 20.0;
/// Beyond this separation the moon no longer costs anything
pub const MOON_FALLOFF_DEG: f64 = 90.0;

/// Ranking knobs on top of the bare score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankOptions {
    pub equipment: Option<Equipment>,
    /// Drop objects lower than this, degrees
    pub min_altitude: Option<f64>,
    pub limit: Option<usize>,
}

/// 0..=50, linear up to 30 degrees
pub fn altitude_term(altitude: f64) -> f64 {
    if altitude <= 0.0 {
        return 0.0;
    }
    altitude.min(FULL_ALTITUDE_DEG) / FULL_ALTITUDE_DEG * ALTITUDE_WEIGHT
}

/// Catalog magnitude dimmed by light pollution
pub fn effective_magnitude(magnitude: f64, bortle: i32) -> f64 {
    magnitude + (f64::from(bortle) - 1.0) * BORTLE_MAG_STEP
}

/// 0..=50, brighter is better
pub fn magnitude_term(effective_magnitude: f64) -> f64 {
    (MAGNITUDE_WEIGHT - effective_magnitude * MAGNITUDE_SLOPE).clamp(0.0, MAGNITUDE_WEIGHT)
}

/// Points lost to moonlight. Zero while the moon is down.
/// `separation` of `None` means the moon's position is unknown and counts as 180.
pub fn lunar_penalty(moon: &LunarState, separation: Option<f64>) -> f64 {
    if !moon.is_up {
        return 0.0;
    }
    let sep = separation.unwrap_or(180.0);
    let sep_factor = 1.0 - sep.min(MOON_FALLOFF_DEG) / MOON_FALLOFF_DEG;
    moon.illumination_fraction * sep_factor * MOON_PENALTY_MAX
}

fn moon_separation(object: &CelestialObject, moon: &LunarState) -> Option<f64> {
    moon.equatorial
        .map(|eq| angular_separation(object.ra, object.dec, eq.ra, eq.dec))
}

/// Composite observability score, never negative. Objects at or below the
/// horizon score 0.
pub fn score(object: &CelestialObject, position: &HorizontalPosition, bortle: i32, moon: &LunarState) -> f64 {
    if position.altitude <= 0.0 {
        return 0.0;
    }
    let total = altitude_term(position.altitude)
        + magnitude_term(effective_magnitude(object.magnitude, bortle))
        - lunar_penalty(moon, moon_separation(object, moon));
    total.max(0.0)
}

/// Everything derived for a single object
pub fn score_object<'a>(
    object: &'a CelestialObject,
    observer: &ObserverContext,
    moon: &LunarState,
    min_fov: Option<f64>,
) -> ScoredObject<'a> {
    let ObserverContext {
        latitude: lat,
        longitude: lon,
        timestamp: ts,
        ..
    } = *observer;
    let position = horizontal_position(object.ra, object.dec, lat, lon, &ts);
    ScoredObject {
        object,
        position,
        score: score(object, &position, observer.bortle, moon),
        airmass: airmass(position.altitude),
        moon_separation: moon_separation(object, moon),
        fov_match: fov_match(object.size_arcmin, min_fov),
        events: rise_set(object.ra, object.dec, lat, lon, &ts),
    }
}

/// Score every object and sort best first. Ties keep catalog order.
pub fn rank_objects<'a>(
    catalog: impl IntoIterator<Item = &'a CelestialObject>,
    observer: &ObserverContext,
) -> Vec<ScoredObject<'a>> {
    rank_objects_with(catalog, observer, &RankOptions::default())
}

pub fn rank_objects_with<'a>(
    catalog: impl IntoIterator<Item = &'a CelestialObject>,
    observer: &ObserverContext,
    options: &RankOptions,
) -> Vec<ScoredObject<'a>> {
    let moon = lunar_state_at(&observer.timestamp, observer.latitude, observer.longitude);
    rank_objects_under(catalog, observer, &moon, options)
}

/// Ranking against a moon the caller already computed for this observer
pub fn rank_objects_under<'a>(
    catalog: impl IntoIterator<Item = &'a CelestialObject>,
    observer: &ObserverContext,
    moon: &LunarState,
    options: &RankOptions,
) -> Vec<ScoredObject<'a>> {
    let min_fov = options.equipment.as_ref().and_then(field_of_view);

    let mut ranked: Vec<ScoredObject<'a>> = catalog
        .into_iter()
        .map(|obj| score_object(obj, observer, moon, min_fov))
        .filter(|s| options.min_altitude.map_or(true, |min| s.position.altitude >= min))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(limit) = options.limit {
        ranked.truncate(limit);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::domain::{EquatorialPosition, FovMatch};
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    fn object(id: &str, magnitude: f64, ra: f64, dec: f64) -> CelestialObject {
        CelestialObject {
            id: id.to_string(),
            name: id.to_string(),
            kind: "Galaxy".to_string(),
            constellation: None,
            magnitude,
            size_arcmin: None,
            ra,
            dec,
        }
    }

    fn moon_down() -> LunarState {
        LunarState {
            phase_angle: 0.0,
            illumination: 0,
            illumination_fraction: 0.0,
            equatorial: None,
            horizontal: None,
            is_up: false,
        }
    }

    fn full_moon_up_at(ra: f64, dec: f64) -> LunarState {
        LunarState {
            phase_angle: 180.0,
            illumination: 100,
            illumination_fraction: 1.0,
            equatorial: Some(EquatorialPosition { ra, dec }),
            horizontal: Some(HorizontalPosition {
                altitude: 40.0,
                azimuth: 180.0,
            }),
            is_up: true,
        }
    }

    fn at(altitude: f64) -> HorizontalPosition {
        HorizontalPosition {
            altitude,
            azimuth: 90.0,
        }
    }

    fn sofia_evening() -> ObserverContext {
        ObserverContext {
            latitude: 42.69,
            longitude: 23.32,
            elevation: 0.0,
            timestamp: Utc.with_ymd_and_hms(2024, 10, 15, 20, 0, 0).unwrap(),
            bortle: 4,
        }
    }

    #[test]
    fn test_score_components() {
        let m31 = object("M31", 3.44, 10.6846, 41.2692);
        // 50 for altitude, 50 - (3.44 + 1.5) * 5 = 25.3 for magnitude
        assert_abs_diff_eq!(score(&m31, &at(45.0), 4, &moon_down()), 75.3, epsilon = 1e-9);
        assert_abs_diff_eq!(altitude_term(15.0), 25.0, epsilon = 1e-12);
        assert_abs_diff_eq!(effective_magnitude(8.0, 1), 8.0, epsilon = 1e-12);
        assert_eq!(magnitude_term(12.0), 0.0);
        assert_eq!(magnitude_term(-2.0), 50.0);
    }

    #[test]
    fn test_below_horizon_scores_zero() {
        let bright = object("bright", -1.0, 0.0, 0.0);
        assert_eq!(score(&bright, &at(0.0), 1, &moon_down()), 0.0);
        assert_eq!(score(&bright, &at(-20.0), 1, &moon_down()), 0.0);
    }

    #[test]
    fn test_score_monotonic_in_altitude() {
        let obj = object("x", 6.0, 0.0, 0.0);
        let moon = moon_down();
        for alt in 0..30 {
            let (low, high) = (f64::from(alt), f64::from(alt + 1));
            assert!(altitude_term(low) < altitude_term(high), "altitude {low} -> {high}");
            if alt > 0 {
                assert!(score(&obj, &at(low), 4, &moon) < score(&obj, &at(high), 4, &moon));
            }
        }
        // Saturated above 30 degrees.
        for alt in 30..=90 {
            assert_eq!(altitude_term(f64::from(alt)), ALTITUDE_WEIGHT);
        }
    }

    #[test]
    fn test_brighter_scores_higher() {
        let moon = moon_down();
        let bright = score(&object("a", 4.0, 0.0, 0.0), &at(20.0), 4, &moon);
        let faint = score(&object("b", 7.0, 0.0, 0.0), &at(20.0), 4, &moon);
        assert!(bright > faint);
    }

    #[test]
    fn test_light_pollution_lowers_score() {
        let moon = moon_down();
        for magnitude in [4.0, 6.0, 8.0] {
            let obj = object("x", magnitude, 0.0, 0.0);
            for bortle in 1..9 {
                let darker = score(&obj, &at(40.0), bortle, &moon);
                let brighter = score(&obj, &at(40.0), bortle + 1, &moon);
                if magnitude_term(effective_magnitude(magnitude, bortle)) > 0.0 {
                    assert!(brighter < darker, "mag {magnitude} bortle {bortle}: {brighter} !< {darker}");
                } else {
                    assert_eq!(brighter, darker);
                }
            }
        }
    }

    #[test]
    fn test_extreme_bortle_does_not_overflow() {
        let obj = object("x", 6.0, 0.0, 0.0);
        let moon = moon_down();
        assert_eq!(magnitude_term(effective_magnitude(6.0, i32::MAX)), 0.0);
        assert_eq!(magnitude_term(effective_magnitude(6.0, i32::MIN)), MAGNITUDE_WEIGHT);
        assert_abs_diff_eq!(score(&obj, &at(40.0), i32::MIN, &moon), 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(score(&obj, &at(40.0), i32::MAX, &moon), 50.0, epsilon = 1e-9);

        let catalog = Catalog::builtin();
        for bortle in [i32::MIN, -3, 0, 12, i32::MAX] {
            let observer = ObserverContext { bortle, ..sofia_evening() };
            let ranked = rank_objects(catalog.objects(), &observer);
            assert_eq!(ranked.len(), catalog.len());
            assert!(ranked.iter().all(|s| s.score.is_finite() && s.score >= 0.0));
        }
    }

    #[test]
    fn test_moon_penalty_depends_on_separation() {
        let obj = object("x", 6.0, 100.0, 20.0);
        let near = score(&obj, &at(40.0), 4, &full_moon_up_at(100.0, 20.0));
        let mid = score(&obj, &at(40.0), 4, &full_moon_up_at(145.0, 20.0));
        let far = score(&obj, &at(40.0), 4, &full_moon_up_at(280.0, -20.0));
        let dark = score(&obj, &at(40.0), 4, &moon_down());
        assert!(near < mid && mid < far);
        assert_abs_diff_eq!(far, dark, epsilon = 1e-9);
        assert_abs_diff_eq!(dark - near, MOON_PENALTY_MAX, epsilon = 1e-4);
    }

    #[test]
    fn test_moon_penalty_scales_with_illumination() {
        let obj = object("x", 6.0, 100.0, 20.0);
        // Moon about 2 degrees away.
        let mut moon = full_moon_up_at(102.0, 20.0);
        let mut prev = f64::INFINITY;
        for pct in [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
            moon.illumination_fraction = pct;
            let s = score(&obj, &at(40.0), 4, &moon);
            assert!(s < prev, "illumination {pct}: {s} !< {prev}");
            prev = s;
        }
    }

    #[test]
    fn test_moon_below_horizon_costs_nothing() {
        let mut moon = full_moon_up_at(100.0, 20.0);
        moon.is_up = false;
        assert_eq!(lunar_penalty(&moon, Some(0.0)), 0.0);
    }

    #[test]
    fn test_unknown_moon_position_counts_as_far() {
        let mut moon = full_moon_up_at(100.0, 20.0);
        moon.equatorial = None;
        assert_eq!(lunar_penalty(&moon, None), 0.0);
    }

    #[test]
    fn test_score_floored_at_zero() {
        let faint = object("faint", 20.0, 100.0, 20.0);
        // 16.7 for altitude, nothing for magnitude, 20 lost to the moon
        let s = score(&faint, &at(10.0), 9, &full_moon_up_at(100.0, 20.0));
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_rank_sorted_descending() {
        let catalog = Catalog::builtin();
        let ranked = rank_objects(catalog.objects(), &sofia_evening());
        assert_eq!(ranked.len(), catalog.len());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for s in &ranked {
            assert!(s.score >= 0.0);
            assert!((-90.0..=90.0).contains(&s.position.altitude));
            assert!((0.0..360.0).contains(&s.position.azimuth));
            if s.position.altitude <= 0.0 {
                assert_eq!(s.score, 0.0);
                assert_eq!(s.airmass, None);
            }
        }
    }

    #[test]
    fn test_rank_ties_keep_catalog_order() {
        let catalog = Catalog::builtin();
        let ranked = rank_objects(catalog.objects(), &sofia_evening());
        let index_of = |id: &str| catalog.objects().iter().position(|o| o.id == id).unwrap();
        let zero: Vec<usize> = ranked
            .iter()
            .filter(|s| s.score == 0.0)
            .map(|s| index_of(&s.object.id))
            .collect();
        assert!(!zero.is_empty());
        assert!(zero.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rank_identical_objects_stable() {
        let objects = vec![
            object("A", 5.0, 10.6846, 41.2692),
            object("B", 5.0, 10.6846, 41.2692),
            object("C", 5.0, 10.6846, 41.2692),
        ];
        let ranked = rank_objects(&objects, &sofia_evening());
        let ids: Vec<&str> = ranked.iter().map(|s| s.object.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let catalog = Catalog::builtin();
        let observer = sofia_evening();
        let a = rank_objects(catalog.objects(), &observer);
        let b = rank_objects(catalog.objects(), &observer);
        let ids_a: Vec<(&str, f64)> = a.iter().map(|s| (s.object.id.as_str(), s.score)).collect();
        let ids_b: Vec<(&str, f64)> = b.iter().map(|s| (s.object.id.as_str(), s.score)).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_rank_does_not_touch_catalog() {
        let catalog = Catalog::builtin();
        let before = catalog.objects().to_vec();
        let _ = rank_objects(catalog.objects(), &sofia_evening());
        assert_eq!(catalog.objects(), before.as_slice());
    }

    #[test]
    fn test_m31_is_well_placed_on_reference_evening() {
        let catalog = Catalog::builtin();
        let ranked = rank_objects(catalog.objects(), &sofia_evening());
        let m31 = ranked.iter().find(|s| s.object.id == "M31").unwrap();
        assert_abs_diff_eq!(m31.position.altitude, 73.2456, epsilon = 0.01);
        assert_abs_diff_eq!(m31.position.azimuth, 87.2004, epsilon = 0.01);
        assert!(m31.airmass.unwrap() < 1.1);
        assert!(m31.moon_separation.is_some());
    }

    #[test]
    fn test_rank_with_options() {
        let catalog = Catalog::builtin();
        let options = RankOptions {
            equipment: Some(Equipment {
                focal_length: 600.0,
                sensor_width: 23.5,
                sensor_height: 23.5,
            }),
            min_altitude: Some(0.0),
            limit: Some(5),
        };
        let ranked = rank_objects_with(catalog.objects(), &sofia_evening(), &options);
        assert_eq!(ranked.len(), 5);
        assert!(ranked.iter().all(|s| s.position.altitude >= 0.0));
        let unlimited = RankOptions { limit: None, ..options };
        let m31 = rank_objects_with(catalog.objects(), &sofia_evening(), &unlimited)
            .into_iter()
            .find(|s| s.object.id == "M31")
            .unwrap();
        assert_eq!(m31.fov_match, Some(FovMatch::TooLarge));
    }

    #[test]
    fn test_rank_without_equipment_has_no_fov_verdict() {
        let catalog = Catalog::builtin();
        let ranked = rank_objects(catalog.objects(), &sofia_evening());
        assert!(ranked.iter().all(|s| s.fov_match.is_none()));
    }

    #[test]
    fn test_empty_catalog() {
        let empty: Vec<CelestialObject> = Vec::new();
        let ranked = rank_objects(&empty, &sofia_evening());
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_under_given_moon() {
        let catalog = Catalog::builtin();
        let observer = sofia_evening();
        let moon = full_moon_up_at(10.6846, 41.2692);
        let ranked = rank_objects_under(catalog.objects(), &observer, &moon, &RankOptions::default());
        let m31 = ranked.iter().find(|s| s.object.id == "M31").unwrap();
        assert_abs_diff_eq!(m31.moon_separation.unwrap(), 0.0, epsilon = 1e-5);

        let computed = lunar_state_at(&observer.timestamp, observer.latitude, observer.longitude);
        let a = rank_objects_under(catalog.objects(), &observer, &computed, &RankOptions::default());
        let b = rank_objects(catalog.objects(), &observer);
        let scores_a: Vec<f64> = a.iter().map(|s| s.score).collect();
        let scores_b: Vec<f64> = b.iter().map(|s| s.score).collect();
        assert_eq!(scores_a, scores_b);
    }
}
