/// Julian dates and sidereal time
use chrono::{DateTime, Utc};

use crate::utils::normalize_degrees;

/// Julian Date of the Unix epoch
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian Date of J2000.0
pub const J2000_JD: f64 = 2_451_545.0;
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;
/// Degrees of sidereal rotation per solar day
pub const SIDEREAL_RATE: f64 = 360.985_647_366_29;

const GMST_AT_J2000: f64 = 280.460_618_37;

pub fn julian_date(ts: &DateTime<Utc>) -> f64 {
    ts.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD
}

pub fn days_since_j2000(ts: &DateTime<Utc>) -> f64 {
    julian_date(ts) - J2000_JD
}

/// Greenwich mean sidereal time in degrees, [0, 360)
pub fn greenwich_mean_sidereal_time(ts: &DateTime<Utc>) -> f64 {
    normalize_degrees(GMST_AT_J2000 + SIDEREAL_RATE * days_since_j2000(ts))
}

/// Local sidereal time in degrees, [0, 360). Longitude is east-positive.
pub fn local_sidereal_time(ts: &DateTime<Utc>, longitude: f64) -> f64 {
    normalize_degrees(greenwich_mean_sidereal_time(ts) + longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    #[test]
    fn test_julian_date_unix_epoch() {
        let ts = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(julian_date(&ts), UNIX_EPOCH_JD);
    }

    #[test]
    fn test_julian_date_j2000() {
        let ts = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_abs_diff_eq!(julian_date(&ts), J2000_JD, epsilon = 1e-9);
        assert_abs_diff_eq!(days_since_j2000(&ts), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_julian_date_keeps_milliseconds() {
        let ts = Utc.timestamp_millis_opt(43_200_000).unwrap();
        assert_abs_diff_eq!(julian_date(&ts), UNIX_EPOCH_JD + 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_gmst_at_j2000() {
        let ts = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_abs_diff_eq!(greenwich_mean_sidereal_time(&ts), GMST_AT_J2000, epsilon = 1e-6);
    }

    #[test]
    fn test_gmst_reference_value() {
        // Meeus example 12.a: 1987-04-10 00:00 UT, GMST 13h10m46.3668s.
        let ts = Utc.with_ymd_and_hms(1987, 4, 10, 0, 0, 0).unwrap();
        let expected = (13.0 + 10.0 / 60.0 + 46.3668 / 3600.0) * 15.0;
        assert_abs_diff_eq!(greenwich_mean_sidereal_time(&ts), expected, epsilon = 0.01);
    }

    #[test]
    fn test_lst_wraps_for_negative_longitude() {
        let ts = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let lst = local_sidereal_time(&ts, -300.0);
        assert_abs_diff_eq!(lst, GMST_AT_J2000 - 300.0 + 360.0, epsilon = 1e-6);
    }

    #[test]
    fn test_lst_range_before_j2000() {
        // Negative day counts produce negative raw GMST values.
        for year in [1950, 1970, 1999] {
            let ts = Utc.with_ymd_and_hms(year, 6, 1, 3, 0, 0).unwrap();
            for lon in [-179.9, -23.3, 0.0, 23.32, 179.9] {
                let lst = local_sidereal_time(&ts, lon);
                assert!((0.0..360.0).contains(&lst), "lst {lst} out of range");
            }
        }
    }
}
