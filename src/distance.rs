//! Great-circle distance and its display formatting.

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two WGS84 points, in meters.
pub fn haversine_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Formats a distance in meters for the info line: whole meters below one
/// kilometer, kilometers with one decimal at or above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(haversine_meters(37.5665, 126.9780, 37.5665, 126.9780), 0.0);
    }

    #[test]
    fn berlin_to_paris_is_about_878_km() {
        let d = haversine_meters(52.5200, 13.4050, 48.8566, 2.3522);
        assert!((d - 878_000.0).abs() < 10_000.0, "got {d}");
    }

    #[test]
    fn seoul_city_hall_to_gangnam_station_is_about_8_km() {
        let d = haversine_meters(37.5665, 126.9780, 37.4979, 127.0276);
        assert!((d - 8_800.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn formats_meters_below_one_kilometer() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(350.4), "350m");
        assert_eq!(format_distance(999.0), "999m");
    }

    #[test]
    fn formats_kilometers_with_one_decimal() {
        assert_eq!(format_distance(1000.0), "1.0km");
        assert_eq!(format_distance(1234.0), "1.2km");
        assert_eq!(format_distance(12_500.0), "12.5km");
    }
}
