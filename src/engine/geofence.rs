/// Mean Earth radius in meters, as used by the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters (haversine).
///
/// Radian math keeps this stable near the poles and across the ±180°
/// meridian, where a planar approximation would fall apart.
pub fn distance_meters(lat_from: f64, lon_from: f64, lat_to: f64, lon_to: f64) -> f64 {
    let lat_from = lat_from.to_radians();
    let lon_from = lon_from.to_radians();
    let lat_to = lat_to.to_radians();
    let lon_to = lon_to.to_radians();

    let lat_delta = lat_to - lat_from;
    let lon_delta = lon_to - lon_from;

    let angle = 2.0
        * ((lat_delta / 2.0).sin().powi(2)
            + lat_from.cos() * lat_to.cos() * (lon_delta / 2.0).sin().powi(2))
        .sqrt()
        .asin();

    angle * EARTH_RADIUS_M
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        assert!(distance_meters(-6.2, 106.8, -6.2, 106.8) < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_meters(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn short_distances_match_surveyed_values() {
        // Two points ~157m apart (0.001 deg lat + 0.001 deg lon at the equator).
        let d = distance_meters(0.0, 0.0, 0.001, 0.001);
        assert!((d - 157.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn wraps_cleanly_across_the_antimeridian() {
        // 0.002 degrees of longitude apart, straddling +/-180.
        let d = distance_meters(0.0, 179.999, 0.0, -179.999);
        assert!(d < 300.0, "got {d}");
    }

    #[test]
    fn symmetric_in_its_arguments() {
        let a = distance_meters(-6.2, 106.8, -6.21, 106.81);
        let b = distance_meters(-6.21, 106.81, -6.2, 106.8);
        assert!((a - b).abs() < 1e-9);
    }
}
