//! Spherical distance and polygon containment on longitude/latitude degrees.

/// Mean Earth radius in km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in km between two `(longitude, latitude)` points.
pub fn haversine_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Ray-casting containment test.
///
/// `polygon` is a ring of `[longitude, latitude]` vertices; closing the ring
/// is optional. Fewer than three vertices never contain anything.
pub fn polygon_contains(polygon: &[[f64; 2]], lon: f64, lat: f64) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn haversine_zero_distance() {
        assert_abs_diff_eq!(haversine_km(12.5, 41.9, 12.5, 41.9), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn haversine_one_degree_on_equator() {
        // 2πR / 360
        assert_abs_diff_eq!(haversine_km(0.0, 0.0, 1.0, 0.0), 111.195, epsilon = 1e-3);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = haversine_km(-70.6, -33.4, 139.7, 35.7);
        let b = haversine_km(139.7, 35.7, -70.6, -33.4);
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }

    #[test]
    fn polygon_square() {
        let square = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        assert!(polygon_contains(&square, 5.0, 5.0));
        assert!(!polygon_contains(&square, 15.0, 5.0));
        assert!(!polygon_contains(&square, 5.0, -1.0));
    }

    #[test]
    fn polygon_degenerate() {
        assert!(!polygon_contains(&[[0.0, 0.0], [1.0, 1.0]], 0.5, 0.5));
    }
}
