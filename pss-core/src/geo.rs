use serde::{Deserialize, Serialize};

/// Axis-aligned latitude/longitude box around a watershed.
///
/// Only used for coarse point-in-watershed tests; polygon geometry is
/// the map renderer's concern.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Inclusive on all four bounds.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }

    pub fn contains_point<P: Located + ?Sized>(&self, point: &P) -> bool {
        self.contains(point.latitude(), point.longitude())
    }
}

/// Anything with a point position in decimal degrees.
pub trait Located {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::BoundingBox;

    const BOX: BoundingBox = BoundingBox {
        min_lat: 48.0,
        max_lat: 49.0,
        min_lon: -123.0,
        max_lon: -122.0,
    };

    #[test]
    fn test_contains_interior() {
        assert!(BOX.contains(48.5, -122.5));
    }

    #[test]
    fn test_contains_is_inclusive_on_every_edge() {
        assert!(BOX.contains(48.0, -122.5));
        assert!(BOX.contains(49.0, -122.5));
        assert!(BOX.contains(48.5, -123.0));
        assert!(BOX.contains(48.5, -122.0));
        assert!(BOX.contains(49.0, -122.0));
    }

    #[test]
    fn test_contains_outside() {
        assert!(!BOX.contains(47.99, -122.5));
        assert!(!BOX.contains(48.5, -121.99));
        assert!(!BOX.contains(f64::NAN, -122.5));
    }
}
