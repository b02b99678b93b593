//! The survey sample produced by the pipeline

use geo::{Coord, Point};

/// One (bearing, point) pair slated for a street-level photograph
///
/// The bearing is the compass direction, in degrees clockwise from north, from the first
/// to the second vertex of the road segment that produced this sample. The midpoint is
/// that segment's midpoint in WGS84 (`x` = longitude, `y` = latitude).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Bearing in degrees, always within [0, 360)
    pub bearing: f64,
    /// Segment midpoint (longitude, latitude)
    pub midpoint: Coord<f64>,
}

impl Sample {
    /// Create a new sample
    pub fn new(bearing: f64, midpoint: Coord<f64>) -> Self {
        Self { bearing, midpoint }
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.midpoint.x
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.midpoint.y
    }

    /// The midpoint as a `geo::Point` (x = longitude, y = latitude)
    #[inline]
    pub fn point(&self) -> Point<f64> {
        Point::from(self.midpoint)
    }

    /// Flat `(bearing, (longitude, latitude))` form consumed by the survey loop
    #[inline]
    pub fn as_tuple(&self) -> (f64, (f64, f64)) {
        (self.bearing, (self.midpoint.x, self.midpoint.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let sample = Sample::new(45.0, Coord { x: -3.7, y: 40.4 });
        assert_eq!(sample.longitude(), -3.7);
        assert_eq!(sample.latitude(), 40.4);
        assert_eq!(sample.point(), Point::new(-3.7, 40.4));
        assert_eq!(sample.as_tuple(), (45.0, (-3.7, 40.4)));
    }

    #[test]
    fn test_structural_equality() {
        let a = Sample::new(90.0, Coord { x: 0.5, y: 1.0 });
        let b = Sample::new(90.0, Coord { x: 0.5, y: 1.0 });
        let c = Sample::new(90.5, Coord { x: 0.5, y: 1.0 });
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
