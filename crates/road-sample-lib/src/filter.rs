//! Minimum-distance deduplication of candidate samples

use crate::Sample;
use geo::{Coord, Distance, Geodesic, Point};

/// Default minimum spacing between retained samples, in kilometres
pub const DEFAULT_MIN_DISTANCE_KM: f64 = 2.0;

/// Geodesic (WGS84 ellipsoid) distance between two coordinates in kilometres
#[inline]
pub fn geodesic_distance_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Geodesic.distance(Point::from(a), Point::from(b)) / 1000.0
}

/// Reduces an ordered candidate list to the samples worth photographing
///
/// Implementations must preserve the relative order of the samples they keep, since
/// downstream consumers index results by position.
pub trait SampleFilter {
    fn filter(&self, candidates: Vec<Sample>) -> Vec<Sample>;
}

/// Greedy left-to-right minimum-distance filter
///
/// A candidate is kept iff its midpoint is at least `min_distance_km` away from the
/// midpoint of every sample kept so far; rejected candidates are never reconsidered.
/// The threshold is inclusive.
///
/// Every candidate is compared against every accepted sample, so the cost is
/// O(candidates × accepted). That is fine for a single road (tens to hundreds of
/// candidates) but does not scale to whole networks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedyDistanceFilter {
    pub min_distance_km: f64,
}

impl GreedyDistanceFilter {
    pub fn new(min_distance_km: f64) -> Self {
        Self { min_distance_km }
    }

    fn is_far_enough(&self, accepted: &[Sample], candidate: &Sample) -> bool {
        accepted.iter().all(|prev| {
            geodesic_distance_km(prev.midpoint, candidate.midpoint) >= self.min_distance_km
        })
    }
}

impl Default for GreedyDistanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DISTANCE_KM)
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl SampleFilter for GreedyDistanceFilter {
    fn filter(&self, candidates: Vec<Sample>) -> Vec<Sample> {
        let total = candidates.len();
        let mut accepted: Vec<Sample> = Vec::new();

        for candidate in candidates {
            if self.is_far_enough(&accepted, &candidate) {
                accepted.push(candidate);
            }
        }

        tracing::debug!(
            "Distance filter kept {} of {} candidates (min {} km)",
            accepted.len(),
            total,
            self.min_distance_km
        );
        accepted
    }
}
