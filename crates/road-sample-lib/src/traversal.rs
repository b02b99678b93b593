//! Strided traversal of road line geometries
//!
//! A road geometry is walked vertex by vertex and every `step`-th pair of adjacent
//! vertices becomes a candidate sample. The stride is over vertices, not over physical
//! distance; spacing in kilometres is enforced later by the [`crate::SampleFilter`].

use crate::azimuth::segment_sample;
use crate::{Result, Sample, SampleError};
use geo::{Geometry, LineString, MultiLineString};
use std::num::NonZeroUsize;

/// Default vertex stride
pub const DEFAULT_STEP: usize = 5;

/// Walk a repository geometry and emit its candidate samples
///
/// Only `LineString` and `MultiLineString` geometries describe roads. Any other variant
/// yields [`SampleError::UnsupportedGeometry`], and a zero `step` yields
/// [`SampleError::InvalidStep`]; both are recoverable and mean "contributes nothing".
pub fn traverse_geometry(geometry: &Geometry<f64>, step: usize) -> Result<Vec<Sample>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("traversal::traverse_geometry");

    let step = NonZeroUsize::new(step).ok_or(SampleError::InvalidStep(step))?;

    match geometry {
        Geometry::LineString(line) => Ok(traverse_line_string(line, step)),
        Geometry::MultiLineString(lines) => Ok(traverse_multi_line_string(lines, step)),
        other => Err(SampleError::UnsupportedGeometry(geometry_kind(other))),
    }
}

/// Candidate samples of a single polyline
///
/// For N vertices this visits i = 0, step, 2*step, ... while i <= N-2 and pairs vertex i
/// with vertex i+1, producing `ceil((N-1) / step)` samples. Fewer than two vertices
/// produce nothing. Pairs with non-finite ordinates are skipped.
pub fn traverse_line_string(line: &LineString<f64>, step: NonZeroUsize) -> Vec<Sample> {
    let coords = &line.0;
    let len = coords.len();
    if len < 2 {
        tracing::debug!("Skipping degenerate polyline with {} vertices", len);
        return Vec::new();
    }

    (0..len - 1)
        .step_by(step.get())
        .filter_map(|i| {
            let from = coords[i];
            let to = coords[(i + 1).min(len - 1)];
            match segment_sample(from, to) {
                Ok(sample) => Some(sample),
                Err(e) => {
                    tracing::warn!("Skipping segment {}: {}", i, e);
                    None
                }
            }
        })
        .collect()
}

/// Candidate samples of every component, in input order
pub fn traverse_multi_line_string(lines: &MultiLineString<f64>, step: NonZeroUsize) -> Vec<Sample> {
    lines
        .iter()
        .flat_map(|line| traverse_line_string(line, step))
        .collect()
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, Point, line_string};

    fn step(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn straight_line(len: usize) -> LineString<f64> {
        (0..len)
            .map(|i| Coord {
                x: -0.1278 + i as f64 * 0.001,
                y: 51.5074 + i as f64 * 0.001,
            })
            .collect()
    }

    #[test]
    fn test_right_angle_step_one() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0)];
        let samples = traverse_line_string(&line, step(1));

        assert_eq!(
            samples,
            vec![
                Sample::new(0.0, Coord { x: 0.0, y: 0.5 }),
                Sample::new(90.0, Coord { x: 0.5, y: 1.0 }),
            ]
        );
    }

    #[test]
    fn test_candidate_count_matches_stride() {
        for len in 2..40 {
            for s in 1..8 {
                let samples = traverse_line_string(&straight_line(len), step(s));
                let expected = (len - 1).div_ceil(s);
                assert_eq!(samples.len(), expected, "len={len} step={s}");
            }
        }
    }

    #[test]
    fn test_stride_pairs_adjacent_vertices() {
        let line = line_string![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 0.0),
            (x: 2.0, y: 0.0),
        ];
        let samples = traverse_line_string(&line, step(2));

        // i = 0 -> (0,0)-(0,1), i = 2 -> (1,1)-(1,0)
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], Sample::new(0.0, Coord { x: 0.0, y: 0.5 }));
        assert_eq!(samples[1], Sample::new(180.0, Coord { x: 1.0, y: 0.5 }));
    }

    #[test]
    fn test_degenerate_lines_yield_nothing() {
        assert!(traverse_line_string(&LineString::new(vec![]), step(1)).is_empty());
        assert!(traverse_line_string(&line_string![(x: 1.0, y: 1.0)], step(1)).is_empty());
    }

    #[test]
    fn test_non_finite_pairs_are_skipped() {
        let line = line_string![
            (x: 0.0, y: 0.0),
            (x: f64::NAN, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 2.0),
        ];
        let samples = traverse_line_string(&line, step(1));

        // Both segments touching the NaN vertex are dropped
        assert_eq!(samples, vec![Sample::new(0.0, Coord { x: 1.0, y: 1.5 })]);
    }

    #[test]
    fn test_multi_line_string_keeps_component_order() {
        let first = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0)];
        let second = line_string![(x: 5.0, y: 5.0), (x: 6.0, y: 5.0)];
        let multi = MultiLineString::new(vec![first, second]);

        let samples = traverse_multi_line_string(&multi, step(5));
        assert_eq!(
            samples,
            vec![
                Sample::new(0.0, Coord { x: 0.0, y: 0.5 }),
                Sample::new(90.0, Coord { x: 5.5, y: 5.0 }),
            ]
        );
    }

    #[test]
    fn test_multi_line_string_with_degenerate_component() {
        let valid = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0)];
        let single_point = line_string![(x: 3.0, y: 3.0)];
        let geometry = Geometry::MultiLineString(MultiLineString::new(vec![valid, single_point]));

        let samples = traverse_geometry(&geometry, 1).unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_unsupported_geometry() {
        let geometry = Geometry::Point(Point::new(1.0, 2.0));
        assert!(matches!(
            traverse_geometry(&geometry, DEFAULT_STEP),
            Err(SampleError::UnsupportedGeometry("Point"))
        ));
    }

    #[test]
    fn test_zero_step_rejected() {
        let geometry = Geometry::LineString(straight_line(10));
        assert!(matches!(
            traverse_geometry(&geometry, 0),
            Err(SampleError::InvalidStep(0))
        ));
    }
}
