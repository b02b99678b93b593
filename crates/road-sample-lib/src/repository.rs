//! Geometry repositories: where road features come from
//!
//! The pipeline only depends on the [`GeometryRepository`] trait. Two implementations
//! are provided: [`MemoryRepository`], holding features in memory, and
//! [`GpxRepository`], which reads road features from GPX files.

use crate::Result;
use geo::{Geometry, LineString, MultiLineString};
use rayon::prelude::*;
use std::io::Read;
use std::path::Path;

/// A road feature as stored in a repository
#[derive(Clone, Debug, PartialEq)]
pub struct RoadFeature {
    /// Road reference name (e.g. "A-7")
    pub reference: Option<String>,
    /// Region identifier (e.g. an ISO 3166-2 subdivision code)
    pub region: Option<String>,
    /// Line geometry in WGS84; may be missing for broken rows
    pub geometry: Option<Geometry<f64>>,
}

impl RoadFeature {
    /// Create a feature with all fields present
    pub fn new(
        reference: impl Into<String>,
        region: impl Into<String>,
        geometry: impl Into<Geometry<f64>>,
    ) -> Self {
        Self {
            reference: Some(reference.into()),
            region: Some(region.into()),
            geometry: Some(geometry.into()),
        }
    }

    /// Check whether this feature passes the optional reference and region filters
    ///
    /// An absent or empty filter matches everything on its axis; any other filter must be
    /// equal to the stored value, whitespace included.
    pub fn matches(&self, reference: Option<&str>, region: Option<&str>) -> bool {
        field_matches(self.reference.as_deref(), reference)
            && field_matches(self.region.as_deref(), region)
    }
}

fn field_matches(value: Option<&str>, filter: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(wanted) => value == Some(wanted),
    }
}

/// Source of road features, filtered by reference and region
pub trait GeometryRepository {
    /// Fetch all features matching the optional filters, in storage order
    ///
    /// `None` means "unfiltered" on that axis. An empty result is not an error.
    fn fetch(&self, reference: Option<&str>, region: Option<&str>) -> Result<Vec<RoadFeature>>;
}

impl<R: GeometryRepository + ?Sized> GeometryRepository for &R {
    fn fetch(&self, reference: Option<&str>, region: Option<&str>) -> Result<Vec<RoadFeature>> {
        (**self).fetch(reference, region)
    }
}

/// In-memory repository
#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    features: Vec<RoadFeature>,
}

impl MemoryRepository {
    pub fn new(features: Vec<RoadFeature>) -> Self {
        Self { features }
    }

    pub fn push(&mut self, feature: RoadFeature) {
        self.features.push(feature);
    }

    #[inline]
    pub fn features(&self) -> &[RoadFeature] {
        &self.features
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl GeometryRepository for MemoryRepository {
    fn fetch(&self, reference: Option<&str>, region: Option<&str>) -> Result<Vec<RoadFeature>> {
        Ok(self
            .features
            .iter()
            .filter(|feature| feature.matches(reference, region))
            .cloned()
            .collect())
    }
}

/// Repository backed by GPX data
///
/// Every GPX track becomes one feature: the track name is the road reference, the track
/// `type` is the region, and the track segments form a `MultiLineString`. Every GPX route
/// becomes a `LineString` feature the same way. Tracks without segments and routes
/// without points are kept with a missing geometry.
#[derive(Clone, Debug, Default)]
pub struct GpxRepository {
    inner: MemoryRepository,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl GpxRepository {
    /// Build a repository from already parsed GPX data
    pub fn from_gpx(gpx: &gpx::Gpx) -> Self {
        let mut repository = Self::default();
        repository.add_gpx(gpx);
        repository
    }

    /// Parse GPX from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let gpx = gpx::read(reader)?;
        Ok(Self::from_gpx(&gpx))
    }

    /// Load GPX files in parallel
    ///
    /// Features are appended in the order of `paths`, regardless of which file finishes
    /// parsing first. Any unreadable or invalid file fails the whole load.
    pub fn load_from_files<P: AsRef<Path> + Send + Sync>(paths: Vec<P>) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("repository::load_from_files");

        let gpx_data_vec: Result<Vec<gpx::Gpx>> = paths
            .into_par_iter()
            .map(|path| {
                let file = std::fs::File::open(path.as_ref())?;
                let reader = std::io::BufReader::new(file);
                Ok(gpx::read(reader)?)
            })
            .collect();

        let mut repository = Self::default();
        for gpx in &gpx_data_vec? {
            repository.add_gpx(gpx);
        }

        tracing::info!("Loaded {} road features from GPX", repository.len());
        Ok(repository)
    }

    /// Append the tracks and routes of a GPX document
    pub fn add_gpx(&mut self, gpx: &gpx::Gpx) {
        for track in &gpx.tracks {
            self.inner.push(track_feature(track));
        }
        for route in &gpx.routes {
            self.inner.push(route_feature(route));
        }
    }

    #[inline]
    pub fn features(&self) -> &[RoadFeature] {
        self.inner.features()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl GeometryRepository for GpxRepository {
    fn fetch(&self, reference: Option<&str>, region: Option<&str>) -> Result<Vec<RoadFeature>> {
        self.inner.fetch(reference, region)
    }
}

fn waypoints_to_line_string(points: &[gpx::Waypoint]) -> LineString<f64> {
    points.iter().map(|waypoint| waypoint.point().0).collect()
}

fn track_feature(track: &gpx::Track) -> RoadFeature {
    let geometry = (!track.segments.is_empty()).then(|| {
        let lines: Vec<LineString<f64>> = track
            .segments
            .iter()
            .map(|segment| waypoints_to_line_string(&segment.points))
            .collect();
        Geometry::MultiLineString(MultiLineString::new(lines))
    });

    RoadFeature {
        reference: track.name.clone(),
        region: track.type_.clone(),
        geometry,
    }
}

fn route_feature(route: &gpx::Route) -> RoadFeature {
    let geometry = (!route.points.is_empty())
        .then(|| Geometry::LineString(waypoints_to_line_string(&route.points)));

    RoadFeature {
        reference: route.name.clone(),
        region: route.type_.clone(),
        geometry,
    }
}
