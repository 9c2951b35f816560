//! Plot boundary geometry: GeoJSON-shaped polygons, coordinate normalization
//! and centroids for label placement.

mod centroid;
mod normalize;

pub use centroid::{centroid, ring_centroid};
pub use normalize::{is_valid, normalize, normalize_position, normalize_ring};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longitude bound in degrees.
pub const MAX_LNG: f64 = 180.0;
/// Latitude bound in degrees.
pub const MAX_LAT: f64 = 90.0;
/// How far past the bounds a coordinate may stray before it is rejected
/// instead of clamped.
pub const BOUNDS_TOLERANCE: f64 = 0.1;
/// Largest per-axis gap at which a ring still counts as closed.
pub const CLOSE_EPSILON: f64 = 1e-10;
/// Smallest valid ring: a triangle plus its closing point.
pub const MIN_RING_POINTS: usize = 4;

/// A `[lng, lat]` pair, in GeoJSON axis order.
pub type Position = [f64; 2];

/// A linear ring of positions.
pub type Ring = Vec<Position>;

/// Boundary of a plot.
///
/// Serializes as a GeoJSON geometry object:
/// `{"type": "Polygon", "coordinates": [[[lng, lat], ...]]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Outer ring followed by any holes.
    Polygon(Vec<Ring>),
    /// One ring list per part.
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Every ring of the shape, outer rings and holes alike.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            Geometry::Polygon(rings) => Box::new(rings.iter()),
            Geometry::MultiPolygon(parts) => Box::new(parts.iter().flatten()),
        }
    }

    /// The outer ring of each polygon part.
    pub fn outer_rings(&self) -> Vec<&Ring> {
        match self {
            Geometry::Polygon(rings) => rings.first().into_iter().collect(),
            Geometry::MultiPolygon(parts) => parts.iter().filter_map(|p| p.first()).collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

/// Why a shape was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Geometry has no rings")]
    Empty,

    #[error("Ring {ring} has {len} points, at least {MIN_RING_POINTS} required")]
    TooFewPoints { ring: usize, len: usize },

    #[error("Ring {ring} point {index} is out of range or not finite: [{lng}, {lat}]")]
    InvalidPosition {
        ring: usize,
        index: usize,
        lng: f64,
        lat: f64,
    },
}

/// Clamp a position into the valid geographic range without validating it.
pub(crate) fn clamp_position([lng, lat]: Position) -> Position {
    [lng.clamp(-MAX_LNG, MAX_LNG), lat.clamp(-MAX_LAT, MAX_LAT)]
}
