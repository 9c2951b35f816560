use super::{
    clamp_position, Geometry, GeometryError, Position, Ring, BOUNDS_TOLERANCE, CLOSE_EPSILON,
    MAX_LAT, MAX_LNG, MIN_RING_POINTS,
};

/// Check a single position and clamp it into range.
///
/// Returns `None` for NaN, infinities, and anything further than
/// [`BOUNDS_TOLERANCE`] outside the valid range.
pub fn normalize_position([lng, lat]: Position) -> Option<Position> {
    if !lng.is_finite() || !lat.is_finite() {
        return None;
    }
    if lng.abs() > MAX_LNG + BOUNDS_TOLERANCE || lat.abs() > MAX_LAT + BOUNDS_TOLERANCE {
        return None;
    }
    Some(clamp_position([lng, lat]))
}

/// Normalize every point of a ring and force it closed.
///
/// An open ring is closed by overwriting its last point with its first, so
/// the point count never changes.
pub fn normalize_ring(ring: &[Position], ring_index: usize) -> Result<Ring, GeometryError> {
    if ring.len() < MIN_RING_POINTS {
        return Err(GeometryError::TooFewPoints {
            ring: ring_index,
            len: ring.len(),
        });
    }

    let mut normalized = ring
        .iter()
        .enumerate()
        .map(|(index, &point)| {
            normalize_position(point).ok_or(GeometryError::InvalidPosition {
                ring: ring_index,
                index,
                lng: point[0],
                lat: point[1],
            })
        })
        .collect::<Result<Ring, _>>()?;

    let first = normalized[0];
    let last_index = normalized.len() - 1;
    let last = normalized[last_index];
    if (first[0] - last[0]).abs() > CLOSE_EPSILON || (first[1] - last[1]).abs() > CLOSE_EPSILON {
        normalized[last_index] = first;
    }

    Ok(normalized)
}

/// Validate and normalize a whole shape.
///
/// Ring indices in errors count across all parts of a MultiPolygon.
pub fn normalize(geometry: &Geometry) -> Result<Geometry, GeometryError> {
    let mut ring_index = 0;
    let mut normalize_rings = |rings: &[Ring]| -> Result<Vec<Ring>, GeometryError> {
        if rings.is_empty() {
            return Err(GeometryError::Empty);
        }
        rings
            .iter()
            .map(|ring| {
                let result = normalize_ring(ring, ring_index);
                ring_index += 1;
                result
            })
            .collect()
    };

    match geometry {
        Geometry::Polygon(rings) => Ok(Geometry::Polygon(normalize_rings(rings.as_slice())?)),
        Geometry::MultiPolygon(parts) => {
            if parts.is_empty() {
                return Err(GeometryError::Empty);
            }
            let parts = parts
                .iter()
                .map(|rings| normalize_rings(rings.as_slice()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::MultiPolygon(parts))
        }
    }
}

/// True when every ring has enough points and every point is in range.
pub fn is_valid(geometry: &Geometry) -> bool {
    let mut rings = geometry.rings().peekable();
    if rings.peek().is_none() {
        return false;
    }
    rings.all(|ring| {
        ring.len() >= MIN_RING_POINTS && ring.iter().all(|&p| normalize_position(p).is_some())
    })
}
