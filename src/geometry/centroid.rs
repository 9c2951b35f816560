use super::{clamp_position, Geometry, Position};

/// Below this absolute area a polygon is treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-10;

/// Signed area and area-weighted coordinate sums of one ring.
struct Moments {
    area: f64,
    cx: f64,
    cy: f64,
}

fn moments(ring: &[Position]) -> Moments {
    let mut twice_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    // Wraps around, so open rings get their closing edge and closed rings
    // pay a zero-length one.
    for (a, b) in ring.iter().zip(ring.iter().cycle().skip(1)) {
        let cross = a[0] * b[1] - b[0] * a[1];
        twice_area += cross;
        cx += (a[0] + b[0]) * cross;
        cy += (a[1] + b[1]) * cross;
    }

    Moments {
        area: twice_area / 2.0,
        cx,
        cy,
    }
}

/// Points of a ring without its closing duplicate.
fn distinct_points(ring: &[Position]) -> &[Position] {
    match ring {
        [first, rest @ .., last] if !rest.is_empty() && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

fn mean<'a>(points: impl Iterator<Item = &'a Position>) -> Option<Position> {
    let (sum, count) = points.fold(([0.0, 0.0], 0usize), |(sum, n), p| {
        ([sum[0] + p[0], sum[1] + p[1]], n + 1)
    });
    (count > 0).then(|| [sum[0] / count as f64, sum[1] / count as f64])
}

/// Centroid of a single ring, or `None` for an empty ring.
pub fn ring_centroid(ring: &[Position]) -> Option<Position> {
    let m = moments(ring);
    if m.area.abs() < DEGENERATE_AREA {
        return mean(distinct_points(ring).iter()).map(clamp_position);
    }
    Some(clamp_position([
        m.cx / (6.0 * m.area),
        m.cy / (6.0 * m.area),
    ]))
}

/// Visual center of a shape for label placement.
///
/// Holes are ignored. MultiPolygon parts are combined weighted by absolute
/// area, so winding order never matters.
pub fn centroid(geometry: &Geometry) -> Option<Position> {
    let outer = geometry.outer_rings();

    let (area, cx, cy) = outer
        .iter()
        .map(|ring| moments(ring))
        .filter(|m| m.area.abs() >= DEGENERATE_AREA)
        .fold((0.0, 0.0, 0.0), |(a, x, y), m| {
            // m.cx / (6 * m.area) is the part's centroid; weight it by |area|.
            let weight = m.area.abs();
            (
                a + weight,
                x + weight * m.cx / (6.0 * m.area),
                y + weight * m.cy / (6.0 * m.area),
            )
        });

    if area < DEGENERATE_AREA {
        return mean(outer.iter().flat_map(|ring| distinct_points(ring).iter()))
            .map(clamp_position);
    }

    Some(clamp_position([cx / area, cy / area]))
}
