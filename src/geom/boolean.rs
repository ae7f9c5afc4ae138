//! Planar region union for merge groups.
//!
//! Touching footprints are unioned by an outline merge: every edge is split
//! at the points where other edges' endpoints land on it, sub-segments that
//! appear more than once (the interior, shared boundary) cancel out, and the
//! remaining pieces are chained into one closed outline.
//!
//! Degenerate input (disjoint footprints, overlapping interiors, T-junctions
//! shared by three or more plates) does not chain into a single loop; the
//! union then yields `None` and the caller decides what to do with the group.

use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use crate::geom::relations::are_polygons_coplanar;
use crate::geom::EPS;
use std::collections::HashMap;

// Endpoint quantization grid for matching computed points
const KEY_GRID: f64 = 1e7;

type PointKey = (i64, i64, i64);

fn point_key(p: Point) -> PointKey {
    (
        (p.x * KEY_GRID).round() as i64,
        (p.y * KEY_GRID).round() as i64,
        (p.z * KEY_GRID).round() as i64,
    )
}

fn segment_key(a: Point, b: Point) -> (PointKey, PointKey) {
    let (ka, kb) = (point_key(a), point_key(b));
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Unions the footprints of a merge group into one outline polygon.
///
/// Returns `None` when the inputs do not union into a single planar region.
/// The result keeps the orientation of the first input.
pub fn outline_union(polygons: &[&Polygon]) -> Option<Polygon> {
    let first = *polygons.first()?;
    if polygons.len() == 1 {
        return Some(first.clone());
    }
    for poly in &polygons[1..] {
        if !are_polygons_coplanar(first, poly) {
            return None;
        }
    }

    let edges: Vec<(Point, Point)> = polygons.iter().flat_map(|p| p.edges()).collect();
    let endpoints: Vec<Point> = edges.iter().flat_map(|(a, b)| [*a, *b]).collect();

    // Split every edge at the endpoints of other edges lying on it
    let mut pieces: Vec<(Point, Point)> = Vec::new();
    for (a, b) in &edges {
        let d = *b - *a;
        let len = d.length();
        if len < EPS {
            continue;
        }
        let u = d * (1. / len);

        let mut ts = vec![0., len];
        for p in &endpoints {
            let v = *p - *a;
            if v.cross(u).length() < EPS {
                let t = v.dot(u);
                if t > EPS && t < len - EPS {
                    ts.push(t);
                }
            }
        }
        ts.sort_by(|x, y| x.partial_cmp(y).unwrap());
        ts.dedup_by(|x, y| (*x - *y).abs() < EPS);
        for w in ts.windows(2) {
            pieces.push((*a + u * w[0], *a + u * w[1]));
        }
    }

    // Sub-segments appearing more than once lie on a shared boundary
    let mut counts: HashMap<(PointKey, PointKey), usize> = HashMap::new();
    for (a, b) in &pieces {
        *counts.entry(segment_key(*a, *b)).or_insert(0) += 1;
    }
    let mut boundary: Vec<(Point, Point)> = pieces
        .into_iter()
        .filter(|(a, b)| counts[&segment_key(*a, *b)] == 1)
        .collect();
    if boundary.len() < 3 {
        return None;
    }

    // Chain the boundary pieces into one closed loop
    let (start, mut cursor) = boundary.swap_remove(0);
    let mut chain = vec![start, cursor];
    while !boundary.is_empty() {
        let pos = boundary
            .iter()
            .position(|(a, b)| a.is_close(&cursor) || b.is_close(&cursor))?;
        let (a, b) = boundary.swap_remove(pos);
        cursor = if a.is_close(&cursor) { b } else { a };
        chain.push(cursor);
    }
    if !chain.last()?.is_close(&chain[0]) {
        return None;
    }
    chain.pop();

    let outline = drop_collinear(chain);
    let mut merged = Polygon::new(outline).ok()?;
    if merged.normal().dot(first.normal()) < 0. {
        merged = merged.flipped();
    }
    Some(merged)
}

/// Removes vertices that only mark a split inside a straight run.
fn drop_collinear(pts: Vec<Point>) -> Vec<Point> {
    let n = pts.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let here = pts[i];
        let next = pts[(i + 1) % n];
        if (here - prev).cross(next - here).length() > EPS {
            out.push(here);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::IsClose;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::new(vec![
            Point::new(x, y, 0.),
            Point::new(x + size, y, 0.),
            Point::new(x + size, y + size, 0.),
            Point::new(x, y + size, 0.),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_input_passes_through() {
        let a = square(0., 0., 1.);
        let merged = outline_union(&[&a]).unwrap();
        assert!(merged.area().is_close(1.));
    }

    #[test]
    fn test_union_of_two_touching_squares() {
        let a = square(0., 0., 1.);
        let b = square(1., 0., 1.);
        let merged = outline_union(&[&a, &b]).unwrap();
        assert!(merged.area().is_close(2.));
        // Shared edge is gone: the outline is a plain 2x1 rectangle
        assert_eq!(merged.vertices().len(), 4);
    }

    #[test]
    fn test_union_keeps_orientation() {
        let a = square(0., 0., 1.);
        let b = square(1., 0., 1.);
        let merged = outline_union(&[&a, &b]).unwrap();
        assert!(merged.normal().is_close(&a.normal()));
    }

    #[test]
    fn test_union_of_three_in_a_row() {
        let a = square(0., 0., 1.);
        let b = square(1., 0., 1.);
        let c = square(2., 0., 1.);
        let merged = outline_union(&[&a, &b, &c]).unwrap();
        assert!(merged.area().is_close(3.));
    }

    #[test]
    fn test_union_partial_edge_contact() {
        // Small square attached to the middle of a bigger one's edge
        let a = square(0., 0., 2.);
        let b = square(2., 0.5, 1.);
        let merged = outline_union(&[&a, &b]).unwrap();
        assert!(merged.area().is_close(5.));
    }

    #[test]
    fn test_union_of_disjoint_squares_fails() {
        let a = square(0., 0., 1.);
        let b = square(5., 0., 1.);
        assert!(outline_union(&[&a, &b]).is_none());
    }

    #[test]
    fn test_union_of_different_planes_fails() {
        let a = square(0., 0., 1.);
        let b = Polygon::new(vec![
            Point::new(1., 0., 1.),
            Point::new(2., 0., 1.),
            Point::new(2., 1., 1.),
            Point::new(1., 1., 1.),
        ])
        .unwrap();
        assert!(outline_union(&[&a, &b]).is_none());
    }

    #[test]
    fn test_union_empty_input() {
        assert!(outline_union(&[]).is_none());
    }
}
