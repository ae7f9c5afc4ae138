//! Boundary relations between floor-plate polygons.
//!
//! The adjacency detector only needs one relation: two footprints share a
//! boundary when they are coplanar and their outlines overlap along a
//! segment of positive length. A single-point touch does not count.

use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use crate::geom::EPS;

/// Checks if two polygons lie in the same plane (either orientation).
pub fn are_polygons_coplanar(poly1: &Polygon, poly2: &Polygon) -> bool {
    let (a, b, c, d) = poly1.plane_coefficients();
    for pt in poly2.vertices() {
        let dist = a * pt.x + b * pt.y + c * pt.z + d;
        if dist.abs() > EPS {
            return false;
        }
    }
    true
}

/// Checks if two coplanar polygons share a boundary segment.
pub fn polygons_share_boundary(poly1: &Polygon, poly2: &Polygon) -> bool {
    if !are_polygons_coplanar(poly1, poly2) {
        return false;
    }
    for (a1, a2) in poly1.edges() {
        for (b1, b2) in poly2.edges() {
            if collinear_overlap_length(a1, a2, b1, b2) > EPS {
                return true;
            }
        }
    }
    false
}

/// Length of the collinear overlap between segments a1-a2 and b1-b2.
///
/// Returns 0.0 when the segments are not collinear or only meet at a point.
pub fn collinear_overlap_length(a1: Point, a2: Point, b1: Point, b2: Point) -> f64 {
    let d = a2 - a1;
    let len = d.length();
    if len < EPS {
        return 0.;
    }
    let u = d * (1. / len);

    // Both endpoints of b must lie on the line through a1-a2
    for p in [b1, b2] {
        if (p - a1).cross(u).length() > EPS {
            return 0.;
        }
    }

    let t1 = (b1 - a1).dot(u);
    let t2 = (b2 - a1).dot(u);
    let (lo, hi) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
    (hi.min(len) - lo.max(0.)).max(0.)
}
