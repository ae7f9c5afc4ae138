use crate::geom::point::Point;
use crate::geom::vector::Vector;
use crate::geom::EPS;
use anyhow::{anyhow, Result};

/// A planar polygon, the footprint of one floor-plate element.
///
/// Vertices are stored in order; the unit normal follows the winding
/// (right-hand rule). Construction validates planarity and non-degeneracy,
/// so every `Polygon` in the system has a well-defined area and plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pts: Vec<Point>,
    vn: Vector,
}

impl Polygon {
    pub fn new(pts: Vec<Point>) -> Result<Self> {
        if pts.len() < 3 {
            return Err(anyhow!("Polygon needs at least 3 points, got {}", pts.len()));
        }
        for (i, pt) in pts.iter().enumerate() {
            let next = &pts[(i + 1) % pts.len()];
            if pt.is_close(next) {
                return Err(anyhow!("Polygon has duplicate consecutive points: {}", pt));
            }
        }

        // Newell's method: works for convex and concave polygons alike
        let mut n = Vector::new(0., 0., 0.);
        for i in 0..pts.len() {
            let p = pts[i];
            let q = pts[(i + 1) % pts.len()];
            n.dx += (p.y - q.y) * (p.z + q.z);
            n.dy += (p.z - q.z) * (p.x + q.x);
            n.dz += (p.x - q.x) * (p.y + q.y);
        }
        let vn = n
            .normalize()
            .ok_or_else(|| anyhow!("Polygon is degenerate (zero area or collinear points)"))?;

        // All points must lie in the plane of the first three
        let p0 = pts[0];
        for pt in &pts[1..] {
            let dist = (*pt - p0).dot(vn);
            if dist.abs() > EPS {
                return Err(anyhow!("Polygon points are not coplanar (offset {})", dist));
            }
        }

        Ok(Self { pts, vn })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.pts
    }

    /// Unit normal following the vertex winding.
    pub fn normal(&self) -> Vector {
        self.vn
    }

    /// Consecutive vertex pairs, wrapping around to the start.
    pub fn edges(&self) -> Vec<(Point, Point)> {
        (0..self.pts.len())
            .map(|i| (self.pts[i], self.pts[(i + 1) % self.pts.len()]))
            .collect()
    }

    /// Plane equation coefficients (a, b, c, d): a*x + b*y + c*z + d = 0.
    pub fn plane_coefficients(&self) -> (f64, f64, f64, f64) {
        let p0 = self.pts[0];
        let d = -(self.vn.dx * p0.x + self.vn.dy * p0.y + self.vn.dz * p0.z);
        (self.vn.dx, self.vn.dy, self.vn.dz, d)
    }

    pub fn area(&self) -> f64 {
        let proj = self.project_all();
        let mut doubled = 0.;
        for i in 0..proj.len() {
            let (x0, y0) = proj[i];
            let (x1, y1) = proj[(i + 1) % proj.len()];
            doubled += x0 * y1 - x1 * y0;
        }
        (doubled / 2.).abs()
    }

    /// Area centroid (not the vertex mean, which drifts for concave shapes).
    pub fn centroid(&self) -> Point {
        let proj = self.project_all();
        let mut doubled = 0.;
        let mut cx = 0.;
        let mut cy = 0.;
        for i in 0..proj.len() {
            let (x0, y0) = proj[i];
            let (x1, y1) = proj[(i + 1) % proj.len()];
            let w = x0 * y1 - x1 * y0;
            doubled += w;
            cx += (x0 + x1) * w;
            cy += (y0 + y1) * w;
        }
        if doubled.abs() < EPS {
            // Cannot happen after validation, but do not divide by zero
            return self.pts[0];
        }
        cx /= 3. * doubled;
        cy /= 3. * doubled;
        let (u, v) = self.plane_basis();
        self.pts[0] + u * cx + v * cy
    }

    /// Returns a copy moved by `vec`.
    pub fn translated(&self, vec: Vector) -> Self {
        Self {
            pts: self.pts.iter().map(|p| *p + vec).collect(),
            vn: self.vn,
        }
    }

    /// Returns a copy with reversed winding (normal points the other way).
    pub fn flipped(&self) -> Self {
        let mut pts = self.pts.clone();
        pts.reverse();
        Self {
            pts,
            vn: self.vn * -1.,
        }
    }

    /// Checks whether a point lies within the polygon (in its plane).
    ///
    /// `include_boundary` controls how points exactly on an edge are counted.
    pub fn is_point_inside(&self, ptest: Point, include_boundary: bool) -> bool {
        // Must be on the plane at all
        if (ptest - self.pts[0]).dot(self.vn).abs() > EPS {
            return false;
        }

        let proj = self.project_all();
        let (px, py) = self.project(ptest);

        // Boundary test edge by edge
        for i in 0..proj.len() {
            let (x0, y0) = proj[i];
            let (x1, y1) = proj[(i + 1) % proj.len()];
            let cross = (x1 - x0) * (py - y0) - (y1 - y0) * (px - x0);
            if cross.abs() < EPS {
                let dot = (px - x0) * (x1 - x0) + (py - y0) * (y1 - y0);
                let len_sq = (x1 - x0).powi(2) + (y1 - y0).powi(2);
                if dot >= -EPS && dot <= len_sq + EPS {
                    return include_boundary;
                }
            }
        }

        // Even-odd ray crossing in the plane
        let mut inside = false;
        for i in 0..proj.len() {
            let (x0, y0) = proj[i];
            let (x1, y1) = proj[(i + 1) % proj.len()];
            if (y0 > py) != (y1 > py) {
                let t = (py - y0) / (y1 - y0);
                let xint = x0 + t * (x1 - x0);
                if xint > px {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Orthonormal basis (u, v) spanning the polygon's plane.
    fn plane_basis(&self) -> (Vector, Vector) {
        // Safe to unwrap: consecutive duplicates were rejected in new()
        let u = (self.pts[1] - self.pts[0]).normalize().unwrap();
        let v = self.vn.cross(u);
        (u, v)
    }

    /// Projects a point into the (u, v) plane coordinates.
    fn project(&self, pt: Point) -> (f64, f64) {
        let (u, v) = self.plane_basis();
        let d = pt - self.pts[0];
        (d.dot(u), d.dot(v))
    }

    fn project_all(&self) -> Vec<(f64, f64)> {
        let (u, v) = self.plane_basis();
        self.pts
            .iter()
            .map(|pt| {
                let d = *pt - self.pts[0];
                (d.dot(u), d.dot(v))
            })
            .collect()
    }
}
