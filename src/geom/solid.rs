use crate::geom::point::Point;
use crate::geom::polygon::Polygon;
use crate::geom::vector::Vector;
use crate::geom::EPS;
use anyhow::{anyhow, Result};
use std::collections::HashMap;

/// A 3D solid bounded by planar face polygons.
///
/// Volumes of rooms are built by extruding a floor footprint upwards; the
/// constructor orients all faces outwards so the enclosed volume is
/// well-defined. Solids assembled from arbitrary faces may be open; open
/// solids report `is_closed() == false` and their volume is meaningless.
#[derive(Debug, Clone)]
pub struct Solid {
    polygons: Vec<Polygon>,
}

impl Solid {
    pub fn new(polygons: Vec<Polygon>) -> Result<Self> {
        if polygons.len() < 4 {
            return Err(anyhow!(
                "Solid needs at least 4 faces, got {}",
                polygons.len()
            ));
        }
        Ok(Self { polygons })
    }

    /// Extrudes a floor footprint vertically into a closed solid.
    ///
    /// The footprint may have either winding; faces of the result always
    /// point outwards (floor down, ceiling up).
    pub fn extrude(footprint: &Polygon, height: f64) -> Result<Self> {
        if height < EPS {
            return Err(anyhow!("Extrusion height must be positive: {}", height));
        }
        let vn = footprint.normal();
        if vn.dz.abs() < EPS {
            return Err(anyhow!("Cannot extrude a vertical footprint"));
        }

        // Work with the footprint wound counter-clockwise seen from above
        let base = if vn.dz > 0. {
            footprint.clone()
        } else {
            footprint.flipped()
        };
        let up = Vector::new(0., 0., height);

        let mut faces = vec![base.flipped(), base.translated(up)];
        for (p0, p1) in base.edges() {
            faces.push(Polygon::new(vec![p0, p1, p1 + up, p0 + up])?);
        }
        Ok(Self { polygons: faces })
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// All face vertices (with repetitions across faces).
    pub fn vertices(&self) -> Vec<Point> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices().iter().copied())
            .collect()
    }

    /// Enclosed volume via the divergence theorem.
    ///
    /// Valid for closed solids with outward-oriented faces; the sign follows
    /// the orientation, so callers interested in magnitude take `abs()`.
    pub fn volume(&self) -> f64 {
        self.polygons
            .iter()
            .map(|p| {
                let c = p.centroid();
                let n = p.normal();
                Vector::new(c.x, c.y, c.z).dot(n) * p.area() / 3.
            })
            .sum()
    }

    /// A solid is closed when every edge is shared by exactly two faces.
    pub fn is_closed(&self) -> bool {
        let mut counts: HashMap<(PointKey, PointKey), usize> = HashMap::new();
        for poly in &self.polygons {
            for (a, b) in poly.edges() {
                *counts.entry(edge_key(a, b)).or_insert(0) += 1;
            }
        }
        counts.values().all(|&c| c == 2)
    }

    /// Lowest and highest vertical coordinate over all vertices.
    pub fn z_extremes(&self) -> Option<(f64, f64)> {
        let zs: Vec<f64> = self.vertices().iter().map(|p| p.z).collect();
        let first = *zs.first()?;
        let (mut lo, mut hi) = (first, first);
        for z in zs {
            lo = lo.min(z);
            hi = hi.max(z);
        }
        Some((lo, hi))
    }

    pub fn bbox(&self) -> Option<(Point, Point)> {
        Point::bounding_box(&self.vertices())
    }

    /// Checks if a point lies inside the solid using ray casting.
    ///
    /// Rays are cast in several directions and the majority vote wins, which
    /// keeps edge-grazing rays from flipping the result.
    pub fn is_point_inside(&self, ptest: Point) -> bool {
        let Some((bmin, bmax)) = self.bbox() else {
            return false;
        };
        if ptest.x < bmin.x - EPS
            || ptest.x > bmax.x + EPS
            || ptest.y < bmin.y - EPS
            || ptest.y > bmax.y + EPS
            || ptest.z < bmin.z - EPS
            || ptest.z > bmax.z + EPS
        {
            return false;
        }

        let diag = (bmax - bmin).length();
        let directions = [
            Vector::new(1., 0., 0.),
            Vector::new(0., 1., 0.),
            Vector::new(0., 0., 1.),
            Vector::new(1., 1., 1.),
        ];

        let mut inside_votes = 0;
        for dir in directions {
            let ray_end = ptest + dir.normalize().unwrap() * (diag * 2. + 10.);
            let crossings = self
                .polygons
                .iter()
                .filter(|poly| segment_crosses_polygon(ptest, ray_end, poly))
                .count();
            if crossings % 2 == 1 {
                inside_votes += 1;
            }
        }
        inside_votes > directions.len() / 2
    }
}

type PointKey = (i64, i64, i64);

fn point_key(p: Point) -> PointKey {
    const GRID: f64 = 1e7;
    (
        (p.x * GRID).round() as i64,
        (p.y * GRID).round() as i64,
        (p.z * GRID).round() as i64,
    )
}

fn edge_key(a: Point, b: Point) -> (PointKey, PointKey) {
    let (ka, kb) = (point_key(a), point_key(b));
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Checks whether the segment from `beg` to `end` crosses the polygon's face.
fn segment_crosses_polygon(beg: Point, end: Point, poly: &Polygon) -> bool {
    let (a, b, c, d) = poly.plane_coefficients();
    let dir = end - beg;
    let denom = a * dir.dx + b * dir.dy + c * dir.dz;
    if denom.abs() < EPS {
        return false; // Parallel to the plane
    }
    let t = -(a * beg.x + b * beg.y + c * beg.z + d) / denom;
    if !(EPS..=1. - EPS).contains(&t) {
        return false;
    }
    let hit = beg + dir * t;
    poly.is_point_inside(hit, true)
}
