use crate::geom::vector::Vector;
use crate::geom::EPS;
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns true if both points are very close to each other.
    pub fn is_close(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPS
            && (self.y - other.y).abs() < EPS
            && (self.z - other.z).abs() < EPS
    }

    /// Returns the bounding box of a set of points as (min, max).
    pub fn bounding_box(pts: &[Point]) -> Option<(Point, Point)> {
        let first = pts.first()?;
        let mut pmin = *first;
        let mut pmax = *first;
        for p in pts.iter().skip(1) {
            pmin.x = pmin.x.min(p.x);
            pmin.y = pmin.y.min(p.y);
            pmin.z = pmin.z.min(p.z);
            pmax.x = pmax.x.max(p.x);
            pmax.y = pmax.y.max(p.y);
            pmax.z = pmax.z.max(p.z);
        }
        Some((pmin, pmax))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Point({:.prec$}, {:.prec$}, {:.prec$})",
            self.x,
            self.y,
            self.z,
            prec = prec
        )
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, other: Vector) -> Self {
        Self {
            x: self.x + other.dx,
            y: self.y + other.dy,
            z: self.z + other.dz,
        }
    }
}

// Difference of two points is a vector
impl Sub for Point {
    type Output = Vector;
    fn sub(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close() {
        let pa = Point::new(5., 5., 5.);
        let pb = Point::new(5. + EPS / 10., 5., 5.);
        let pc = Point::new(5.0001, 5., 5.);
        assert!(pa.is_close(&pb));
        assert!(!pa.is_close(&pc));
    }

    #[test]
    fn test_add_vector() {
        let p = Point::new(1., 2., 3.);
        let moved = p + Vector::new(0., 0., 2.5);
        assert!(moved.is_close(&Point::new(1., 2., 5.5)));
    }

    #[test]
    fn test_sub_points() {
        let v = Point::new(3., 2., 1.) - Point::new(1., 1., 1.);
        assert!(v.is_close(&Vector::new(2., 1., 0.)));
    }

    #[test]
    fn test_bounding_box() {
        let pts = vec![
            Point::new(1., 5., -1.),
            Point::new(-2., 0., 3.),
            Point::new(0., 2., 0.),
        ];
        let (pmin, pmax) = Point::bounding_box(&pts).unwrap();
        assert!(pmin.is_close(&Point::new(-2., 0., -1.)));
        assert!(pmax.is_close(&Point::new(1., 5., 3.)));
        assert!(Point::bounding_box(&[]).is_none());
    }
}
