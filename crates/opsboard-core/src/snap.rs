//! Grid snapping for element moves.

use kurbo::Point;

/// Grid unit for move snapping, in world units.
pub const GRID_SIZE: f64 = 10.0;

/// Round a single coordinate to the nearest grid multiple.
pub fn snap_coord(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

/// Round both coordinates of a point to the nearest grid intersection.
pub fn snap_point(point: Point, grid_size: f64) -> Point {
    Point::new(snap_coord(point.x, grid_size), snap_coord(point.y, grid_size))
}

/// Snap a point when enabled, pass it through otherwise.
///
/// Snapping happens after delta application, per axis, so a rigid multi-element
/// move can land each member on its own nearest grid line.
pub fn maybe_snap(point: Point, enabled: bool) -> Point {
    if enabled {
        snap_point(point, GRID_SIZE)
    } else {
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_coord() {
        assert_eq!(snap_coord(23.0, 10.0), 20.0);
        assert_eq!(snap_coord(25.0, 10.0), 30.0);
        assert_eq!(snap_coord(-14.0, 10.0), -10.0);
    }

    #[test]
    fn test_snap_point_exact() {
        let p = snap_point(Point::new(40.0, 60.0), 10.0);
        assert_eq!(p, Point::new(40.0, 60.0));
    }

    #[test]
    fn test_maybe_snap_disabled() {
        let p = maybe_snap(Point::new(23.0, 47.0), false);
        assert_eq!(p, Point::new(23.0, 47.0));
    }

    #[test]
    fn test_maybe_snap_enabled() {
        let p = maybe_snap(Point::new(23.0, 47.0), true);
        assert_eq!(p, Point::new(20.0, 50.0));
    }
}
