//! Shared affine geometry helpers for rotated elements.
//!
//! Element rotation is stored in degrees (clockwise in screen space, since the
//! world axis is y-down). Everything here works on world-space points.

use kurbo::{Point, Rect, Vec2};

/// Rotate a point about a pivot by an angle in radians.
pub fn rotate_about(p: Point, pivot: Point, radians: f64) -> Point {
    let (sin, cos) = radians.sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point::new(
        pivot.x + dx * cos - dy * sin,
        pivot.y + dx * sin + dy * cos,
    )
}

/// The four corners of a centered rect after applying its own rotation.
///
/// Order: top-left, top-right, bottom-right, bottom-left (pre-rotation).
pub fn rotated_corners(center: Point, width: f64, height: f64, rotation_deg: f64) -> [Point; 4] {
    let rad = rotation_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let offsets = [
        (-half_w, -half_h),
        (half_w, -half_h),
        (half_w, half_h),
        (-half_w, half_h),
    ];
    offsets.map(|(cx, cy)| {
        Point::new(
            center.x + cx * cos - cy * sin,
            center.y + cx * sin + cy * cos,
        )
    })
}

/// Axis-aligned bounding rect over a set of points. `None` when empty.
pub fn points_bbox<I>(points: I) -> Option<Rect>
where
    I: IntoIterator<Item = Point>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut rect = Rect::new(first.x, first.y, first.x, first.y);
    for p in iter {
        rect = rect.union_pt(p);
    }
    Some(rect)
}

/// Test whether a world point lies inside a centered, rotated rect.
///
/// The point is carried into the rect's local frame by the inverse rotation,
/// then compared against the half extents.
pub fn point_in_rotated_rect(
    p: Point,
    center: Point,
    width: f64,
    height: f64,
    rotation_deg: f64,
) -> bool {
    let local = rotate_about(p, center, -rotation_deg.to_radians());
    (local.x - center.x).abs() <= width / 2.0 && (local.y - center.y).abs() <= height / 2.0
}

/// Rotate a vector by an angle in radians.
pub fn rotate_vec(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Angle of a vector in degrees, `atan2` convention.
pub fn vec_angle_degrees(v: Vec2) -> f64 {
    v.y.atan2(v.x).to_degrees()
}
