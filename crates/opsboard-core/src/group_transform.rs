//! Whole-selection transforms about the selection bounds.
//!
//! Like single-element manipulation, a group gesture freezes the originals,
//! the viewport, and the selection bounds at press time, then recomputes
//! every frame from those. The pivot is the frozen bounds center, so the
//! selection cannot creep as its bounds change mid-gesture.

use kurbo::{Point, Rect, Vec2};

use crate::elements::CanvasElement;
use crate::viewport::Viewport;

/// Which group handle is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Rotate,
    Resize,
}

/// A whole-selection gesture in flight.
#[derive(Debug, Clone)]
pub struct GroupManipulation {
    pub kind: GroupKind,
    /// Screen point of the initiating press.
    pub start_screen: Point,
    /// Viewport frozen at press time.
    pub viewport: Viewport,
    /// Selection bounds frozen at press time.
    pub start_bounds: Rect,
    /// Original states of the selected elements.
    pub originals: Vec<CanvasElement>,
    /// Set once a pointer frame has actually changed something.
    pub moved: bool,
}

impl GroupManipulation {
    pub fn new(
        kind: GroupKind,
        start_screen: Point,
        viewport: Viewport,
        start_bounds: Rect,
        originals: Vec<CanvasElement>,
    ) -> Self {
        Self {
            kind,
            start_screen,
            viewport,
            start_bounds,
            originals,
            moved: false,
        }
    }

    /// World-space drag delta for a screen position, using the frozen zoom.
    pub fn delta_world(&self, current_screen: Point) -> Vec2 {
        (current_screen - self.start_screen) / self.viewport.zoom
    }

    /// World-space cursor position under the frozen viewport.
    pub fn cursor_world(&self, current_screen: Point) -> Point {
        self.viewport.screen_to_world(current_screen)
    }

    /// World-space press position under the frozen viewport.
    pub fn start_world(&self) -> Point {
        self.viewport.screen_to_world(self.start_screen)
    }
}

/// Union of the rotated bounds of the given elements. `None` when empty.
pub fn selection_bounds<'a>(
    elements: impl IntoIterator<Item = &'a CanvasElement>,
) -> Option<Rect> {
    let mut combined: Option<Rect> = None;
    for element in elements {
        let bounds = element.bounds();
        combined = Some(match combined {
            Some(acc) => acc.union(bounds),
            None => bounds,
        });
    }
    combined
}

/// Rotate every element rigidly about the pivot by the angle swept between
/// the press cursor and the current cursor.
pub fn apply_group_rotate(
    originals: &[CanvasElement],
    pivot: Point,
    start_world: Point,
    cursor_world: Point,
) -> Vec<CanvasElement> {
    let start_angle = (start_world.y - pivot.y).atan2(start_world.x - pivot.x);
    let current_angle = (cursor_world.y - pivot.y).atan2(cursor_world.x - pivot.x);
    let delta = current_angle - start_angle;

    originals
        .iter()
        .map(|original| {
            let mut element = original.clone();
            element.rotate_about(pivot, delta);
            element
        })
        .collect()
}

/// Scale every element about the bounds center, keeping the selection's
/// aspect by the diagonal ratio.
///
/// Returns `None` for degenerate ratios (zero or non-finite); the caller
/// keeps the previous frame in that case.
pub fn apply_group_resize(
    originals: &[CanvasElement],
    start_bounds: Rect,
    delta_world: Vec2,
) -> Option<Vec<CanvasElement>> {
    let width = start_bounds.width();
    let height = start_bounds.height();
    let old_diagonal = (width * width + height * height).sqrt();
    let new_width = width + delta_world.x;
    let new_height = height + delta_world.y;
    let new_diagonal = (new_width * new_width + new_height * new_height).sqrt();

    let ratio = new_diagonal / old_diagonal;
    if !(ratio.is_finite() && ratio > 0.0) {
        return None;
    }

    let pivot = start_bounds.center();
    Some(
        originals
            .iter()
            .map(|original| {
                let mut element = original.clone();
                element.scale_about(pivot, ratio);
                element
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Arrow, Note};

    fn note_at(x: f64, y: f64) -> CanvasElement {
        CanvasElement::Note(Note::new(Point::new(x, y), "bg-gray-700"))
    }

    fn dist(a: Point, b: Point) -> f64 {
        (a - b).hypot()
    }

    #[test]
    fn test_selection_bounds_unions() {
        let elements = vec![note_at(0.0, 0.0), note_at(300.0, 0.0)];
        let bounds = selection_bounds(elements.iter()).unwrap();
        // Notes are 150x100 centered, so the union spans -75..375.
        assert!((bounds.x0 + 75.0).abs() < 1e-10);
        assert!((bounds.x1 - 375.0).abs() < 1e-10);
        assert!((bounds.height() - 100.0).abs() < 1e-10);

        assert!(selection_bounds(std::iter::empty()).is_none());
    }

    #[test]
    fn test_group_rotate_quarter_turn() {
        let originals = vec![note_at(10.0, 0.0)];
        let rotated = apply_group_rotate(
            &originals,
            Point::ZERO,
            Point::new(100.0, 0.0),
            Point::new(0.0, 100.0),
        );
        assert!((rotated[0].position().x).abs() < 1e-10);
        assert!((rotated[0].position().y - 10.0).abs() < 1e-10);
        assert!((rotated[0].rotation() - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_group_rotate_is_rigid() {
        let originals = vec![note_at(0.0, 0.0), note_at(120.0, 40.0), note_at(-30.0, 90.0)];
        let pivot = Point::new(30.0, 40.0);
        let rotated = apply_group_rotate(
            &originals,
            pivot,
            Point::new(90.0, 40.0),
            Point::new(75.0, 85.0),
        );

        for i in 0..originals.len() {
            for j in (i + 1)..originals.len() {
                let before = dist(originals[i].position(), originals[j].position());
                let after = dist(rotated[i].position(), rotated[j].position());
                assert!((before - after).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_group_rotate_inverse_restores() {
        let originals = vec![note_at(0.0, 0.0), note_at(120.0, 40.0)];
        let pivot = Point::new(30.0, 40.0);
        let start = Point::new(90.0, 40.0);
        let swung = Point::new(75.0, 85.0);

        let rotated = apply_group_rotate(&originals, pivot, start, swung);
        let restored = apply_group_rotate(&rotated, pivot, swung, start);

        for (before, after) in originals.iter().zip(&restored) {
            assert!(dist(before.position(), after.position()) < 1e-9);
            assert!((before.rotation() - after.rotation()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_group_resize_diagonal_ratio() {
        let originals = vec![note_at(0.0, 0.0), note_at(200.0, 0.0)];
        // A 300x400 box has diagonal 500; growing by (60, 80) makes it 600.
        let bounds = Rect::new(0.0, 0.0, 300.0, 400.0);
        let resized =
            apply_group_resize(&originals, bounds, Vec2::new(60.0, 80.0)).unwrap();

        assert!((resized[0].width() - 150.0 * 1.2).abs() < 1e-10);
        assert!((resized[0].height() - 100.0 * 1.2).abs() < 1e-10);

        // Offsets from the pivot scale by the same ratio.
        let pivot = bounds.center();
        let offset_before = originals[1].position() - pivot;
        let offset_after = resized[1].position() - pivot;
        assert!((offset_after.x - offset_before.x * 1.2).abs() < 1e-10);
        assert!((offset_after.y - offset_before.y * 1.2).abs() < 1e-10);
    }

    #[test]
    fn test_group_resize_rejects_degenerate_ratio() {
        let originals = vec![note_at(0.0, 0.0)];
        let zero_bounds = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(apply_group_resize(&originals, zero_bounds, Vec2::new(5.0, 5.0)).is_none());

        let bounds = Rect::new(0.0, 0.0, 300.0, 400.0);
        assert!(
            apply_group_resize(&originals, bounds, Vec2::new(-300.0, -400.0)).is_none()
        );
    }

    #[test]
    fn test_group_resize_scales_arrow_endpoints() {
        let originals = vec![CanvasElement::Arrow(Arrow::new(
            Point::new(100.0, 200.0),
            Point::new(200.0, 200.0),
            "text-red-500",
        ))];
        let bounds = Rect::new(0.0, 0.0, 300.0, 400.0);
        let resized =
            apply_group_resize(&originals, bounds, Vec2::new(60.0, 80.0)).unwrap();

        assert!((resized[0].width() - 120.0).abs() < 1e-10);
        if let CanvasElement::Arrow(a) = &resized[0] {
            assert!((a.end.x - a.start.x - 120.0).abs() < 1e-10);
            // Derived midpoint matches the scaled original midpoint.
            let pivot = bounds.center();
            let expected = pivot + (Point::new(150.0, 200.0) - pivot) * 1.2;
            assert!((a.position.x - expected.x).abs() < 1e-10);
            assert!((a.position.y - expected.y).abs() < 1e-10);
        } else {
            unreachable!();
        }
    }
}
