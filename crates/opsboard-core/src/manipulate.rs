//! Single-element manipulation: drag, corner resize, rotation, arrow
//! endpoints.
//!
//! A gesture captures the original state of every element it may rewrite and
//! a frozen copy of the viewport, then every pointer frame recomputes the
//! result from those originals. Nothing accumulates across frames, so a
//! jittery pointer cannot drift an element.

use kurbo::{Point, Vec2};

use crate::elements::{ArrowEnd, CanvasElement, ElementId};
use crate::geometry;
use crate::snap;
use crate::viewport::Viewport;

/// Minimum element width/height after a corner resize.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Which part of an element a manipulation drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationKind {
    /// Drag the whole element (and the rest of the selection with it).
    Move,
    /// Drag the corner resize handle.
    Resize,
    /// Drag the rotation handle.
    Rotate,
    /// Drag one arrow endpoint.
    Endpoint(ArrowEnd),
}

/// A single-element gesture in flight.
#[derive(Debug, Clone)]
pub struct Manipulation {
    /// The element under the initiating press.
    pub element_id: ElementId,
    pub kind: ManipulationKind,
    /// Screen point of the initiating press.
    pub start_screen: Point,
    /// Viewport frozen at press time.
    pub viewport: Viewport,
    /// Original states of every element the gesture may rewrite.
    pub originals: Vec<CanvasElement>,
    /// Set once a pointer frame has actually changed something.
    pub moved: bool,
}

impl Manipulation {
    pub fn new(
        element_id: ElementId,
        kind: ManipulationKind,
        start_screen: Point,
        viewport: Viewport,
        originals: Vec<CanvasElement>,
    ) -> Self {
        Self {
            element_id,
            kind,
            start_screen,
            viewport,
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

/// Move an element by a world delta, snapping the resulting centroid.
///
/// The snap applies to the destination, not the delta, so a move always
/// lands on the grid regardless of where it started.
pub fn apply_move(
    original: &CanvasElement,
    delta_world: Vec2,
    snap_enabled: bool,
) -> CanvasElement {
    let mut element = original.clone();
    let target = snap::maybe_snap(original.position() + delta_world, snap_enabled);
    element.translate(target - original.position());
    element
}

/// Resize from the bottom-right corner by a world delta.
///
/// The delta is carried into the element's local frame so resizing a rotated
/// element still tracks the dragged corner. Images scale uniformly; everything
/// else resizes per axis with a floor of [`MIN_ELEMENT_SIZE`]. The centroid
/// trails the dragged corner by half the growth.
pub fn apply_resize(original: &CanvasElement, delta_world: Vec2) -> CanvasElement {
    let mut element = original.clone();
    if !element.supports_corner_resize() {
        return element;
    }

    let theta = original.rotation().to_radians();
    let local = geometry::rotate_vec(delta_world, -theta);

    let width = original.width();
    let height = original.height();

    let (new_width, new_height) = match original {
        CanvasElement::Image(_) => {
            let scale_w = (width + local.x) / width;
            let scale_h = (height + local.y) / height;
            let scale = ((scale_w + scale_h) / 2.0)
                .max(MIN_ELEMENT_SIZE / width)
                .max(MIN_ELEMENT_SIZE / height);
            if !scale.is_finite() || scale == 0.0 {
                log::debug!("Dropping image resize with degenerate scale");
                return element;
            }
            (width * scale, height * scale)
        }
        _ => (
            (width + local.x).max(MIN_ELEMENT_SIZE),
            (height + local.y).max(MIN_ELEMENT_SIZE),
        ),
    };

    let growth = Vec2::new((new_width - width) / 2.0, (new_height - height) / 2.0);
    element.set_size(new_width, new_height);
    element.translate(geometry::rotate_vec(growth, theta));
    element
}

/// Rotate an element about its centroid by the angle swept between the press
/// cursor and the current cursor.
///
/// The swept angle lands on the rotation at gesture start, so grabbing the
/// handle never jumps the element to face the cursor.
pub fn apply_rotate(
    original: &CanvasElement,
    start_world: Point,
    cursor_world: Point,
) -> CanvasElement {
    let mut element = original.clone();
    let center = original.position();
    let start_angle = (start_world.y - center.y).atan2(start_world.x - center.x);
    let current_angle = (cursor_world.y - center.y).atan2(cursor_world.x - center.x);
    let degrees = original.rotation() + (current_angle - start_angle).to_degrees();
    element.set_rotation(degrees);
    element
}

/// Drag one arrow endpoint by a world delta from its position at gesture
/// start. Endpoint drags never consult the grid.
pub fn apply_endpoint(original: &CanvasElement, end: ArrowEnd, delta_world: Vec2) -> CanvasElement {
    let mut element = original.clone();
    if let CanvasElement::Arrow(arrow) = &mut element {
        let anchor = arrow.endpoint(end);
        arrow.set_endpoint(end, anchor + delta_world);
    }
    element
}
