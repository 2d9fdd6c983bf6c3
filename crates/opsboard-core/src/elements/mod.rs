//! Canvas element model.
//!
//! Elements are a tagged union; every operation on the enum dispatches with an
//! exhaustive match so adding a variant is a compile error until every layer
//! handles it. Common geometry fields (centroid position, size, rotation,
//! z-index, group link) live on each variant; the arrow re-derives its common
//! fields from its endpoints, see [`Arrow`].

mod arrow;
mod drawing;
mod equipment;
mod image;
mod note;

pub use arrow::{ARROW_DEFAULT_HEIGHT, ARROW_DEFAULT_LENGTH, Arrow, ArrowEnd};
pub use drawing::{DRAWING_DEFAULT_SIZE, Drawing};
pub use equipment::{EQUIPMENT_DEFAULT_SIZE, Equipment, EquipmentStatus};
pub use image::Image;
pub use note::{NOTE_DEFAULT_SIZE, Note, TextAlign};

use crate::geometry;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Shared identifier linking the members of one group.
pub type GroupId = Uuid;

/// Namespace for ids carried over from foreign documents.
const FOREIGN_ID_NAMESPACE: Uuid = Uuid::NAMESPACE_OID;

/// Parse-or-map an id string into UUID space.
///
/// Documents written by other tools carry arbitrary id strings. A non-UUID
/// string maps through a name-based UUID over a fixed namespace, so every
/// occurrence of the same foreign id (element ids, group links, analysis
/// keys) lands on the same UUID and cross-references survive import.
pub fn parse_foreign_id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::new_v5(&FOREIGN_ID_NAMESPACE, raw.as_bytes()))
}

pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<ElementId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_foreign_id(&raw))
}

pub(crate) fn lenient_group_id<'de, D>(deserializer: D) -> Result<Option<GroupId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(parse_foreign_id))
}

/// Any element that can live on the board.
///
/// Serializes internally tagged (`"type": "note"` etc.) so exported documents
/// keep the established wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasElement {
    Note(Note),
    Image(Image),
    Arrow(Arrow),
    Drawing(Drawing),
    Equipment(Equipment),
}

impl CanvasElement {
    /// Stable element id.
    pub fn id(&self) -> ElementId {
        match self {
            CanvasElement::Note(n) => n.id,
            CanvasElement::Image(i) => i.id,
            CanvasElement::Arrow(a) => a.id,
            CanvasElement::Drawing(d) => d.id,
            CanvasElement::Equipment(e) => e.id,
        }
    }

    /// Issue a fresh id (used when pasting copies).
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            CanvasElement::Note(n) => n.id = new_id,
            CanvasElement::Image(i) => i.id = new_id,
            CanvasElement::Arrow(a) => a.id = new_id,
            CanvasElement::Drawing(d) => d.id = new_id,
            CanvasElement::Equipment(e) => e.id = new_id,
        }
    }

    /// Variant tag, matching the serialized `type` field.
    pub fn label(&self) -> &'static str {
        match self {
            CanvasElement::Note(_) => "note",
            CanvasElement::Image(_) => "image",
            CanvasElement::Arrow(_) => "arrow",
            CanvasElement::Drawing(_) => "drawing",
            CanvasElement::Equipment(_) => "equipment",
        }
    }

    /// World-space centroid.
    pub fn position(&self) -> Point {
        match self {
            CanvasElement::Note(n) => n.position,
            CanvasElement::Image(i) => i.position,
            CanvasElement::Arrow(a) => a.position,
            CanvasElement::Drawing(d) => d.position,
            CanvasElement::Equipment(e) => e.position,
        }
    }

    /// Rigid translation. Arrows move both endpoints and re-derive.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            CanvasElement::Note(n) => n.position += delta,
            CanvasElement::Image(i) => i.position += delta,
            CanvasElement::Arrow(a) => a.translate(delta),
            CanvasElement::Drawing(d) => d.position += delta,
            CanvasElement::Equipment(e) => e.position += delta,
        }
    }

    /// Move the centroid to an absolute position.
    pub fn set_position(&mut self, position: Point) {
        let delta = position - self.position();
        self.translate(delta);
    }

    pub fn width(&self) -> f64 {
        match self {
            CanvasElement::Note(n) => n.width,
            CanvasElement::Image(i) => i.width,
            CanvasElement::Arrow(a) => a.width,
            CanvasElement::Drawing(d) => d.width,
            CanvasElement::Equipment(e) => e.width,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            CanvasElement::Note(n) => n.height,
            CanvasElement::Image(i) => i.height,
            CanvasElement::Arrow(a) => a.height,
            CanvasElement::Drawing(d) => d.height,
            CanvasElement::Equipment(e) => e.height,
        }
    }

    /// Set width/height. For an arrow the width is realized by scaling the
    /// shaft about its midpoint, keeping the endpoint-derived fields coherent.
    pub fn set_size(&mut self, width: f64, height: f64) {
        match self {
            CanvasElement::Note(n) => {
                n.width = width;
                n.height = height;
            }
            CanvasElement::Image(i) => {
                i.width = width;
                i.height = height;
            }
            CanvasElement::Arrow(a) => {
                a.height = height;
                let len = a.length();
                if len > f64::EPSILON {
                    let dir = (a.end - a.start) / len;
                    let mid = a.position;
                    a.start = mid - dir * (width / 2.0);
                    a.end = mid + dir * (width / 2.0);
                }
                a.sync_geometry();
            }
            CanvasElement::Drawing(d) => {
                d.width = width;
                d.height = height;
            }
            CanvasElement::Equipment(e) => {
                e.width = width;
                e.height = height;
            }
        }
    }

    /// Rotation in degrees, clockwise.
    pub fn rotation(&self) -> f64 {
        match self {
            CanvasElement::Note(n) => n.rotation,
            CanvasElement::Image(i) => i.rotation,
            CanvasElement::Arrow(a) => a.rotation,
            CanvasElement::Drawing(d) => d.rotation,
            CanvasElement::Equipment(e) => e.rotation,
        }
    }

    /// Set the absolute rotation. Arrows realize it by spinning the endpoints
    /// about the midpoint.
    pub fn set_rotation(&mut self, degrees: f64) {
        match self {
            CanvasElement::Note(n) => n.rotation = degrees,
            CanvasElement::Image(i) => i.rotation = degrees,
            CanvasElement::Arrow(a) => {
                let delta = (degrees - a.rotation).to_radians();
                let pivot = a.position;
                a.start = geometry::rotate_about(a.start, pivot, delta);
                a.end = geometry::rotate_about(a.end, pivot, delta);
                a.sync_geometry();
            }
            CanvasElement::Drawing(d) => d.rotation = degrees,
            CanvasElement::Equipment(e) => e.rotation = degrees,
        }
    }

    pub fn z_index(&self) -> i64 {
        match self {
            CanvasElement::Note(n) => n.z_index,
            CanvasElement::Image(i) => i.z_index,
            CanvasElement::Arrow(a) => a.z_index,
            CanvasElement::Drawing(d) => d.z_index,
            CanvasElement::Equipment(e) => e.z_index,
        }
    }

    pub fn set_z_index(&mut self, z: i64) {
        match self {
            CanvasElement::Note(n) => n.z_index = z,
            CanvasElement::Image(i) => i.z_index = z,
            CanvasElement::Arrow(a) => a.z_index = z,
            CanvasElement::Drawing(d) => d.z_index = z,
            CanvasElement::Equipment(e) => e.z_index = z,
        }
    }

    pub fn group_id(&self) -> Option<GroupId> {
        match self {
            CanvasElement::Note(n) => n.group_id,
            CanvasElement::Image(i) => i.group_id,
            CanvasElement::Arrow(a) => a.group_id,
            CanvasElement::Drawing(d) => d.group_id,
            CanvasElement::Equipment(e) => e.group_id,
        }
    }

    pub fn set_group_id(&mut self, group_id: Option<GroupId>) {
        match self {
            CanvasElement::Note(n) => n.group_id = group_id,
            CanvasElement::Image(i) => i.group_id = group_id,
            CanvasElement::Arrow(a) => a.group_id = group_id,
            CanvasElement::Drawing(d) => d.group_id = group_id,
            CanvasElement::Equipment(e) => e.group_id = group_id,
        }
    }

    /// Rotate rigidly about an external pivot: the centroid orbits and the
    /// element's own rotation advances by the same angle.
    pub fn rotate_about(&mut self, pivot: Point, radians: f64) {
        match self {
            CanvasElement::Arrow(a) => {
                a.start = geometry::rotate_about(a.start, pivot, radians);
                a.end = geometry::rotate_about(a.end, pivot, radians);
                a.sync_geometry();
            }
            _ => {
                let rotated = geometry::rotate_about(self.position(), pivot, radians);
                self.set_position(rotated);
                let degrees = self.rotation() + radians.to_degrees();
                self.set_rotation(degrees);
            }
        }
    }

    /// Scale size and offset-from-pivot uniformly by a ratio.
    pub fn scale_about(&mut self, pivot: Point, ratio: f64) {
        match self {
            CanvasElement::Arrow(a) => {
                a.start = pivot + (a.start - pivot) * ratio;
                a.end = pivot + (a.end - pivot) * ratio;
                a.height *= ratio;
                a.sync_geometry();
            }
            _ => {
                let offset = self.position() - pivot;
                self.set_position(pivot + offset * ratio);
                self.set_size(self.width() * ratio, self.height() * ratio);
            }
        }
    }

    /// The four rotated corners of the element's rect.
    pub fn corners(&self) -> [Point; 4] {
        geometry::rotated_corners(self.position(), self.width(), self.height(), self.rotation())
    }

    /// Axis-aligned bounds over the rotated corners.
    pub fn bounds(&self) -> Rect {
        let corners = self.corners();
        let mut rect = Rect::new(corners[0].x, corners[0].y, corners[0].x, corners[0].y);
        for p in &corners[1..] {
            rect = rect.union_pt(*p);
        }
        rect
    }

    /// Test whether a world point falls inside the element's rotated rect.
    pub fn hit_test(&self, point: Point) -> bool {
        geometry::point_in_rotated_rect(
            point,
            self.position(),
            self.width(),
            self.height(),
            self.rotation(),
        )
    }

    /// Arrows resize through their endpoint handles, everything else through
    /// the corner handle.
    pub fn supports_corner_resize(&self) -> bool {
        !matches!(self, CanvasElement::Arrow(_))
    }
}
