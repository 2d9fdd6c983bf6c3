//! Freehand sketch element, held as an opaque rendered handle.

use super::{ElementId, GroupId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default drawing canvas size from the factory.
pub const DRAWING_DEFAULT_SIZE: (f64, f64) = (400.0, 300.0);

/// A sketch surface. Stroke capture happens in the host; the engine stores the
/// rendered result as an opaque `src` handle, empty until first saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    #[serde(deserialize_with = "super::lenient_id")]
    pub(crate) id: ElementId,
    /// World-space centroid.
    pub position: Point,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Rotation in degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z_index: i64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::lenient_group_id"
    )]
    pub group_id: Option<GroupId>,
    /// Opaque rendered-sketch handle, may be empty.
    #[serde(default)]
    pub src: String,
}

impl Drawing {
    /// Create an empty drawing surface at the default size.
    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: DRAWING_DEFAULT_SIZE.0,
            height: DRAWING_DEFAULT_SIZE.1,
            rotation: 0.0,
            z_index: 0,
            group_id: None,
            src: String::new(),
        }
    }

    /// Set the rendered content handle.
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = src.into();
        self
    }
}
