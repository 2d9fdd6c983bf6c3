//! Sticky-note element with editable text content.

use super::{ElementId, GroupId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Horizontal alignment of note text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A text note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
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
    /// Editable text content.
    pub content: String,
    /// Opaque style token; the host interprets it.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

/// Default note size from the factory.
pub const NOTE_DEFAULT_SIZE: (f64, f64) = (150.0, 100.0);

impl Note {
    /// Create a note at a position with the default size and placeholder text.
    pub fn new(position: Point, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: NOTE_DEFAULT_SIZE.0,
            height: NOTE_DEFAULT_SIZE.1,
            rotation: 0.0,
            z_index: 0,
            group_id: None,
            content: "New Note".to_string(),
            color: color.into(),
            text_align: None,
        }
    }

    /// Set the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set an explicit size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}
