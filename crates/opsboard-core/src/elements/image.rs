//! Raster image element backed by an opaque source handle.

use super::{ElementId, GroupId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image placed on the board. The engine never decodes pixels; `src` is an
/// opaque handle (typically a data URL) that the host resolves for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
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
    /// Opaque image handle.
    pub src: String,
}

impl Image {
    /// Create an image with an explicit display size.
    pub fn new(position: Point, src: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
            group_id: None,
            src: src.into(),
        }
    }

    /// Current aspect ratio (width over height).
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_creation() {
        let img = Image::new(Point::new(10.0, 20.0), "data:image/png;base64,AAAA", 300.0, 150.0);
        assert!((img.aspect_ratio() - 2.0).abs() < f64::EPSILON);
        assert!(img.src.starts_with("data:image/png"));
    }
}
