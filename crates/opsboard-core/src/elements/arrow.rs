//! Arrow element connecting two world points.
//!
//! An arrow stores its endpoints explicitly and carries the common geometry
//! fields as derived values: `width` is the shaft length, `rotation` the shaft
//! angle, `position` the midpoint. Every endpoint mutation re-derives them.

use super::{ElementId, GroupId};
use crate::geometry;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default shaft hit-band thickness.
pub const ARROW_DEFAULT_HEIGHT: f64 = 30.0;

/// Default shaft length for factory-created arrows.
pub const ARROW_DEFAULT_LENGTH: f64 = 150.0;

/// Which endpoint of an arrow a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowEnd {
    Start,
    End,
}

/// A directed arrow between two world points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    #[serde(deserialize_with = "super::lenient_id")]
    pub(crate) id: ElementId,
    /// Derived: midpoint of `start` and `end`.
    pub position: Point,
    /// Derived: `|end - start|`.
    #[serde(default)]
    pub width: f64,
    /// Hit-band thickness, independent of the endpoints.
    #[serde(default = "default_height")]
    pub height: f64,
    /// Derived: `atan2(end - start)` in degrees.
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
    /// Tail point.
    pub start: Point,
    /// Head point (where the arrowhead points).
    pub end: Point,
    /// Opaque stroke token; the host interprets it.
    pub color: String,
}

fn default_height() -> f64 {
    ARROW_DEFAULT_HEIGHT
}

impl Arrow {
    /// Create an arrow between two points.
    pub fn new(start: Point, end: Point, color: impl Into<String>) -> Self {
        let mut arrow = Self {
            id: Uuid::new_v4(),
            position: Point::ZERO,
            width: 0.0,
            height: ARROW_DEFAULT_HEIGHT,
            rotation: 0.0,
            z_index: 0,
            group_id: None,
            start,
            end,
            color: color.into(),
        };
        arrow.sync_geometry();
        arrow
    }

    /// Shaft length.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Re-derive `position`, `width` and `rotation` from the endpoints.
    /// Must run after every mutation of `start` or `end`.
    pub fn sync_geometry(&mut self) {
        let delta = self.end - self.start;
        self.width = delta.hypot();
        self.rotation = geometry::vec_angle_degrees(delta);
        self.position = self.start.midpoint(self.end);
    }

    /// Move one endpoint and re-derive the shaft geometry.
    pub fn set_endpoint(&mut self, which: ArrowEnd, point: Point) {
        match which {
            ArrowEnd::Start => self.start = point,
            ArrowEnd::End => self.end = point,
        }
        self.sync_geometry();
    }

    /// Read one endpoint.
    pub fn endpoint(&self, which: ArrowEnd) -> Point {
        match which {
            ArrowEnd::Start => self.start,
            ArrowEnd::End => self.end,
        }
    }

    /// Translate the whole arrow rigidly.
    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
        self.sync_geometry();
    }
}
