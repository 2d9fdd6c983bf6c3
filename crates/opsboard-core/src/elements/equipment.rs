//! Fixed equipment node representing a station subsystem.

use super::{ElementId, GroupId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operational status of an equipment node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    #[default]
    Operational,
    Warning,
    Critical,
}

/// Default equipment tile size (hex-grid cell, W ~= 277, H = 320).
pub const EQUIPMENT_DEFAULT_SIZE: (f64, f64) = (277.0, 320.0);

/// A fixed equipment node. `name`/`description` are i18n keys the host
/// resolves; only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
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
    /// Display-name key.
    pub name: String,
    #[serde(default)]
    pub status: EquipmentStatus,
    /// Description key.
    #[serde(default)]
    pub description: String,
}

impl Equipment {
    /// Create an equipment node at the default tile size.
    pub fn new(position: Point, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: EQUIPMENT_DEFAULT_SIZE.0,
            height: EQUIPMENT_DEFAULT_SIZE.1,
            rotation: 0.0,
            z_index: 0,
            group_id: None,
            name: name.into(),
            status: EquipmentStatus::default(),
            description: description.into(),
        }
    }
}
