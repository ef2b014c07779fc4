use foundation::TileCoordinate;
use foundation::math::{Cartographic, Ecef};

use crate::components::{ComponentProperties, LabelGraphics, PointGraphics};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An individually addressable visual object: a label plus a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub position: Cartographic,
    pub label: Option<LabelGraphics>,
    pub point: Option<PointGraphics>,
    /// Tile the entity was most recently loaded from.
    pub tile: Option<TileCoordinate>,
    pub properties: ComponentProperties,
}

impl Entity {
    pub fn new(id: EntityId, position: Cartographic) -> Self {
        Self {
            id,
            position,
            label: None,
            point: None,
            tile: None,
            properties: ComponentProperties::default(),
        }
    }

    pub fn position_ecef(&self) -> Ecef {
        self.position.to_ecef()
    }

    pub fn belongs_to(&self, tile: &TileCoordinate) -> bool {
        self.tile.as_ref().is_some_and(|t| t.matches(tile))
    }
}
