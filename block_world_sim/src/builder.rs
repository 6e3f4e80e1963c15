// The builder who walks the block world.
//
// A `Builder` has a name, the tile they currently stand on, and an inventory
// of carryable blocks. Construction validates the inventory: every block
// must satisfy `BlockKind::is_carryable()`. Movement and digging rules are
// outside this crate's concern; the builder is carried along so a loaded map
// can be written back unchanged.

use crate::types::{BlockKind, TileId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("{0} blocks cannot be carried")]
    NotCarryable(BlockKind),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Builder {
    name: String,
    current_tile: TileId,
    inventory: Vec<BlockKind>,
}

impl Builder {
    /// Create a builder standing on `start_tile`. Fails on the first
    /// inventory block that cannot be carried.
    pub fn new(
        name: impl Into<String>,
        start_tile: TileId,
        inventory: Vec<BlockKind>,
    ) -> Result<Self, BuilderError> {
        if let Some(&kind) = inventory.iter().find(|k| !k.is_carryable()) {
            return Err(BuilderError::NotCarryable(kind));
        }
        Ok(Self {
            name: name.into(),
            current_tile: start_tile,
            inventory,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_tile(&self) -> TileId {
        self.current_tile
    }

    /// Inventory in pickup order.
    pub fn inventory(&self) -> &[BlockKind] {
        &self.inventory
    }
}
