// Tiles and the arena that owns them.
//
// A `Tile` is a bottom-to-top stack of blocks plus at most one exit per
// compass direction. Exits are `TileId`s into the same `TileArena`, so the
// graph can contain cycles and shared sub-paths without any shared mutable
// references. The arena never removes tiles; ids are sequential integers
// assigned in insertion order.
//
// Stack rules live here and nowhere else:
// - at most `MAX_STACK_HEIGHT` blocks on a tile;
// - a ground block (grass, soil) can only be placed while the stack is
//   shorter than `MAX_GROUND_HEIGHT`.
//
// See also: `layout.rs` which walks the arena's exits through the `ExitGraph`
// trait, `map_format.rs` which fills an arena from a map file.

use crate::types::{BlockKind, Direction, TileId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Maximum number of blocks a tile can hold.
pub const MAX_STACK_HEIGHT: usize = 8;

/// A ground block cannot be placed on a stack this tall or taller.
pub const MAX_GROUND_HEIGHT: usize = 3;

/// Violations of the stack rules.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TileError {
    #[error("cannot place {kind} on a stack of {height} blocks")]
    TooHigh { kind: BlockKind, height: usize },
}

/// A single tile: a block stack and up to four exits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Bottom block first.
    blocks: SmallVec<[BlockKind; MAX_STACK_HEIGHT]>,
    /// Indexed by `Direction::index()`.
    exits: [Option<TileId>; 4],
}

impl Tile {
    /// An empty tile with no blocks and no exits.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tile with the given blocks placed bottom-up, failing on the first
    /// block that breaks the stack rules.
    pub fn with_blocks<I>(blocks: I) -> Result<Self, TileError>
    where
        I: IntoIterator<Item = BlockKind>,
    {
        let mut tile = Self::new();
        for kind in blocks {
            tile.place_block(kind)?;
        }
        Ok(tile)
    }

    /// Place a block on top of the stack.
    pub fn place_block(&mut self, kind: BlockKind) -> Result<(), TileError> {
        let height = self.blocks.len();
        if height >= MAX_STACK_HEIGHT || (kind.is_ground() && height >= MAX_GROUND_HEIGHT) {
            return Err(TileError::TooHigh { kind, height });
        }
        self.blocks.push(kind);
        Ok(())
    }

    pub fn blocks(&self) -> &[BlockKind] {
        &self.blocks
    }

    pub fn height(&self) -> usize {
        self.blocks.len()
    }

    pub fn exit(&self, direction: Direction) -> Option<TileId> {
        self.exits[direction.index()]
    }

    /// Present exits in canonical direction order.
    pub fn exits(&self) -> impl Iterator<Item = (Direction, TileId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.exit(d).map(|target| (d, target)))
    }

    fn set_exit(&mut self, direction: Direction, target: TileId) {
        self.exits[direction.index()] = Some(target);
    }
}

/// Owner of every tile in a world. Tiles refer to each other by `TileId`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileArena {
    tiles: Vec<Tile>,
}

impl TileArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile. Returns its ID.
    pub fn add(&mut self, tile: Tile) -> TileId {
        let id = TileId(self.tiles.len() as u32);
        self.tiles.push(tile);
        id
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Link `from` to `to` in `direction`, replacing any previous exit that
    /// way. Only the forward exit is set; one-way exits are legal.
    ///
    /// Panics if either ID is not in this arena.
    pub fn set_exit(&mut self, from: TileId, direction: Direction, to: TileId) {
        assert!(to.index() < self.tiles.len(), "exit target {to} not in arena");
        self.tiles[from.index()].set_exit(direction, to);
    }
}
