// Core types shared across the block world.
//
// Defines grid coordinates (`Coord`), the four compass `Direction`s, the
// closed set of `BlockKind`s a tile stack can hold, and the compact `TileId`
// used to index the tile arena. All types derive `Serialize` and
// `Deserialize` so they can appear in config and diagnostics output.
//
// The lowercase tags returned by `Direction::tag()` and `BlockKind::tag()` are
// the exact tokens of the map file format (see `map_format.rs`). Nothing else
// in the crate handles direction or block names as strings.
//
// **Critical constraint: determinism.** `Direction::ALL` fixes the expansion
// order of the layout BFS and the order exits are written to disk. Do not
// reorder it.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position on the integer tile grid.
///
/// The coordinate system follows screen conventions:
/// - X: east  (positive) / west  (negative)
/// - Y: south (positive) / north (negative)
///
/// Ordering is by `x` first, then `y` (field declaration order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring coordinate one step in `direction`, or `None` if that
    /// step would leave the `i32` grid.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four exits a tile can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in canonical order: BFS expansion order and the order
    /// exits are serialized.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit displacement `(dx, dy)` of one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Position of this direction within `ALL`. Used to index per-tile exit
    /// arrays.
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Map file token.
    pub fn tag(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }

    /// Parse a map file token. Case-sensitive: only the exact lowercase tags
    /// are accepted.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.tag() == tag)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// The material of a single block in a tile's stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Wood,
    Grass,
    Soil,
    Stone,
}

impl BlockKind {
    pub const ALL: [BlockKind; 4] = [
        BlockKind::Wood,
        BlockKind::Grass,
        BlockKind::Soil,
        BlockKind::Stone,
    ];

    /// Map file token.
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Wood => "wood",
            BlockKind::Grass => "grass",
            BlockKind::Soil => "soil",
            BlockKind::Stone => "stone",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.tag() == tag)
    }

    /// Ground blocks may only sit near the bottom of a stack
    /// (see `tile::MAX_GROUND_HEIGHT`).
    pub fn is_ground(self) -> bool {
        matches!(self, BlockKind::Grass | BlockKind::Soil)
    }

    /// Whether a builder may hold this block in their inventory.
    pub fn is_carryable(self) -> bool {
        matches!(self, BlockKind::Wood | BlockKind::Soil)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Tile IDs: simple integers indexing the tile arena.
// ---------------------------------------------------------------------------

/// Compact identifier for a tile in a `TileArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl TileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileId({})", self.0)
    }
}
