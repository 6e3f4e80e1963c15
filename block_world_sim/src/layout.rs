// Grid layout of a tile graph: the world's consistency engine.
//
// Tiles only know their exits; they have no coordinates of their own. This
// module assigns every tile reachable from a start tile a unique grid
// coordinate by breadth-first search, and proves along the way that the exit
// graph embeds in the grid: no tile at two coordinates, no coordinate with
// two tiles.
//
// The BFS queue holds `(tile, forced coordinate)` pairs. When a pair is
// dequeued:
// 1. a tile already placed at the same coordinate is skipped (two paths
//    converging correctly); placed anywhere else it is an inconsistency;
// 2. a coordinate already held by a different tile is an inconsistency;
// 3. otherwise the tile is placed and each exit, in `Direction::ALL` order,
//    enqueues its target one step away.
// Reverse exits are never compared directly. A reverse exit pointing at the
// wrong tile forces that tile onto an occupied coordinate, which rule 1 or 2
// catches when it is dequeued. One-way exits are legal.
//
// `compute_layout()` is a pure function. `TileLayout` owns the current
// layout and decides, per `FailurePolicy`, what a failed rebuild leaves
// behind. There is no incremental update: every change is a full rebuild.
//
// The BFS visitation order is the canonical tile enumeration; `map_format.rs`
// uses `Layout::index_of()` as the on-disk tile id.
//
// **Critical constraint: determinism.** Same graph + same start = same order.
// Position lookup uses `BTreeMap`; per-tile data lives in `Vec`s indexed by
// `TileId`. No `HashMap`.

use crate::config::FailurePolicy;
use crate::tile::TileArena;
use crate::types::{Coord, Direction, TileId};
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;
use tracing::{debug, warn};

/// Read-only view of a tile graph's exits.
pub trait ExitGraph {
    /// Upper bound (exclusive) on the `TileId`s that can appear in the graph.
    fn tile_count(&self) -> usize;

    fn exit(&self, tile: TileId, direction: Direction) -> Option<TileId>;
}

impl ExitGraph for TileArena {
    fn tile_count(&self) -> usize {
        self.len()
    }

    fn exit(&self, tile: TileId, direction: Direction) -> Option<TileId> {
        self.get(tile).and_then(|t| t.exit(direction))
    }
}

/// The exit graph cannot be embedded in the grid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("{tile} reached at {second} but already placed at {first}")]
    TilePlacedTwice {
        tile: TileId,
        first: Coord,
        second: Coord,
    },
    #[error("{claimant} cannot be placed at {position}: already occupied by {occupant}")]
    PositionTaken {
        position: Coord,
        occupant: TileId,
        claimant: TileId,
    },
    #[error("{direction} exit of {tile} at {from} leaves the grid")]
    OffGrid {
        tile: TileId,
        from: Coord,
        direction: Direction,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Placement {
    position: Coord,
    /// Position in BFS order.
    index: usize,
}

/// A consistent assignment of tiles to coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    order: Vec<TileId>,
    by_position: BTreeMap<Coord, TileId>,
    /// Indexed by `TileId`.
    placements: Vec<Option<Placement>>,
}

impl Layout {
    /// Placed tiles in BFS order.
    pub fn order(&self) -> &[TileId] {
        &self.order
    }

    pub fn tile_at(&self, position: Coord) -> Option<TileId> {
        self.by_position.get(&position).copied()
    }

    pub fn position_of(&self, tile: TileId) -> Option<Coord> {
        self.placement(tile).map(|p| p.position)
    }

    /// Position of `tile` in BFS order, i.e. its on-disk id.
    pub fn index_of(&self, tile: TileId) -> Option<usize> {
        self.placement(tile).map(|p| p.index)
    }

    /// Placed tiles with their coordinates, in BFS order.
    pub fn iter(&self) -> impl Iterator<Item = (TileId, Coord)> + '_ {
        self.order.iter().filter_map(|&tile| {
            self.position_of(tile).map(|position| (tile, position))
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn placement(&self, tile: TileId) -> Option<Placement> {
        self.placements.get(tile.index()).copied().flatten()
    }
}

/// Lay out every tile reachable from `start`, placing `start` at
/// `start_position`.
///
/// Pure: the result is either a complete layout or the first inconsistency
/// found. Panics if `start` is not a tile of `graph`.
pub fn compute_layout<G>(
    graph: &G,
    start: TileId,
    start_position: Coord,
) -> Result<Layout, LayoutError>
where
    G: ExitGraph + ?Sized,
{
    let tile_count = graph.tile_count();
    assert!(
        start.index() < tile_count,
        "start tile {start} not in graph of {tile_count} tiles"
    );

    let mut layout = Layout {
        order: Vec::new(),
        by_position: BTreeMap::new(),
        placements: vec![None; tile_count],
    };
    let mut queue = VecDeque::new();
    queue.push_back((start, start_position));

    while let Some((tile, position)) = queue.pop_front() {
        if let Some(placed) = layout.placements[tile.index()] {
            if placed.position == position {
                continue;
            }
            return Err(LayoutError::TilePlacedTwice {
                tile,
                first: placed.position,
                second: position,
            });
        }

        if let Some(&occupant) = layout.by_position.get(&position) {
            return Err(LayoutError::PositionTaken {
                position,
                occupant,
                claimant: tile,
            });
        }

        layout.placements[tile.index()] = Some(Placement {
            position,
            index: layout.order.len(),
        });
        layout.by_position.insert(position, tile);
        layout.order.push(tile);

        for direction in Direction::ALL {
            let Some(neighbor) = graph.exit(tile, direction) else {
                continue;
            };
            let next = position.step(direction).ok_or(LayoutError::OffGrid {
                tile,
                from: position,
                direction,
            })?;
            queue.push_back((neighbor, next));
        }
    }

    Ok(layout)
}

/// Owner of a world's current layout.
///
/// Not safe for concurrent `rebuild` calls on the same instance; callers that
/// share one must serialize access themselves.
#[derive(Clone, Debug, Default)]
pub struct TileLayout {
    current: Layout,
    policy: FailurePolicy,
}

impl TileLayout {
    /// An empty layout.
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            current: Layout::default(),
            policy,
        }
    }

    /// Recompute the layout from scratch. On success the new BFS order is
    /// returned and replaces the old layout. On failure the old layout is
    /// cleared or kept according to the failure policy.
    pub fn rebuild<G>(
        &mut self,
        graph: &G,
        start: TileId,
        start_position: Coord,
    ) -> Result<&[TileId], LayoutError>
    where
        G: ExitGraph + ?Sized,
    {
        match compute_layout(graph, start, start_position) {
            Ok(layout) => {
                debug!(
                    tiles = layout.len(),
                    reachable_of = graph.tile_count(),
                    %start_position,
                    "layout rebuilt"
                );
                self.current = layout;
                Ok(self.current.order())
            }
            Err(err) => {
                warn!(error = %err, policy = ?self.policy, "layout rebuild failed");
                if self.policy == FailurePolicy::Reset {
                    self.clear();
                }
                Err(err)
            }
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.current
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Applies to the next failed `rebuild`.
    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
    }

    pub fn tile_at(&self, position: Coord) -> Option<TileId> {
        self.current.tile_at(position)
    }

    /// Placed tiles in BFS order.
    pub fn tiles(&self) -> &[TileId] {
        self.current.order()
    }

    pub fn clear(&mut self) {
        self.current = Layout::default();
    }
}
