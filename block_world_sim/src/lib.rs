// block_world_sim: tile graph, grid layout and map files for a block world.
//
// A block world is a set of tiles connected by compass exits. Tiles carry no
// coordinates; this crate derives a grid position for every tile reachable
// from a start tile and rejects any exit graph that cannot be drawn on a
// grid. It also reads and writes the line-oriented map file format.
//
// Module overview:
// - `types.rs`:      Coord, Direction, BlockKind, TileId.
// - `tile.rs`:       Tile (block stack + exits) and TileArena; stack rules.
// - `builder.rs`:    The builder and their carryable inventory.
// - `layout.rs`:     BFS consistency engine: compute_layout, TileLayout.
// - `map_format.rs`: Map file grammar: parse_map, MapRecord, write_map.
// - `config.rs`:     MapConfig: line ending and layout failure policy.
// - `world_map.rs`:  WorldMap: load/save and grid queries over a consistent world.
//
// The companion crate `block_world_cli` wraps this library as the
// `blockworld` command.
//
// **Critical constraint: determinism.** Loading the same file always yields
// the same layout and the same saved bytes. No `HashMap`, no system time.
// Use `BTreeMap` for ordered collections.

pub mod builder;
pub mod config;
pub mod layout;
pub mod map_format;
pub mod tile;
pub mod types;
pub mod world_map;

pub use config::MapConfig;
pub use world_map::{WorldMap, WorldMapError};
