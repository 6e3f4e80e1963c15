// A complete block world: tiles, their grid layout, the builder and the
// start position.
//
// `WorldMap` is the entry point for callers. It is always consistent: every
// constructor runs the layout engine and fails rather than returning a map
// whose exits cannot be embedded in the grid. Tiles that are not reachable
// from the start tile stay in the arena but are not laid out, so they are
// invisible to `tile_at()` / `tiles()` and are not written by `save()`.
//
// Loading reports three disjoint failures: the file is missing
// (`NotFound`), the text is not a valid map (`Format`), or the map is valid
// text but geometrically impossible (`Inconsistent`).
//
// `reload_with()` replaces an existing world in place. Missing and malformed
// files leave it untouched. An inconsistent map is handled by the config's
// `FailurePolicy`: `Reset` leaves the world empty (no tiles laid out, saves
// as `total:0`), `Preserve` keeps the previous world.
//
// See also: `map_format.rs` for the text format, `layout.rs` for the
// consistency engine.

use crate::builder::Builder;
use crate::config::{LineEnding, MapConfig};
use crate::layout::{Layout, LayoutError, TileLayout};
use crate::map_format::{self, FormatError};
use crate::tile::{Tile, TileArena};
use crate::types::{Coord, TileId};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum WorldMapError {
    #[error("map file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("malformed map: {0}")]
    Format(#[from] FormatError),
    #[error("inconsistent map: {0}")]
    Inconsistent(#[from] LayoutError),
    #[error("cannot write map: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Debug)]
pub struct WorldMap {
    tiles: TileArena,
    layout: TileLayout,
    builder: Builder,
    start_tile: TileId,
    start_position: Coord,
}

impl WorldMap {
    /// Lay out `tiles` with `start_tile` at `start_position`, using the
    /// default config.
    pub fn new(
        tiles: TileArena,
        start_tile: TileId,
        start_position: Coord,
        builder: Builder,
    ) -> Result<Self, LayoutError> {
        Self::with_config(tiles, start_tile, start_position, builder, &MapConfig::default())
    }

    pub fn with_config(
        tiles: TileArena,
        start_tile: TileId,
        start_position: Coord,
        builder: Builder,
        config: &MapConfig,
    ) -> Result<Self, LayoutError> {
        let mut layout = TileLayout::new(config.failure_policy);
        layout.rebuild(&tiles, start_tile, start_position)?;
        Ok(Self {
            tiles,
            layout,
            builder,
            start_tile,
            start_position,
        })
    }

    /// Load a map file with the default config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldMapError> {
        Self::load_with(path, &MapConfig::default())
    }

    pub fn load_with(path: impl AsRef<Path>, config: &MapConfig) -> Result<Self, WorldMapError> {
        let path = path.as_ref();
        let world = Self::from_map_str(&read_map_file(path)?, config)?;
        info!(path = %path.display(), tiles = world.tiles().len(), "loaded world map");
        Ok(world)
    }

    /// Parse map text. Tile 0 of the file becomes the start tile.
    pub fn from_map_str(text: &str, config: &MapConfig) -> Result<Self, WorldMapError> {
        let record = map_format::parse_map(text)?;
        let (tiles, builder) = record.build()?;
        let world = Self::with_config(tiles, TileId(0), record.start(), builder, config)?;
        Ok(world)
    }

    /// Reload from `path` with the default config.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), WorldMapError> {
        self.reload_with(path, &MapConfig::default())
    }

    /// Replace this world with the map at `path`. See the module comment for
    /// what each failure leaves behind.
    pub fn reload_with(
        &mut self,
        path: impl AsRef<Path>,
        config: &MapConfig,
    ) -> Result<(), WorldMapError> {
        let path = path.as_ref();
        let record = map_format::parse_map(&read_map_file(path)?)?;
        let (tiles, builder) = record.build()?;

        self.layout.set_policy(config.failure_policy);
        if let Err(err) = self.layout.rebuild(&tiles, TileId(0), record.start()) {
            warn!(
                path = %path.display(),
                policy = ?self.layout.policy(),
                tiles_left = self.tiles().len(),
                "reload rejected"
            );
            return Err(err.into());
        }

        self.tiles = tiles;
        self.builder = builder;
        self.start_tile = TileId(0);
        self.start_position = record.start();
        info!(path = %path.display(), tiles = self.tiles().len(), "reloaded world map");
        Ok(())
    }

    /// Save with the default config.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WorldMapError> {
        self.save_with(path, &MapConfig::default())
    }

    pub fn save_with(&self, path: impl AsRef<Path>, config: &MapConfig) -> Result<(), WorldMapError> {
        let path = path.as_ref();
        fs::write(path, self.to_map_string(config.line_ending))?;
        info!(path = %path.display(), tiles = self.tiles().len(), "saved world map");
        Ok(())
    }

    /// The map in file format, tiles numbered in BFS order.
    pub fn to_map_string(&self, line_ending: LineEnding) -> String {
        map_format::write_map(self, line_ending)
    }

    pub fn tile_at(&self, position: Coord) -> Option<&Tile> {
        self.tile_id_at(position).and_then(|id| self.tiles.get(id))
    }

    pub fn tile_id_at(&self, position: Coord) -> Option<TileId> {
        self.layout.tile_at(position)
    }

    /// Laid-out tiles in BFS order from the start tile.
    pub fn tiles(&self) -> &[TileId] {
        self.layout.tiles()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub fn position_of(&self, id: TileId) -> Option<Coord> {
        self.layout.layout().position_of(id)
    }

    pub fn layout(&self) -> &Layout {
        self.layout.layout()
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn start_tile(&self) -> TileId {
        self.start_tile
    }

    pub fn start_position(&self) -> Coord {
        self.start_position
    }
}

fn read_map_file(path: &Path) -> Result<String, WorldMapError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => WorldMapError::NotFound(path.to_path_buf()),
        _ => WorldMapError::Format(FormatError::Unreadable(err.to_string())),
    })
}
