// Line-oriented text format for world maps.
//
// Layout of a map file (every line, including the last, is terminated):
//
//   <start x>                      signed 32-bit integer
//   <start y>                      signed 32-bit integer
//   <builder name>                 any text
//   <inventory>                    comma-separated block tags, may be empty
//                                  (blank line)
//   total:<N>                      N >= 1
//   <id> <block tags>              N lines, one per id in 0..N, any order
//                                  (blank line)
//   exits
//   <id> <dir>:<target>,...        N lines, one per id in 0..N, any order
//
// Block tags are `wood`, `grass`, `soil`, `stone`; directions are `north`,
// `east`, `south`, `west`. Both are case-sensitive. Numbered rows have exactly
// one space between the id and the rest, even when the rest is empty. Nothing
// may follow the last exit line. Lines end in `\n`, `\r\n` or a lone `\r`;
// the final terminator is optional.
//
// Reading happens in two steps. `parse_map()` checks the grammar and produces
// a `MapRecord` of plain values indexed by file-local tile id.
// `MapRecord::build()` turns that into a `TileArena` and `Builder`, applying
// the stack and inventory rules. Both steps report `FormatError`; geometric
// consistency is checked afterwards by `layout.rs` and reported separately.
//
// Writing (`write_map()`) numbers tiles by their position in the layout's BFS
// order, so a saved file always has tile 0 = the start tile and ids that
// follow the traversal.
//
// See also: `world_map.rs` for the file I/O around these functions.

use crate::builder::{Builder, BuilderError};
use crate::config::LineEnding;
use crate::tile::{Tile, TileArena, TileError};
use crate::types::{BlockKind, Coord, Direction, TileId};
use crate::world_map::WorldMap;
use std::collections::BTreeMap;
use thiserror::Error;

/// The text does not describe a valid map. Line numbers are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("line {line}: file ended early")]
    UnexpectedEof { line: usize },
    #[error("line {line}: invalid integer {text:?}")]
    InvalidInteger { line: usize, text: String },
    #[error("line {line}: unknown block type {token:?}")]
    UnknownBlock { line: usize, token: String },
    #[error("line {line}: expected a blank line")]
    ExpectedBlank { line: usize },
    #[error("line {line}: expected `total:N` with N >= 1, found {text:?}")]
    InvalidTotal { line: usize, text: String },
    #[error("line {line}: expected `<id> <fields>` with exactly one space, found {text:?}")]
    MalformedRow { line: usize, text: String },
    #[error("line {line}: tile id {id} outside 0..{total}")]
    TileIdOutOfRange { line: usize, id: i32, total: usize },
    #[error("line {line}: tile id {id} listed twice")]
    DuplicateTileId { line: usize, id: usize },
    #[error("line {line}: expected `exits`, found {text:?}")]
    ExpectedExitsHeader { line: usize, text: String },
    #[error("line {line}: malformed exit {field:?}")]
    MalformedExit { line: usize, field: String },
    #[error("line {line}: unknown direction {name:?}")]
    UnknownDirection { line: usize, name: String },
    #[error("line {line}: {direction} exit given twice")]
    DuplicateExit { line: usize, direction: Direction },
    #[error("line {line}: unexpected content after the exits section")]
    TrailingContent { line: usize },
    #[error("builder inventory: {0}")]
    Inventory(#[from] BuilderError),
    #[error("tile {tile}: {source}")]
    Stack { tile: usize, source: TileError },
    #[error("unreadable map file: {0}")]
    Unreadable(String),
}

/// A map file's contents, checked against the grammar but not yet turned into
/// tiles. Tiles and exits are indexed by file-local tile id.
///
/// Only `parse_map()` creates one, so `exits` has one row per tile and every
/// exit target is below `tile_count()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapRecord {
    start: Coord,
    builder_name: String,
    inventory: Vec<BlockKind>,
    /// Bottom block first.
    tiles: Vec<Vec<BlockKind>>,
    /// Exit targets indexed by `Direction::index()`.
    exits: Vec<[Option<usize>; 4]>,
}

impl MapRecord {
    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn builder_name(&self) -> &str {
        &self.builder_name
    }

    pub fn inventory(&self) -> &[BlockKind] {
        &self.inventory
    }

    /// Block stacks by file tile id.
    pub fn tiles(&self) -> &[Vec<BlockKind>] {
        &self.tiles
    }

    /// Exit targets by file tile id, indexed by `Direction::index()`.
    pub fn exits(&self) -> &[[Option<usize>; 4]] {
        &self.exits
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Create the tiles and builder. `TileId(i)` is file tile `i`; the
    /// builder stands on tile 0.
    pub fn build(&self) -> Result<(TileArena, Builder), FormatError> {
        let builder = Builder::new(self.builder_name.clone(), TileId(0), self.inventory.clone())?;

        let mut arena = TileArena::new();
        for (index, blocks) in self.tiles.iter().enumerate() {
            let tile = Tile::with_blocks(blocks.iter().copied())
                .map_err(|source| FormatError::Stack { tile: index, source })?;
            arena.add(tile);
        }
        for (index, exits) in self.exits.iter().enumerate() {
            for direction in Direction::ALL {
                if let Some(target) = exits[direction.index()] {
                    arena.set_exit(TileId(index as u32), direction, TileId(target as u32));
                }
            }
        }
        Ok((arena, builder))
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Lines of `text`, each ended by `\r\n`, `\n` or a lone `\r`. The last
/// line may be unterminated; an empty tail is not a line.
struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(end) = self.rest.find(['\r', '\n']) else {
            return Some(std::mem::take(&mut self.rest));
        };
        let line = &self.rest[..end];
        let terminator = if self.rest[end..].starts_with("\r\n") { 2 } else { 1 };
        self.rest = &self.rest[end + terminator..];
        Some(line)
    }
}

/// Line cursor that tracks 1-based line numbers.
struct LineCursor<'a> {
    lines: Lines<'a>,
    consumed: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: Lines { rest: text },
            consumed: 0,
        }
    }

    /// Next line and its number.
    fn next(&mut self) -> Result<(usize, &'a str), FormatError> {
        let line = self.consumed + 1;
        let text = self
            .lines
            .next()
            .ok_or(FormatError::UnexpectedEof { line })?;
        self.consumed = line;
        Ok((line, text))
    }

    fn blank(&mut self) -> Result<(), FormatError> {
        let (line, text) = self.next()?;
        if !text.is_empty() {
            return Err(FormatError::ExpectedBlank { line });
        }
        Ok(())
    }

    fn finish(mut self) -> Result<(), FormatError> {
        match self.lines.next() {
            Some(_) => Err(FormatError::TrailingContent {
                line: self.consumed + 1,
            }),
            None => Ok(()),
        }
    }
}

/// Parse map text into a `MapRecord`.
pub fn parse_map(text: &str) -> Result<MapRecord, FormatError> {
    let mut cursor = LineCursor::new(text);

    let (line, x) = cursor.next()?;
    let x = parse_int(line, x)?;
    let (line, y) = cursor.next()?;
    let y = parse_int(line, y)?;
    let (_, builder_name) = cursor.next()?;
    let (line, inventory) = cursor.next()?;
    let inventory = parse_block_list(line, inventory)?;
    cursor.blank()?;

    let (line, total) = cursor.next()?;
    let total = parse_total(line, total)?;

    // Keyed by id; `total` comes from the file, so nothing is sized by it
    // until that many rows have actually been read.
    let mut tiles = BTreeMap::new();
    for _ in 0..total {
        let (line, row) = cursor.next()?;
        let (id, blocks) = parse_numbered_row(line, row)?;
        let id = check_tile_id(line, id, total)?;
        if tiles.contains_key(&id) {
            return Err(FormatError::DuplicateTileId { line, id });
        }
        tiles.insert(id, parse_block_list(line, blocks)?);
    }

    cursor.blank()?;
    let (line, header) = cursor.next()?;
    if header != "exits" {
        return Err(FormatError::ExpectedExitsHeader {
            line,
            text: header.to_string(),
        });
    }

    let mut exits = BTreeMap::new();
    for _ in 0..total {
        let (line, row) = cursor.next()?;
        let (id, fields) = parse_numbered_row(line, row)?;
        let id = check_tile_id(line, id, total)?;
        if exits.contains_key(&id) {
            return Err(FormatError::DuplicateTileId { line, id });
        }
        exits.insert(id, parse_exit_list(line, fields, total)?);
    }

    cursor.finish()?;

    // `total` distinct ids in 0..total: the maps hold exactly 0..total in
    // key order.
    Ok(MapRecord {
        start: Coord::new(x, y),
        builder_name: builder_name.to_string(),
        inventory,
        tiles: tiles.into_values().collect(),
        exits: exits.into_values().collect(),
    })
}

fn parse_int(line: usize, text: &str) -> Result<i32, FormatError> {
    text.parse().map_err(|_| FormatError::InvalidInteger {
        line,
        text: text.to_string(),
    })
}

/// Comma-separated block tags. The empty string is the empty list.
fn parse_block_list(line: usize, text: &str) -> Result<Vec<BlockKind>, FormatError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|token| {
            BlockKind::from_tag(token).ok_or_else(|| FormatError::UnknownBlock {
                line,
                token: token.to_string(),
            })
        })
        .collect()
}

/// `label:digits`, with a non-empty lowercase ASCII label.
fn parse_labelled(field: &str) -> Option<(&str, &str)> {
    let (label, digits) = field.split_once(':')?;
    let label_ok = !label.is_empty() && label.bytes().all(|b| b.is_ascii_lowercase());
    let digits_ok = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    (label_ok && digits_ok).then_some((label, digits))
}

fn parse_total(line: usize, text: &str) -> Result<usize, FormatError> {
    let invalid = || FormatError::InvalidTotal {
        line,
        text: text.to_string(),
    };
    let (label, digits) = parse_labelled(text).ok_or_else(invalid)?;
    if label != "total" {
        return Err(invalid());
    }
    let total = parse_int(line, digits)?;
    if total < 1 {
        return Err(invalid());
    }
    Ok(total as usize)
}

/// `<id> <rest>` with exactly one space. `rest` may be empty but the space
/// may not be omitted.
fn parse_numbered_row(line: usize, text: &str) -> Result<(i32, &str), FormatError> {
    let malformed = || FormatError::MalformedRow {
        line,
        text: text.to_string(),
    };
    let (id, rest) = text.split_once(' ').ok_or_else(malformed)?;
    if rest.contains(' ') {
        return Err(malformed());
    }
    Ok((parse_int(line, id)?, rest))
}

fn check_tile_id(line: usize, id: i32, total: usize) -> Result<usize, FormatError> {
    usize::try_from(id)
        .ok()
        .filter(|&id| id < total)
        .ok_or(FormatError::TileIdOutOfRange { line, id, total })
}

/// `dir:target,...`. The empty string means no exits.
fn parse_exit_list(
    line: usize,
    text: &str,
    total: usize,
) -> Result<[Option<usize>; 4], FormatError> {
    let mut exits = [None; 4];
    if text.is_empty() {
        return Ok(exits);
    }
    for field in text.split(',') {
        let (name, digits) = parse_labelled(field).ok_or_else(|| FormatError::MalformedExit {
            line,
            field: field.to_string(),
        })?;
        let direction = Direction::from_tag(name).ok_or_else(|| FormatError::UnknownDirection {
            line,
            name: name.to_string(),
        })?;
        let target = check_tile_id(line, parse_int(line, digits)?, total)?;
        let slot = &mut exits[direction.index()];
        if slot.is_some() {
            return Err(FormatError::DuplicateExit { line, direction });
        }
        *slot = Some(target);
    }
    Ok(exits)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Render `world` in map file format. Tile ids are BFS positions.
///
/// Panics if a laid-out tile has an exit to a tile outside the layout; the
/// BFS places every exit target, so that would be a layout bug.
pub fn write_map(world: &WorldMap, line_ending: LineEnding) -> String {
    let layout = world.layout();
    let start = world.start_position();
    let builder = world.builder();

    let mut lines = vec![
        start.x.to_string(),
        start.y.to_string(),
        builder.name().to_string(),
        block_list(builder.inventory()),
        String::new(),
        format!("total:{}", layout.len()),
    ];

    let mut exit_lines = Vec::with_capacity(layout.len());
    for (index, &id) in layout.order().iter().enumerate() {
        let tile = world
            .tile(id)
            .unwrap_or_else(|| panic!("laid-out {id} missing from arena"));
        lines.push(format!("{index} {}", block_list(tile.blocks())));

        let exits: Vec<String> = tile
            .exits()
            .map(|(direction, target)| {
                let target_index = layout
                    .index_of(target)
                    .unwrap_or_else(|| panic!("exit target {target} of {id} not laid out"));
                format!("{direction}:{target_index}")
            })
            .collect();
        exit_lines.push(format!("{index} {}", exits.join(",")));
    }

    lines.push(String::new());
    lines.push("exits".to_string());
    lines.extend(exit_lines);

    let eol = line_ending.as_str();
    let mut out = lines.join(eol);
    out.push_str(eol);
    out
}

fn block_list(blocks: &[BlockKind]) -> String {
    blocks
        .iter()
        .map(|b| b.tag())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    const BASIC: &str = "\
11
7
The Builder's Name
wood,wood,wood,soil,wood

total:3
0 stone,stone,stone
2 stone,grass,soil,wood,wood
1 stone,wood,soil

exits
1 east:0
0 west:1,north:2
2 south:0
";

    fn parse_err(text: &str) -> FormatError {
        parse_map(text).unwrap_err()
    }

    /// Minimal valid map with the given tiles/exits sections spliced in.
    fn map_with(total_line: &str, tiles: &[&str], exits: &[&str]) -> String {
        let mut text = String::from("0\n0\n\n\n\n");
        text.push_str(total_line);
        text.push('\n');
        for t in tiles {
            text.push_str(t);
            text.push('\n');
        }
        text.push_str("\nexits\n");
        for e in exits {
            text.push_str(e);
            text.push('\n');
        }
        text
    }

    #[test]
    fn parses_basic_map() {
        let record = parse_map(BASIC).unwrap();
        assert_eq!(record.start(), Coord::new(11, 7));
        assert_eq!(record.builder_name(), "The Builder's Name");
        assert_eq!(
            record.inventory(),
            &[
                BlockKind::Wood,
                BlockKind::Wood,
                BlockKind::Wood,
                BlockKind::Soil,
                BlockKind::Wood,
            ]
        );
        assert_eq!(record.tile_count(), 3);
        assert_eq!(record.tiles()[0], vec![BlockKind::Stone; 3]);
        assert_eq!(
            record.tiles()[1],
            vec![BlockKind::Stone, BlockKind::Wood, BlockKind::Soil]
        );
        assert_eq!(record.exits()[0], [Some(2), None, None, Some(1)]);
        assert_eq!(record.exits()[1], [None, Some(0), None, None]);
        assert_eq!(record.exits()[2], [None, None, Some(0), None]);
    }

    #[test]
    fn parses_minimal_map() {
        let record = parse_map(&map_with("total:1", &["0 "], &["0 "])).unwrap();
        assert_eq!(record.builder_name(), "");
        assert!(record.inventory().is_empty());
        assert_eq!(record.tiles(), &[Vec::<BlockKind>::new()]);
        assert_eq!(record.exits(), &[[None; 4]]);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let crlf = BASIC.replace('\n', "\r\n");
        assert_eq!(parse_map(&crlf).unwrap(), parse_map(BASIC).unwrap());
    }

    #[test]
    fn accepts_bare_carriage_returns() {
        let cr = BASIC.replace('\n', "\r");
        assert_eq!(parse_map(&cr).unwrap(), parse_map(BASIC).unwrap());

        let text = map_with("total:1", &["0 "], &["0 "]);
        let cr_tail = format!("{}\r", text.trim_end_matches('\n'));
        assert!(parse_map(&cr_tail).is_ok());
    }

    #[test]
    fn splits_on_every_line_terminator() {
        let lines: Vec<&str> = Lines { rest: "a\r\nb\rc\n\r\nd" }.collect();
        assert_eq!(lines, vec!["a", "b", "c", "", "d"]);
        assert_eq!(Lines { rest: "" }.count(), 0);
        assert_eq!(Lines { rest: "\n" }.collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn accepts_missing_final_newline() {
        let trimmed = BASIC.trim_end_matches('\n');
        assert!(parse_map(trimmed).is_ok());
    }

    #[test]
    fn rejects_bad_start_coordinates() {
        assert!(matches!(
            parse_err("x\n0\n"),
            FormatError::InvalidInteger { line: 1, .. }
        ));
        assert!(matches!(
            parse_err("0\n2147483648\n"),
            FormatError::InvalidInteger { line: 2, .. }
        ));
        assert!(matches!(
            parse_err("0\n 1\n"),
            FormatError::InvalidInteger { line: 2, .. }
        ));
    }

    #[test]
    fn accepts_extreme_start_coordinates() {
        let text = map_with("total:1", &["0 "], &["0 "]).replacen("0\n0\n", "-2147483648\n2147483647\n", 1);
        let record = parse_map(&text).unwrap();
        assert_eq!(record.start(), Coord::new(i32::MIN, i32::MAX));
    }

    #[test]
    fn rejects_early_end_of_file() {
        assert_eq!(parse_err(""), FormatError::UnexpectedEof { line: 1 });
        assert_eq!(parse_err("1\n2\nname\n"), FormatError::UnexpectedEof { line: 4 });
    }

    #[test]
    fn rejects_bad_inventory() {
        assert!(matches!(
            parse_err("0\n0\nname\nwood,gold\n"),
            FormatError::UnknownBlock { line: 4, .. }
        ));
        assert!(matches!(
            parse_err("0\n0\nname\nwood,\n"),
            FormatError::UnknownBlock { line: 4, .. }
        ));
        assert!(matches!(
            parse_err("0\n0\nname\nwood, soil\n"),
            FormatError::UnknownBlock { line: 4, .. }
        ));
    }

    #[test]
    fn rejects_non_blank_separator() {
        assert_eq!(
            parse_err("0\n0\nname\n\n \ntotal:1\n"),
            FormatError::ExpectedBlank { line: 5 }
        );
    }

    #[test]
    fn rejects_bad_total_lines() {
        for total in ["total:0", "total:-1", "total:", "total", "tot:1", "total:1,x:2", "Total:1", "total: 1", ""] {
            let text = map_with(total, &["0 "], &["0 "]);
            assert!(
                matches!(
                    parse_err(&text),
                    FormatError::InvalidTotal { line: 6, .. } | FormatError::InvalidInteger { line: 6, .. }
                ),
                "{total:?}"
            );
        }
    }

    #[test]
    fn total_with_leading_zeros_is_accepted() {
        let record = parse_map(&map_with("total:01", &["0 "], &["0 "])).unwrap();
        assert_eq!(record.tile_count(), 1);
    }

    #[test]
    fn tile_rows_need_exactly_one_space() {
        assert!(matches!(
            parse_err(&map_with("total:1", &["0"], &["0 "])),
            FormatError::MalformedRow { line: 7, .. }
        ));
        assert!(matches!(
            parse_err(&map_with("total:1", &["0  "], &["0 "])),
            FormatError::MalformedRow { line: 7, .. }
        ));
        assert!(matches!(
            parse_err(&map_with("total:1", &["0 wood soil"], &["0 "])),
            FormatError::MalformedRow { line: 7, .. }
        ));
    }

    #[test]
    fn exit_rows_need_exactly_one_space() {
        assert!(matches!(
            parse_err(&map_with("total:1", &["0 "], &["0"])),
            FormatError::MalformedRow { line: 10, .. }
        ));
    }

    #[test]
    fn rejects_bad_tile_ids() {
        assert_eq!(
            parse_err(&map_with("total:2", &["0 ", "2 "], &["0 ", "1 "])),
            FormatError::TileIdOutOfRange { line: 8, id: 2, total: 2 }
        );
        assert_eq!(
            parse_err(&map_with("total:2", &["-1 ", "0 "], &["0 ", "1 "])),
            FormatError::TileIdOutOfRange { line: 7, id: -1, total: 2 }
        );
        assert_eq!(
            parse_err(&map_with("total:2", &["1 ", "1 "], &["0 ", "1 "])),
            FormatError::DuplicateTileId { line: 8, id: 1 }
        );
        assert!(matches!(
            parse_err(&map_with("total:1", &["a "], &["0 "])),
            FormatError::InvalidInteger { line: 7, .. }
        ));
    }

    #[test]
    fn rejects_unknown_tile_blocks() {
        assert!(matches!(
            parse_err(&map_with("total:1", &["0 wood,Wood"], &["0 "])),
            FormatError::UnknownBlock { line: 7, .. }
        ));
    }

    #[test]
    fn too_few_tile_rows_is_an_error() {
        // The exits section starts where the second tile row should be.
        assert!(parse_map(&map_with("total:2", &["0 "], &["0 ", "1 "])).is_err());
    }

    #[test]
    fn rejects_missing_exits_header() {
        let text = map_with("total:1", &["0 "], &["0 "]).replace("exits", "exit");
        assert!(matches!(
            parse_err(&text),
            FormatError::ExpectedExitsHeader { line: 9, .. }
        ));
    }

    #[test]
    fn rejects_missing_exit_line() {
        let text = map_with("total:1", &["0 "], &[]);
        assert_eq!(parse_err(&text), FormatError::UnexpectedEof { line: 10 });
    }

    fn exit_err(row: &str) -> FormatError {
        parse_err(&map_with("total:2", &["0 ", "1 "], &[row, "1 "]))
    }

    #[test]
    fn rejects_bad_exits() {
        assert!(matches!(exit_err("0 up:1"), FormatError::UnknownDirection { line: 11, .. }));
        assert!(matches!(exit_err("0 North:1"), FormatError::MalformedExit { .. }));
        assert!(matches!(exit_err("0 north:-1"), FormatError::MalformedExit { .. }));
        assert!(matches!(exit_err("0 north:1,"), FormatError::MalformedExit { .. }));
        assert!(matches!(exit_err("0 north1"), FormatError::MalformedExit { .. }));
        assert!(matches!(
            exit_err("0 north:2"),
            FormatError::TileIdOutOfRange { id: 2, total: 2, .. }
        ));
        assert!(matches!(
            exit_err("0 north:99999999999"),
            FormatError::InvalidInteger { .. }
        ));
        assert_eq!(
            exit_err("0 north:1,north:0"),
            FormatError::DuplicateExit {
                line: 11,
                direction: Direction::North,
            }
        );
    }

    #[test]
    fn rejects_exit_rows_outside_tile_range() {
        assert_eq!(
            parse_err(&map_with("total:1", &["0 "], &["5 "])),
            FormatError::TileIdOutOfRange { line: 10, id: 5, total: 1 }
        );
        assert_eq!(
            parse_err(&map_with("total:1", &["0 "], &["-1 "])),
            FormatError::TileIdOutOfRange { line: 10, id: -1, total: 1 }
        );
        assert_eq!(
            parse_err(&map_with("total:2", &["0 ", "1 "], &["0 ", "2 south:0"])),
            FormatError::TileIdOutOfRange { line: 12, id: 2, total: 2 }
        );
    }

    #[test]
    fn rejects_duplicate_exit_rows() {
        assert_eq!(
            parse_err(&map_with("total:2", &["0 ", "1 "], &["0 ", "0 "])),
            FormatError::DuplicateTileId { line: 12, id: 0 }
        );
    }

    #[test]
    fn rejects_trailing_content() {
        let mut text = map_with("total:1", &["0 "], &["0 "]);
        text.push('\n');
        assert_eq!(parse_err(&text), FormatError::TrailingContent { line: 11 });
    }

    #[test]
    fn build_creates_tiles_and_exits() {
        let (arena, builder) = parse_map(BASIC).unwrap().build().unwrap();
        assert_eq!(arena.len(), 3);
        assert_eq!(builder.current_tile(), TileId(0));
        let start = arena.get(TileId(0)).unwrap();
        assert_eq!(start.exit(Direction::North), Some(TileId(2)));
        assert_eq!(start.exit(Direction::West), Some(TileId(1)));
        assert_eq!(start.blocks(), &[BlockKind::Stone; 3]);
    }

    #[test]
    fn build_links_exits_to_the_last_tile() {
        let record = parse_map(&map_with(
            "total:3",
            &["2 ", "0 ", "1 "],
            &["2 west:0", "1 south:2", "0 east:2"],
        ))
        .unwrap();
        assert_eq!(record.exits().len(), record.tile_count());

        let (arena, _) = record.build().unwrap();
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.get(TileId(0)).unwrap().exit(Direction::East), Some(TileId(2)));
        assert_eq!(arena.get(TileId(1)).unwrap().exit(Direction::South), Some(TileId(2)));
        assert_eq!(arena.get(TileId(2)).unwrap().exit(Direction::West), Some(TileId(0)));
    }

    #[test]
    fn build_rejects_uncarryable_inventory() {
        let text = map_with("total:1", &["0 "], &["0 "]).replacen("0\n0\n\n\n", "0\n0\n\nwood,stone\n", 1);
        let record = parse_map(&text).unwrap();
        assert_eq!(
            record.build().unwrap_err(),
            FormatError::Inventory(BuilderError::NotCarryable(BlockKind::Stone))
        );
    }

    #[test]
    fn build_rejects_overfull_stacks() {
        let record = parse_map(&map_with(
            "total:2",
            &["0 ", "1 wood,wood,wood,wood,wood,wood,wood,wood,wood"],
            &["0 ", "1 "],
        ))
        .unwrap();
        assert!(matches!(
            record.build().unwrap_err(),
            FormatError::Stack { tile: 1, .. }
        ));

        let record =
            parse_map(&map_with("total:1", &["0 stone,stone,stone,grass"], &["0 "])).unwrap();
        assert!(matches!(
            record.build().unwrap_err(),
            FormatError::Stack { tile: 0, .. }
        ));
    }

    #[test]
    fn write_numbers_tiles_in_bfs_order() {
        let world = WorldMap::from_map_str(BASIC, &MapConfig::default()).unwrap();
        let text = write_map(&world, LineEnding::Lf);
        assert_eq!(
            text,
            "\
11
7
The Builder's Name
wood,wood,wood,soil,wood

total:3
0 stone,stone,stone
1 stone,grass,soil,wood,wood
2 stone,wood,soil

exits
0 north:1,west:2
1 south:0
2 east:0
"
        );
    }

    #[test]
    fn write_uses_configured_line_ending() {
        let world = WorldMap::from_map_str(BASIC, &MapConfig::default()).unwrap();
        let text = write_map(&world, LineEnding::CrLf);
        assert!(text.ends_with("2 east:0\r\n"));
        assert_eq!(text.matches("\r\n").count(), text.matches('\n').count());
    }
}
