// Data-driven map handling configuration.
//
// `MapConfig` collects the few knobs that affect how maps are read, written
// and re-laid-out. It deserializes from JSON with every field optional, so an
// empty object `{}` yields the defaults:
//
// - `line_ending`: terminator written after every line by `save`. Loading
//   accepts `\n`, `\r\n` and a lone `\r`.
// - `failure_policy`: what `TileLayout::rebuild()` does with its previous
//   state when a rebuild turns out to be inconsistent. `Reset` (the default)
//   leaves the layout empty; `Preserve` keeps the last good layout.
//
// See also: `layout.rs` for `TileLayout`, `world_map.rs` for `load_with` /
// `save_with`, and the CLI's `--config` flag.

use serde::{Deserialize, Serialize};

/// Line terminator used when writing map files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// State kept by a layout after a failed rebuild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Discard everything; the layout is empty afterwards.
    #[default]
    Reset,
    /// Keep the last successfully computed layout.
    Preserve,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub line_ending: LineEnding,
    pub failure_policy: FailurePolicy,
}

impl MapConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
