//! Declarative board-layout documents.
//!
//! A template is the persisted board format the generator consumes and
//! produces. It carries an optional cube-range fill for tiles plus explicit
//! override lists for every entity kind. Every section and field is optional
//! and unknown fields are ignored, so documents stay loadable across format
//! growth.
//!
//! Overrides are applied after the range fill, so they win. An override's
//! token field is applied wholesale: omitting it leaves that tile without a
//! token rather than inheriting the range default.

use crate::coord::Coord;
use crate::map::{PlayerId, Resource, SettlementLevel, TerrainType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A complete board-layout document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub tiles: TileSection,
    #[serde(default)]
    pub roads: RoadSection,
    #[serde(default)]
    pub settlements: SettlementSection,
    #[serde(default, rename = "tradingposts")]
    pub trading_posts: TradingPostSection,
}

/// Tile layout: an optional range fill plus explicit overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileSection {
    /// Cube range to fill with the default tile; skipped when absent.
    #[serde(default)]
    pub range: Option<CoordRange>,
    #[serde(default)]
    pub defaults: TileDefaults,
    #[serde(default)]
    pub overrides: Vec<TileOverride>,
}

/// Inclusive per-axis bounds; only triplets satisfying the hex predicate are
/// generated from the enclosed cube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordRange {
    pub q: [i32; 2],
    pub r: [i32; 2],
    pub s: [i32; 2],
}

/// Default attributes for range-filled tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileDefaults {
    #[serde(default)]
    pub terrain: Option<TerrainType>,
    /// Kept as a raw JSON value so that a non-numeric token is reported as an
    /// invalid template rather than a parse failure.
    #[serde(default)]
    pub number_token: Option<serde_json::Value>,
}

/// An explicit tile entry; wins over the range fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileOverride {
    pub coord: Coord,
    #[serde(default)]
    pub terrain: Option<TerrainType>,
    #[serde(default)]
    pub number_token: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadSection {
    #[serde(default)]
    pub overrides: Vec<RoadOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadOverride {
    pub coord: Coord,
    pub owner: PlayerId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementSection {
    #[serde(default)]
    pub overrides: Vec<SettlementOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementOverride {
    pub coord: Coord,
    #[serde(default)]
    pub owner: Option<PlayerId>,
    #[serde(default)]
    pub level: SettlementLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingPostSection {
    #[serde(default)]
    pub overrides: Vec<TradingPostOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingPostOverride {
    pub coord: Coord,
    #[serde(default)]
    pub index_list: Vec<u8>,
    #[serde(default)]
    pub trade_list: Option<HashMap<Resource, u8>>,
}
