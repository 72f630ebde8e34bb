//! Game map representation: terrain, entity records and the authoritative store.
//!
//! This module contains:
//! - Terrain and resource types
//! - The entity records (tiles, roads, settlements, trading posts)
//! - [`GameMap`], the identifier-keyed store with derived boundary sets
//!
//! `GameMap` owns every record exclusively. Collaborators read through shared
//! references and write through the update/remove methods; speculative
//! what-if evaluation goes through [`GameMap::clone`], which shares no state
//! with the original. The store performs coordinate-shape validation only -
//! game rules (costs, turn legality, distance rules) belong to the calling
//! collaborator.

use crate::coord::{Edge, Hex, Vertex};
use crate::error::MapError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Player identifier (0-3 for a 4-player game).
pub type PlayerId = u8;

/// Resource kinds offered in trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Grain,
    Lumber,
    Wool,
    Brick,
    Ore,
}

impl Resource {
    /// All resource kinds.
    pub const ALL: [Resource; 5] = [
        Resource::Grain,
        Resource::Lumber,
        Resource::Wool,
        Resource::Brick,
        Resource::Ore,
    ];
}

/// Terrain of a hex tile.
///
/// `Sea` is the "no terrain" default used for range fill and for tiles
/// created without an explicit terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainType {
    #[default]
    Sea,
    Desert,
    Fields,
    Forest,
    Pasture,
    Hills,
    Mountains,
}

impl TerrainType {
    /// All terrain kinds.
    pub const ALL: [TerrainType; 7] = [
        TerrainType::Sea,
        TerrainType::Desert,
        TerrainType::Fields,
        TerrainType::Forest,
        TerrainType::Pasture,
        TerrainType::Hills,
        TerrainType::Mountains,
    ];

    /// The resource this terrain produces, if any.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            TerrainType::Fields => Some(Resource::Grain),
            TerrainType::Forest => Some(Resource::Lumber),
            TerrainType::Pasture => Some(Resource::Wool),
            TerrainType::Hills => Some(Resource::Brick),
            TerrainType::Mountains => Some(Resource::Ore),
            TerrainType::Sea | TerrainType::Desert => None,
        }
    }
}

/// Occupation level of a settlement site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementLevel {
    /// Nothing built.
    #[default]
    Vacant,
    /// A settlement.
    Settlement,
    /// A city.
    City,
}

/// A single hex tile.
///
/// Tiles are the sole source of truth for which vertices and edges are part
/// of the playable board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: Hex,
    pub terrain: TerrainType,
    /// Number token 2-12, absent for sea and desert.
    pub number_token: Option<u8>,
}

impl Tile {
    pub fn new(coord: Hex, terrain: TerrainType, number_token: Option<u8>) -> Self {
        Self {
            coord,
            terrain,
            number_token,
        }
    }
}

/// A road on an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub coord: Edge,
    pub owner: PlayerId,
}

/// A settlement record on a vertex.
///
/// Absence of a record means "unoccupied", not "off-board"; board membership
/// is decided by [`GameMap::has_vertex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub coord: Vertex,
    pub owner: Option<PlayerId>,
    pub level: SettlementLevel,
}

/// A trading post anchored to a hex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingPost {
    pub coord: Hex,
    /// Positions in [`Hex::vertices`] order that this post services.
    pub index_list: Vec<u8>,
    /// Required quantity per resource. Empty means the standard any-resource
    /// ratio, which gameplay collaborators resolve themselves.
    pub trade_list: HashMap<Resource, u8>,
}

impl TradingPost {
    /// The vertex coordinates this post services; out-of-range indices are
    /// skipped.
    pub fn vertices(&self) -> Vec<Vertex> {
        let corners = self.coord.vertices();
        self.index_list
            .iter()
            .filter_map(|&i| corners.get(i as usize).copied())
            .collect()
    }
}

/// One of the four entity stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tiles,
    Roads,
    Settlements,
    TradingPosts,
}

impl FromStr for EntityKind {
    type Err = MapError;

    fn from_str(name: &str) -> Result<Self, MapError> {
        match name {
            "tiles" => Ok(EntityKind::Tiles),
            "roads" => Ok(EntityKind::Roads),
            "settlements" => Ok(EntityKind::Settlements),
            "tradingposts" => Ok(EntityKind::TradingPosts),
            other => Err(MapError::InvalidEntityKind(other.to_string())),
        }
    }
}

/// An owned snapshot of one entity, as returned by [`GameMap::filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Tile(Tile),
    Road(Road),
    Settlement(Settlement),
    TradingPost(TradingPost),
}

/// The authoritative store for every placed entity plus the robber position.
///
/// The legal vertex and edge sets are derived from the tile set and kept
/// consistent across every tile addition and removal, so membership queries
/// never observe a stale view.
#[derive(Debug, Clone, PartialEq)]
pub struct GameMap {
    tiles: HashMap<Hex, Tile>,
    roads: HashMap<Edge, Road>,
    settlements: HashMap<Vertex, Settlement>,
    trading_posts: HashMap<Hex, TradingPost>,
    robber: Hex,
    vertex_ids: HashSet<Vertex>,
    edge_ids: HashSet<Edge>,
}

impl GameMap {
    /// Create an empty map with the robber at the origin.
    pub fn new() -> Self {
        Self {
            tiles: HashMap::new(),
            roads: HashMap::new(),
            settlements: HashMap::new(),
            trading_posts: HashMap::new(),
            robber: Hex::ORIGIN,
            vertex_ids: HashSet::new(),
            edge_ids: HashSet::new(),
        }
    }

    // ==================== Query Methods ====================

    /// Get a tile by coordinate.
    pub fn get_tile(&self, coord: &Hex) -> Option<&Tile> {
        self.tiles.get(coord)
    }

    /// Get a road by coordinate.
    pub fn get_road(&self, coord: &Edge) -> Option<&Road> {
        self.roads.get(coord)
    }

    /// Get a settlement record by coordinate.
    pub fn get_settlement(&self, coord: &Vertex) -> Option<&Settlement> {
        self.settlements.get(coord)
    }

    /// Get a trading post by its anchor hex.
    pub fn get_trading_post(&self, coord: &Hex) -> Option<&TradingPost> {
        self.trading_posts.get(coord)
    }

    /// All tiles, in arbitrary order.
    pub fn all_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// All roads, in arbitrary order.
    pub fn all_roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    /// All settlement records, in arbitrary order.
    pub fn all_settlements(&self) -> impl Iterator<Item = &Settlement> {
        self.settlements.values()
    }

    /// All trading posts, in arbitrary order.
    pub fn all_trading_posts(&self) -> impl Iterator<Item = &TradingPost> {
        self.trading_posts.values()
    }

    /// The legal on-board vertex set: every corner of every current tile.
    pub fn vertex_ids(&self) -> &HashSet<Vertex> {
        &self.vertex_ids
    }

    /// The legal on-board edge set: every side of every current tile.
    pub fn edge_ids(&self) -> &HashSet<Edge> {
        &self.edge_ids
    }

    /// Whether a vertex is part of the playable board. This set membership is
    /// the sole authority; a vertex with no settlement record is merely
    /// unoccupied.
    pub fn has_vertex(&self, coord: &Vertex) -> bool {
        self.vertex_ids.contains(coord)
    }

    /// Whether an edge is part of the playable board.
    pub fn has_edge(&self, coord: &Edge) -> bool {
        self.edge_ids.contains(coord)
    }

    /// The existing tiles among the three hex positions touching a vertex.
    pub fn tiles_at_vertex(&self, coord: &Vertex) -> Vec<&Tile> {
        coord
            .adjacent_hexes()
            .iter()
            .filter_map(|hex| self.tiles.get(hex))
            .collect()
    }

    /// The on-board vertices one edge away from the given vertex.
    pub fn neighbors_of_vertex(&self, coord: &Vertex) -> Vec<Vertex> {
        coord
            .adjacent_vertices()
            .into_iter()
            .filter(|v| self.has_vertex(v))
            .collect()
    }

    /// The robber's current hex.
    pub fn robber(&self) -> Hex {
        self.robber
    }

    /// Scan one store, returning owned snapshots of the matching entities.
    pub fn filter<F>(&self, kind: EntityKind, predicate: F) -> Vec<Entity>
    where
        F: Fn(&Entity) -> bool,
    {
        let entities: Vec<Entity> = match kind {
            EntityKind::Tiles => self.tiles.values().cloned().map(Entity::Tile).collect(),
            EntityKind::Roads => self.roads.values().cloned().map(Entity::Road).collect(),
            EntityKind::Settlements => self
                .settlements
                .values()
                .cloned()
                .map(Entity::Settlement)
                .collect(),
            EntityKind::TradingPosts => self
                .trading_posts
                .values()
                .cloned()
                .map(Entity::TradingPost)
                .collect(),
        };
        entities.into_iter().filter(|e| predicate(e)).collect()
    }

    // ==================== Mutation Methods ====================

    /// Create or merge a tile.
    ///
    /// An outer `None` leaves that field untouched on an existing tile;
    /// `Some(None)` clears the number token. A newly created tile defaults to
    /// [`TerrainType::Sea`] and no token for whichever field is omitted.
    pub fn update_tile(
        &mut self,
        coord: Hex,
        terrain: Option<TerrainType>,
        number_token: Option<Option<u8>>,
    ) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            if let Some(terrain) = terrain {
                tile.terrain = terrain;
            }
            if let Some(token) = number_token {
                tile.number_token = token;
            }
        } else {
            let tile = Tile::new(coord, terrain.unwrap_or_default(), number_token.flatten());
            self.tiles.insert(coord, tile);
            // A new tile only ever grows the boundary sets.
            self.vertex_ids.extend(coord.vertices());
            self.edge_ids.extend(coord.edges());
        }
    }

    /// Create a road or reassign its owner.
    pub fn update_road(&mut self, coord: Edge, owner: PlayerId) {
        self.roads.insert(coord, Road { coord, owner });
    }

    /// Create or merge a settlement record; `None` leaves a field untouched.
    pub fn update_settlement(
        &mut self,
        coord: Vertex,
        owner: Option<PlayerId>,
        level: Option<SettlementLevel>,
    ) {
        let settlement = self.settlements.entry(coord).or_insert_with(|| Settlement {
            coord,
            owner: None,
            level: SettlementLevel::default(),
        });
        if let Some(owner) = owner {
            settlement.owner = Some(owner);
        }
        if let Some(level) = level {
            settlement.level = level;
        }
    }

    /// Create or replace a trading post wholesale. Unlike tiles and
    /// settlements, the index list is never merged; `None` for the trade list
    /// means the standard any-resource ratio (an empty mapping).
    pub fn update_trading_post(
        &mut self,
        coord: Hex,
        index_list: Vec<u8>,
        trade_list: Option<HashMap<Resource, u8>>,
    ) {
        let post = TradingPost {
            coord,
            index_list,
            trade_list: trade_list.unwrap_or_default(),
        };
        self.trading_posts.insert(coord, post);
    }

    /// Remove a tile; removing a nonexistent tile is not an error.
    pub fn remove_tile(&mut self, coord: &Hex) {
        if self.tiles.remove(coord).is_some() {
            self.rebuild_boundary_sets();
        }
    }

    /// Remove a road; idempotent.
    pub fn remove_road(&mut self, coord: &Edge) {
        self.roads.remove(coord);
    }

    /// Remove a settlement record; idempotent.
    pub fn remove_settlement(&mut self, coord: &Vertex) {
        self.settlements.remove(coord);
    }

    /// Move the robber.
    pub fn update_robber(&mut self, coord: Hex) {
        self.robber = coord;
    }

    /// Recompute both boundary sets from scratch. Removal can orphan vertices
    /// and edges still covered by other tiles, so the union is rebuilt rather
    /// than subtracted.
    fn rebuild_boundary_sets(&mut self) {
        self.vertex_ids.clear();
        self.edge_ids.clear();
        for hex in self.tiles.keys() {
            self.vertex_ids.extend(hex.vertices());
            self.edge_ids.extend(hex.edges());
        }
    }
}

impl Default for GameMap {
    fn default() -> Self {
        Self::new()
    }
}
