//! Skerry - a hex-grid board topology engine for island trading games.
//!
//! This crate models a Settlers-style board as a graph of hexagonal tiles,
//! their shared vertices (settlement sites) and shared edges (road sites),
//! plus trading posts and the robber position. It provides:
//! - Cube-coordinate math deriving vertices and edges from hexes
//! - The authoritative [`GameMap`] store with derived boundary sets
//! - A template-driven [`MapGenerator`] with randomized, count-exact
//!   attribute assignment
//!
//! # Architecture
//!
//! The engine is the topology core only. Rendering, turn sequencing, dice and
//! the trading economy are collaborators that consume it: they query the map
//! for legality and adjacency, write placements back through its update
//! methods, and enforce the game rules themselves. The map is handed around
//! by explicit reference - nothing here is process-global.
//!
//! # Modules
//!
//! - [`coord`]: cube coordinates for hexes, vertices and edges
//! - [`map`]: entity records and the identifier-keyed store
//! - [`template`]: the declarative board-layout document
//! - [`generator`]: template loading, serialization and randomized assignment
//! - [`error`]: the crate error taxonomy

pub mod coord;
pub mod error;
pub mod generator;
pub mod map;
pub mod template;

// Re-export commonly used types
pub use coord::{Coord, CoordClass, Edge, Hex, Vertex};
pub use error::MapError;
pub use generator::{MapGenerator, TileAttribute, TileAttributeKind};
pub use map::{
    Entity, EntityKind, GameMap, PlayerId, Resource, Road, Settlement, SettlementLevel,
    TerrainType, Tile, TradingPost,
};
pub use template::{CoordRange, Template, TileDefaults, TileOverride, TileSection};
