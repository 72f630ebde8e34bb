//! Cube coordinate system for the game board.
//!
//! This module provides the foundational coordinate types:
//! - [`Coord`]: a raw `(q, r, s)` triplet with the `"q,r,s"` identifier form
//! - [`Hex`]: identifies individual hex tiles (`q + r + s == 0`)
//! - [`Vertex`]: identifies corners where settlements are placed (`|q + r + s| == 1`)
//! - [`Edge`]: identifies sides where roads are placed (two odd components, one even)
//!
//! A single integer lattice carries all three classes: a hex's six corners are
//! the hex plus one signed unit axis each, and an edge is the componentwise sum
//! of its two endpoint vertices (which is also the sum of the two hexes that
//! share it). That sum is unique per edge, so no canonicalization step is
//! needed - equal coordinates are the same board feature.
//!
//! The three validity predicates are disjoint in intent but not in
//! representation (for example `1,0,-1` passes both the hex and the edge
//! predicate), so callers pick the class they mean by constructing the typed
//! wrapper for it. Construction is the validation point: once a `Hex`,
//! `Vertex` or `Edge` exists, every derivation on it is infallible.

use crate::error::MapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// The six corner offsets of a hex, counter-clockwise from the east corner.
///
/// Index positions are load-bearing: trading posts reference the vertices they
/// service by index into [`Hex::vertices`], so this order must never change.
const CORNER_OFFSETS: [Coord; 6] = [
    Coord::new(1, 0, 0),
    Coord::new(0, 0, -1),
    Coord::new(0, 1, 0),
    Coord::new(-1, 0, 0),
    Coord::new(0, 0, 1),
    Coord::new(0, -1, 0),
];

/// Edge offsets relative to a doubled hex coordinate; entry `i` is the sum of
/// corner offsets `i` and `i + 1`, so edge `i` runs between those two corners.
/// These are also the six neighbor directions of a hex.
const EDGE_OFFSETS: [Coord; 6] = [
    Coord::new(1, 0, -1),
    Coord::new(0, 1, -1),
    Coord::new(-1, 1, 0),
    Coord::new(-1, 0, 1),
    Coord::new(0, -1, 1),
    Coord::new(1, -1, 0),
];

/// The three positive unit axes. A vertex whose components sum to `+1` touches
/// the hexes found by subtracting each axis; a `-1` vertex by adding each.
const AXIS_UNITS: [Coord; 3] = [
    Coord::new(1, 0, 0),
    Coord::new(0, 1, 0),
    Coord::new(0, 0, 1),
];

/// Offset triad connecting a vertex to its three adjacent vertices. Subtracted
/// for the `+1` vertex class, added for the `-1` class - exactly one of the
/// two signings yields valid vertex coordinates for any given vertex.
const PAIR_OFFSETS: [Coord; 3] = [
    Coord::new(1, 1, 0),
    Coord::new(1, 0, 1),
    Coord::new(0, 1, 1),
];

/// Which coordinate class a validation was performed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordClass {
    Hex,
    Vertex,
    Edge,
}

impl fmt::Display for CoordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoordClass::Hex => "hex",
            CoordClass::Vertex => "vertex",
            CoordClass::Edge => "edge",
        };
        f.write_str(name)
    }
}

/// A raw cube coordinate triplet.
///
/// `Coord` carries no class guarantee; it is the exchange form used by
/// templates and identifiers. Serialized as a compact `[q, r, s]` array.
/// The canonical string identifier is `"q,r,s"` via [`fmt::Display`] /
/// [`FromStr`], and the two forms round-trip exactly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct Coord {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl Coord {
    /// Create a new coordinate triplet.
    pub const fn new(q: i32, r: i32, s: i32) -> Self {
        Self { q, r, s }
    }

    const fn sum(&self) -> i32 {
        self.q + self.r + self.s
    }

    /// True for a hex coordinate: the components sum to zero.
    pub const fn is_valid_hex(&self) -> bool {
        self.sum() == 0
    }

    /// True for a vertex coordinate: the components sum to `+1` or `-1`.
    pub const fn is_valid_vertex(&self) -> bool {
        self.sum().abs() == 1
    }

    /// True for an edge coordinate: exactly two components are odd.
    pub const fn is_valid_edge(&self) -> bool {
        (self.q & 1) + (self.r & 1) + (self.s & 1) == 2
    }
}

impl From<[i32; 3]> for Coord {
    fn from([q, r, s]: [i32; 3]) -> Self {
        Self { q, r, s }
    }
}

impl From<Coord> for [i32; 3] {
    fn from(coord: Coord) -> Self {
        [coord.q, coord.r, coord.s]
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.q + rhs.q, self.r + rhs.r, self.s + rhs.s)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.q - rhs.q, self.r - rhs.r, self.s - rhs.s)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.q, self.r, self.s)
    }
}

impl FromStr for Coord {
    type Err = MapError;

    fn from_str(id: &str) -> Result<Self, MapError> {
        let malformed = || MapError::MalformedId(id.to_string());
        let mut parts = id.split(',');
        let mut next = || -> Result<i32, MapError> {
            parts
                .next()
                .and_then(|p| p.trim().parse().ok())
                .ok_or_else(malformed)
        };
        let coord = Coord::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(coord)
    }
}

/// A validated hex coordinate, identifying one tile position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "Coord", into = "Coord")]
pub struct Hex(Coord);

impl Hex {
    /// The center of the board; also the robber's starting position.
    pub const ORIGIN: Hex = Hex(Coord::new(0, 0, 0));

    /// Create a hex coordinate, validating `q + r + s == 0`.
    pub fn new(q: i32, r: i32, s: i32) -> Result<Self, MapError> {
        Self::try_from(Coord::new(q, r, s))
    }

    /// The raw coordinate triplet.
    pub const fn coord(&self) -> Coord {
        self.0
    }

    /// The six vertices of this hex, counter-clockwise from the east corner.
    ///
    /// Index positions are stable; trading posts address the vertices they
    /// service by index into this array.
    pub fn vertices(&self) -> [Vertex; 6] {
        CORNER_OFFSETS.map(|offset| Vertex(self.0 + offset))
    }

    /// The six edges of this hex; edge `i` connects vertices `i` and `i + 1`
    /// of [`Hex::vertices`].
    pub fn edges(&self) -> [Edge; 6] {
        let Coord { q, r, s } = self.0;
        EDGE_OFFSETS.map(|offset| Edge(Coord::new(2 * q, 2 * r, 2 * s) + offset))
    }

    /// The six neighboring hexes; neighbor `i` shares edge `i` with this hex.
    pub fn neighbors(&self) -> [Hex; 6] {
        EDGE_OFFSETS.map(|offset| Hex(self.0 + offset))
    }
}

impl TryFrom<Coord> for Hex {
    type Error = MapError;

    fn try_from(coord: Coord) -> Result<Self, MapError> {
        if coord.is_valid_hex() {
            Ok(Self(coord))
        } else {
            Err(MapError::InvalidCoordinate {
                class: CoordClass::Hex,
                coord,
            })
        }
    }
}

impl From<Hex> for Coord {
    fn from(hex: Hex) -> Coord {
        hex.0
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Hex {
    type Err = MapError;

    fn from_str(id: &str) -> Result<Self, MapError> {
        Self::try_from(id.parse::<Coord>()?)
    }
}

/// A validated vertex coordinate, identifying one settlement site.
///
/// Each vertex is shared by up to three hexes; whether those hex positions
/// hold tiles is the map's concern, not the coordinate's.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "Coord", into = "Coord")]
pub struct Vertex(Coord);

impl Vertex {
    /// Create a vertex coordinate, validating `|q + r + s| == 1`.
    pub fn new(q: i32, r: i32, s: i32) -> Result<Self, MapError> {
        Self::try_from(Coord::new(q, r, s))
    }

    /// The raw coordinate triplet.
    pub const fn coord(&self) -> Coord {
        self.0
    }

    /// The three hex positions touching this vertex.
    ///
    /// All three candidates are returned whether or not a tile exists there;
    /// existence filtering belongs to [`crate::map::GameMap`].
    pub fn adjacent_hexes(&self) -> [Hex; 3] {
        if self.0.sum() == 1 {
            AXIS_UNITS.map(|axis| Hex(self.0 - axis))
        } else {
            AXIS_UNITS.map(|axis| Hex(self.0 + axis))
        }
    }

    /// The three vertices connected to this one by a single edge.
    pub fn adjacent_vertices(&self) -> [Vertex; 3] {
        if self.0.sum() == 1 {
            PAIR_OFFSETS.map(|offset| Vertex(self.0 - offset))
        } else {
            PAIR_OFFSETS.map(|offset| Vertex(self.0 + offset))
        }
    }

    /// Whether `other` is one edge away from this vertex.
    pub fn is_adjacent(&self, other: &Vertex) -> bool {
        self.adjacent_vertices().contains(other)
    }
}

impl TryFrom<Coord> for Vertex {
    type Error = MapError;

    fn try_from(coord: Coord) -> Result<Self, MapError> {
        if coord.is_valid_vertex() {
            Ok(Self(coord))
        } else {
            Err(MapError::InvalidCoordinate {
                class: CoordClass::Vertex,
                coord,
            })
        }
    }
}

impl From<Vertex> for Coord {
    fn from(vertex: Vertex) -> Coord {
        vertex.0
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Vertex {
    type Err = MapError;

    fn from_str(id: &str) -> Result<Self, MapError> {
        Self::try_from(id.parse::<Coord>()?)
    }
}

/// A validated edge coordinate, identifying one road site.
///
/// An edge coordinate equals the componentwise sum of its two endpoint
/// vertices, and that sum is unique per edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "Coord", into = "Coord")]
pub struct Edge(Coord);

impl Edge {
    /// Create an edge coordinate, validating the two-odd-one-even rule.
    pub fn new(q: i32, r: i32, s: i32) -> Result<Self, MapError> {
        Self::try_from(Coord::new(q, r, s))
    }

    /// The raw coordinate triplet.
    pub const fn coord(&self) -> Coord {
        self.0
    }

    /// The edge connecting two adjacent vertices: their componentwise sum.
    ///
    /// Fails with `InvalidCoordinate` when the vertices are not one edge
    /// apart (the sum of a non-adjacent pair is not an edge coordinate).
    pub fn from_vertices(a: Vertex, b: Vertex) -> Result<Edge, MapError> {
        let sum = a.0 + b.0;
        if !a.is_adjacent(&b) {
            return Err(MapError::InvalidCoordinate {
                class: CoordClass::Edge,
                coord: sum,
            });
        }
        Ok(Edge(sum))
    }

    /// The two vertices at the ends of this edge.
    ///
    /// The even axis halves identically for both endpoints; the two odd axes
    /// split one unit apart.
    pub fn endpoints(&self) -> [Vertex; 2] {
        let Coord { q, r, s } = self.0;
        let mask = Coord::new(q & 1, r & 1, s & 1);
        let high = Coord::new((q + mask.q) / 2, (r + mask.r) / 2, (s + mask.s) / 2);
        let low = Coord::new((q - mask.q) / 2, (r - mask.r) / 2, (s - mask.s) / 2);
        [Vertex(high), Vertex(low)]
    }
}

impl TryFrom<Coord> for Edge {
    type Error = MapError;

    fn try_from(coord: Coord) -> Result<Self, MapError> {
        if coord.is_valid_edge() {
            Ok(Self(coord))
        } else {
            Err(MapError::InvalidCoordinate {
                class: CoordClass::Edge,
                coord,
            })
        }
    }
}

impl From<Edge> for Coord {
    fn from(edge: Edge) -> Coord {
        edge.0
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Edge {
    type Err = MapError;

    fn from_str(id: &str) -> Result<Self, MapError> {
        Self::try_from(id.parse::<Coord>()?)
    }
}
