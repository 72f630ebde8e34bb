//! Error taxonomy for the board topology engine.

use crate::coord::{Coord, CoordClass};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by coordinate validation, the map store and the generator.
///
/// All variants are raised synchronously at the call that detects them and
/// are never retried internally; recovery policy belongs to the caller. The
/// one exception is the best-effort template load boundary, which catches,
/// logs and leaves the map uninitialized instead of propagating.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MapError {
    /// A coordinate failed the validity predicate of its intended class.
    #[error("{coord} is not a valid {class} coordinate")]
    InvalidCoordinate { class: CoordClass, coord: Coord },

    /// An identifier string could not be parsed back into a triplet.
    #[error("malformed coordinate id `{0}`")]
    MalformedId(String),

    /// A template document was structurally unusable.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// A randomized-assignment pool did not cover its targets exactly.
    #[error("attribute pool size {pool} does not match target count {targets}")]
    PoolSizeMismatch { pool: usize, targets: usize },

    /// An attribute kind outside `{terrain_type, number_token}`.
    #[error("invalid attribute kind `{0}`")]
    InvalidAttributeKind(String),

    /// A store name outside `{tiles, roads, settlements, tradingposts}`.
    #[error("invalid entity kind `{0}`")]
    InvalidEntityKind(String),
}
