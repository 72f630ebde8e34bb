//! Board generation: template load/serialize and randomized attribute
//! assignment.
//!
//! The generator owns the [`GameMap`] it populates and hands it to the
//! game-flow collaborator through accessors - there is no global board
//! instance. Loading is best-effort at the file boundary: a failed read or
//! parse is logged and leaves the previous map (and the initialization flag)
//! untouched, so callers check [`MapGenerator::is_initialized`] rather than
//! handle an error.

use crate::coord::{Coord, Edge, Hex, Vertex};
use crate::error::MapError;
use crate::map::{GameMap, TerrainType};
use crate::template::{
    RoadOverride, RoadSection, SettlementOverride, SettlementSection, Template, TileDefaults,
    TileOverride, TileSection, TradingPostOverride, TradingPostSection,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Which tile attribute a randomized assignment distributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileAttributeKind {
    TerrainType,
    NumberToken,
}

impl fmt::Display for TileAttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileAttributeKind::TerrainType => "terrain_type",
            TileAttributeKind::NumberToken => "number_token",
        };
        f.write_str(name)
    }
}

impl FromStr for TileAttributeKind {
    type Err = MapError;

    fn from_str(name: &str) -> Result<Self, MapError> {
        match name {
            "terrain_type" => Ok(TileAttributeKind::TerrainType),
            "number_token" => Ok(TileAttributeKind::NumberToken),
            other => Err(MapError::InvalidAttributeKind(other.to_string())),
        }
    }
}

/// One assignable tile attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileAttribute {
    Terrain(TerrainType),
    NumberToken(u8),
}

impl TileAttribute {
    fn matches_kind(&self, kind: TileAttributeKind) -> bool {
        matches!(
            (self, kind),
            (TileAttribute::Terrain(_), TileAttributeKind::TerrainType)
                | (TileAttribute::NumberToken(_), TileAttributeKind::NumberToken)
        )
    }
}

/// Builds a [`GameMap`] from a template and supports randomized, count-exact
/// attribute assignment over a target coordinate set.
#[derive(Debug, Clone)]
pub struct MapGenerator {
    map: GameMap,
    initialized: bool,
}

impl MapGenerator {
    /// Create a generator around an empty, uninitialized map.
    pub fn new() -> Self {
        Self {
            map: GameMap::new(),
            initialized: false,
        }
    }

    /// Whether a template has been loaded successfully.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Read access to the generated map.
    pub fn map(&self) -> &GameMap {
        &self.map
    }

    /// Write access to the generated map.
    pub fn map_mut(&mut self) -> &mut GameMap {
        &mut self.map
    }

    /// Hand the map over to the game-flow collaborator.
    pub fn into_map(self) -> GameMap {
        self.map
    }

    /// Populate the map from a template.
    ///
    /// The range fill runs first (keeping only triplets that satisfy the hex
    /// predicate), then the override lists in document order, so overrides
    /// win. The new board is committed only on success; any failure leaves
    /// the previous map and the initialization flag untouched.
    pub fn load_template(&mut self, template: &Template) -> Result<(), MapError> {
        let mut map = GameMap::new();

        let defaults = &template.tiles.defaults;
        let default_terrain = defaults.terrain.unwrap_or_default();
        let default_token = parse_default_token(&defaults.number_token)?;

        if let Some(range) = &template.tiles.range {
            for q in range.q[0]..=range.q[1] {
                for r in range.r[0]..=range.r[1] {
                    for s in range.s[0]..=range.s[1] {
                        if let Ok(hex) = Hex::try_from(Coord::new(q, r, s)) {
                            map.update_tile(hex, Some(default_terrain), Some(default_token));
                        }
                    }
                }
            }
        }

        for entry in &template.tiles.overrides {
            let hex = Hex::try_from(entry.coord)?;
            map.update_tile(hex, entry.terrain, Some(entry.number_token));
        }
        for entry in &template.roads.overrides {
            let edge = Edge::try_from(entry.coord)?;
            map.update_road(edge, entry.owner);
        }
        for entry in &template.settlements.overrides {
            let vertex = Vertex::try_from(entry.coord)?;
            map.update_settlement(vertex, entry.owner, Some(entry.level));
        }
        for entry in &template.trading_posts.overrides {
            let hex = Hex::try_from(entry.coord)?;
            map.update_trading_post(hex, entry.index_list.clone(), entry.trade_list.clone());
        }

        self.map = map;
        self.initialized = true;
        Ok(())
    }

    /// Parse a JSON document and load it; a serde failure is reported as an
    /// invalid template.
    pub fn load_from_json(&mut self, raw: &str) -> Result<(), MapError> {
        let template: Template =
            serde_json::from_str(raw).map_err(|err| MapError::InvalidTemplate(err.to_string()))?;
        self.load_template(&template)
    }

    /// Load a template document from disk.
    ///
    /// This is the engine's one suspension point. Failures are logged and
    /// swallowed; callers check [`MapGenerator::is_initialized`] afterwards.
    pub async fn load_from_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read map template");
                return;
            }
        };
        if let Err(err) = self.load_from_json(&raw) {
            warn!(path = %path.display(), %err, "failed to load map template");
        }
    }

    /// Serialize the current board back to template form.
    ///
    /// Only override lists are emitted - ranges are not reconstructed - so
    /// reloading the result reproduces an equivalent board rather than the
    /// identical document. Entries are sorted by coordinate for stable
    /// output.
    pub fn serialize_to_template(&self) -> Template {
        let mut tiles: Vec<_> = self.map.all_tiles().collect();
        tiles.sort_by_key(|t| t.coord);
        let mut roads: Vec<_> = self.map.all_roads().collect();
        roads.sort_by_key(|r| r.coord);
        let mut settlements: Vec<_> = self.map.all_settlements().collect();
        settlements.sort_by_key(|s| s.coord);
        let mut posts: Vec<_> = self.map.all_trading_posts().collect();
        posts.sort_by_key(|p| p.coord);

        Template {
            tiles: TileSection {
                range: None,
                defaults: TileDefaults::default(),
                overrides: tiles
                    .into_iter()
                    .map(|t| TileOverride {
                        coord: t.coord.into(),
                        terrain: Some(t.terrain),
                        number_token: t.number_token,
                    })
                    .collect(),
            },
            roads: RoadSection {
                overrides: roads
                    .into_iter()
                    .map(|r| RoadOverride {
                        coord: r.coord.into(),
                        owner: r.owner,
                    })
                    .collect(),
            },
            settlements: SettlementSection {
                overrides: settlements
                    .into_iter()
                    .map(|s| SettlementOverride {
                        coord: s.coord.into(),
                        owner: s.owner,
                        level: s.level,
                    })
                    .collect(),
            },
            trading_posts: TradingPostSection {
                overrides: posts
                    .into_iter()
                    .map(|p| TradingPostOverride {
                        coord: p.coord.into(),
                        index_list: p.index_list.clone(),
                        trade_list: if p.trade_list.is_empty() {
                            None
                        } else {
                            Some(p.trade_list.clone())
                        },
                    })
                    .collect(),
            },
        }
    }

    /// Randomly distribute attribute values over a target coordinate set,
    /// consuming the distribution exactly.
    ///
    /// The pool repeats each value by its requested count and must cover the
    /// targets one-to-one. Existing tiles are merged in place; missing tiles
    /// are created with the unassigned attribute defaulted (desert terrain
    /// when assigning tokens, no token when assigning terrain).
    pub fn assign_attribute_random<R: Rng>(
        &mut self,
        targets: &[Hex],
        distribution: &[(TileAttribute, usize)],
        kind: TileAttributeKind,
        rng: &mut R,
    ) -> Result<(), MapError> {
        let mut pool: Vec<TileAttribute> = Vec::with_capacity(targets.len());
        for (value, count) in distribution {
            if !value.matches_kind(kind) {
                return Err(MapError::InvalidAttributeKind(format!(
                    "{value:?} is not a {kind} value"
                )));
            }
            pool.extend(std::iter::repeat(*value).take(*count));
        }
        if pool.len() != targets.len() {
            return Err(MapError::PoolSizeMismatch {
                pool: pool.len(),
                targets: targets.len(),
            });
        }

        pool.shuffle(rng);
        for (hex, value) in targets.iter().zip(pool) {
            match value {
                TileAttribute::Terrain(terrain) => {
                    self.map.update_tile(*hex, Some(terrain), None);
                }
                TileAttribute::NumberToken(token) => {
                    // Token-only creation gets a desert placeholder terrain.
                    let terrain = match self.map.get_tile(hex) {
                        Some(_) => None,
                        None => Some(TerrainType::Desert),
                    };
                    self.map.update_tile(*hex, terrain, Some(Some(token)));
                }
            }
        }
        Ok(())
    }

    /// Randomly distribute terrain types over the targets.
    pub fn assign_terrain_types_random<R: Rng>(
        &mut self,
        targets: &[Hex],
        distribution: &[(TerrainType, usize)],
        rng: &mut R,
    ) -> Result<(), MapError> {
        let distribution: Vec<_> = distribution
            .iter()
            .map(|&(terrain, count)| (TileAttribute::Terrain(terrain), count))
            .collect();
        self.assign_attribute_random(targets, &distribution, TileAttributeKind::TerrainType, rng)
    }

    /// Randomly distribute number tokens over the targets.
    pub fn assign_number_tokens_random<R: Rng>(
        &mut self,
        targets: &[Hex],
        distribution: &[(u8, usize)],
        rng: &mut R,
    ) -> Result<(), MapError> {
        let distribution: Vec<_> = distribution
            .iter()
            .map(|&(token, count)| (TileAttribute::NumberToken(token), count))
            .collect();
        self.assign_attribute_random(targets, &distribution, TileAttributeKind::NumberToken, rng)
    }

    /// Exchange the requested fields between two existing tiles. A missing
    /// tile makes the whole call a logged no-op.
    pub fn swap_terrain(&mut self, a: Hex, b: Hex, swap_terrain: bool, swap_token: bool) {
        let (terrain_a, token_a, terrain_b, token_b) = {
            let (Some(tile_a), Some(tile_b)) = (self.map.get_tile(&a), self.map.get_tile(&b))
            else {
                warn!(a = %a, b = %b, "swap requested for a missing tile, ignoring");
                return;
            };
            (
                tile_a.terrain,
                tile_a.number_token,
                tile_b.terrain,
                tile_b.number_token,
            )
        };

        if swap_terrain {
            self.map.update_tile(a, Some(terrain_b), None);
            self.map.update_tile(b, Some(terrain_a), None);
        }
        if swap_token {
            self.map.update_tile(a, None, Some(token_b));
            self.map.update_tile(b, None, Some(token_a));
        }
    }
}

impl Default for MapGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A default token must be numeric or absent; anything else is a template
/// error rather than a silently ignored value.
fn parse_default_token(value: &Option<Value>) -> Result<Option<u8>, MapError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                MapError::InvalidTemplate(format!("default number token {number} is out of range"))
            }),
        Some(other) => Err(MapError::InvalidTemplate(format!(
            "default number token must be numeric, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::CoordRange;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn radius_one_hexes() -> Vec<Hex> {
        let mut hexes = Vec::new();
        for q in -1..=1 {
            for r in -1..=1 {
                for s in -1..=1 {
                    if let Ok(hex) = Hex::new(q, r, s) {
                        hexes.push(hex);
                    }
                }
            }
        }
        hexes.sort();
        hexes
    }

    fn sea_disc_template() -> Template {
        Template {
            tiles: TileSection {
                range: Some(CoordRange {
                    q: [-1, 1],
                    r: [-1, 1],
                    s: [-1, 1],
                }),
                defaults: TileDefaults {
                    terrain: Some(TerrainType::Sea),
                    number_token: None,
                },
                overrides: Vec::new(),
            },
            ..Template::default()
        }
    }

    #[test]
    fn test_assign_terrain_consumes_distribution_exactly() {
        let targets = radius_one_hexes();
        let mut generator = MapGenerator::new();
        let mut rng = StdRng::seed_from_u64(7);

        generator
            .assign_terrain_types_random(
                &targets,
                &[
                    (TerrainType::Fields, 3),
                    (TerrainType::Hills, 2),
                    (TerrainType::Mountains, 1),
                    (TerrainType::Desert, 1),
                ],
                &mut rng,
            )
            .unwrap();

        let mut counts: HashMap<TerrainType, usize> = HashMap::new();
        for tile in generator.map().all_tiles() {
            *counts.entry(tile.terrain).or_insert(0) += 1;
            // Terrain-only creation leaves the token absent.
            assert_eq!(tile.number_token, None);
        }
        assert_eq!(counts.get(&TerrainType::Fields), Some(&3));
        assert_eq!(counts.get(&TerrainType::Hills), Some(&2));
        assert_eq!(counts.get(&TerrainType::Mountains), Some(&1));
        assert_eq!(counts.get(&TerrainType::Desert), Some(&1));
    }

    #[test]
    fn test_assign_tokens_creates_desert_placeholders() {
        let targets = radius_one_hexes();
        let mut generator = MapGenerator::new();
        let mut rng = StdRng::seed_from_u64(11);

        generator
            .assign_number_tokens_random(&targets, &[(6, 3), (8, 2), (2, 2)], &mut rng)
            .unwrap();

        let mut token_counts: HashMap<u8, usize> = HashMap::new();
        for tile in generator.map().all_tiles() {
            assert_eq!(tile.terrain, TerrainType::Desert);
            *token_counts.entry(tile.number_token.unwrap()).or_insert(0) += 1;
        }
        assert_eq!(token_counts.get(&6), Some(&3));
        assert_eq!(token_counts.get(&8), Some(&2));
        assert_eq!(token_counts.get(&2), Some(&2));
    }

    #[test]
    fn test_assign_rejects_pool_size_drift() {
        let targets = radius_one_hexes();
        let mut generator = MapGenerator::new();
        let mut rng = StdRng::seed_from_u64(3);

        let short = generator.assign_terrain_types_random(
            &targets,
            &[(TerrainType::Sea, 6)],
            &mut rng,
        );
        assert_eq!(
            short,
            Err(MapError::PoolSizeMismatch {
                pool: 6,
                targets: 7
            })
        );

        let long = generator.assign_terrain_types_random(
            &targets,
            &[(TerrainType::Sea, 8)],
            &mut rng,
        );
        assert_eq!(
            long,
            Err(MapError::PoolSizeMismatch {
                pool: 8,
                targets: 7
            })
        );
        // Nothing was assigned on either failure.
        assert_eq!(generator.map().all_tiles().count(), 0);
    }

    #[test]
    fn test_assign_rejects_mismatched_kind() {
        let targets = radius_one_hexes();
        let mut generator = MapGenerator::new();
        let mut rng = StdRng::seed_from_u64(5);

        let result = generator.assign_attribute_random(
            &targets,
            &[(TileAttribute::Terrain(TerrainType::Sea), 7)],
            TileAttributeKind::NumberToken,
            &mut rng,
        );
        assert!(matches!(result, Err(MapError::InvalidAttributeKind(_))));
    }

    #[test]
    fn test_attribute_kind_parses() {
        assert_eq!(
            "terrain_type".parse::<TileAttributeKind>().unwrap(),
            TileAttributeKind::TerrainType
        );
        assert_eq!(
            "number_token".parse::<TileAttributeKind>().unwrap(),
            TileAttributeKind::NumberToken
        );
        assert!(matches!(
            "robber".parse::<TileAttributeKind>(),
            Err(MapError::InvalidAttributeKind(name)) if name == "robber"
        ));
    }

    #[test]
    fn test_same_seed_reproduces_assignment() {
        let targets = radius_one_hexes();
        let distribution = [
            (TerrainType::Fields, 2),
            (TerrainType::Forest, 2),
            (TerrainType::Pasture, 2),
            (TerrainType::Desert, 1),
        ];

        let mut first = MapGenerator::new();
        let mut second = MapGenerator::new();
        first
            .assign_terrain_types_random(&targets, &distribution, &mut StdRng::seed_from_u64(42))
            .unwrap();
        second
            .assign_terrain_types_random(&targets, &distribution, &mut StdRng::seed_from_u64(42))
            .unwrap();

        assert_eq!(first.map(), second.map());
    }

    #[test]
    fn test_different_seeds_vary_assignment() {
        let targets = radius_one_hexes();
        let distribution = [(TerrainType::Fields, 4), (TerrainType::Mountains, 3)];

        let mut reference = MapGenerator::new();
        reference
            .assign_terrain_types_random(&targets, &distribution, &mut StdRng::seed_from_u64(0))
            .unwrap();

        // A fixed layout could coincide for one seed; a run of them cannot.
        let varied = (1..=16).any(|seed| {
            let mut other = MapGenerator::new();
            other
                .assign_terrain_types_random(
                    &targets,
                    &distribution,
                    &mut StdRng::seed_from_u64(seed),
                )
                .unwrap();
            other.map() != reference.map()
        });
        assert!(varied, "shuffling should depend on the seed");
    }

    #[test]
    fn test_swap_exchanges_requested_fields() {
        let mut generator = MapGenerator::new();
        let a = Hex::new(0, 0, 0).unwrap();
        let b = Hex::new(1, 0, -1).unwrap();
        generator
            .map_mut()
            .update_tile(a, Some(TerrainType::Fields), Some(Some(6)));
        generator
            .map_mut()
            .update_tile(b, Some(TerrainType::Hills), Some(Some(9)));

        generator.swap_terrain(a, b, true, false);
        assert_eq!(generator.map().get_tile(&a).unwrap().terrain, TerrainType::Hills);
        assert_eq!(generator.map().get_tile(&a).unwrap().number_token, Some(6));
        assert_eq!(generator.map().get_tile(&b).unwrap().terrain, TerrainType::Fields);
        assert_eq!(generator.map().get_tile(&b).unwrap().number_token, Some(9));

        generator.swap_terrain(a, b, false, true);
        assert_eq!(generator.map().get_tile(&a).unwrap().number_token, Some(9));
        assert_eq!(generator.map().get_tile(&b).unwrap().number_token, Some(6));
    }

    #[test]
    fn test_swap_with_missing_tile_is_a_no_op() {
        let mut generator = MapGenerator::new();
        let a = Hex::new(0, 0, 0).unwrap();
        generator
            .map_mut()
            .update_tile(a, Some(TerrainType::Fields), Some(Some(6)));

        generator.swap_terrain(a, Hex::new(1, 0, -1).unwrap(), true, true);
        let tile = generator.map().get_tile(&a).unwrap();
        assert_eq!(tile.terrain, TerrainType::Fields);
        assert_eq!(tile.number_token, Some(6));
    }

    #[test]
    fn test_load_rejects_non_numeric_default_token() {
        let mut template = sea_disc_template();
        template.tiles.defaults.number_token = Some(Value::String("six".into()));

        let mut generator = MapGenerator::new();
        let result = generator.load_template(&template);
        assert!(matches!(result, Err(MapError::InvalidTemplate(_))));
        assert!(!generator.is_initialized());
    }

    #[test]
    fn test_failed_load_keeps_previous_board() {
        let mut generator = MapGenerator::new();
        generator.load_template(&sea_disc_template()).unwrap();
        assert!(generator.is_initialized());
        assert_eq!(generator.map().all_tiles().count(), 7);

        let mut bad = sea_disc_template();
        bad.tiles.defaults.number_token = Some(Value::Bool(true));
        assert!(generator.load_template(&bad).is_err());

        // The committed board survives the failed reload.
        assert!(generator.is_initialized());
        assert_eq!(generator.map().all_tiles().count(), 7);
    }

    #[test]
    fn test_load_rejects_invalid_override_coordinate() {
        let mut template = sea_disc_template();
        template.tiles.overrides.push(TileOverride {
            coord: Coord::new(1, 0, 0),
            terrain: Some(TerrainType::Desert),
            number_token: None,
        });

        let mut generator = MapGenerator::new();
        assert!(matches!(
            generator.load_template(&template),
            Err(MapError::InvalidCoordinate { .. })
        ));
        assert!(!generator.is_initialized());
    }
}
