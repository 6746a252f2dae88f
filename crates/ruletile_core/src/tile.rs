//! Tile identities and the Basic/Rule sum type

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Registry-assigned tile identifier.
///
/// Ids are dense and unique at any point in time but are reassigned by
/// every renumbering pass; they must not be stored across an atlas-set
/// change without going through the remap table.
pub type TileId = u32;

/// Neighbor constraint for one cell of a rule clause's filter.
///
/// Wire encoding: 0 = Unset, 1 = Same, 2 = Different.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum NeighborRule {
    /// No constraint; the cell always passes.
    #[default]
    Unset,
    /// The neighbor must hold the rule tile itself.
    Same,
    /// The neighbor must be absent or hold a different tile.
    Different,
}

#[derive(Debug, Error)]
#[error("invalid neighbor rule value {0}, expected 0..=2")]
pub struct InvalidNeighborRule(pub u8);

impl From<NeighborRule> for u8 {
    fn from(rule: NeighborRule) -> u8 {
        match rule {
            NeighborRule::Unset => 0,
            NeighborRule::Same => 1,
            NeighborRule::Different => 2,
        }
    }
}

impl TryFrom<u8> for NeighborRule {
    type Error = InvalidNeighborRule;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NeighborRule::Unset),
            1 => Ok(NeighborRule::Same),
            2 => Ok(NeighborRule::Different),
            other => Err(InvalidNeighborRule(other)),
        }
    }
}

/// Validation failures for a single rule clause.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClauseError {
    #[error("neighbor filter length {len} is not an odd perfect square")]
    MalformedFilter { len: usize },
    #[error("clause selects no tile")]
    NoOutput,
}

/// One neighbor-pattern clause of a rule tile.
///
/// The filter is a k x k grid in row-major order with k odd; the center
/// cell refers to the rule tile's own position and is conventionally
/// [`NeighborRule::Unset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleClause {
    /// Stable identity, kept across edits and saves.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "neighborFilter")]
    pub neighbor_filter: Vec<NeighborRule>,
    /// Sprite used when the clause matches.
    pub tile: Option<TileId>,
    /// Random candidates; when non-empty this takes precedence over `tile`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub random: Vec<TileId>,
}

impl RuleClause {
    pub fn new(neighbor_filter: Vec<NeighborRule>, tile: Option<TileId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            neighbor_filter,
            tile,
            random: Vec::new(),
        }
    }

    pub fn with_random(neighbor_filter: Vec<NeighborRule>, random: Vec<TileId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            neighbor_filter,
            tile: None,
            random,
        }
    }

    /// The filter's edge length k, checking that the filter is a k x k
    /// grid with k odd.
    pub fn filter_extent(&self) -> Result<u32, ClauseError> {
        let len = self.neighbor_filter.len();
        let k = (len as f64).sqrt().round() as usize;
        if k == 0 || k * k != len || k % 2 == 0 {
            return Err(ClauseError::MalformedFilter { len });
        }
        Ok(k as u32)
    }

    /// Whether the clause can produce a sprite at all. A clause without
    /// an output never matches during resolution.
    pub fn is_selectable(&self) -> bool {
        self.tile.is_some() || !self.random.is_empty()
    }

    pub fn validate(&self) -> Result<(), ClauseError> {
        self.filter_extent()?;
        if !self.is_selectable() {
            return Err(ClauseError::NoOutput);
        }
        Ok(())
    }
}

/// A tile that always renders one fixed atlas slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicTile {
    pub id: TileId,
    pub name: String,
    pub atlas_id: String,
    pub index_in_atlas: u32,
}

/// A tile whose rendered sprite depends on its neighbors.
///
/// Clauses form a user-authored priority list: the first matching clause
/// wins, and `default` is the fallback when none match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTile {
    pub id: TileId,
    pub name: String,
    /// Fallback sprite when no clause matches.
    pub default: Option<TileId>,
    pub rules: Vec<RuleClause>,
}

impl RuleTile {
    /// A rule tile with no default and no clauses renders nothing and is
    /// dropped by the next renumbering pass.
    pub fn is_degenerate(&self) -> bool {
        self.default.is_none() && self.rules.is_empty()
    }

    /// Authoring-time validation: returns every broken clause with its
    /// index. Resolution skips these at render time; editors should
    /// surface them earlier.
    pub fn validate(&self) -> Vec<(usize, ClauseError)> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(index, clause)| clause.validate().err().map(|err| (index, err)))
            .collect()
    }
}

/// Any registered tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tile {
    Basic(BasicTile),
    Rule(RuleTile),
}

impl Tile {
    pub fn id(&self) -> TileId {
        match self {
            Tile::Basic(tile) => tile.id,
            Tile::Rule(tile) => tile.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tile::Basic(tile) => &tile.name,
            Tile::Rule(tile) => &tile.name,
        }
    }

    pub fn as_basic(&self) -> Option<&BasicTile> {
        match self {
            Tile::Basic(tile) => Some(tile),
            Tile::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&RuleTile> {
        match self {
            Tile::Basic(_) => None,
            Tile::Rule(tile) => Some(tile),
        }
    }
}
