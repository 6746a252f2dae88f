//! Persisted project records
//!
//! A saved project bundles the grid, the atlas list, and the special
//! (rule) tiles. Basic tiles are never written out: re-slicing the
//! listed atlases in order regenerates them with identical ids.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    GridError, RegistryError, RuleTile, SlicingSettings, TileGrid, TileId, TileRegistry, Vector2,
};

/// Errors while building or encoding a project record.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("project JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The grid portion of a saved project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRecord {
    pub map_size: Vector2,
    /// Per-cell render size in pixels.
    pub tile_size: Vector2,
    /// Flat row-major cell ids; `null` marks an empty cell.
    pub tiles: Vec<Option<TileId>>,
}

/// One registered atlas: enough to reconstruct it and re-slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasRecord {
    pub src: String,
    pub id: String,
    pub settings: SlicingSettings,
}

/// A serialized non-basic tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpecialTileRecord {
    Rule(RuleTile),
}

/// A complete saved project.
///
/// Field names are the stable wire keys; `atlantes` is historical and
/// kept for round-trip compatibility with existing saves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub map: GridRecord,
    pub atlantes: Vec<AtlasRecord>,
    pub tiles: Vec<SpecialTileRecord>,
}

impl ProjectRecord {
    /// Snapshot the session into a record.
    ///
    /// Renumbers first so every id written out is current, and applies
    /// the resulting remap to the grid so the live session matches what
    /// was saved.
    pub fn snapshot(
        grid: &mut TileGrid,
        registry: &mut TileRegistry,
    ) -> Result<Self, ProjectError> {
        let remap = registry.renumber()?;
        grid.remap(&remap);

        let atlantes = registry
            .atlases()
            .iter()
            .map(|atlas| AtlasRecord {
                src: atlas.source().to_string(),
                id: atlas.id().to_string(),
                settings: atlas.settings(),
            })
            .collect();

        let tiles = registry
            .tiles()
            .filter_map(|tile| tile.as_rule().cloned().map(SpecialTileRecord::Rule))
            .collect();

        Ok(Self {
            map: GridRecord {
                map_size: grid.map_size(),
                tile_size: grid.tile_render_size(),
                tiles: grid.cells().to_vec(),
            },
            atlantes,
            tiles,
        })
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(json)?)
    }
}
