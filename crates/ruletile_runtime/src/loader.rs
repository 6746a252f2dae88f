//! Project restore
//!
//! Rebuilds a full session (registry + grid) from a [`ProjectRecord`].
//! Every atlas image is loaded before any tile registration, so slot
//! data is never observed half-ready; any id a record references that
//! the rebuilt registry does not know is a hard integrity error.

use log::debug;
use thiserror::Error;

use ruletile_core::{
    GridError, ProjectRecord, RegistryError, RuleTile, SpecialTileRecord, SpriteAtlas, Tile,
    TileGrid, TileId, TileRegistry, Vector2,
};

/// A host image load that did not produce dimensions.
#[derive(Debug, Error)]
#[error("failed to load image '{path}': {reason}")]
pub struct ImageLoadError {
    pub path: String,
    pub reason: String,
}

/// Host-supplied image loading.
///
/// The engine never decodes images; it only needs the pixel dimensions
/// of each atlas source to slice it into slots.
pub trait ImageLoader {
    fn load(&mut self, source: &str) -> Result<Vector2, ImageLoadError>;

    /// Load several images, completing all of them before returning.
    /// Hosts with async IO can override this to fetch the batch
    /// concurrently; the default loads sequentially.
    fn load_batch(&mut self, sources: &[&str]) -> Result<Vec<Vector2>, ImageLoadError> {
        sources.iter().map(|source| self.load(source)).collect()
    }
}

/// Errors while restoring a saved project.
#[derive(Debug, Error)]
pub enum ProjectLoadError {
    #[error(transparent)]
    Image(#[from] ImageLoadError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("rule tile {rule} references id {id}, which is not a basic tile in this save")]
    UnresolvedRuleRef { rule: TileId, id: TileId },
}

/// Rebuild a session from a record.
///
/// Atlases are reconstructed and their images loaded as one batch;
/// `set_atlases` then regenerates the basic tiles with the same ids the
/// record was written against (snapshot renumbers before writing, and
/// renumbering is deterministic in atlas order). Rule tiles and the
/// grid follow, with every persisted id checked along the way.
pub fn load_project(
    record: &ProjectRecord,
    loader: &mut dyn ImageLoader,
) -> Result<(TileGrid, TileRegistry), ProjectLoadError> {
    let sources: Vec<&str> = record.atlantes.iter().map(|a| a.src.as_str()).collect();
    let dimensions = loader.load_batch(&sources)?;

    let mut atlases = Vec::with_capacity(record.atlantes.len());
    for (rec, dims) in record.atlantes.iter().zip(dimensions) {
        let mut atlas = SpriteAtlas::new(rec.id.clone(), rec.src.clone(), rec.settings);
        atlas.mark_loaded(dims);
        atlases.push(atlas);
    }

    let mut registry = TileRegistry::new();
    registry.set_atlases(atlases)?;

    for special in &record.tiles {
        let SpecialTileRecord::Rule(rule) = special;
        check_rule_refs(rule, &registry)?;
        registry.restore_rule_tile(rule.clone())?;
    }

    let grid = TileGrid::from_cells(
        record.map.map_size,
        record.map.tile_size,
        record.map.tiles.clone(),
        &registry,
    )?;

    debug!(
        "restored project: {} atlases, {} tiles, {} map",
        record.atlantes.len(),
        registry.len(),
        record.map.map_size
    );
    Ok((grid, registry))
}

/// Every id a rule tile carries must point at a basic tile in the
/// rebuilt registry.
fn check_rule_refs(rule: &RuleTile, registry: &TileRegistry) -> Result<(), ProjectLoadError> {
    let check = |id: TileId| match registry.get_tile(id) {
        Some(Tile::Basic(_)) => Ok(()),
        _ => Err(ProjectLoadError::UnresolvedRuleRef { rule: rule.id, id }),
    };
    if let Some(id) = rule.default {
        check(id)?;
    }
    for clause in &rule.rules {
        if let Some(id) = clause.tile {
            check(id)?;
        }
        for &id in &clause.random {
            check(id)?;
        }
    }
    Ok(())
}
