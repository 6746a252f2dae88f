//! The session-wide tile registry and its renumbering pass
//!
//! One [`TileRegistry`] per editing session. It owns the atlas set and
//! the id -> [`Tile`] table; everything else holds plain [`TileId`]s and
//! resolves them through the registry at each use.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use thiserror::Error;

use crate::{AtlasError, BasicTile, RuleTile, SpriteAtlas, Tile, TileId};

/// Errors from atlas registration and tile bookkeeping.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("an atlas with id '{0}' is already registered")]
    DuplicateAtlasId(String),
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    #[error("tile id {0} is already registered")]
    TileIdInUse(TileId),
}

/// Old-id -> new-id assignments produced by one renumbering pass.
///
/// Grids and any other id holders outside the registry apply this to
/// stay consistent after an atlas-set change. Ids absent from the map
/// belong to tiles that no longer exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdRemap {
    map: HashMap<TileId, TileId>,
}

impl IdRemap {
    pub fn get(&self, old: TileId) -> Option<TileId> {
        self.map.get(&old).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// `true` when no id actually changed.
    pub fn is_identity(&self) -> bool {
        self.map.iter().all(|(old, new)| old == new)
    }

    fn insert(&mut self, old: TileId, new: TileId) {
        self.map.insert(old, new);
    }
}

/// Session-wide table of tiles and the atlases that produce them.
#[derive(Debug, Default)]
pub struct TileRegistry {
    atlases: Vec<SpriteAtlas>,
    tiles: BTreeMap<TileId, Tile>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole atlas set and renumber every tile.
    ///
    /// This is the only way atlases are (re)registered; changing one
    /// atlas means submitting the full new set. The set is validated
    /// before any state changes: duplicate ids or an unloaded image
    /// leave the registry exactly as it was.
    pub fn set_atlases(&mut self, mut atlases: Vec<SpriteAtlas>) -> Result<IdRemap, RegistryError> {
        for (i, atlas) in atlases.iter().enumerate() {
            if atlases[..i].iter().any(|other| other.id() == atlas.id()) {
                return Err(RegistryError::DuplicateAtlasId(atlas.id().to_string()));
            }
        }
        for atlas in &mut atlases {
            atlas.slice()?;
        }
        self.atlases = atlases;
        self.renumber()
    }

    /// Append one atlas and renumber.
    pub fn add_atlas(&mut self, mut atlas: SpriteAtlas) -> Result<IdRemap, RegistryError> {
        if self.atlases.iter().any(|existing| existing.id() == atlas.id()) {
            return Err(RegistryError::DuplicateAtlasId(atlas.id().to_string()));
        }
        atlas.slice()?;
        self.atlases.push(atlas);
        self.renumber()
    }

    /// Reassign every tile id.
    ///
    /// Basic tiles get 1, 2, 3, ... in atlas registration order, then
    /// slot order within each atlas. Special tiles follow at the next
    /// free id in their previous relative order; degenerate rule tiles
    /// are dropped. Running this twice with an unchanged atlas set
    /// assigns identical ids both times.
    pub(crate) fn renumber(&mut self) -> Result<IdRemap, RegistryError> {
        let old_tiles = std::mem::take(&mut self.tiles);

        let mut slot_ids: HashMap<(String, u32), TileId> = HashMap::new();
        let mut counter: TileId = 1;
        for atlas in &mut self.atlases {
            let count = atlas.slice()?.len() as u32;
            for index in 0..count {
                let id = counter;
                counter += 1;
                self.tiles.insert(
                    id,
                    Tile::Basic(BasicTile {
                        id,
                        name: format!("{}_{}", atlas.id(), index + 1),
                        atlas_id: atlas.id().to_string(),
                        index_in_atlas: index,
                    }),
                );
                slot_ids.insert((atlas.id().to_string(), index), id);
            }
        }

        // Basic tiles keep their identity through the stable
        // (atlas id, slot index) key.
        let mut remap = IdRemap::default();
        for (old_id, tile) in &old_tiles {
            if let Tile::Basic(basic) = tile {
                let key = (basic.atlas_id.clone(), basic.index_in_atlas);
                if let Some(&new_id) = slot_ids.get(&key) {
                    remap.insert(*old_id, new_id);
                }
            }
        }

        for (old_id, tile) in old_tiles {
            let Tile::Rule(mut rule) = tile else { continue };
            if rule.is_degenerate() {
                debug!("dropping degenerate rule tile '{}' during renumbering", rule.name);
                continue;
            }
            remap_rule_refs(&mut rule, &remap);
            let id = self.tiles.len() as TileId + 1;
            rule.id = id;
            remap.insert(old_id, id);
            self.tiles.insert(id, Tile::Rule(rule));
        }

        Ok(remap)
    }

    /// Mint and register an empty rule tile, returning its id.
    ///
    /// The id is the smallest unused one at or past the registry size
    /// (never 0; basic numbering is 1-based). Like every special-tile
    /// id it only lasts until the next renumbering.
    pub fn create_rule_tile(&mut self, name: impl Into<String>) -> TileId {
        let mut id = (self.tiles.len() as TileId).max(1);
        while self.tiles.contains_key(&id) {
            id += 1;
        }
        let rule = RuleTile {
            id,
            name: name.into(),
            default: None,
            rules: Vec::new(),
        };
        self.tiles.insert(id, Tile::Rule(rule));
        id
    }

    /// Re-register a rule tile under its persisted id. Used when
    /// restoring a saved project; fails if the id is taken.
    pub fn restore_rule_tile(&mut self, rule: RuleTile) -> Result<TileId, RegistryError> {
        let id = rule.id;
        if self.tiles.contains_key(&id) {
            return Err(RegistryError::TileIdInUse(id));
        }
        self.tiles.insert(id, Tile::Rule(rule));
        Ok(id)
    }

    pub fn get_tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Mutable tile access for editors. All tile mutation goes through
    /// the registry; other components hold ids only.
    pub fn get_tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    /// Tiles in ascending id order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn atlas(&self, id: &str) -> Option<&SpriteAtlas> {
        self.atlases.iter().find(|atlas| atlas.id() == id)
    }

    pub fn atlases(&self) -> &[SpriteAtlas] {
        &self.atlases
    }

    /// Current id of the basic tile minted for an atlas slot.
    pub fn basic_id_at(&self, atlas_id: &str, index_in_atlas: u32) -> Option<TileId> {
        self.tiles.values().find_map(|tile| match tile {
            Tile::Basic(basic)
                if basic.atlas_id == atlas_id && basic.index_in_atlas == index_in_atlas =>
            {
                Some(basic.id)
            }
            _ => None,
        })
    }
}

/// Rewrite a rule tile's basic-tile references through the remap table.
/// References whose target vanished are cleared rather than left stale,
/// which could alias a freshly minted id.
fn remap_rule_refs(rule: &mut RuleTile, remap: &IdRemap) {
    let name = rule.name.clone();
    remap_ref(&mut rule.default, &name, remap);
    for clause in &mut rule.rules {
        remap_ref(&mut clause.tile, &name, remap);
        let before = clause.random.len();
        clause.random = clause
            .random
            .iter()
            .filter_map(|&old| remap.get(old))
            .collect();
        if clause.random.len() != before {
            warn!(
                "rule tile '{}': dropped {} random candidate(s) that no longer resolve",
                name,
                before - clause.random.len()
            );
        }
    }
}

fn remap_ref(slot: &mut Option<TileId>, rule_name: &str, remap: &IdRemap) {
    if let Some(old) = *slot {
        match remap.get(old) {
            Some(new) => *slot = Some(new),
            None => {
                warn!("rule tile '{rule_name}': reference to tile {old} no longer resolves; clearing");
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NeighborRule, RuleClause, SlicingSettings, Vector2};

    fn loaded_atlas(id: &str, width: i32, height: i32) -> SpriteAtlas {
        let mut atlas = SpriteAtlas::new(id, format!("{id}.png"), SlicingSettings::default());
        atlas.mark_loaded(Vector2::new(width, height));
        atlas
    }

    #[test]
    fn test_renumbering_is_sequential_across_atlases() {
        let mut registry = TileRegistry::new();
        registry
            .set_atlases(vec![loaded_atlas("ground", 32, 32), loaded_atlas("water", 32, 16)])
            .unwrap();

        // ground: 2x2 = 4 slots, water: 2x1 = 2 slots
        assert_eq!(registry.len(), 6);
        for id in 1..=6u32 {
            assert_eq!(registry.get_tile(id).unwrap().id(), id);
        }
        let first = registry.get_tile(1).unwrap().as_basic().unwrap();
        assert_eq!(first.atlas_id, "ground");
        assert_eq!(first.index_in_atlas, 0);
        assert_eq!(first.name, "ground_1");
        let fifth = registry.get_tile(5).unwrap().as_basic().unwrap();
        assert_eq!(fifth.atlas_id, "water");
        assert_eq!(fifth.index_in_atlas, 0);
    }

    #[test]
    fn test_renumbering_is_idempotent() {
        let atlases = vec![loaded_atlas("ground", 32, 32), loaded_atlas("water", 32, 16)];
        let mut registry = TileRegistry::new();
        registry.set_atlases(atlases.clone()).unwrap();
        let rule_id = registry.create_rule_tile("grass");
        assert_eq!(rule_id, 7);
        if let Some(Tile::Rule(rule)) = registry.get_tile_mut(rule_id) {
            rule.default = Some(1);
        }

        let remap = registry.set_atlases(atlases.clone()).unwrap();
        assert!(remap.is_identity());
        let remap = registry.set_atlases(atlases).unwrap();
        assert!(remap.is_identity());
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_specials_follow_basics_in_relative_order() {
        let mut registry = TileRegistry::new();
        registry.set_atlases(vec![loaded_atlas("ground", 32, 32)]).unwrap();
        let first = registry.create_rule_tile("grass");
        let second = registry.create_rule_tile("cliff");
        // Give both a default so they survive renumbering.
        for id in [first, second] {
            if let Some(Tile::Rule(rule)) = registry.get_tile_mut(id) {
                rule.default = Some(1);
            }
        }

        let remap = registry.set_atlases(vec![loaded_atlas("ground", 32, 32)]).unwrap();
        // 4 basics, then the two rules in creation order.
        assert_eq!(remap.get(first), Some(5));
        assert_eq!(remap.get(second), Some(6));
        assert_eq!(registry.get_tile(5).unwrap().name(), "grass");
        assert_eq!(registry.get_tile(6).unwrap().name(), "cliff");
    }

    #[test]
    fn test_degenerate_rule_is_dropped_by_renumbering() {
        let mut registry = TileRegistry::new();
        registry.set_atlases(vec![loaded_atlas("ground", 32, 32)]).unwrap();
        let id = registry.create_rule_tile("empty");

        let remap = registry.set_atlases(vec![loaded_atlas("ground", 32, 32)]).unwrap();
        assert_eq!(remap.get(id), None);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_rule_refs_survive_atlas_change() {
        let mut registry = TileRegistry::new();
        registry
            .set_atlases(vec![loaded_atlas("ground", 32, 32), loaded_atlas("water", 32, 16)])
            .unwrap();
        // water slot 0 currently has id 5; ground slot 0 has id 1.
        let rule_id = registry.create_rule_tile("shore");
        if let Some(Tile::Rule(rule)) = registry.get_tile_mut(rule_id) {
            rule.default = Some(5);
            rule.rules
                .push(RuleClause::new(vec![NeighborRule::Unset; 9], Some(1)));
        }

        // Drop the ground atlas: water slots move to ids 1..=2.
        registry.set_atlases(vec![loaded_atlas("water", 32, 16)]).unwrap();
        let rule = registry.get_tile(3).unwrap().as_rule().unwrap();
        assert_eq!(rule.default, Some(1), "water ref remapped to its new id");
        assert_eq!(rule.rules[0].tile, None, "vanished ground ref cleared");
    }

    #[test]
    fn test_duplicate_atlas_id_leaves_registry_untouched() {
        let mut registry = TileRegistry::new();
        registry.set_atlases(vec![loaded_atlas("ground", 32, 32)]).unwrap();

        let result = registry.set_atlases(vec![
            loaded_atlas("water", 32, 16),
            loaded_atlas("water", 32, 16),
        ]);
        assert!(matches!(result, Err(RegistryError::DuplicateAtlasId(id)) if id == "water"));
        assert_eq!(registry.len(), 4);
        assert!(registry.atlas("ground").is_some());

        let result = registry.add_atlas(loaded_atlas("ground", 64, 64));
        assert!(matches!(result, Err(RegistryError::DuplicateAtlasId(_))));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_unloaded_atlas_is_rejected() {
        let mut registry = TileRegistry::new();
        let atlas = SpriteAtlas::new("pending", "pending.png", SlicingSettings::default());
        let result = registry.set_atlases(vec![atlas]);
        assert!(matches!(
            result,
            Err(RegistryError::Atlas(AtlasError::NotLoaded(_)))
        ));
        assert!(registry.is_empty());
        assert!(registry.atlases().is_empty());
    }

    #[test]
    fn test_create_rule_tile_picks_smallest_unused_id() {
        let mut registry = TileRegistry::new();
        let first = registry.create_rule_tile("a");
        assert_eq!(first, 1);

        registry.set_atlases(vec![loaded_atlas("ground", 32, 32)]).unwrap();
        let second = registry.create_rule_tile("b");
        assert_eq!(second, 5);
        let third = registry.create_rule_tile("c");
        assert_eq!(third, 6);
    }

    #[test]
    fn test_restore_rule_tile_rejects_taken_id() {
        let mut registry = TileRegistry::new();
        registry.set_atlases(vec![loaded_atlas("ground", 32, 32)]).unwrap();
        let rule = RuleTile {
            id: 2,
            name: "clash".to_string(),
            default: Some(1),
            rules: Vec::new(),
        };
        assert!(matches!(
            registry.restore_rule_tile(rule),
            Err(RegistryError::TileIdInUse(2))
        ));
    }

    #[test]
    fn test_basic_id_at() {
        let mut registry = TileRegistry::new();
        registry
            .set_atlases(vec![loaded_atlas("ground", 32, 32), loaded_atlas("water", 32, 16)])
            .unwrap();
        assert_eq!(registry.basic_id_at("ground", 3), Some(4));
        assert_eq!(registry.basic_id_at("water", 1), Some(6));
        assert_eq!(registry.basic_id_at("water", 2), None);
        assert_eq!(registry.basic_id_at("lava", 0), None);
    }
}
