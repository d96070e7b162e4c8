//! This module defines the `BlockDef` and `BlockRegistry` types used by the
//! engine. A `BlockDef` carries the gameplay attributes of one material
//! (solidity, breakability, hardness) and is normally loaded from a RON
//! file under `data/blocks/`; the registry indexes definitions by both
//! name and numeric id.
//!
//! Example:
//! ```rust
//! use regolith::block::registry::{BlockDef, BlockRegistry};
//!
//! let mut registry = BlockRegistry::default();
//! let mut def = BlockDef::default();
//! def.name = "example".to_string();
//! def.id = 9;
//! registry.register(def);
//!
//! assert_eq!(registry.id_for_name("example"), Some(9));
//! assert!(registry.is_breakable(9));
//! ```

use crate::block::{blocks, BlockId};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition of a single block material as loaded from RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub id: BlockId,

    #[serde(default = "BlockDef::default_hardness")]
    pub hardness: f32, // Relative mining time multiplier (unused by the core loop, kept for gameplay data)
    #[serde(default = "BlockDef::default_breakable")]
    pub breakable: bool, // Whether the mine action may remove this block
    #[serde(default = "BlockDef::default_solid")]
    pub solid: bool, // Whether the block obstructs movement and targeting
    #[serde(default)]
    pub transparent: bool, // Whether the renderer should treat the block as see-through
}

impl BlockDef {
    fn default_hardness() -> f32 { 1.5 }
    fn default_breakable() -> bool { true }
    fn default_solid() -> bool { true }
}

impl Default for BlockDef {
    fn default() -> Self {
        Self {
            name: "stone".to_string(),
            id: blocks::STONE,
            hardness: Self::default_hardness(),
            breakable: Self::default_breakable(),
            solid: Self::default_solid(),
            transparent: false,
        }
    }
}

#[derive(Resource, Default, Clone)]
pub struct BlockRegistry {
    pub blocks: HashMap<String, BlockDef>,
    pub blocks_by_id: HashMap<BlockId, String>,
}

impl BlockRegistry {
    pub fn register(&mut self, def: BlockDef) {
        self.blocks_by_id.insert(def.id, def.name.clone());
        self.blocks.insert(def.name.clone(), def);
    }

    /// Registry containing the built-in material set. Used as the fallback
    /// when no RON definitions are present on disk, and by tests.
    #[must_use]
    pub fn built_in() -> Self {
        let mut registry = BlockRegistry::default();
        let defs = [
            ("stone", blocks::STONE, 1.5, true, true, false),
            ("dirt", blocks::DIRT, 0.5, true, true, false),
            ("grass", blocks::GRASS, 0.6, true, true, false),
            ("wood", blocks::WOOD, 2.0, true, true, false),
            ("leaves", blocks::LEAVES, 0.2, true, true, true),
            ("water", blocks::WATER, 0.0, false, false, true),
        ];
        for (name, id, hardness, breakable, solid, transparent) in defs {
            registry.register(BlockDef {
                name: name.to_string(),
                id,
                hardness,
                breakable,
                solid,
                transparent,
            });
        }
        registry
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BlockDef> {
        self.blocks.get(name)
    }

    #[must_use]
    pub fn get_by_id(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks_by_id
            .get(&id)
            .and_then(|name| self.blocks.get(name))
    }

    /// Lookup numeric ID for a block `name`.
    #[must_use]
    pub fn id_for_name(&self, name: &str) -> Option<BlockId> {
        self.blocks.get(name).map(|b| b.id)
    }

    /// Whether the mine action may remove the block with this id.
    /// Ids without a definition default to breakable so unknown blocks
    /// never become permanent obstacles.
    #[must_use]
    pub fn is_breakable(&self, id: BlockId) -> bool {
        self.get_by_id(id).is_none_or(|d| d.breakable)
    }

    /// Whether the block with this id obstructs movement/targeting.
    #[must_use]
    pub fn is_solid(&self, id: BlockId) -> bool {
        id != blocks::AIR && self.get_by_id(id).is_none_or(|d| d.solid)
    }

    /// Sentinel id to use when a requested block name is missing.
    /// This id is reserved for a placeholder definition.
    #[must_use]
    pub fn missing_id(&self) -> BlockId {
        BlockId::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_registry_resolves_names_and_ids() {
        let registry = BlockRegistry::built_in();
        assert_eq!(registry.id_for_name("grass"), Some(blocks::GRASS));
        assert_eq!(
            registry.get_by_id(blocks::WATER).map(|d| d.name.as_str()),
            Some("water")
        );
    }

    #[test]
    fn water_is_neither_breakable_nor_solid() {
        let registry = BlockRegistry::built_in();
        assert!(!registry.is_breakable(blocks::WATER));
        assert!(!registry.is_solid(blocks::WATER));
        assert!(registry.is_solid(blocks::STONE));
    }

    #[test]
    fn air_is_never_solid() {
        let registry = BlockRegistry::built_in();
        assert!(!registry.is_solid(blocks::AIR));
    }
}
