//! This module contains the core block types and helpers.
//! It exposes the compact `BlockId` used by chunk storage, the `Block`
//! value type (id plus optional placement metadata), the `BlockRegistry`
//! which stores all loaded block definitions, and the runtime
//! loader/watchers used for hot-reloading block data from RON files.
//!
//! Example:
//!
//! ```rust
//! use regolith::block::{blocks, Block, BlockRegistry};
//!
//! let registry = BlockRegistry::built_in();
//! assert_eq!(registry.id_for_name("stone"), Some(blocks::STONE));
//!
//! let b = Block::new(blocks::DIRT);
//! assert!(!b.is_air());
//! ```

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// Type used throughout the engine to represent a compact block identifier.
///
/// This is intentionally a `u8` to keep chunk storage memory-efficient.
pub type BlockId = u8;

/// Small helpers and constants used by the terrain generator that refer to
/// well-known block ids (for example `blocks::AIR`). These are intentionally
/// small utilities so chunk code can reference `blocks::STONE` without
/// depending directly on the full registry.
pub mod blocks {
    use super::BlockId;

    /// The block id used to represent empty space (no block present).
    pub const AIR: BlockId = 0;
    pub const STONE: BlockId = 1;
    pub const DIRT: BlockId = 2;
    pub const GRASS: BlockId = 3;
    pub const WOOD: BlockId = 4;
    pub const LEAVES: BlockId = 5;
    pub const WATER: BlockId = 6;

    /// Convenience lookup helpers for interop with `BlockRegistry`.
    pub mod lookup {
        use super::BlockId;
        use crate::block::registry::BlockRegistry;

        /// Return a numeric id for a block name if present in the registry.
        #[must_use]
        pub fn id_for(registry: &BlockRegistry, name: &str) -> Option<BlockId> {
            registry.get(name).map(|b| b.id)
        }

        /// Return a block name for a numeric id if present in the registry.
        #[must_use]
        pub fn name_for(registry: &BlockRegistry, id: BlockId) -> Option<String> {
            registry.blocks_by_id.get(&id).cloned()
        }
    }
}

/// Orientation a placed block can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockFacing {
    #[default]
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl BlockFacing {
    /// Derive the facing a newly placed block should carry so it faces back
    /// along the player's view direction (dominant axis wins).
    #[must_use]
    pub fn from_view_direction(dir: Vec3) -> Self {
        let ax = dir.x.abs();
        let ay = dir.y.abs();
        let az = dir.z.abs();
        if ay >= ax && ay >= az {
            if dir.y > 0.0 { BlockFacing::Down } else { BlockFacing::Up }
        } else if ax >= az {
            if dir.x > 0.0 { BlockFacing::West } else { BlockFacing::East }
        } else if dir.z > 0.0 {
            BlockFacing::North
        } else {
            BlockFacing::South
        }
    }
}

/// Optional per-block placement data (orientation and visual variant).
///
/// Metadata is stored sparsely: a block with no entry behaves as if it
/// carried `BlockMetadata::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockMetadata {
    pub facing: BlockFacing,
    pub variant: u8,
}

/// A single voxel cell value: material id plus optional metadata.
///
/// Blocks have no standalone identity; they are addressed purely by
/// position. A default `Block` is air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Block {
    pub id: BlockId,
    pub metadata: Option<BlockMetadata>,
}

impl Block {
    /// The canonical air value (absence of a block).
    pub const AIR: Block = Block { id: blocks::AIR, metadata: None };

    #[must_use]
    pub fn new(id: BlockId) -> Self {
        Block { id, metadata: None }
    }

    #[must_use]
    pub fn with_metadata(id: BlockId, metadata: BlockMetadata) -> Self {
        Block { id, metadata: Some(metadata) }
    }

    #[must_use]
    pub fn is_air(&self) -> bool {
        self.id == blocks::AIR
    }
}

/// Loader/watchers for block RON files.
pub mod loader;

/// Block registry and related data structures.
pub mod registry;

pub use registry::{BlockDef, BlockRegistry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_block_is_air() {
        assert!(Block::default().is_air());
        assert_eq!(Block::default(), Block::AIR);
    }

    #[test]
    fn facing_follows_dominant_axis() {
        assert_eq!(BlockFacing::from_view_direction(Vec3::Z), BlockFacing::North);
        assert_eq!(BlockFacing::from_view_direction(-Vec3::Z), BlockFacing::South);
        assert_eq!(BlockFacing::from_view_direction(Vec3::X), BlockFacing::West);
        assert_eq!(BlockFacing::from_view_direction(-Vec3::X), BlockFacing::East);
        assert_eq!(BlockFacing::from_view_direction(Vec3::Y), BlockFacing::Down);
        assert_eq!(
            BlockFacing::from_view_direction(Vec3::new(0.1, -0.9, 0.2)),
            BlockFacing::Up
        );
    }
}
