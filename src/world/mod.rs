//! World storage and block access.
//!
//! This module provides the `WorldState` resource, the single source of
//! truth for world contents. Chunks live in a `HashMap<(chunk_x, chunk_z), Chunk>`;
//! a flattened position→id map of every non-air block is maintained as a
//! cache alongside it for O(1) global queries and bulk reads. The cache is
//! only ever written together with the chunk map inside this module's
//! mutation operations, so the two views cannot diverge.
//!
//! # Example:
//!
//! ```
//! use bevy::math::IVec3;
//! use regolith::block::{blocks, Block};
//! use regolith::world::WorldState;
//!
//! let mut world = WorldState::new();
//! // Set a block (creates the owning chunk if necessary)
//! world.set_block(IVec3::new(10, 30, -5), Block::new(blocks::STONE)).unwrap();
//! // Query it back in world coordinates
//! assert_eq!(world.get_block(IVec3::new(10, 30, -5)).id, blocks::STONE);
//! ```

use crate::block::{Block, BlockId};
use crate::chunk::{chunk_coord_of, local_offset_of, Chunk, ChunkCoord};
use bevy::math::IVec3;
use bevy::prelude::{warn, Resource};
use std::collections::HashMap;
use thiserror::Error;

pub mod bootstrap;

/// Maximum world build height (exclusive upper bound).
pub const MAX_HEIGHT: usize = 64;

/// Failures surfaced by world store operations. Gameplay-level no-ops
/// (mining air, removing outside the world) are not errors; only redundant
/// bootstraps and out-of-bounds writes reject.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A second bootstrap would silently discard player progress.
    #[error("world is already bootstrapped ({0} chunks present)")]
    AlreadyBootstrapped(usize),
    /// The position lies outside the world's vertical bounds.
    #[error("position ({0}, {1}, {2}) is outside the vertical bounds [0, {max})", max = MAX_HEIGHT)]
    OutOfBounds(i32, i32, i32),
}

/// The `WorldState` resource holds loaded chunks keyed by `(chunk_x, chunk_z)`
/// plus the flattened non-air index derived from them.
///
/// All reads and writes go through the accessors here; the fields stay
/// private so no caller can break the chunk/index invariant.
#[derive(Resource, Default)]
pub struct WorldState {
    chunks: HashMap<ChunkCoord, Chunk>,
    index: HashMap<IVec3, BlockId>,
}

impl WorldState {
    /// Create an empty `WorldState` with no loaded chunks.
    #[must_use]
    pub fn new() -> Self {
        WorldState {
            chunks: HashMap::new(),
            index: HashMap::new(),
        }
    }

    /// Install the initial world snapshot produced by terrain generation and
    /// derive the flattened index from it.
    ///
    /// # Arguments
    /// * `generated` - chunk coordinate / chunk pairs to install
    ///
    /// # Errors
    /// Returns `WorldError::AlreadyBootstrapped` (after logging) when chunks
    /// already exist; the existing snapshot is left untouched.
    pub fn bootstrap(&mut self, generated: Vec<(ChunkCoord, Chunk)>) -> Result<(), WorldError> {
        if !self.chunks.is_empty() {
            warn!(
                "ignoring redundant bootstrap: {} chunks already installed",
                self.chunks.len()
            );
            return Err(WorldError::AlreadyBootstrapped(self.chunks.len()));
        }

        for (coord, chunk) in generated {
            for (local, id) in chunk.iter_non_air() {
                self.index.insert(crate::chunk::world_pos_of(coord, local), id);
            }
            self.chunks.insert(coord, chunk);
        }
        Ok(())
    }

    /// Get the block at world position `pos`.
    ///
    /// Never fails: positions outside the vertical bounds and positions in
    /// chunks that do not exist read as air.
    #[must_use]
    pub fn get_block(&self, pos: IVec3) -> Block {
        let Some((lx, ly, lz)) = local_offset_of(pos) else {
            return Block::AIR;
        };
        self.chunks
            .get(&chunk_coord_of(pos))
            .map_or(Block::AIR, |c| c.get_block(lx, ly, lz))
    }

    /// Write `block` at world position `pos`, updating the owning chunk and
    /// the flattened index together. Creates the owning chunk (ungenerated,
    /// empty) when it does not yet exist so blocks can be placed in
    /// speculative space. Writing the value already present is a no-op.
    ///
    /// Bounds are validated before anything is touched, and the exclusive
    /// `&mut self` borrow spans both writes, so no reader can ever observe
    /// the chunk map and the index out of step.
    ///
    /// # Return
    /// * `ChunkCoord` - coordinate of the chunk that was (or would have been) modified
    ///
    /// # Errors
    /// Returns `WorldError::OutOfBounds` when `pos.y` lies outside `[0, MAX_HEIGHT)`.
    pub fn set_block(&mut self, pos: IVec3, block: Block) -> Result<ChunkCoord, WorldError> {
        let (lx, ly, lz) =
            local_offset_of(pos).ok_or(WorldError::OutOfBounds(pos.x, pos.y, pos.z))?;
        let coord = chunk_coord_of(pos);

        let chunk = self.chunks.entry(coord).or_insert_with(Chunk::new);
        if chunk.get_block(lx, ly, lz) == block {
            return Ok(coord);
        }

        chunk.set_block(lx, ly, lz, block);
        chunk.dirty = true;
        if block.is_air() {
            self.index.remove(&pos);
        } else {
            self.index.insert(pos, block.id);
        }
        Ok(coord)
    }

    /// Remove the block at `pos` (equivalent to writing air).
    ///
    /// Mining air is not an error: removing an absent block (including any
    /// position outside the vertical bounds) is a silent no-op.
    ///
    /// # Return
    /// * `Some(coord)` - the chunk that was modified
    /// * `None` - the position was already air
    pub fn remove_block(&mut self, pos: IVec3) -> Option<ChunkCoord> {
        if self.get_block(pos).is_air() {
            return None;
        }
        // In-bounds by construction: a non-air read proved the offset valid.
        self.set_block(pos, Block::AIR).ok()
    }

    /// Borrow the chunk at `coord`, if loaded.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Iterate over all loaded chunks.
    pub fn chunks(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    /// Bulk read surface over the flattened index: every non-air block as
    /// `(position, id)`. This is the renderer-facing view; it reflects every
    /// completed mutation and nothing else.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (&IVec3, &BlockId)> {
        self.index.iter()
    }

    /// Number of loaded chunks. Chunks are never evicted, so over a long
    /// session this only grows.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of non-air blocks in the world.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.index.len()
    }

    /// Whether a bootstrap snapshot has been installed.
    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        !self.chunks.is_empty()
    }
}
