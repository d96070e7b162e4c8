//! Chunk data structures and coordinate decomposition.
//!
//! This module defines the `Chunk` container which stores block IDs in a
//! dense array plus a sparse metadata map, and the helpers that decompose a
//! global block position into an owning chunk coordinate and a local offset.
//! Chunks carry no behavior beyond construction and cell access; terrain
//! content comes from `crate::terrain` and all world-level mutation goes
//! through `crate::world::WorldState`.
//!
//! # Example
//! ```
//! use regolith::block::{blocks, Block};
//! use regolith::chunk::Chunk;
//!
//! let mut chunk = Chunk::new();
//! chunk.set(0, 5, 0, blocks::STONE);
//! assert_eq!(chunk.get(0, 5, 0), blocks::STONE);
//! assert_eq!(chunk.get_block(1, 5, 0), Block::AIR);
//! ```

use crate::block::{blocks, Block, BlockId, BlockMetadata};
use crate::world::MAX_HEIGHT;
use bevy::math::IVec3;
use std::collections::HashMap;

/// Horizontal footprint of a chunk in blocks (X and Z extent).
pub const CHUNK_SIZE: usize = 16;

// CHUNK_SIZE as a signed `i32` for coordinate arithmetic.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Coordinate of a chunk column: `(chunk_x, chunk_z)` in chunk units.
pub type ChunkCoord = (i32, i32);

/// A 16x16 column of the voxel world, `MAX_HEIGHT` blocks tall.
///
/// Storage is a dense `Vec<BlockId>` where id 0 (`blocks::AIR`) means the
/// cell is empty, plus a sparse map for the few blocks that carry metadata.
/// The linear layout is fixed: `index = x + CHUNK_SIZE*y + CHUNK_SIZE*MAX_HEIGHT*z`,
/// a bijection with local `(x, y, z)` offsets.
#[derive(Clone, PartialEq)]
pub struct Chunk {
    blocks: Vec<BlockId>,
    metadata: HashMap<u16, BlockMetadata>,
    /// Whether terrain generation has populated this chunk. Chunks created
    /// implicitly by a speculative block placement start out ungenerated.
    pub generated: bool,
    /// Whether the chunk has been mutated since generation.
    pub dirty: bool,
}

/// Bijective linear index for a local offset. The layout is the contract
/// shared by every consumer of `Chunk` storage.
#[inline]
#[must_use]
pub fn linear_index(x: usize, y: usize, z: usize) -> usize {
    x + y * CHUNK_SIZE + z * CHUNK_SIZE * MAX_HEIGHT
}

/// Inverse of `linear_index`.
#[inline]
#[must_use]
pub fn local_from_linear(index: usize) -> (usize, usize, usize) {
    let x = index % CHUNK_SIZE;
    let y = (index / CHUNK_SIZE) % MAX_HEIGHT;
    let z = index / (CHUNK_SIZE * MAX_HEIGHT);
    (x, y, z)
}

/// Chunk coordinate owning a global block position.
#[must_use]
pub fn chunk_coord_of(pos: IVec3) -> ChunkCoord {
    (pos.x.div_euclid(CHUNK_SIZE_I32), pos.z.div_euclid(CHUNK_SIZE_I32))
}

/// Local offset of a global block position within its owning chunk, or
/// `None` when `y` lies outside the vertical bounds.
#[must_use]
pub fn local_offset_of(pos: IVec3) -> Option<(usize, usize, usize)> {
    let max_h = i32::try_from(MAX_HEIGHT).expect("MAX_HEIGHT fits in i32");
    if pos.y < 0 || pos.y >= max_h {
        return None;
    }
    let lx = usize::try_from(pos.x.rem_euclid(CHUNK_SIZE_I32)).expect("local x non-negative");
    let ly = usize::try_from(pos.y).expect("local y non-negative");
    let lz = usize::try_from(pos.z.rem_euclid(CHUNK_SIZE_I32)).expect("local z non-negative");
    Some((lx, ly, lz))
}

/// Recompose a chunk coordinate and local offset into a global position.
///
/// # Panics
/// Panics if a local offset component cannot be represented as `i32`
/// (impossible for offsets produced by `local_offset_of`).
#[must_use]
pub fn world_pos_of(coord: ChunkCoord, local: (usize, usize, usize)) -> IVec3 {
    let (cx, cz) = coord;
    let (lx, ly, lz) = local;
    IVec3::new(
        cx * CHUNK_SIZE_I32 + i32::try_from(lx).expect("local x fits in i32"),
        i32::try_from(ly).expect("local y fits in i32"),
        cz * CHUNK_SIZE_I32 + i32::try_from(lz).expect("local z fits in i32"),
    )
}

impl Chunk {
    /// Create a new, empty `Chunk` filled with `AIR` blocks.
    ///
    /// # Return
    /// * `Chunk` - a newly initialized chunk with all blocks set to `AIR`.
    #[must_use]
    pub fn new() -> Self {
        Chunk {
            blocks: vec![blocks::AIR; CHUNK_SIZE * MAX_HEIGHT * CHUNK_SIZE],
            metadata: HashMap::new(),
            generated: false,
            dirty: false,
        }
    }

    /// Read a block ID at the given local chunk coordinates.
    ///
    /// # Arguments
    /// * `x` - local x in `[0, CHUNK_SIZE)`
    /// * `y` - local y in `[0, MAX_HEIGHT)`
    /// * `z` - local z in `[0, CHUNK_SIZE)`
    ///
    /// # Return
    /// * `BlockId` - the block id at the given coordinates, or `AIR` if out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        if x >= CHUNK_SIZE || y >= MAX_HEIGHT || z >= CHUNK_SIZE {
            blocks::AIR
        } else {
            self.blocks[linear_index(x, y, z)]
        }
    }

    /// Read the full block value (id plus metadata) at local coordinates.
    #[must_use]
    pub fn get_block(&self, x: usize, y: usize, z: usize) -> Block {
        if x >= CHUNK_SIZE || y >= MAX_HEIGHT || z >= CHUNK_SIZE {
            return Block::AIR;
        }
        let index = linear_index(x, y, z);
        let id = self.blocks[index];
        if id == blocks::AIR {
            return Block::AIR;
        }
        let key = u16::try_from(index).expect("linear index fits in u16");
        Block {
            id,
            metadata: self.metadata.get(&key).copied(),
        }
    }

    /// Set a block ID at the given local chunk coordinates. Any metadata at
    /// the cell is cleared. Out-of-bounds coordinates are ignored.
    ///
    /// # Arguments
    /// * `x` - local x in `[0, CHUNK_SIZE)`
    /// * `y` - local y in `[0, MAX_HEIGHT)`
    /// * `z` - local z in `[0, CHUNK_SIZE)`
    /// * `block` - the `BlockId` to write at the specified coordinates
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        if x < CHUNK_SIZE && y < MAX_HEIGHT && z < CHUNK_SIZE {
            let index = linear_index(x, y, z);
            self.blocks[index] = block;
            self.metadata
                .remove(&u16::try_from(index).expect("linear index fits in u16"));
        }
    }

    /// Set a full block value at local coordinates, storing metadata sparsely.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block) {
        if x >= CHUNK_SIZE || y >= MAX_HEIGHT || z >= CHUNK_SIZE {
            return;
        }
        let index = linear_index(x, y, z);
        let key = u16::try_from(index).expect("linear index fits in u16");
        self.blocks[index] = block.id;
        match block.metadata {
            Some(meta) if !block.is_air() => {
                self.metadata.insert(key, meta);
            }
            _ => {
                self.metadata.remove(&key);
            }
        }
    }

    /// Iterate over all non-air cells as `((x, y, z), BlockId)`.
    pub fn iter_non_air(&self) -> impl Iterator<Item = ((usize, usize, usize), BlockId)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, id)| **id != blocks::AIR)
            .map(|(index, id)| (local_from_linear(index), *id))
    }

    /// Number of non-air cells in the chunk.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.blocks.iter().filter(|id| **id != blocks::AIR).count()
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockFacing;

    #[test]
    fn linear_index_is_bijective() {
        for z in 0..CHUNK_SIZE {
            for y in 0..MAX_HEIGHT {
                for x in 0..CHUNK_SIZE {
                    assert_eq!(local_from_linear(linear_index(x, y, z)), (x, y, z));
                }
            }
        }
    }

    #[test]
    fn set_then_get_roundtrip() {
        let mut chunk = Chunk::new();
        chunk.set(3, 40, 12, blocks::WOOD);
        assert_eq!(chunk.get(3, 40, 12), blocks::WOOD);
        assert_eq!(chunk.get(3, 41, 12), blocks::AIR);
    }

    #[test]
    fn out_of_bounds_reads_are_air_and_writes_ignored() {
        let mut chunk = Chunk::new();
        chunk.set(0, MAX_HEIGHT, 0, blocks::STONE);
        assert_eq!(chunk.get(0, MAX_HEIGHT, 0), blocks::AIR);
        assert_eq!(chunk.occupied(), 0);
    }

    #[test]
    fn metadata_is_stored_sparsely_and_cleared_on_overwrite() {
        let mut chunk = Chunk::new();
        let meta = BlockMetadata { facing: BlockFacing::East, variant: 2 };
        chunk.set_block(1, 2, 3, Block::with_metadata(blocks::WOOD, meta));
        assert_eq!(chunk.get_block(1, 2, 3).metadata, Some(meta));

        chunk.set(1, 2, 3, blocks::DIRT);
        assert_eq!(chunk.get_block(1, 2, 3).metadata, None);
    }

    #[test]
    fn global_positions_decompose_deterministically() {
        let pos = IVec3::new(-1, 10, 17);
        let coord = chunk_coord_of(pos);
        let local = local_offset_of(pos).unwrap();
        assert_eq!(coord, (-1, 1));
        assert_eq!(local, (15, 10, 1));
        assert_eq!(world_pos_of(coord, local), pos);
    }

    #[test]
    fn vertical_out_of_bounds_has_no_local_offset() {
        assert!(local_offset_of(IVec3::new(0, -1, 0)).is_none());
        let max_h = MAX_HEIGHT as i32;
        assert!(local_offset_of(IVec3::new(0, max_h, 0)).is_none());
    }

    #[test]
    fn iter_non_air_matches_occupied_count() {
        let mut chunk = Chunk::new();
        chunk.set(0, 0, 0, blocks::STONE);
        chunk.set(15, 63, 15, blocks::GRASS);
        let cells: Vec<_> = chunk.iter_non_air().collect();
        assert_eq!(cells.len(), chunk.occupied());
        assert!(cells.contains(&((0, 0, 0), blocks::STONE)));
        assert!(cells.contains(&((15, 63, 15), blocks::GRASS)));
    }
}
