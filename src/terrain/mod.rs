//! Procedural terrain generation.
//!
//! This module populates chunks from a seeded height map. Generation is a
//! pure function of `(TerrainParams, chunk coordinate)`: the noise sources
//! are sampled in global coordinates so adjacent chunks line up without
//! seams, and regenerating the same coordinate always reproduces identical
//! contents regardless of call order or prior world state. The generator
//! never mutates shared state; it returns chunks for the world store to
//! absorb.
//!
//! # Example
//! ```
//! use regolith::block::BlockRegistry;
//! use regolith::terrain::{generate_chunk, TerrainParams};
//!
//! let registry = BlockRegistry::built_in();
//! let params = TerrainParams::default();
//! let chunk = generate_chunk(&params, 0, 0, &registry).unwrap();
//! assert!(chunk.generated);
//! ```

use crate::block::{blocks, Block, BlockMetadata, BlockRegistry};
use crate::chunk::{Chunk, ChunkCoord, CHUNK_SIZE, CHUNK_SIZE_I32};
use crate::world::MAX_HEIGHT;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when terrain cannot be generated from the given
/// parameters. Generation failure is fatal to world initialization and is
/// propagated rather than producing a partially valid world.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("terrain parameter `{name}` must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
    #[error("sea level {0} lies outside the vertical bounds [0, {max})", max = MAX_HEIGHT)]
    SeaLevelOutOfBounds(i32),
    #[error("tree density {0} must lie in [0, 1]")]
    TreeDensityOutOfRange(f64),
}

/// Parameters controlling the height curve and material thresholds.
///
/// # Fields
/// * `seed` - noise seed; the sole source of generation randomness
/// * `base_height` - mean terrain height in blocks
/// * `amplitude` - height-map swing around `base_height`
/// * `frequency` - base noise frequency (world units)
/// * `detail_scale` - contribution of the high-frequency detail octave
/// * `sea_level` - water fills columns up to this height where terrain dips below it
/// * `dirt_depth` - number of soil cells between the surface and stone
/// * `tree_density` - per-column probability of a tree site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainParams {
    #[serde(default = "TerrainParams::default_seed")]
    pub seed: u32,
    #[serde(default = "TerrainParams::default_base_height")]
    pub base_height: f64,
    #[serde(default = "TerrainParams::default_amplitude")]
    pub amplitude: f64,
    #[serde(default = "TerrainParams::default_frequency")]
    pub frequency: f64,
    #[serde(default = "TerrainParams::default_detail_scale")]
    pub detail_scale: f64,
    #[serde(default = "TerrainParams::default_sea_level")]
    pub sea_level: i32,
    #[serde(default = "TerrainParams::default_dirt_depth")]
    pub dirt_depth: u32,
    #[serde(default = "TerrainParams::default_tree_density")]
    pub tree_density: f64,
}

impl TerrainParams {
    fn default_seed() -> u32 { 12345 }
    fn default_base_height() -> f64 { 24.0 }
    fn default_amplitude() -> f64 { 20.0 }
    fn default_frequency() -> f64 { 0.01 }
    fn default_detail_scale() -> f64 { 2.0 }
    fn default_sea_level() -> i32 { 20 }
    fn default_dirt_depth() -> u32 { 4 }
    fn default_tree_density() -> f64 { 0.004 }

    /// Check the parameters before any chunk is generated.
    ///
    /// # Errors
    /// Returns a `GenerationError` describing the first malformed parameter.
    pub fn validate(&self) -> Result<(), GenerationError> {
        for (name, value) in [
            ("base_height", self.base_height),
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
            ("detail_scale", self.detail_scale),
        ] {
            if !value.is_finite() {
                return Err(GenerationError::NonFiniteParameter { name, value });
            }
        }
        let max_h = i32::try_from(MAX_HEIGHT).expect("MAX_HEIGHT fits in i32");
        if self.sea_level < 0 || self.sea_level >= max_h {
            return Err(GenerationError::SeaLevelOutOfBounds(self.sea_level));
        }
        if !(0.0..=1.0).contains(&self.tree_density) {
            return Err(GenerationError::TreeDensityOutOfRange(self.tree_density));
        }
        Ok(())
    }
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: Self::default_seed(),
            base_height: Self::default_base_height(),
            amplitude: Self::default_amplitude(),
            frequency: Self::default_frequency(),
            detail_scale: Self::default_detail_scale(),
            sea_level: Self::default_sea_level(),
            dirt_depth: Self::default_dirt_depth(),
            tree_density: Self::default_tree_density(),
        }
    }
}

/// Seeded noise sources for the height map, sampled in global coordinates.
///
/// Constructed once per generation pass; sampling the same `(wx, wz)` from
/// two independently constructed samplers with equal params yields the same
/// height, which is what keeps chunk seams continuous.
pub struct HeightSampler {
    base: Fbm<Perlin>,
    detail: Perlin,
    base_height: f64,
    amplitude: f64,
    detail_scale: f64,
}

impl HeightSampler {
    #[must_use]
    pub fn new(params: &TerrainParams) -> Self {
        // Base terrain noise (fractal brownian motion for smooth hills)
        let base: Fbm<Perlin> = Fbm::new(params.seed)
            .set_octaves(4)
            .set_frequency(params.frequency)
            .set_persistence(0.5);

        // Detail noise for surface variation
        let detail = Perlin::new(params.seed.wrapping_add(1));

        Self {
            base,
            detail,
            base_height: params.base_height,
            amplitude: params.amplitude,
            detail_scale: params.detail_scale,
        }
    }

    /// Surface height for the column at global `(wx, wz)`, clamped into
    /// `[1, MAX_HEIGHT - 1]`.
    #[must_use]
    pub fn height_at(&self, wx: i32, wz: i32) -> usize {
        let wxf = f64::from(wx);
        let wzf = f64::from(wz);

        let base = self.base.get([wxf, wzf]) * self.amplitude + self.base_height;
        let detail = self.detail.get([wxf * 0.1, wzf * 0.1]) * self.detail_scale;

        let height_f = (base + detail).max(1.0);
        let hf = height_f.floor();
        assert!(hf.is_finite());

        #[allow(clippy::cast_possible_truncation)]
        let height_i64 = hf as i64;
        let height = usize::try_from(height_i64).unwrap_or(MAX_HEIGHT - 1);
        height.min(MAX_HEIGHT - 1)
    }
}

// Deterministic per-column hash used for tree placement. A plain LCG keeps
// the result a pure function of (seed, wx, wz) with no call-order coupling.
fn column_hash(seed: u32, wx: i32, wz: i32) -> u32 {
    #[allow(clippy::cast_sign_loss)]
    let mut state = seed
        ^ (wx as u32).wrapping_mul(0x9E37_79B9)
        ^ (wz as u32).wrapping_mul(0x85EB_CA6B);
    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    state
}

/// Generate the chunk at `(chunk_x, chunk_z)`.
///
/// Fills a fresh chunk from the seeded height map: stone below the soil
/// band, `dirt_depth` cells of dirt, grass at the surface, water flooding
/// columns that dip below `sea_level`, and sparse trees on dry grass.
/// Block ids are resolved from the registry by name with the registry's
/// missing-id fallback.
///
/// # Arguments
/// * `params` - height curve and material thresholds (validated first)
/// * `chunk_x` - chunk coordinate (world X) of the target chunk
/// * `chunk_z` - chunk coordinate (world Z) of the target chunk
/// * `registry` - registry used to resolve block names to ids
///
/// # Errors
/// Returns a `GenerationError` when `params` fail validation.
pub fn generate_chunk(
    params: &TerrainParams,
    chunk_x: i32,
    chunk_z: i32,
    registry: &BlockRegistry,
) -> Result<Chunk, GenerationError> {
    params.validate()?;

    let sampler = HeightSampler::new(params);

    let grass_id = registry.id_for_name("grass").unwrap_or(registry.missing_id());
    let dirt_id = registry.id_for_name("dirt").unwrap_or(registry.missing_id());
    let stone_id = registry.id_for_name("stone").unwrap_or(registry.missing_id());
    let water_id = registry.id_for_name("water").unwrap_or(registry.missing_id());

    let sea_level = usize::try_from(params.sea_level).expect("sea level validated non-negative");
    let dirt_depth = params.dirt_depth as usize;

    let mut chunk = Chunk::new();

    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let wx = chunk_x * CHUNK_SIZE_I32 + i32::try_from(x).expect("x fits in i32");
            let wz = chunk_z * CHUNK_SIZE_I32 + i32::try_from(z).expect("z fits in i32");

            let height = sampler.height_at(wx, wz);
            let submerged = height < sea_level;

            for y in 0..height {
                let depth_from_surface = height - y;
                let block = if depth_from_surface == 1 {
                    // Flooded columns get a dirt bed instead of grass
                    if submerged { dirt_id } else { grass_id }
                } else if depth_from_surface <= dirt_depth + 1 {
                    dirt_id
                } else {
                    stone_id
                };
                chunk.set(x, y, z, block);
            }

            // Flat water surface at sea level
            for y in height..sea_level {
                chunk.set(x, y, z, water_id);
            }
        }
    }

    plant_trees(params, chunk_x, chunk_z, &sampler, registry, &mut chunk);

    chunk.generated = true;
    chunk.dirty = false;
    Ok(chunk)
}

// Sparse deterministic tree sites on dry grass. The canopy is kept inside
// the owning chunk so generation stays a pure per-chunk function.
fn plant_trees(
    params: &TerrainParams,
    chunk_x: i32,
    chunk_z: i32,
    sampler: &HeightSampler,
    registry: &BlockRegistry,
    chunk: &mut Chunk,
) {
    if params.tree_density <= 0.0 {
        return;
    }

    let wood_id = registry.id_for_name("wood").unwrap_or(registry.missing_id());
    let leaves_id = registry.id_for_name("leaves").unwrap_or(registry.missing_id());
    let sea_level = usize::try_from(params.sea_level).expect("sea level validated non-negative");

    // Canopy radius 2: keep trunks at least that far from the chunk edge.
    for x in 2..CHUNK_SIZE - 2 {
        for z in 2..CHUNK_SIZE - 2 {
            let wx = chunk_x * CHUNK_SIZE_I32 + i32::try_from(x).expect("x fits in i32");
            let wz = chunk_z * CHUNK_SIZE_I32 + i32::try_from(z).expect("z fits in i32");

            let hash = column_hash(params.seed, wx, wz);
            let roll = f64::from(hash) / f64::from(u32::MAX);
            if roll >= params.tree_density {
                continue;
            }

            let surface = sampler.height_at(wx, wz);
            if surface <= sea_level {
                continue;
            }

            let trunk_height = 4 + ((hash >> 8) % 2) as usize;
            let top = surface + trunk_height;
            if top + 1 >= MAX_HEIGHT {
                continue;
            }

            #[allow(clippy::cast_possible_truncation)]
            let variant = ((hash >> 16) % 3) as u8;
            let leaf_meta = BlockMetadata { variant, ..Default::default() };

            for y in surface..top {
                chunk.set(x, y, z, wood_id);
            }

            // Two leaf layers around the trunk top plus a cap
            for (dy, radius) in [(0usize, 2i32), (1, 1)] {
                let y = top - 1 + dy;
                for dx in -radius..=radius {
                    for dz in -radius..=radius {
                        if dx == 0 && dz == 0 && dy == 0 {
                            continue; // trunk cell
                        }
                        let lx = usize::try_from(i32::try_from(x).expect("x fits in i32") + dx)
                            .expect("canopy stays inside the chunk");
                        let lz = usize::try_from(i32::try_from(z).expect("z fits in i32") + dz)
                            .expect("canopy stays inside the chunk");
                        if chunk.get(lx, y, lz) == blocks::AIR {
                            chunk.set_block(lx, y, lz, Block::with_metadata(leaves_id, leaf_meta));
                        }
                    }
                }
            }
            chunk.set_block(x, top + 1, z, Block::with_metadata(leaves_id, leaf_meta));
        }
    }
}

/// Generate every chunk in a square of the given radius around `center`.
///
/// The result is a complete all-or-nothing batch: the first generation
/// failure aborts the pass and nothing is returned.
///
/// # Errors
/// Returns the first `GenerationError` encountered.
pub fn generate_area(
    params: &TerrainParams,
    center: ChunkCoord,
    radius: i32,
    registry: &BlockRegistry,
) -> Result<Vec<(ChunkCoord, Chunk)>, GenerationError> {
    params.validate()?;

    let (center_x, center_z) = center;
    let mut chunks = Vec::new();
    for cx in (center_x - radius)..=(center_x + radius) {
        for cz in (center_z - radius)..=(center_z + radius) {
            let chunk = generate_chunk(params, cx, cz, registry)?;
            chunks.push(((cx, cz), chunk));
        }
    }
    Ok(chunks)
}
