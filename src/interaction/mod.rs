//! Player interactions with blocks (mining and placing).
//!
//! Performs raycasting from the player's view to determine which block is
//! being targeted, and issues the corresponding world mutation when the
//! mine or place control fires. Mutations are edge-triggered: the resolver
//! remembers the previous tick's control flags, so holding a control across
//! many ticks produces exactly one mutation per activation.
//!
//! # Examples
//!
//! A small example that demonstrates how to use `raycast_block`. It places a
//! single block in an empty world and verifies the ray hits it.
//!
//! ```rust
//! use regolith::block::{blocks, Block};
//! use regolith::interaction::raycast_block;
//! use regolith::world::WorldState;
//! use bevy::math::{IVec3, Vec3};
//!
//! let mut world = WorldState::new();
//! world.set_block(IVec3::new(1, 1, 0), Block::new(blocks::STONE)).unwrap();
//!
//! // Raycast from z=-1 towards +z; should hit the placed block at (1,1,0).
//! let origin = Vec3::new(1.5, 1.5, -1.0);
//! let dir = Vec3::new(0.0, 0.0, 1.0);
//! let (hit_pos, _place_pos) = raycast_block(&world, origin, dir, 10.0).expect("should hit");
//! assert_eq!(hit_pos, IVec3::new(1, 1, 0));
//! ```

use crate::block::{Block, BlockFacing, BlockId, BlockMetadata, BlockRegistry};
use crate::controls::{Control, ControlState};
use crate::world::WorldState;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

/// Maximum distance (world units) at which blocks can be mined or placed.
pub const INTERACTION_REACH: f32 = 5.0;

/// Vertical offset from the player's eye down to the feet, used to keep
/// placements out of the player's own body.
pub const PLAYER_EYE_HEIGHT: f32 = 1.7;

#[inline]
fn f32_floor_to_i32(v: f32) -> i32 {
    debug_assert!(
        v.is_finite() && (-2_147_483_648.0_f32..=2_147_483_647.0_f32).contains(&v),
        "coordinate out of i32 range",
    );
    #[allow(clippy::cast_possible_truncation)]
    {
        v.floor() as i32
    }
}

/// Performs raycasting from the player's view to determine which block is
/// being targeted for interaction.
///
/// # Arguments
/// * `world` - the world store containing block data
/// * `origin` - the starting point of the raycast (usually the player's eye position)
/// * `direction` - the direction vector of the raycast (usually the view direction)
/// * `max_distance` - the maximum distance to check for block intersections
///
/// # Returns
/// An `Option` containing a tuple of the hit block position and the adjacent
/// air position the ray crossed last before hitting.
#[must_use]
pub fn raycast_block(
    world: &WorldState,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<(IVec3, IVec3)> {
    let mut pos = origin;
    let step = direction.normalize() * 0.1;
    let mut last_air_pos = IVec3::new(
        f32_floor_to_i32(pos.x),
        f32_floor_to_i32(pos.y),
        f32_floor_to_i32(pos.z),
    );

    let mut distance = 0.0;
    while distance < max_distance {
        let block_pos = IVec3::new(
            f32_floor_to_i32(pos.x),
            f32_floor_to_i32(pos.y),
            f32_floor_to_i32(pos.z),
        );
        if !world.get_block(block_pos).is_air() {
            return Some((block_pos, last_air_pos));
        }
        last_air_pos = block_pos;
        pos += step;
        distance += 0.1;
    }
    None
}

/// Material used for the place action. The inventory lives outside the core;
/// whatever owns it writes the selection here.
#[derive(Resource)]
pub struct SelectedBlock(pub BlockId);

impl Default for SelectedBlock {
    fn default() -> Self {
        SelectedBlock(crate::block::blocks::DIRT)
    }
}

/// Per-tick mine/place resolution with edge detection.
///
/// The resolver compares the current control flags against the previous
/// tick's, so a prolonged key hold mutates the world once, not once per
/// frame.
#[derive(Resource, Default)]
pub struct InteractionResolver {
    prev_mine: bool,
    prev_place: bool,
    clock: f32,
    /// Total blocks removed this session.
    pub mined: u64,
    /// Total blocks placed this session.
    pub placed: u64,
}

impl InteractionResolver {
    /// Evaluate one tick: detect control edges, resolve the targeted block,
    /// and issue at most one mine and one place mutation.
    ///
    /// Gameplay dead-ends (no target, unbreakable block, cell inside the
    /// player, out-of-bounds placement) degrade to silent no-ops so the
    /// frame loop is never interrupted.
    ///
    /// # Arguments
    /// * `dt` - seconds since the previous tick
    /// * `world` - world store to mutate
    /// * `controls` - current logical control activation (read only)
    /// * `registry` - block definitions (breakability check)
    /// * `origin` - player eye position
    /// * `direction` - player view direction
    /// * `place_id` - material id for the place action
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        dt: f32,
        world: &mut WorldState,
        controls: &ControlState,
        registry: &BlockRegistry,
        origin: Vec3,
        direction: Vec3,
        place_id: BlockId,
    ) {
        self.clock += dt;

        let mine_now = controls.is_active(Control::Mine);
        let place_now = controls.is_active(Control::Place);
        let mine_edge = mine_now && !self.prev_mine;
        let place_edge = place_now && !self.prev_place;
        // Record the level before any early-out so a held key cannot
        // re-trigger on a later tick.
        self.prev_mine = mine_now;
        self.prev_place = place_now;

        // Block interaction is suspended while the inventory is open.
        if controls.is_active(Control::Inventory) {
            return;
        }

        if !mine_edge && !place_edge {
            return;
        }

        let Some((hit_pos, place_pos)) = raycast_block(world, origin, direction, INTERACTION_REACH)
        else {
            return;
        };

        if mine_edge {
            let target = world.get_block(hit_pos);
            if !target.is_air()
                && registry.is_breakable(target.id)
                && world.remove_block(hit_pos).is_some()
            {
                self.mined += 1;
                debug!("mined block {} at {hit_pos} (t={:.1}s)", target.id, self.clock);
            }
        }

        if place_edge {
            let feet = f32_floor_to_i32(origin.y - PLAYER_EYE_HEIGHT);
            let head = f32_floor_to_i32(origin.y);
            let px = f32_floor_to_i32(origin.x);
            let pz = f32_floor_to_i32(origin.z);
            let intersects_player = place_pos.x == px
                && place_pos.z == pz
                && place_pos.y >= feet
                && place_pos.y <= head;

            if !intersects_player && world.get_block(place_pos).is_air() {
                let metadata = BlockMetadata {
                    facing: BlockFacing::from_view_direction(direction),
                    variant: 0,
                };
                if world
                    .set_block(place_pos, Block::with_metadata(place_id, metadata))
                    .is_ok()
                {
                    self.placed += 1;
                    debug!("placed block {place_id} at {place_pos} (t={:.1}s)", self.clock);
                }
            }
        }
    }
}

/// Per-frame system driving the resolver from the player camera.
///
/// Interaction only runs while the cursor is locked to the window, so mouse
/// clicks aimed at other applications never mutate the world.
#[allow(clippy::needless_pass_by_value)]
pub fn resolve_block_interaction(
    time: Res<Time>,
    mut resolver: ResMut<InteractionResolver>,
    mut world: ResMut<WorldState>,
    controls: Res<ControlState>,
    registry: Res<BlockRegistry>,
    selected: Res<SelectedBlock>,
    camera_query: Query<&Transform, With<Camera3d>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = window_query.get_single() else { return };
    if window.cursor.grab_mode != CursorGrabMode::Locked {
        return;
    }
    let Ok(camera) = camera_query.get_single() else { return };

    let direction = camera.forward();
    resolver.tick(
        time.delta_seconds(),
        &mut world,
        &controls,
        &registry,
        camera.translation,
        *direction,
        selected.0,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::blocks;

    const DT: f32 = 1.0 / 60.0;

    // Flat stone floor at y=0..=9 around the origin.
    fn flat_world() -> WorldState {
        let mut world = WorldState::new();
        for x in -8..8 {
            for z in -8..8 {
                for y in 0..10 {
                    world
                        .set_block(IVec3::new(x, y, z), Block::new(blocks::STONE))
                        .unwrap();
                }
            }
        }
        world
    }

    fn eye() -> Vec3 {
        // Standing on the floor, eye at y=11.7, one block back from origin
        Vec3::new(0.5, 11.7, -1.5)
    }

    #[test]
    fn raycast_hits_the_facing_block() {
        let mut world = WorldState::new();
        world
            .set_block(IVec3::new(0, 1, 1), Block::new(blocks::STONE))
            .unwrap();
        let hit = raycast_block(&world, Vec3::new(0.5, 1.5, 0.0), Vec3::Z, 5.0);
        let (hit_pos, place_pos) = hit.expect("should hit the stone block");
        assert_eq!(hit_pos, IVec3::new(0, 1, 1));
        assert_eq!(place_pos, IVec3::new(0, 1, 0));
    }

    #[test]
    fn raycast_misses_in_empty_space() {
        let world = WorldState::new();
        assert!(raycast_block(&world, Vec3::ZERO, Vec3::X, 5.0).is_none());
    }

    #[test]
    fn mining_a_facing_stone_block_makes_it_air() {
        let mut world = WorldState::new();
        let target = IVec3::new(0, 1, 1);
        world.set_block(target, Block::new(blocks::STONE)).unwrap();

        let mut controls = ControlState::default();
        controls.set(Control::Mine, true);

        let mut resolver = InteractionResolver::default();
        let registry = BlockRegistry::built_in();
        resolver.tick(
            DT,
            &mut world,
            &controls,
            &registry,
            Vec3::new(0.5, 1.5, 0.0),
            Vec3::Z,
            blocks::DIRT,
        );

        assert!(world.get_block(target).is_air());
        assert_eq!(resolver.mined, 1);
    }

    #[test]
    fn holding_mine_across_ten_ticks_removes_exactly_one_block() {
        let mut world = flat_world();
        let mut controls = ControlState::default();
        controls.set(Control::Mine, true);

        let mut resolver = InteractionResolver::default();
        let registry = BlockRegistry::built_in();
        let before = world.occupied_count();

        let down = Vec3::new(0.0, -1.0, 0.3).normalize();
        for _ in 0..10 {
            resolver.tick(DT, &mut world, &controls, &registry, eye(), down, blocks::DIRT);
        }

        assert_eq!(world.occupied_count(), before - 1);
        assert_eq!(resolver.mined, 1);
    }

    #[test]
    fn releasing_and_pressing_again_fires_a_second_mutation() {
        let mut world = flat_world();
        let mut controls = ControlState::default();
        let mut resolver = InteractionResolver::default();
        let registry = BlockRegistry::built_in();
        let down = Vec3::new(0.0, -1.0, 0.3).normalize();

        controls.set(Control::Mine, true);
        resolver.tick(DT, &mut world, &controls, &registry, eye(), down, blocks::DIRT);
        controls.set(Control::Mine, false);
        resolver.tick(DT, &mut world, &controls, &registry, eye(), down, blocks::DIRT);
        controls.set(Control::Mine, true);
        resolver.tick(DT, &mut world, &controls, &registry, eye(), down, blocks::DIRT);

        assert_eq!(resolver.mined, 2);
    }

    #[test]
    fn placing_fills_the_adjacent_air_cell() {
        let mut world = WorldState::new();
        world
            .set_block(IVec3::new(0, 1, 3), Block::new(blocks::STONE))
            .unwrap();

        let mut controls = ControlState::default();
        controls.set(Control::Place, true);

        let mut resolver = InteractionResolver::default();
        let registry = BlockRegistry::built_in();
        resolver.tick(
            DT,
            &mut world,
            &controls,
            &registry,
            Vec3::new(0.5, 1.5, 0.0),
            Vec3::Z,
            blocks::WOOD,
        );

        let placed = world.get_block(IVec3::new(0, 1, 2));
        assert_eq!(placed.id, blocks::WOOD);
        // Placement records the facing back towards the player
        assert_eq!(placed.metadata.map(|m| m.facing), Some(BlockFacing::North));
        assert_eq!(resolver.placed, 1);
    }

    #[test]
    fn placement_never_lands_inside_the_player() {
        let mut world = flat_world();
        let mut controls = ControlState::default();
        controls.set(Control::Place, true);

        let mut resolver = InteractionResolver::default();
        let registry = BlockRegistry::built_in();
        // Looking straight down: the last air cell is the player's own feet
        resolver.tick(
            DT,
            &mut world,
            &controls,
            &registry,
            Vec3::new(0.5, 11.7, 0.5),
            -Vec3::Y,
            blocks::DIRT,
        );

        assert_eq!(resolver.placed, 0);
        assert!(world.get_block(IVec3::new(0, 10, 0)).is_air());
    }

    #[test]
    fn unbreakable_blocks_survive_mining() {
        let mut world = WorldState::new();
        let target = IVec3::new(0, 1, 1);
        world.set_block(target, Block::new(blocks::WATER)).unwrap();

        let mut controls = ControlState::default();
        controls.set(Control::Mine, true);

        let mut resolver = InteractionResolver::default();
        let registry = BlockRegistry::built_in();
        resolver.tick(
            DT,
            &mut world,
            &controls,
            &registry,
            Vec3::new(0.5, 1.5, 0.0),
            Vec3::Z,
            blocks::DIRT,
        );

        assert_eq!(world.get_block(target).id, blocks::WATER);
        assert_eq!(resolver.mined, 0);
    }

    #[test]
    fn open_inventory_suppresses_interaction() {
        let mut world = flat_world();
        let mut controls = ControlState::default();
        controls.set(Control::Mine, true);
        controls.set(Control::Inventory, true);

        let mut resolver = InteractionResolver::default();
        let registry = BlockRegistry::built_in();
        let down = Vec3::new(0.0, -1.0, 0.3).normalize();
        resolver.tick(DT, &mut world, &controls, &registry, eye(), down, blocks::DIRT);

        assert_eq!(resolver.mined, 0);
    }
}
