//! Player physics: gravity, jumping, and ground detection.
//!
//! Applies gravity each frame, handles the jump control, and performs ground
//! checks against the world store to maintain `on_ground` and correct the
//! vertical position. This is the whole of the player's physical simulation;
//! horizontal movement (`crate::player::movement`) is unconstrained.

use crate::controls::{Control, ControlState};
use crate::player::Player;
use crate::world::WorldState;
use bevy::prelude::*;

pub const GRAVITY: f32 = -32.0;
pub const JUMP_VELOCITY: f32 = 8.0;
pub const TERMINAL_VELOCITY: f32 = -50.0;

const PLAYER_EYE_HEIGHT: f32 = 1.7;
const PLAYER_RADIUS: f32 = 0.3;

/// Step the core player vertical-physics for one frame.
///
/// Extracted helper so systems, tests and benchmarks exercise identical
/// logic.
pub fn physics_step(
    tf: &mut Transform,
    player: &mut Player,
    world: &WorldState,
    registry: &crate::block::BlockRegistry,
    controls: &ControlState,
    dt: f32,
) {
    player.velocity.y += GRAVITY * dt;
    if player.velocity.y < TERMINAL_VELOCITY {
        player.velocity.y = TERMINAL_VELOCITY;
    }

    if controls.is_active(Control::Jump) && player.on_ground {
        player.velocity.y = JUMP_VELOCITY;
        player.on_ground = false;
    }

    let new_y = tf.translation.y + player.velocity.y * dt;
    let feet_y = new_y - PLAYER_EYE_HEIGHT;
    let mut gnd = false;
    for dx in [-PLAYER_RADIUS, PLAYER_RADIUS] {
        for dz in [-PLAYER_RADIUS, PLAYER_RADIUS] {
            #[allow(clippy::cast_possible_truncation)]
            let probe = IVec3::new(
                (tf.translation.x + dx).floor() as i32,
                feet_y.floor() as i32,
                (tf.translation.z + dz).floor() as i32,
            );
            if registry.is_solid(world.get_block(probe).id) {
                gnd = true;
            }
        }
    }

    if gnd && player.velocity.y < 0.0 {
        tf.translation.y = feet_y.floor() + 1.0 + PLAYER_EYE_HEIGHT;
        player.velocity.y = 0.0;
        player.on_ground = true;
    } else {
        tf.translation.y = new_y;
        if player.velocity.y < 0.0 {
            player.on_ground = false;
        }
    }
}

/// Apply gravity, jumping and ground detection for the player each frame.
///
/// # Arguments
/// * `time` - time resource for delta timing
/// * `world` - world access for block queries (ground detection)
/// * `registry` - block definitions (solidity check; water is not ground)
/// * `controls` - logical control activation (jump)
/// * `q` - query for `(Transform, Player)` to update
#[allow(clippy::needless_pass_by_value)]
pub fn player_physics(
    time: Res<Time>,
    world: Res<WorldState>,
    registry: Res<crate::block::BlockRegistry>,
    controls: Res<ControlState>,
    mut q: Query<(&mut Transform, &mut Player), With<Camera3d>>,
) {
    let Ok((mut tf, mut player)) = q.get_single_mut() else { return };
    physics_step(
        &mut tf,
        &mut player,
        &world,
        &registry,
        &controls,
        time.delta_seconds(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{blocks, Block, BlockRegistry};

    const DT: f32 = 1.0 / 60.0;

    fn world_with_floor(id: crate::block::BlockId) -> WorldState {
        let mut world = WorldState::new();
        for x in -4..4 {
            for z in -4..4 {
                world.set_block(IVec3::new(x, 5, z), Block::new(id)).unwrap();
            }
        }
        world
    }

    #[test]
    fn player_falls_and_lands_on_stone() {
        let world = world_with_floor(blocks::STONE);
        let registry = BlockRegistry::built_in();
        let controls = ControlState::default();

        let mut tf = Transform::from_xyz(0.5, 12.0, 0.5);
        let mut player = Player { velocity: Vec3::ZERO, on_ground: false };

        for _ in 0..300 {
            physics_step(&mut tf, &mut player, &world, &registry, &controls, DT);
        }

        assert!(player.on_ground);
        // Feet rest on top of the floor block at y=5
        assert!((tf.translation.y - (6.0 + 1.7)).abs() < 1e-3);
    }

    #[test]
    fn water_is_not_ground() {
        let world = world_with_floor(blocks::WATER);
        let registry = BlockRegistry::built_in();
        let controls = ControlState::default();

        let mut tf = Transform::from_xyz(0.5, 12.0, 0.5);
        let mut player = Player { velocity: Vec3::ZERO, on_ground: false };

        for _ in 0..60 {
            physics_step(&mut tf, &mut player, &world, &registry, &controls, DT);
        }

        assert!(!player.on_ground);
        assert!(tf.translation.y < 8.0);
    }

    #[test]
    fn jump_only_fires_from_the_ground() {
        let world = world_with_floor(blocks::STONE);
        let registry = BlockRegistry::built_in();
        let mut controls = ControlState::default();

        let mut tf = Transform::from_xyz(0.5, 6.0 + 1.7, 0.5);
        let mut player = Player { velocity: Vec3::ZERO, on_ground: true };

        controls.set(Control::Jump, true);
        physics_step(&mut tf, &mut player, &world, &registry, &controls, DT);
        assert!(!player.on_ground);
        assert!(player.velocity.y > 0.0);

        // Airborne: holding jump must not add velocity
        let rising = player.velocity.y;
        physics_step(&mut tf, &mut player, &world, &registry, &controls, DT);
        assert!(player.velocity.y < rising);
    }
}
