use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::math::{IVec3, Vec3};
use regolith::block::{blocks, Block, BlockRegistry};
use regolith::controls::{Control, ControlState};
use regolith::interaction::{raycast_block, InteractionResolver};
use regolith::player::camera::PlayerLook;
use regolith::player::physics as player_physics_mod;
use regolith::player::Player;
use regolith::settings::Settings;
use regolith::terrain::{generate_area, generate_chunk, TerrainParams};
use regolith::world::WorldState;

/// Test out small camera movement deltas
fn bench_camera_look_clamp(c: &mut Criterion) {
    let settings = Settings::defaults();
    c.bench_function("camera_look_clamp", |b| {
        b.iter(|| {
            let mut look = PlayerLook::default();
            // simulate many small mouse moves
            for i in 0..1_000usize {
                let dx = ((i * 13) % 17) as f32 * 0.1;
                let dy = ((i * 7) % 23) as f32 * 0.2 - 5.0;
                look.apply_delta(black_box(bevy::math::Vec2::new(dx, dy)), &settings);
            }
            black_box((look.yaw, look.pitch));
        })
    });
}

/// Randomized camera movement deltas (deterministic LCG) to approximate variable input
fn bench_camera_look_random(c: &mut Criterion) {
    let settings = Settings::defaults();
    c.bench_function("camera_look_random", |b| {
        b.iter(|| {
            let mut look = PlayerLook::default();
            let mut state: u32 = 0x12345678;
            for _ in 0..1_000usize {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                let dx = (((state >> 16) & 0x7fff) as f32 / 32767.0) * 200.0 - 100.0;
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                let dy = (((state >> 16) & 0x7fff) as f32 / 32767.0) * 200.0 - 100.0;
                look.apply_delta(black_box(bevy::math::Vec2::new(dx, dy)), &settings);
            }
            black_box((look.yaw, look.pitch));
        })
    });
}

/// Benchmark chunk generation for many chunks in a loop.
fn bench_chunk_generate(c: &mut Criterion) {
    let registry = BlockRegistry::built_in();
    let params = TerrainParams::default();

    c.bench_function("chunk_generate", |b| {
        b.iter(|| {
            for i in 0..100 {
                let chunk =
                    generate_chunk(&params, (i % 10) as i32, (i / 10) as i32, &registry).unwrap();
                black_box(&chunk);
            }
        })
    });
}

/// Benchmark generating and bootstrapping a startup-sized area of chunks.
fn bench_world_bootstrap(c: &mut Criterion) {
    let registry = BlockRegistry::built_in();
    let params = TerrainParams::default();

    c.bench_function("world_bootstrap_9x9", |b| {
        b.iter(|| {
            let mut world = WorldState::new();
            let generated = generate_area(&params, (0, 0), 4, &registry).unwrap();
            world.bootstrap(generated).unwrap();
            black_box(&world);
        })
    });
}

/// Benchmark single-block mutation and query round trips through the store.
fn bench_world_set_get(c: &mut Criterion) {
    c.bench_function("world_set_get_block", |b| {
        b.iter(|| {
            let mut world = WorldState::new();
            for i in 0..1_000i32 {
                let pos = IVec3::new(i % 32, (i % 60).abs(), -i % 32);
                world.set_block(pos, Block::new(blocks::STONE)).unwrap();
                black_box(world.get_block(pos));
            }
            for i in 0..1_000i32 {
                let pos = IVec3::new(i % 32, (i % 60).abs(), -i % 32);
                world.remove_block(pos);
            }
            black_box(world.occupied_count());
        })
    });
}

/// Benchmark targeting raycasts over generated terrain.
fn bench_raycast(c: &mut Criterion) {
    let registry = BlockRegistry::built_in();
    let params = TerrainParams::default();
    let mut world = WorldState::new();
    world
        .bootstrap(generate_area(&params, (0, 0), 2, &registry).unwrap())
        .unwrap();

    c.bench_function("raycast_block_terrain", |b| {
        b.iter(|| {
            for i in 0..100usize {
                let angle = (i as f32) * 0.0628;
                let dir = Vec3::new(angle.cos(), -0.5, angle.sin());
                black_box(raycast_block(
                    &world,
                    Vec3::new(8.0, 50.0, 8.0),
                    dir,
                    5.0,
                ));
            }
        })
    });
}

/// Benchmark edge-detected interaction ticks with a held mine control.
fn bench_interaction_tick(c: &mut Criterion) {
    let registry = BlockRegistry::built_in();
    let params = TerrainParams::default();

    c.bench_function("interaction_tick_held_mine", |b| {
        b.iter(|| {
            let mut world = WorldState::new();
            world
                .bootstrap(generate_area(&params, (0, 0), 1, &registry).unwrap())
                .unwrap();
            let mut controls = ControlState::default();
            controls.set(Control::Mine, true);
            let mut resolver = InteractionResolver::default();
            for _ in 0..1_000 {
                resolver.tick(
                    1.0 / 60.0,
                    &mut world,
                    &controls,
                    &registry,
                    Vec3::new(8.0, 50.0, 8.0),
                    Vec3::new(0.0, -1.0, 0.01),
                    blocks::DIRT,
                );
            }
            black_box(resolver.mined);
        })
    });
}

/// Benchmark control store updates and active-list recomputation.
fn bench_control_updates(c: &mut Criterion) {
    c.bench_function("control_state_updates", |b| {
        b.iter(|| {
            let mut controls = ControlState::default();
            for i in 0..1_000usize {
                let control = Control::ALL[i % Control::ALL.len()];
                controls.set(control, i % 3 != 0);
                black_box(controls.active_controls().len());
            }
        })
    });
}

/// Benchmark simulating many player physics steps in a generated world.
fn bench_player_physics_sim(c: &mut Criterion) {
    // Realistic physics stepping over a generated world
    let registry = BlockRegistry::built_in();
    let params = TerrainParams::default();
    let mut world = WorldState::new();
    world
        .bootstrap(generate_area(&params, (0, 0), 2, &registry).unwrap())
        .unwrap();

    c.bench_function("player_physics_many_steps", |b| {
        b.iter(|| {
            let mut tf = bevy::prelude::Transform::from_xyz(8.0, 60.0, 8.0);
            let mut player = Player { velocity: Vec3::ZERO, on_ground: false };
            let controls = ControlState::default();
            let dt = 1.0f32 / 60.0f32;

            for _ in 0..5_000 {
                player_physics_mod::physics_step(
                    &mut tf,
                    &mut player,
                    &world,
                    &registry,
                    &controls,
                    dt,
                );
            }

            black_box((tf, player));
        })
    });
}

#[test]
fn __bench_smoke_test() {
    // make sure test harness runs this file
    assert!(true);
}

fn bench_dummy(c: &mut Criterion) { c.bench_function("dummy", |b| b.iter(|| { black_box(1 + 1); })); }

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_dummy,
        bench_camera_look_clamp,
        bench_camera_look_random,
        bench_chunk_generate,
        bench_world_bootstrap,
        bench_world_set_get,
        bench_raycast,
        bench_interaction_tick,
        bench_control_updates,
        bench_player_physics_sim
}
criterion_main!(benches);
