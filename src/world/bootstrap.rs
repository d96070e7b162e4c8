//! One-shot startup terrain pass.
//!
//! Generates every chunk in the configured radius around the origin on the
//! async compute pool, then installs the batch into `WorldState` as a single
//! snapshot. The system blocks until every chunk has finished generating, so
//! readers never observe a half-populated world: either the full snapshot is
//! installed or (on a generation failure) the app shuts down with an error.

use crate::block::BlockRegistry;
use crate::chunk::{Chunk, ChunkCoord};
use crate::settings::Settings;
use crate::terrain;
use crate::world::WorldState;
use bevy::prelude::*;
use bevy::tasks::AsyncComputeTaskPool;

/// Startup system: generate the initial area and bootstrap the world store.
///
/// # Arguments
/// * `world` - world store receiving the snapshot
/// * `registry` - block registry used to resolve generator materials
/// * `settings` - world settings (terrain parameters, bootstrap radius)
/// * `exit` - used to abort the app when generation fails
#[allow(clippy::needless_pass_by_value)]
pub fn bootstrap_world(
    mut world: ResMut<WorldState>,
    registry: Res<BlockRegistry>,
    settings: Res<Settings>,
    mut exit: EventWriter<AppExit>,
) {
    let params = settings.world.terrain.clone();
    if let Err(e) = params.validate() {
        error!("terrain generation failed: {e}");
        exit.send(AppExit::error());
        return;
    }

    let radius = settings.world.bootstrap_radius;
    let pool = AsyncComputeTaskPool::get();

    // Fan the per-chunk work out on the compute pool. Generation is a pure
    // function of (params, coordinate), so task completion order is irrelevant.
    let mut tasks = Vec::new();
    for cx in -radius..=radius {
        for cz in -radius..=radius {
            let task_params = params.clone();
            let task_registry = registry.clone();
            tasks.push(pool.spawn(async move {
                crate::debug::record_thread_global("bootstrap_generation_task");
                let chunk = terrain::generate_chunk(&task_params, cx, cz, &task_registry);
                (cx, cz, chunk)
            }));
        }
    }

    let mut generated: Vec<(ChunkCoord, Chunk)> = Vec::with_capacity(tasks.len());
    for task in tasks {
        let (cx, cz, result) = futures::executor::block_on(task);
        match result {
            Ok(chunk) => generated.push(((cx, cz), chunk)),
            Err(e) => {
                error!("terrain generation failed for chunk ({cx}, {cz}): {e}");
                exit.send(AppExit::error());
                return;
            }
        }
    }

    if world.bootstrap(generated).is_ok() {
        info!(
            "bootstrapped {} chunks ({} blocks occupied)",
            world.chunk_count(),
            world.occupied_count()
        );
    }
}
