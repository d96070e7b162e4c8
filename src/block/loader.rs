//! Block loader and watcher for loading block definitions from RON files
//! and monitoring changes for hot reloading during runtime.
//! # Example
//! ```
//! use bevy::prelude::*;
//! use regolith::block::loader as block_loader;
//!
//! fn main() {
//!     let mut app = App::new();
//!
//!     // Load initial registry and insert as a resource
//!     let registry = block_loader::load_blocks_from_dir("data/blocks");
//!     app.insert_resource(registry);
//!
//!     // Create watcher (fallback to stub on error) and insert as resource
//!     let watcher = block_loader::setup_block_watcher("data/blocks")
//!         .unwrap_or_else(|_| block_loader::BlockWatcher::stub());
//!     app.insert_resource(watcher);
//!
//!     // Add check system (runs every update and will reload when files change)
//!     app.add_systems(Update, block_loader::check_block_changes);
//!
//!     app.run();
//! }
//! ```

use super::{BlockDef, BlockRegistry};
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use bevy::prelude::{info, Res, ResMut, Resource};

#[derive(Resource)]
pub struct BlockWatcher(pub crate::ron::RonWatcher);

/// Load all block definitions from RON files.
///
/// # Arguments
/// * `path` - The directory path where block RON files are located (e.g., "data/blocks").
///
/// # Returns
/// A `BlockRegistry` containing all loaded block definitions, indexed by both
/// name and numeric ID. When the directory yields no definitions the built-in
/// material set is used so the game can always start.
///
/// # Example
/// ```rust
/// use regolith::block::loader::load_blocks_from_dir;
///
/// let registry = load_blocks_from_dir("data/blocks");
/// if let Some(dirt) = registry.get("dirt") {
///     println!("Dirt block ID: {}", dirt.id);
/// }
/// ```
#[must_use]
pub fn load_blocks_from_dir(path: &str) -> BlockRegistry {
    let defs: Vec<BlockDef> = load_ron_files(path);
    if defs.is_empty() {
        return BlockRegistry::built_in();
    }

    let mut registry = BlockRegistry::default();
    for def in defs {
        registry.register(def);
    }

    // Reserve a placeholder definition so lookups that fall back to
    // `missing_id` always resolve.
    let missing_id = registry.missing_id();
    if !registry.blocks_by_id.contains_key(&missing_id) {
        let placeholder = BlockDef {
            name: "__missing__".to_string(),
            id: missing_id,
            ..Default::default()
        };
        registry.register(placeholder);
    }

    registry
}

/// Set up a file watcher to monitor changes in block RON files
/// This is most ideal for hot reloading without rerunning the game instance
///
/// # Arguments
/// * `path` - The directory path where block RON files are located (e.g., "data/blocks").
///
/// # Returns
/// A `BlockWatcher` that can be used as a Bevy resource to check for changes
/// in block definitions during runtime
///
/// # Errors
/// Returns a `notify::Error` if the underlying file watcher could not be created or configured.
pub fn setup_block_watcher(path: &str) -> Result<BlockWatcher, notify::Error> {
    setup_ron_watcher(path).map(BlockWatcher)
}

/// Checks for changes in block RON files and reloads the block registry if
/// changes are detected.
///
/// # Arguments
/// * `watcher` - A `BlockWatcher` resource that monitors changes in block RON files.
/// * `registry` - A mutable reference to the `BlockRegistry` resource that will be updated if changes are detected
///
/// # Panics
/// Will panic if the internal `BlockWatcher` mutex is poisoned when calling `lock().unwrap()`.
#[allow(clippy::needless_pass_by_value)]
pub fn check_block_changes(watcher: Res<BlockWatcher>, mut registry: ResMut<BlockRegistry>) {
    if *watcher.0.changed.lock().unwrap() {
        info!("Blocks changed, reloading...");
        *registry = load_blocks_from_dir("data/blocks");
        *watcher.0.changed.lock().unwrap() = false;
    }
}

impl BlockWatcher {
    /// Create a stub `BlockWatcher` that does not have an active OS watcher.
    #[must_use]
    pub fn stub() -> Self {
        BlockWatcher(crate::ron::RonWatcher::stub())
    }
}
