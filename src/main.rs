use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use regolith::block::loader as block_loader;
use regolith::controls::ControlState;
use regolith::debug::DebugDumpPlugin;
use regolith::input::capture_controls;
use regolith::interaction::{resolve_block_interaction, InteractionResolver, SelectedBlock};
use regolith::player::{camera_look, cursor_grab, player_movement, player_physics, Player, PlayerLook};
use regolith::settings::loader as settings_loader;
use regolith::world::bootstrap::bootstrap_world;
use regolith::world::WorldState;

/// Spawn the player camera above the center of the start chunk; gravity
/// drops it onto the generated terrain.
fn setup(mut commands: Commands) {
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(8.0, 56.0, 8.0),
            ..default()
        },
        Player { velocity: Vec3::ZERO, on_ground: false },
        PlayerLook::default(),
    ));
}

fn main() {
    let settings = settings_loader::load_settings_from_dir("data/settings");
    let settings_watcher = settings_loader::setup_settings_watcher("data/settings")
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: PresentMode::AutoNoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(LogDiagnosticsPlugin::default())
        .add_plugins(DebugDumpPlugin);

    app.insert_resource(WorldState::new());
    app.insert_resource(ControlState::default());
    app.insert_resource(InteractionResolver::default());
    app.insert_resource(SelectedBlock::default());
    app.insert_resource(block_loader::load_blocks_from_dir("data/blocks"));
    app.insert_resource(
        block_loader::setup_block_watcher("data/blocks").unwrap_or_else(|_| {
            block_loader::BlockWatcher::stub()
        }),
    );

    app.insert_resource(settings.clone());
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, setup);
    app.add_systems(Startup, bootstrap_world);

    // Input is captured in PreUpdate so every Update system reads the same
    // control snapshot for the frame.
    app.add_systems(PreUpdate, capture_controls);

    app.add_systems(Update, block_loader::check_block_changes);
    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, cursor_grab);
    app.add_systems(Update, camera_look);
    app.add_systems(Update, player_movement);
    app.add_systems(Update, player_physics);
    app.add_systems(Update, resolve_block_interaction);

    app.run();
}
