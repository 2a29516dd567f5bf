// Standard library and external crates
use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;

// Crate engine modules
use crate::engine::assets::point_store::{PointStore, PointStoreReplaced, seed_points};
use crate::engine::assets::source_image::SourceImage;
use crate::engine::camera::orbit_camera::{OrbitCamera, camera_controller};
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::axes::spawn_axes;
use crate::engine::scene::image_panel::{show_image_panel, spawn_image_panel};
use crate::engine::scene::point_cloud::rebuild_point_cloud;
use crate::engine::shaders::ColourPointsShader;

// Crate tools and relay modules
use crate::relay::channel::RelayPlugin;
use crate::tools::selection::SelectionPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(MaterialPlugin::<ColourPointsShader>::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(RelayPlugin)
        .add_plugins(SelectionPlugin);

    app.insert_resource(ClearColor(Color::BLACK))
        .init_resource::<OrbitCamera>()
        .init_resource::<PointStore>()
        .init_resource::<SourceImage>()
        .add_event::<PointStoreReplaced>();

    app.add_systems(Startup, setup).add_systems(
        Update,
        (
            camera_controller,
            rebuild_point_cloud,
            show_image_panel,
            fps_text_update_system,
        ),
    );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

#[derive(Component)]
struct FpsText;

/// Spawn cameras, static scene content, the image panel, and the seed cloud.
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut source: ResMut<SourceImage>,
    mut store: ResMut<PointStore>,
    mut replaced: EventWriter<PointStoreReplaced>,
    orbit: Res<OrbitCamera>,
) {
    println!("=== COLOUR CLOUD VIEWER ===");

    spawn_cameras(&mut commands, &orbit);
    spawn_axes(&mut commands, &mut meshes, &mut materials);
    spawn_image_panel(&mut commands, &mut images, &mut source);
    spawn_fps_text(&mut commands);

    // Placeholder particles until an image is relayed in.
    store.replace(seed_points());
    replaced.send(PointStoreReplaced);
}

fn spawn_cameras(commands: &mut Commands, orbit: &OrbitCamera) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(orbit.eye()).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Screen-space overlay for the gesture outline and the UI.
    commands.spawn((
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        IsDefaultUiCamera,
    ));
}

fn spawn_fps_text(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
