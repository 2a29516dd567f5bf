use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use constants::relay::{RELAY_PORT, RelayMessage};
use constants::render_settings::{CUBE_SIDE, IMAGE_WIDTH};
use std::io::{BufRead, BufReader};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use crate::engine::assets::point_store::{PointStore, PointStoreReplaced, decompose_image};
use crate::engine::assets::source_image::SourceImage;
use crate::engine::scene::image_panel::panel_texture;

/// Raw message lines pushed by the listener thread, drained on the main
/// schedule each frame.
#[derive(Resource, Clone, Default)]
pub struct RelayQueue(Arc<Mutex<Vec<String>>>);

/// Marker for relayed line-loop geometry, replaced on each `lines` message.
#[derive(Component)]
pub struct RelayLines;

pub struct RelayPlugin;

impl Plugin for RelayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RelayQueue>()
            .add_systems(Startup, start_relay_listener)
            .add_systems(Update, process_relay_messages);
    }
}

/// Spawn the accept loop. Each connection gets its own reader thread feeding
/// the shared queue line by line.
pub fn start_relay_listener(queue: Res<RelayQueue>) {
    let queue = queue.0.clone();

    std::thread::spawn(move || {
        let listener = match TcpListener::bind(("127.0.0.1", RELAY_PORT)) {
            Ok(listener) => listener,
            Err(error) => {
                warn!("Relay listener failed to bind port {RELAY_PORT}: {error}");
                return;
            }
        };
        println!("Relay listening on 127.0.0.1:{RELAY_PORT}");

        for stream in listener.incoming() {
            let Ok(stream) = stream else {
                continue;
            };
            let queue = queue.clone();
            std::thread::spawn(move || {
                let reader = BufReader::new(stream);
                for line in reader.lines() {
                    let Ok(line) = line else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Ok(mut pending) = queue.lock() {
                        pending.push(line);
                    }
                }
            });
        }
    });
}

/// Drain and decode queued relay messages. Undecodable payloads are logged
/// and dropped; the channel keeps serving subsequent messages.
pub fn process_relay_messages(
    queue: Res<RelayQueue>,
    mut commands: Commands,
    mut store: ResMut<PointStore>,
    mut replaced: EventWriter<PointStoreReplaced>,
    mut source: ResMut<SourceImage>,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing_lines: Query<Entity, With<RelayLines>>,
) {
    let pending = {
        let Ok(mut queue) = queue.0.lock() else {
            return;
        };
        std::mem::take(&mut *queue)
    };

    for line in pending {
        match serde_json::from_str::<RelayMessage>(&line) {
            Ok(RelayMessage::Image { data }) => {
                handle_image(&data, &mut store, &mut replaced, &mut source, &mut images);
            }
            Ok(RelayMessage::Lines { data }) => {
                spawn_relay_lines(
                    &mut commands,
                    &data,
                    &mut meshes,
                    &mut materials,
                    &existing_lines,
                );
            }
            Err(error) => warn!("Relay: dropping undecodable message: {error}"),
        }
    }
}

/// Decode a relayed image, refresh the panel, and swap the point store.
fn handle_image(
    data: &str,
    store: &mut PointStore,
    replaced: &mut EventWriter<PointStoreReplaced>,
    source: &mut SourceImage,
    images: &mut Assets<Image>,
) {
    let bytes = match BASE64.decode(data) {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!("Relay: image payload is not valid base64: {error}");
            return;
        }
    };
    let decoded = match image::load_from_memory(&bytes) {
        Ok(decoded) => decoded,
        Err(error) => {
            warn!("Relay: could not decode image payload: {error}");
            return;
        }
    };

    let height = (IMAGE_WIDTH * decoded.height() / decoded.width()).max(1);
    let resized = decoded
        .resize_exact(IMAGE_WIDTH, height, image::imageops::FilterType::Triangle)
        .to_rgba8();

    source.width = resized.width();
    source.height = resized.height();
    source.rgba = resized.as_raw().clone();
    images.insert(
        &source.handle,
        panel_texture(source.width, source.height, source.rgba.clone()),
    );

    let points = decompose_image(&resized);
    info!("Relay: image decomposed into {} points", points.len());
    store.replace(points);
    replaced.send(PointStoreReplaced);
}

/// Draw relayed vertex triples as closed loops scaled into the cube,
/// replacing any previous relayed geometry.
fn spawn_relay_lines(
    commands: &mut Commands,
    data: &[[f32; 3]],
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    existing: &Query<Entity, With<RelayLines>>,
) {
    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(data.len() * 2);
    for triple in data.chunks_exact(3) {
        let scaled: Vec<[f32; 3]> = triple
            .iter()
            .map(|v| {
                [
                    (v[0] - 0.5) * CUBE_SIDE,
                    (v[1] - 0.5) * CUBE_SIDE,
                    (v[2] - 0.5) * CUBE_SIDE,
                ]
            })
            .collect();
        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            positions.push(scaled[a]);
            positions.push(scaled[b]);
        }
    }

    if positions.is_empty() {
        return;
    }
    info!("Relay: drawing {} line loops", data.len() / 3);

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::IDENTITY,
        RelayLines,
    ));
}
