use bevy::input::mouse::MouseScrollUnit;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};
use constants::render_settings::CUBE_SIDE;

#[derive(Resource)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Cleared while selection owns the pointer, so drag input cannot fight
    /// with an in-progress gesture.
    pub enabled: bool,
}

impl OrbitCamera {
    /// Home framing: the classic corner view looking down the cube diagonal.
    fn home() -> (f32, f32, f32) {
        let yaw = std::f32::consts::FRAC_PI_4;
        let pitch = -(1.0 / 3f32.sqrt()).asin();
        let distance = CUBE_SIDE * 2.0 * 3f32.sqrt();
        (yaw, pitch, distance)
    }

    /// Restore the initial framing. Does not touch any selection state.
    pub fn reset(&mut self) {
        let (yaw, pitch, distance) = Self::home();
        self.yaw = yaw;
        self.pitch = pitch;
        self.distance = distance;
    }

    /// Camera position for the current yaw/pitch/distance, looking at the
    /// cube origin.
    pub fn eye(&self) -> Vec3 {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        rotation * (Vec3::Z * self.distance)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let (yaw, pitch, distance) = Self::home();
        Self {
            yaw,
            pitch,
            distance,
            enabled: true,
        }
    }
}

pub fn camera_controller(
    mut cameras: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = cameras.single_mut() else {
        return;
    };

    // Always drain input events, even while rotation is locked.
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    if orbit.enabled {
        if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
            let yaw_sens = 0.0035;
            let pitch_sens = 0.0030;
            orbit.yaw -= mouse_delta.x * yaw_sens;
            orbit.pitch = (orbit.pitch - mouse_delta.y * pitch_sens).clamp(-1.55, 1.55);
        }

        if scroll_accum.abs() > f32::EPSILON {
            let dolly_speed = (orbit.distance * 0.2).clamp(10.0, 1000.0);
            orbit.distance = (orbit.distance - scroll_accum * dolly_speed)
                .clamp(CUBE_SIDE * 0.5, CUBE_SIDE * 8.0);
        }
    }

    let target = Transform::from_translation(orbit.eye()).looking_at(Vec3::ZERO, Vec3::Y);
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_eye_sits_on_the_cube_diagonal() {
        let orbit = OrbitCamera::default();
        let eye = orbit.eye();
        assert!((eye.x - eye.y).abs() < 0.5, "eye = {eye:?}");
        assert!((eye.y - eye.z).abs() < 0.5, "eye = {eye:?}");
        assert!(eye.x > 0.0);
        assert!((eye.length() - orbit.distance).abs() < 1e-2);
    }

    #[test]
    fn reset_restores_home_framing() {
        let mut orbit = OrbitCamera::default();
        let home_eye = orbit.eye();
        orbit.yaw += 1.0;
        orbit.pitch = 0.3;
        orbit.distance *= 2.0;
        orbit.reset();
        assert!((orbit.eye() - home_eye).length() < 1e-3);
    }
}
