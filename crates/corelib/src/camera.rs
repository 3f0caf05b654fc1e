use crate::error::{CoreError, CoreResult};
use crate::{Mat4, Vec2, Vec3, vec3};

/// Units per second for keyboard movement.
const MOVE_SPEED: f32 = 3.0;
/// Degrees of rotation per pixel of mouse drag.
const MOUSE_SENSITIVITY: f32 = 0.2;
const PITCH_LIMIT: f32 = 89.0;

/// Keyboard-driven displacement of a [`FlyCamera`] (W/S/A/D).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person camera steered with WASD and mouse drag (right-handed,
/// OpenGL clip space).
#[derive(Clone, Copy, Debug)]
pub struct FlyCamera {
    position: Vec3,
    direction: Vec3,
    up: Vec3,
    /// Degrees.
    yaw: f32,
    /// Degrees, kept within ±89 so the direction never aligns with `up`.
    pitch: f32,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    aspect: f32,
    last_mouse: Vec2,
    mouse_was_clicked: bool,
}

impl FlyCamera {
    pub fn new(width: u32, height: u32, position: Vec3, at: Vec3) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidViewport { width, height });
        }
        let direction = (at - position)
            .try_normalize()
            .ok_or(CoreError::DegenerateDirection)?;

        let (yaw, pitch) = angles_of(direction);
        Ok(Self {
            position,
            direction,
            up: Vec3::Y,
            yaw,
            pitch,
            fov_y_rad: 45f32.to_radians(),
            z_near: 0.1,
            z_far: 300.0,
            aspect: width as f32 / height as f32,
            last_mouse: Vec2::ZERO,
            mouse_was_clicked: false,
        })
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn yaw_pitch(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn move_by(&mut self, movement: Movement, delta_time: f32) {
        let delta = MOVE_SPEED * delta_time;
        let right = self.direction.cross(self.up).normalize();
        self.position += match movement {
            Movement::Forward => delta * self.direction,
            Movement::Backward => -delta * self.direction,
            Movement::Left => -delta * right,
            Movement::Right => delta * right,
        };
    }

    /// Feed the cursor position. Rotation only happens while the button is
    /// held on this event and was already held on the previous one.
    pub fn mouse_event(&mut self, mouse_pos: Vec2, clicked: bool) {
        let offset = mouse_pos - self.last_mouse;
        self.last_mouse = mouse_pos;

        if clicked && self.mouse_was_clicked {
            let offset = offset * MOUSE_SENSITIVITY;
            self.yaw += offset.x;
            self.pitch = (self.pitch - offset.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            self.direction = direction_of(self.yaw, self.pitch);
        }
        self.mouse_was_clicked = clicked;
    }

    pub fn viewport_event(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        let ratio = width as f32 / height as f32;
        if ratio > 1e-6 {
            self.aspect = ratio;
        }
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_rad, self.aspect, self.z_near, self.z_far)
    }
}

/// Yaw/pitch in degrees of a unit direction. Yaw is measured in the XZ
/// plane from +X towards +Z.
fn angles_of(direction: Vec3) -> (f32, f32) {
    let yaw = direction.z.atan2(direction.x).to_degrees().rem_euclid(360.0);
    let pitch = direction.y.clamp(-1.0, 1.0).asin().to_degrees();
    (yaw, pitch)
}

fn direction_of(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    vec3(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

/// Camera circling a target on a sphere, as used by the model viewer.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    longitude: f32,
    latitude: f32,
    distance: f32,
}

impl OrbitCamera {
    pub const LONGITUDE_RANGE: (f32, f32) = (-180.0, 180.0);
    pub const LATITUDE_RANGE: (f32, f32) = (-89.0, 89.0);
    pub const DISTANCE_RANGE: (f32, f32) = (2.0, 14.0);

    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            longitude: 0.0,
            latitude: 0.0,
            distance: 8.0,
        }
    }

    #[inline]
    pub fn longitude(&self) -> f32 {
        self.longitude
    }

    #[inline]
    pub fn latitude(&self) -> f32 {
        self.latitude
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn set_longitude(&mut self, degrees: f32) {
        let (lo, hi) = Self::LONGITUDE_RANGE;
        self.longitude = degrees.clamp(lo, hi);
    }

    pub fn set_latitude(&mut self, degrees: f32) {
        let (lo, hi) = Self::LATITUDE_RANGE;
        self.latitude = degrees.clamp(lo, hi);
    }

    pub fn set_distance(&mut self, distance: f32) {
        let (lo, hi) = Self::DISTANCE_RANGE;
        self.distance = distance.clamp(lo, hi);
    }

    /// Eye position on the sphere around `target`.
    pub fn eye(&self) -> Vec3 {
        let (lon, lat) = (self.longitude.to_radians(), self.latitude.to_radians());
        self.target
            + self.distance * vec3(lat.cos() * lon.sin(), lat.sin(), lat.cos() * lon.cos())
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }
}
