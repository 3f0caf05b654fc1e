//! Core types: math re-exports, cameras, CPU particle simulation.

pub use glam::{Mat4, Vec2, Vec3, vec2, vec3};

pub mod camera;
pub mod error;
pub mod particles;

pub use error::{CoreError, CoreResult};
