//! Common component types used across benchmarks.
//!
//! These components are designed to be representative of real game components
//! in terms of size and access patterns.

use serde::Serialize;
use sol_ecs::ecs::Component;

// =============================================================================
// Transform Components
// =============================================================================

/// 3D position component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 3D velocity component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Rotation as euler angles (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

// =============================================================================
// Game Entity Components
// =============================================================================

/// Health component for damageable entities.
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Team/faction identifier.
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Team {
    pub id: u32,
}

/// A projectile marker.
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Projectile;

// =============================================================================
// Particle System Components
// =============================================================================

/// Particle marker.
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Particle;

/// Remaining and total lifetime in seconds.
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Lifetime {
    pub remaining: f32,
    pub total: f32,
}

/// RGBA color.
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Billboard size.
#[derive(Component, Clone, Copy, Debug, Default, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}
