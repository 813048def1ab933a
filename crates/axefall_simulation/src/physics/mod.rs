//! Kinematic тела и collision-словарь rapier.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub mod collision;
pub mod movement;

pub use movement::{
    KinematicBody, KinematicBodyPlugin, MovementInput, PhysicsBody,
};

use crate::components::ActorRole;
use crate::engine::ContactRadius;

/// Spawn helper: статичное препятствие (стена, колонна).
///
/// Полный rapier-набор для движка + ContactRadius для headless probe.
pub fn spawn_obstacle(commands: &mut Commands, position: Vec3, radius: f32) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            ActorRole::Obstacle,
            ContactRadius(radius),
            RigidBody::Fixed,
            Collider::cuboid(radius, radius, radius),
            collision::role_groups(ActorRole::Obstacle),
        ))
        .id()
}
