//! Kinematic контроллер для игрока.
//!
//! Архитектура:
//! - Rapier-компоненты (RigidBody::KinematicPositionBased) описывают тело для движка
//! - Velocity интегрируем сами: input → velocity → transform
//! - Gravity + ground check; пол на y=0, позиция тела — у ног
//!
//! Детерминизм: всё в FixedUpdate (60Hz), без обращений к реальному времени.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use crate::SimulationSet;

/// Порог, ниже которого тело считается стоящим на полу
const FLOOR_EPSILON: f32 = 0.05;

/// Собственная скорость тела (интегрируется симуляцией, не rapier forces)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}

/// Параметры kinematic-тела
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    /// Скорость движения (m/s)
    pub move_speed: f32,
    /// Гравитация (m/s²)
    pub gravity: f32,
    /// Вертикальная скорость, задаваемая прыжком (m/s)
    pub jump_impulse: f32,
    /// На полу ли тело
    pub grounded: bool,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            gravity: -9.81,
            jump_impulse: 10.0,
            grounded: false,
        }
    }
}

/// Направление движения на текущий тик (normalized, горизонтальное)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    pub direction: Vec3,
}

/// Система: ground check.
///
/// Headless stand-in вместо raycast движка: на полу, если тело у y=0 и не
/// летит вверх. Прижимает тело к полу и гасит вертикальную скорость.
pub fn ground_detection(
    mut query: Query<(&mut Transform, &mut PhysicsBody, &mut KinematicBody)>,
) {
    for (mut transform, mut body, mut kinematic) in query.iter_mut() {
        if transform.translation.y <= FLOOR_EPSILON && body.velocity.y <= 0.0 {
            transform.translation.y = 0.0;
            body.velocity.y = 0.0;
            kinematic.grounded = true;
        } else {
            kinematic.grounded = false;
        }
    }
}

/// Система: MovementInput → горизонтальная velocity.
///
/// Y-компонента не трогается (ей владеет gravity/прыжок).
pub fn apply_movement_input(
    mut query: Query<(&KinematicBody, &MovementInput, &mut PhysicsBody)>,
) {
    for (kinematic, input, mut body) in query.iter_mut() {
        if input.direction.length_squared() > 0.01 {
            let direction = input.direction.normalize();
            body.velocity.x = direction.x * kinematic.move_speed;
            body.velocity.z = direction.z * kinematic.move_speed;
        } else {
            body.velocity.x = 0.0;
            body.velocity.z = 0.0;
        }
    }
}

/// Система: gravity, пока тело не на полу
pub fn apply_gravity(
    mut query: Query<(&KinematicBody, &mut PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (kinematic, mut body) in query.iter_mut() {
        if !kinematic.grounded {
            body.velocity.y += kinematic.gravity * delta;
        }
    }
}

/// Система: интеграция velocity → Transform (headless, без rapier step)
pub fn integrate_velocity_to_transform(
    mut query: Query<(&PhysicsBody, &mut Transform), With<KinematicBody>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        transform.translation += body.velocity * delta;
    }
}

/// Система: синхронизация нашей velocity в rapier Velocity.
///
/// Нужна адаптерам, где rapier step исполняет тела; headless — безвредный no-op.
pub fn sync_velocity_to_rapier(
    mut query: Query<(&PhysicsBody, &mut Velocity), With<KinematicBody>>,
) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// Plugin kinematic-контроллера
pub struct KinematicBodyPlugin;

impl Plugin for KinematicBodyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                ground_detection,
                apply_movement_input,
                apply_gravity,
                integrate_velocity_to_transform,
                sync_velocity_to_rapier,
            )
                .chain()
                .in_set(SimulationSet::Physics),
        );
    }
}
