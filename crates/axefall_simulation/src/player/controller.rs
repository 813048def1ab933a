//! Locomotion и разворот игрока.
//!
//! Разворот двухрежимный: обычно facing плавно догоняет направление движения;
//! instant-face (см. throw.rs) ставит поворот мгновенно и подавляет
//! сглаживание до deadline'а, чтобы прицел не "уплывал" под ногами.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, RigidBody, Velocity};

use crate::components::ActorRole;
use crate::engine::{
    AnimatorDirective, AnimatorHandle, AnimatorOp, ContactRadius, InputSnapshot, FLAG_RUNNING,
    TRIGGER_JUMP,
};
use crate::logger;
use crate::physics::collision;
use crate::physics::{KinematicBody, MovementInput, PhysicsBody};

/// Marker component для player-controlled entity
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Параметры разворота + счётчик instant-face запросов.
///
/// `face_seq` монотонно растёт с каждым instant-face; отложенный возврат
/// сглаживания применяется только если его seq всё ещё последний.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FacingController {
    /// Скорость сглаженного разворота (slerp-факторов в секунду)
    pub turn_speed: f32,
    pub face_seq: u64,
}

impl Default for FacingController {
    fn default() -> Self {
        Self {
            turn_speed: 10.0,
            face_seq: 0,
        }
    }
}

/// Отложенный возврат сглаживания после instant-face.
///
/// Кооперативный таймер: insert заменяет предыдущий, так что живёт только
/// последний запрос. Seq-token сверяется при срабатывании — устаревший
/// deadline никогда не применяется.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PendingFaceResume {
    pub seq: u64,
    pub resume_at: f32,
}

/// Слот клинка: эксклюзивное владение единственным экземпляром.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WeaponSlot {
    /// Клинок в руке
    pub has_weapon: bool,
    /// Живой брошенный экземпляр (если есть)
    pub live: Option<Entity>,
}

impl Default for WeaponSlot {
    fn default() -> Self {
        Self {
            has_weapon: true,
            live: None,
        }
    }
}

impl WeaponSlot {
    /// Бросок разрешён: клинок в руке и живого экземпляра нет
    pub fn can_throw(&self) -> bool {
        self.has_weapon && self.live.is_none()
    }

    /// Отзыв разрешён: руки пусты, экземпляр в мире
    pub fn can_recall(&self) -> bool {
        !self.has_weapon && self.live.is_some()
    }
}

/// Кватернион "смотреть вдоль dir" (горизонтально)
pub(crate) fn facing_rotation(dir: Vec3) -> Quat {
    Transform::default().looking_to(dir, Vec3::Y).rotation
}

/// Система: снимок ввода → направление движения + running-флаг
pub fn player_movement(
    input: Res<InputSnapshot>,
    mut players: Query<(Entity, &mut MovementInput), With<Player>>,
    animators: Query<(), With<AnimatorHandle>>,
    mut animator_events: EventWriter<AnimatorDirective>,
) {
    let direction = input.planar_direction();

    for (entity, mut movement) in players.iter_mut() {
        movement.direction = direction;

        if animators.contains(entity) {
            animator_events.write(AnimatorDirective {
                target: entity,
                op: AnimatorOp::SetFlag {
                    name: FLAG_RUNNING,
                    value: direction != Vec3::ZERO,
                },
            });
        }
    }
}

/// Система: сглаженный разворот к направлению движения.
///
/// Подавляется, пока висит PendingFaceResume (instant-face активен).
pub fn player_facing(
    time: Res<Time<Fixed>>,
    mut players: Query<
        (
            &mut Transform,
            &FacingController,
            &MovementInput,
            Option<&PendingFaceResume>,
        ),
        With<Player>,
    >,
) {
    let delta = time.delta_secs();

    for (mut transform, facing, movement, pending) in players.iter_mut() {
        if pending.is_some() {
            continue;
        }

        let mut dir = movement.direction;
        dir.y = 0.0;
        if dir.length_squared() < 1e-4 {
            continue;
        }

        let target = facing_rotation(dir);
        transform.rotation = transform
            .rotation
            .slerp(target, (facing.turn_speed * delta).min(1.0));
    }
}

/// Система: deadline возврата сглаживания.
///
/// Применяется только совпадающий seq — устаревший таймер не может
/// затереть более новый instant-face.
pub fn resume_facing_smoothing(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    players: Query<(Entity, &FacingController, &PendingFaceResume)>,
) {
    let now = time.elapsed_secs();

    for (entity, facing, pending) in players.iter() {
        if pending.seq == facing.face_seq && now >= pending.resume_at {
            commands.entity(entity).remove::<PendingFaceResume>();
        }
    }
}

/// Система: прыжок с земли
pub fn player_jump(
    input: Res<InputSnapshot>,
    mut players: Query<(Entity, &mut PhysicsBody, &mut KinematicBody), With<Player>>,
    animators: Query<(), With<AnimatorHandle>>,
    mut animator_events: EventWriter<AnimatorDirective>,
) {
    if !input.jump_pressed {
        return;
    }

    for (entity, mut body, mut kinematic) in players.iter_mut() {
        if !kinematic.grounded {
            continue;
        }

        body.velocity.y = kinematic.jump_impulse;
        kinematic.grounded = false;

        if animators.contains(entity) {
            animator_events.write(AnimatorDirective {
                target: entity,
                op: AnimatorOp::Trigger { name: TRIGGER_JUMP },
            });
        }

        logger::log(&format!("Player {:?} jumped", entity));
    }
}

/// Spawn helper: игрок с полным набором компонентов
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Player,
            ActorRole::Player,
            PhysicsBody::default(),
            KinematicBody::default(),
            MovementInput::default(),
            FacingController::default(),
            WeaponSlot::default(),
            AnimatorHandle,
            ContactRadius(0.5),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.4),
            Velocity::default(),
            collision::role_groups(ActorRole::Player),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_guards() {
        let held = WeaponSlot::default();
        assert!(held.can_throw());
        assert!(!held.can_recall());

        let in_flight = WeaponSlot {
            has_weapon: false,
            live: Some(Entity::PLACEHOLDER),
        };
        assert!(!in_flight.can_throw());
        assert!(in_flight.can_recall());

        // Рассинхрон (рука пуста, экземпляра нет) не разрешает ничего
        let empty = WeaponSlot {
            has_weapon: false,
            live: None,
        };
        assert!(!empty.can_throw());
        assert!(!empty.can_recall());
    }

    #[test]
    fn test_facing_rotation_points_along_dir() {
        let rotation = facing_rotation(Vec3::X);
        let forward = rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::X).length() < 1e-5, "forward = {forward}");
    }

    #[test]
    fn test_stale_seq_never_resumes() {
        let facing = FacingController {
            face_seq: 3,
            ..Default::default()
        };
        let stale = PendingFaceResume {
            seq: 2,
            resume_at: 0.0,
        };

        // Проверка, которой руководствуется resume_facing_smoothing
        assert_ne!(stale.seq, facing.face_seq);
    }
}
