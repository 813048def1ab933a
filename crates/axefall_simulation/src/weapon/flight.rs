//! Flight state machine клинка.
//!
//! Контракт переходов:
//!
//! | Откуда | Событие | Guard | Куда |
//! |---|---|---|---|
//! | Held | бросок | владелец с оружием, живого экземпляра нет | Outbound |
//! | Outbound | контакт с препятствием | — | Collided |
//! | Outbound | контакт с врагом | — | Outbound (EnemyStruck, клинок летит дальше) |
//! | Outbound | контакт с владельцем | — | Outbound (no-op) |
//! | Outbound/Collided | запрос отзыва | — | Recalling |
//! | Recalling | контакт с владельцем | окно неуязвимости истекло | Returned |
//! | Recalling | контакт с владельцем | окно не истекло | Recalling (no-op) |
//!
//! Окно неуязвимости — время-базированный debounce: клинок спавнится
//! внутри коллайдера владельца, и без него первый же контакт читался бы
//! как "поймал". В Outbound страховка не нужна по построению: пока не
//! отзываем, контакт с владельцем вообще ничего не значит.
//!
//! Пока клинок Outbound, вертикаль и вращение заперты — траектория плоская
//! и предсказуемая. Collided снимает запреты: дальше телом владеет движок
//! (отскок, покой). Recalling держит только вращение: по вертикали клинок
//! должен вернуться на высоту руки.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, LockedAxes, RigidBody, Velocity};

use crate::components::ActorRole;
use crate::enemy::EnemyStruck;
use crate::engine::{ContactProbe, WeaponContact};
use crate::logger;
use crate::physics::collision;
use crate::player::WeaponSlot;

/// Скорость полёта (m/s), общая для броска и отзыва
pub const THROW_SPEED: f32 = 20.0;

/// Окно после запуска, в котором контакты с владельцем игнорируются (секунды)
pub const RECALL_IMMUNITY: f32 = 0.2;

/// Точка спавна: перед владельцем на высоте руки
const HAND_FORWARD: f32 = 0.8;
const HAND_HEIGHT: f32 = 1.2;

/// Якорь отзыва: над позицией владельца, на высоте руки
const RECALL_ANCHOR_HEIGHT: f32 = 1.0;

/// Состояния полёта
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum WeaponState {
    /// В руке владельца (экземпляр в мире в этом состоянии не живёт)
    Held,
    /// Летит от владельца, до удара
    Outbound,
    /// Ударился о мир; лежит под физикой движка
    Collided,
    /// Возвращается к владельцу
    Recalling,
    /// Пойман; entity уничтожается в этом же тике
    Returned,
}

impl Default for WeaponState {
    fn default() -> Self {
        Self::Held
    }
}

/// Данные брошенного экземпляра
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ThrownWeapon {
    /// Бросивший актор; ссылка не владеющая
    pub owner: Entity,
    pub speed: f32,
    /// Момент запуска на fixed-таймлайне
    pub launched_at: f32,
    pub recall_immunity: f32,
}

impl ThrownWeapon {
    /// Окно неуязвимости после запуска уже истекло
    pub fn immunity_elapsed(&self, now: f32) -> bool {
        now - self.launched_at >= self.recall_immunity
    }
}

/// Трейл полёта: горит в полёте, гаснет у лежащего клинка
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TrailEffect {
    pub active: bool,
}

/// Запрос отзыва клинка владельцу
#[derive(Event, Debug, Clone, Copy)]
pub struct RecallRequest {
    pub owner: Entity,
    pub weapon: Entity,
}

/// Событие: клинок брошен
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponThrown {
    pub owner: Entity,
    pub weapon: Entity,
}

/// Событие: клинок ударился о мир
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponCollided {
    pub weapon: Entity,
    pub obstacle: Entity,
    pub point: Vec3,
}

/// Событие: клинок пойман владельцем
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponReturned {
    pub owner: Entity,
    pub weapon: Entity,
}

/// Спавнит клинок в Outbound у руки владельца, лицом к точке прицеливания.
///
/// Вызывается из throw-оркестратора игрока; guard'ы владения — на стороне
/// вызывающего ([`WeaponSlot::can_throw`]).
pub fn launch_weapon(
    commands: &mut Commands,
    owner: Entity,
    owner_transform: &Transform,
    aim_point: Vec3,
    now: f32,
) -> Entity {
    let mut dir = aim_point - owner_transform.translation;
    dir.y = 0.0;
    let dir = if dir.length_squared() > 1e-6 {
        dir.normalize()
    } else {
        let fwd = owner_transform.forward();
        Vec3::new(fwd.x, 0.0, fwd.z).normalize_or_zero()
    };

    let spawn_pos =
        owner_transform.translation + dir * HAND_FORWARD + Vec3::Y * HAND_HEIGHT;

    let weapon = commands
        .spawn((
            Transform::from_translation(spawn_pos).looking_to(dir, Vec3::Y),
            WeaponState::Outbound,
            ThrownWeapon {
                owner,
                speed: THROW_SPEED,
                launched_at: now,
                recall_immunity: RECALL_IMMUNITY,
            },
            TrailEffect { active: true },
            ContactProbe::default(),
            RigidBody::KinematicPositionBased,
            Collider::cuboid(0.25, 0.08, 0.45),
            Velocity::default(),
            // Плоский полёт: вертикаль и вращение заперты до первого удара
            LockedAxes::TRANSLATION_LOCKED_Y | LockedAxes::ROTATION_LOCKED,
            collision::weapon_groups(),
        ))
        .id();

    logger::log(&format!(
        "Weapon {:?} launched by {:?} toward {:?}",
        weapon, owner, aim_point
    ));

    weapon
}

/// Система: интеграция полёта.
///
/// Outbound — прямолинейно вдоль носа со скоростью броска;
/// Recalling — по velocity, заданной отзывом;
/// Collided — телом владеет движок, ничего не делаем.
pub fn weapon_motion(
    mut weapons: Query<(&WeaponState, &ThrownWeapon, &Velocity, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (state, thrown, velocity, mut transform) in weapons.iter_mut() {
        match state {
            WeaponState::Outbound => {
                let step = transform.forward() * (thrown.speed * delta);
                transform.translation += step;
            }
            WeaponState::Recalling => {
                transform.translation += velocity.linvel * delta;
            }
            _ => {}
        }
    }
}

/// Система: запросы отзыва → Recalling.
///
/// Разрешён из Outbound и из Collided (лежащий клинок срывается с места).
/// Velocity задаётся один раз, к якорю на высоте руки владельца.
pub fn weapon_recall(
    mut recalls: EventReader<RecallRequest>,
    mut weapons: Query<(
        &mut WeaponState,
        &ThrownWeapon,
        &Transform,
        &mut Velocity,
        &mut TrailEffect,
        &mut LockedAxes,
    )>,
    owners: Query<&Transform>,
) {
    for recall in recalls.read() {
        let Ok((mut state, thrown, weapon_transform, mut velocity, mut trail, mut locks)) =
            weapons.get_mut(recall.weapon)
        else {
            continue;
        };

        if !matches!(*state, WeaponState::Outbound | WeaponState::Collided) {
            continue;
        }

        let Ok(owner_transform) = owners.get(thrown.owner) else {
            continue;
        };

        let anchor = owner_transform.translation + Vec3::Y * RECALL_ANCHOR_HEIGHT;
        let dir = (anchor - weapon_transform.translation).normalize_or_zero();

        velocity.linvel = dir * thrown.speed;
        // Вертикаль свободна — клинок должен подняться к руке; вращение держим
        *locks = LockedAxes::ROTATION_LOCKED;
        *state = WeaponState::Recalling;
        trail.active = true;

        logger::log(&format!(
            "Weapon {:?} recalling to {:?}",
            recall.weapon, thrown.owner
        ));
    }
}

/// Система: контакты → переходы FSM.
///
/// Враг "прозрачен" для полёта: контакт даёт EnemyStruck, но состояние
/// клинка не меняет. Владелец в Outbound игнорируется всегда; в Recalling —
/// до истечения окна неуязвимости.
pub fn weapon_contacts(
    mut commands: Commands,
    mut contacts: EventReader<WeaponContact>,
    mut weapons: Query<(
        &mut WeaponState,
        &ThrownWeapon,
        &mut TrailEffect,
        &mut LockedAxes,
    )>,
    roles: Query<&ActorRole>,
    mut slots: Query<&mut WeaponSlot>,
    time: Res<Time<Fixed>>,
    mut struck_events: EventWriter<EnemyStruck>,
    mut collided_events: EventWriter<WeaponCollided>,
    mut returned_events: EventWriter<WeaponReturned>,
) {
    let now = time.elapsed_secs();

    for contact in contacts.read() {
        let Ok((mut state, thrown, mut trail, mut locks)) = weapons.get_mut(contact.weapon)
        else {
            continue;
        };

        let role = roles.get(contact.other).ok().copied();

        if role == Some(ActorRole::Enemy) {
            // Живой экземпляр валит врага из любого состояния, включая лежащий
            if !matches!(*state, WeaponState::Held | WeaponState::Returned) {
                struck_events.write(EnemyStruck {
                    enemy: contact.other,
                    weapon: contact.weapon,
                    impact_point: contact.point,
                });
            }
            continue;
        }

        match *state {
            WeaponState::Outbound => {
                if contact.other == thrown.owner {
                    // Страховка от само-контакта у руки
                    continue;
                }

                *state = WeaponState::Collided;
                // Полный отклик физики: отскок и покой считает движок
                *locks = LockedAxes::empty();
                trail.active = false;

                collided_events.write(WeaponCollided {
                    weapon: contact.weapon,
                    obstacle: contact.other,
                    point: contact.point,
                });

                logger::log(&format!(
                    "Weapon {:?} collided with {:?}",
                    contact.weapon, contact.other
                ));
            }
            WeaponState::Recalling if contact.other == thrown.owner => {
                if !thrown.immunity_elapsed(now) {
                    // Ещё не вышли из коллайдера владельца — не "поймал"
                    continue;
                }

                *state = WeaponState::Returned;

                if let Ok(mut slot) = slots.get_mut(thrown.owner) {
                    slot.has_weapon = true;
                    slot.live = None;
                }

                returned_events.write(WeaponReturned {
                    owner: thrown.owner,
                    weapon: contact.weapon,
                });
                commands.entity(contact.weapon).despawn();

                logger::log_info(&format!(
                    "Weapon {:?} returned to {:?}",
                    contact.weapon, thrown.owner
                ));
            }
            _ => {}
        }
    }
}
