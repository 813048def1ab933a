//! Контакты клинка: входящее событие от движка + headless contact probe.
//!
//! В игре collision detection принадлежит движку: он шлёт [`WeaponContact`]
//! из своего physics step. В headless режиме ту же роль играет
//! [`weapon_contact_probe`] — дистанционная проверка перекрытий, как замена
//! полноценным коллайдерам (адаптер с реальной физикой просто не вешает
//! [`ContactProbe`] на клинок).

use bevy::prelude::*;

use crate::components::ActorRole;

/// Радиус тела для probe-перекрытий (у акторов и препятствий)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ContactRadius(pub f32);

pub const DEFAULT_BODY_RADIUS: f32 = 0.5;

/// Вертикальное окно перекрытия: тела считаем столбиками высоты ~человека,
/// позиция — у ног
const PROBE_HEIGHT_WINDOW: f32 = 1.5;

/// Событие: клинок коснулся другого тела (движок или probe)
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponContact {
    pub weapon: Entity,
    pub other: Entity,
    /// Точка удара в мировых координатах (для эффектов)
    pub point: Vec3,
}

/// Headless-детектор контактов на клинке.
///
/// Enter-edge семантика: событие только при входе в перекрытие, пока тела
/// не разойдутся — повторных контактов нет. Это повторяет trigger-поведение
/// коллайдеров движка.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ContactProbe {
    pub radius: f32,
    /// Тела, с которыми перекрытие уже зарегистрировано
    pub touching: Vec<Entity>,
}

impl Default for ContactProbe {
    fn default() -> Self {
        Self {
            radius: 0.6,
            touching: Vec::new(),
        }
    }
}

/// Система: перекрытия probe → WeaponContact события
pub fn weapon_contact_probe(
    mut probes: Query<(Entity, &Transform, &mut ContactProbe)>,
    bodies: Query<(Entity, &Transform, &ActorRole, Option<&ContactRadius>)>,
    mut contacts: EventWriter<WeaponContact>,
) {
    for (weapon, weapon_transform, mut probe) in probes.iter_mut() {
        let mut now_touching = Vec::new();

        for (other, other_transform, _role, radius) in bodies.iter() {
            if other == weapon {
                continue;
            }

            let body_radius = radius.map(|r| r.0).unwrap_or(DEFAULT_BODY_RADIUS);
            let delta = weapon_transform.translation - other_transform.translation;
            let planar = Vec3::new(delta.x, 0.0, delta.z);

            if planar.length() > probe.radius + body_radius {
                continue;
            }
            if delta.y.abs() > PROBE_HEIGHT_WINDOW {
                continue;
            }

            now_touching.push(other);

            if !probe.touching.contains(&other) {
                // Точка удара — поверхность тела со стороны клинка, на высоте клинка
                let mut point =
                    other_transform.translation + planar.normalize_or_zero() * body_radius;
                point.y = weapon_transform.translation.y;
                contacts.write(WeaponContact {
                    weapon,
                    other,
                    point,
                });
            }
        }

        probe.touching = now_touching;
    }
}
