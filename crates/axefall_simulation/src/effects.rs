//! Косметические эффекты с ограниченным временем жизни.
//!
//! Эффект — отдельная entity с таймером: заспавнили в точке удара, движок
//! отрисовал, таймер истёк — despawn. Отмены нет, ссылок на эффект никто
//! не держит.

use bevy::prelude::*;

/// Таймер отложенного despawn
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    pub remaining: f32,
}

/// Вид эффекта (хост подбирает prefab по нему)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum EffectKind {
    Blood,
    Impact,
}

/// Spawn helper: пара эффектов смерти в точке удара
pub fn spawn_impact_burst(commands: &mut Commands, point: Vec3, lifetime: f32) {
    for kind in [EffectKind::Blood, EffectKind::Impact] {
        commands.spawn((
            Transform::from_translation(point),
            kind,
            DespawnAfter {
                remaining: lifetime,
            },
        ));
    }
}

/// Система: тикаем таймеры и убираем истёкшие эффекты
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut despawn) in query.iter_mut() {
        despawn.remaining -= delta;
        if despawn.remaining <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
