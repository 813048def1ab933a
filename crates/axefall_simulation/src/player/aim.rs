//! Разрешение точки прицеливания из луча указателя.

use bevy::prelude::*;

use crate::engine::InputSnapshot;

/// Дистанция fallback-прицела, когда луч не пересекает ни мир, ни плоскость
pub const AIM_LOOK_AHEAD: f32 = 8.0;

/// Куда целится игрок.
///
/// Приоритет:
/// 1. raycast движка по геометрии мира (приходит в снимке ввода)
/// 2. пересечение луча с горизонтальной плоскостью на высоте игрока
/// 3. точка на фиксированной дистанции вдоль луча, прижатая к высоте игрока
pub fn resolve_pointer_target(input: &InputSnapshot, player_pos: Vec3) -> Vec3 {
    if let Some(hit) = input.pointer_ground_hit {
        return hit;
    }

    let origin = input.pointer.origin;
    let dir = input.pointer.dir.normalize_or_zero();

    if dir.y.abs() > 1e-4 {
        let t = (player_pos.y - origin.y) / dir.y;
        if t > 0.0 {
            return origin + dir * t;
        }
    }

    // Луч параллелен плоскости или уходит от неё
    let mut fallback = origin + dir * AIM_LOOK_AHEAD;
    fallback.y = player_pos.y;
    fallback
}
