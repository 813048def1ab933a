//! Per-tick снимок ввода от хоста.
//!
//! Хост заполняет resource целиком каждый тик (edge-флаги живут один тик).
//! Для headless тестов — mock input через этот же resource.

use bevy::prelude::*;

/// Луч от камеры через позицию указателя
#[derive(Debug, Clone, Copy, Reflect)]
pub struct PointerRay {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Default for PointerRay {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            dir: Vec3::NEG_Z,
        }
    }
}

/// Снимок состояния ввода на текущий тик
#[derive(Resource, Debug, Clone)]
pub struct InputSnapshot {
    /// Комбинация зажатых directional-клавиш: x = strafe, y = forward
    pub move_axis: Vec2,
    /// Планарный базис камеры (подаёт хост; Y-компонента отбрасывается здесь)
    pub camera_forward: Vec3,
    pub camera_right: Vec3,
    /// Луч указателя от камеры
    pub pointer: PointerRay,
    /// Результат raycast указателя по геометрии мира (None = мимо)
    pub pointer_ground_hit: Option<Vec3>,
    /// Edge-события: нажато/отпущено именно в этот тик
    pub primary_pressed: bool,
    pub primary_released: bool,
    pub recall_pressed: bool,
    pub jump_pressed: bool,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            move_axis: Vec2::ZERO,
            camera_forward: Vec3::NEG_Z,
            camera_right: Vec3::X,
            pointer: PointerRay::default(),
            pointer_ground_hit: None,
            primary_pressed: false,
            primary_released: false,
            recall_pressed: false,
            jump_pressed: false,
        }
    }
}

impl InputSnapshot {
    /// Camera-relative направление движения в горизонтальной плоскости
    pub fn planar_direction(&self) -> Vec3 {
        let forward = planar(self.camera_forward);
        let right = planar(self.camera_right);
        (right * self.move_axis.x + forward * self.move_axis.y).normalize_or_zero()
    }
}

fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}
