//! Идентификация акторов на границе с движком

use bevy::prelude::*;

/// Роль актора в мире.
///
/// Явный маркер вместо числовых layer-индексов движка: системы сравнивают
/// роли, а не магические константы слоёв.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum ActorRole {
    /// Игрок (владелец клинка)
    Player,
    /// Враг — клинок проходит сквозь и валит его, не переходя в Collided
    Enemy,
    /// Статичная геометрия мира: стены, пол, препятствия
    Obstacle,
}
