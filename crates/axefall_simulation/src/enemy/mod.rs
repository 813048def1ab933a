//! Enemy behavior module.
//!
//! FSM: Idle → Attacking → Dead (терминальное).
//! Движение делегируется pathfinding-сервису через NavCommand,
//! анимация — fire-and-forget директивами.

use bevy::prelude::*;

pub mod fsm;

pub use fsm::{
    enemy_acquire_target, enemy_chase_or_attack, enemy_struck, spawn_enemy, tick_active_swings,
    ActiveSwing, EnemyAi, EnemyDied, EnemyState, EnemyStruck, TrackTarget,
};

use crate::SimulationSet;

/// Enemy Plugin.
///
/// Порядок выполнения:
/// 1. enemy_acquire_target — Idle → Attacking при появлении цели
/// 2. enemy_struck — попадания клинка (смерть раньше решений этого тика)
/// 3. enemy_chase_or_attack — дистанционный выбор: погоня или удар
/// 4. tick_active_swings — таймеры замаха
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyStruck>().add_event::<EnemyDied>();

        app.add_systems(
            FixedUpdate,
            (
                fsm::enemy_acquire_target,
                fsm::enemy_struck,
                fsm::enemy_chase_or_attack,
                fsm::tick_active_swings,
            )
                .chain()
                .in_set(SimulationSet::Enemies),
        );
    }
}
