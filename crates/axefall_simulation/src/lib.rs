//! AXEFALL Simulation Core
//!
//! ECS-симуляция gameplay-поведений на Bevy 0.16 (strategic layer):
//! - Enemy: погоня/атака по дистанции, смерть от брошенного клинка
//! - Player: camera-relative locomotion, instant-face прицеливание, бросок/отзыв
//! - Weapon: flight state machine (Outbound → Collided → Recalling → Returned)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (state machines, guards, transitions)
//! - Движок = tactical layer (рендер, анимация, navmesh, полная физика)
//!
//! Граница с движком — узкие интерфейсы: команды (NavCommand, AnimatorDirective),
//! зеркала состояния (NavAgentState), входящие события (WeaponContact, InputSnapshot).

use bevy::prelude::*;
use std::time::Duration;

// Публичные модули
pub mod components;
pub mod effects;
pub mod enemy;
pub mod engine;
pub mod logger;
pub mod physics;
pub mod player;
pub mod snapshot;
pub mod weapon;

// Re-export базовых типов для удобства
pub use components::ActorRole;
pub use effects::{DespawnAfter, EffectKind};
pub use enemy::{
    ActiveSwing, EnemyAi, EnemyDied, EnemyPlugin, EnemyState, EnemyStruck, TrackTarget,
    spawn_enemy,
};
pub use engine::{
    AnimatorDirective, AnimatorHandle, AnimatorOp, ContactProbe, ContactRadius,
    EngineBridgePlugin, InputSnapshot, NavAgentState, NavCommand, PointerRay, WeaponContact,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger,
    LogLevel, LogPrinter};
pub use physics::{
    KinematicBody, KinematicBodyPlugin, MovementInput, PhysicsBody, spawn_obstacle,
};
pub use player::{
    FacingController, PendingFaceResume, Player, PlayerPlugin, WeaponSlot, spawn_player,
};
pub use snapshot::{world_snapshot, EnemySnapshot, PlayerSnapshot, WeaponSnapshot, WorldSnapshot};
pub use weapon::{
    launch_weapon, RecallRequest, ThrownWeapon, TrailEffect, WeaponCollided, WeaponPlugin,
    WeaponReturned, WeaponState, WeaponThrown,
};

/// Порядок подсистем внутри одного fixed tick.
///
/// Кросс-актёрные эффекты (weapon → enemy, weapon → player) доставляются
/// событиями; фиксированный порядок сетов делает доставку детерминированной.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Input edges → команды игрока (движение, instant-face, бросок, отзыв)
    Player,
    /// Kinematic интеграция (gravity, velocity → transform)
    Physics,
    /// Полёт клинка, contact probe, обработка контактов
    Weapons,
    /// Enemy FSM и реакция на попадания
    Enemies,
    /// Таймеры эффектов, отложенный despawn
    Effects,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Player,
                    SimulationSet::Physics,
                    SimulationSet::Weapons,
                    SimulationSet::Enemies,
                    SimulationSet::Effects,
                )
                    .chain(),
            )
            .add_plugins((
                EngineBridgePlugin,
                PlayerPlugin,
                KinematicBodyPlugin,
                WeaponPlugin,
                EnemyPlugin,
            ))
            .add_systems(
                FixedUpdate,
                effects::despawn_after_timeout.in_set(SimulationSet::Effects),
            );
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin);

    app
}

/// Продвигает fixed-таймлайн на `dt` секунд и прогоняет один FixedUpdate.
///
/// `app.update()` привязывает FixedUpdate к реальному времени — для сценариев
/// с точными метками (окно неуязвимости отзыва, deadline instant-face) часы
/// двигаем вручную. Используется тестами и headless-демо.
pub fn step_fixed(app: &mut App, dt: f32) {
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(dt));
    app.world_mut().run_schedule(FixedUpdate);
}
