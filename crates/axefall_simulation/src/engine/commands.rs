//! Команды симуляции движку: pathfinding и animation sink.

use bevy::prelude::*;

// Имена animator-параметров, общие для player и enemy контроллеров
pub const FLAG_RUNNING: &str = "is_running";
pub const FLAG_ATTACKING: &str = "is_attacking";
pub const TRIGGER_DEATH: &str = "death";
pub const TRIGGER_JUMP: &str = "jump";
pub const TRIGGER_THROW: &str = "throw";

/// Команда pathfinding-сервису.
///
/// Симуляция пишет, адаптер движка читает и гоняет navmesh-агента.
/// Зеркало состояния агента приходит обратно в [`NavAgentState`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum NavCommand {
    /// Нет активной команды
    Idle,
    /// Двигаться к точке мира
    MoveTo { target: Vec3 },
    /// Остановиться немедленно (держим позицию)
    Stop,
}

impl Default for NavCommand {
    fn default() -> Self {
        Self::Idle
    }
}

/// Read-only зеркало navmesh-агента, заполняется адаптером движка.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct NavAgentState {
    /// Текущая скорость агента (m/s)
    pub velocity: Vec3,
    /// Агент остановлен (достиг цели или получил Stop)
    pub is_stopped: bool,
}

impl NavAgentState {
    /// Агент фактически движется (порог отсекает дрожание navmesh-агента)
    pub fn is_moving(&self) -> bool {
        self.velocity.length_squared() > 0.1
    }
}

/// Маркер: на entity навешен animation driver движка.
///
/// Без маркера animator-директивы для entity не пишутся вовсе.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AnimatorHandle;

/// Директива animation-driver'у. Fire-and-forget: подтверждений нет,
/// потерянная директива стоит только косметики.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AnimatorDirective {
    pub target: Entity,
    pub op: AnimatorOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorOp {
    /// Выставить boolean-параметр (is_running, is_attacking)
    SetFlag { name: &'static str, value: bool },
    /// Одноразовый trigger (death, jump, throw)
    Trigger { name: &'static str },
}
