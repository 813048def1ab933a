//! Граница с хост-движком.
//!
//! Архитектура (Command/Event):
//! - Симуляция пишет команды ([`NavCommand`], события [`AnimatorDirective`]),
//!   движок читает и исполняет (navmesh, animation tree).
//! - Движок пишет зеркала состояния ([`NavAgentState`]) и входящие события
//!   ([`WeaponContact`], resource [`InputSnapshot`]), симуляция читает.
//!
//! Каждый коллаборатор опционален: отсутствие компонента на entity — это
//! "feature absent", молчаливый no-op, никогда не ошибка.

use bevy::prelude::*;

pub mod commands;
pub mod contacts;
pub mod input;

pub use commands::{
    AnimatorDirective, AnimatorHandle, AnimatorOp, NavAgentState, NavCommand, FLAG_ATTACKING,
    FLAG_RUNNING, TRIGGER_DEATH, TRIGGER_JUMP, TRIGGER_THROW,
};
pub use contacts::{ContactProbe, ContactRadius, WeaponContact};
pub use input::{InputSnapshot, PointerRay};

/// Регистрирует ресурсы и события границы с движком
pub struct EngineBridgePlugin;

impl Plugin for EngineBridgePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputSnapshot>()
            .add_event::<AnimatorDirective>()
            .add_event::<WeaponContact>();
    }
}
