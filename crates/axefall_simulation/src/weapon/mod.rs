//! Throwable/recallable weapon module.
//!
//! Flight FSM клинка: Held → Outbound → Collided → Recalling → Returned.
//! Контакты приходят событиями (движок или headless probe), решения о
//! переходах целиком здесь.

use bevy::prelude::*;

pub mod flight;

pub use flight::{
    launch_weapon, weapon_contacts, weapon_motion, weapon_recall, RecallRequest, ThrownWeapon,
    TrailEffect, WeaponCollided, WeaponReturned, WeaponState, WeaponThrown,
};

use crate::engine::contacts::weapon_contact_probe;
use crate::SimulationSet;

/// Weapon Plugin.
///
/// Порядок выполнения:
/// 1. weapon_recall — запросы отзыва (до движения: развернуться в этот же тик)
/// 2. weapon_motion — интеграция полёта
/// 3. weapon_contact_probe — headless контакты по новой позиции
/// 4. weapon_contacts — переходы FSM по контактам
pub struct WeaponPlugin;

impl Plugin for WeaponPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RecallRequest>()
            .add_event::<WeaponThrown>()
            .add_event::<WeaponCollided>()
            .add_event::<WeaponReturned>();

        app.add_systems(
            FixedUpdate,
            (
                flight::weapon_recall,
                flight::weapon_motion,
                weapon_contact_probe,
                flight::weapon_contacts,
            )
                .chain()
                .in_set(SimulationSet::Weapons),
        );
    }
}
