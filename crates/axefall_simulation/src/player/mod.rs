//! Player control module.
//!
//! Camera-relative locomotion, сглаженный разворот с instant-face
//! переопределением, оркестрация броска/отзыва клинка.

use bevy::prelude::*;

pub mod aim;
pub mod controller;
pub mod throw;

pub use aim::resolve_pointer_target;
pub use controller::{
    spawn_player, FacingController, PendingFaceResume, Player, WeaponSlot,
};
pub use throw::{player_aim_press, player_recall, player_throw};

use crate::SimulationSet;

/// Player Plugin.
///
/// Порядок выполнения:
/// 1. player_aim_press — instant-face по нажатию (до сглаживания)
/// 2. player_movement — input → MovementInput
/// 3. player_facing — сглаженный разворот к направлению движения
/// 4. resume_facing_smoothing — deadline возврата сглаживания
/// 5. player_jump — прыжок с земли
/// 6. player_throw — бросок по отпусканию
/// 7. player_recall — отзыв по вторичной кнопке
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                throw::player_aim_press,
                controller::player_movement,
                controller::player_facing,
                controller::resume_facing_smoothing,
                controller::player_jump,
                throw::player_throw,
                throw::player_recall,
            )
                .chain()
                .in_set(SimulationSet::Player),
        );
    }
}
