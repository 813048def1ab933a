//! Оркестрация прицеливания, броска и отзыва.
//!
//! Нажатие — instant-face на точку прицеливания; отпускание — бросок с
//! пере-семплированной точкой; вторичная кнопка — запрос отзыва. Все guard'ы
//! владения — в [`WeaponSlot`]; отказ всегда молчаливый no-op.

use bevy::prelude::*;

use crate::engine::{
    AnimatorDirective, AnimatorHandle, AnimatorOp, InputSnapshot, TRIGGER_THROW,
};
use crate::logger;
use crate::player::aim::resolve_pointer_target;
use crate::player::controller::{
    facing_rotation, FacingController, PendingFaceResume, Player, WeaponSlot,
};
use crate::weapon::{launch_weapon, RecallRequest, WeaponThrown};

/// Пауза перед возвратом сглаженного разворота после instant-face (секунды)
pub const FACE_RESUME_DELAY: f32 = 0.35;

/// Система: нажатие → instant-face.
///
/// Поворот ставится синхронно, мимо сглаживания; сглаживание вернётся по
/// deadline'у — если до того не случится новый запрос (последний seq
/// выигрывает).
pub fn player_aim_press(
    input: Res<InputSnapshot>,
    time: Res<Time<Fixed>>,
    mut commands: Commands,
    mut players: Query<(Entity, &mut Transform, &mut FacingController), With<Player>>,
) {
    if !input.primary_pressed {
        return;
    }

    let now = time.elapsed_secs();

    for (entity, mut transform, mut facing) in players.iter_mut() {
        let aim_point = resolve_pointer_target(&input, transform.translation);

        let mut dir = aim_point - transform.translation;
        dir.y = 0.0;
        if dir.length_squared() < 1e-6 {
            continue;
        }

        transform.rotation = facing_rotation(dir.normalize());
        facing.face_seq += 1;

        commands.entity(entity).insert(PendingFaceResume {
            seq: facing.face_seq,
            resume_at: now + FACE_RESUME_DELAY,
        });

        logger::log(&format!(
            "Player {:?} instant-face #{} toward {:?}",
            entity, facing.face_seq, aim_point
        ));
    }
}

/// Система: отпускание → бросок.
///
/// Точка прицеливания семплируется заново (указатель мог уехать с момента
/// нажатия). Бросок при занятом слоте отклоняется без изменений состояния.
pub fn player_throw(
    input: Res<InputSnapshot>,
    time: Res<Time<Fixed>>,
    mut commands: Commands,
    mut players: Query<(Entity, &Transform, &mut WeaponSlot), With<Player>>,
    animators: Query<(), With<AnimatorHandle>>,
    mut animator_events: EventWriter<AnimatorDirective>,
    mut thrown_events: EventWriter<WeaponThrown>,
) {
    if !input.primary_released {
        return;
    }

    let now = time.elapsed_secs();

    for (owner, transform, mut slot) in players.iter_mut() {
        if !slot.can_throw() {
            logger::log(&format!("Player {:?} throw rejected (slot busy)", owner));
            continue;
        }

        let aim_point = resolve_pointer_target(&input, transform.translation);
        let weapon = launch_weapon(&mut commands, owner, transform, aim_point, now);

        slot.has_weapon = false;
        slot.live = Some(weapon);

        thrown_events.write(WeaponThrown { owner, weapon });

        if animators.contains(owner) {
            animator_events.write(AnimatorDirective {
                target: owner,
                op: AnimatorOp::Trigger {
                    name: TRIGGER_THROW,
                },
            });
        }
    }
}

/// Система: вторичная кнопка → запрос отзыва
pub fn player_recall(
    input: Res<InputSnapshot>,
    players: Query<(Entity, &WeaponSlot), With<Player>>,
    mut recall_events: EventWriter<RecallRequest>,
) {
    if !input.recall_pressed {
        return;
    }

    for (owner, slot) in players.iter() {
        if !slot.can_recall() {
            continue;
        }
        let Some(weapon) = slot.live else {
            continue;
        };

        recall_events.write(RecallRequest { owner, weapon });
    }
}
