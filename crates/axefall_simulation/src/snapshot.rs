//! Read-only снимки состояния для наблюдаемости.
//!
//! Вместо мутабельных публичных debug-полей хост (и тесты детерминизма)
//! получают сериализуемый снимок мира. Сбор сортирован по Entity ID,
//! чтобы два одинаковых прогона давали побайтно одинаковый результат.

use bevy::prelude::*;
use serde::Serialize;

use crate::enemy::{ActiveSwing, EnemyState, TrackTarget};
use crate::physics::KinematicBody;
use crate::player::{Player, WeaponSlot};
use crate::weapon::{ThrownWeapon, TrailEffect, WeaponState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub entity: u32,
    pub position: [f32; 3],
    pub yaw: f32,
    pub grounded: bool,
    pub has_weapon: bool,
    pub live_weapon: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemySnapshot {
    pub entity: u32,
    pub state: String,
    pub position: [f32; 3],
    /// Дистанция до цели слежения (None — цели нет или она пропала)
    pub distance_to_target: Option<f32>,
    pub swinging: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponSnapshot {
    pub entity: u32,
    pub state: String,
    pub position: [f32; 3],
    pub owner: u32,
    pub trail_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub players: Vec<PlayerSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
    pub weapons: Vec<WeaponSnapshot>,
}

/// Снимок всех акторов симуляции
pub fn world_snapshot(world: &mut World) -> WorldSnapshot {
    let mut players = Vec::new();
    {
        let mut query = world
            .query_filtered::<(Entity, &Transform, &WeaponSlot, &KinematicBody), With<Player>>();
        let mut rows: Vec<_> = query
            .iter(world)
            .map(|(entity, transform, slot, kinematic)| {
                (entity, *transform, slot.clone(), *kinematic)
            })
            .collect();
        rows.sort_by_key(|(entity, ..)| entity.index());

        for (entity, transform, slot, kinematic) in rows {
            players.push(PlayerSnapshot {
                entity: entity.index(),
                position: transform.translation.to_array(),
                yaw: transform.rotation.to_euler(EulerRot::YXZ).0,
                grounded: kinematic.grounded,
                has_weapon: slot.has_weapon,
                live_weapon: slot.live.map(|weapon| weapon.index()),
            });
        }
    }

    let mut enemies = Vec::new();
    {
        let mut query = world.query::<(
            Entity,
            &Transform,
            &EnemyState,
            Option<&TrackTarget>,
            Option<&ActiveSwing>,
        )>();
        let mut rows: Vec<_> = query
            .iter(world)
            .map(|(entity, transform, state, track, swing)| {
                (
                    entity,
                    *transform,
                    *state,
                    track.map(|t| t.target),
                    swing.is_some(),
                )
            })
            .collect();
        rows.sort_by_key(|(entity, ..)| entity.index());

        for (entity, transform, state, target, swinging) in rows {
            let distance_to_target = target
                .and_then(|target| world.get::<Transform>(target))
                .map(|target_transform| {
                    transform.translation.distance(target_transform.translation)
                });

            enemies.push(EnemySnapshot {
                entity: entity.index(),
                state: format!("{:?}", state),
                position: transform.translation.to_array(),
                distance_to_target,
                swinging,
            });
        }
    }

    let mut weapons = Vec::new();
    {
        let mut query =
            world.query::<(Entity, &Transform, &WeaponState, &ThrownWeapon, &TrailEffect)>();
        let mut rows: Vec<_> = query
            .iter(world)
            .map(|(entity, transform, state, thrown, trail)| {
                (entity, *transform, *state, *thrown, *trail)
            })
            .collect();
        rows.sort_by_key(|(entity, ..)| entity.index());

        for (entity, transform, state, thrown, trail) in rows {
            weapons.push(WeaponSnapshot {
                entity: entity.index(),
                state: format!("{:?}", state),
                position: transform.translation.to_array(),
                owner: thrown.owner.index(),
                trail_active: trail.active,
            });
        }
    }

    WorldSnapshot {
        players,
        enemies,
        weapons,
    }
}
