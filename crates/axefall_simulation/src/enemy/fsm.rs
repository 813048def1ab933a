//! Enemy FSM: дистанционно-управляемая атака и одноразовая смерть.
//!
//! Конечный автомат:
//! Idle → Attacking (появилась цель) → Dead (попадание клинка, терминальное)
//!
//! Решение погоня/удар — чистая функция от дистанции: distance ≤ attack_distance
//! значит стоим и бьём, иначе гоним nav-агента к цели. Незаконченный замах
//! не прерываем движением, даже если цель вышла из радиуса.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{LockedAxes, Sensor};

use crate::components::ActorRole;
use crate::effects::spawn_impact_burst;
use crate::engine::{
    AnimatorDirective, AnimatorHandle, AnimatorOp, ContactRadius, NavAgentState, NavCommand,
    FLAG_ATTACKING, FLAG_RUNNING, TRIGGER_DEATH,
};
use crate::logger;
use crate::physics::collision;
use crate::physics::PhysicsBody;
use bevy_rapier3d::prelude::{Collider, RigidBody, Velocity};

/// Состояния enemy FSM
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum EnemyState {
    /// Ждём цель, ничего не делаем
    Idle,
    /// Гонимся за целью / бьём в радиусе
    Attacking,
    /// Терминальное: никаких дальнейших мутаций позиции, анимации, коллизий
    Dead,
}

impl Default for EnemyState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Параметры enemy AI
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct EnemyAi {
    /// Радиус, внутри которого бьём вместо погони (метры)
    pub attack_distance: f32,
    /// Скорость nav-агента (m/s), адаптер переносит в агент при spawn'е
    pub move_speed: f32,
    /// Длительность одного замаха (секунды)
    pub swing_duration: f32,
    /// Время жизни эффектов смерти (секунды)
    pub effect_lifetime: f32,
}

impl Default for EnemyAi {
    fn default() -> Self {
        Self {
            attack_distance: 2.0,
            move_speed: 3.5,
            swing_duration: 0.8,
            effect_lifetime: 3.0,
        }
    }
}

impl EnemyAi {
    /// Цель в радиусе удара
    pub fn in_attack_range(&self, distance: f32) -> bool {
        distance <= self.attack_distance
    }
}

/// Цель слежения (обычно игрок). Появление компонента запускает Attacking.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TrackTarget {
    pub target: Entity,
}

/// Идущий замах. Пока он есть, новые MoveTo не выдаются —
/// удар нельзя прервать бегом.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ActiveSwing {
    pub remaining: f32,
}

/// Событие: в enemy попал клинок
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyStruck {
    pub enemy: Entity,
    pub weapon: Entity,
    pub impact_point: Vec3,
}

/// Событие: enemy умер (для счётчиков, UI хоста)
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyDied {
    pub enemy: Entity,
}

/// Система: Idle → Attacking, когда появилась цель слежения
pub fn enemy_acquire_target(
    mut enemies: Query<(Entity, &mut EnemyState), With<TrackTarget>>,
) {
    for (entity, mut state) in enemies.iter_mut() {
        if *state == EnemyState::Idle {
            logger::log(&format!("Enemy {:?} Idle → Attacking", entity));
            *state = EnemyState::Attacking;
        }
    }
}

/// Система: дистанционный выбор погоня/удар.
///
/// Каждый тик в Attacking пересчитываем дистанцию до цели:
/// - в радиусе — NavCommand::Stop, флаг атаки, старт замаха если свободны
/// - вне радиуса — NavCommand::MoveTo к цели, если замах не идёт
///
/// Каждый опциональный коллаборатор (nav, agent-зеркало, animator) проверяется
/// отдельно: отсутствие — молчаливый no-op.
pub fn enemy_chase_or_attack(
    mut commands: Commands,
    mut enemies: Query<(
        Entity,
        &Transform,
        &EnemyAi,
        &EnemyState,
        &TrackTarget,
        Option<&mut NavCommand>,
        Option<&NavAgentState>,
        Option<&ActiveSwing>,
    )>,
    targets: Query<&Transform>,
    animators: Query<(), With<AnimatorHandle>>,
    mut animator_events: EventWriter<AnimatorDirective>,
) {
    for (entity, transform, ai, state, track, nav, agent, swing) in enemies.iter_mut() {
        if *state != EnemyState::Attacking {
            continue;
        }

        // Цель пропала из мира — слежение молча замирает
        let Ok(target_transform) = targets.get(track.target) else {
            continue;
        };

        let distance = transform
            .translation
            .distance(target_transform.translation);
        let in_range = ai.in_attack_range(distance);
        let running = agent.map(|a| a.is_moving()).unwrap_or(false) && !in_range;

        if let Some(mut nav) = nav {
            if in_range {
                // Держим позицию, пока цель в радиусе удара
                if *nav != NavCommand::Stop {
                    *nav = NavCommand::Stop;
                }
            } else if swing.is_none() {
                *nav = NavCommand::MoveTo {
                    target: target_transform.translation,
                };
            }
            // Вне радиуса при идущем замахе команд не выдаём
        }

        if in_range && swing.is_none() {
            commands.entity(entity).insert(ActiveSwing {
                remaining: ai.swing_duration,
            });
        }

        if animators.contains(entity) {
            animator_events.write(AnimatorDirective {
                target: entity,
                op: AnimatorOp::SetFlag {
                    name: FLAG_RUNNING,
                    value: running,
                },
            });
            animator_events.write(AnimatorDirective {
                target: entity,
                op: AnimatorOp::SetFlag {
                    name: FLAG_ATTACKING,
                    value: in_range,
                },
            });
        }
    }
}

/// Система: таймеры замаха
pub fn tick_active_swings(
    mut commands: Commands,
    mut swings: Query<(Entity, &mut ActiveSwing)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut swing) in swings.iter_mut() {
        swing.remaining -= delta;
        if swing.remaining <= 0.0 {
            commands.entity(entity).remove::<ActiveSwing>();
        }
    }
}

/// Система: попадание клинка → смерть.
///
/// Одноразовый переход, идемпотентность гарантирует Dead-guard: повторные
/// попадания в мёртвого не дают ни эффектов, ни мутаций.
pub fn enemy_struck(
    mut commands: Commands,
    mut strikes: EventReader<EnemyStruck>,
    mut enemies: Query<(
        &mut EnemyState,
        &EnemyAi,
        Option<&mut NavCommand>,
        Option<&mut PhysicsBody>,
    )>,
    animators: Query<(), With<AnimatorHandle>>,
    mut animator_events: EventWriter<AnimatorDirective>,
    mut died_events: EventWriter<EnemyDied>,
) {
    for strike in strikes.read() {
        let Ok((mut state, ai, nav, body)) = enemies.get_mut(strike.enemy) else {
            continue;
        };
        if *state == EnemyState::Dead {
            continue;
        }

        // Эффекты в точке удара, самоуничтожение по таймеру
        spawn_impact_burst(&mut commands, strike.impact_point, ai.effect_lifetime);

        *state = EnemyState::Dead;

        if let Some(mut nav) = nav {
            *nav = NavCommand::Stop;
        }
        if let Some(mut body) = body {
            body.velocity = Vec3::ZERO;
        }

        // Замораживаем тело; коллайдер становится trigger-only, чтобы труп
        // не мешал дальнейшим physics-запросам
        commands
            .entity(strike.enemy)
            .remove::<ActiveSwing>()
            .insert(LockedAxes::TRANSLATION_LOCKED | LockedAxes::ROTATION_LOCKED)
            .insert(Sensor);

        if animators.contains(strike.enemy) {
            animator_events.write(AnimatorDirective {
                target: strike.enemy,
                op: AnimatorOp::SetFlag {
                    name: FLAG_RUNNING,
                    value: false,
                },
            });
            animator_events.write(AnimatorDirective {
                target: strike.enemy,
                op: AnimatorOp::SetFlag {
                    name: FLAG_ATTACKING,
                    value: false,
                },
            });
            animator_events.write(AnimatorDirective {
                target: strike.enemy,
                op: AnimatorOp::Trigger {
                    name: TRIGGER_DEATH,
                },
            });
        }

        died_events.write(EnemyDied {
            enemy: strike.enemy,
        });

        logger::log_info(&format!(
            "Enemy {:?} killed by weapon {:?} at {:?}",
            strike.enemy, strike.weapon, strike.impact_point
        ));
    }
}

/// Spawn helper: enemy с полным набором компонентов
pub fn spawn_enemy(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            ActorRole::Enemy,
            EnemyState::default(),
            EnemyAi::default(),
            NavCommand::default(),
            NavAgentState::default(),
            AnimatorHandle,
            ContactRadius(0.5),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.4),
            Velocity::default(),
            collision::role_groups(ActorRole::Enemy),
        ))
        .id()
}
