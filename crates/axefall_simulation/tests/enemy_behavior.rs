//! Интеграционные тесты enemy FSM.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{LockedAxes, Sensor};

use axefall_simulation::*;

const TICK: f32 = 1.0 / 60.0;

/// Helper: app + игрок + враг на дистанции `distance` по X
fn setup_duel(distance: f32) -> (App, Entity, Entity) {
    let mut app = create_headless_app();
    let world = app.world_mut();
    let mut commands = world.commands();
    let player = spawn_player(&mut commands, Vec3::ZERO);
    let enemy = spawn_enemy(&mut commands, Vec3::new(distance, 0.0, 0.0));
    world.flush();
    world.entity_mut(enemy).insert(TrackTarget { target: player });
    (app, player, enemy)
}

fn tick_idle(app: &mut App, dt: f32) {
    app.world_mut().insert_resource(InputSnapshot::default());
    step_fixed(app, dt);
}

/// Helper: все animator-директивы, адресованные entity
fn animator_directives_for(app: &App, target: Entity) -> Vec<AnimatorDirective> {
    let events = app.world().resource::<Events<AnimatorDirective>>();
    events
        .get_cursor()
        .read(events)
        .filter(|directive| directive.target == target)
        .cloned()
        .collect()
}

#[test]
fn test_idle_without_target() {
    let mut app = create_headless_app();
    let world = app.world_mut();
    let mut commands = world.commands();
    let enemy = spawn_enemy(&mut commands, Vec3::new(3.0, 0.0, 0.0));
    world.flush();

    for _ in 0..10 {
        tick_idle(&mut app, TICK);
    }

    // Без цели слежения остаёмся в Idle и не трогаем nav
    assert_eq!(
        *app.world().get::<EnemyState>(enemy).unwrap(),
        EnemyState::Idle
    );
    assert_eq!(
        *app.world().get::<NavCommand>(enemy).unwrap(),
        NavCommand::Idle
    );
}

#[test]
fn test_chase_beyond_attack_distance() {
    let (mut app, _player, enemy) = setup_duel(2.1);

    tick_idle(&mut app, TICK);

    assert_eq!(
        *app.world().get::<EnemyState>(enemy).unwrap(),
        EnemyState::Attacking
    );
    assert_eq!(
        *app.world().get::<NavCommand>(enemy).unwrap(),
        NavCommand::MoveTo { target: Vec3::ZERO }
    );
    // Замах не начинается вне радиуса
    assert!(app.world().get::<ActiveSwing>(enemy).is_none());
}

#[test]
fn test_attack_within_distance() {
    let (mut app, _player, enemy) = setup_duel(1.9);

    tick_idle(&mut app, TICK);

    assert_eq!(
        *app.world().get::<NavCommand>(enemy).unwrap(),
        NavCommand::Stop
    );
    assert!(app.world().get::<ActiveSwing>(enemy).is_some());

    let directives = animator_directives_for(&app, enemy);
    assert!(directives.contains(&AnimatorDirective {
        target: enemy,
        op: AnimatorOp::SetFlag {
            name: "is_attacking",
            value: true,
        },
    }));
}

#[test]
fn test_swing_suppresses_move_commands() {
    let (mut app, player, enemy) = setup_duel(1.9);

    // Входим в радиус — начинается замах
    tick_idle(&mut app, TICK);
    assert!(app.world().get::<ActiveSwing>(enemy).is_some());

    // Цель телепортируется далеко, но замах ещё идёт
    app.world_mut()
        .get_mut::<Transform>(player)
        .unwrap()
        .translation = Vec3::new(6.0, 0.0, 0.0);

    tick_idle(&mut app, TICK);
    // Дистанция 4.1 > 2.0, но MoveTo не выдаётся до конца замаха
    assert_eq!(
        *app.world().get::<NavCommand>(enemy).unwrap(),
        NavCommand::Stop
    );

    // Замах 0.8s — дотикиваем до конца и одного тика сверху
    for _ in 0..50 {
        tick_idle(&mut app, TICK);
    }

    assert!(app.world().get::<ActiveSwing>(enemy).is_none());
    assert_eq!(
        *app.world().get::<NavCommand>(enemy).unwrap(),
        NavCommand::MoveTo {
            target: Vec3::new(6.0, 0.0, 0.0)
        }
    );
}

#[test]
fn test_struck_enemy_dies_once() {
    let (mut app, _player, enemy) = setup_duel(5.0);

    tick_idle(&mut app, TICK);

    app.world_mut().send_event(EnemyStruck {
        enemy,
        weapon: Entity::PLACEHOLDER,
        impact_point: Vec3::new(5.0, 1.0, 0.0),
    });
    tick_idle(&mut app, TICK);

    assert_eq!(
        *app.world().get::<EnemyState>(enemy).unwrap(),
        EnemyState::Dead
    );
    assert_eq!(
        *app.world().get::<NavCommand>(enemy).unwrap(),
        NavCommand::Stop
    );
    // Тело заморожено, коллайдер стал trigger-only
    assert!(app.world().get::<Sensor>(enemy).is_some());
    assert_eq!(
        *app.world().get::<LockedAxes>(enemy).unwrap(),
        LockedAxes::TRANSLATION_LOCKED | LockedAxes::ROTATION_LOCKED
    );
    assert_eq!(app.world().resource::<Events<EnemyDied>>().len(), 1);

    let mut effects = app.world_mut().query::<&EffectKind>();
    assert_eq!(effects.iter(app.world()).count(), 2);

    // Повторное попадание в мёртвого — ни эффектов, ни событий
    app.world_mut().send_event(EnemyStruck {
        enemy,
        weapon: Entity::PLACEHOLDER,
        impact_point: Vec3::new(5.0, 1.0, 0.0),
    });
    tick_idle(&mut app, TICK);

    assert_eq!(app.world().resource::<Events<EnemyDied>>().len(), 1);
    let mut effects = app.world_mut().query::<&EffectKind>();
    assert_eq!(effects.iter(app.world()).count(), 2);
}

#[test]
fn test_dead_is_terminal() {
    let (mut app, player, enemy) = setup_duel(1.5);

    tick_idle(&mut app, TICK);
    app.world_mut().send_event(EnemyStruck {
        enemy,
        weapon: Entity::PLACEHOLDER,
        impact_point: Vec3::new(1.5, 1.0, 0.0),
    });
    tick_idle(&mut app, TICK);
    assert_eq!(
        *app.world().get::<EnemyState>(enemy).unwrap(),
        EnemyState::Dead
    );

    let position = app.world().get::<Transform>(enemy).unwrap().translation;
    let directives_before = animator_directives_for(&app, enemy).len();

    // Цель рядом, цель далеко, новые попадания — мёртвый не реагирует
    app.world_mut()
        .get_mut::<Transform>(player)
        .unwrap()
        .translation = Vec3::new(10.0, 0.0, 0.0);
    for _ in 0..30 {
        tick_idle(&mut app, TICK);
    }
    app.world_mut().send_event(EnemyStruck {
        enemy,
        weapon: Entity::PLACEHOLDER,
        impact_point: Vec3::ZERO,
    });
    for _ in 0..30 {
        tick_idle(&mut app, TICK);
    }

    assert_eq!(
        *app.world().get::<EnemyState>(enemy).unwrap(),
        EnemyState::Dead
    );
    assert_eq!(
        app.world().get::<Transform>(enemy).unwrap().translation,
        position
    );
    assert_eq!(
        *app.world().get::<NavCommand>(enemy).unwrap(),
        NavCommand::Stop
    );
    assert_eq!(animator_directives_for(&app, enemy).len(), directives_before);
}

#[test]
fn test_death_effects_expire() {
    let (mut app, _player, enemy) = setup_duel(5.0);

    tick_idle(&mut app, TICK);
    app.world_mut().send_event(EnemyStruck {
        enemy,
        weapon: Entity::PLACEHOLDER,
        impact_point: Vec3::new(5.0, 1.0, 0.0),
    });
    tick_idle(&mut app, TICK);

    let mut effects = app.world_mut().query::<&EffectKind>();
    assert_eq!(effects.iter(app.world()).count(), 2);

    // Таймер жизни эффектов — 3s; прогоняем 3.2s
    for _ in 0..32 {
        tick_idle(&mut app, 0.1);
    }

    let mut effects = app.world_mut().query::<&EffectKind>();
    assert_eq!(effects.iter(app.world()).count(), 0);
}
