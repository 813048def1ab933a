//! Интеграционные тесты контроллера игрока: движение, instant-face,
//! guard'ы броска/отзыва, полный цикл бросок → возврат.

use bevy::prelude::*;

use axefall_simulation::*;

const TICK: f32 = 1.0 / 60.0;

fn setup() -> (App, Entity) {
    let mut app = create_headless_app();
    let world = app.world_mut();
    let mut commands = world.commands();
    let player = spawn_player(&mut commands, Vec3::ZERO);
    world.flush();
    (app, player)
}

fn tick_with(app: &mut App, input: InputSnapshot, dt: f32) {
    app.world_mut().insert_resource(input);
    step_fixed(app, dt);
}

fn tick_idle(app: &mut App, dt: f32) {
    tick_with(app, InputSnapshot::default(), dt);
}

fn forward_of(app: &App, entity: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(entity)
        .unwrap()
        .forward()
        .as_vec3()
}

fn trigger_count(app: &App, target: Entity, name: &str) -> usize {
    let events = app.world().resource::<Events<AnimatorDirective>>();
    events
        .get_cursor()
        .read(events)
        .filter(|directive| {
            directive.target == target
                && matches!(directive.op, AnimatorOp::Trigger { name: n } if n == name)
        })
        .count()
}

#[test]
fn test_camera_relative_movement() {
    let (mut app, player) = setup();

    let forward_input = InputSnapshot {
        move_axis: Vec2::new(0.0, 1.0),
        ..Default::default()
    };
    for _ in 0..60 {
        tick_with(&mut app, forward_input.clone(), TICK);
    }

    // 1 секунда при 5 m/s вдоль -Z (camera forward по умолчанию)
    let position = app.world().get::<Transform>(player).unwrap().translation;
    assert!(position.z < -4.5, "position = {position}");
    assert!(position.x.abs() < 1e-3);
}

#[test]
fn test_facing_smooths_toward_heading() {
    let (mut app, player) = setup();

    let strafe_input = InputSnapshot {
        move_axis: Vec2::new(1.0, 0.0),
        ..Default::default()
    };
    for _ in 0..30 {
        tick_with(&mut app, strafe_input.clone(), TICK);
    }

    // Полсекунды сглаживания при turn_speed 10 — почти довернулись к +X
    let forward = forward_of(&app, player);
    assert!(forward.x > 0.95, "forward = {forward}");
}

#[test]
fn test_instant_face_latest_wins() {
    let (mut app, player) = setup();

    // Нажатие: мгновенный снап на +X, сглаживание подавлено
    tick_with(
        &mut app,
        InputSnapshot {
            pointer_ground_hit: Some(Vec3::new(5.0, 0.0, 0.0)),
            primary_pressed: true,
            move_axis: Vec2::new(0.0, 1.0),
            ..Default::default()
        },
        TICK,
    );
    let forward = forward_of(&app, player);
    assert!(forward.x > 0.999, "snap was not instant: {forward}");
    assert_eq!(
        app.world().get::<PendingFaceResume>(player).unwrap().seq,
        1
    );

    // Движение -Z не сдвигает facing, пока висит override
    let run_input = InputSnapshot {
        move_axis: Vec2::new(0.0, 1.0),
        ..Default::default()
    };
    for _ in 0..5 {
        tick_with(&mut app, run_input.clone(), TICK);
    }
    assert!(forward_of(&app, player).x > 0.999);

    // Второе нажатие до deadline'а: последний seq выигрывает
    tick_with(
        &mut app,
        InputSnapshot {
            pointer_ground_hit: Some(Vec3::new(-5.0, 0.0, 0.0)),
            primary_pressed: true,
            ..Default::default()
        },
        TICK,
    );
    assert!(forward_of(&app, player).x < -0.999);
    assert_eq!(
        app.world().get::<PendingFaceResume>(player).unwrap().seq,
        2
    );

    // Deadline второго запроса истекает — сглаживание возвращается
    for _ in 0..25 {
        tick_idle(&mut app, TICK);
    }
    assert!(app.world().get::<PendingFaceResume>(player).is_none());

    // И теперь движение снова ведёт facing
    for _ in 0..30 {
        tick_with(&mut app, run_input.clone(), TICK);
    }
    assert!(forward_of(&app, player).z < -0.9);
}

#[test]
fn test_throw_rejected_without_weapon() {
    let (mut app, player) = setup();

    app.world_mut()
        .get_mut::<WeaponSlot>(player)
        .unwrap()
        .has_weapon = false;

    tick_with(
        &mut app,
        InputSnapshot {
            primary_released: true,
            ..Default::default()
        },
        TICK,
    );

    let mut weapons = app.world_mut().query::<&ThrownWeapon>();
    assert_eq!(weapons.iter(app.world()).count(), 0);
    assert_eq!(app.world().resource::<Events<WeaponThrown>>().len(), 0);
}

#[test]
fn test_recall_rejected_with_weapon_in_hand() {
    let (mut app, _player) = setup();

    tick_with(
        &mut app,
        InputSnapshot {
            recall_pressed: true,
            ..Default::default()
        },
        TICK,
    );

    assert_eq!(app.world().resource::<Events<RecallRequest>>().len(), 0);
}

#[test]
fn test_jump_only_from_ground() {
    let (mut app, player) = setup();

    // Приземляемся (ground check выставит grounded)
    tick_idle(&mut app, TICK);

    tick_with(
        &mut app,
        InputSnapshot {
            jump_pressed: true,
            ..Default::default()
        },
        TICK,
    );
    assert!(app.world().get::<PhysicsBody>(player).unwrap().velocity.y > 0.0);
    assert_eq!(trigger_count(&app, player, "jump"), 1);

    // В воздухе повторный прыжок не срабатывает
    tick_with(
        &mut app,
        InputSnapshot {
            jump_pressed: true,
            ..Default::default()
        },
        TICK,
    );
    assert_eq!(trigger_count(&app, player, "jump"), 1);

    // Подъём реально происходит
    for _ in 0..10 {
        tick_idle(&mut app, TICK);
    }
    assert!(app.world().get::<Transform>(player).unwrap().translation.y > 0.5);
}

#[test]
fn test_full_throw_strike_recall_cycle() {
    let (mut app, player) = setup();
    let world = app.world_mut();
    let mut commands = world.commands();
    let enemy = spawn_enemy(&mut commands, Vec3::new(0.0, 0.0, -5.0));
    spawn_obstacle(&mut commands, Vec3::new(0.0, 0.0, -10.0), 1.0);
    world.flush();
    world.entity_mut(enemy).insert(TrackTarget { target: player });

    // Бросок в сторону врага
    tick_with(
        &mut app,
        InputSnapshot {
            pointer_ground_hit: Some(Vec3::new(0.0, 0.0, -5.0)),
            primary_pressed: true,
            ..Default::default()
        },
        TICK,
    );
    tick_with(
        &mut app,
        InputSnapshot {
            pointer_ground_hit: Some(Vec3::new(0.0, 0.0, -5.0)),
            primary_released: true,
            ..Default::default()
        },
        TICK,
    );

    let weapon = app
        .world()
        .get::<WeaponSlot>(player)
        .unwrap()
        .live
        .expect("weapon in flight");
    assert!(!app.world().get::<WeaponSlot>(player).unwrap().has_weapon);

    // Полёт: враг умирает, клинок втыкается в стену
    for _ in 0..60 {
        tick_idle(&mut app, TICK);
    }
    assert_eq!(
        *app.world().get::<EnemyState>(enemy).unwrap(),
        EnemyState::Dead
    );
    assert_eq!(
        *app.world().get::<WeaponState>(weapon).unwrap(),
        WeaponState::Collided
    );

    // Отзыв и возврат в руку
    tick_with(
        &mut app,
        InputSnapshot {
            recall_pressed: true,
            ..Default::default()
        },
        TICK,
    );
    for _ in 0..120 {
        tick_idle(&mut app, TICK);
    }

    let slot = app.world().get::<WeaponSlot>(player).unwrap();
    assert!(slot.has_weapon);
    assert_eq!(slot.live, None);
    assert!(app.world().get_entity(weapon).is_err());
    assert_eq!(app.world().resource::<Events<WeaponReturned>>().len(), 1);
}
