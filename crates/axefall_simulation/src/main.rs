//! Headless сценарий AXEFALL
//!
//! Полный цикл без рендера: игрок бросает клинок во врага, клинок проходит
//! сквозь (враг умирает), втыкается в стену, отзыв возвращает его в руку.

use bevy::prelude::*;
use axefall_simulation::*;

const TICK: f32 = 1.0 / 60.0;

fn main() {
    let mut app = create_headless_app();
    // Прогреваем schedule до ручных тиков
    app.finish();
    app.cleanup();

    // Сцена: игрок в origin, враг в 6m впереди, стена в 12m
    let world = app.world_mut();
    let mut commands = world.commands();
    let player = spawn_player(&mut commands, Vec3::ZERO);
    let enemy = spawn_enemy(&mut commands, Vec3::new(0.0, 0.0, -6.0));
    spawn_obstacle(&mut commands, Vec3::new(0.0, 0.0, -12.0), 1.0);
    world.flush();
    world.entity_mut(enemy).insert(TrackTarget { target: player });

    println!("AXEFALL headless scenario: throw → strike → recall → return");

    // Несколько тиков ожидания
    run_ticks(&mut app, 10, InputSnapshot::default());

    // Прицел в сторону врага: нажатие (instant-face), затем отпускание (бросок)
    let aim = InputSnapshot {
        pointer_ground_hit: Some(Vec3::new(0.0, 0.0, -6.0)),
        primary_pressed: true,
        ..Default::default()
    };
    run_ticks(&mut app, 1, aim);

    let release = InputSnapshot {
        pointer_ground_hit: Some(Vec3::new(0.0, 0.0, -6.0)),
        primary_released: true,
        ..Default::default()
    };
    run_ticks(&mut app, 1, release);

    // Полёт до стены (12m при 20 m/s — меньше секунды)
    run_ticks(&mut app, 60, InputSnapshot::default());
    report(&mut app, "after flight");

    // Отзыв
    let recall = InputSnapshot {
        recall_pressed: true,
        ..Default::default()
    };
    run_ticks(&mut app, 1, recall);

    // Возврат в руку
    run_ticks(&mut app, 90, InputSnapshot::default());
    report(&mut app, "after recall");

    println!("Scenario complete");
}

fn run_ticks(app: &mut App, ticks: usize, input: InputSnapshot) {
    for _ in 0..ticks {
        app.world_mut().insert_resource(input.clone());
        step_fixed(app, TICK);
    }
}

fn report(app: &mut App, label: &str) {
    let snapshot = world_snapshot(app.world_mut());
    println!("--- {} ---", label);
    for player in &snapshot.players {
        println!(
            "player #{}: has_weapon={} live={:?}",
            player.entity, player.has_weapon, player.live_weapon
        );
    }
    for enemy in &snapshot.enemies {
        println!(
            "enemy #{}: {} (distance {:?})",
            enemy.entity, enemy.state, enemy.distance_to_target
        );
    }
    for weapon in &snapshot.weapons {
        println!(
            "weapon #{}: {} at {:?}",
            weapon.entity, weapon.state, weapon.position
        );
    }
}
