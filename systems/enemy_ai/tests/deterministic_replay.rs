use std::time::Duration;

use squad_tactics_core::{Command, Event, Phase, WorldConfig};
use squad_tactics_system_enemy_ai::EnemyAi;
use squad_tactics_world::{self as world, query, World};

#[test]
fn same_seed_replays_identically() {
    let first = replay(1337);
    let second = replay(1337);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::ShotResolved { .. })));
    assert!(first.iter().any(|event| matches!(
        event,
        Event::PhaseChanged {
            phase: Phase::Player,
            turn: 4,
        }
    )));
}

fn replay(seed: u64) -> Vec<Event> {
    let mut world = World::with_config(WorldConfig {
        seed,
        ..WorldConfig::default()
    })
    .expect("demo configuration is valid");
    let mut ai = EnemyAi::new(&query::rules(&world).enemy);
    let mut log = Vec::new();

    for _ in 0..3 {
        for command in squad_script(&world) {
            execute(&mut world, &mut ai, command, &mut log);
        }
        execute(&mut world, &mut ai, Command::EndPlayerTurn, &mut log);
        for _ in 0..400 {
            if query::phase(&world) == Phase::Player {
                break;
            }
            execute(
                &mut world,
                &mut ai,
                Command::Tick {
                    dt: Duration::from_millis(40),
                },
                &mut log,
            );
        }
    }

    log
}

/// Every unit shoots the first enemy it can see, otherwise it takes overwatch.
fn squad_script(world: &World) -> Vec<Command> {
    let enemies = query::enemy_view(world);
    query::unit_view(world)
        .iter()
        .map(|unit| {
            let target = enemies
                .iter()
                .find(|enemy| query::shot_chances(world, unit.id, enemy.id).is_some());
            match target {
                Some(enemy) if unit.ammo > 0 => Command::Fire {
                    unit: unit.id,
                    target: enemy.id,
                },
                _ if unit.ammo == 0 => Command::Reload { unit: unit.id },
                _ => Command::SetOverwatch { unit: unit.id },
            }
        })
        .collect()
}

fn execute(world: &mut World, ai: &mut EnemyAi, command: Command, log: &mut Vec<Event>) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    while !events.is_empty() {
        log.extend(events.iter().cloned());
        let units = query::unit_view(world);
        let enemies = query::enemy_view(world);
        let terrain = query::terrain_view(world);
        let occupancy = query::occupancy_view(world);
        let mut commands = Vec::new();
        ai.handle(
            &events,
            &units,
            &enemies,
            query::bounds(world),
            |cell| !terrain.passable(cell) || !occupancy.is_free(cell),
            &mut commands,
        );

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}
