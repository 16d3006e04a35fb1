use std::time::Duration;

use pizza_brawl_core::{Actor, CellCoord, Command, Event, IngredientKind, Vec2};
use pizza_brawl_system_controls::{ControlInput, Controls};
use pizza_brawl_world::{self as world, query, ArenaConfig, World};

fn drive(
    world: &mut World,
    controls: &mut Controls,
    events: &[Event],
    input: ControlInput,
) -> Vec<Event> {
    let mut commands = Vec::new();
    controls.handle(events, input, &mut commands);
    let mut emitted = Vec::new();
    for command in commands {
        world::apply(world, command, &mut emitted);
    }
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(16),
        },
        &mut emitted,
    );
    emitted
}

#[test]
fn pulses_collect_and_steering_moves_the_player() {
    let mut world = World::new(ArenaConfig::default()).expect("valid config");
    let mut controls = Controls::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRound, &mut events);
    world::apply(
        &mut world,
        Command::SpawnIngredient {
            kind: IngredientKind::Tomato,
            cell: CellCoord::new(10, 13),
        },
        &mut events,
    );

    let events = drive(
        &mut world,
        &mut controls,
        &events,
        ControlInput::new(Vec2::ZERO, true, false),
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::IngredientCollected { .. })));

    let start = query::actor(&world, Actor::Player).position;
    let mut events = events;
    for _ in 0..10 {
        events = drive(
            &mut world,
            &mut controls,
            &events,
            ControlInput::new(Vec2::new(-1.0, 0.0), false, false),
        );
    }
    let end = query::actor(&world, Actor::Player).position;
    assert!(end.x < start.x);
    assert_eq!(end.y, start.y);
}

#[test]
fn input_after_round_end_is_dropped() {
    let config = ArenaConfig {
        round_seconds: 1,
        ..ArenaConfig::default()
    };
    let mut world = World::new(config).expect("valid config");
    let mut controls = Controls::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRound, &mut events);
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        &mut events,
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::RoundEnded { .. })));

    let mut commands = Vec::new();
    controls.handle(
        &events,
        ControlInput::new(Vec2::X, true, true),
        &mut commands,
    );
    assert!(commands.is_empty());
}
