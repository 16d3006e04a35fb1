use std::time::Duration;

use pizza_brawl_core::{
    ActionCode, Actor, CellCoord, Command, Event, IngredientKind, RoundSummary, Vec2,
};
use pizza_brawl_world::{self as world, query, ArenaConfig, RoundPhase, World};

fn started(config: ArenaConfig) -> World {
    let mut world = World::new(config).expect("valid config");
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRound, &mut events);
    world
}

fn tick(world: &mut World, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        &mut events,
    );
    events
}

fn issue(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

#[test]
fn collect_craft_and_deliver_a_margherita() {
    let config = ArenaConfig {
        delivery_points: vec![CellCoord::new(11, 12)],
        ..ArenaConfig::default()
    };
    let mut world = started(config);
    for (kind, cell) in [
        (IngredientKind::Dough, CellCoord::new(9, 13)),
        (IngredientKind::Tomato, CellCoord::new(11, 13)),
        (IngredientKind::Cheese, CellCoord::new(10, 12)),
    ] {
        let events = issue(&mut world, Command::SpawnIngredient { kind, cell });
        assert!(matches!(events.as_slice(), [Event::IngredientSpawned { .. }]));
    }

    for _ in 0..3 {
        let _ = tick(&mut world, 100);
        let events = issue(&mut world, Command::PrimaryAction);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::IngredientCollected { actor: Actor::Player, .. })));
    }
    assert_eq!(query::active_ingredient_count(&world), 0);

    let _ = tick(&mut world, 100);
    let events = issue(&mut world, Command::PrimaryAction);
    let recipe = query::recipe_book(&world)
        .recipes()
        .iter()
        .find(|recipe| recipe.name == "Margherita")
        .expect("default book")
        .id;
    assert_eq!(
        events,
        vec![Event::RecipeCrafted {
            actor: Actor::Player,
            recipe,
            points: 100,
        }]
    );

    let _ = tick(&mut world, 100);
    let _ = issue(&mut world, Command::DeliverAction);

    let player = query::actor(&world, Actor::Player);
    assert_eq!(player.score, 100);
    assert_eq!(player.deliveries, 1);
    assert!(player.crafted.is_empty());
    assert!(player.inventory.is_empty());

    let log = query::move_log(&world);
    assert_eq!(log.len(), 4);
    let actions: Vec<ActionCode> = log.entries().iter().map(|entry| entry.action).collect();
    assert_eq!(
        actions,
        vec![
            ActionCode::Collect,
            ActionCode::Collect,
            ActionCode::Collect,
            ActionCode::Deliver,
        ]
    );
    assert!(log
        .entries()
        .windows(2)
        .all(|pair| pair[0].timestamp_ms < pair[1].timestamp_ms));
    assert!(log
        .entries()
        .iter()
        .all(|entry| (entry.column, entry.row) == (10, 13)));
}

#[test]
fn idle_round_ends_exactly_once() {
    let mut world = started(ArenaConfig::default());
    let mut summaries = Vec::new();
    let mut remaining = Vec::new();

    for _ in 0..130 {
        for event in tick(&mut world, 1_000) {
            match event {
                Event::ClockTicked { remaining: left, .. } => remaining.push(left),
                Event::RoundEnded { summary } => summaries.push(summary),
                _ => {}
            }
        }
    }

    assert_eq!(remaining.len(), 120);
    assert!(remaining.windows(2).all(|pair| pair[0] > pair[1]));
    assert_eq!(remaining.last(), Some(&0));
    assert_eq!(summaries.len(), 1);
    assert_eq!(
        summaries[0],
        RoundSummary {
            player_score: 0,
            player_deliveries: 0,
            bot_score: 0,
            bot_deliveries: 0,
            move_log: Default::default(),
        }
    );
    assert_eq!(query::phase(&world), RoundPhase::Ended);
}

#[test]
fn round_ends_on_the_tick_that_reaches_zero() {
    let mut world = started(ArenaConfig::default());
    for _ in 0..119 {
        let _ = tick(&mut world, 1_000);
    }
    assert_eq!(query::remaining_seconds(&world), 1);
    assert!(matches!(query::phase(&world), RoundPhase::Running));

    let events = tick(&mut world, 1_000);
    assert!(matches!(
        events.last(),
        Some(Event::RoundEnded { .. })
    ));
}

#[test]
fn nothing_mutates_after_the_round_ended() {
    let config = ArenaConfig {
        round_seconds: 1,
        delivery_points: vec![CellCoord::new(11, 13)],
        ..ArenaConfig::default()
    };
    let mut world = started(config);
    let _ = issue(
        &mut world,
        Command::Steer {
            actor: Actor::Player,
            intent: Vec2::X,
        },
    );
    let _ = tick(&mut world, 1_000);
    assert_eq!(query::phase(&world), RoundPhase::Ended);

    let player_before = query::actor(&world, Actor::Player);
    assert_eq!(player_before.velocity, Vec2::ZERO);

    let commands = vec![
        Command::StartRound,
        Command::SpawnIngredient {
            kind: IngredientKind::Dough,
            cell: CellCoord::new(10, 13),
        },
        Command::PrimaryAction,
        Command::DeliverAction,
        Command::Steer {
            actor: Actor::Player,
            intent: Vec2::Y,
        },
        Command::Tick {
            dt: Duration::from_secs(5),
        },
        Command::DropSabotageZone {
            at: Vec2::new(100.0, 100.0),
        },
        Command::BotCraft,
    ];
    for command in commands {
        assert!(issue(&mut world, command).is_empty());
    }

    assert_eq!(query::actor(&world, Actor::Player), player_before);
    assert_eq!(query::active_ingredient_count(&world), 0);
    assert!(query::sabotage_zones(&world).is_empty());
}

#[test]
fn collecting_into_a_full_inventory_is_rejected() {
    let mut world = started(ArenaConfig::default());
    for _ in 0..7 {
        let _ = issue(
            &mut world,
            Command::SpawnIngredient {
                kind: IngredientKind::Mushroom,
                cell: CellCoord::new(10, 13),
            },
        );
    }
    for _ in 0..6 {
        let _ = issue(&mut world, Command::PrimaryAction);
    }
    assert_eq!(query::actor(&world, Actor::Player).inventory.len(), 6);
    assert_eq!(query::active_ingredient_count(&world), 1);

    let events = issue(&mut world, Command::PrimaryAction);
    assert!(matches!(
        events.as_slice(),
        [Event::CollectRejected {
            actor: Actor::Player,
            ..
        }]
    ));
    assert_eq!(query::active_ingredient_count(&world), 1);
    assert_eq!(query::actor(&world, Actor::Player).inventory.len(), 6);
}

#[test]
fn actors_slide_along_walls_from_every_direction() {
    let map = ArenaConfig::default().tile_map();
    let speed = 160.0;
    let look_ahead = 16.0;

    let mut positions = Vec::new();
    for row in 1..14 {
        for column in 1..19 {
            let cell = CellCoord::new(column, row);
            if !map.is_walkable(cell) {
                continue;
            }
            let center = cell.center(40.0);
            for offset in [Vec2::ZERO, Vec2::new(14.0, -14.0), Vec2::new(-14.0, 14.0)] {
                positions.push(center + offset);
            }
        }
    }

    for position in positions {
        for step in 0..16 {
            let angle = step as f32 * std::f32::consts::TAU / 16.0;
            let intent = Vec2::new(angle.cos(), angle.sin());
            let velocity = world::resolve_velocity(position, intent, &map, speed, look_ahead);
            assert!(velocity.length() <= speed + 1e-3);
            if velocity.x != 0.0 {
                let probe = Vec2::new(position.x + look_ahead.copysign(velocity.x), position.y);
                assert!(map.is_walkable_at(probe), "x into wall at {position:?}");
            }
            if velocity.y != 0.0 {
                let probe = Vec2::new(position.x, position.y + look_ahead.copysign(velocity.y));
                assert!(map.is_walkable_at(probe), "y into wall at {position:?}");
            }
        }
    }
}

#[test]
fn steered_player_never_enters_a_wall() {
    let mut world = started(ArenaConfig::default());
    let intents = [
        Vec2::new(0.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(-1.0, -0.3),
        Vec2::new(1.0, 0.2),
    ];
    for intent in intents {
        let _ = issue(
            &mut world,
            Command::Steer {
                actor: Actor::Player,
                intent,
            },
        );
        for _ in 0..90 {
            let _ = tick(&mut world, 16);
            let position = query::actor(&world, Actor::Player).position;
            assert!(query::tile_map(&world).is_walkable_at(position));
        }
    }
}
