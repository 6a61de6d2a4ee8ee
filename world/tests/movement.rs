use std::time::Duration;

use rogue_grid_core::{
    ActorId, ActorKind, BlockingLayer, BoardLayout, Cell, Command, Event, GeneratedBoard,
    MoveRejection, OccupantCategory, OccupantId, Position, VariantId,
};
use rogue_grid_world::{self as world, query, World, DEFAULT_MOVE_TIME, DEFAULT_PLAYER_BLOCKING};

const FRAME: Duration = Duration::from_millis(16);

struct Fixture {
    world: World,
    player: ActorId,
    wall: OccupantId,
    food: OccupantId,
}

fn fixture() -> Fixture {
    let mut board = GeneratedBoard::with_frame(4, 5, 5, BoardLayout::Symmetric, |_| {
        VariantId::new(0)
    });
    let wall = board
        .place(OccupantCategory::InnerWall, Cell::new(1, 0), VariantId::new(2))
        .expect("wall placed");
    let food = board
        .place(OccupantCategory::Food, Cell::new(0, 1), VariantId::new(1))
        .expect("food placed");
    let _ = board
        .place(OccupantCategory::Enemy, Cell::new(2, 2), VariantId::new(0))
        .expect("enemy placed");
    let _ = board
        .place(OccupantCategory::Exit, Cell::new(4, 4), VariantId::new(0))
        .expect("exit placed");

    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadBoard {
            board: Box::new(board),
        },
        &mut events,
    );
    let player = query::player(&world).expect("player spawned");

    Fixture {
        world,
        player,
        wall,
        food,
    }
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn step(world: &mut World, actor: ActorId, dx: i32, dy: i32) -> Vec<Event> {
    apply(world, Command::AttemptMove { actor, dx, dy })
}

fn tick(world: &mut World) -> Vec<Event> {
    apply(world, Command::Tick { dt: FRAME })
}

fn settle(world: &mut World) {
    let _ = apply(
        world,
        Command::Tick {
            dt: Duration::from_secs(1),
        },
    );
}

fn configure(
    world: &mut World,
    player_blocking: &[OccupantCategory],
    enemy_blocking: &[OccupantCategory],
) {
    let events = apply(
        world,
        Command::ConfigureActors {
            move_time: DEFAULT_MOVE_TIME,
            player_blocking: BlockingLayer::from_categories(player_blocking),
            enemy_blocking: BlockingLayer::from_categories(enemy_blocking),
        },
    );
    assert!(events.is_empty());
}

fn enemy_of(world: &World) -> ActorId {
    query::actor_view(world)
        .iter()
        .find(|actor| actor.kind == ActorKind::Enemy)
        .map(|actor| actor.id)
        .expect("enemy spawned")
}

#[test]
fn unblocked_move_slides_onto_target() {
    let Fixture {
        mut world, player, ..
    } = fixture();

    let events = step(&mut world, player, 0, 1);
    assert_eq!(
        events,
        vec![Event::MoveStarted {
            actor: player,
            from: Cell::new(0, 0),
            to: Cell::new(0, 1)
        }]
    );
    assert!(query::actor(&world, player).expect("player").in_transit);

    let mut previous = 0.0_f32;
    let mut completed = Vec::new();
    for _ in 0..20 {
        let events = tick(&mut world);
        let snapshot = query::actor(&world, player).expect("player");
        assert!(snapshot.position.y >= previous, "trajectory reversed");
        assert!(snapshot.position.y <= 1.0, "trajectory overshot");
        assert_eq!(snapshot.position.x, 0.0);
        previous = snapshot.position.y;

        completed.extend(
            events
                .into_iter()
                .filter(|event| matches!(event, Event::MoveCompleted { .. })),
        );
        if !snapshot.in_transit {
            break;
        }
    }

    assert_eq!(
        completed,
        vec![Event::MoveCompleted {
            actor: player,
            cell: Cell::new(0, 1)
        }]
    );
    let snapshot = query::actor(&world, player).expect("player");
    assert_eq!(snapshot.position, Position::of_cell(Cell::new(0, 1)));
    assert_eq!(snapshot.cell, Cell::new(0, 1));
}

#[test]
fn blocked_move_reports_exactly_one_blocker() {
    let Fixture {
        mut world,
        player,
        wall,
        ..
    } = fixture();
    let before = query::actor(&world, player).expect("player");

    let events = step(&mut world, player, 1, 0);

    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::MoveBlocked {
            actor,
            kind,
            blocker,
        } => {
            assert_eq!(*actor, player);
            assert_eq!(*kind, ActorKind::Player);
            assert_eq!(blocker.id, wall);
            assert_eq!(blocker.category, OccupantCategory::InnerWall);
            assert_eq!(blocker.cell, Cell::new(1, 0));
            assert_eq!(blocker.variant, VariantId::new(2));
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let after = query::actor(&world, player).expect("player");
    assert_eq!(after, before);
}

#[test]
fn outer_wall_blocks_leaving_the_board() {
    let Fixture {
        mut world, player, ..
    } = fixture();

    let events = step(&mut world, player, -1, 0);
    match &events[..] {
        [Event::MoveBlocked { blocker, .. }] => {
            assert_eq!(blocker.category, OccupantCategory::OuterWall);
            assert_eq!(blocker.cell, Cell::new(-1, 0));
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn food_does_not_block_the_player() {
    let Fixture {
        mut world,
        player,
        food,
        ..
    } = fixture();
    assert!(!DEFAULT_PLAYER_BLOCKING.contains(OccupantCategory::Food));

    let events = step(&mut world, player, 0, 1);
    assert!(matches!(events[..], [Event::MoveStarted { .. }]));
    assert_eq!(
        query::category_at(&world, Cell::new(0, 1)),
        Some(OccupantCategory::Player)
    );
    assert!(query::static_occupants(&world)
        .iter()
        .any(|occupant| occupant.id == food));
}

#[test]
fn moves_during_transit_are_rejected_without_resetting() {
    let Fixture {
        mut world, player, ..
    } = fixture();

    let _ = step(&mut world, player, 0, 1);
    let _ = tick(&mut world);
    let midway = query::actor(&world, player).expect("player");
    assert!(midway.in_transit);

    let events = step(&mut world, player, 0, 1);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            actor: player,
            reason: MoveRejection::InTransit
        }]
    );
    assert_eq!(query::actor(&world, player).expect("player"), midway);

    let _ = tick(&mut world);
    let later = query::actor(&world, player).expect("player");
    assert!(later.position.y > midway.position.y);
    assert_eq!(later.cell, Cell::new(0, 1));
}

#[test]
fn diagonal_moves_are_invalid() {
    let Fixture {
        mut world, player, ..
    } = fixture();

    let events = step(&mut world, player, 1, 1);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            actor: player,
            reason: MoveRejection::InvalidDelta
        }]
    );
    assert!(!query::actor(&world, player).expect("player").in_transit);
}

#[test]
fn removing_a_wall_opens_the_path() {
    let Fixture {
        mut world,
        player,
        wall,
        ..
    } = fixture();

    let events = apply(&mut world, Command::RemoveOccupant { occupant: wall });
    match &events[..] {
        [Event::OccupantRemoved { occupant }] => assert_eq!(occupant.id, wall),
        other => panic!("unexpected events: {other:?}"),
    }

    let events = step(&mut world, player, 1, 0);
    assert!(matches!(events[..], [Event::MoveStarted { .. }]));
}

#[test]
fn enemies_are_blocked_by_the_player() {
    let Fixture {
        mut world, player, ..
    } = fixture();
    let enemy = enemy_of(&world);

    // Walk the player next to the enemy at (2, 2): (0,0) -> (0,1) -> (1,1) -> (1,2).
    for (dx, dy) in [(0, 1), (1, 0), (0, 1)] {
        let events = step(&mut world, player, dx, dy);
        assert!(matches!(events[..], [Event::MoveStarted { .. }]), "{events:?}");
        let _ = apply(&mut world, Command::CancelTransit { actor: player });
    }

    let events = step(&mut world, enemy, -1, 0);
    match &events[..] {
        [Event::MoveBlocked {
            actor,
            kind,
            blocker,
        }] => {
            assert_eq!(*actor, enemy);
            assert_eq!(*kind, ActorKind::Enemy);
            assert_eq!(blocker.category, OccupantCategory::Player);
            assert_eq!(blocker.cell, Cell::new(1, 2));
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn target_cell_is_claimed_when_the_move_starts() {
    let Fixture { mut world, .. } = fixture();
    let enemy = enemy_of(&world);

    let _ = step(&mut world, enemy, 0, -1);
    assert_eq!(
        query::category_at(&world, Cell::new(2, 1)),
        Some(OccupantCategory::Enemy)
    );
    assert_eq!(
        query::category_at(&world, Cell::new(2, 2)),
        Some(OccupantCategory::Floor)
    );
}

#[test]
fn cancel_snaps_to_target() {
    let Fixture {
        mut world, player, ..
    } = fixture();

    let _ = step(&mut world, player, 0, 1);
    let _ = tick(&mut world);
    let events = apply(&mut world, Command::CancelTransit { actor: player });

    assert_eq!(
        events,
        vec![Event::TransitCancelled {
            actor: player,
            cell: Cell::new(0, 1)
        }]
    );
    let snapshot = query::actor(&world, player).expect("player");
    assert!(!snapshot.in_transit);
    assert_eq!(snapshot.position, Position::of_cell(Cell::new(0, 1)));

    let events = apply(&mut world, Command::CancelTransit { actor: player });
    assert!(events.is_empty());
}

#[test]
fn despawning_mid_transit_frees_the_target() {
    let Fixture {
        mut world, player, ..
    } = fixture();

    let _ = step(&mut world, player, 0, 1);
    let events = apply(&mut world, Command::DespawnActor { actor: player });

    assert_eq!(
        events,
        vec![Event::ActorDespawned {
            actor: player,
            cell: Cell::new(0, 1)
        }]
    );
    assert!(query::actor(&world, player).is_none());
    assert_eq!(
        query::category_at(&world, Cell::new(0, 1)),
        Some(OccupantCategory::Food)
    );
    assert_eq!(query::player(&world), None);
}

#[test]
fn walkable_frame_still_ends_at_the_board_edge() {
    let Fixture {
        mut world, player, ..
    } = fixture();
    configure(&mut world, &[OccupantCategory::InnerWall], &[]);

    let events = step(&mut world, player, -1, 0);
    assert_eq!(
        events,
        vec![Event::MoveStarted {
            actor: player,
            from: Cell::new(0, 0),
            to: Cell::new(-1, 0)
        }]
    );
    settle(&mut world);

    let events = step(&mut world, player, -1, 0);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            actor: player,
            reason: MoveRejection::OutOfBounds
        }]
    );
    let snapshot = query::actor(&world, player).expect("player");
    assert_eq!(snapshot.cell, Cell::new(-1, 0));
    assert!(!snapshot.in_transit);

    let events = step(&mut world, player, 1, 0);
    assert!(matches!(events[..], [Event::MoveStarted { .. }]), "{events:?}");
    settle(&mut world);
    assert_eq!(
        query::category_at(&world, Cell::new(0, 0)),
        Some(OccupantCategory::Player)
    );
    assert_eq!(
        query::category_at(&world, Cell::new(-1, 0)),
        Some(OccupantCategory::OuterWall)
    );
}

#[test]
fn actors_block_each_other_without_actor_categories() {
    let Fixture {
        mut world, player, ..
    } = fixture();
    let enemy = enemy_of(&world);
    let player_occupant = query::actor(&world, player).expect("player").occupant;
    let enemy_occupant = query::actor(&world, enemy).expect("enemy").occupant;
    configure(
        &mut world,
        &[OccupantCategory::OuterWall],
        &[OccupantCategory::OuterWall],
    );

    // (0,0) -> (0,1) over the food -> (0,2) -> (1,2), beside the enemy at (2, 2).
    for (dx, dy) in [(0, 1), (0, 1), (1, 0)] {
        let events = step(&mut world, player, dx, dy);
        assert!(matches!(events[..], [Event::MoveStarted { .. }]), "{events:?}");
        settle(&mut world);
    }

    let events = step(&mut world, player, 1, 0);
    match &events[..] {
        [Event::MoveBlocked { blocker, .. }] => {
            assert_eq!(blocker.id, enemy_occupant);
            assert_eq!(blocker.cell, Cell::new(2, 2));
        }
        other => panic!("unexpected events: {other:?}"),
    }

    let events = step(&mut world, enemy, 0, 1);
    assert!(matches!(events[..], [Event::MoveStarted { .. }]), "{events:?}");
    settle(&mut world);

    let moved = query::occupant_at(&world, Cell::new(2, 3)).expect("enemy cell");
    assert_eq!(moved.id, enemy_occupant);
    assert_eq!(moved.category, OccupantCategory::Enemy);
    let stayed = query::occupant_at(&world, Cell::new(1, 2)).expect("player cell");
    assert_eq!(stayed.id, player_occupant);
    assert_eq!(
        query::category_at(&world, Cell::new(2, 2)),
        Some(OccupantCategory::Floor)
    );

    let events = step(&mut world, player, 1, 0);
    assert!(matches!(events[..], [Event::MoveStarted { .. }]), "{events:?}");
}

#[test]
fn wall_layer_choice_decides_what_blocks() {
    let Fixture {
        mut world, player, ..
    } = fixture();
    configure(&mut world, &[OccupantCategory::Food], &[]);

    let events = step(&mut world, player, 0, 1);
    match &events[..] {
        [Event::MoveBlocked { blocker, .. }] => {
            assert_eq!(blocker.category, OccupantCategory::Food);
        }
        other => panic!("unexpected events: {other:?}"),
    }

    let events = step(&mut world, player, 1, 0);
    assert!(matches!(events[..], [Event::MoveStarted { .. }]), "{events:?}");
}
