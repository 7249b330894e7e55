//! End-to-end runs through the public engine API.

use lane_hopper::audio::SoundEffect;
use lane_hopper::consts::{MAX_FRAME_MS, NOMINAL_FRAME_MS};
use lane_hopper::sim::crossing::{advance_crossing, train_speed};
use lane_hopper::sim::{
    CrossingPhase, CrossingState, DeathCause, Direction, GameEvent, GameState, Heading, Item,
    ItemKind, Lane, LaneKind, ModeState, Obstacle, ObstacleKind, PowerUpKind, RunOutcome,
    TickInput, Vehicle, tick,
};
use lane_hopper::session::{RunRequest, Session};
use lane_hopper::{HighScores, Profile, Tuning, Wallet};

fn flat(seed: u64, mode: ModeState) -> GameState {
    let mut state = GameState::new(seed, mode, Tuning::default());
    for lane in state.lanes.iter_mut() {
        *lane = Lane::grass(lane.id);
    }
    state
}

fn idle(state: &mut GameState, frames: usize) {
    for _ in 0..frames {
        tick(state, &TickInput::default(), NOMINAL_FRAME_MS);
    }
}

/// Press a direction and let the jump land
fn hop(state: &mut GameState, direction: Direction) -> bool {
    let accepted = state.handle_directional_input(direction);
    idle(state, 10);
    accepted
}

fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn four_hops_through_the_safe_zone() {
    let mut state = GameState::new(77, ModeState::Classic, Tuning::default());
    // Lanes 0-3 are generated safe; make the landing lane quiet too
    *state.lane_mut(4).unwrap() = Lane::grass(4);

    for _ in 0..4 {
        assert!(hop(&mut state, Direction::Up));
    }
    assert_eq!(state.player.row, 4);
    assert_eq!(state.score(), 4);
    assert!(!state.is_over());
}

#[test]
fn gamble_pays_stake_times_multiplier() {
    let mut state = flat(5, ModeState::gamble(100));
    for _ in 0..5 {
        assert!(hop(&mut state, Direction::Up));
    }
    assert!((state.gamble_multiplier().unwrap() - 1.5).abs() < 1e-6);

    let outcome = tick(
        &mut state,
        &TickInput {
            cash_out: true,
            ..Default::default()
        },
        NOMINAL_FRAME_MS,
    );
    assert!(outcome);
    assert_eq!(state.outcome, Some(RunOutcome::CashedOut { winnings: 150 }));
}

#[test]
fn gamble_session_debits_then_credits() {
    let mut session = Session::new(Profile::new(), HighScores::new(), Tuning::default());
    session
        .start_run(RunRequest::Gamble { stake: 100 }, 5)
        .unwrap();
    assert_eq!(session.wallet().balance(), 0);

    let mut cues: Vec<SoundEffect> = Vec::new();
    assert_eq!(session.cash_out(&mut cues), Ok(100));
    assert_eq!(session.wallet().balance(), 100);
    assert_eq!(cues, vec![SoundEffect::Cashout]);
}

#[test]
fn revisiting_rows_does_not_raise_the_multiplier() {
    let mut state = flat(5, ModeState::gamble(100));
    hop(&mut state, Direction::Up);
    hop(&mut state, Direction::Up);
    hop(&mut state, Direction::Down);
    hop(&mut state, Direction::Up);
    assert_eq!(state.gamble_payout(), Some(120));
}

#[test]
fn survival_floor_overtakes_idle_player() {
    let mut state = flat(8, ModeState::survival());
    let mut frames = 0;
    while !state.is_over() && frames < 1_000 {
        tick(&mut state, &TickInput::default(), MAX_FRAME_MS);
        frames += 1;
    }
    assert_eq!(state.outcome, Some(RunOutcome::Died(DeathCause::Void)));
    // 0.5 rows at 0.35 rows/s
    assert!(state.run_time > 1.4 && state.run_time < 1.6, "{}", state.run_time);
    let events = state.drain_events();
    assert_eq!(count(&events, |e| matches!(e, GameEvent::ShieldAbsorbed { .. })), 0);
}

#[test]
fn shield_cannot_save_from_the_void() {
    let mut state = flat(8, ModeState::survival());
    state.effects.hold(PowerUpKind::Shield);
    assert!(state.handle_activate_held_power_up());
    for _ in 0..1_000 {
        tick(&mut state, &TickInput::default(), MAX_FRAME_MS);
    }
    assert_eq!(state.outcome, Some(RunOutcome::Died(DeathCause::Void)));
}

fn make_rail(state: &mut GameState, row: u32, first_idle: f32) {
    let tuning = state.tuning.clone();
    let lane = state.lane_mut(row).unwrap();
    lane.kind = LaneKind::Rail;
    lane.heading = Some(Heading::Right);
    lane.speed = Some(train_speed(&tuning));
    lane.crossing = Some(CrossingState {
        phase: CrossingPhase::Idle,
        timer: first_idle,
    });
}

#[test]
fn crossing_warns_then_spawns_one_train() {
    let mut state = flat(3, ModeState::Classic);
    make_rail(&mut state, 5, 1.0);
    let tuning = state.tuning.clone();
    let mut events = Vec::new();

    let step = |state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>| {
        let lane = state.lanes.iter_mut().find(|l| l.id == 5).unwrap();
        advance_crossing(lane, dt, &tuning, &mut state.rng, &mut state.ids, events);
    };

    step(&mut state, 1.0, &mut events);
    assert_eq!(events, vec![GameEvent::CrossingWarning { lane: 5 }]);
    assert_eq!(state.lane(5).unwrap().crossing.unwrap().phase, CrossingPhase::Warning);

    step(&mut state, 1.5, &mut events);
    assert_eq!(state.lane(5).unwrap().crossing.unwrap().phase, CrossingPhase::Warning);
    assert!(state.lane(5).unwrap().obstacles.is_empty());

    step(&mut state, 0.5, &mut events);
    let lane = state.lane(5).unwrap();
    assert_eq!(lane.crossing.unwrap().phase, CrossingPhase::Passing);
    assert_eq!(lane.obstacles.len(), 1);
    assert_eq!(lane.obstacles[0].kind, ObstacleKind::Train);
    assert_eq!(events.last(), Some(&GameEvent::TrainPassing { lane: 5 }));
}

#[test]
fn train_runs_over_a_player_on_the_tracks() {
    let mut state = flat(3, ModeState::Classic);
    make_rail(&mut state, 5, 0.5);
    state.player.row = 5;

    let mut frames = 0;
    while !state.is_over() && frames < 600 {
        tick(&mut state, &TickInput::default(), NOMINAL_FRAME_MS);
        frames += 1;
    }
    assert_eq!(state.outcome, Some(RunOutcome::Died(DeathCause::Train)));
    let events = state.drain_events();
    assert_eq!(count(&events, |e| matches!(e, GameEvent::CrossingWarning { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::TrainPassing { .. })), 1);
}

fn parked_car(state: &mut GameState, row: u32) {
    let lane = state.lane_mut(row).unwrap();
    lane.kind = LaneKind::Road;
    lane.speed = Some(0.0);
    lane.heading = Some(Heading::Right);
    // Centre 6.5, right on top of the player
    lane.obstacles.push(Obstacle {
        id: 999,
        position: 5.5,
        kind: ObstacleKind::Car(Vehicle::Sedan),
        width: 2.0,
        heading: Heading::Right,
        speed: 0.0,
    });
}

#[test]
fn shield_absorbs_exactly_one_hit() {
    let mut state = flat(4, ModeState::Classic);
    parked_car(&mut state, 0);
    state.effects.hold(PowerUpKind::Shield);
    assert!(state.handle_activate_held_power_up());

    tick(&mut state, &TickInput::default(), NOMINAL_FRAME_MS);
    assert!(!state.is_over());
    assert!(state.effects.active.is_none());

    tick(&mut state, &TickInput::default(), NOMINAL_FRAME_MS);
    assert_eq!(state.outcome, Some(RunOutcome::Died(DeathCause::Car)));

    let events = state.drain_events();
    assert_eq!(count(&events, |e| matches!(e, GameEvent::ShieldAbsorbed { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::Died { .. })), 1);
}

#[test]
fn time_slow_halves_hazards_and_lengthens_jumps() {
    let mut state = flat(6, ModeState::Classic);
    {
        let lane = state.lane_mut(3).unwrap();
        lane.kind = LaneKind::Road;
        lane.obstacles.push(Obstacle {
            id: 999,
            position: 0.0,
            kind: ObstacleKind::Car(Vehicle::Sedan),
            width: 2.0,
            heading: Heading::Right,
            speed: 0.01,
        });
    }
    let car = |state: &GameState| state.lane(3).unwrap().obstacles[0].position;

    state.effects.hold(PowerUpKind::TimeSlow);
    state.handle_activate_held_power_up();

    let before = car(&state);
    tick(&mut state, &TickInput::default(), NOMINAL_FRAME_MS);
    assert!((car(&state) - before - 0.005).abs() < 1e-6);

    // A slowed jump needs 240 ms: still airborne after 180 ms
    assert!(state.handle_directional_input(Direction::Up));
    for _ in 0..3 {
        tick(&mut state, &TickInput::default(), MAX_FRAME_MS);
    }
    assert!(state.player.is_jumping());
    for _ in 0..2 {
        tick(&mut state, &TickInput::default(), MAX_FRAME_MS);
    }
    assert!(!state.player.is_jumping());
    assert_eq!(state.player.row, 1);

    // 5 s of slowed time is 10 s of real time
    let mut frames = 5;
    while state.effects.is_active(PowerUpKind::TimeSlow) {
        tick(&mut state, &TickInput::default(), MAX_FRAME_MS);
        frames += 1;
        assert!(frames < 400);
    }
    assert!(state.run_time > 9.9 && state.run_time < 10.1, "{}", state.run_time);

    let before = car(&state);
    tick(&mut state, &TickInput::default(), NOMINAL_FRAME_MS);
    assert!((car(&state) - before - 0.01).abs() < 1e-6);
}

#[test]
fn trees_block_items_do_not() {
    let mut state = flat(2, ModeState::Classic);
    state.lane_mut(1).unwrap().obstacles.push(Obstacle {
        id: 999,
        position: 6.0,
        kind: ObstacleKind::Tree,
        width: 1.0,
        heading: Heading::Right,
        speed: 0.0,
    });
    assert!(!state.handle_directional_input(Direction::Up));
    assert!(!state.player.is_jumping());

    assert!(hop(&mut state, Direction::Left));
    state.lane_mut(1).unwrap().items.push(Item {
        id: 1000,
        position: 5.0,
        kind: ItemKind::Coin,
    });
    assert!(hop(&mut state, Direction::Up));
    assert_eq!(state.player.row, 1);
    assert_eq!(state.coins_collected, 1);
}

#[test]
fn power_up_is_collected_once() {
    let mut state = flat(2, ModeState::Classic);
    state.lane_mut(1).unwrap().items.push(Item {
        id: 1000,
        position: 6.0,
        kind: ItemKind::PowerUp(PowerUpKind::WaterWalk),
    });

    assert!(hop(&mut state, Direction::Up));
    assert_eq!(state.effects.held, Some(PowerUpKind::WaterWalk));
    assert!(state.lane(1).unwrap().items.is_empty());

    assert!(hop(&mut state, Direction::Down));
    assert!(hop(&mut state, Direction::Up));

    let events = state.drain_events();
    assert_eq!(
        count(&events, |e| matches!(e, GameEvent::PowerUpCollected { .. })),
        1
    );
}

#[test]
fn magnet_pulls_coins_from_nearby_rows() {
    let mut state = flat(2, ModeState::Classic);
    state.lane_mut(1).unwrap().items.push(Item {
        id: 1000,
        position: 10.0,
        kind: ItemKind::Coin,
    });
    state.effects.hold(PowerUpKind::Magnet);
    state.handle_activate_held_power_up();
    idle(&mut state, 120);
    assert_eq!(state.coins_collected, 1);
    assert!(state.lane(1).unwrap().items.is_empty());
    assert_eq!(state.player.row, 0);
}

#[test]
fn same_seed_same_run() {
    let demo = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let run = |seed: u64| {
        let mut state = GameState::new(seed, ModeState::Classic, Tuning::default());
        for _ in 0..1_200 {
            tick(&mut state, &demo, NOMINAL_FRAME_MS);
        }
        state.snapshot()
    };
    assert_eq!(run(31), run(31));
}
