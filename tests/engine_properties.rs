use scoreboard_back::{
    config::ScoreboardConfig,
    state::{
        clock::{ClockKind, ClockPhase},
        engine::{ScoreboardEngine, SessionRules},
        game::Team,
    },
};

fn engine_with(config: ScoreboardConfig) -> ScoreboardEngine {
    ScoreboardEngine::new(SessionRules::from(&config))
}

fn engine() -> ScoreboardEngine {
    engine_with(ScoreboardConfig::default())
}

/// Deterministic stream of pseudo-random fractions in `[0, 1)`.
struct Lcg(u64);

impl Lcg {
    fn next_fraction(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[test]
fn ticks_never_drive_clocks_negative() {
    let mut rng = Lcg(7);
    let mut engine = engine();
    engine.toggle_game_clock();
    engine.toggle_shot_clock();

    for step in 0..5_000 {
        engine.tick(rng.next_fraction() * 3.0);
        let state = engine.state();
        assert!(state.game_clock.remaining() >= 0.0, "step {step}");
        assert!(state.shot_clock.remaining() >= 0.0, "step {step}");

        if step % 50 == 0 {
            engine.reset_shot_clock(24.0);
            engine.toggle_shot_clock();
        }
    }
}

#[test]
fn splitting_elapsed_time_does_not_change_the_result() {
    let mut rng = Lcg(42);

    for _ in 0..100 {
        let total = 1.0 + rng.next_fraction() * 500.0;

        let mut whole = engine();
        whole.toggle_game_clock();
        whole.tick(total);

        let mut split = engine();
        split.toggle_game_clock();
        let mut left = total;
        while left > 0.0 {
            let dt = (rng.next_fraction() * 2.0).min(left);
            split.tick(dt);
            left -= dt;
        }

        let expected = whole.state().game_clock.remaining();
        let actual = split.state().game_clock.remaining();
        assert!(
            (expected - actual).abs() < 1e-6,
            "total {total}: {expected} vs {actual}"
        );
    }
}

#[test]
fn buzzer_needs_a_new_crossing_to_fire_again() {
    let mut engine = engine();
    engine.toggle_shot_clock();

    let fired: usize = (0..200).map(|_| engine.tick(0.25).len()).sum();
    assert_eq!(fired, 1);

    // Toggling at zero refills; the next crossing buzzes again.
    assert_eq!(engine.toggle_shot_clock(), ClockPhase::StoppedPositive);
    engine.toggle_shot_clock();
    let fired: Vec<_> = (0..200).flat_map(|_| engine.tick(0.25)).collect();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].clock, ClockKind::Shot);
    assert_eq!(fired[0].sequence, 2);
}

#[test]
fn scores_floor_at_zero() {
    let mut engine = engine();
    engine.adjust_score(Team::A, 3);
    engine.adjust_score(Team::A, -100);
    assert_eq!(engine.state().team_a.score, 0);
}

#[test]
fn reset_all_restores_clocks_from_any_state() {
    let mut engine = engine();
    engine.toggle_game_clock();
    engine.adjust_shot_clock(-24.0);
    engine.tick(700.0);
    engine.adjust_game_clock(30.0);
    engine.toggle_game_clock();

    engine.reset_all();
    let state = engine.state();
    assert_eq!(state.game_clock.remaining(), 600.0);
    assert_eq!(state.shot_clock.remaining(), 24.0);
    assert!(!state.game_clock.is_running());
    assert!(!state.shot_clock.is_running());
    assert!(!state.game_clock.is_latched());
    assert!(!state.shot_clock.is_latched());
}

#[test]
fn swapping_twice_restores_assignment() {
    let mut engine = engine();
    engine.rename_team(Team::A, "Hawks");
    engine.adjust_score(Team::B, 11);
    engine.adjust_timeout(Team::A, -1);
    let before = engine.state().clone();

    engine.swap_teams();
    engine.swap_teams();
    assert_eq!(engine.state(), &before);
}

#[test]
fn game_clock_scenario_buzzes_on_the_second_tick() {
    let mut engine = engine_with(ScoreboardConfig {
        game_seconds: 2,
        ..ScoreboardConfig::default()
    });
    engine.toggle_game_clock();

    assert!(engine.tick(1.0).is_empty());
    assert_eq!(engine.state().game_clock.remaining(), 1.0);

    let fired = engine.tick(1.5);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].clock, ClockKind::Game);
    assert_eq!(engine.state().game_clock.remaining(), 0.0);
    assert!(!engine.state().game_clock.is_running());
}

#[test]
fn shot_clock_scenario_stays_at_zero() {
    let mut engine = engine();
    assert_eq!(engine.toggle_shot_clock(), ClockPhase::Running);

    assert_eq!(engine.tick(24.0).len(), 1);
    assert_eq!(engine.state().shot_clock.remaining(), 0.0);

    assert!(engine.tick(5.0).is_empty());
    assert_eq!(engine.state().shot_clock.remaining(), 0.0);
}

#[test]
fn period_stays_at_maximum() {
    let mut engine = engine();
    engine.adjust_period(3);
    assert_eq!(engine.state().period, 4);
    engine.adjust_period(1);
    assert_eq!(engine.state().period, 4);
}
