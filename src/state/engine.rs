//! The scoreboard clock engine: every operator action and every tick of the
//! timing loop ends up as one synchronous method call on [`ScoreboardEngine`].

use crate::{
    config::ScoreboardConfig,
    dto::scoreboard::ScoreboardSnapshot,
    state::{
        clock::{Clock, ClockKind, ClockPhase},
        game::{BuzzerEvent, GameRecord, GameState, Team, TeamState},
    },
};

/// Values the engine resets to, extracted once from [`ScoreboardConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRules {
    /// Default name of the left team.
    pub team_a: String,
    /// Default name of the right team.
    pub team_b: String,
    /// Default color of the left team.
    pub team_a_color: Option<String>,
    /// Default color of the right team.
    pub team_b_color: Option<String>,
    /// Full game clock duration of a period.
    pub game_seconds: f64,
    /// Full shot clock duration.
    pub shot_seconds: f64,
    /// Overtime game clock duration.
    pub overtime_seconds: f64,
    /// Upper bound of the game clock.
    pub game_clock_cap: f64,
    /// Upper bound of the shot clock.
    pub shot_clock_cap: f64,
    /// Last period number.
    pub period_max: u32,
    /// Timeouts granted to each team on reset.
    pub timeouts_per_team: u32,
    /// Whether the slots were swapped when the last session was saved.
    pub teams_swapped: bool,
}

impl From<&ScoreboardConfig> for SessionRules {
    fn from(config: &ScoreboardConfig) -> Self {
        Self {
            team_a: config.team_a.clone(),
            team_b: config.team_b.clone(),
            team_a_color: config.team_a_color.clone(),
            team_b_color: config.team_b_color.clone(),
            game_seconds: f64::from(config.game_seconds),
            shot_seconds: f64::from(config.shot_seconds),
            overtime_seconds: f64::from(config.overtime_seconds),
            game_clock_cap: f64::from(config.game_clock_cap_seconds),
            shot_clock_cap: f64::from(config.shot_clock_cap_seconds),
            period_max: config.period_max.max(1),
            timeouts_per_team: config.timeouts_per_team,
            teams_swapped: config.team_swapped,
        }
    }
}

/// Owner of the [`GameState`]; applies mutations and advances both clocks.
#[derive(Debug, Clone)]
pub struct ScoreboardEngine {
    rules: SessionRules,
    state: GameState,
    version: u64,
    buzzer_sequence: u64,
}

impl ScoreboardEngine {
    /// Create an engine in its initial state: both clocks stopped at their
    /// configured durations, first period, scores at zero.
    pub fn new(rules: SessionRules) -> Self {
        let state = GameState {
            team_a: TeamState::new(
                rules.team_a.clone(),
                rules.team_a_color.clone(),
                rules.timeouts_per_team,
            ),
            team_b: TeamState::new(
                rules.team_b.clone(),
                rules.team_b_color.clone(),
                rules.timeouts_per_team,
            ),
            period: 1,
            game_clock: Clock::new(rules.game_seconds, rules.game_clock_cap),
            shot_clock: Clock::new(rules.shot_seconds, rules.shot_clock_cap),
            started: false,
            swapped: rules.teams_swapped,
            game_id: None,
        };

        Self {
            rules,
            state,
            version: 0,
            buzzer_sequence: 0,
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Rules the engine was built with.
    pub fn rules(&self) -> &SessionRules {
        &self.rules
    }

    /// Mutation counter, bumped on every state change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether at least one clock is counting down.
    pub fn any_clock_running(&self) -> bool {
        self.state.game_clock.is_running() || self.state.shot_clock.is_running()
    }

    /// Advance both clocks by `dt` seconds and return the buzzers fired, game
    /// clock first.
    pub fn tick(&mut self, dt: f64) -> Vec<BuzzerEvent> {
        let before = (
            self.state.game_clock.remaining(),
            self.state.shot_clock.remaining(),
            self.state.game_clock.is_running(),
            self.state.shot_clock.is_running(),
        );

        let mut fired = Vec::new();
        if self.state.game_clock.tick(dt) {
            fired.push(self.next_buzzer(ClockKind::Game));
        }
        if self.state.shot_clock.tick(dt) {
            fired.push(self.next_buzzer(ClockKind::Shot));
        }

        let after = (
            self.state.game_clock.remaining(),
            self.state.shot_clock.remaining(),
            self.state.game_clock.is_running(),
            self.state.shot_clock.is_running(),
        );
        if before != after {
            self.bump();
        }

        fired
    }

    /// Add `delta` points to a team, flooring at zero.
    pub fn adjust_score(&mut self, team: Team, delta: i32) {
        let slot = self.state.team_mut(team);
        slot.score = slot.score.saturating_add_signed(delta);
        self.bump();
    }

    /// Add `delta` fouls to a team, flooring at zero.
    pub fn adjust_foul(&mut self, team: Team, delta: i32) {
        let slot = self.state.team_mut(team);
        slot.fouls = slot.fouls.saturating_add_signed(delta);
        self.bump();
    }

    /// Add `delta` timeouts to a team, flooring at zero.
    pub fn adjust_timeout(&mut self, team: Team, delta: i32) {
        let slot = self.state.team_mut(team);
        slot.timeouts = slot.timeouts.saturating_add_signed(delta);
        self.bump();
    }

    /// Move the period by `delta`, clamped to `[1, period_max]`.
    pub fn adjust_period(&mut self, delta: i32) {
        let next = i64::from(self.state.period) + i64::from(delta);
        self.state.period = next.clamp(1, i64::from(self.rules.period_max)) as u32;
        self.bump();
    }

    /// Move the game clock by `delta` seconds.
    pub fn adjust_game_clock(&mut self, delta: f64) {
        self.state.game_clock.adjust(delta);
        self.bump();
    }

    /// Move the shot clock by `delta` seconds.
    pub fn adjust_shot_clock(&mut self, delta: f64) {
        self.state.shot_clock.adjust(delta);
        self.bump();
    }

    /// Start/stop the game clock; at zero it is refilled to the period length.
    pub fn toggle_game_clock(&mut self) -> ClockPhase {
        let phase = self.state.game_clock.toggle(self.rules.game_seconds);
        if phase == ClockPhase::Running {
            self.state.started = true;
        }
        self.bump();
        phase
    }

    /// Start/stop the shot clock; at zero it is refilled to the full shot duration.
    pub fn toggle_shot_clock(&mut self) -> ClockPhase {
        let phase = self.state.shot_clock.toggle(self.rules.shot_seconds);
        self.bump();
        phase
    }

    /// Stop the shot clock at `seconds` (commonly 24 or 14) and re-arm its buzzer.
    pub fn reset_shot_clock(&mut self, seconds: f64) {
        self.state.shot_clock.reset(seconds);
        self.bump();
    }

    /// Stop the game clock at the configured period length and re-arm its buzzer.
    pub fn reset_game_clock(&mut self) {
        self.state.game_clock.reset(self.rules.game_seconds);
        self.bump();
    }

    /// Load the overtime duration onto the game clock. The period is left alone.
    pub fn start_overtime(&mut self) {
        self.state.game_clock.reset(self.rules.overtime_seconds);
        self.bump();
    }

    /// Reinitialise scores, fouls, timeouts, period and both clocks. Team names,
    /// colors and the loaded game record are kept.
    pub fn reset_all(&mut self) {
        let timeouts = self.rules.timeouts_per_team;
        for team in [Team::A, Team::B] {
            let slot = self.state.team_mut(team);
            slot.score = 0;
            slot.fouls = 0;
            slot.timeouts = timeouts;
        }
        self.state.period = 1;
        self.state.game_clock.reset(self.rules.game_seconds);
        self.state.shot_clock.reset(self.rules.shot_seconds);
        self.state.started = false;
        self.bump();
    }

    /// Exchange the two team slots, names and counters included.
    pub fn swap_teams(&mut self) {
        std::mem::swap(&mut self.state.team_a, &mut self.state.team_b);
        self.state.swapped = !self.state.swapped;
        self.bump();
    }

    /// Replace the display name of a team.
    pub fn rename_team(&mut self, team: Team, name: &str) {
        self.state.team_mut(team).name = name.trim().to_string();
        self.bump();
    }

    /// Seed the session from a game record: names, colors and recorded scores,
    /// everything else back to its configured starting value.
    pub fn load_game(&mut self, record: GameRecord) {
        self.reset_all();

        let GameRecord {
            id,
            team_a,
            team_b,
            team_a_color,
            team_b_color,
            score_a,
            score_b,
        } = record;

        self.state.team_a.name = team_a;
        self.state.team_a.color = team_a_color;
        self.state.team_a.score = score_a;
        self.state.team_b.name = team_b;
        self.state.team_b.color = team_b_color;
        self.state.team_b.score = score_b;
        self.state.game_id = Some(id);
        self.state.swapped = false;
        self.bump();
    }

    /// Owned, serialisable copy of the current state.
    pub fn snapshot(&self) -> ScoreboardSnapshot {
        ScoreboardSnapshot::from_engine(self)
    }

    fn next_buzzer(&mut self, clock: ClockKind) -> BuzzerEvent {
        self.buzzer_sequence += 1;
        BuzzerEvent {
            clock,
            period: self.state.period,
            sequence: self.buzzer_sequence,
        }
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}
