use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        scoreboard::ScoreboardSnapshot,
        sse::{ServerEvent, SystemStatus},
    },
    state::{AppState, game::BuzzerEvent},
};

pub(crate) const EVENT_SCOREBOARD: &str = "scoreboard";
const EVENT_CLOCK: &str = "clock";
const EVENT_BUZZER: &str = "buzzer";
const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast the full scoreboard after a mutation.
pub fn broadcast_scoreboard(state: &AppState, snapshot: &ScoreboardSnapshot) {
    send_public_event(state, EVENT_SCOREBOARD, snapshot);
    send_admin_event(state, EVENT_SCOREBOARD, snapshot);
}

/// Broadcast a running-clock update to the displays.
pub fn broadcast_clock(state: &AppState, snapshot: &ScoreboardSnapshot) {
    send_public_event(state, EVENT_CLOCK, snapshot);
}

/// Broadcast that a clock reached zero.
pub fn broadcast_buzzer(state: &AppState, event: &BuzzerEvent) {
    send_public_event(state, EVENT_BUZZER, event);
    send_admin_event(state, EVENT_BUZZER, event);
}

/// Broadcast that the live-score store went away or came back.
pub fn broadcast_system_status(state: &AppState, offline: bool) {
    let payload = SystemStatus { offline };
    send_public_event(state, EVENT_SYSTEM_STATUS, &payload);
    send_admin_event(state, EVENT_SYSTEM_STATUS, &payload);
}

fn send_public_event(state: &AppState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}

fn send_admin_event(state: &AppState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.admin_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize admin SSE payload"),
    }
}
