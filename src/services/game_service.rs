//! Remote game selection: list nearby games and seed the scoreboard from one.

use time::{
    Date, Month, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description, util::days_in_year_month,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::models::GameRecordEntity,
    dto::{
        game::{GameListItem, ListedGameStatus},
        scoreboard::ScoreboardSnapshot,
    },
    error::ServiceError,
    state::{
        SharedState,
        clock::ClockKind,
        game::{DEFAULT_TEAM1_NAME, DEFAULT_TEAM2_NAME, GameRecord},
    },
};

/// List the games from the start of last month to the end of next month.
pub async fn list_games(state: &SharedState) -> Result<Vec<GameListItem>, ServiceError> {
    let store = state.require_live_store().await?;
    let today = OffsetDateTime::now_utc().date();
    let (from, to) = month_window(today)
        .ok_or_else(|| ServiceError::InvalidState(format!("no month window around {today}")))?;

    let rows = store.list_games(from, to).await?;
    debug!(%from, %to, rows = rows.len(), "fetched remote games");

    Ok(rows.into_iter().filter_map(to_list_item).collect())
}

/// Fetch a remote game and seed the scoreboard with its teams and scores.
///
/// Refused while the game clock is running.
pub async fn load_game(state: &SharedState, id: Uuid) -> Result<ScoreboardSnapshot, ServiceError> {
    ensure_game_clock_stopped(state).await?;

    let store = state.require_live_store().await?;
    let Some(entity) = store.find_game(id).await? else {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };
    let record = GameRecord::from(entity);

    // The clock may have been started while the record was being fetched.
    let (loaded, snapshot) = state
        .apply(|engine| {
            if engine.state().clock(ClockKind::Game).is_running() {
                return false;
            }
            engine.load_game(record);
            true
        })
        .await;

    if !loaded {
        return Err(ServiceError::InvalidState(
            "cannot load a game while the game clock is running".into(),
        ));
    }

    info!(%id, team_a = %snapshot.team_a.name, team_b = %snapshot.team_b.name, "remote game loaded");
    Ok(snapshot)
}

async fn ensure_game_clock_stopped(state: &SharedState) -> Result<(), ServiceError> {
    let running = state
        .read(|engine| engine.state().clock(ClockKind::Game).is_running())
        .await;
    if running {
        return Err(ServiceError::InvalidState(
            "cannot load a game while the game clock is running".into(),
        ));
    }
    Ok(())
}

/// First day of the previous month and last day of the next month.
pub fn month_window(today: Date) -> Option<(Date, Date)> {
    let (prev_year, prev_month) = match today.month() {
        Month::January => (today.year() - 1, Month::December),
        month => (today.year(), month.previous()),
    };
    let (next_year, next_month) = match today.month() {
        Month::December => (today.year() + 1, Month::January),
        month => (today.year(), month.next()),
    };

    let from = Date::from_calendar_date(prev_year, prev_month, 1).ok()?;
    let to = Date::from_calendar_date(
        next_year,
        next_month,
        days_in_year_month(next_year, next_month),
    )
    .ok()?;
    Some((from, to))
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or a full RFC 3339 timestamp.
pub fn parse_game_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(date);
    }
    if let Ok(moment) = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ) {
        return Some(moment.date());
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .map(|moment| moment.date())
}

fn to_list_item(row: GameRecordEntity) -> Option<GameListItem> {
    let raw_date = row.game_date.as_deref().unwrap_or_default();
    let Some(date) = parse_game_date(raw_date) else {
        warn!(id = %row.id, game_date = raw_date, "skipping game with unparsable date");
        return None;
    };

    let team1 = row.team1.unwrap_or_else(|| DEFAULT_TEAM1_NAME.to_string());
    let team2 = row.team2.unwrap_or_else(|| DEFAULT_TEAM2_NAME.to_string());
    let status = ListedGameStatus::from_game_type(row.game_type.as_deref());
    let division = row.division.filter(|division| !division.trim().is_empty());

    let mut text = format!(
        "{:02}/{:02} {team1} vs {team2} ({})",
        u8::from(date.month()),
        date.day(),
        status.label()
    );
    if let Some(division) = &division {
        text.push_str(&format!(" [{division}]"));
    }

    Some(GameListItem {
        id: row.id,
        date: format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ),
        text,
        team1,
        team2,
        status,
        division,
    })
}
