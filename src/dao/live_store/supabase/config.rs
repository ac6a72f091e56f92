use super::error::{SupabaseError, SupabaseResult};

/// Table holding the league schedule and live scores.
pub const GAME_TABLE: &str = "game_league";

/// Runtime configuration describing how to reach the Supabase REST endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
}

impl SupabaseConfig {
    /// Construct a configuration from an explicit project URL and anon key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: GAME_TABLE.to_string(),
        }
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        let base_url = non_empty_var("APP_SUPABASE_URL")?;
        let api_key = non_empty_var("APP_SUPABASE_ANON_KEY")?;
        Ok(Self::new(base_url, api_key))
    }
}

fn non_empty_var(var: &'static str) -> SupabaseResult<String> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(SupabaseError::MissingEnvVar { var })
}
