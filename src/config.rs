//! Engine settings from the environment.

/// Env var: how many times a read-modify-write cycle is attempted before giving up.
pub const MAX_SAVE_ATTEMPTS_VAR: &str = "PLAYOFF_MAX_SAVE_ATTEMPTS";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    /// At least 1.
    pub max_save_attempts: u32,
}

fn default_max_save_attempts() -> u32 {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_save_attempts: default_max_save_attempts(),
        }
    }
}

impl EngineConfig {
    /// Read settings from process env vars, falling back to defaults for missing or bad values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_save_attempts = lookup(MAX_SAVE_ATTEMPTS_VAR)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or_else(default_max_save_attempts);
        Self { max_save_attempts }
    }
}
