use std::{env, fmt, fs, path::Path, time::Duration};

use crate::{dispatch::BlankInputPolicy, errors::Error, Result};

const DEFAULT_ERROR_BACKOFF_SECS: u64 = 10;

/// Typed configuration, read from the environment (and an optional `.env`).
#[derive(Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub blank_input_policy: BlankInputPolicy,
    /// Pause after each reported transport fault. Zero resumes immediately.
    pub error_backoff: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_bot_token", &"<redacted>")
            .field("blank_input_policy", &self.blank_input_policy)
            .field("error_backoff", &self.error_backoff)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process env in `load`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let blank_input_policy = match lookup("BLANK_INPUT_POLICY") {
            Some(raw) => parse_blank_input_policy(&raw)?,
            None => BlankInputPolicy::default(),
        };

        let error_backoff = Duration::from_secs(
            lookup("ERROR_BACKOFF_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_ERROR_BACKOFF_SECS),
        );

        Ok(Self {
            telegram_bot_token: telegram_bot_token.trim().to_string(),
            blank_input_policy,
            error_backoff,
        })
    }
}

fn parse_blank_input_policy(raw: &str) -> Result<BlankInputPolicy> {
    match raw.trim().to_lowercase().as_str() {
        "" | "prompt" => Ok(BlankInputPolicy::Prompt),
        "ignore" => Ok(BlankInputPolicy::Ignore),
        other => Err(Error::Config(format!(
            "BLANK_INPUT_POLICY must be `prompt` or `ignore`, got `{other}`"
        ))),
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}
