use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

/// Connection and quiz settings for the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub question_count: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

impl ClientConfig {
    /// Reads `STUDYBOT_API_URL`, `STUDYBOT_HTTP_TIMEOUT_SECS` and
    /// `STUDYBOT_QUESTION_COUNT`, falling back to defaults for missing or invalid values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_base_url = lookup("STUDYBOT_API_URL")
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.api_base_url);
        let request_timeout = lookup("STUDYBOT_HTTP_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(defaults.request_timeout, Duration::from_secs);
        let question_count = lookup("STUDYBOT_QUESTION_COUNT")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|count| *count > 0)
            .unwrap_or(defaults.question_count);

        Self {
            api_base_url,
            request_timeout,
            question_count,
        }
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = count.max(1);
        self
    }
}
