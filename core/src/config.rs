//! Client configuration: API token, base URL and due-date language.
//!
//! Built once by the caller and handed to `TodoistClient`; nothing here is
//! global or mutable after construction.

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/rest/v2/";
pub const DEFAULT_DUE_LANG: &str = "en";

pub const ENV_TOKEN: &str = "TODOIST_API_TOKEN";
pub const ENV_BASE_URL: &str = "TODOIST_BASE_URL";
pub const ENV_DUE_LANG: &str = "TODOIST_DUE_LANG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub token: String,
    /// Language sent as `due_lang` whenever a payload carries a due date.
    pub due_lang: String,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            due_lang: DEFAULT_DUE_LANG.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_due_lang(mut self, due_lang: impl Into<String>) -> Self {
        self.due_lang = due_lang.into();
        self
    }

    /// Read configuration from `TODOIST_API_TOKEN`, `TODOIST_BASE_URL` and
    /// `TODOIST_DUE_LANG`. Only the token is required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(ENV_TOKEN)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENV_TOKEN} is not set")))?;

        let mut config = Config::new(token);
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config = config.with_base_url(base_url);
        }
        if let Some(lang) = lookup(ENV_DUE_LANG).filter(|v| !v.is_empty()) {
            config = config.with_due_lang(lang);
        }
        Ok(config)
    }
}
