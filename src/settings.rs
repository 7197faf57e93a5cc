use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_FRONT_PAGE: &str = "https://news.ycombinator.com/";
pub const DEFAULT_SITE_HOST: &str = "news.ycombinator.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Page opened when no location is given on the command line.
    pub front_page: String,
    /// Host treated as "the site" when the page came from a local file.
    pub site_host: String,
    /// Quiet period after a page change before rows are rediscovered.
    pub debounce_ms: u64,
    pub retry_delay_ms: u64,
    pub max_discovery_retries: u32,
    /// How long the "Saved!" badge stays on a row.
    pub feedback_ms: u64,
    /// "auto" for the system opener, or a command that takes the URL.
    pub browser: String,
}

impl Settings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            front_page: DEFAULT_FRONT_PAGE.to_string(),
            site_host: DEFAULT_SITE_HOST.to_string(),
            debounce_ms: 200,
            retry_delay_ms: 500,
            max_discovery_retries: 5,
            feedback_ms: 2000,
            browser: "auto".to_string(),
        }
    }
}
