use std::time::Duration;

use duration_str::deserialize_option_duration;

const DEFAULT_USER_AGENT: &str = concat!("gqlpen/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Upper bound for a whole request, from connecting to reading the body
    #[serde(deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
    /// Sent as the `User-Agent` header of every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            timeout: Some(Duration::from_secs(30)),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}
