use crate::types::FetchConfig;
use clap::Parser;
use std::path::PathBuf;

/// Username/password pair for one site login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both halves set; otherwise the login-only sources are not registered.
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Where the assignment feed comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
    #[default]
    None,
}

/// Everything the service needs, built once at startup and passed down
/// explicitly.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub port: u16,
    pub piazza: Credentials,
    pub cwl: Credentials,
    pub feed: FeedSource,
    pub fetch: FetchConfig,
}

/// Command line flags; each can also come from the environment.
#[derive(Debug, Parser)]
#[command(name = "course-aggregator", about = "Merge course pages and assignment deadlines into one page")]
pub struct Args {
    /// The port to listen on
    #[arg(long, env = "PORT", default_value_t = 80)]
    pub port: u16,

    /// Piazza username
    #[arg(long, env = "PIAZZA_USER", default_value = "")]
    pub piazza_user: String,

    /// Piazza password
    #[arg(long, env = "PIAZZA_PASS", default_value = "", hide_env_values = true)]
    pub piazza_pass: String,

    /// CWL username
    #[arg(long, env = "CWL_USER", default_value = "")]
    pub cwl_user: String,

    /// CWL password
    #[arg(long, env = "CWL_PASS", default_value = "", hide_env_values = true)]
    pub cwl_pass: String,

    /// URL of the JSON assignment feed
    #[arg(long, env = "FEED_URL", conflicts_with = "feed_file")]
    pub feed_url: Option<String>,

    /// Local JSON file used as the assignment feed
    #[arg(long, env = "FEED_FILE")]
    pub feed_file: Option<PathBuf>,

    /// User agent sent to course sites
    #[arg(long, env = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Per-request timeout for course sites and the feed
    #[arg(long, env = "TIMEOUT_SECONDS", default_value_t = 30)]
    pub timeout_seconds: u64,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        let mut fetch = FetchConfig {
            timeout_seconds: args.timeout_seconds,
            ..FetchConfig::default()
        };
        if let Some(user_agent) = args.user_agent {
            fetch.user_agent = user_agent;
        }

        let feed = match (args.feed_url, args.feed_file) {
            (Some(url), _) => FeedSource::Url(url),
            (None, Some(path)) => FeedSource::File(path),
            (None, None) => FeedSource::None,
        };

        Self {
            port: args.port,
            piazza: Credentials::new(args.piazza_user, args.piazza_pass),
            cwl: Credentials::new(args.cwl_user, args.cwl_pass),
            feed,
            fetch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_become_config() {
        let args = Args::try_parse_from([
            "course-aggregator",
            "--port",
            "8080",
            "--piazza-user",
            "me@example.com",
            "--piazza-pass",
            "secret",
            "--feed-url",
            "http://feed.example/assignments.json",
        ])
        .unwrap();
        let config = AppConfig::from(args);

        assert_eq!(config.port, 8080);
        assert!(config.piazza.is_configured());
        assert!(!config.cwl.is_configured());
        assert_eq!(config.feed, FeedSource::Url("http://feed.example/assignments.json".to_string()));
        assert_eq!(config.fetch.timeout_seconds, 30);
    }
}
