use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// User agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36";

/// Named presets that seed every configuration default
///
/// A config file or the command line may still override individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Three attempts per URL, summary on, query strings stripped from names
    #[default]
    Full,
    /// One attempt, raw bodies, no summary, names keep their query string
    Minimal,
    /// Title records delivered over the results channel
    Titles,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Minimal => "minimal",
            Self::Titles => "titles",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "minimal" => Ok(Self::Minimal),
            "titles" => Ok(Self::Titles),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

/// How completion is signaled for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinationMode {
    /// Tasks persist as a side effect; the batch waits on a latch
    Barrier,
    /// Tasks send one message each on a channel closed after the last send
    Collector,
}

/// How tasks are scheduled onto the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// One spawned task per URL, all at batch start
    Unbounded,
    /// A fixed number of workers draining a bounded queue
    Pool,
}

/// What the extractor produces from a fetched body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractMode {
    /// Body bytes unchanged
    Raw,
    /// Body parsed as an HTML document and re-serialized
    Reparse,
    /// Text of the first `<title>` element
    Title,
}

/// Main configuration structure for Harvest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub profile: Profile,
    pub fetch: FetchConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
    pub serve: ServeConfig,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Attempts per URL; 0 is treated as 1
    pub max_retries: u32,

    /// User-Agent header value
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Pause between failed attempts (milliseconds)
    pub retry_delay_ms: u64,
}

/// Task dispatch and coordination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BatchConfig {
    pub mode: CoordinationMode,
    pub dispatch: DispatchMode,

    /// Worker count when `dispatch = "pool"`
    pub workers: usize,

    /// Pending-task queue size when `dispatch = "pool"`
    pub queue_capacity: usize,

    pub extract: ExtractMode,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving one file per persisted URL
    pub directory: String,

    /// Whether a SUCCESS/FAILED line is appended per URL
    pub summary: bool,

    /// Summary artifact name inside `directory`
    pub summary_file: String,

    /// Drop everything from the first `?` when naming files
    pub strip_query: bool,

    /// Append a short URL hash to file names to avoid collisions
    pub hash_suffix: bool,
}

/// Post-batch static file server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServeConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Builds the default configuration for a profile
    pub fn for_profile(profile: Profile) -> Self {
        let mut config = Self {
            profile,
            fetch: FetchConfig::default(),
            batch: BatchConfig::default(),
            output: OutputConfig::default(),
            serve: ServeConfig::default(),
        };

        match profile {
            Profile::Full => {}
            Profile::Minimal => {
                config.fetch.max_retries = 1;
                config.batch.extract = ExtractMode::Raw;
                config.output.summary = false;
                config.output.strip_query = false;
            }
            Profile::Titles => {
                config.batch.mode = CoordinationMode::Collector;
                config.batch.extract = ExtractMode::Title;
                config.output.summary = false;
            }
        }

        config
    }

    /// Effective attempt count (never zero)
    pub fn attempts(&self) -> u32 {
        self.fetch.max_retries.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_profile(Profile::Full)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            retry_delay_ms: 0,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            mode: CoordinationMode::Barrier,
            dispatch: DispatchMode::Unbounded,
            workers: 8,
            queue_capacity: 64,
            extract: ExtractMode::Reparse,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "scrapedHTML".to_string(),
            summary: true,
            summary_file: "summary.txt".to_string(),
            strip_query: true,
            hash_suffix: false,
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
