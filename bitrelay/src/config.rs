use crate::errors::AppResult;
use crate::models::ProductCode;
use crate::tasks::health::{Backpressure, DEFAULT_BUFFER_CAPACITY};
use chrono_tz::Tz;
use config::ConfigError;
use serde::Deserialize;
use std::{collections::HashMap, fmt, path::Path, time::Duration};

pub const BITFLYER_API_KEY: &str = "BITFLYER_API_KEY";
pub const BITFLYER_API_SECRET: &str = "BITFLYER_API_SECRET";
pub const LINE_CHANNEL_TOKEN: &str = "LINE_CHANNEL_TOKEN";
pub const LINE_CHANNEL_SECRET: &str = "LINE_CHANNEL_SECRET";
pub const LINE_GROUP_ID: &str = "LINE_GROUP_ID";

const SECRET_KEYS: [&str; 5] = [
    BITFLYER_API_KEY,
    BITFLYER_API_SECRET,
    LINE_CHANNEL_TOKEN,
    LINE_CHANNEL_SECRET,
    LINE_GROUP_ID,
];

/// A secret value that never shows up in logs or `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("************")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("************")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub server_url: ServerUrl,
    pub ticker_batch: TickerBatch,
    #[serde(default)]
    pub health_batch: HealthBatch,
    #[serde(skip)]
    pub bitflyer: BitFlyer,
    #[serde(skip)]
    pub line: Line,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerUrl {
    #[serde(default)]
    pub golang_server: String,
    #[serde(default)]
    pub drf_server: String,
    #[serde(default)]
    pub fast_api_server: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickerBatch {
    #[serde(default)]
    pub batch_interval_sec: u64,
    #[serde(default = "default_product_code")]
    pub product_code: ProductCode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthBatch {
    #[serde(default = "default_check_interval_sec")]
    pub check_interval_sec: u64,
    #[serde(default = "default_notification_interval_sec")]
    pub notification_interval_sec: u64,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    #[serde(default)]
    pub backpressure: Backpressure,
}

impl Default for HealthBatch {
    fn default() -> Self {
        Self {
            check_interval_sec: default_check_interval_sec(),
            notification_interval_sec: default_notification_interval_sec(),
            time_zone: default_time_zone(),
            buffer_capacity: default_buffer_capacity(),
            backpressure: Backpressure::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BitFlyer {
    pub api_key: Credential,
    pub api_secret: Credential,
}

#[derive(Debug, Clone, Default)]
pub struct Line {
    pub channel_token: Credential,
    pub channel_secret: Credential,
    pub group_id: Credential,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_product_code() -> ProductCode {
    ProductCode::BtcJpy
}

fn default_check_interval_sec() -> u64 {
    5
}

fn default_notification_interval_sec() -> u64 {
    60 * 60
}

fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

fn default_time_zone() -> String {
    "Asia/Tokyo".to_string()
}

/// Secret values read from a dotenv file. A process environment variable with
/// the same name takes precedence over the file.
#[derive(Debug, Default)]
pub struct Secrets {
    values: HashMap<String, Credential>,
}

impl Secrets {
    pub fn from_env_file(path: &Path) -> AppResult<Self> {
        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, value) = item?;
            values.insert(key, Credential::new(value));
        }

        for key in SECRET_KEYS {
            if let Ok(value) = std::env::var(key) {
                values.insert(key.to_string(), Credential::new(value));
            }
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Credential {
        self.values.get(key).cloned().unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Secrets {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Credential::new(v)))
                .collect(),
        }
    }
}

impl Config {
    pub fn load(toml_path: &Path, env_path: &Path) -> AppResult<Self> {
        let secrets = Secrets::from_env_file(env_path)?;
        Self::from_parts(toml_path, &secrets)
    }

    pub fn from_parts(toml_path: &Path, secrets: &Secrets) -> AppResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::new(
                &toml_path.to_string_lossy(),
                config::FileFormat::Toml,
            ))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.bitflyer = BitFlyer {
            api_key: secrets.get(BITFLYER_API_KEY),
            api_secret: secrets.get(BITFLYER_API_SECRET),
        };
        config.line = Line {
            channel_token: secrets.get(LINE_CHANNEL_TOKEN),
            channel_secret: secrets.get(LINE_CHANNEL_SECRET),
            group_id: secrets.get(LINE_GROUP_ID),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(msg: &str) -> ConfigError {
            ConfigError::Message(msg.to_string())
        }

        if self.server_url.golang_server.is_empty() {
            return Err(invalid("golang server url is empty"));
        }
        if self.server_url.drf_server.is_empty() {
            return Err(invalid("drf server url is empty"));
        }
        if self.server_url.fast_api_server.is_empty() {
            return Err(invalid("fast api server url is empty"));
        }
        if self.bitflyer.api_key.is_empty() {
            return Err(invalid("bitflyer api key is empty"));
        }
        if self.bitflyer.api_secret.is_empty() {
            return Err(invalid("bitflyer api secret is empty"));
        }
        if self.ticker_batch.batch_interval_sec == 0 {
            return Err(invalid("ticker batch interval must be greater than 0"));
        }
        if self.health_batch.check_interval_sec == 0 {
            return Err(invalid("health check interval must be greater than 0"));
        }
        if self.health_batch.notification_interval_sec == 0 {
            return Err(invalid("notification interval must be greater than 0"));
        }
        if self.health_batch.buffer_capacity == 0 {
            return Err(invalid("health sample buffer capacity must be greater than 0"));
        }
        self.time_zone()?;

        Ok(())
    }

    pub fn time_zone(&self) -> Result<Tz, ConfigError> {
        let name = &self.health_batch.time_zone;
        name.parse::<Tz>()
            .map_err(|_| ConfigError::Message(format!("unknown time zone: {}", name)))
    }

    pub fn ticker_interval(&self) -> Duration {
        Duration::from_secs(self.ticker_batch.batch_interval_sec)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.health_batch.check_interval_sec)
    }

    pub fn notification_interval(&self) -> Duration {
        Duration::from_secs(self.health_batch.notification_interval_sec)
    }
}
