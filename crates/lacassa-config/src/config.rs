//! Session configuration
//!
//! Settings an execution adapter needs to open a session: contact points,
//! keyspace, default page size, consistency, timeouts and credentials.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default consistency level applied to statements.
///
/// Parsed case-insensitively from its upper snake case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Consistency {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    #[default]
    LocalQuorum,
    EachQuorum,
    Serial,
    LocalSerial,
    LocalOne,
}

impl Consistency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Consistency::Any => "ANY",
            Consistency::One => "ONE",
            Consistency::Two => "TWO",
            Consistency::Three => "THREE",
            Consistency::Quorum => "QUORUM",
            Consistency::All => "ALL",
            Consistency::LocalQuorum => "LOCAL_QUORUM",
            Consistency::EachQuorum => "EACH_QUORUM",
            Consistency::Serial => "SERIAL",
            Consistency::LocalSerial => "LOCAL_SERIAL",
            Consistency::LocalOne => "LOCAL_ONE",
        }
    }

    /// Whether this level only applies to lightweight transactions
    pub fn is_serial(&self) -> bool {
        matches!(self, Consistency::Serial | Consistency::LocalSerial)
    }
}

impl FromStr for Consistency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ANY" => Ok(Consistency::Any),
            "ONE" => Ok(Consistency::One),
            "TWO" => Ok(Consistency::Two),
            "THREE" => Ok(Consistency::Three),
            "QUORUM" => Ok(Consistency::Quorum),
            "ALL" => Ok(Consistency::All),
            "LOCAL_QUORUM" => Ok(Consistency::LocalQuorum),
            "EACH_QUORUM" => Ok(Consistency::EachQuorum),
            "SERIAL" => Ok(Consistency::Serial),
            "LOCAL_SERIAL" => Ok(Consistency::LocalSerial),
            "LOCAL_ONE" => Ok(Consistency::LocalOne),
            _ => Err(ConfigError::invalid("consistency", s)),
        }
    }
}

impl TryFrom<String> for Consistency {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Consistency> for String {
    fn from(value: Consistency) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timeouts handed to the execution adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Default per-statement timeout
    pub request_ms: u64,
    /// Timeout for establishing a connection
    pub connect_ms: u64,
}

impl TimeoutConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_ms: 12_000,
            connect_ms: 5_000,
        }
    }
}

/// Username/password authentication
#[derive(Clone, PartialEq, Serialize, Deserialize)]
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
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub keyspace: String,
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Rows per page; the store returns results in pages of this size
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub consistency: Consistency,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

fn default_hosts() -> Vec<String> {
    vec!["127.0.0.1".to_string()]
}

fn default_port() -> u16 {
    9042
}

fn default_page_size() -> u32 {
    5000
}

impl SessionConfig {
    /// Config for `keyspace` with every other field defaulted
    pub fn new(keyspace: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            hosts: default_hosts(),
            port: default_port(),
            page_size: default_page_size(),
            consistency: Consistency::default(),
            timeouts: TimeoutConfig::default(),
            credentials: None,
        }
    }

    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = consistency;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// `host:port` contact points
    pub fn contact_points(&self) -> Vec<String> {
        self.hosts
            .iter()
            .map(|h| format!("{}:{}", h, self.port))
            .collect()
    }

    /// Check the config for values no session could use
    pub fn validate(&self) -> ConfigResult<()> {
        if self.keyspace.trim().is_empty() {
            return Err(ConfigError::MissingField("keyspace".to_string()));
        }
        if self.hosts.is_empty() || self.hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(ConfigError::invalid("hosts", format!("{:?}", self.hosts)));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid("port", "0"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "0"));
        }
        if self.consistency.is_serial() {
            return Err(ConfigError::invalid(
                "consistency",
                format!("{} is only valid for lightweight transactions", self.consistency),
            ));
        }
        if let Some(credentials) = &self.credentials {
            if credentials.username.is_empty() || credentials.password.is_empty() {
                return Err(ConfigError::invalid(
                    "credentials",
                    "username and password are both required",
                ));
            }
        }
        Ok(())
    }
}
