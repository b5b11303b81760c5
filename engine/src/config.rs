//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use bill_types::params::{DEFAULT_OVERDUE_GRACE_PERIOD, DEFAULT_OVERDUE_LIMIT};
use bill_types::{Address, AssetClass};

use crate::FinanceError;

/// Configuration for the settlement engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Address redeemed bill tokens are sent to.
    #[serde(default = "default_sink_address")]
    pub sink_address: Address,

    /// Symbols that settle under the coins executor rather than the token executor.
    #[serde(default = "default_settlement_symbols")]
    pub settlement_symbols: Vec<String>,

    /// Grace period (days) for bills created without one.
    #[serde(default = "default_overdue_grace_period")]
    pub default_overdue_grace_period: u64,

    /// Overdue accrual limit (days) for bills created without one.
    #[serde(default = "default_overdue_limit")]
    pub default_overdue_limit: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sink_address() -> Address {
    Address::new("1HrWVgGEuGw6E1BrntqMaCmJUA58ArX7FN")
}

fn default_settlement_symbols() -> Vec<String> {
    vec!["token.CCNY".to_string()]
}

fn default_overdue_grace_period() -> u64 {
    DEFAULT_OVERDUE_GRACE_PERIOD
}

fn default_overdue_limit() -> u64 {
    DEFAULT_OVERDUE_LIMIT
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sink_address: default_sink_address(),
            settlement_symbols: default_settlement_symbols(),
            default_overdue_grace_period: default_overdue_grace_period(),
            default_overdue_limit: default_overdue_limit(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, FinanceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| FinanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, FinanceError> {
        let config: Self = toml::from_str(s).map_err(|e| FinanceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, FinanceError> {
        toml::to_string_pretty(self).map_err(|e| FinanceError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), FinanceError> {
        if !self.sink_address.is_valid() {
            return Err(FinanceError::Config(format!(
                "invalid sink address {:?}",
                self.sink_address.as_str()
            )));
        }
        Ok(())
    }

    /// The executor a symbol's balances live under.
    pub fn asset_class_for(&self, symbol: &str) -> AssetClass {
        if self.settlement_symbols.iter().any(|s| s == symbol) {
            AssetClass::Coins
        } else {
            AssetClass::Token
        }
    }
}
