//! Configuration module for the collar engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for the engine.
//!
//! # Usage
//!
//! ```rust,ignore
//! use collar_engine::config::{EngineConfig, load_config};
//!
//! // Load from default path (engine.yaml)
//! let config = load_config(None)?;
//!
//! // Access configuration values
//! println!("protocol fee: {} bips", config.protocol.fee_bips);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::shared::{AccountId, AssetId, BasisPoints, DurationSecs};

/// Largest permitted protocol fee, 1% in basis points.
pub const MAX_PROTOCOL_FEE_BIPS: u32 = 100;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// The asset pair this engine instance serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConfig {
    /// Underlying asset whose price movement positions track.
    pub underlying: AssetId,
    /// Quote asset both sides lock.
    pub cash: AssetId,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            underlying: AssetId::new("WETH"),
            cash: AssetId::new("USDC"),
        }
    }
}

/// Protocol fee charged on roll executions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFeeConfig {
    /// Fee on the new provider-side locked amount, in basis points.
    #[serde(default)]
    pub fee_bips: u32,
    /// Account the fee is paid to.
    pub recipient: AccountId,
}

impl Default for ProtocolFeeConfig {
    fn default() -> Self {
        Self {
            fee_bips: 0,
            recipient: AccountId::new("protocol-treasury"),
        }
    }
}

/// Bounds on position terms accepted at open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Shortest accepted duration in seconds.
    pub min_duration_secs: u64,
    /// Longest accepted duration in seconds.
    pub max_duration_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: 300,
            max_duration_secs: 365 * 24 * 3600,
        }
    }
}

/// Root engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The asset pair served.
    #[serde(default)]
    pub pair: PairConfig,
    /// The engine's custody account at the asset ledger.
    pub engine_account: AccountId,
    /// Protocol fee settings.
    #[serde(default)]
    pub protocol: ProtocolFeeConfig,
    /// Term bounds.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pair: PairConfig::default(),
            engine_account: AccountId::new("collar-engine"),
            protocol: ProtocolFeeConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Protocol fee rate as basis points.
    #[must_use]
    pub fn protocol_fee_bips(&self) -> BasisPoints {
        BasisPoints::new(self.protocol.fee_bips)
    }

    /// Whether a duration is within the configured bounds.
    #[must_use]
    pub fn duration_in_bounds(&self, duration: DurationSecs) -> bool {
        duration.secs() >= self.limits.min_duration_secs
            && duration.secs() <= self.limits.max_duration_secs
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable
/// interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "engine.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, ConfigError> {
    let path = path.unwrap_or("engine.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<EngineConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: EngineConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let mut result = input.to_string();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    for cap in re.captures_iter(input) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let Some(var_match) = cap.get(1) else {
            continue;
        };
        let full_match = full_match.as_str();
        let var_name = var_match.as_str();
        let default_value = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        };

        result = result.replace(full_match, &value);
    }

    result
}

/// Validate configuration values.
fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.engine_account.as_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "engine_account must not be empty".to_string(),
        ));
    }

    if config.pair.underlying == config.pair.cash {
        return Err(ConfigError::ValidationError(
            "pair.underlying and pair.cash must be different assets".to_string(),
        ));
    }

    if config.protocol.fee_bips > MAX_PROTOCOL_FEE_BIPS {
        return Err(ConfigError::ValidationError(format!(
            "protocol.fee_bips {} exceeds maximum {MAX_PROTOCOL_FEE_BIPS}",
            config.protocol.fee_bips
        )));
    }
    if config.protocol.fee_bips > 0 && config.protocol.recipient.as_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "protocol.recipient must be set when fee_bips > 0".to_string(),
        ));
    }

    if config.limits.min_duration_secs == 0 {
        return Err(ConfigError::ValidationError(
            "limits.min_duration_secs must be positive".to_string(),
        ));
    }
    if config.limits.min_duration_secs > config.limits.max_duration_secs {
        return Err(ConfigError::ValidationError(
            "limits.min_duration_secs exceeds limits.max_duration_secs".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.protocol_fee_bips(), BasisPoints::new(0));
    }

    #[test]
    fn load_minimal_yaml() {
        let config = load_config_from_string("engine_account: engine-1\n").unwrap();
        assert_eq!(config.engine_account, AccountId::new("engine-1"));
        assert_eq!(config.pair, PairConfig::default());
    }

    #[test]
    fn load_full_yaml() {
        let yaml = r"
pair:
  underlying: WBTC
  cash: USDT
engine_account: engine-1
protocol:
  fee_bips: 25
  recipient: treasury
limits:
  min_duration_secs: 600
  max_duration_secs: 86400
";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.pair.underlying, AssetId::new("WBTC"));
        assert_eq!(config.protocol.fee_bips, 25);
        assert!(config.duration_in_bounds(DurationSecs::new(600)));
        assert!(!config.duration_in_bounds(DurationSecs::new(599)));
        assert!(!config.duration_in_bounds(DurationSecs::new(86_401)));
    }

    #[test]
    fn rejects_fee_above_maximum() {
        let yaml = "
engine_account: engine-1
protocol:
  fee_bips: 101
  recipient: treasury
";
        assert!(matches!(
            load_config_from_string(yaml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_identical_pair_assets() {
        let yaml = "
engine_account: engine-1
pair:
  underlying: USDC
  cash: USDC
";
        assert!(load_config_from_string(yaml).is_err());
    }

    #[test]
    fn rejects_zero_min_duration() {
        let yaml = "
engine_account: engine-1
limits:
  min_duration_secs: 0
  max_duration_secs: 100
";
        assert!(load_config_from_string(yaml).is_err());
    }

    #[test]
    fn interpolates_env_var_defaults() {
        let yaml = "engine_account: ${COLLAR_TEST_UNSET_ACCOUNT:-engine-default}\n";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.engine_account, AccountId::new("engine-default"));
    }
}
