//! Runtime configuration for submissions

use crate::error::{Result, WasmAssetHubError};
use crate::keyring::SecretSeed;
use crate::types::Chain;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Finalization wait used when nothing is configured
pub const DEFAULT_FINALIZATION_TIMEOUT_SECS: u64 = 120;

const DEFAULT_CHAIN: &str = "ahpas";

/// Values read from the environment (`PRIVATE_KEY`, `ASSET_ID`, `CHAIN`,
/// `FINALIZATION_TIMEOUT_SECS`) or from an optional `config/assethub` file.
#[derive(Clone, Serialize, Deserialize)]
pub struct AssetHubConfig {
    /// Hex-encoded signing seed
    #[serde(default)]
    pub private_key: Option<String>,
    /// Asset used when a caller does not name one
    #[serde(default)]
    pub asset_id: Option<u32>,
    /// Chain preset key, e.g. `ahpas`
    #[serde(default = "default_chain")]
    pub chain: String,
    #[serde(default = "default_finalization_timeout_secs")]
    pub finalization_timeout_secs: u64,
}

fn default_chain() -> String {
    DEFAULT_CHAIN.to_string()
}

fn default_finalization_timeout_secs() -> u64 {
    DEFAULT_FINALIZATION_TIMEOUT_SECS
}

impl Default for AssetHubConfig {
    fn default() -> Self {
        AssetHubConfig {
            private_key: None,
            asset_id: None,
            chain: default_chain(),
            finalization_timeout_secs: DEFAULT_FINALIZATION_TIMEOUT_SECS,
        }
    }
}

impl AssetHubConfig {
    /// Load from defaults, then `config/assethub.*` if present, then the
    /// process environment
    pub fn load() -> Result<Self> {
        Self::load_with_env(config::Environment::default())
    }

    /// Same layering as [`AssetHubConfig::load`] with a caller-supplied
    /// environment source
    pub fn load_with_env(env: config::Environment) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/assethub").required(false))
            .add_source(env);
        Self::from_builder(builder)
    }

    /// Apply defaults on top of a caller-assembled builder and deserialize
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .set_default("chain", DEFAULT_CHAIN)?
            .set_default(
                "finalization_timeout_secs",
                DEFAULT_FINALIZATION_TIMEOUT_SECS,
            )?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// The timeout is kept in whole seconds. A sub-second remainder rounds
    /// up, so only `Duration::ZERO` yields a zero wait.
    pub fn with_finalization_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs();
        self.finalization_timeout_secs = if timeout.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        };
        self
    }

    /// Configured signing seed
    pub fn seed(&self) -> Result<SecretSeed> {
        match self.private_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => SecretSeed::parse(key),
            _ => Err(WasmAssetHubError::MissingConfig("PRIVATE_KEY")),
        }
    }

    pub fn default_asset_id(&self) -> Result<u32> {
        self.asset_id
            .ok_or(WasmAssetHubError::MissingConfig("ASSET_ID"))
    }

    pub fn chain(&self) -> Result<Chain> {
        Chain::from_key(&self.chain)
    }

    pub fn finalization_timeout(&self) -> Duration {
        Duration::from_secs(self.finalization_timeout_secs)
    }
}

impl fmt::Debug for AssetHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHubConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("asset_id", &self.asset_id)
            .field("chain", &self.chain)
            .field("finalization_timeout_secs", &self.finalization_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

    #[test]
    fn test_defaults_apply() {
        let config = AssetHubConfig::from_builder(config::Config::builder()).unwrap();
        assert_eq!(config.chain, "ahpas");
        assert_eq!(config.finalization_timeout(), Duration::from_secs(120));
        assert!(matches!(
            config.seed(),
            Err(WasmAssetHubError::MissingConfig("PRIVATE_KEY"))
        ));
        assert!(matches!(
            config.default_asset_id(),
            Err(WasmAssetHubError::MissingConfig("ASSET_ID"))
        ));
    }

    #[test]
    fn test_overrides() {
        let builder = config::Config::builder()
            .set_override("private_key", SEED)
            .unwrap()
            .set_override("asset_id", 1984)
            .unwrap()
            .set_override("chain", "ahksm")
            .unwrap()
            .set_override("finalization_timeout_secs", 30)
            .unwrap();
        let config = AssetHubConfig::from_builder(builder).unwrap();

        assert!(config.seed().is_ok());
        assert_eq!(config.default_asset_id().unwrap(), 1984);
        assert_eq!(config.chain().unwrap(), Chain::kusama_asset_hub());
        assert_eq!(config.finalization_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_environment_values_are_parsed() {
        let vars = config::Map::from([
            ("PRIVATE_KEY".to_string(), SEED.to_string()),
            ("ASSET_ID".to_string(), "1984".to_string()),
            ("CHAIN".to_string(), "ahksm".to_string()),
            ("FINALIZATION_TIMEOUT_SECS".to_string(), "30".to_string()),
        ]);
        let env = config::Environment::default().source(Some(vars));
        let config = AssetHubConfig::load_with_env(env).unwrap();

        assert!(config.seed().is_ok());
        assert_eq!(config.default_asset_id().unwrap(), 1984);
        assert_eq!(config.chain().unwrap(), Chain::kusama_asset_hub());
        assert_eq!(config.finalization_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_environment_rejects_non_numeric_asset_id() {
        let vars = config::Map::from([("ASSET_ID".to_string(), "usdt".to_string())]);
        let env = config::Environment::default().source(Some(vars));
        assert!(AssetHubConfig::load_with_env(env).is_err());
    }

    #[test]
    fn test_finalization_timeout_rounds_up_to_whole_seconds() {
        let stored = |timeout| {
            AssetHubConfig::default()
                .with_finalization_timeout(timeout)
                .finalization_timeout()
        };
        assert_eq!(stored(Duration::from_millis(500)), Duration::from_secs(1));
        assert_eq!(stored(Duration::from_millis(2001)), Duration::from_secs(3));
        assert_eq!(stored(Duration::from_secs(7)), Duration::from_secs(7));
        assert_eq!(stored(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_blank_private_key_is_missing() {
        let config = AssetHubConfig::default().with_private_key("   ");
        assert!(matches!(
            config.seed(),
            Err(WasmAssetHubError::MissingConfig("PRIVATE_KEY"))
        ));
    }

    #[test]
    fn test_malformed_private_key() {
        let config = AssetHubConfig::default().with_private_key("zz");
        assert!(matches!(config.seed(), Err(WasmAssetHubError::InvalidSeed(_))));
    }

    #[test]
    fn test_unknown_chain() {
        let builder = config::Config::builder()
            .set_override("chain", "nowhere")
            .unwrap();
        let config = AssetHubConfig::from_builder(builder).unwrap();
        assert!(config.chain().is_err());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = AssetHubConfig::default().with_private_key(SEED);
        assert!(!format!("{:?}", config).contains("9d61"));
    }
}
