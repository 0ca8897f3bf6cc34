//! Configuration types for wasmswap

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Network};

/// Chain connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// LCD (REST) endpoint URL (e.g., "https://lcd-juno.itastakers.com")
    pub lcd_url: String,

    /// Chain ID the transactions are signed for
    pub chain_id: String,

    /// Denom used to pay transaction fees
    pub fee_denom: String,

    /// Gas price in `fee_denom` micro-units per unit of gas
    #[serde(default = "default_gas_price")]
    pub gas_price: f64,

    /// Baseline gas limit for a single contract execution
    #[serde(default = "default_gas")]
    pub default_gas: u64,
}

fn default_gas_price() -> f64 {
    0.0025
}

fn default_gas() -> u64 {
    400_000
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            lcd_url: "http://127.0.0.1:1317".to_string(),
            chain_id: "juno-1".to_string(),
            fee_denom: "ujuno".to_string(),
            gas_price: default_gas_price(),
            default_gas: default_gas(),
        }
    }
}

/// Per-operation scaling of `ChainConfig::default_gas`.
///
/// These factors come from the deployed contracts' observed gas use and
/// are not derived from any chain-side formula. Override them per chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasMultipliers {
    pub swap: f64,
    pub swap_with_allowance: f64,
    pub pass_through_swap: f64,
    pub add_liquidity: f64,
    pub remove_liquidity: f64,
    pub stake: f64,
    pub unstake: f64,
    pub claim: f64,
}

impl Default for GasMultipliers {
    fn default() -> Self {
        Self {
            swap: 1.0,
            swap_with_allowance: 1.2,
            pass_through_swap: 2.0,
            add_liquidity: 1.0,
            remove_liquidity: 1.0,
            stake: 2.6,
            unstake: 2.6,
            claim: 1.0,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chain connection settings
    pub chain: ChainConfig,

    /// Network (mainnet or testnet)
    pub network: Network,

    /// Gas scaling per operation
    #[serde(default)]
    pub gas: GasMultipliers,

    /// Identity (denom or contract address) of the routing base token
    #[serde(default = "default_base_token")]
    pub base_token: String,

    /// Slippage applied when a request does not carry one (basis points)
    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: u32,

    /// How long a broadcast may wait for inclusion before its outcome is unknown
    #[serde(default = "default_broadcast_timeout_secs")]
    pub broadcast_timeout_secs: u64,

    /// Timeout for read-only chain queries
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Interface the API server binds to
    #[serde(default = "default_api_host")]
    pub api_host: IpAddr,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// JSON file listing known pools and their token metadata
    #[serde(default)]
    pub pools_file: Option<PathBuf>,
}

fn default_base_token() -> String {
    "ujuno".to_string()
}

fn default_slippage_bps() -> u32 {
    100
}

fn default_broadcast_timeout_secs() -> u64 {
    60
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_api_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_api_port() -> u16 {
    19317
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            network: Network::Mainnet,
            gas: GasMultipliers::default(),
            base_token: default_base_token(),
            default_slippage_bps: default_slippage_bps(),
            broadcast_timeout_secs: default_broadcast_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            api_host: default_api_host(),
            api_port: default_api_port(),
            pools_file: None,
        }
    }
}

impl AppConfig {
    /// Socket address the API server listens on
    pub fn api_addr(&self) -> SocketAddr {
        SocketAddr::new(self.api_host, self.api_port)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        if config.default_slippage_bps >= 10_000 {
            return Err(Error::Config(format!(
                "default_slippage_bps must be below 10000, got {}",
                config.default_slippage_bps
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.chain.lcd_url, "http://127.0.0.1:1317");
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.api_port, 19317);
        assert_eq!(config.base_token, "ujuno");
        assert_eq!(config.gas.pass_through_swap, 2.0);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = AppConfig::from_json(&json).unwrap();
        assert_eq!(parsed.chain.lcd_url, config.chain.lcd_url);
        assert_eq!(parsed.gas, config.gas);
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let json = r#"{
            "chain": {
                "lcd_url": "https://lcd.example.org",
                "chain_id": "uni-6",
                "fee_denom": "ujunox"
            },
            "network": "testnet",
            "gas": { "stake": 3.0 }
        }"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.chain.default_gas, 400_000);
        assert_eq!(config.gas.stake, 3.0);
        assert_eq!(config.gas.swap_with_allowance, 1.2);
        assert_eq!(config.default_slippage_bps, 100);
        assert!(config.pools_file.is_none());
        assert_eq!(config.api_addr().to_string(), "127.0.0.1:19317");
    }

    #[test]
    fn test_api_bind_address() {
        let json = r#"{
            "chain": { "lcd_url": "http://lcd", "chain_id": "juno-1", "fee_denom": "ujuno" },
            "network": "mainnet",
            "api_host": "0.0.0.0",
            "api_port": 8080
        }"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.api_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_rejects_full_slippage() {
        let mut config = AppConfig::default();
        config.default_slippage_bps = 10_000;
        let json = serde_json::to_string(&config).unwrap();
        assert!(matches!(AppConfig::from_json(&json), Err(Error::Config(_))));
    }
}
