use serde::Deserialize;

pub const DEFAULT_RPC_URL: &str = "https://rpc.telos.net";
/// sTLOS vault; `totalAssets()` is the staked supply.
pub const DEFAULT_STAKED_CONTRACT: &str = "0xB4B01216a5Bc8F1C8A33CD990A1239030E60C905";
pub const DEFAULT_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price?ids=telos&vs_currencies=usd&include_market_cap=true";
pub const DEFAULT_PRICE_ASSET: &str = "telos";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub price: PriceConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

fn default_port() -> u16 {
    8081
}

fn default_host() -> String {
    "0.0.0.0".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Address of the ERC-4626 vault whose `totalAssets()` is reported as staked supply.
    #[serde(default = "default_staked_contract")]
    pub staked_contract: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            staked_contract: default_staked_contract(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.into()
}

fn default_staked_contract() -> String {
    DEFAULT_STAKED_CONTRACT.into()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceConfig {
    #[serde(default = "default_price_url")]
    pub url: String,
    /// Top-level key of the price response (e.g. `telos`).
    #[serde(default = "default_price_asset")]
    pub asset: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            url: default_price_url(),
            asset: default_price_asset(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_price_url() -> String {
    DEFAULT_PRICE_URL.into()
}

fn default_price_asset() -> String {
    DEFAULT_PRICE_ASSET.into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Start-to-start period between fetch cycles.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Capacity of every metric's time series.
    #[serde(default = "default_max_data_points")]
    pub max_data_points: usize,
    /// Max number of dashboard events kept for /ws/dashboard (slow clients may lag).
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
    /// No live validator source exists; this value is reported as-is.
    #[serde(default = "default_validator_count")]
    pub validator_count: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_data_points: default_max_data_points(),
            broadcast_capacity: default_broadcast_capacity(),
            validator_count: default_validator_count(),
        }
    }
}

fn default_interval_ms() -> u64 {
    10_000
}

fn default_max_data_points() -> usize {
    crate::series::DEFAULT_CAPACITY
}

fn default_broadcast_capacity() -> usize {
    64
}

fn default_validator_count() -> u32 {
    21
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.chain.rpc_url.starts_with("http://") || self.chain.rpc_url.starts_with("https://"),
            "chain.rpc_url must be an http(s) URL, got {:?}",
            self.chain.rpc_url
        );
        anyhow::ensure!(
            is_address(&self.chain.staked_contract),
            "chain.staked_contract must be 0x followed by 40 hex digits, got {:?}",
            self.chain.staked_contract
        );
        anyhow::ensure!(
            self.chain.request_timeout_ms > 0,
            "chain.request_timeout_ms must be > 0, got {}",
            self.chain.request_timeout_ms
        );
        anyhow::ensure!(
            self.price.url.starts_with("http://") || self.price.url.starts_with("https://"),
            "price.url must be an http(s) URL, got {:?}",
            self.price.url
        );
        anyhow::ensure!(!self.price.asset.is_empty(), "price.asset must be non-empty");
        anyhow::ensure!(
            self.price.request_timeout_ms > 0,
            "price.request_timeout_ms must be > 0, got {}",
            self.price.request_timeout_ms
        );
        anyhow::ensure!(
            self.polling.interval_ms > 0,
            "polling.interval_ms must be > 0, got {}",
            self.polling.interval_ms
        );
        anyhow::ensure!(
            self.polling.max_data_points > 0,
            "polling.max_data_points must be > 0, got {}",
            self.polling.max_data_points
        );
        anyhow::ensure!(
            self.polling.broadcast_capacity > 0,
            "polling.broadcast_capacity must be > 0, got {}",
            self.polling.broadcast_capacity
        );
        Ok(())
    }
}

fn is_address(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
