// Config loading and validation tests

use telos_dashboard::config::{AppConfig, DEFAULT_RPC_URL, DEFAULT_STAKED_CONTRACT};

const VALID_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[chain]
rpc_url = "https://rpc.telos.net"
staked_contract = "0xB4B01216a5Bc8F1C8A33CD990A1239030E60C905"
request_timeout_ms = 5000

[price]
url = "https://api.coingecko.com/api/v3/simple/price?ids=telos&vs_currencies=usd&include_market_cap=true"
asset = "telos"
request_timeout_ms = 5000

[polling]
interval_ms = 10000
max_data_points = 20
broadcast_capacity = 64
validator_count = 21
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.chain.request_timeout_ms, 5000);
    assert_eq!(config.price.asset, "telos");
    assert_eq!(config.polling.interval_ms, 10_000);
    assert_eq!(config.polling.max_data_points, 20);
    assert_eq!(config.polling.validator_count, 21);
}

#[test]
fn test_config_empty_file_uses_defaults() {
    let config = AppConfig::load_from_str("").expect("defaults");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.chain.rpc_url, DEFAULT_RPC_URL);
    assert_eq!(config.chain.staked_contract, DEFAULT_STAKED_CONTRACT);
    assert_eq!(config.price.asset, "telos");
    assert_eq!(config.polling.interval_ms, 10_000);
    assert_eq!(config.polling.max_data_points, 20);
}

#[test]
fn test_config_partial_section_fills_defaults() {
    let config = AppConfig::load_from_str("[polling]\ninterval_ms = 2500\n").expect("valid");
    assert_eq!(config.polling.interval_ms, 2500);
    assert_eq!(config.polling.broadcast_capacity, 64);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8081", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_non_http_rpc_url() {
    let bad = VALID_CONFIG.replace("rpc_url = \"https://rpc.telos.net\"", "rpc_url = \"wss://rpc.telos.net\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("chain.rpc_url"));
}

#[test]
fn test_config_validation_rejects_bad_contract_address() {
    let bad = VALID_CONFIG.replace(
        "0xB4B01216a5Bc8F1C8A33CD990A1239030E60C905",
        "0xB4B01216",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("chain.staked_contract"));
}

#[test]
fn test_config_validation_rejects_empty_asset() {
    let bad = VALID_CONFIG.replace("asset = \"telos\"", "asset = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("price.asset"));
}

#[test]
fn test_config_validation_rejects_interval_zero() {
    let bad = VALID_CONFIG.replace("interval_ms = 10000", "interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("polling.interval_ms"));
}

#[test]
fn test_config_validation_rejects_max_data_points_zero() {
    let bad = VALID_CONFIG.replace("max_data_points = 20", "max_data_points = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_data_points"));
}

#[test]
fn test_config_validation_rejects_broadcast_capacity_zero() {
    let bad = VALID_CONFIG.replace("broadcast_capacity = 64", "broadcast_capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("broadcast_capacity"));
}

#[test]
fn test_config_validation_rejects_timeout_zero() {
    let bad = VALID_CONFIG.replacen("request_timeout_ms = 5000", "request_timeout_ms = 0", 1);
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("chain.request_timeout_ms"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.chain.request_timeout_ms, 5000);
}
