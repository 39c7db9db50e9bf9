// Metric identifiers and fetch status

use serde::{Deserialize, Serialize};

/// One tracked quantity. The serialized names match the widget keys of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricId {
    Tps,
    BlockTime,
    GasPrice,
    Price,
    MarketCap,
    Staked,
    Validators,
}

impl MetricId {
    pub const ALL: [MetricId; 7] = [
        MetricId::Tps,
        MetricId::BlockTime,
        MetricId::GasPrice,
        MetricId::Price,
        MetricId::MarketCap,
        MetricId::Staked,
        MetricId::Validators,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricId::Tps => "tps",
            MetricId::BlockTime => "blocktime",
            MetricId::GasPrice => "gasprice",
            MetricId::Price => "price",
            MetricId::MarketCap => "marketcap",
            MetricId::Staked => "staked",
            MetricId::Validators => "validators",
        }
    }

    /// Fraction digits shown on the widget.
    pub fn decimals(&self) -> usize {
        match self {
            MetricId::Tps | MetricId::MarketCap | MetricId::Staked => 1,
            MetricId::BlockTime | MetricId::GasPrice => 2,
            MetricId::Price => 4,
            MetricId::Validators => 0,
        }
    }

    /// Value shown before the first successful fetch.
    pub fn initial_value(&self) -> f64 {
        match self {
            MetricId::BlockTime => 0.5,
            _ => 0.0,
        }
    }

    pub fn format(&self, value: f64) -> String {
        format!("{:.*}", self.decimals(), value)
    }
}

impl std::fmt::Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the most recent fetch for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unknown,
    Success,
    Error,
}
