use serde::{Deserialize, Serialize};

use crate::model::ValuePools;

/// Body of `GET /api/status`. Numeric fields are either finite or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Unix time in milliseconds at which the snapshot was assembled.
    pub timestamp: i64,
    pub price_usd: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub market_cap_change_24h: Option<f64>,
    pub market_cap_change_usd: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub height: Option<u64>,
    pub mempool_size: u64,
    pub value_pools: ValuePools,
}
