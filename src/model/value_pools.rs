use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    helpers::sanitize_f64,
    types::{chain_value, value_pool_records},
};

/// Coin supply split across the chain's value pools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePools {
    pub transparent: f64,
    pub sprout: f64,
    pub sapling: f64,
    pub orchard: f64,
    pub lockbox: f64,
    pub shielded: f64,
    pub total_chain: f64,
}

/// Builds a consistent pool breakdown from a blockchain info payload.
///
/// `circulating_supply`, when positive, is taken as the chain total. Feeds
/// that leave the transparent pool out (or report it as non-positive) get it
/// derived as `total - shielded - lockbox`; an implausible derivation leaves
/// it at 0.
pub fn reconcile(info: &Value, circulating_supply: Option<f64>) -> ValuePools {
    let records = value_pool_records(info);

    let transparent = chain_value(records, "transparent");
    let sprout = chain_value(records, "sprout");
    let sapling = chain_value(records, "sapling");
    let orchard = chain_value(records, "orchard");
    let lockbox = chain_value(records, "lockbox");

    let shielded = sprout + sapling + orchard;
    let total_from_info = transparent + shielded + lockbox;

    let total_chain = match circulating_supply {
        Some(supply) if supply.is_finite() && supply > 0.0 => supply,
        _ => total_from_info,
    };

    let mut transparent = transparent;
    if transparent <= 0.0 && total_chain.is_finite() {
        let inferred = total_chain - shielded - lockbox;
        transparent = if inferred.is_finite() && inferred > 0.0 {
            inferred
        } else {
            0.0
        };
    }

    ValuePools {
        transparent: sanitize_f64(transparent).unwrap_or(0.0),
        sprout,
        sapling,
        orchard,
        lockbox,
        shielded: sanitize_f64(shielded).unwrap_or(0.0),
        total_chain: sanitize_f64(total_chain).unwrap_or(0.0),
    }
}
