use serde_json::Value;

use crate::helpers::{first_present, sanitize_number};

/// Normalized view of a price feed payload.
///
/// The feed answers either with a list of market entries (the first one is
/// used) or with a map keyed by coin id. Field names differ between the two
/// shapes, the market-list name is tried first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceQuote {
    pub price_usd: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub market_cap_change_24h: Option<f64>,
    pub market_cap_change_usd: Option<f64>,
    pub circulating_supply: Option<f64>,
}

impl PriceQuote {
    pub fn parse(payload: &Value, coin_id: &str) -> PriceQuote {
        let entry = match payload {
            Value::Array(entries) => entries.first(),
            Value::Object(map) => map.get(coin_id),
            _ => None,
        };

        match entry {
            Some(entry) => PriceQuote::from_entry(entry),
            None => PriceQuote::default(),
        }
    }

    fn from_entry(entry: &Value) -> PriceQuote {
        let field = |keys: &[&str]| sanitize_number(first_present(entry, keys));

        PriceQuote {
            price_usd: field(&["current_price", "usd"]),
            price_change_24h: field(&[
                "price_change_percentage_24h",
                "usd_24h_change",
            ]),
            market_cap_usd: field(&["market_cap", "usd_market_cap"]),
            market_cap_change_24h: field(&["market_cap_change_percentage_24h"]),
            market_cap_change_usd: field(&["market_cap_change_24h"]),
            circulating_supply: field(&["circulating_supply"]),
        }
    }
}
