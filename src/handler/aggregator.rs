use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{error, warn};

use crate::{
    cache::PriceCache,
    configuration::Config,
    error::Error,
    model::{reconcile, StatusSnapshot},
    provider::{FetchOptions, Upstream},
    types::{block_height, mempool_size, PriceQuote},
};

/// Fans out to the price, chain info and mempool feeds and merges them into
/// one [`StatusSnapshot`]. Price and info are required, the mempool is
/// best-effort.
#[derive(Debug)]
pub struct StatusAggregator<U> {
    upstream: Arc<U>,
    price_cache: PriceCache<U>,
    info_url: String,
    mempool_url: String,
    coin_id: String,
}

impl<U: Upstream> StatusAggregator<U> {
    pub fn new(upstream: Arc<U>, config: &Config) -> Self {
        let price_cache = PriceCache::new(
            Arc::clone(&upstream),
            config.price_url.to_owned(),
            config.cache_ttl(),
        );

        Self {
            upstream,
            price_cache,
            info_url: config.info_url.to_owned(),
            mempool_url: config.mempool_url.to_owned(),
            coin_id: config.coin_id.to_owned(),
        }
    }

    pub fn price_cache(&self) -> &PriceCache<U> {
        &self.price_cache
    }

    pub async fn get_status(&self) -> Result<StatusSnapshot, Error> {
        let (price, info, mempool) = tokio::join!(
            self.price_cache.get(),
            self.upstream.fetch(&self.info_url, FetchOptions::default()),
            self.fetch_mempool(),
        );

        let price = price.map_err(|source| {
            error!("Price feed failed: {}", source);
            Error::Aggregation {
                upstream: "price",
                source,
            }
        })?;
        let info = info.map_err(|source| {
            error!("Chain info feed failed: {}", source);
            Error::Aggregation {
                upstream: "info",
                source,
            }
        })?;

        Ok(self.assemble(&price, &info, mempool.as_ref()))
    }

    async fn fetch_mempool(&self) -> Option<Value> {
        match self
            .upstream
            .fetch(&self.mempool_url, FetchOptions::insecure())
            .await
        {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Mempool feed unavailable: {}", e);
                None
            },
        }
    }

    fn assemble(
        &self,
        price: &Value,
        info: &Value,
        mempool: Option<&Value>,
    ) -> StatusSnapshot {
        let quote = PriceQuote::parse(price, &self.coin_id);
        let value_pools = reconcile(info, quote.circulating_supply);

        StatusSnapshot {
            timestamp: Utc::now().timestamp_millis(),
            price_usd: quote.price_usd,
            price_change_24h: quote.price_change_24h,
            market_cap_usd: quote.market_cap_usd,
            market_cap_change_24h: quote.market_cap_change_24h,
            market_cap_change_usd: quote.market_cap_change_usd,
            circulating_supply: quote.circulating_supply,
            height: block_height(info),
            mempool_size: mempool.map_or(0, mempool_size),
            value_pools,
        }
    }
}
