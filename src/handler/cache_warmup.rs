//! Primes the price cache at startup so the first dashboard poll does not
//! pay for the price feed round trip.

use tracing::{info, warn};

use crate::{
    cache::PriceCache,
    configuration::{AppState, State},
    error::Error,
    provider::Upstream,
};

pub async fn cache_warmup_task(app_state: AppState<State>) -> Result<(), Error> {
    if !app_state.config.cache_warmup {
        return Ok(());
    }

    warm(app_state.status.price_cache()).await;
    Ok(())
}

/// Returns whether the cache now holds a value. Failures are only logged,
/// the next status request will try again.
pub async fn warm<U: Upstream>(cache: &PriceCache<U>) -> bool {
    info!("Warming price cache from {}", cache.url());

    match cache.get().await {
        Ok(_) => {
            info!("Price cache warm, ttl {:?}", cache.ttl());
            true
        },
        Err(e) => {
            warn!("Price cache warm-up failed: {}", e);
            false
        },
    }
}
