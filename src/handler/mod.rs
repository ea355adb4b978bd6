pub mod aggregator;
pub mod cache_warmup;
