pub use self::{
    chain_info::{block_height, chain_value, value_pool_records},
    mempool::mempool_size,
    price_feed::PriceQuote,
};

mod chain_info;
mod mempool;
mod price_feed;
