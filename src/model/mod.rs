pub use self::{
    status_snapshot::StatusSnapshot,
    value_pools::{reconcile, ValuePools},
};

mod status_snapshot;
mod value_pools;
