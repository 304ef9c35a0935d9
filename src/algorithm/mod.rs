mod math;

pub mod pool;

pub use math::*;
pub use pool::{PoolError, PoolId, PoolStore, QueryOutcome, WriteOutcome, WriteStatus};
