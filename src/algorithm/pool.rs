use std::error::Error;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::algorithm::try_percentile;

#[derive(Debug, Clone, PartialEq)]
pub enum PoolError {
    InvalidInput(String),
    NotFound(PoolId),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PoolError::InvalidInput(message) => write!(f, "invalid input: {}", message),
            PoolError::NotFound(id) => write!(f, "pool {} not found", id),
        }
    }
}

impl Error for PoolError {}

/// Client-assigned pool identifier.
///
/// Any finite number is accepted. Identifiers compare by numeric value, so
/// `1` and `1.0` name the same pool and so do `0.0` and `-0.0`.
#[derive(Debug, Clone, Copy)]
pub struct PoolId(f64);

impl PoolId {
    pub fn new(id: f64) -> Result<Self, PoolError> {
        if !id.is_finite() {
            return Err(PoolError::InvalidInput(format!(
                "pool id must be a finite number, got {}",
                id
            )));
        }

        // fold -0.0 into 0.0 so both hash alike
        Ok(Self(if id == 0.0 { 0.0 } else { id }))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for PoolId {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for PoolId {}

impl Hash for PoolId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for PoolId {
    type Error = PoolError;

    fn try_from(id: f64) -> Result<Self, Self::Error> {
        PoolId::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Created,
    Appended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteOutcome {
    pub status: WriteStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOutcome {
    /// `None` when the rank names an order statistic the pool does not hold.
    pub quantile: Option<f64>,
    pub count: usize,
}

/// In-memory, append-only pools keyed by [`PoolId`].
///
/// The map is sharded and every pool carries its own lock: writers to one
/// pool never block readers of another, and a query always observes a pool
/// either before or after a whole batch was appended.
#[derive(Default)]
pub struct PoolStore {
    pools: DashMap<PoolId, Arc<RwLock<Vec<f64>>>>,
}

impl PoolStore {
    pub fn new() -> Self {
        Self {
            pools: DashMap::new(),
        }
    }

    pub fn append_or_create(&self, id: PoolId, values: &[f64]) -> WriteOutcome {
        if let Some(pool) = self.lookup(&id) {
            return Self::append(&pool, values);
        }

        match self.pools.entry(id) {
            Entry::Occupied(entry) => {
                // another writer created it between lookup and entry
                let pool = entry.get().clone();
                drop(entry);
                Self::append(&pool, values)
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(RwLock::new(values.to_vec())));
                WriteOutcome {
                    status: WriteStatus::Created,
                    count: values.len(),
                }
            }
        }
    }

    pub fn get(&self, id: PoolId) -> Result<Vec<f64>, PoolError> {
        match self.lookup(&id) {
            Some(pool) => Ok(pool.read().clone()),
            None => Err(PoolError::NotFound(id)),
        }
    }

    pub fn count(&self, id: PoolId) -> Result<usize, PoolError> {
        match self.lookup(&id) {
            Some(pool) => Ok(pool.read().len()),
            None => Err(PoolError::NotFound(id)),
        }
    }

    pub fn query(&self, id: PoolId, p: f64) -> Result<QueryOutcome, PoolError> {
        let pool = self.lookup(&id).ok_or(PoolError::NotFound(id))?;
        let values = pool.read();

        Ok(QueryOutcome {
            quantile: try_percentile(&values, p),
            count: values.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    fn lookup(&self, id: &PoolId) -> Option<Arc<RwLock<Vec<f64>>>> {
        // clone the handle so the shard lock is released before the pool lock is taken
        self.pools.get(id).map(|pool| pool.value().clone())
    }

    fn append(pool: &RwLock<Vec<f64>>, values: &[f64]) -> WriteOutcome {
        let mut pool = pool.write();
        pool.extend_from_slice(values);

        WriteOutcome {
            status: WriteStatus::Appended,
            count: pool.len(),
        }
    }
}
