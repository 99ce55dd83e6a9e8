use std::collections::{HashMap, VecDeque};
use std::sync::{PoisonError, RwLock};

use iop_consensus::Hash256;

use crate::state::ThresholdState;

pub const DEFAULT_STATE_CACHE_ENTRIES: usize = 16_384;

type CacheKey = (usize, Hash256);

struct Entries {
    states: HashMap<CacheKey, ThresholdState>,
    order: VecDeque<CacheKey>,
}

/// Boundary states keyed by deployment index and block hash.
///
/// Lookups take the read lock; inserts never overwrite an existing entry, so
/// racing evaluations of the same block keep the first result.
pub struct StateCache {
    inner: RwLock<Entries>,
    capacity: usize,
}

impl StateCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Entries {
                states: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, deployment: usize, hash: &Hash256) -> Option<ThresholdState> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.states.get(&(deployment, *hash)).copied()
    }

    /// Stores `state` unless an entry exists; returns the state now cached.
    pub fn insert(&self, deployment: usize, hash: Hash256, state: ThresholdState) -> ThresholdState {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let key = (deployment, hash);
        if let Some(existing) = guard.states.get(&key) {
            return *existing;
        }
        guard.states.insert(key, state);
        guard.order.push_back(key);
        while guard.states.len() > self.capacity {
            let Some(evicted) = guard.order.pop_front() else {
                break;
            };
            guard.states.remove(&evicted);
        }
        state
    }

    /// Drops every deployment's entry for `hash`; returns how many were removed.
    pub fn remove_block(&self, hash: &Hash256) -> usize {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = guard.states.len();
        guard.states.retain(|(_, cached), _| cached != hash);
        guard.order.retain(|(_, cached)| cached != hash);
        before - guard.states.len()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .states
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.states.clear();
        guard.order.clear();
    }
}

impl Default for StateCache {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_CACHE_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_wins() {
        let cache = StateCache::new(8);
        assert_eq!(
            cache.insert(0, [1; 32], ThresholdState::Started),
            ThresholdState::Started
        );
        assert_eq!(
            cache.insert(0, [1; 32], ThresholdState::Failed),
            ThresholdState::Started
        );
        assert_eq!(cache.get(0, &[1; 32]), Some(ThresholdState::Started));
        assert_eq!(cache.get(1, &[1; 32]), None);
    }

    #[test]
    fn evicts_oldest_first() {
        let cache = StateCache::new(2);
        cache.insert(0, [1; 32], ThresholdState::Defined);
        cache.insert(0, [2; 32], ThresholdState::Started);
        cache.insert(0, [3; 32], ThresholdState::LockedIn);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(0, &[1; 32]), None);
        assert_eq!(cache.get(0, &[3; 32]), Some(ThresholdState::LockedIn));
    }

    #[test]
    fn remove_block_covers_all_deployments() {
        let cache = StateCache::new(16);
        cache.insert(0, [7; 32], ThresholdState::Active);
        cache.insert(3, [7; 32], ThresholdState::Defined);
        cache.insert(0, [8; 32], ThresholdState::Active);
        assert_eq!(cache.remove_block(&[7; 32]), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(3, &[7; 32]), None);

        cache.clear();
        assert!(cache.is_empty());
    }
}
