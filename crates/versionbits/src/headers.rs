//! Read-only access to block headers needed by the state machine.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use iop_consensus::Hash256;

/// The header fields versionbits evaluation reads from a chain index.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeaderInfo {
    pub hash: Hash256,
    pub prev_hash: Hash256,
    pub height: u32,
    pub version: u32,
    pub time: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LookupError {
    Backend(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Backend(message) => write!(f, "header lookup failed: {message}"),
        }
    }
}

impl std::error::Error for LookupError {}

pub trait HeaderLookup: Send + Sync {
    fn header(&self, hash: &Hash256) -> Result<Option<HeaderInfo>, LookupError>;
}

impl<T: HeaderLookup + ?Sized> HeaderLookup for Arc<T> {
    fn header(&self, hash: &Hash256) -> Result<Option<HeaderInfo>, LookupError> {
        self.as_ref().header(hash)
    }
}

impl<T: HeaderLookup + ?Sized> HeaderLookup for &T {
    fn header(&self, hash: &Hash256) -> Result<Option<HeaderInfo>, LookupError> {
        (**self).header(hash)
    }
}

/// Hash-indexed header set kept in memory. Forks may coexist.
#[derive(Default)]
pub struct MemoryHeaders {
    inner: RwLock<HashMap<Hash256, HeaderInfo>>,
}

impl MemoryHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, header: HeaderInfo) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(header.hash, header);
    }

    pub fn remove(&self, hash: &Hash256) -> Option<HeaderInfo> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.remove(hash)
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HeaderLookup for MemoryHeaders {
    fn header(&self, hash: &Hash256) -> Result<Option<HeaderInfo>, LookupError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| LookupError::Backend("memory header index lock poisoned".to_string()))?;
        Ok(guard.get(hash).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(tag: u8, prev: u8, height: u32) -> HeaderInfo {
        HeaderInfo {
            hash: [tag; 32],
            prev_hash: [prev; 32],
            height,
            version: 1,
            time: 1_463_452_384 + height,
        }
    }

    #[test]
    fn insert_lookup_remove() {
        let headers = MemoryHeaders::new();
        assert!(headers.is_empty());
        headers.insert(header(1, 0, 0));
        headers.insert(header(2, 1, 1));
        headers.insert(header(3, 1, 1));
        assert_eq!(headers.len(), 3);

        let fork = headers.header(&[3; 32]).expect("lookup").expect("present");
        assert_eq!(fork.prev_hash, [1; 32]);
        assert_eq!(fork.height, 1);

        assert_eq!(headers.remove(&[2; 32]).map(|h| h.height), Some(1));
        assert_eq!(headers.header(&[2; 32]).expect("lookup"), None);
    }

    #[test]
    fn shared_through_arc() {
        let headers = Arc::new(MemoryHeaders::new());
        headers.insert(header(9, 0, 0));
        let lookup: &dyn HeaderLookup = &headers;
        assert!(lookup.header(&[9; 32]).expect("lookup").is_some());
    }
}
