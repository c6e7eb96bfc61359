//! Bounded batch fetching of indexed on-chain collections.
//!
//! # Data Flow
//! ```text
//! (offset, limit)
//!     → PageRequest::new (limit in 1..=1000)
//!     → total count query (once)
//!     → item queries offset..min(offset+limit, total), concurrently
//!     → Page { data (index order), more }
//! ```

use alloy::primitives::U256;
use futures_util::future::try_join_all;
use serde::Serialize;
use std::future::Future;

use crate::blockchain::types::{SdkError, SdkResult};
use crate::config::constants::MAX_PAGE_LIMIT;

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Validate `offset`/`limit`.
    pub fn new(offset: u64, limit: u64) -> SdkResult<Self> {
        if limit == 0 {
            return Err(SdkError::Range("limit must be greater than 0".to_string()));
        }
        if limit > MAX_PAGE_LIMIT {
            return Err(SdkError::Constraint(format!(
                "max limit is {MAX_PAGE_LIMIT}, got {limit}"
            )));
        }
        Ok(Self { offset, limit })
    }

    /// Exclusive end of the window, clamped to `total`.
    fn end(&self, total: u64) -> u64 {
        total.min(self.offset.saturating_add(self.limit))
    }
}

/// One page of a remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Strictly more items exist beyond this window.
    pub more: bool,
}

impl<T> Page<T> {
    fn empty() -> Self {
        Self {
            data: Vec::new(),
            more: false,
        }
    }
}

/// Fetch one page: count once, then every item of the window concurrently.
///
/// An invalid window is rejected before any query is issued.
pub async fn paginate<T, C, I, F>(offset: u64, limit: u64, total: C, mut item: I) -> SdkResult<Page<T>>
where
    C: Future<Output = SdkResult<u64>>,
    I: FnMut(u64) -> F,
    F: Future<Output = SdkResult<T>>,
{
    let request = PageRequest::new(offset, limit)?;
    let total = total.await?;

    if request.offset >= total {
        return Ok(Page::empty());
    }

    let end = request.end(total);
    let data = try_join_all((request.offset..end).map(&mut item)).await?;
    let more = request.offset.saturating_add(request.limit) < total;

    tracing::debug!(offset, limit, total, returned = data.len(), more, "Page fetched");

    Ok(Page { data, more })
}

/// Convert an on-chain count to an index bound.
pub fn count_to_u64(count: U256) -> SdkResult<u64> {
    u64::try_from(count).map_err(|_| SdkError::Abi(format!("count {count} exceeds u64")))
}
