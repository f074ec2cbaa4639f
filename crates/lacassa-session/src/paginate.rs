//! Paged aggregation.
//!
//! The store returns results in bounded pages, so an exact count means
//! walking every page and summing row counts. Pages are fetched strictly in
//! order: page N+1 is only requested after page N has been counted.

use crate::adapter::{ExecutionAdapter, ExecutionOptions, PageCursor};
use crate::error::{SessionError, SessionResult};
use lacassa_query::RenderedQuery;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Sums row counts across every page of a result set.
///
/// The loop ends when the cursor reports its last page. A cancellation
/// token is checked before each page fetch so a cursor that never reaches
/// its last page can still be abandoned.
#[derive(Debug, Clone, Default)]
pub struct PageAggregator {
    cancel: CancellationToken,
}

impl PageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregator that stops when `cancel` fires
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Execute `rendered` and count rows across all of its pages
    pub fn count<A: ExecutionAdapter>(
        &self,
        adapter: &A,
        rendered: &RenderedQuery,
        options: &ExecutionOptions,
    ) -> SessionResult<u64> {
        if self.cancel.is_cancelled() {
            return Err(SessionError::Cancelled { pages: 0 });
        }

        let first = adapter.execute(&rendered.cql, &rendered.params, options)?;
        self.count_cursor(first)
    }

    /// Count rows starting from an already fetched first page.
    ///
    /// The first fetch error aborts the whole count; no partial total is
    /// returned.
    pub fn count_cursor<C: PageCursor>(&self, first: C) -> SessionResult<u64> {
        let mut cursor = first;
        let mut pages = 1usize;
        let mut total = cursor.row_count() as u64;
        trace!(page = pages, rows = cursor.row_count(), total, "Counted page");

        while !cursor.is_last_page() {
            if self.cancel.is_cancelled() {
                debug!(pages, total, "Paged count cancelled");
                return Err(SessionError::Cancelled { pages });
            }

            cursor = cursor.next_page()?;
            pages += 1;
            total += cursor.row_count() as u64;
            trace!(page = pages, rows = cursor.row_count(), total, "Counted page");
        }

        debug!(pages, total, "Paged count complete");
        Ok(total)
    }
}
