//! In-memory adapter for tests.
//!
//! [`ScriptedAdapter`] records every statement it is asked to run and
//! answers with a cursor over a scripted list of page sizes.

use crate::adapter::{ExecutionAdapter, ExecutionError, ExecutionOptions, PageCursor};
use lacassa_config::SessionConfig;
use lacassa_query::{RenderedQuery, Value};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Adapter that replays scripted page sizes and records executions
#[derive(Debug, Default)]
pub struct ScriptedAdapter {
    pages: Vec<usize>,
    total_rows: Option<usize>,
    fail_connect: Option<String>,
    fail_execute: Option<String>,
    fail_at_page: Option<usize>,
    connected: Mutex<Option<SessionConfig>>,
    executed: Mutex<Vec<RenderedQuery>>,
    options: Mutex<Vec<ExecutionOptions>>,
    page_fetches: Arc<AtomicUsize>,
}

impl ScriptedAdapter {
    /// Every execution returns a single empty page
    pub fn new() -> Self {
        Self::with_pages([0])
    }

    /// Every execution returns pages with these row counts
    pub fn with_pages(pages: impl IntoIterator<Item = usize>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Every execution returns `total` rows split into pages of the
    /// requested `page_size`
    pub fn with_rows(total: usize) -> Self {
        Self {
            total_rows: Some(total),
            ..Default::default()
        }
    }

    /// Fail fetching the page at `index` (zero-based; the first page is 0)
    pub fn failing_at_page(mut self, index: usize) -> Self {
        self.fail_at_page = Some(index);
        self
    }

    /// Reject the connection with `message`
    pub fn failing_connect(mut self, message: impl Into<String>) -> Self {
        self.fail_connect = Some(message.into());
        self
    }

    /// Reject every execution with `message`
    pub fn failing_execute(mut self, message: impl Into<String>) -> Self {
        self.fail_execute = Some(message.into());
        self
    }

    /// Config the adapter was connected with, if any
    pub fn connected_config(&self) -> Option<SessionConfig> {
        self.connected.lock().clone()
    }

    /// Statements executed so far, in order
    pub fn executed(&self) -> Vec<RenderedQuery> {
        self.executed.lock().clone()
    }

    /// The most recent statement, if any
    pub fn last_executed(&self) -> Option<RenderedQuery> {
        self.executed.lock().last().cloned()
    }

    /// Options sent with the most recent statement
    pub fn last_options(&self) -> Option<ExecutionOptions> {
        self.options.lock().last().cloned()
    }

    /// Total `next_page` calls across every cursor handed out
    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }

    fn pages_for(&self, options: &ExecutionOptions) -> Vec<usize> {
        let Some(total) = self.total_rows else {
            return self.pages.clone();
        };
        let page_size = options.page_size.max(1) as usize;
        if total == 0 {
            return vec![0];
        }

        let mut pages = vec![page_size; total / page_size];
        if total % page_size != 0 {
            pages.push(total % page_size);
        }
        pages
    }
}

impl ExecutionAdapter for ScriptedAdapter {
    type Cursor = ScriptedCursor;

    fn connect(&self, config: &SessionConfig) -> Result<(), ExecutionError> {
        if let Some(message) = &self.fail_connect {
            return Err(ExecutionError::new(message.clone()));
        }
        *self.connected.lock() = Some(config.clone());
        Ok(())
    }

    fn execute(
        &self,
        cql: &str,
        params: &[Value],
        options: &ExecutionOptions,
    ) -> Result<Self::Cursor, ExecutionError> {
        self.executed
            .lock()
            .push(RenderedQuery::new(cql, params.to_vec()));
        self.options.lock().push(options.clone());

        if let Some(message) = &self.fail_execute {
            return Err(ExecutionError::new(message.clone()));
        }

        Ok(ScriptedCursor {
            pages: Arc::from(self.pages_for(options)),
            index: 0,
            fail_at_page: self.fail_at_page,
            fetches: Arc::clone(&self.page_fetches),
        })
    }
}

/// Cursor over scripted page sizes
#[derive(Debug, Clone)]
pub struct ScriptedCursor {
    pages: Arc<[usize]>,
    index: usize,
    fail_at_page: Option<usize>,
    fetches: Arc<AtomicUsize>,
}

impl ScriptedCursor {
    /// Zero-based index of this page
    pub fn page_index(&self) -> usize {
        self.index
    }
}

impl PageCursor for ScriptedCursor {
    fn row_count(&self) -> usize {
        self.pages.get(self.index).copied().unwrap_or(0)
    }

    fn is_last_page(&self) -> bool {
        self.index + 1 >= self.pages.len()
    }

    fn next_page(&self) -> Result<Self, ExecutionError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let index = self.index + 1;
        if self.fail_at_page == Some(index) {
            return Err(ExecutionError::new(format!("failed to fetch page {}", index)));
        }

        Ok(Self {
            pages: Arc::clone(&self.pages),
            index,
            fail_at_page: self.fail_at_page,
            fetches: Arc::clone(&self.fetches),
        })
    }
}
