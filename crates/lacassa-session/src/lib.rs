//! Lacassa Session
//!
//! Runs compiled queries through an [`ExecutionAdapter`] and aggregates
//! paged results.
//!
//! # Example
//!
//! ```no_run
//! use lacassa_config::SessionConfig;
//! use lacassa_session::{ExecutionAdapter, Session, SessionResult};
//!
//! fn posts_by<A: ExecutionAdapter>(adapter: A, user: &str) -> SessionResult<u64> {
//!     let session = Session::new(adapter, SessionConfig::new("blog"))?;
//!     let posts = session.table("posts").where_eq("user", user);
//!     session.count(&posts)
//! }
//! ```

#![warn(clippy::all)]

pub mod adapter;
pub mod error;
pub mod paginate;
pub mod session;

#[cfg(feature = "test-utils")]
pub mod testing;

pub use adapter::{ExecutionAdapter, ExecutionError, ExecutionOptions, PageCursor};
pub use error::{SessionError, SessionResult};
pub use paginate::PageAggregator;
pub use session::Session;

pub use tokio_util::sync::CancellationToken;
