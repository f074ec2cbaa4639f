//! # Lacassa Configuration
//!
//! Typed session settings for execution adapters: contact points, keyspace,
//! page size, consistency, timeouts and credentials.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lacassa_config::ConfigLoader;
//!
//! let config = ConfigLoader::load_from_file("lacassa.toml")?;
//! println!("paging {} rows at a time", config.page_size);
//! # Ok::<(), lacassa_config::ConfigError>(())
//! ```

#![warn(clippy::all)]

mod config;
mod error;
mod loader;

pub use config::*;
pub use error::*;
pub use loader::*;
