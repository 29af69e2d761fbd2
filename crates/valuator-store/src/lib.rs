#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuator/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Store backends for the valuator engine.
//!
//! This crate provides implementations of the [`Store`] trait from `valuator-core`:
//!
//! - [`SqliteStore`] - Persistent SQLite-based store (default, requires `sqlite` feature)
//! - [`FileStore`] - One file per key below a root directory
//! - [`RemoteStore`] - Remote key/value service over HTTP
//! - [`InMemoryStore`] - Simple in-memory store for testing
//! - [`NoopStore`] - No-op store that doesn't keep anything
//!
//! [`StoreConfig`] picks one of them from configuration.

/// Store selection from configuration.
pub mod config;
/// File system store implementation.
pub mod file;
/// In-memory store implementation.
pub mod memory;
/// No-op store implementation.
pub mod noop;
/// HTTP store implementation.
pub mod remote;

/// SQLite-based store implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use valuator_core::Store;

// Re-export implementations
pub use config::StoreConfig;
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use noop::NoopStore;
pub use remote::RemoteStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
