//! xv - local Twitter/X archive viewer
//!
//! This library ingests per-tweet JSON documents exported from X into
//! `SQLite` and serves a small web app for browsing the archive.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`config`] - Layered configuration and data-root paths
//! - [`error`] - Custom error types with rich context
//! - [`model`] - Ingestion documents, store rows and view models
//! - [`ingest`] - Batch ingestion of exported documents
//! - [`ledger`] - Download ledger for profile images
//! - [`storage`] - `SQLite` storage layer
//! - [`resolve`] - Relationship resolution between tweets
//! - [`render`] - Presentation formatting and content markup
//! - [`translate`] - Translation collaborator behind the web API
//! - [`html`] - Server-rendered pages and fragments
//! - [`server`] - HTTP server assembly
//! - [`handlers`] - Request handlers

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod html;
pub mod ingest;
pub mod ledger;
pub mod model;
pub mod render;
pub mod resolve;
pub mod server;
pub mod storage;
pub mod translate;

pub use cli::*;
pub use config::{Config, DataPaths};
pub use error::{Result, XvError};
pub use ingest::{IngestReport, Ingestor};
pub use model::*;
pub use render::{format_count, Formatter};
pub use resolve::Resolver;
pub use storage::Storage;
