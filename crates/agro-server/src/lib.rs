//! Agro Server Library
//!
//! HTTP API for registering rural producers, their farms and the crops
//! planted on them, with aggregate statistics over every farm.
//!
//! # Architecture
//!
//! - **features**: vertical slices (`producers`, `farms`) with commands,
//!   queries and routes. Commands validate their request against rule tables
//!   and enforce the area invariants before any write.
//! - **store**: persistence traits with PostgreSQL and in-memory backends.
//!   Both backends re-check duplicate documents, dependent farms and
//!   cultivable capacity at write time.
//! - **api**: router assembly, health endpoint, error response bodies.
//!
//! # Example
//!
//! ```no_run
//! use agro_server::{api, config::Config, store::Stores};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config, Stores::in_memory()).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod features;
pub mod middleware;
pub mod models;
pub mod store;
