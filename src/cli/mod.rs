//! CLI operation mode handlers.
//!
//! - [`migrations`]: database schema migrations
//! - [`report`]: refresh the cache and compute repository metrics
//!
//! Output formatting utilities are in [`output`].

pub mod migrations;
pub mod output;
pub mod report;
