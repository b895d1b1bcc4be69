//! Unit tests for configuration loading and precedence.
//!
//! - `helpers`: shared layer composition
//! - `precedence`: layer precedence and defaults
//! - `field_resolution`: token, repository, kind, state and marker resolution

mod field_resolution;
mod helpers;
