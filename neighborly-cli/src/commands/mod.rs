//! CLI command implementations.
//!
//! - [`filter`] - Rank items around a center within a range tier
//! - [`ranges`] - List range tiers
//! - [`config`] - Configuration management (path, show, init)

pub mod common;
pub mod config;
pub mod filter;
pub mod ranges;
