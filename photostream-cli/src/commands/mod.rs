//! CLI subcommands.

pub mod common;
pub mod evict;
pub mod fetch;
pub mod info;
