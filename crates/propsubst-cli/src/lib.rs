//! propsubst CLI library
//!
//! This module exposes the CLI main function so the binary stays a one-liner.

mod cli;

pub use cli::run;
