//! # cloudenv
//!
//! Command line front end of the environment registry: argument parsing,
//! configuration loading, logging setup and the `set`, `get` and `list`
//! command handlers built on the `engine` crate.

pub mod args;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
