//! Command-line front end for the invoicer.
//!
//! `main.rs` only wires things together; argument types, configuration and
//! command execution live here so they can be tested without a process.

pub mod args;
pub mod commands;
pub mod config;

pub use args::{Cli, Command};
pub use config::Config;
