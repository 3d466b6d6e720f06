//! Asterbench CLI
//!
//! This crate provides the command-line harness around the Asterbench
//! runtime:
//! - schema: Show the discovered primary key and fields
//! - read / scan: Fetch records and print them as JSON
//! - insert / update / delete: Run one write and print its status
//! - load: Insert generated records with concurrent clients

pub mod commands;

pub use commands::{Cli, Commands, ConfigOverrides};
