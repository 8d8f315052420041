//! CLI command implementations.

pub mod common;
pub mod config;
pub mod init;
pub mod project;
pub mod render;
pub mod tiles;
