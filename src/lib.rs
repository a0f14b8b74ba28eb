//! Telrpm library exports for testing.
//!
//! This exposes internal components for integration testing.

pub mod clean;
pub mod commands;
pub mod config;
pub mod package;
pub mod patch;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod staging;
