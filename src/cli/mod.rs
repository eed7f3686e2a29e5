//! CLI infrastructure for the `qsnake` binary
//!
//! Training, greedy playback and table inspection, plus the session config
//! file and report formatting they share.

pub mod commands;
pub mod config;
pub mod output;
