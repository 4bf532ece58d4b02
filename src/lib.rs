//! Bill Page Bot Library
//!
//! Looks up a consumer number in a CSV mapping table and returns the
//! matching page of a shared bill PDF as a standalone one-page document.
//! The binary in main.rs wires this to a Telegram bot.
//!
//! # Modules
//!
//! - `mapping`: Consumer number -> page index table
//! - `document`: Reference PDF fetch, open, and single-page extraction
//! - `handler`: Per-request state machine and user-facing replies
//! - `telegram`: Bot API client and long-polling dispatcher
//! - `config`: Environment configuration

pub mod config;
pub mod document;
pub mod handler;
pub mod mapping;
pub mod telegram;
