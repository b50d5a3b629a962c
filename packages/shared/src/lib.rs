//! Shared utilities for the Idobata chat client.
//!
//! This crate hosts the concerns every Idobata package needs regardless of
//! layer: logger setup and timestamp generation.

pub mod logger;
pub mod time;

pub use logger::setup_logger;
pub use time::get_jst_timestamp;
