//! Binary-local application helpers.
//!
//! `main.rs` keeps wiring logic; command handlers and shared helpers live here.

pub(crate) mod commands;
pub(crate) mod logging;
pub(crate) mod selector;
