//! ccman: keeps a library of API credential profiles and mirrors the active
//! one into Claude Code's `settings.json`.
//!
//! # Quick start
//!
//! ```no_run
//! use ccman::profile::ProfileDraft;
//! use ccman::projector::SettingsProjector;
//! use ccman::store::ProfileStore;
//!
//! # fn example() -> Result<(), ccman::error::StoreError> {
//! let store = ProfileStore::open(
//!     "./data/api_configs.json",
//!     SettingsProjector::new("/home/me/.claude/settings.json"),
//! );
//! let prod = store.create(ProfileDraft::new(
//!     "prod",
//!     "sk-ant-0123456789",
//!     "https://api.anthropic.com",
//! ))?;
//! store.activate(&prod.id)?;
//! # Ok(())
//! # }
//! ```

pub mod build_info;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod profile;
pub mod projector;
pub mod render;
pub mod report;
pub mod server;
pub mod store;
#[cfg(test)]
pub mod testsupport;
