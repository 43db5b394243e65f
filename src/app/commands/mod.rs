//! Subcommand handlers.
//!
//! Handlers return `Result<(), String>`; `main` renders the error and sets
//! the exit code.

/// `current`, `status`, and `backup`.
pub(crate) mod inspect;
/// `list`, `add`, `update`, `remove`, and `use`.
pub(crate) mod profiles;
/// `init` and `serve`.
pub(crate) mod setup;

use ccman::render::Renderer;
use ccman::store::ProfileStore;

/// Shared state every store-backed handler needs.
pub(crate) struct CommandContext<'a> {
    pub store: &'a ProfileStore,
    pub renderer: Renderer,
}
