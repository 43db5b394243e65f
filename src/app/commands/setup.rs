use std::path::Path;
use std::sync::Arc;

use ccman::config::{
    initialize_config_at_path, initialize_default_global_config, ConfigInitResult, ServerConfig,
};
use ccman::render::Renderer;
use ccman::store::ProfileStore;

pub(crate) fn init(renderer: Renderer, path: Option<&Path>, force: bool) -> Result<(), String> {
    let result = match path {
        Some(path) => initialize_config_at_path(path, force),
        None => initialize_default_global_config(force),
    };

    match result.map_err(|e| e.to_string())? {
        ConfigInitResult::Created { path } => {
            renderer.success(&format!("wrote {}", path.display()));
        }
        ConfigInitResult::AlreadyInitialized { path } => {
            renderer.warn(&format!(
                "{} already exists; pass --force to replace it",
                path.display()
            ));
        }
        ConfigInitResult::Overwritten { path, backup_path } => {
            renderer.success(&format!("wrote {}", path.display()));
            renderer.field("backup", &backup_path.display().to_string());
        }
    }
    Ok(())
}

pub(crate) async fn serve(
    renderer: Renderer,
    store: Arc<ProfileStore>,
    server: &ServerConfig,
) -> Result<(), String> {
    let addr = server.bind_addr();
    renderer.section("ccman serve");
    renderer.field("data file", &store.data_file().display().to_string());
    renderer.field(
        "settings",
        &store.projector().settings_path().display().to_string(),
    );
    ccman::server::serve(store, &addr)
        .await
        .map_err(|e| format!("server on {addr} failed: {e}"))
}
