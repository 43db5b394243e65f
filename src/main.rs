//! CLI entry point for ccman.

mod app;
mod cli;

use std::sync::Arc;

use ccman::config::{load_config, Config};
use ccman::profile::ProfilePatch;
use ccman::projector::SettingsProjector;
use ccman::render::Renderer;
use ccman::store::ProfileStore;
use clap::Parser;

use app::commands::{self, CommandContext};
use cli::{Args, Command};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let serving = matches!(args.command, Command::Serve { .. });
    app::logging::init_tracing(args.verbose, serving);

    // `init` must work before any config file exists.
    if let Command::Init { force } = args.command {
        let renderer = Renderer::new(!args.no_color);
        exit_on_error(
            renderer,
            commands::setup::init(renderer, args.config.as_deref(), force),
        );
        return;
    }

    let loaded = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            Renderer::new(!args.no_color).error(&format!("config: {e}"));
            std::process::exit(1);
        }
    };
    tracing::debug!(source = %loaded.source.describe(), "config resolved");

    let mut config = loaded.config;
    apply_cli_overrides(&mut config, &args);
    let renderer = Renderer::new(config.display.color);

    let store = Arc::new(ProfileStore::open(
        config.data_file.clone(),
        SettingsProjector::new(config.settings_path.clone()),
    ));
    let ctx = CommandContext {
        store: store.as_ref(),
        renderer,
    };

    let result = match args.command {
        Command::List { show_keys, json } => commands::profiles::list(&ctx, show_keys, json),
        Command::Add {
            name,
            base_url,
            api_key,
        } => commands::profiles::add(&ctx, name, base_url, api_key),
        Command::Update {
            selector,
            name,
            api_key,
            base_url,
        } => commands::profiles::update(
            &ctx,
            &selector,
            ProfilePatch {
                name,
                api_key,
                base_url,
            },
        ),
        Command::Remove { selector } => commands::profiles::remove(&ctx, &selector),
        Command::Use { selector } => commands::profiles::activate(&ctx, &selector),
        Command::Current { json } => commands::inspect::current(&ctx, json),
        Command::Status { json } => commands::inspect::status(&ctx, json),
        Command::Backup => commands::inspect::backup(&ctx),
        Command::Serve { .. } => {
            commands::setup::serve(renderer, Arc::clone(&store), &config.server).await
        }
        Command::Init { .. } => unreachable!("init is handled before config loading"),
    };
    exit_on_error(renderer, result);
}

/// CLI flags win over file and env config.
fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(data_file) = &args.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(settings) = &args.settings {
        config.settings_path = settings.clone();
    }
    if args.no_color {
        config.display.color = false;
    }
    if let Command::Serve { host, port } = &args.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }
}

fn exit_on_error(renderer: Renderer, result: Result<(), String>) {
    if let Err(msg) = result {
        renderer.error(&msg);
        std::process::exit(1);
    }
}
