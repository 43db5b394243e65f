use ccman::profile::mask_api_key;

use super::CommandContext;

pub(crate) fn current(ctx: &CommandContext<'_>, json: bool) -> Result<(), String> {
    let current = ctx.store.current().map_err(|e| e.to_string())?;
    let in_sync = current.in_sync();

    if json {
        let view = ccman::report::CurrentView::from(current);
        return ctx.renderer.json(&view).map_err(|e| e.to_string());
    }

    ctx.renderer.section("active profile");
    match &current.active {
        Some(profile) => {
            ctx.renderer.field("name", &profile.name);
            ctx.renderer.field("id", &profile.id);
            ctx.renderer.field("base url", &profile.base_url);
            ctx.renderer.field("api key", &mask_api_key(&profile.api_key));
        }
        None => ctx.renderer.detail("none"),
    }

    ctx.renderer.section("claude settings");
    let settings = &current.settings;
    ctx.renderer.field("source", &settings.source);
    if !settings.base_url.is_empty() {
        ctx.renderer.field("base url", &settings.base_url);
    }
    if !settings.api_key.is_empty() {
        ctx.renderer
            .field("api key", &mask_api_key(&settings.api_key));
    }

    if current.active.is_some() && !in_sync {
        ctx.renderer.warn(
            "settings.json does not match the active profile; run `ccman use <profile>` to rewrite it",
        );
    }
    Ok(())
}

pub(crate) fn status(ctx: &CommandContext<'_>, json: bool) -> Result<(), String> {
    let report = ctx.store.status().map_err(|e| e.to_string())?;
    if json {
        return ctx.renderer.json(&report).map_err(|e| e.to_string());
    }

    ctx.renderer.section("status");
    ctx.renderer
        .field("profiles", &report.api_config_count.to_string());
    ctx.renderer.field(
        "active",
        report.active_profile_id.as_deref().unwrap_or("none"),
    );
    ctx.renderer
        .field("data file", &report.data_file.display().to_string());
    ctx.renderer.field(
        "settings",
        &format!(
            "{} ({})",
            report.settings_path.display(),
            if report.claude_settings_exists {
                "present"
            } else {
                "missing"
            }
        ),
    );
    if report.skipped_entries > 0 {
        ctx.renderer.field(
            "unreadable entries",
            &report.skipped_entries.to_string(),
        );
    }
    Ok(())
}

pub(crate) fn backup(ctx: &CommandContext<'_>) -> Result<(), String> {
    let path = ctx.store.backup().map_err(|e| e.to_string())?;
    ctx.renderer
        .success(&format!("backed up profiles to {}", path.display()));
    Ok(())
}
