use ccman::profile::{mask_api_key, Profile, ProfileDraft, ProfilePatch};
use ccman::report::ProfileListing;

use super::CommandContext;
use crate::app::selector::resolve_profile_selector;

pub(crate) fn list(ctx: &CommandContext<'_>, show_keys: bool, json: bool) -> Result<(), String> {
    let mut listing = ctx.store.list_report().map_err(|e| e.to_string())?;
    if !show_keys {
        mask_listing(&mut listing);
    }

    if json {
        return ctx.renderer.json(&listing).map_err(|e| e.to_string());
    }

    if listing.skipped_entries > 0 {
        ctx.renderer.warn(&format!(
            "{} unreadable entr{} in {} left untouched",
            listing.skipped_entries,
            if listing.skipped_entries == 1 { "y" } else { "ies" },
            ctx.store.data_file().display()
        ));
    }
    if listing.profiles.is_empty() {
        ctx.renderer.section("profiles");
        ctx.renderer
            .detail("none yet; add one with `ccman add <name> --base-url <url>`");
        return Ok(());
    }

    ctx.renderer
        .section(&format!("profiles ({})", listing.total_count));
    for (index, profile) in listing.profiles.iter().enumerate() {
        let detail = format!(
            "#{} {} {} created {}",
            index + 1,
            profile.base_url,
            profile.api_key,
            profile.created_at.format("%Y-%m-%d %H:%M UTC")
        );
        ctx.renderer
            .profile_row(profile.is_active, &profile.name, &profile.id, &detail);
    }
    Ok(())
}

fn mask_listing(listing: &mut ProfileListing) {
    for profile in &mut listing.profiles {
        profile.api_key = mask_api_key(&profile.api_key);
    }
}

pub(crate) fn add(
    ctx: &CommandContext<'_>,
    name: String,
    base_url: String,
    api_key: Option<String>,
) -> Result<(), String> {
    let api_key = match api_key {
        Some(key) => key,
        None => rpassword::prompt_password(format!("API key for {name}: "))
            .map_err(|e| format!("failed to read API key: {e}"))?,
    };
    let draft = ProfileDraft::new(name, api_key, base_url);
    let created = ctx.store.create(draft).map_err(|e| e.to_string())?;

    ctx.renderer
        .success(&format!("added profile `{}`", created.name));
    ctx.renderer.field("id", &created.id);
    if created.is_active {
        ctx.renderer.field(
            "active",
            &format!(
                "yes, written to {}",
                ctx.store.projector().settings_path().display()
            ),
        );
    }
    Ok(())
}

pub(crate) fn update(
    ctx: &CommandContext<'_>,
    selector: &str,
    patch: ProfilePatch,
) -> Result<(), String> {
    if patch.is_empty() {
        return Err("nothing to update; pass --name, --api-key, or --base-url".to_string());
    }
    let target = select(ctx, selector)?;
    if !ctx
        .store
        .update(&target.id, &patch)
        .map_err(|e| e.to_string())?
    {
        return Err(format!("profile `{}` disappeared", target.name));
    }

    let name = patch.name.as_deref().unwrap_or(&target.name);
    ctx.renderer.success(&format!("updated profile `{name}`"));
    if target.is_active {
        ctx.renderer.detail("Claude Code settings refreshed");
    }
    Ok(())
}

pub(crate) fn remove(ctx: &CommandContext<'_>, selector: &str) -> Result<(), String> {
    let target = select(ctx, selector)?;
    if !ctx.store.delete(&target.id).map_err(|e| e.to_string())? {
        return Err(format!("profile `{}` disappeared", target.name));
    }
    ctx.renderer
        .success(&format!("removed profile `{}`", target.name));

    if target.is_active {
        match ctx.store.get_active().map_err(|e| e.to_string())? {
            Some(next) => ctx
                .renderer
                .field("now active", &format!("{} ({})", next.name, next.id)),
            None => ctx
                .renderer
                .warn("no profiles left; Claude Code settings were not changed"),
        }
    }
    Ok(())
}

pub(crate) fn activate(ctx: &CommandContext<'_>, selector: &str) -> Result<(), String> {
    let target = select(ctx, selector)?;
    let activated = ctx
        .store
        .activate(&target.id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("profile `{}` disappeared", target.name))?;
    ctx.renderer
        .success(&format!("`{}` is now active", activated.name));
    ctx.renderer.field("base url", &activated.base_url);
    ctx.renderer.field(
        "settings",
        &ctx.store.projector().settings_path().display().to_string(),
    );
    Ok(())
}

fn select(ctx: &CommandContext<'_>, selector: &str) -> Result<Profile, String> {
    let profiles = ctx.store.list().map_err(|e| e.to_string())?;
    resolve_profile_selector(&profiles, selector).cloned()
}
