//! Resolve a user-typed profile selector to one stored profile.

use ccman::profile::Profile;

/// Match by id, exact name, 1-based list index, then unique case-insensitive name.
pub(crate) fn resolve_profile_selector<'a>(
    profiles: &'a [Profile],
    selector: &str,
) -> Result<&'a Profile, String> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err("profile selector must not be empty".to_string());
    }

    if let Some(profile) = profiles.iter().find(|p| p.id == trimmed) {
        return Ok(profile);
    }
    if let Some(profile) = profiles.iter().find(|p| p.name == trimmed) {
        return Ok(profile);
    }

    if let Ok(index) = trimmed.parse::<usize>() {
        if index == 0 || index > profiles.len() {
            return Err(format!(
                "Profile index out of range: {index}. Choose 1-{}.",
                profiles.len()
            ));
        }
        return Ok(&profiles[index - 1]);
    }

    let normalized = trimmed.to_lowercase();
    let mut matches = profiles
        .iter()
        .filter(|p| p.name.to_lowercase() == normalized)
        .collect::<Vec<_>>();
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(format!(
            "Unknown profile `{trimmed}`. Run `ccman list` to see stored profiles."
        )),
        _ => Err(format!(
            "Profile `{trimmed}` is ambiguous; use the exact name or id."
        )),
    }
}
