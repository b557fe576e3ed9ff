use anyhow::anyhow;
use folio_domain::paths;
use std::path::{Path, PathBuf};

pub(crate) fn optional_trimmed_path_from_env(name: &str) -> anyhow::Result<Option<PathBuf>> {
    let value = match std::env::var_os(name) {
        Some(value) => value,
        None => return Ok(None),
    };

    let value = value.to_string_lossy();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{name} is set but empty"));
    }

    Ok(Some(PathBuf::from(trimmed)))
}

/// Data root: `FOLIO_ROOT` when set, otherwise `<home>/.folio`.
pub fn resolve_folio_root(home: &Path) -> anyhow::Result<PathBuf> {
    Ok(optional_trimmed_path_from_env(paths::FOLIO_ROOT_ENV)?
        .unwrap_or_else(|| paths::default_root(home)))
}
