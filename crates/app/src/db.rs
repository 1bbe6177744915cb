use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

pub const MEMORY_URL: &str = "sqlite::memory:";

/// Turns `sqlite:relative.db` or a bare path into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == MEMORY_URL || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories so the pool can open it.
///
/// # Errors
///
/// Fails for a URL without a path or when the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == MEMORY_URL {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid database url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database url: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_absolute_and_memory_urls() {
        assert_eq!(normalize_sqlite_url(MEMORY_URL), MEMORY_URL);
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/t.db"),
            "sqlite:///tmp/t.db"
        );
    }

    #[test]
    fn resolves_relative_paths() {
        let url = normalize_sqlite_url("sqlite:data/t.db");
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("data/t.db"));
        assert!(Path::new(url.trim_start_matches("sqlite://")).is_absolute());
    }

    #[test]
    fn rejects_pathless_urls() {
        assert!(prepare_sqlite_file("sqlite://").is_err());
        assert!(prepare_sqlite_file("postgres://x").is_err());
    }
}
