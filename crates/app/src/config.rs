use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use services::StaticAccessControl;
use tryout_core::model::{PackageId, UserId};
use tryout_core::scoring::ScoringRules;

pub const DEFAULT_CONFIG_FILE: &str = "tryout.toml";
pub const DB_URL_ENV: &str = "TRYOUT_DB_URL";

/// Contents of `tryout.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TryoutConfig {
    pub database: DatabaseConfig,
    pub scoring: ScoringRules,
    pub access: AccessConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://tryout.sqlite3".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Grant {
    pub user: UserId,
    pub package: PackageId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub admin_users: Vec<UserId>,
    pub grants: Vec<Grant>,
}

impl AccessConfig {
    #[must_use]
    pub fn to_access_control(&self) -> StaticAccessControl {
        let admins = self
            .admin_users
            .iter()
            .fold(StaticAccessControl::new(), |acc, &user| acc.with_admin(user));
        self.grants
            .iter()
            .fold(admins, |acc, g| acc.with_grant(g.user, g.package))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
        }
    }
}

impl TryoutConfig {
    /// Load `explicit` if given, otherwise `tryout.toml` in the working
    /// directory when it exists, otherwise defaults.
    ///
    /// # Errors
    ///
    /// Fails when an explicit file is missing, or a file cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    /// # Errors
    ///
    /// Fails on malformed TOML or invalid scoring rules.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.scoring.validate()?;
        Ok(config)
    }

    /// Flag wins over the environment, which wins over the file.
    #[must_use]
    pub fn database_url(&self, flag: Option<&str>, env: Option<String>) -> String {
        flag.map(str::to_owned)
            .or(env)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.database.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::AccessControl;

    #[test]
    fn empty_file_uses_defaults() {
        let config = TryoutConfig::parse("").unwrap();
        assert_eq!(config.database.url, "sqlite://tryout.sqlite3");
        assert_eq!(config.scoring, ScoringRules::default());
        assert_eq!(config.logging.filter, "info");
        assert!(config.access.grants.is_empty());
    }

    #[test]
    fn parses_every_section() {
        let config = TryoutConfig::parse(
            r#"
            [database]
            url = "sqlite::memory:"

            [scoring]
            passing_twk = 60
            credit_per_item = 4

            [access]
            admin_users = [100]
            grants = [{ user = 1, package = 2 }]

            [logging]
            filter = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.scoring.credit_per_item, 4);
        assert!((config.scoring.passing_twk - 60.0).abs() < f64::EPSILON);
        assert!((config.scoring.passing_tkp - 166.0).abs() < f64::EPSILON);
        assert_eq!(
            config.access.grants,
            vec![Grant {
                user: UserId::new(1),
                package: PackageId::new(2),
            }]
        );
        assert_eq!(config.logging.filter, "debug");

        let access = config.access.to_access_control();
        assert!(access.is_privileged(UserId::new(100)));
        assert!(!access.is_privileged(UserId::new(1)));
    }

    #[test]
    fn rejects_invalid_rules() {
        let err = TryoutConfig::parse("[scoring]\ncredit_per_item = 0\n").unwrap_err();
        assert!(err.to_string().contains("credit_per_item"));
    }

    #[test]
    fn database_url_precedence() {
        let config = TryoutConfig::default();
        assert_eq!(config.database_url(None, None), "sqlite://tryout.sqlite3");
        assert_eq!(
            config.database_url(None, Some("sqlite://env.db".into())),
            "sqlite://env.db"
        );
        assert_eq!(
            config.database_url(Some("sqlite://flag.db"), Some("sqlite://env.db".into())),
            "sqlite://flag.db"
        );
    }
}
