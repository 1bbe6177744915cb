//! The access-control collaborator: "may user U take package P".

use async_trait::async_trait;
use std::collections::HashSet;

use storage::repository::StorageError;
use tryout_core::model::{PackageId, UserId};

#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Administrators bypass purchase checks.
    fn is_privileged(&self, user: UserId) -> bool;

    /// Whether the user holds a valid purchase for the package.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entitlement source cannot be read.
    async fn has_purchase(&self, user: UserId, package: PackageId) -> Result<bool, StorageError>;

    /// Purchase-or-privilege check used by session start.
    ///
    /// # Errors
    ///
    /// Propagates `has_purchase` failures.
    async fn can_access(&self, user: UserId, package: PackageId) -> Result<bool, StorageError> {
        if self.is_privileged(user) {
            return Ok(true);
        }
        self.has_purchase(user, package).await
    }
}

/// Fixed admin list and entitlement grants, typically loaded from config.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessControl {
    admins: HashSet<UserId>,
    grants: HashSet<(UserId, PackageId)>,
}

impl StaticAccessControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_admin(mut self, user: UserId) -> Self {
        self.admins.insert(user);
        self
    }

    #[must_use]
    pub fn with_grant(mut self, user: UserId, package: PackageId) -> Self {
        self.grants.insert((user, package));
        self
    }

    /// Grants every user in `users` access to `package`.
    #[must_use]
    pub fn with_grants(mut self, users: impl IntoIterator<Item = UserId>, package: PackageId) -> Self {
        self.grants.extend(users.into_iter().map(|u| (u, package)));
        self
    }
}

#[async_trait]
impl AccessControl for StaticAccessControl {
    fn is_privileged(&self, user: UserId) -> bool {
        self.admins.contains(&user)
    }

    async fn has_purchase(&self, user: UserId, package: PackageId) -> Result<bool, StorageError> {
        Ok(self.grants.contains(&(user, package)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn admins_bypass_purchase_check() {
        let access = StaticAccessControl::new()
            .with_admin(UserId::new(1))
            .with_grant(UserId::new(2), PackageId::new(10));

        assert!(access.can_access(UserId::new(1), PackageId::new(99)).await.unwrap());
        assert!(access.can_access(UserId::new(2), PackageId::new(10)).await.unwrap());
        assert!(!access.can_access(UserId::new(2), PackageId::new(11)).await.unwrap());
        assert!(!access.can_access(UserId::new(3), PackageId::new(10)).await.unwrap());
    }
}
