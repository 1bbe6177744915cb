use tryout_core::model::{Package, PackageId};

use super::SqliteRepository;
use super::mapping::{conn, id_i64, map_package_row};
use crate::repository::{PackageRepository, StorageError};

#[async_trait::async_trait]
impl PackageRepository for SqliteRepository {
    async fn upsert_package(&self, package: &Package) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO packages (id, name, time_limit_minutes)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                time_limit_minutes = excluded.time_limit_minutes
            ",
        )
        .bind(id_i64("package_id", package.id().value())?)
        .bind(package.name())
        .bind(i64::from(package.time_limit_minutes()))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_package(&self, id: PackageId) -> Result<Option<Package>, StorageError> {
        let row = sqlx::query("SELECT id, name, time_limit_minutes FROM packages WHERE id = ?1")
            .bind(id_i64("package_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_package_row).transpose()
    }

    async fn list_packages(&self) -> Result<Vec<Package>, StorageError> {
        let rows = sqlx::query("SELECT id, name, time_limit_minutes FROM packages ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_package_row).collect()
    }
}
