use tryout_core::model::StudyMaterial;

use super::SqliteRepository;
use super::mapping::{conn, id_i64, map_material_row};
use crate::repository::{MaterialRepository, StorageError};

#[async_trait::async_trait]
impl MaterialRepository for SqliteRepository {
    async fn upsert_material(&self, material: &StudyMaterial) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO study_materials (id, title, description)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description
            ",
        )
        .bind(id_i64("material_id", material.id.value())?)
        .bind(&material.title)
        .bind(&material.description)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn list_materials(&self) -> Result<Vec<StudyMaterial>, StorageError> {
        let rows = sqlx::query("SELECT id, title, description FROM study_materials ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_material_row).collect()
    }
}
